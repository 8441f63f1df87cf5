//! The two-state interaction mode.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interaction mode gating which control path is live.
///
/// In `Select` the operator addresses actuator zones by touch and the
/// proximity-intensity path runs; in `Manipulate` the joint-angle
/// retargeting path drives the gripper. Transitions are governed by the
/// mode state machine in `teleop-select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// Addressing actuator zones by touch.
    #[default]
    Select,
    /// Driving the selected actuator from the tracked hand.
    Manipulate,
}

impl Mode {
    /// Check whether the selection path is live.
    #[must_use]
    pub const fn is_select(self) -> bool {
        matches!(self, Self::Select)
    }

    /// Check whether the manipulation path is live.
    #[must_use]
    pub const fn is_manipulate(self) -> bool {
        matches!(self, Self::Manipulate)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Manipulate => write!(f, "manipulate"),
        }
    }
}
