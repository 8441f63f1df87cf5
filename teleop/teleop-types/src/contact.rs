//! Contact zones and buffered contact events.
//!
//! The hosting collision system reports enter/stay/exit transitions against
//! touch-sensitive zones. The core never processes these as callbacks;
//! they're buffered into an ordered list and consumed once per tick.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Finger;

/// Identifier of one touch-sensitive actuator zone.
///
/// Raw value `0` means "no zone"; real zones number from 1. The maximum
/// supported zone count is [`ZoneId::MAX_ZONES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneId(pub u8);

impl ZoneId {
    /// The "no zone selected" value.
    pub const NONE: Self = Self(0);

    /// Maximum number of addressable zones.
    pub const MAX_ZONES: u8 = 12;

    /// Create a zone ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Check whether this is the "no zone" value.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Check whether this addresses a real zone.
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<u8> for ZoneId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "Zone(none)")
        } else {
            write!(f, "Zone({})", self.0)
        }
    }
}

/// Phase of one contact transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactPhase {
    /// A collider began touching the zone.
    Enter,
    /// A collider remains in contact.
    Stay,
    /// A collider stopped touching the zone.
    Exit,
}

/// One contact transition against a zone.
///
/// Zero or many of these may arrive between ticks; they're delivered to the
/// tick as an ordered list, and arrival order is the deterministic
/// tie-break when two zones report in the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactEvent {
    /// The reporting zone.
    pub zone: ZoneId,
    /// The transition phase.
    pub phase: ContactPhase,
    /// World-space contact point.
    pub point: Point3<f64>,
}

impl ContactEvent {
    /// Create an enter event.
    #[must_use]
    pub const fn enter(zone: ZoneId, point: Point3<f64>) -> Self {
        Self {
            zone,
            phase: ContactPhase::Enter,
            point,
        }
    }

    /// Create a stay event.
    #[must_use]
    pub const fn stay(zone: ZoneId, point: Point3<f64>) -> Self {
        Self {
            zone,
            phase: ContactPhase::Stay,
            point,
        }
    }

    /// Create an exit event.
    #[must_use]
    pub const fn exit(zone: ZoneId, point: Point3<f64>) -> Self {
        Self {
            zone,
            phase: ContactPhase::Exit,
            point,
        }
    }
}

/// Per-fingertip contact flags reported by the collision collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchFlags {
    /// Thumb fingertip in contact.
    pub thumb: bool,
    /// Index fingertip in contact.
    pub index: bool,
    /// Middle fingertip in contact.
    pub middle: bool,
}

impl TouchFlags {
    /// No fingertip in contact.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            thumb: false,
            index: false,
            middle: false,
        }
    }

    /// Read the flag for one finger.
    #[must_use]
    pub const fn finger(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
        }
    }
}
