//! The Select/Manipulate interaction mode machine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_types::{Mode, ZoneId};

/// Mode-machine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModeConfig {
    /// Hand-proximity distance separating close range from far range
    /// (tracking units).
    pub proximity_threshold: f64,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 0.16,
        }
    }
}

/// Two-state interaction mode with close-then-retreat hysteresis.
///
/// In `Select`, the arbiter's active zone is recorded sticky as the chosen
/// id: releasing the touch does not clear it. A retreat past the proximity
/// threshold with a chosen id commits to `Manipulate`. Leaving
/// `Manipulate` requires a full gesture — the hand must dip into close
/// range at least once before a retreat counts — so measurement noise at
/// the threshold can't bounce the mode.
///
/// # Example
///
/// ```
/// use teleop_select::ModeMachine;
/// use teleop_types::{Mode, ZoneId};
///
/// let mut machine = ModeMachine::new(Default::default());
/// machine.update(ZoneId::new(3), 0.10);  // touch close in: chosen = 3
/// assert_eq!(machine.mode(), Mode::Select);
///
/// machine.update(ZoneId::NONE, 0.20);    // retreat commits
/// assert_eq!(machine.mode(), Mode::Manipulate);
/// ```
#[derive(Debug, Clone)]
pub struct ModeMachine {
    config: ModeConfig,
    mode: Mode,
    chosen: ZoneId,
    motor_selected: bool,
    entered_close_range: bool,
}

impl ModeMachine {
    /// Create a machine in `Select` with no chosen zone.
    #[must_use]
    pub fn new(config: ModeConfig) -> Self {
        Self {
            config,
            mode: Mode::Select,
            chosen: ZoneId::NONE,
            motor_selected: false,
            entered_close_range: false,
        }
    }

    /// The current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The sticky chosen zone (cleared on entering `Manipulate`).
    #[must_use]
    pub const fn chosen(&self) -> ZoneId {
        self.chosen
    }

    /// Whether a motor has been selected this session.
    #[must_use]
    pub const fn motor_selected(&self) -> bool {
        self.motor_selected
    }

    /// Whether the hand has dipped into close range since entering
    /// `Manipulate`.
    #[must_use]
    pub const fn entered_close_range(&self) -> bool {
        self.entered_close_range
    }

    /// Observe one tick: the arbiter's active zone and the measured
    /// hand-proximity distance. Returns the (possibly new) mode.
    pub fn update(&mut self, active: ZoneId, distance: f64) -> Mode {
        match self.mode {
            Mode::Select => {
                // Sticky record: an active touch overwrites the chosen id,
                // releasing it changes nothing.
                if active.is_some() && active != self.chosen {
                    self.chosen = active;
                    self.motor_selected = true;
                }

                if self.chosen.is_some() && distance > self.config.proximity_threshold {
                    self.mode = Mode::Manipulate;
                    self.chosen = ZoneId::NONE;
                    self.entered_close_range = false;
                }
            }
            Mode::Manipulate => {
                if distance < self.config.proximity_threshold {
                    self.entered_close_range = true;
                }

                // Exit requires the full close-then-retreat gesture;
                // merely staying far never exits.
                if self.entered_close_range && distance > self.config.proximity_threshold {
                    self.reset();
                }
            }
        }
        self.mode
    }

    /// Reset all sticky state to initial values and return to `Select`.
    pub fn reset(&mut self) {
        self.mode = Mode::Select;
        self.chosen = ZoneId::NONE;
        self.motor_selected = false;
        self.entered_close_range = false;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn machine() -> ModeMachine {
        ModeMachine::new(ModeConfig::default())
    }

    #[test]
    fn test_chosen_is_sticky_across_release() {
        let mut m = machine();
        m.update(ZoneId::new(4), 0.05);
        assert_eq!(m.chosen(), ZoneId::new(4));
        assert!(m.motor_selected());

        // Touch released: the chosen id survives
        m.update(ZoneId::NONE, 0.05);
        assert_eq!(m.chosen(), ZoneId::new(4));
    }

    #[test]
    fn test_no_transition_without_chosen() {
        let mut m = machine();
        m.update(ZoneId::NONE, 0.50);
        assert_eq!(m.mode(), Mode::Select);
    }

    #[test]
    fn test_enters_manipulate_exactly_once() {
        let mut m = machine();
        m.update(ZoneId::new(2), 0.05);

        let mut transitions = 0;
        for distance in [0.10, 0.20] {
            let before = m.mode();
            let after = m.update(ZoneId::NONE, distance);
            if before != after {
                transitions += 1;
                // The transition fires at the 0.20 sample
                assert_eq!(distance, 0.20);
            }
        }
        assert_eq!(transitions, 1);
        assert_eq!(m.mode(), Mode::Manipulate);
        assert_eq!(m.chosen(), ZoneId::NONE);
        assert!(!m.entered_close_range());
    }

    #[test]
    fn test_exit_requires_close_then_retreat() {
        let mut m = machine();
        m.update(ZoneId::new(2), 0.05);
        m.update(ZoneId::NONE, 0.20);
        assert_eq!(m.mode(), Mode::Manipulate);

        // Staying far never exits
        m.update(ZoneId::NONE, 0.20);
        m.update(ZoneId::NONE, 0.20);
        assert_eq!(m.mode(), Mode::Manipulate);

        // Dip close, then retreat: exits at the final sample
        m.update(ZoneId::NONE, 0.10);
        assert_eq!(m.mode(), Mode::Manipulate);
        m.update(ZoneId::NONE, 0.20);
        assert_eq!(m.mode(), Mode::Select);
    }

    #[test]
    fn test_exit_resets_sticky_state() {
        let mut m = machine();
        m.update(ZoneId::new(2), 0.05);
        m.update(ZoneId::NONE, 0.20);
        m.update(ZoneId::NONE, 0.10);
        m.update(ZoneId::NONE, 0.20);

        assert_eq!(m.mode(), Mode::Select);
        assert_eq!(m.chosen(), ZoneId::NONE);
        assert!(!m.motor_selected());
        assert!(!m.entered_close_range());
    }

    #[test]
    fn test_dip_sample_does_not_exit_itself() {
        let mut m = machine();
        m.update(ZoneId::new(1), 0.05);
        m.update(ZoneId::NONE, 0.20);

        // The sample that latches close range is itself below the
        // threshold, so it can't also satisfy the retreat condition
        let mode = m.update(ZoneId::NONE, 0.10);
        assert_eq!(mode, Mode::Manipulate);
        assert!(m.entered_close_range());
    }

    #[test]
    fn test_new_touch_overwrites_chosen() {
        let mut m = machine();
        m.update(ZoneId::new(1), 0.05);
        m.update(ZoneId::new(6), 0.05);
        assert_eq!(m.chosen(), ZoneId::new(6));
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let mut m = machine();
        m.update(ZoneId::new(1), 0.05);
        // Exactly at the threshold: not a retreat
        m.update(ZoneId::NONE, 0.16);
        assert_eq!(m.mode(), Mode::Select);
    }
}
