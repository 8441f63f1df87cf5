//! Dwell-gated angle snapping.
//!
//! A snap pair watches two live angles on a chosen axis. Once both sit
//! inside their authored windows for the dwell time, the pair forces both
//! angles to authored targets and keeps them there while the inputs stay
//! in range. Configurations are independent; they never interact.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_geometry::angle;
use teleop_types::{Result, RotationAxis, TeleopError};

/// An angular window in degrees, wrap-aware.
///
/// When `min > max` the window wraps through 0° (e.g. 350°–10°). Bounds
/// such as 302°–310° address the unwound band directly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnapWindow {
    /// Lower bound (degrees).
    pub min: f64,
    /// Upper bound (degrees).
    pub max: f64,
}

impl SnapWindow {
    /// Create a window.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether an angle lies inside the window.
    #[must_use]
    pub fn contains(&self, degrees: f64) -> bool {
        angle::in_window_degrees(degrees, self.min, self.max)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Authored configuration of one snap pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnapPairConfig {
    /// Window the first angle must occupy.
    pub window_a: SnapWindow,
    /// Window the second angle must occupy.
    pub window_b: SnapWindow,
    /// Snap target for the first angle (degrees).
    pub snap_a: f64,
    /// Snap target for the second angle (degrees).
    pub snap_b: f64,
    /// The axis both angles are read from.
    pub axis: RotationAxis,
    /// Minimum continuous in-range time before the snap fires (seconds).
    pub dwell: f64,
}

impl Default for SnapPairConfig {
    fn default() -> Self {
        Self {
            window_a: SnapWindow::new(0.0, 0.0),
            window_b: SnapWindow::new(0.0, 0.0),
            snap_a: 0.0,
            snap_b: 0.0,
            axis: RotationAxis::Y,
            dwell: 0.1,
        }
    }
}

impl SnapPairConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::InvalidSnapConfig`] for non-finite windows
    /// or targets, or a negative/non-finite dwell.
    pub fn validate(&self) -> Result<()> {
        if !self.window_a.is_valid() || !self.window_b.is_valid() {
            return Err(TeleopError::invalid_snap("window bounds must be finite"));
        }
        if !self.snap_a.is_finite() || !self.snap_b.is_finite() {
            return Err(TeleopError::invalid_snap("snap targets must be finite"));
        }
        if !self.dwell.is_finite() || self.dwell < 0.0 {
            return Err(TeleopError::invalid_snap(
                "dwell must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// One snap pair with its runtime dwell state.
///
/// An invalid configuration disables the pair at construction (with a
/// warning) rather than failing: a disabled pair never applies.
///
/// # Example
///
/// ```
/// use teleop_retarget::{SnapPair, SnapPairConfig, SnapWindow};
///
/// let mut pair = SnapPair::new(SnapPairConfig {
///     window_a: SnapWindow::new(302.0, 310.0),
///     window_b: SnapWindow::new(50.0, 58.0),
///     snap_a: 306.0,
///     snap_b: 54.0,
///     dwell: 0.1,
///     ..SnapPairConfig::default()
/// });
///
/// // Both angles in range, but the dwell hasn't elapsed yet
/// assert_eq!(pair.update(305.0, 54.0, 0.05), None);
/// // Second tick crosses the dwell threshold
/// assert_eq!(pair.update(305.0, 54.0, 0.05), Some((306.0, 54.0)));
/// ```
#[derive(Debug, Clone)]
pub struct SnapPair {
    config: SnapPairConfig,
    elapsed: f64,
    applied: bool,
    enabled: bool,
}

impl SnapPair {
    /// Create a pair, disabling it if the configuration is malformed.
    #[must_use]
    pub fn new(config: SnapPairConfig) -> Self {
        let enabled = match config.validate() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("snap pair disabled: {err}");
                false
            }
        };
        Self {
            config,
            elapsed: 0.0,
            applied: false,
            enabled,
        }
    }

    /// The authored configuration.
    #[must_use]
    pub const fn config(&self) -> &SnapPairConfig {
        &self.config
    }

    /// Whether the configuration validated at construction.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the snap is currently applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.applied
    }

    /// Time accumulated inside the windows so far (seconds).
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Observe both live angles for one tick.
    ///
    /// Returns the authored snap targets while applied; the caller
    /// overrides its own writes for the affected joints with them.
    /// Leaving either window resets the dwell timer and clears the
    /// applied state immediately.
    pub fn update(&mut self, angle_a: f64, angle_b: f64, dt: f64) -> Option<(f64, f64)> {
        if !self.enabled {
            return None;
        }

        let in_range =
            self.config.window_a.contains(angle_a) && self.config.window_b.contains(angle_b);
        if !in_range {
            self.elapsed = 0.0;
            self.applied = false;
            return None;
        }

        self.elapsed += dt;
        if self.elapsed >= self.config.dwell {
            self.applied = true;
        }
        self.applied
            .then_some((self.config.snap_a, self.config.snap_b))
    }

    /// Cancel an applied snap (force-feed cancellation path).
    ///
    /// Clears the applied state and the dwell timer; the pair re-arms
    /// from zero if the angles remain in range.
    pub fn cancel(&mut self) {
        self.applied = false;
        self.elapsed = 0.0;
    }
}

/// A set of independent snap pairs.
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    pairs: Vec<SnapPair>,
}

impl SnapEngine {
    /// Create an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from authored configurations.
    #[must_use]
    pub fn from_configs(configs: impl IntoIterator<Item = SnapPairConfig>) -> Self {
        Self {
            pairs: configs.into_iter().map(SnapPair::new).collect(),
        }
    }

    /// Add a pair.
    pub fn push(&mut self, pair: SnapPair) {
        self.pairs.push(pair);
    }

    /// Number of pairs (including disabled ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the engine holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs, in configuration order.
    #[must_use]
    pub fn pairs(&self) -> &[SnapPair] {
        &self.pairs
    }

    /// Mutable access to the pairs, in configuration order.
    pub fn pairs_mut(&mut self) -> &mut [SnapPair] {
        &mut self.pairs
    }

    /// Cancel every applied snap (force-feed cancellation).
    pub fn cancel_all(&mut self) {
        for pair in &mut self.pairs {
            pair.cancel();
        }
    }

    /// Per-pair applied flags, in configuration order.
    #[must_use]
    pub fn applied_flags(&self) -> Vec<bool> {
        self.pairs.iter().map(SnapPair::is_applied).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn pair() -> SnapPair {
        SnapPair::new(SnapPairConfig {
            window_a: SnapWindow::new(302.0, 310.0),
            window_b: SnapWindow::new(50.0, 58.0),
            snap_a: 306.0,
            snap_b: 54.0,
            dwell: 0.1,
            ..SnapPairConfig::default()
        })
    }

    #[test]
    fn test_applies_exactly_once_after_dwell() {
        let mut snap = pair();
        let mut applications = 0;

        for _ in 0..5 {
            let was_applied = snap.is_applied();
            let _ = snap.update(305.0, 54.0, 0.04);
            if snap.is_applied() && !was_applied {
                applications += 1;
            }
        }

        assert_eq!(applications, 1);
        assert!(snap.is_applied());
    }

    #[test]
    fn test_returns_targets_while_applied() {
        let mut snap = pair();
        assert_eq!(snap.update(305.0, 54.0, 0.2), Some((306.0, 54.0)));
        // Idempotent while in range
        assert_eq!(snap.update(303.0, 57.0, 0.2), Some((306.0, 54.0)));
    }

    #[test]
    fn test_leaving_early_resets_timer() {
        let mut snap = pair();
        assert_eq!(snap.update(305.0, 54.0, 0.06), None);
        // Out of window A before the dwell elapses
        assert_eq!(snap.update(200.0, 54.0, 0.06), None);
        assert_eq!(snap.elapsed(), 0.0);
        // Back in range: the timer starts over
        assert_eq!(snap.update(305.0, 54.0, 0.06), None);
        assert_eq!(snap.update(305.0, 54.0, 0.06), Some((306.0, 54.0)));
    }

    #[test]
    fn test_leaving_while_applied_clears() {
        let mut snap = pair();
        let _ = snap.update(305.0, 54.0, 0.2);
        assert!(snap.is_applied());

        assert_eq!(snap.update(305.0, 100.0, 0.01), None);
        assert!(!snap.is_applied());
        assert_eq!(snap.elapsed(), 0.0);
    }

    #[test]
    fn test_both_windows_required() {
        let mut snap = pair();
        // Only one angle in range never accumulates
        assert_eq!(snap.update(305.0, 0.0, 1.0), None);
        assert_eq!(snap.update(0.0, 54.0, 1.0), None);
        assert!(!snap.is_applied());
    }

    #[test]
    fn test_unwound_angles_match_wrap_band() {
        let mut snap = pair();
        // -55 degrees normalizes to 305, inside the 302-310 window
        assert_eq!(snap.update(-55.0, 54.0, 0.2), Some((306.0, 54.0)));
    }

    #[test]
    fn test_wrapping_window() {
        let mut snap = SnapPair::new(SnapPairConfig {
            window_a: SnapWindow::new(350.0, 10.0),
            window_b: SnapWindow::new(0.0, 359.0),
            snap_a: 0.0,
            snap_b: 0.0,
            dwell: 0.0,
            ..SnapPairConfig::default()
        });
        assert!(snap.update(5.0, 100.0, 0.01).is_some());
        assert!(snap.update(355.0, 100.0, 0.01).is_some());
        assert!(snap.update(180.0, 100.0, 0.01).is_none());
    }

    #[test]
    fn test_invalid_config_disables() {
        let mut snap = SnapPair::new(SnapPairConfig {
            window_a: SnapWindow::new(f64::NAN, 10.0),
            ..SnapPairConfig::default()
        });
        assert!(!snap.is_enabled());
        assert_eq!(snap.update(0.0, 0.0, 10.0), None);
        assert!(!snap.is_applied());
    }

    #[test]
    fn test_negative_dwell_rejected() {
        let config = SnapPairConfig {
            dwell: -1.0,
            ..SnapPairConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cancel_rearms_from_zero() {
        let mut snap = pair();
        let _ = snap.update(305.0, 54.0, 0.2);
        assert!(snap.is_applied());

        snap.cancel();
        assert!(!snap.is_applied());
        assert_eq!(snap.elapsed(), 0.0);

        // Still in range: dwell accumulates again from scratch
        assert_eq!(snap.update(305.0, 54.0, 0.06), None);
        assert_eq!(snap.update(305.0, 54.0, 0.06), Some((306.0, 54.0)));
    }

    #[test]
    fn test_engine_cancel_all() {
        let mut engine = SnapEngine::from_configs([
            SnapPairConfig {
                window_a: SnapWindow::new(0.0, 20.0),
                window_b: SnapWindow::new(0.0, 20.0),
                dwell: 0.0,
                ..SnapPairConfig::default()
            },
            SnapPairConfig {
                window_a: SnapWindow::new(100.0, 120.0),
                window_b: SnapWindow::new(100.0, 120.0),
                dwell: 0.0,
                ..SnapPairConfig::default()
            },
        ]);

        let _ = engine.pairs_mut()[0].update(10.0, 10.0, 0.01);
        assert_eq!(engine.applied_flags(), vec![true, false]);

        engine.cancel_all();
        assert_eq!(engine.applied_flags(), vec![false, false]);
    }
}
