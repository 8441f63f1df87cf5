//! Per-finger abduction blending.
//!
//! Each controllable finger carries a cached "max rotation" baseline taken
//! from its initial orientation. Every tick, for each abduction axis, the
//! controller either:
//!
//! - integrates a manual override while the fingertip is held in contact
//!   with the hand spread wide, folding the offset back into the baseline,
//! - or interpolates from the baseline toward the abduction extreme as the
//!   index–middle spread closes below the threshold.
//!
//! Distal joints bypass the blend entirely; they're driven straight from
//! the extracted flexion angles.

use nalgebra::UnitQuaternion;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_geometry::angle;
use teleop_kinematics::FingerAngles;
use teleop_types::{Finger, JointRotation, RotationAxis};

/// Tuning for the abduction blend.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AbductionConfig {
    /// Spread distance separating the manual-override regime (above) from
    /// the interpolation regime (below), in tracking units.
    pub spread_threshold: f64,
    /// Spread span over which the interpolation parameter ramps 0 → 1.
    pub spread_span: f64,
    /// Manual override integration rate (degrees per second).
    pub manual_rate: f64,
    /// Manual override clamp (± degrees).
    pub manual_clamp: f64,
    /// Abduction extreme the interpolation pulls toward (degrees, before
    /// the finger's mirror sign is applied).
    pub abduction_extreme: f64,
}

impl Default for AbductionConfig {
    fn default() -> Self {
        Self {
            spread_threshold: 3.5,
            spread_span: 1.6,
            manual_rate: 8.0,
            manual_clamp: 60.0,
            abduction_extreme: 30.0,
        }
    }
}

impl AbductionConfig {
    /// Create a config with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spread threshold.
    #[must_use]
    pub fn with_spread_threshold(mut self, threshold: f64) -> Self {
        self.spread_threshold = threshold;
        self
    }

    /// Set the manual integration rate.
    #[must_use]
    pub fn with_manual_rate(mut self, rate: f64) -> Self {
        self.manual_rate = rate;
        self
    }

    /// Set the manual override clamp.
    #[must_use]
    pub fn with_manual_clamp(mut self, clamp: f64) -> Self {
        self.manual_clamp = clamp;
        self
    }
}

/// Per-tick measurements driving one finger's blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbductionInput {
    /// Whether this finger's tip is in sustained contact.
    pub fingertip_contact: bool,
    /// Measured index–middle spread distance (tracking units).
    pub spread_distance: f64,
    /// Tick delta in seconds.
    pub dt: f64,
}

/// Target rotations for one finger's three-joint chain.
///
/// Each joint's rotation is complete (all three axes) so a consumer can
/// apply it atomically.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FingerJointTargets {
    /// Proximal joint: X from flexion, Y/Z from the abduction blend.
    pub proximal: JointRotation,
    /// Middle joint: driven directly by extracted flexion.
    pub middle: JointRotation,
    /// Distal joint: driven directly by extracted flexion.
    pub distal: JointRotation,
}

/// One finger's abduction state machine.
///
/// Two instances (index, middle) differ only by the mirror sign carried on
/// the [`Finger`]; the state and transitions are shared.
///
/// # Example
///
/// ```
/// use teleop_retarget::{AbductionConfig, AbductionController, AbductionInput};
/// use teleop_kinematics::FingerAngles;
/// use teleop_types::Finger;
/// use nalgebra::UnitQuaternion;
///
/// let mut ctrl = AbductionController::new(
///     Finger::Index,
///     UnitQuaternion::identity(),
///     AbductionConfig::default(),
/// );
///
/// // Hand spread wide, no contact: the baseline passes through unchanged
/// let input = AbductionInput { fingertip_contact: false, spread_distance: 5.0, dt: 0.01 };
/// let targets = ctrl.update(&input, &FingerAngles::default());
/// assert_eq!(targets.proximal.y, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct AbductionController {
    finger: Finger,
    config: AbductionConfig,
    /// Euler baseline of the initial orientation.
    initial: JointRotation,
    /// Cached max-rotation vector, updated by the manual override.
    max_rotation: JointRotation,
    manual_offset_y: f64,
    manual_offset_z: f64,
    mapped: bool,
}

impl AbductionController {
    /// Create a controller for one finger from its initial orientation.
    ///
    /// Starts in mapped mode with no manual offset.
    #[must_use]
    pub fn new(finger: Finger, initial: UnitQuaternion<f64>, config: AbductionConfig) -> Self {
        let initial = JointRotation::from_quaternion(&initial);
        Self {
            finger,
            config,
            initial,
            max_rotation: initial,
            manual_offset_y: 0.0,
            manual_offset_z: 0.0,
            mapped: true,
        }
    }

    /// The finger this controller drives.
    #[must_use]
    pub const fn finger(&self) -> Finger {
        self.finger
    }

    /// Whether the interpolation uses the wrap-normalized baseline
    /// (mapped) or the raw cached value (direct).
    #[must_use]
    pub const fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Toggle between mapped and direct interpolation.
    ///
    /// This is operator-controlled; nothing in the tick path flips it.
    pub fn set_mapped(&mut self, mapped: bool) {
        self.mapped = mapped;
    }

    /// The cached max-rotation vector.
    #[must_use]
    pub const fn max_rotation(&self) -> JointRotation {
        self.max_rotation
    }

    /// Current manual offset on an abduction axis.
    #[must_use]
    pub const fn manual_offset(&self, axis: RotationAxis) -> f64 {
        match axis {
            RotationAxis::Y => self.manual_offset_y,
            RotationAxis::Z => self.manual_offset_z,
            RotationAxis::X => 0.0,
        }
    }

    /// Run one tick of the blend.
    ///
    /// `angles` supplies the extracted flexion chain; the proximal joint's
    /// X axis and both distal joints pass it through untouched.
    #[must_use]
    pub fn update(&mut self, input: &AbductionInput, angles: &FingerAngles) -> FingerJointTargets {
        let mut proximal = JointRotation::new(angles.flexion[0], 0.0, 0.0);
        proximal.set_axis(RotationAxis::Y, self.blend_axis(RotationAxis::Y, input));
        proximal.set_axis(RotationAxis::Z, self.blend_axis(RotationAxis::Z, input));

        FingerJointTargets {
            proximal,
            middle: JointRotation::new(angles.flexion[1], 0.0, 0.0),
            distal: JointRotation::new(angles.flexion[2], 0.0, 0.0),
        }
    }

    /// Reset to the recorded baseline.
    ///
    /// Zeroes the manual offsets, forces mapped mode back on, and
    /// recomputes the cached max-rotation from the stored initial
    /// orientation. Idempotent: calling this every tick is safe.
    pub fn reset(&mut self) {
        self.manual_offset_y = 0.0;
        self.manual_offset_z = 0.0;
        self.mapped = true;
        self.max_rotation = self.initial;
    }

    fn blend_axis(&mut self, axis: RotationAxis, input: &AbductionInput) -> f64 {
        let cached = self.max_rotation.axis(axis);
        let normalized = angle::unwind_degrees(cached);

        if input.fingertip_contact && input.spread_distance > self.config.spread_threshold {
            // Manual override: integrate while held, fold back into the
            // cached baseline against the initial orientation.
            let step = self.finger.mirror() * self.config.manual_rate * input.dt;
            let clamp = self.config.manual_clamp;
            let offset = match axis {
                RotationAxis::Y => &mut self.manual_offset_y,
                RotationAxis::Z => &mut self.manual_offset_z,
                RotationAxis::X => return normalized,
            };
            *offset = (*offset + step).clamp(-clamp, clamp);
            let folded = self.initial.axis(axis) + *offset;
            self.max_rotation.set_axis(axis, folded);
            angle::unwind_degrees(folded)
        } else if input.spread_distance < self.config.spread_threshold {
            // Spread-driven interpolation toward the abduction extreme.
            let t = (self.config.spread_threshold - input.spread_distance) / self.config.spread_span;
            let extreme = self.finger.mirror() * self.config.abduction_extreme;
            let base = if self.mapped { normalized } else { cached };
            angle::lerp_clamped(base, extreme, t)
        } else {
            normalized
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn controller(finger: Finger) -> AbductionController {
        AbductionController::new(finger, UnitQuaternion::identity(), AbductionConfig::default())
    }

    fn idle(spread: f64) -> AbductionInput {
        AbductionInput {
            fingertip_contact: false,
            spread_distance: spread,
            dt: 0.1,
        }
    }

    fn held(spread: f64, dt: f64) -> AbductionInput {
        AbductionInput {
            fingertip_contact: true,
            spread_distance: spread,
            dt,
        }
    }

    #[test]
    fn test_wide_spread_passes_baseline_through() {
        let mut ctrl = controller(Finger::Index);
        let targets = ctrl.update(&idle(5.0), &FingerAngles::default());
        assert_eq!(targets.proximal.y, 0.0);
        assert_eq!(targets.proximal.z, 0.0);
    }

    #[test]
    fn test_manual_override_integrates_and_clamps() {
        let mut ctrl = controller(Finger::Index);
        // 8 deg/s for one second
        let targets = ctrl.update(&held(5.0, 1.0), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, 8.0, epsilon = 1e-9);
        assert_relative_eq!(ctrl.manual_offset(RotationAxis::Y), 8.0, epsilon = 1e-9);

        // Hold long enough to hit the clamp
        for _ in 0..20 {
            let _ = ctrl.update(&held(5.0, 1.0), &FingerAngles::default());
        }
        assert_relative_eq!(ctrl.manual_offset(RotationAxis::Y), 60.0, epsilon = 1e-9);
        let targets = ctrl.update(&held(5.0, 1.0), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_manual_override_mirrors_for_middle() {
        let mut ctrl = controller(Finger::Middle);
        let targets = ctrl.update(&held(5.0, 1.0), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, -8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_contact_no_integration() {
        let mut ctrl = controller(Finger::Index);
        let _ = ctrl.update(&idle(5.0), &FingerAngles::default());
        assert_eq!(ctrl.manual_offset(RotationAxis::Y), 0.0);
    }

    #[test]
    fn test_contact_below_threshold_interpolates_instead() {
        let mut ctrl = controller(Finger::Index);
        // Contact flag set, but spread is below the threshold: the
        // interpolation branch wins and no offset accumulates.
        let targets = ctrl.update(&held(1.9, 1.0), &FingerAngles::default());
        assert_eq!(ctrl.manual_offset(RotationAxis::Y), 0.0);
        // t = (3.5 - 1.9) / 1.6 = 1.0: fully at the extreme
        assert_relative_eq!(targets.proximal.y, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolation_midpoint() {
        let mut ctrl = controller(Finger::Index);
        // t = (3.5 - 2.7) / 1.6 = 0.5
        let targets = ctrl.update(&idle(2.7), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolation_ratio_clamps_past_extreme() {
        let mut ctrl = controller(Finger::Index);
        // Spread of 0.3 gives a raw ratio of 2.0; the lerp parameter clamps
        let targets = ctrl.update(&idle(0.3), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_middle_interpolates_to_mirrored_extreme() {
        let mut ctrl = controller(Finger::Middle);
        let targets = ctrl.update(&idle(1.9), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, -30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mapped_vs_direct_baselines() {
        // Initial orientation with a Y angle in the wrap band: the raw
        // Euler extraction reads 350 degrees, which normalizes to -10.
        let initial = UnitQuaternion::from_euler_angles(0.0, (-10.0f64).to_radians(), 0.0);
        let mut ctrl =
            AbductionController::new(Finger::Index, initial, AbductionConfig::default());
        let cached = ctrl.max_rotation().y;
        let normalized = angle::unwind_degrees(cached);

        // Halfway interpolation from each baseline
        let t = 0.5;
        let expected_mapped = normalized + (30.0 - normalized) * t;
        let expected_direct = cached + (30.0 - cached) * t;

        let targets = ctrl.update(&idle(2.7), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, expected_mapped, epsilon = 1e-6);

        ctrl.set_mapped(false);
        let targets = ctrl.update(&idle(2.7), &FingerAngles::default());
        assert_relative_eq!(targets.proximal.y, expected_direct, epsilon = 1e-6);
    }

    #[test]
    fn test_distal_joints_bypass_blend() {
        let mut ctrl = controller(Finger::Index);
        let angles = FingerAngles {
            flexion: [10.0, 20.0, 30.0],
            ..FingerAngles::default()
        };
        // Even at closed spread, distal joints take extractor flexion
        let targets = ctrl.update(&idle(1.0), &angles);
        assert_eq!(targets.proximal.x, 10.0);
        assert_eq!(targets.middle, JointRotation::new(20.0, 0.0, 0.0));
        assert_eq!(targets.distal, JointRotation::new(30.0, 0.0, 0.0));
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut ctrl = controller(Finger::Index);
        ctrl.set_mapped(false);
        for _ in 0..5 {
            let _ = ctrl.update(&held(5.0, 1.0), &FingerAngles::default());
        }
        assert!(ctrl.manual_offset(RotationAxis::Y) > 0.0);

        ctrl.reset();
        assert!(ctrl.is_mapped());
        assert_eq!(ctrl.manual_offset(RotationAxis::Y), 0.0);
        assert_eq!(ctrl.max_rotation(), JointRotation::identity());

        // One contact-free tick reproduces the recorded baseline exactly
        let targets = ctrl.update(&idle(5.0), &FingerAngles::default());
        assert_eq!(targets.proximal.y, 0.0);
        assert_eq!(targets.proximal.z, 0.0);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut ctrl = controller(Finger::Index);
        let _ = ctrl.update(&held(5.0, 1.0), &FingerAngles::default());
        ctrl.reset();
        let snapshot = ctrl.max_rotation();
        ctrl.reset();
        ctrl.reset();
        assert_eq!(ctrl.max_rotation(), snapshot);
        assert!(ctrl.is_mapped());
    }

    #[test]
    fn test_spread_exactly_at_threshold_holds_baseline() {
        let mut ctrl = controller(Finger::Index);
        let targets = ctrl.update(&held(3.5, 1.0), &FingerAngles::default());
        // Neither branch fires at exactly the threshold
        assert_eq!(targets.proximal.y, 0.0);
        assert_eq!(ctrl.manual_offset(RotationAxis::Y), 0.0);
    }
}
