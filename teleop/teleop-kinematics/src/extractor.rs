//! Per-joint angle extraction.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use teleop_geometry::angle;
use teleop_types::{Finger, HandFrame, HandJoint};

use crate::HandPlanes;

/// Extracted angles for one finger, in degrees.
///
/// `flexion[i]` is the angle between chain joint `i+1`'s forward axis and
/// chain joint `i`'s forward axis, proximal to tip. The thumb's two-joint
/// chain fills `flexion[0..2]`; the unused slot stays 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FingerAngles {
    /// Consecutive flexion magnitudes along the chain (always ≥ 0).
    pub flexion: [f64; 3],
    /// Out-of-plane angle of the proximal joint's forward axis.
    pub palm: f64,
    /// Signed-magnitude lateral angle of the proximal joint triple,
    /// measured in the palm plane.
    pub lateral: f64,
}

/// Extracted angles for the whole tracked hand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandAngles {
    /// Thumb angles (2 flexion values).
    pub thumb: FingerAngles,
    /// Index-finger angles (3 flexion values).
    pub index: FingerAngles,
    /// Middle-finger angles (3 flexion values).
    pub middle: FingerAngles,
}

impl HandAngles {
    /// Read the angles for one finger.
    #[must_use]
    pub const fn finger(&self, finger: Finger) -> &FingerAngles {
        match finger {
            Finger::Thumb => &self.thumb,
            Finger::Index => &self.index,
            Finger::Middle => &self.middle,
        }
    }
}

/// Derives per-joint flexion and lateral angles from tracked poses.
///
/// Stateless apart from a warn-once latch per joint: a joint missing from
/// the frame logs a single warning, then keeps degrading silently to 0.
///
/// # Example
///
/// ```
/// use teleop_kinematics::AngleExtractor;
/// use teleop_types::HandFrame;
///
/// let mut extractor = AngleExtractor::new();
/// // An empty frame extracts all-zero angles rather than failing.
/// let angles = extractor.extract(&HandFrame::new());
/// assert_eq!(angles.index.flexion, [0.0; 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AngleExtractor {
    warned_missing: [bool; HandJoint::COUNT],
}

impl AngleExtractor {
    /// Create a new extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the full angle set for this tick.
    ///
    /// Never fails: missing joints and degenerate planes yield 0 for the
    /// dependent angles only.
    #[must_use]
    pub fn extract(&mut self, frame: &HandFrame) -> HandAngles {
        let planes = HandPlanes::derive(frame);
        HandAngles {
            thumb: self.finger_angles(frame, &planes, Finger::Thumb),
            index: self.finger_angles(frame, &planes, Finger::Index),
            middle: self.finger_angles(frame, &planes, Finger::Middle),
        }
    }

    /// Flexion magnitude between a child joint and its parent, in degrees.
    ///
    /// The angle between the two local forward axes; always ≥ 0. There is
    /// no sign disambiguation: a joint bent 20° "backward" reads the same
    /// as 20° forward.
    #[must_use]
    pub fn flexion(&mut self, frame: &HandFrame, child: HandJoint, parent: HandJoint) -> f64 {
        match (
            self.forward_or_warn(frame, child),
            self.forward_or_warn(frame, parent),
        ) {
            (Some(child_fwd), Some(parent_fwd)) => angle::between_degrees(&child_fwd, &parent_fwd),
            _ => 0.0,
        }
    }

    /// Out-of-plane angle of a joint's forward axis against the finger's
    /// reference plane.
    #[must_use]
    pub fn palm_angle(&mut self, frame: &HandFrame, planes: &HandPlanes, joint: HandJoint) -> f64 {
        let Some(finger) = joint.finger() else {
            return 0.0;
        };
        let Some(plane) = planes.for_finger(finger) else {
            return 0.0;
        };
        self.forward_or_warn(frame, joint)
            .map_or(0.0, |fwd| plane.elevation_degrees(&fwd))
    }

    /// Lateral angle for a joint triple, measured in the palm plane.
    ///
    /// The angle between (middle − basic) and (target − middle) after
    /// projecting both onto the palm plane; 0 if either projection is
    /// zero-length.
    #[must_use]
    pub fn lateral_angle(
        &mut self,
        frame: &HandFrame,
        planes: &HandPlanes,
        basic: HandJoint,
        middle: HandJoint,
        target: HandJoint,
    ) -> f64 {
        let Some(plane) = planes.palm else {
            return 0.0;
        };
        let (Some(basic_pos), Some(middle_pos), Some(target_pos)) = (
            self.position_or_warn(frame, basic),
            self.position_or_warn(frame, middle),
            self.position_or_warn(frame, target),
        ) else {
            return 0.0;
        };

        let v1 = plane.project_vector(&(middle_pos - basic_pos));
        let v2 = plane.project_vector(&(target_pos - middle_pos));
        angle::between_degrees(&v1, &v2).abs()
    }

    fn finger_angles(
        &mut self,
        frame: &HandFrame,
        planes: &HandPlanes,
        finger: Finger,
    ) -> FingerAngles {
        let chain = finger.chain();

        let mut flexion = [0.0; 3];
        for i in 0..chain.len() - 1 {
            flexion[i] = self.flexion(frame, chain[i + 1], chain[i]);
        }

        let palm = self.palm_angle(frame, planes, finger.proximal());
        let lateral = self.lateral_angle(frame, planes, chain[0], chain[1], chain[2]);

        FingerAngles {
            flexion,
            palm,
            lateral,
        }
    }

    fn forward_or_warn(&mut self, frame: &HandFrame, joint: HandJoint) -> Option<Vector3<f64>> {
        let fwd = frame.forward(joint);
        if fwd.is_none() {
            self.warn_missing(joint);
        }
        fwd
    }

    fn position_or_warn(
        &mut self,
        frame: &HandFrame,
        joint: HandJoint,
    ) -> Option<Point3<f64>> {
        let pos = frame.position(joint);
        if pos.is_none() {
            self.warn_missing(joint);
        }
        pos
    }

    /// Log a missing joint once; after that, degrade silently.
    fn warn_missing(&mut self, joint: HandJoint) {
        let idx = joint.index();
        if !self.warned_missing[idx] {
            self.warned_missing[idx] = true;
            tracing::warn!("tracked joint {joint} missing; dependent angles read 0");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion};
    use teleop_types::Pose;

    fn pose_bent_about_x(degrees: f64) -> Pose {
        Pose::from_position_rotation(
            Point3::origin(),
            UnitQuaternion::from_euler_angles(degrees.to_radians(), 0.0, 0.0),
        )
    }

    #[test]
    fn test_flexion_magnitude() {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Index0, Pose::identity());
        frame.set(HandJoint::Index1, pose_bent_about_x(30.0));

        let mut extractor = AngleExtractor::new();
        let flexion = extractor.flexion(&frame, HandJoint::Index1, HandJoint::Index0);
        assert_relative_eq!(flexion, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flexion_never_negative() {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Index0, Pose::identity());
        // Bent the other way: same magnitude, same sign
        frame.set(HandJoint::Index1, pose_bent_about_x(-30.0));

        let mut extractor = AngleExtractor::new();
        let flexion = extractor.flexion(&frame, HandJoint::Index1, HandJoint::Index0);
        assert_relative_eq!(flexion, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flexion_missing_joint_reads_zero() {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Index0, Pose::identity());

        let mut extractor = AngleExtractor::new();
        let flexion = extractor.flexion(&frame, HandJoint::Index1, HandJoint::Index0);
        assert_eq!(flexion, 0.0);
    }

    #[test]
    fn test_empty_frame_extracts_zeros() {
        let mut extractor = AngleExtractor::new();
        let angles = extractor.extract(&HandFrame::new());
        assert_eq!(angles, HandAngles::default());
    }

    #[test]
    fn test_lateral_angle_in_plane() {
        // Palm plane is XY; a right-angle dogleg in that plane
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Wrist, Pose::from_position(Point3::origin()));
        frame.set(
            HandJoint::PalmIndex,
            Pose::from_position(Point3::new(1.0, 0.0, 0.0)),
        );
        frame.set(
            HandJoint::PalmRing,
            Pose::from_position(Point3::new(0.0, 1.0, 0.0)),
        );
        frame.set(
            HandJoint::Index0,
            Pose::from_position(Point3::new(0.0, 0.0, 0.0)),
        );
        frame.set(
            HandJoint::Index1,
            Pose::from_position(Point3::new(1.0, 0.0, 0.0)),
        );
        frame.set(
            HandJoint::Index2,
            Pose::from_position(Point3::new(1.0, 1.0, 0.0)),
        );

        let planes = HandPlanes::derive(&frame);
        let mut extractor = AngleExtractor::new();
        let lateral = extractor.lateral_angle(
            &frame,
            &planes,
            HandJoint::Index0,
            HandJoint::Index1,
            HandJoint::Index2,
        );
        assert_relative_eq!(lateral, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lateral_angle_degenerate_reads_zero() {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Wrist, Pose::from_position(Point3::origin()));
        frame.set(
            HandJoint::PalmIndex,
            Pose::from_position(Point3::new(1.0, 0.0, 0.0)),
        );
        frame.set(
            HandJoint::PalmRing,
            Pose::from_position(Point3::new(0.0, 1.0, 0.0)),
        );
        // Coincident joints produce a zero-length projected vector
        frame.set(HandJoint::Index0, Pose::from_position(Point3::origin()));
        frame.set(HandJoint::Index1, Pose::from_position(Point3::origin()));
        frame.set(
            HandJoint::Index2,
            Pose::from_position(Point3::new(1.0, 0.0, 0.0)),
        );

        let planes = HandPlanes::derive(&frame);
        let mut extractor = AngleExtractor::new();
        let lateral = extractor.lateral_angle(
            &frame,
            &planes,
            HandJoint::Index0,
            HandJoint::Index1,
            HandJoint::Index2,
        );
        assert_eq!(lateral, 0.0);
    }

    #[test]
    fn test_palm_angle_elevation() {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Wrist, Pose::from_position(Point3::origin()));
        frame.set(
            HandJoint::PalmIndex,
            Pose::from_position(Point3::new(1.0, 0.0, 0.0)),
        );
        frame.set(
            HandJoint::PalmRing,
            Pose::from_position(Point3::new(0.0, 1.0, 0.0)),
        );
        // Identity forward is +Z, exactly along the palm normal: the
        // projection degenerates and the angle reads 0.
        frame.set(HandJoint::Index0, Pose::identity());

        let planes = HandPlanes::derive(&frame);
        let mut extractor = AngleExtractor::new();
        assert_eq!(
            extractor.palm_angle(&frame, &planes, HandJoint::Index0),
            0.0
        );

        // Tilt forward 45 degrees out of plane
        let tilted = Pose::from_position_rotation(
            Point3::origin(),
            UnitQuaternion::from_euler_angles(std::f64::consts::FRAC_PI_4, 0.0, 0.0),
        );
        frame.set(HandJoint::Index0, tilted);
        let angle = extractor.palm_angle(&frame, &planes, HandJoint::Index0);
        assert_relative_eq!(angle, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extract_fills_thumb_two_slots() {
        let mut frame = HandFrame::new();
        for joint in HandJoint::ALL {
            frame.set(joint, Pose::identity());
        }
        frame.set(HandJoint::Thumb1, pose_bent_about_x(20.0));

        let mut extractor = AngleExtractor::new();
        let angles = extractor.extract(&frame);
        // Thumb1 vs Thumb0 and ThumbTip vs Thumb1 both involve the bent joint
        assert_relative_eq!(angles.thumb.flexion[0], 20.0, epsilon = 1e-9);
        assert_relative_eq!(angles.thumb.flexion[1], 20.0, epsilon = 1e-9);
        // Two-joint chain: third slot unused
        assert_eq!(angles.thumb.flexion[2], 0.0);
    }
}
