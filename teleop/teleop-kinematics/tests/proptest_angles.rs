//! Property-based tests for angle extraction.
//!
//! These tests generate random joint orientations and verify the extractor's
//! invariants hold everywhere, not just at hand-picked poses.
//!
//! Run with: cargo test -p teleop-kinematics -- proptest

use nalgebra::{Point3, UnitQuaternion};
use proptest::prelude::*;
use teleop_kinematics::AngleExtractor;
use teleop_types::{HandFrame, HandJoint, Pose};

// =============================================================================
// Strategies for generating random poses
// =============================================================================

/// Generate random Euler angles covering several full turns.
fn arb_euler() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-720.0..720.0f64)
}

/// Generate a random pose at the origin with an arbitrary orientation.
fn arb_pose() -> impl Strategy<Value = Pose> {
    arb_euler().prop_map(|[r, p, y]| {
        Pose::from_position_rotation(
            Point3::origin(),
            UnitQuaternion::from_euler_angles(r.to_radians(), p.to_radians(), y.to_radians()),
        )
    })
}

/// Generate a frame where every named joint has a random orientation.
fn arb_full_frame() -> impl Strategy<Value = HandFrame> {
    prop::collection::vec(arb_pose(), HandJoint::COUNT).prop_map(|poses| {
        let mut frame = HandFrame::new();
        for (joint, pose) in HandJoint::ALL.into_iter().zip(poses) {
            frame.set(joint, pose);
        }
        frame
    })
}

proptest! {
    /// Flexion is a magnitude: never negative, never above 180 degrees,
    /// for any pair of joint orientations.
    #[test]
    fn flexion_is_nonnegative(child in arb_pose(), parent in arb_pose()) {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Index0, parent);
        frame.set(HandJoint::Index1, child);

        let mut extractor = AngleExtractor::new();
        let flexion = extractor.flexion(&frame, HandJoint::Index1, HandJoint::Index0);

        prop_assert!(flexion >= 0.0, "flexion {} < 0", flexion);
        prop_assert!(flexion <= 180.0 + 1e-9, "flexion {} > 180", flexion);
    }

    /// A full extraction over random orientations keeps every flexion slot
    /// non-negative and finite.
    #[test]
    fn extract_keeps_all_flexion_nonnegative(frame in arb_full_frame()) {
        let mut extractor = AngleExtractor::new();
        let angles = extractor.extract(&frame);

        for finger in [angles.thumb, angles.index, angles.middle] {
            for flexion in finger.flexion {
                prop_assert!(flexion >= 0.0);
                prop_assert!(flexion.is_finite());
            }
            prop_assert!(finger.palm >= 0.0);
            prop_assert!(finger.lateral >= 0.0);
        }
    }

    /// Flexion is symmetric in its arguments: the child/parent angle equals
    /// the parent/child angle.
    #[test]
    fn flexion_is_symmetric(a in arb_pose(), b in arb_pose()) {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Index0, a);
        frame.set(HandJoint::Index1, b);

        let mut extractor = AngleExtractor::new();
        let forward = extractor.flexion(&frame, HandJoint::Index1, HandJoint::Index0);
        let backward = extractor.flexion(&frame, HandJoint::Index0, HandJoint::Index1);

        prop_assert!((forward - backward).abs() < 1e-9);
    }
}
