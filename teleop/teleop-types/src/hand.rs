//! Per-tick table of tracked joint poses.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{HandJoint, Pose};

/// The per-tick joint → pose table.
///
/// The tracking collaborator refreshes this every tick. Entries may be
/// missing (joint not resolved this tick); consumers degrade to a neutral
/// value rather than failing.
///
/// # Example
///
/// ```
/// use teleop_types::{HandFrame, HandJoint, Pose};
/// use nalgebra::Point3;
///
/// let mut frame = HandFrame::new();
/// frame.set(HandJoint::Wrist, Pose::from_position(Point3::origin()));
/// frame.set(HandJoint::Index0, Pose::from_position(Point3::new(0.0, 1.0, 0.0)));
///
/// assert!(!frame.is_complete());
/// assert_eq!(frame.position(HandJoint::Index0).map(|p| p.y), Some(1.0));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandFrame {
    poses: [Option<Pose>; HandJoint::COUNT],
}

impl HandFrame {
    /// Create an empty frame with no joints resolved.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pose of a joint for this tick.
    pub fn set(&mut self, joint: HandJoint, pose: Pose) {
        self.poses[joint.index()] = Some(pose);
    }

    /// Mark a joint as unresolved this tick.
    pub fn clear(&mut self, joint: HandJoint) {
        self.poses[joint.index()] = None;
    }

    /// Get the pose of a joint, if resolved.
    #[must_use]
    pub fn pose(&self, joint: HandJoint) -> Option<&Pose> {
        self.poses[joint.index()].as_ref()
    }

    /// Get the position of a joint, if resolved.
    #[must_use]
    pub fn position(&self, joint: HandJoint) -> Option<Point3<f64>> {
        self.pose(joint).map(|p| p.position)
    }

    /// Get the local forward axis of a joint in tracking space, if resolved.
    #[must_use]
    pub fn forward(&self, joint: HandJoint) -> Option<Vector3<f64>> {
        self.pose(joint).map(Pose::forward)
    }

    /// Check whether every named joint resolved this tick.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.poses.iter().all(Option::is_some)
    }

    /// Iterate over joints that did not resolve this tick.
    pub fn missing(&self) -> impl Iterator<Item = HandJoint> + '_ {
        HandJoint::ALL
            .into_iter()
            .filter(move |j| self.poses[j.index()].is_none())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame() {
        let frame = HandFrame::new();
        assert!(!frame.is_complete());
        assert_eq!(frame.missing().count(), HandJoint::COUNT);
        assert!(frame.pose(HandJoint::Wrist).is_none());
    }

    #[test]
    fn test_set_and_clear() {
        let mut frame = HandFrame::new();
        frame.set(HandJoint::Thumb0, Pose::identity());
        assert!(frame.pose(HandJoint::Thumb0).is_some());
        assert_eq!(frame.missing().count(), HandJoint::COUNT - 1);

        frame.clear(HandJoint::Thumb0);
        assert!(frame.pose(HandJoint::Thumb0).is_none());
    }

    #[test]
    fn test_complete_frame() {
        let mut frame = HandFrame::new();
        for joint in HandJoint::ALL {
            frame.set(joint, Pose::identity());
        }
        assert!(frame.is_complete());
        assert_eq!(frame.missing().count(), 0);
    }
}
