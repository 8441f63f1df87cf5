//! Motor command records.
//!
//! The external transmitter ships a fixed-order, comma-separated record of
//! integer degrees. Every collaborator that serializes targets goes
//! through this one encoder so field order can never drift between them.
//! Transmission itself (serial, wireless) is out of scope.

use teleop_types::HandJoint;

use crate::rig::GripperTargets;

/// Fixed serialization order of the controllable joints.
pub const JOINT_ORDER: [HandJoint; 8] = [
    HandJoint::Thumb0,
    HandJoint::Thumb1,
    HandJoint::Index0,
    HandJoint::Index1,
    HandJoint::Index2,
    HandJoint::Middle0,
    HandJoint::Middle1,
    HandJoint::Middle2,
];

/// A quantized motor command: x, y, z integer degrees per joint, in
/// [`JOINT_ORDER`].
///
/// # Example
///
/// ```
/// use teleop_hand::{GripperTargets, MotorRecord};
/// use teleop_types::{HandJoint, JointRotation};
///
/// let mut targets = GripperTargets::new();
/// targets.set(HandJoint::Thumb0, JointRotation::new(12.4, 0.0, -3.6));
///
/// let record = MotorRecord::from_targets(&targets);
/// assert!(record.encode().starts_with("12,0,-4,"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotorRecord {
    degrees: Vec<i32>,
}

impl MotorRecord {
    /// Quantize a target set into a record.
    ///
    /// Unwritten joints serialize as zeros, so the record length is
    /// always `JOINT_ORDER.len() * 3`.
    #[must_use]
    pub fn from_targets(targets: &GripperTargets) -> Self {
        let mut degrees = Vec::with_capacity(JOINT_ORDER.len() * 3);
        for joint in JOINT_ORDER {
            let rotation = targets.get(joint);
            degrees.push(quantize(rotation.x));
            degrees.push(quantize(rotation.y));
            degrees.push(quantize(rotation.z));
        }
        Self { degrees }
    }

    /// The quantized values, in serialization order.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.degrees
    }

    /// Encode as the transmitter's comma-separated wire record.
    #[must_use]
    pub fn encode(&self) -> String {
        let fields: Vec<String> = self.degrees.iter().map(ToString::to_string).collect();
        fields.join(",")
    }
}

/// Round to the nearest integer degree.
fn quantize(degrees: f64) -> i32 {
    degrees.round() as i32
}
