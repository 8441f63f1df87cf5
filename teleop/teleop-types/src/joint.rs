//! Named hand joints and per-joint rotation targets.
//!
//! The tracked hand resolves to a fixed, known topology: two thumb chain
//! joints, three each for index and middle, a tip per finger, and four
//! reference points used for plane fitting. There is no generic skeleton
//! here; every consumer addresses joints by name.

use nalgebra::UnitQuaternion;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named tracked point of the operator's hand.
///
/// Reference points (`Wrist`, `PalmIndex`, `PalmRing`, `ThumbMeta`) exist
/// only for plane fitting; chain joints and tips carry orientations that
/// drive angle extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandJoint {
    /// Wrist reference point.
    Wrist,
    /// Palm reference point on the index side.
    PalmIndex,
    /// Palm reference point on the ring side.
    PalmRing,
    /// Thumb metacarpal base reference point.
    ThumbMeta,
    /// Proximal thumb joint.
    Thumb0,
    /// Distal thumb joint.
    Thumb1,
    /// Thumb fingertip.
    ThumbTip,
    /// Proximal index joint.
    Index0,
    /// Middle index joint.
    Index1,
    /// Distal index joint.
    Index2,
    /// Index fingertip.
    IndexTip,
    /// Proximal middle-finger joint.
    Middle0,
    /// Middle middle-finger joint.
    Middle1,
    /// Distal middle-finger joint.
    Middle2,
    /// Middle fingertip.
    MiddleTip,
}

impl HandJoint {
    /// Number of named joints.
    pub const COUNT: usize = 15;

    /// All named joints, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Wrist,
        Self::PalmIndex,
        Self::PalmRing,
        Self::ThumbMeta,
        Self::Thumb0,
        Self::Thumb1,
        Self::ThumbTip,
        Self::Index0,
        Self::Index1,
        Self::Index2,
        Self::IndexTip,
        Self::Middle0,
        Self::Middle1,
        Self::Middle2,
        Self::MiddleTip,
    ];

    /// Stable index of this joint, usable for array storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Wrist => 0,
            Self::PalmIndex => 1,
            Self::PalmRing => 2,
            Self::ThumbMeta => 3,
            Self::Thumb0 => 4,
            Self::Thumb1 => 5,
            Self::ThumbTip => 6,
            Self::Index0 => 7,
            Self::Index1 => 8,
            Self::Index2 => 9,
            Self::IndexTip => 10,
            Self::Middle0 => 11,
            Self::Middle1 => 12,
            Self::Middle2 => 13,
            Self::MiddleTip => 14,
        }
    }

    /// Check whether this is a plane-fitting reference point rather than a
    /// chain joint.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Self::Wrist | Self::PalmIndex | Self::PalmRing | Self::ThumbMeta
        )
    }

    /// The finger this joint belongs to, if any.
    #[must_use]
    pub const fn finger(self) -> Option<Finger> {
        match self {
            Self::Thumb0 | Self::Thumb1 | Self::ThumbTip => Some(Finger::Thumb),
            Self::Index0 | Self::Index1 | Self::Index2 | Self::IndexTip => Some(Finger::Index),
            Self::Middle0 | Self::Middle1 | Self::Middle2 | Self::MiddleTip => {
                Some(Finger::Middle)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for HandJoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Wrist => "Wrist",
            Self::PalmIndex => "PalmIndex",
            Self::PalmRing => "PalmRing",
            Self::ThumbMeta => "ThumbMeta",
            Self::Thumb0 => "Thumb0",
            Self::Thumb1 => "Thumb1",
            Self::ThumbTip => "ThumbTip",
            Self::Index0 => "Index0",
            Self::Index1 => "Index1",
            Self::Index2 => "Index2",
            Self::IndexTip => "IndexTip",
            Self::Middle0 => "Middle0",
            Self::Middle1 => "Middle1",
            Self::Middle2 => "Middle2",
            Self::MiddleTip => "MiddleTip",
        };
        write!(f, "{name}")
    }
}

/// One of the three controllable fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Finger {
    /// Thumb: two chain joints.
    Thumb,
    /// Index finger: three chain joints.
    Index,
    /// Middle finger: three chain joints, mirrored sign convention.
    Middle,
}

impl Finger {
    /// Sign convention for lateral/abduction angles.
    ///
    /// The middle finger mirrors the index finger; everything else shares
    /// the index convention.
    #[must_use]
    pub const fn mirror(self) -> f64 {
        match self {
            Self::Middle => -1.0,
            Self::Thumb | Self::Index => 1.0,
        }
    }

    /// Number of chain joints (excluding the tip).
    #[must_use]
    pub const fn joint_count(self) -> usize {
        match self {
            Self::Thumb => 2,
            Self::Index | Self::Middle => 3,
        }
    }

    /// The full tracked chain for this finger, proximal to tip.
    #[must_use]
    pub const fn chain(self) -> &'static [HandJoint] {
        match self {
            Self::Thumb => &[HandJoint::Thumb0, HandJoint::Thumb1, HandJoint::ThumbTip],
            Self::Index => &[
                HandJoint::Index0,
                HandJoint::Index1,
                HandJoint::Index2,
                HandJoint::IndexTip,
            ],
            Self::Middle => &[
                HandJoint::Middle0,
                HandJoint::Middle1,
                HandJoint::Middle2,
                HandJoint::MiddleTip,
            ],
        }
    }

    /// The proximal chain joint.
    #[must_use]
    pub const fn proximal(self) -> HandJoint {
        self.chain()[0]
    }

    /// The fingertip.
    #[must_use]
    pub const fn tip(self) -> HandJoint {
        match self {
            Self::Thumb => HandJoint::ThumbTip,
            Self::Index => HandJoint::IndexTip,
            Self::Middle => HandJoint::MiddleTip,
        }
    }
}

impl std::fmt::Display for Finger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Thumb => write!(f, "thumb"),
            Self::Index => write!(f, "index"),
            Self::Middle => write!(f, "middle"),
        }
    }
}

/// A local rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationAxis {
    /// Primary bend (flexion) axis.
    X,
    /// Abduction axis.
    Y,
    /// Secondary abduction axis.
    Z,
}

impl std::fmt::Display for RotationAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

/// Target rotation of one joint as Euler angles in degrees.
///
/// Written all-or-nothing per joint per tick: a consumer either receives a
/// complete `JointRotation` for a joint or the previous one stands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointRotation {
    /// Rotation about the local X axis (degrees).
    pub x: f64,
    /// Rotation about the local Y axis (degrees).
    pub y: f64,
    /// Rotation about the local Z axis (degrees).
    pub z: f64,
}

impl JointRotation {
    /// The identity rotation.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Create from per-axis degrees.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Extract Euler degrees from a unit quaternion.
    ///
    /// Each angle is reported in `[0°, 360°)`, matching the tracking
    /// host's Euler convention: a joint near its rest pose reads ~359°
    /// rather than ~-1°, and consumers unwind the wrap band themselves.
    #[must_use]
    pub fn from_quaternion(rotation: &UnitQuaternion<f64>) -> Self {
        let (roll, pitch, yaw) = rotation.euler_angles();
        Self {
            x: roll.to_degrees().rem_euclid(360.0),
            y: pitch.to_degrees().rem_euclid(360.0),
            z: yaw.to_degrees().rem_euclid(360.0),
        }
    }

    /// Convert to a unit quaternion.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(
            self.x.to_radians(),
            self.y.to_radians(),
            self.z.to_radians(),
        )
    }

    /// Read the angle on one axis.
    #[must_use]
    pub const fn axis(&self, axis: RotationAxis) -> f64 {
        match axis {
            RotationAxis::X => self.x,
            RotationAxis::Y => self.y,
            RotationAxis::Z => self.z,
        }
    }

    /// Write the angle on one axis, leaving the others untouched.
    pub fn set_axis(&mut self, axis: RotationAxis, degrees: f64) {
        match axis {
            RotationAxis::X => self.x = degrees,
            RotationAxis::Y => self.y = degrees,
            RotationAxis::Z => self.z = degrees,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_joint_indices_are_stable() {
        for (i, joint) in HandJoint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn test_reference_points() {
        assert!(HandJoint::Wrist.is_reference());
        assert!(HandJoint::ThumbMeta.is_reference());
        assert!(!HandJoint::Index0.is_reference());
        assert_eq!(HandJoint::Wrist.finger(), None);
        assert_eq!(HandJoint::MiddleTip.finger(), Some(Finger::Middle));
    }

    #[test]
    fn test_finger_topology() {
        assert_eq!(Finger::Thumb.joint_count(), 2);
        assert_eq!(Finger::Index.joint_count(), 3);
        assert_eq!(Finger::Thumb.chain().len(), 3);
        assert_eq!(Finger::Index.chain().len(), 4);
        assert_eq!(Finger::Index.proximal(), HandJoint::Index0);
        assert_eq!(Finger::Middle.tip(), HandJoint::MiddleTip);
    }

    #[test]
    fn test_mirror_signs() {
        assert_eq!(Finger::Index.mirror(), 1.0);
        assert_eq!(Finger::Middle.mirror(), -1.0);
    }

    #[test]
    fn test_rotation_axis_roundtrip() {
        let mut rot = JointRotation::identity();
        rot.set_axis(RotationAxis::Y, 42.0);
        assert_eq!(rot.axis(RotationAxis::Y), 42.0);
        assert_eq!(rot.axis(RotationAxis::X), 0.0);
        assert_eq!(rot.axis(RotationAxis::Z), 0.0);
    }

    #[test]
    fn test_quaternion_roundtrip() {
        let rot = JointRotation::new(10.0, 20.0, 30.0);
        let back = JointRotation::from_quaternion(&rot.to_quaternion());
        assert_relative_eq!(back.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(back.y, 20.0, epsilon = 1e-9);
        assert_relative_eq!(back.z, 30.0, epsilon = 1e-9);
    }
}
