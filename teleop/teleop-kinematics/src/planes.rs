//! Per-tick palm and thumb plane derivation.

use teleop_geometry::Plane;
use teleop_types::{Finger, HandFrame, HandJoint};

/// The two reference planes refit from tracked points every tick.
///
/// Either plane is `None` when its reference points are missing or
/// collinear this tick; dependent angles degrade to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandPlanes {
    /// Plane spanned by the palm: wrist toward the index- and ring-side
    /// palm reference points.
    pub palm: Option<Plane>,
    /// Plane spanned from the thumb metacarpal toward the proximal thumb
    /// and proximal index joints.
    pub thumb: Option<Plane>,
}

impl HandPlanes {
    /// Derive both planes from this tick's frame.
    #[must_use]
    pub fn derive(frame: &HandFrame) -> Self {
        let palm = match (
            frame.position(HandJoint::Wrist),
            frame.position(HandJoint::PalmIndex),
            frame.position(HandJoint::PalmRing),
        ) {
            (Some(wrist), Some(palm_index), Some(palm_ring)) => {
                Plane::from_spanning(wrist, palm_index, palm_ring)
            }
            _ => None,
        };

        let thumb = match (
            frame.position(HandJoint::ThumbMeta),
            frame.position(HandJoint::Thumb0),
            frame.position(HandJoint::Index0),
        ) {
            (Some(meta), Some(thumb0), Some(index0)) => {
                Plane::from_spanning(meta, thumb0, index0)
            }
            _ => None,
        };

        Self { palm, thumb }
    }

    /// The plane a given finger's palm angle is measured against.
    ///
    /// The thumb measures against the thumb plane; index and middle
    /// against the palm plane.
    #[must_use]
    pub fn for_finger(&self, finger: Finger) -> Option<Plane> {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index | Finger::Middle => self.palm,
        }
    }
}
