//! Unified gripper-teleoperation API.
//!
//! This crate re-exports the complete teleoperation stack and owns the
//! per-tick pipeline that composes it:
//!
//! - [`teleop_types`] - Core data types (joints, poses, events, modes)
//! - [`teleop_geometry`] - Planes, polylines, wrap-around angle math
//! - [`teleop_kinematics`] - Joint-angle extraction from tracked poses
//! - [`teleop_retarget`] - Abduction blending, proximity, angle snap
//! - [`teleop_select`] - Touch arbitration and the mode machine
//!
//! # Quick Start
//!
//! ```
//! use teleop_hand::prelude::*;
//! use nalgebra::UnitQuaternion;
//!
//! // Build the pipeline with default tuning
//! let mut rig = TeleopRig::new(
//!     RigConfig::default(),
//!     UnitQuaternion::identity(),
//!     UnitQuaternion::identity(),
//! ).unwrap();
//!
//! // The tracking collaborator refreshes a frame every tick
//! let frame = HandFrame::new();
//! let output = rig.tick(&TickInput {
//!     frame: &frame,
//!     touch: TouchFlags::none(),
//!     events: &[],
//!     spread_distance: 5.0,
//!     proximity_distance: 0.05,
//!     anchor_live: None,
//!     dt: 1.0 / 90.0,
//! });
//!
//! // Quantize for the motor transmitter
//! let record = MotorRecord::from_targets(&output.targets);
//! assert_eq!(record.values().len(), 24);
//! ```
//!
//! # Threading
//!
//! The pipeline runs on a single simulation thread; contact events arrive
//! as a buffered list consumed once per tick. The only cross-thread
//! boundary is the force-sensor feed, handed off through the single-slot
//! [`LatestCell`] mailbox.

#![doc(html_root_url = "https://docs.rs/teleop-hand/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod command;
mod feed;
mod rig;

pub use command::{MotorRecord, JOINT_ORDER};
pub use feed::{ForceFeed, LatestCell};
pub use rig::{GripperTargets, RigConfig, SnapBinding, TeleopRig, TickInput, TickOutput};

// Re-export the stack for single-dependency consumers
pub use teleop_geometry;
pub use teleop_kinematics;
pub use teleop_retarget;
pub use teleop_select;
pub use teleop_types;

/// Commonly used items, importable in one line.
pub mod prelude {
    pub use crate::{
        ForceFeed, GripperTargets, LatestCell, MotorRecord, RigConfig, SnapBinding, TeleopRig,
        TickInput, TickOutput,
    };
    pub use teleop_geometry::{FingerPolyline, Plane, PolylineHit};
    pub use teleop_kinematics::{AngleExtractor, FingerAngles, HandAngles, HandPlanes};
    pub use teleop_retarget::{
        AbductionConfig, AbductionController, AbductionInput, ProximityConfig,
        ProximityRetargeter, SnapEngine, SnapPair, SnapPairConfig, SnapWindow,
    };
    pub use teleop_select::{ArbiterConfig, ModeConfig, ModeMachine, TouchArbiter};
    pub use teleop_types::{
        ContactEvent, ContactPhase, Finger, HandFrame, HandJoint, JointRotation, Mode, Pose,
        RotationAxis, TeleopError, TouchFlags, ZoneId,
    };
}
