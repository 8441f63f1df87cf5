//! Core types for gripper teleoperation.
//!
//! This crate provides the foundational types shared across the teleop stack:
//!
//! - [`HandJoint`] - Named tracked points of the operator's hand
//! - [`Pose`] - Position + orientation of one tracked point
//! - [`HandFrame`] - The per-tick joint → pose table
//! - [`JointRotation`] - Per-joint target angles in degrees
//! - [`ContactEvent`] - Buffered enter/stay/exit contact events
//! - [`Mode`] - The Select/Manipulate interaction mode
//! - [`TeleopError`] - Setup-time error taxonomy
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no behavior beyond accessors and
//! conversions. They're the common language between:
//!
//! - The tracking source (refreshes [`HandFrame`] every tick)
//! - The collision collaborator (delivers [`ContactEvent`] lists)
//! - The angle extraction and retargeting crates
//! - The motor-command transmitter (consumes target angles)
//!
//! # Units
//!
//! Angles cross every API boundary in **degrees** (the actuator protocol is
//! integer degrees); positions and distances are in tracking units.
//!
//! # Example
//!
//! ```
//! use teleop_types::{HandFrame, HandJoint, Pose};
//! use nalgebra::Point3;
//!
//! let mut frame = HandFrame::new();
//! frame.set(HandJoint::Wrist, Pose::from_position(Point3::origin()));
//!
//! assert!(frame.position(HandJoint::Wrist).is_some());
//! assert!(frame.position(HandJoint::IndexTip).is_none());
//! ```

#![doc(html_root_url = "https://docs.rs/teleop-types/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
// Allow certain clippy lints that are overly pedantic for type definitions
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod contact;
mod error;
mod hand;
mod joint;
mod mode;
mod pose;

pub use contact::{ContactEvent, ContactPhase, TouchFlags, ZoneId};
pub use error::TeleopError;
pub use hand::HandFrame;
pub use joint::{Finger, HandJoint, JointRotation, RotationAxis};
pub use mode::Mode;
pub use pose::Pose;

/// Result type for teleoperation setup operations.
pub type Result<T> = std::result::Result<T, TeleopError>;
