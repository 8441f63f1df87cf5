//! Joint-angle extraction from tracked hand poses.
//!
//! Every tick, two planes are refit from tracked reference points:
//!
//! - **Palm plane** from `Wrist`, `PalmIndex`, `PalmRing`
//! - **Thumb plane** from `ThumbMeta`, `Thumb0`, `Index0`
//!
//! Per-joint angles are then derived by comparing joint forward axes
//! against each other (flexion) and against those planes (palm/abduction
//! and lateral angles).
//!
//! # Degradation, not failure
//!
//! A missing joint or a degenerate plane never aborts a tick: the
//! dependent angle reads 0 and a warning is emitted once per joint. This
//! is a documented precondition for the downstream retargeting stage,
//! which treats 0 as "neutral".
//!
//! # Known limitation
//!
//! Flexion is reported as a non-negative magnitude with no sign
//! disambiguation. Joints with a legitimate negative range read the same
//! as their positive mirror. This is intentional and pinned by tests; do
//! not add signed-angle logic here.

#![doc(html_root_url = "https://docs.rs/teleop-kinematics/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod extractor;
mod planes;

pub use extractor::{AngleExtractor, FingerAngles, HandAngles};
pub use planes::HandPlanes;
