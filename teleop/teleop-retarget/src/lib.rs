//! Retargeting from tracked-hand measurements to gripper joint targets.
//!
//! Three independent mechanisms live here:
//!
//! - [`AbductionController`] - Per-finger blend of a contact-driven manual
//!   override and a spread-distance-driven interpolation, producing the
//!   proximal joint's Y/Z rotations
//! - [`ProximityRetargeter`] - Fingertip-to-polyline proximity mapped to a
//!   normalized actuation intensity, plus the offset mode that re-anchors
//!   a tracking reference point through recorded touch-time positions
//! - [`SnapPair`] / [`SnapEngine`] - Dwell-gated stabilization of angle
//!   pairs into authored snap targets
//!
//! One parametrized [`AbductionController`] covers both the index and
//! middle fingers; the middle finger differs only by the sign convention
//! carried on [`teleop_types::Finger::mirror`].

#![doc(html_root_url = "https://docs.rs/teleop-retarget/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod abduction;
mod proximity;
mod snap;

pub use abduction::{AbductionConfig, AbductionController, AbductionInput, FingerJointTargets};
pub use proximity::{ProximityConfig, ProximityReading, ProximityRetargeter};
pub use snap::{SnapEngine, SnapPair, SnapPairConfig, SnapWindow};
