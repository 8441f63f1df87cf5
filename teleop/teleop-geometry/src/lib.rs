//! Geometry primitives for gripper teleoperation.
//!
//! This crate provides the pure math underneath angle extraction and
//! proximity retargeting:
//!
//! - [`Plane`] - Point + unit-normal planes (palm plane, thumb plane)
//! - [`FingerPolyline`] - A finger's controllable chain as a polyline,
//!   with stable closest-point queries
//! - [`angle`] - Degree-space helpers: wrap-around normalization,
//!   projected angles, inverse-lerp intensity mapping
//!
//! Everything here is stateless value math: no component in this crate
//! owns per-tick state.
//!
//! # Degenerate inputs
//!
//! Geometry never fails at runtime. Zero-length vectors and collinear
//! point triples yield `None` (planes) or `0.0` (angles); callers skip the
//! dependent write and carry on.
//!
//! # Example
//!
//! ```
//! use teleop_geometry::FingerPolyline;
//! use nalgebra::Point3;
//!
//! let chain = FingerPolyline::new(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//! ]);
//!
//! let hit = chain.closest_point(&Point3::new(0.5, 1.0, 0.0));
//! assert_eq!(hit.segment, 0);
//! assert!((hit.distance - 1.0).abs() < 1e-10);
//! ```

#![doc(html_root_url = "https://docs.rs/teleop-geometry/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

pub mod angle;
mod plane;
mod polyline;

pub use plane::Plane;
pub use polyline::{FingerPolyline, PolylineHit};

pub use teleop_types::{Result, TeleopError};
