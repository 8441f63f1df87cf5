//! Touch arbitration and the Select/Manipulate mode machine.
//!
//! - [`TouchArbiter`] - Resolves many independently-reporting contact
//!   zones down to exactly one active selection, with force-release of the
//!   previous holder, an optional switch cooldown, and re-entrant-safe
//!   contact counting per zone
//! - [`ModeMachine`] - The two-state interaction mode with
//!   close-then-retreat hysteresis
//!
//! Both are explicit context structs advanced once per tick from the
//! single simulation thread; contact events arrive as an ordered, buffered
//! list, never as callbacks. That single-threaded delivery is a documented
//! precondition: no locking happens here.

#![doc(html_root_url = "https://docs.rs/teleop-select/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod arbiter;
mod mode;

pub use arbiter::{ArbiterConfig, TouchArbiter, ZoneState};
pub use mode::{ModeConfig, ModeMachine};
