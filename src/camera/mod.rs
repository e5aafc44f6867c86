//! Camera object and pose helpers.
//!
//! [`Camera`] is the live transform and projection the controls write every
//! frame. [`helper`] holds the pure functions that derive near/far planes,
//! fitted poses and animation parameters from it.

/// Core camera struct: pose, projection and pixel/ray conversion.
pub mod core;
/// Near/far derivation, bounding-box fitting and rotation/target conversion.
pub mod helper;

pub use self::core::{Camera, ProjectionKind};
