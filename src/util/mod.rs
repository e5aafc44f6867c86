//! Shared utilities: easing curves and time sources.

pub mod clock;
pub mod easing;
