//! Two-slot damped values.
//!
//! Every damped quantity holds the rendered `value` and the commanded
//! `end`. Input handlers only ever write `end`; the per-frame update blends
//! `value` toward it with [`damping_factor`], then snaps once the two are
//! within epsilon so the rest state is exact.

mod spherical;
mod vector;

pub use spherical::DampedSpherical;
pub use vector::DampedVector3;

/// Frame rate the damping constants are tuned for.
pub const TARGET_FPS: f64 = 30.0;

/// Per-frame blend factor for a damping constant tuned at [`TARGET_FPS`].
///
/// Frames slower than the target get a proportionally larger factor, faster
/// frames keep the configured one, so the motion takes the same wall-clock
/// time regardless of frame rate. Returns 1 when damping is disabled or the
/// frame time is unusable.
#[must_use]
pub fn damping_factor(damping: f64, delta_time_s: f64, enabled: bool) -> f64 {
    if !enabled || !delta_time_s.is_finite() || delta_time_s <= 0.0 {
        return 1.0;
    }
    let actual_fps = (1.0 / delta_time_s).min(TARGET_FPS);
    (damping * TARGET_FPS / actual_fps).clamp(0.0, 1.0)
}
