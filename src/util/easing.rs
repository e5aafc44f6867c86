//! Easing functions for camera tweens.
//!
//! All curves map `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.

use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Circular ease-out: `sqrt(1 - (t - 1)²)`. Very fast start, long
    /// settle.
    CircularOut,
    /// Quintic ease-out: `1 - (1 - t)⁵`.
    QuinticOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First control point.
        c1: f64,
        /// Second control point.
        c2: f64,
    },
}

impl EasingFunction {
    /// Default easing for camera moves.
    pub const DEFAULT: EasingFunction = EasingFunction::CircularOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::CircularOut => {
                let tm1 = t - 1.0;
                (1.0 - tm1 * tm1).sqrt()
            }
            EasingFunction::QuinticOut => 1.0 - (1.0 - t).powi(5),
            EasingFunction::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
