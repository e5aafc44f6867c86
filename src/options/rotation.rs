use std::f64::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Half a degree per pixel.
const POINTER_ROTATION_SPEED: f64 = PI / 360.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Rotation", inline)]
#[serde(default)]
/// Rotation limits and speeds.
pub struct RotationOptions {
    /// Smallest polar angle (radians from straight up).
    #[schemars(skip)]
    pub min_polar_angle: f64,
    /// Largest polar angle.
    #[schemars(skip)]
    pub max_polar_angle: f64,
    /// Optional `[min, max]` azimuth range in radians. Unlimited when
    /// absent.
    #[schemars(skip)]
    pub azimuth_limits: Option<[f64; 2]>,
    /// Azimuth radians per pixel of horizontal mouse drag.
    #[schemars(
        title = "Mouse Azimuth Speed",
        range(min = 0.001, max = 0.05),
        extend("step" = 0.001)
    )]
    pub pointer_speed_azimuth: f64,
    /// Polar radians per pixel of vertical mouse drag.
    #[schemars(title = "Mouse Polar Speed", range(min = 0.001, max = 0.05), extend("step" = 0.001))]
    pub pointer_speed_polar: f64,
    /// Azimuth radians per pixel of single-finger drag.
    #[schemars(skip)]
    pub touch_speed_azimuth: f64,
    /// Polar radians per pixel of single-finger drag.
    #[schemars(skip)]
    pub touch_speed_polar: f64,
    /// Azimuth radians per frame while an arrow key is held.
    #[schemars(
        title = "Keyboard Azimuth Speed",
        range(min = 0.005, max = 0.2),
        extend("step" = 0.005)
    )]
    pub keyboard_speed_azimuth: f64,
    /// Polar radians per frame while an arrow key is held.
    #[schemars(
        title = "Keyboard Polar Speed",
        range(min = 0.005, max = 0.2),
        extend("step" = 0.005)
    )]
    pub keyboard_speed_polar: f64,
}

impl Default for RotationOptions {
    fn default() -> Self {
        Self {
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            azimuth_limits: None,
            pointer_speed_azimuth: POINTER_ROTATION_SPEED,
            pointer_speed_polar: POINTER_ROTATION_SPEED,
            touch_speed_azimuth: POINTER_ROTATION_SPEED * 2.0,
            touch_speed_polar: POINTER_ROTATION_SPEED * 2.0,
            keyboard_speed_azimuth: POINTER_ROTATION_SPEED * 5.0,
            keyboard_speed_polar: POINTER_ROTATION_SPEED * 5.0,
        }
    }
}

impl RotationOptions {
    /// Clamp an azimuth angle to the configured range.
    #[must_use]
    pub fn legal_azimuth(&self, theta: f64) -> f64 {
        match self.azimuth_limits {
            Some([min, max]) if min <= max => theta.clamp(min, max),
            _ => theta,
        }
    }

    /// Clamp a polar angle to the configured range.
    #[must_use]
    pub fn legal_polar(&self, phi: f64) -> f64 {
        let (min, max) = if self.min_polar_angle <= self.max_polar_angle {
            (self.min_polar_angle, self.max_polar_angle)
        } else {
            (self.max_polar_angle, self.min_polar_angle)
        };
        phi.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azimuth_unlimited_by_default() {
        let opts = RotationOptions::default();
        assert_eq!(opts.legal_azimuth(123.0), 123.0);
    }

    #[test]
    fn limits_clamp() {
        let opts = RotationOptions {
            min_polar_angle: 0.5,
            max_polar_angle: 2.0,
            azimuth_limits: Some([-1.0, 1.0]),
            ..RotationOptions::default()
        };
        assert_eq!(opts.legal_polar(0.0), 0.5);
        assert_eq!(opts.legal_polar(3.0), 2.0);
        assert_eq!(opts.legal_azimuth(-4.0), -1.0);
    }
}
