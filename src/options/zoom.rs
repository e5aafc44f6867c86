use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::modes::WheelZoomType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Zoom", inline)]
#[serde(default)]
/// Wheel, pinch and orthographic zoom behavior.
pub struct ZoomOptions {
    /// What the wheel zooms toward.
    #[schemars(title = "Wheel Zoom")]
    pub wheel_zoom_type: WheelZoomType,
    /// Wheel step in sensitivity units per wheel line.
    #[schemars(title = "Wheel Speed", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub wheel_dolly_speed: f64,
    /// Fraction of the remaining distance to the cursor point covered per
    /// wheel step.
    #[schemars(title = "Zoom Fraction", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_fraction: f64,
    /// Radius multiplier per wheel line when orbiting in center.
    #[schemars(skip)]
    pub dolly_factor: f64,
    /// Closest the camera may get to the target when orbiting in center.
    #[schemars(skip)]
    pub min_zoom_distance: f64,
    /// Push the target forward instead of stopping at the minimum zoom
    /// distance.
    #[schemars(title = "Dynamic Target")]
    pub dynamic_target: bool,
    /// Relative zoom change per wheel step for orthographic cameras.
    #[schemars(skip)]
    pub orthographic_dolly_factor: f64,
    /// Smallest orthographic zoom.
    #[schemars(skip)]
    pub min_orthographic_zoom: f64,
    /// Largest orthographic zoom.
    #[schemars(skip)]
    pub max_orthographic_zoom: f64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            wheel_zoom_type: WheelZoomType::Auto,
            wheel_dolly_speed: 1.0,
            zoom_fraction: 0.1,
            dolly_factor: 0.95,
            min_zoom_distance: 0.1,
            dynamic_target: true,
            orthographic_dolly_factor: 0.3,
            min_orthographic_zoom: 1e-3,
            max_orthographic_zoom: 1e3,
        }
    }
}

impl ZoomOptions {
    /// Resolve [`WheelZoomType::Auto`] against the availability of a
    /// picker.
    #[must_use]
    pub fn effective_wheel_zoom(&self, has_picker: bool) -> WheelZoomType {
        match self.wheel_zoom_type {
            WheelZoomType::Auto if has_picker => WheelZoomType::ToCursor,
            WheelZoomType::Auto => WheelZoomType::PastCursor,
            other => other,
        }
    }
}
