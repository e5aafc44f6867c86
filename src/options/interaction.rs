use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::modes::MouseActionType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Interaction", inline)]
#[serde(default)]
/// Click actions, picking throttles, animation and automatic adjustments.
pub struct InteractionOptions {
    /// Reaction to a single click.
    #[schemars(title = "Click")]
    pub click_action: MouseActionType,
    /// Reaction to a double click.
    #[schemars(title = "Double Click")]
    pub double_click_action: MouseActionType,
    /// Whether the number keys 1/2/3 switch between first-person, orbit and
    /// orbit-in-center.
    #[schemars(title = "Switch Mode With 1/2/3")]
    pub enable_change_controls_type_on_123_key: bool,
    /// Wheel events closer together than this never trigger a new cursor
    /// pick (milliseconds).
    #[schemars(skip)]
    pub minimum_time_between_raycasts_ms: u64,
    /// After this long without wheel events the cursor is picked again
    /// (milliseconds).
    #[schemars(skip)]
    pub maximum_time_between_raycasts_ms: u64,
    /// Cursor travel (pixels) between wheel events that triggers a new
    /// cursor pick.
    #[schemars(skip)]
    pub mouse_distance_threshold_between_raycasts: f64,
    /// Length of click-triggered camera animations (milliseconds).
    #[schemars(title = "Animation Duration", range(min = 0, max = 3000))]
    pub animation_duration_ms: u64,
    /// Derive near/far planes from the scene bounding box.
    #[schemars(title = "Automatic Near/Far")]
    pub automatic_near_far_plane: bool,
    /// Derive the movement sensitivity from the scene bounding box.
    #[schemars(title = "Automatic Sensitivity")]
    pub automatic_sensitivity: bool,
    /// Base distance unit for keyboard, wheel and pinch movement.
    #[schemars(title = "Sensitivity", range(min = 0.001, max = 100.0))]
    pub sensitivity: f64,
    /// Lower bound for [`sensitivity`](Self::sensitivity).
    #[schemars(skip)]
    pub min_sensitivity: f64,
    /// Upper bound for [`sensitivity`](Self::sensitivity).
    #[schemars(skip)]
    pub max_sensitivity: f64,
    /// Fraction of the bounding-box diagonal used as automatic
    /// sensitivity.
    #[schemars(skip)]
    pub sensitivity_diagonal_fraction: f64,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            click_action: MouseActionType::None,
            double_click_action: MouseActionType::SetTargetAndCameraPosition,
            enable_change_controls_type_on_123_key: true,
            minimum_time_between_raycasts_ms: 200,
            maximum_time_between_raycasts_ms: 1000,
            mouse_distance_threshold_between_raycasts: 5.0,
            animation_duration_ms: 600,
            automatic_near_far_plane: true,
            automatic_sensitivity: true,
            sensitivity: 0.4,
            min_sensitivity: 0.001,
            max_sensitivity: 100.0,
            sensitivity_diagonal_fraction: 0.01,
        }
    }
}

impl InteractionOptions {
    /// Clamp a sensitivity to the configured range.
    #[must_use]
    pub fn legal_sensitivity(&self, sensitivity: f64) -> f64 {
        if !sensitivity.is_finite() {
            return self.sensitivity;
        }
        sensitivity.clamp(
            self.min_sensitivity.min(self.max_sensitivity),
            self.max_sensitivity.max(self.min_sensitivity),
        )
    }

    /// Click animation length.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Lower wheel-pick throttle.
    #[must_use]
    pub fn minimum_time_between_raycasts(&self) -> Duration {
        Duration::from_millis(self.minimum_time_between_raycasts_ms)
    }

    /// Upper wheel-pick throttle.
    #[must_use]
    pub fn maximum_time_between_raycasts(&self) -> Duration {
        Duration::from_millis(self.maximum_time_between_raycasts_ms)
    }
}
