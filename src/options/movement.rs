use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Movement", inline)]
#[serde(default)]
/// Pan, dolly and keyboard-flight speeds.
pub struct MovementOptions {
    /// Mouse pan speed multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 4.0), extend("step" = 0.05))]
    pub mouse_pan_speed: f64,
    /// Mouse dolly speed multiplier (shift/middle drag).
    #[schemars(title = "Dolly Speed", range(min = 0.1, max = 4.0), extend("step" = 0.05))]
    pub mouse_dolly_speed: f64,
    /// Whether WASD/QE and the arrow keys move the camera.
    #[schemars(title = "Keyboard Navigation")]
    pub enable_keyboard_navigation: bool,
    /// Sideways/vertical keyboard speed, in sensitivity units per frame.
    #[schemars(title = "Keyboard Pan Speed", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub keyboard_pan_speed: f64,
    /// Forward/backward keyboard speed, in sensitivity units per frame.
    #[schemars(title = "Keyboard Dolly Speed", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub keyboard_dolly_speed: f64,
    /// Keyboard speed multiplier while shift is held.
    #[schemars(title = "Fast Move Factor", range(min = 1.0, max = 20.0), extend("step" = 0.5))]
    pub keyboard_fast_move_factor: f64,
    /// Pinch midpoint pan speed multiplier.
    #[schemars(skip)]
    pub pinch_pan_speed: f64,
    /// Pinch midpoint drift (pixels) ignored as jitter.
    #[schemars(skip)]
    pub pinch_epsilon: f64,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self {
            mouse_pan_speed: 1.0,
            mouse_dolly_speed: 1.0,
            enable_keyboard_navigation: true,
            keyboard_pan_speed: 1.0,
            keyboard_dolly_speed: 1.0,
            keyboard_fast_move_factor: 5.0,
            pinch_pan_speed: 1.0,
            pinch_epsilon: 2.0,
        }
    }
}
