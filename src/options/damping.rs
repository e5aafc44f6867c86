use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Damping", inline)]
#[serde(default)]
/// Smoothing of camera motion.
pub struct DampingOptions {
    /// Whether motion is damped at all.
    #[schemars(title = "Enable Damping")]
    pub enabled: bool,
    /// Fraction of the remaining distance covered per frame at 30 FPS.
    #[schemars(title = "Damping Factor", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub factor: f64,
    /// Differences below this count as settled.
    #[schemars(skip)]
    pub epsilon: f64,
}

impl Default for DampingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: 0.25,
            epsilon: 0.001,
        }
    }
}
