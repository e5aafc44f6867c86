//! Camera-manager options with TOML preset support.
//!
//! Every tunable of the controls (damping, rotation limits, speeds, zoom
//! behavior, click actions, keybindings) lives here. Options serialize
//! to/from TOML so a host can ship navigation presets next to its scenes.

mod damping;
mod interaction;
mod keybindings;
mod modes;
mod movement;
mod rotation;
mod zoom;

use std::path::Path;

pub use damping::DampingOptions;
pub use interaction::InteractionOptions;
pub use keybindings::{KeybindingOptions, NavigationAction};
pub use modes::{ControlsType, MouseActionType, WheelZoomType};
pub use movement::MovementOptions;
pub use rotation::RotationOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use zoom::ZoomOptions;

use crate::error::CameraError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[zoom]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct CameraManagerOptions {
    /// Initial controls type.
    pub controls_type: ControlsType,
    /// Motion smoothing.
    pub damping: DampingOptions,
    /// Rotation limits and speeds.
    pub rotation: RotationOptions,
    /// Pan, dolly and keyboard-flight speeds.
    pub movement: MovementOptions,
    /// Wheel, pinch and orthographic zoom.
    pub zoom: ZoomOptions,
    /// Clicks, picking throttles, animations and automatic adjustments.
    pub interaction: InteractionOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl CameraManagerOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(CameraManagerOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, CameraError> {
        let content =
            std::fs::read_to_string(path).map_err(CameraError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, CameraError> {
        toml::from_str(content)
            .map_err(|e| CameraError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), CameraError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CameraError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(CameraError::Io)?;
        }
        std::fs::write(path, content).map_err(CameraError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = CameraManagerOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: CameraManagerOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
controls_type = "first_person"

[zoom]
wheel_zoom_type = "past_cursor"
"#;
        let opts = CameraManagerOptions::from_toml(toml_str).unwrap();
        assert_eq!(opts.controls_type, ControlsType::FirstPerson);
        assert_eq!(opts.zoom.wheel_zoom_type, WheelZoomType::PastCursor);
        // Everything else should be default
        assert_eq!(opts.zoom.zoom_fraction, 0.1);
        assert!(opts.damping.enabled);
        assert_eq!(
            opts.keybindings.lookup("KeyW"),
            Some(NavigationAction::MoveForward)
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = CameraManagerOptions::from_toml("controls_type = 3")
            .unwrap_err();
        assert!(matches!(err, CameraError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("flexcam-options-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = CameraManagerOptions::default();
        opts.interaction.sensitivity = 2.5;
        opts.keybindings.bind(NavigationAction::MoveUp, "Space");
        opts.save(&path).unwrap();

        let loaded = CameraManagerOptions::load(&path).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(loaded.keybindings.lookup("Space"), Some(NavigationAction::MoveUp));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CameraManagerOptions::load(Path::new(
            "/definitely/not/here/flexcam.toml",
        ))
        .unwrap_err();
        assert!(matches!(err, CameraError::Io(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(CameraManagerOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("damping"));
        assert!(props.contains_key("rotation"));
        assert!(props.contains_key("zoom"));
        assert!(!props.contains_key("keybindings"));

        let zoom = &props["zoom"]["properties"];
        assert!(zoom.get("zoom_fraction").is_some());
        assert!(zoom.get("dolly_factor").is_none());
    }
}
