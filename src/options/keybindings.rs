use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Camera actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// move_forward = "KeyW"
/// rotate_left = "ArrowLeft"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationAction {
    /// Turn the view left (azimuth up).
    RotateLeft,
    /// Turn the view right.
    RotateRight,
    /// Tilt the view up.
    RotateUp,
    /// Tilt the view down.
    RotateDown,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Rise.
    MoveUp,
    /// Sink.
    MoveDown,
    /// Fly forward.
    MoveForward,
    /// Fly backward.
    MoveBackward,
    /// Switch to first-person controls.
    FirstPersonMode,
    /// Switch to orbit controls.
    OrbitMode,
    /// Switch to orbit-in-center controls.
    OrbitInCenterMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BindingTable", into = "BindingTable")]
/// Configurable keyboard bindings mapping actions to physical key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `MoveForward` → `"KeyW"`).
    pub bindings: HashMap<NavigationAction, String>,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    key_to_action: HashMap<String, NavigationAction>,
}

/// Serialized form of [`KeybindingOptions`]: only the forward map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingTable {
    /// Action → key string.
    pub bindings: HashMap<NavigationAction, String>,
}

impl From<BindingTable> for KeybindingOptions {
    fn from(table: BindingTable) -> Self {
        // Unlisted actions keep their default key.
        let mut opts = Self::default();
        opts.bindings.extend(table.bindings);
        opts.rebuild_reverse_map();
        opts
    }
}

impl From<KeybindingOptions> for BindingTable {
    fn from(opts: KeybindingOptions) -> Self {
        Self {
            bindings: opts.bindings,
        }
    }
}

impl PartialEq for KeybindingOptions {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (NavigationAction::RotateLeft, "ArrowLeft".into()),
            (NavigationAction::RotateRight, "ArrowRight".into()),
            (NavigationAction::RotateUp, "ArrowUp".into()),
            (NavigationAction::RotateDown, "ArrowDown".into()),
            (NavigationAction::MoveLeft, "KeyA".into()),
            (NavigationAction::MoveRight, "KeyD".into()),
            (NavigationAction::MoveUp, "KeyE".into()),
            (NavigationAction::MoveDown, "KeyQ".into()),
            (NavigationAction::MoveForward, "KeyW".into()),
            (NavigationAction::MoveBackward, "KeyS".into()),
            (NavigationAction::FirstPersonMode, "Digit1".into()),
            (NavigationAction::OrbitMode, "Digit2".into()),
            (NavigationAction::OrbitInCenterMode, "Digit3".into()),
        ]);

        let mut opts = Self {
            bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Rebind an action and refresh the reverse map.
    pub fn bind(&mut self, action: NavigationAction, key: impl Into<String>) {
        let _ = self.bindings.insert(action, key.into());
        self.rebuild_reverse_map();
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<NavigationAction> {
        self.key_to_action.get(key).copied()
    }

    /// Key bound to an action, or the empty string when unbound.
    #[must_use]
    pub fn key(&self, action: NavigationAction) -> &str {
        self.bindings.get(&action).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lookup() {
        let opts = KeybindingOptions::default();
        assert_eq!(opts.lookup("KeyW"), Some(NavigationAction::MoveForward));
        assert_eq!(opts.lookup("Digit3"), Some(NavigationAction::OrbitInCenterMode));
        assert_eq!(opts.lookup("KeyZ"), None);
        assert_eq!(opts.key(NavigationAction::RotateLeft), "ArrowLeft");
    }

    #[test]
    fn rebinding_updates_lookup() {
        let mut opts = KeybindingOptions::default();
        opts.bind(NavigationAction::MoveForward, "KeyZ");
        assert_eq!(opts.lookup("KeyZ"), Some(NavigationAction::MoveForward));
        assert_eq!(opts.lookup("KeyW"), None);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let opts: KeybindingOptions = toml::from_str(
            r#"
[bindings]
move_up = "Space"
"#,
        )
        .unwrap();
        assert_eq!(opts.lookup("Space"), Some(NavigationAction::MoveUp));
        assert_eq!(opts.lookup("KeyW"), Some(NavigationAction::MoveForward));
    }
}
