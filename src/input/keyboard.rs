use rustc_hash::FxHashSet;

/// Tracks which physical keys are held down.
///
/// Keys are identified by physical key code strings (`"KeyW"`,
/// `"ArrowLeft"`, `"ShiftLeft"`). Losing focus clears every key so nothing
/// sticks while the window is in the background.
#[derive(Debug, Default)]
pub struct Keyboard {
    pressed: FxHashSet<String>,
    disabled: bool,
}

impl Keyboard {
    /// Keyboard with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns whether the key was newly pressed.
    pub fn key_down(&mut self, code: &str) -> bool {
        if self.disabled {
            return false;
        }
        self.pressed.insert(code.to_owned())
    }

    /// Record a key release.
    pub fn key_up(&mut self, code: &str) {
        let _ = self.pressed.remove(code);
    }

    /// Whether `code` is held.
    #[must_use]
    pub fn is_pressed(&self, code: &str) -> bool {
        !self.disabled && self.pressed.contains(code)
    }

    /// Whether any key is held.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        !self.disabled && !self.pressed.is_empty()
    }

    /// `+1` if only `positive` is held, `-1` if only `negative` is held,
    /// `0` otherwise.
    #[must_use]
    pub fn movement_value(&self, negative: &str, positive: &str) -> f64 {
        let pos = f64::from(u8::from(self.is_pressed(positive)));
        let neg = f64::from(u8::from(self.is_pressed(negative)));
        pos - neg
    }

    /// Either shift key held.
    #[must_use]
    pub fn is_shift_pressed(&self) -> bool {
        self.is_pressed("ShiftLeft") || self.is_pressed("ShiftRight")
    }

    /// Either control key held.
    #[must_use]
    pub fn is_ctrl_pressed(&self) -> bool {
        self.is_pressed("ControlLeft") || self.is_pressed("ControlRight")
    }

    /// Forget every held key.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Whether key tracking is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disable (and clear) or re-enable key tracking.
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.clear();
        }
        self.disabled = disabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_value_per_key_pair() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.movement_value("KeyA", "KeyD"), 0.0);
        assert!(kb.key_down("KeyD"));
        assert_eq!(kb.movement_value("KeyA", "KeyD"), 1.0);
        assert!(kb.key_down("KeyA"));
        assert_eq!(kb.movement_value("KeyA", "KeyD"), 0.0);
        kb.key_up("KeyD");
        assert_eq!(kb.movement_value("KeyA", "KeyD"), -1.0);
    }

    #[test]
    fn repeated_key_down_is_not_new() {
        let mut kb = Keyboard::new();
        assert!(kb.key_down("KeyW"));
        assert!(!kb.key_down("KeyW"));
    }

    #[test]
    fn modifiers_from_either_side() {
        let mut kb = Keyboard::new();
        let _ = kb.key_down("ShiftRight");
        let _ = kb.key_down("ControlLeft");
        assert!(kb.is_shift_pressed());
        assert!(kb.is_ctrl_pressed());
    }

    #[test]
    fn disabling_clears_stuck_keys() {
        let mut kb = Keyboard::new();
        let _ = kb.key_down("KeyW");
        kb.set_disabled(true);
        assert!(!kb.any_pressed());
        assert!(!kb.key_down("KeyS"));
        kb.set_disabled(false);
        assert!(!kb.is_pressed("KeyW"));
        assert!(kb.key_down("KeyS"));
    }
}
