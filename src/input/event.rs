use glam::DVec2;

/// Platform-agnostic input events.
///
/// Hosts translate their window-system events into these and feed them to
/// [`CameraManager::handle_event`](crate::manager::CameraManager::handle_event).
/// With the `viewer` feature, [`WinitInputAdapter`](super::WinitInputAdapter)
/// does the translation for winit.
///
/// # Example
///
/// ```ignore
/// let consumed = manager.handle_event(&InputEvent::Wheel {
///     position: DVec2::new(400.0, 300.0),
///     delta: -1.0,
/// });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer (mouse button, finger, pen) went down.
    PointerDown(PointerEvent),
    /// A pointer moved, pressed or not.
    PointerMove(PointerEvent),
    /// A pointer was released or cancelled.
    PointerUp(PointerEvent),
    /// Scroll wheel.
    Wheel {
        /// Cursor position in physical pixels.
        position: DVec2,
        /// Scroll amount in wheel lines (positive = toward the user, zoom
        /// out).
        delta: f64,
    },
    /// Context menu request (right click). Always consumed.
    ContextMenu,
    /// A key went down. `code` is a physical key code such as `"KeyW"`,
    /// `"ArrowLeft"` or `"ShiftLeft"`.
    KeyDown {
        /// Physical key code.
        code: String,
    },
    /// A key was released.
    KeyUp {
        /// Physical key code.
        code: String,
    },
    /// The viewport gained keyboard focus.
    FocusGained,
    /// The viewport lost keyboard focus.
    FocusLost,
}

/// Pointer state carried by pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Stable identifier for the pointer (touch id, 0 for the mouse).
    pub id: u64,
    /// Device class.
    pub kind: PointerKind,
    /// Button that changed (down/up) or is held (move).
    pub button: MouseButton,
    /// Position in physical pixels, origin top-left.
    pub position: DVec2,
    /// Modifier keys held at the time of the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Left-button mouse event at `position` with no modifiers.
    #[must_use]
    pub fn mouse(button: MouseButton, position: DVec2) -> Self {
        Self {
            id: 0,
            kind: PointerKind::Mouse,
            button,
            position,
            modifiers: Modifiers::default(),
        }
    }

    /// Touch event for finger `id` at `position`.
    #[must_use]
    pub fn touch(id: u64, position: DVec2) -> Self {
        Self {
            id,
            kind: PointerKind::Touch,
            button: MouseButton::Left,
            position,
            modifiers: Modifiers::default(),
        }
    }

    /// Same event with the given modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Pointer device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse or trackpad.
    Mouse,
    /// Finger on a touch screen.
    Touch,
    /// Stylus. Handled like a mouse.
    Pen,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

/// Modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub ctrl: bool,
    /// Alt held.
    pub alt: bool,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}
