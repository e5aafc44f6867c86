//! Input handling: event types, keyboard state, click detection and the
//! optional winit translation layer.

/// Click and double-click detection.
pub mod click;
/// Platform-agnostic input events.
pub mod event;
/// Held-key tracking for keyboard navigation.
pub mod keyboard;
/// winit window-event translation.
#[cfg(feature = "viewer")]
pub mod winit_adapter;

pub use click::{ClickDetector, ClickResult};
pub use event::{InputEvent, Modifiers, MouseButton, PointerEvent, PointerKind};
pub use keyboard::Keyboard;
#[cfg(feature = "viewer")]
pub use winit_adapter::WinitInputAdapter;
