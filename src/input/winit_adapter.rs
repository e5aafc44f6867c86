//! Translation from winit window events.

use glam::DVec2;
use winit::event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::event::{InputEvent, Modifiers, MouseButton, PointerEvent, PointerKind};

/// Pixels per wheel line for trackpads that report pixel deltas.
const PIXELS_PER_LINE: f64 = 40.0;

/// Converts winit [`WindowEvent`]s into [`InputEvent`]s.
///
/// Owns the little state winit spreads across events: the last cursor
/// position, the held mouse button and the modifier keys.
#[derive(Debug)]
pub struct WinitInputAdapter {
    cursor: DVec2,
    modifiers: Modifiers,
    held_button: Option<MouseButton>,
}

impl Default for WinitInputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitInputAdapter {
    /// Adapter with the cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: DVec2::ZERO,
            modifiers: Modifiers::default(),
            held_button: None,
        }
    }

    fn mouse_event(&self, button: MouseButton) -> PointerEvent {
        PointerEvent {
            id: 0,
            kind: PointerKind::Mouse,
            button,
            position: self.cursor,
            modifiers: self.modifiers,
        }
    }

    /// Translate one window event. Returns `None` for events the camera does
    /// not care about.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = DVec2::new(position.x, position.y);
                let button = self.held_button.unwrap_or(MouseButton::Left);
                Some(InputEvent::PointerMove(self.mouse_event(button)))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                match state {
                    ElementState::Pressed => {
                        self.held_button = Some(button);
                        Some(InputEvent::PointerDown(self.mouse_event(button)))
                    }
                    ElementState::Released => {
                        self.held_button = None;
                        Some(InputEvent::PointerUp(self.mouse_event(button)))
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(*y),
                    MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_LINE,
                };
                // winit reports positive for scrolling away from the user.
                Some(InputEvent::Wheel {
                    position: self.cursor,
                    delta: -lines,
                })
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    ctrl: state.control_key(),
                    alt: state.alt_key(),
                };
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return None;
                };
                let code = format!("{code:?}");
                Some(match event.state {
                    ElementState::Pressed => InputEvent::KeyDown { code },
                    ElementState::Released => InputEvent::KeyUp { code },
                })
            }
            WindowEvent::Focused(true) => Some(InputEvent::FocusGained),
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            WindowEvent::Touch(touch) => {
                let pointer = PointerEvent {
                    id: touch.id,
                    kind: PointerKind::Touch,
                    button: MouseButton::Left,
                    position: DVec2::new(touch.location.x, touch.location.y),
                    modifiers: self.modifiers,
                };
                Some(match touch.phase {
                    TouchPhase::Started => InputEvent::PointerDown(pointer),
                    TouchPhase::Moved => InputEvent::PointerMove(pointer),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        InputEvent::PointerUp(pointer)
                    }
                })
            }
            _ => None,
        }
    }
}
