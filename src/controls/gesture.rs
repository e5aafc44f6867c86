//! Pointer-session bookkeeping: which gesture is active and where the
//! touches are.

use glam::DVec2;

use super::rotator::Rotator;
use super::translator::Translator;
use crate::input::{Modifiers, MouseButton};

/// The single interactive gesture of the current pointer session.
#[derive(Debug, Clone, Copy, Default)]
pub enum Gesture {
    /// No pointer held.
    #[default]
    Idle,
    /// Mouse orbit; deltas accumulate until the next update.
    Rotating { last: DVec2 },
    /// First-person mouse look.
    Looking(Rotator),
    /// Mouse pan, optionally glued to an anchor point.
    Panning {
        last: DVec2,
        translator: Option<Translator>,
        /// Incremented for each pan so late picks for an older pan are
        /// dropped.
        session: u64,
    },
    /// Mouse dolly along the view direction.
    Dollying { last: DVec2 },
    /// Single-finger orbit.
    TouchRotating { id: u64, last: DVec2 },
    /// Two-finger pinch zoom with midpoint pan.
    Pinching {
        initial_distance: f64,
        initial_radius: f64,
        last_midpoint: DVec2,
    },
}

/// What a mouse button press starts, before controls-type specifics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Orbit or look.
    Rotate,
    /// Pan.
    Pan,
    /// Dolly.
    Dolly,
}

impl ButtonAction {
    /// Left rotates, right or ctrl+left pans, shift+left, middle or
    /// ctrl+right dollies.
    #[must_use]
    pub fn for_button(button: MouseButton, modifiers: Modifiers) -> Self {
        match button {
            MouseButton::Left if modifiers.ctrl => Self::Pan,
            MouseButton::Left if modifiers.shift => Self::Dolly,
            MouseButton::Left => Self::Rotate,
            MouseButton::Right if modifiers.ctrl => Self::Dolly,
            MouseButton::Right => Self::Pan,
            MouseButton::Middle => Self::Dolly,
        }
    }
}

/// Positions of the touches currently on the surface, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct TouchCache {
    touches: Vec<(u64, DVec2)>,
}

impl TouchCache {
    /// Add or move a touch. Returns whether the touch is new.
    pub fn insert(&mut self, id: u64, position: DVec2) -> bool {
        if let Some(entry) = self.touches.iter_mut().find(|(i, _)| *i == id) {
            entry.1 = position;
            false
        } else {
            self.touches.push((id, position));
            true
        }
    }

    /// Move an existing touch. Unknown ids are ignored.
    pub fn update(&mut self, id: u64, position: DVec2) -> bool {
        match self.touches.iter_mut().find(|(i, _)| *i == id) {
            Some(entry) => {
                entry.1 = position;
                true
            }
            None => false,
        }
    }

    /// Lift a touch. Returns whether it was down.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.touches.len();
        self.touches.retain(|(i, _)| *i != id);
        self.touches.len() != before
    }

    /// Number of touches down.
    #[must_use]
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    /// Whether no touch is down.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// First touch, if any.
    #[must_use]
    pub fn first(&self) -> Option<(u64, DVec2)> {
        self.touches.first().copied()
    }

    /// Distance and midpoint of the first two touches.
    #[must_use]
    pub fn pinch(&self) -> Option<(f64, DVec2)> {
        match self.touches.as_slice() {
            [(_, a), (_, b), ..] => Some((a.distance(*b), (*a + *b) * 0.5)),
            _ => None,
        }
    }

    /// Forget every touch.
    pub fn clear(&mut self) {
        self.touches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_mapping() {
        let none = Modifiers::default();
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert_eq!(ButtonAction::for_button(MouseButton::Left, none), ButtonAction::Rotate);
        assert_eq!(ButtonAction::for_button(MouseButton::Left, ctrl), ButtonAction::Pan);
        assert_eq!(ButtonAction::for_button(MouseButton::Left, shift), ButtonAction::Dolly);
        assert_eq!(ButtonAction::for_button(MouseButton::Right, none), ButtonAction::Pan);
        assert_eq!(ButtonAction::for_button(MouseButton::Right, ctrl), ButtonAction::Dolly);
        assert_eq!(ButtonAction::for_button(MouseButton::Middle, none), ButtonAction::Dolly);
    }

    #[test]
    fn pinch_geometry() {
        let mut cache = TouchCache::default();
        assert!(cache.insert(1, DVec2::new(0.0, 0.0)));
        assert!(cache.pinch().is_none());
        assert!(cache.insert(2, DVec2::new(6.0, 8.0)));
        assert!(!cache.insert(2, DVec2::new(6.0, 8.0)));
        let (distance, mid) = cache.pinch().unwrap();
        assert_eq!(distance, 10.0);
        assert_eq!(mid, DVec2::new(3.0, 4.0));
        assert!(cache.remove(1));
        assert_eq!(cache.first(), Some((2, DVec2::new(6.0, 8.0))));
        assert!(!cache.update(7, DVec2::ZERO));
    }
}
