//! Animated camera transitions.

mod tween;

pub use tween::{PoseFrame, PoseTween, TweenKind};
