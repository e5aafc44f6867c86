//! Time-parameterised camera pose interpolation.
//!
//! Tweens interpolate the *pose* (position and target), not the damped
//! state. Each frame the manager snaps the controls to the sampled pose.

use glam::DVec3;
use web_time::{Duration, Instant};

use crate::util::easing::EasingFunction;

/// What a tween moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// Position and target.
    Pose,
    /// Only the target; the camera stays where it is.
    TargetOnly,
}

/// One sampled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFrame {
    /// Interpolated camera position.
    pub position: DVec3,
    /// Interpolated look-at point.
    pub target: DVec3,
    /// Whether this is the last frame.
    pub finished: bool,
}

/// An eased pose transition in progress.
#[derive(Debug, Clone)]
pub struct PoseTween {
    /// When the tween started.
    pub start_time: Instant,
    /// Total duration.
    pub duration: Duration,
    /// Easing applied to the linear progress.
    pub easing: EasingFunction,
    /// What is being moved.
    pub kind: TweenKind,
    from_position: DVec3,
    to_position: DVec3,
    from_target: DVec3,
    to_target: DVec3,
}

impl PoseTween {
    /// Tween from one pose to another, starting at `start_time`.
    #[must_use]
    pub fn new(
        start_time: Instant,
        duration: Duration,
        from: (DVec3, DVec3),
        to: (DVec3, DVec3),
    ) -> Self {
        Self {
            start_time,
            duration,
            easing: EasingFunction::DEFAULT,
            kind: TweenKind::Pose,
            from_position: from.0,
            to_position: to.0,
            from_target: from.1,
            to_target: to.1,
        }
    }

    /// Tween that only moves the target, keeping `position` fixed.
    #[must_use]
    pub fn target_only(
        start_time: Instant,
        duration: Duration,
        position: DVec3,
        from_target: DVec3,
        to_target: DVec3,
    ) -> Self {
        Self {
            kind: TweenKind::TargetOnly,
            ..Self::new(start_time, duration, (position, from_target), (position, to_target))
        }
    }

    /// Replace the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Final pose `(position, target)`.
    #[must_use]
    pub fn end_pose(&self) -> (DVec3, DVec3) {
        (self.to_position, self.to_target)
    }

    /// Linear progress in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Pose at `now`. The last frame lands exactly on the end pose.
    #[must_use]
    pub fn sample(&self, now: Instant) -> PoseFrame {
        let t = self.progress(now);
        if t >= 1.0 {
            return PoseFrame {
                position: self.to_position,
                target: self.to_target,
                finished: true,
            };
        }
        let eased = self.easing.evaluate(t);
        let position = match self.kind {
            TweenKind::Pose => self.from_position.lerp(self.to_position, eased),
            TweenKind::TargetOnly => self.from_position,
        };
        PoseFrame {
            position,
            target: self.from_target.lerp(self.to_target, eased),
            finished: false,
        }
    }
}
