//! Scene raycasting seam.
//!
//! The camera manager never inspects scene geometry itself. It asks a
//! host-supplied [`Picker`] what lies behind a pixel and receives the
//! answer either immediately (CPU raycast) or a few frames later (GPU
//! readback on another thread). Answers are polled once per
//! [`update`](crate::manager::CameraManager::update).

use std::sync::mpsc;

use glam::{DVec2, DVec3};

use crate::geometry::Aabb;

/// One raycast request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickQuery {
    /// Cursor position in pixels (origin top-left).
    pub pixel: DVec2,
    /// Whether the bounding box of the hit object is wanted.
    pub want_bounding_box: bool,
}

/// Raycast answer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PickResult {
    /// World-space hit point, if anything was hit.
    pub intersection_point: Option<DVec3>,
    /// Distance from the camera to the hit point.
    pub distance_to_camera: Option<f64>,
    /// Bounding box of everything in the scene.
    pub models_bounding_box: Aabb,
    /// Bounding box of the object that was hit, when requested.
    pub picked_bounding_box: Option<Aabb>,
}

impl PickResult {
    /// A miss against a scene with the given bounds.
    #[must_use]
    pub fn miss(models_bounding_box: Aabb) -> Self {
        Self {
            models_bounding_box,
            ..Self::default()
        }
    }

    /// A hit at `point`, seen from `camera_position`.
    #[must_use]
    pub fn hit(
        point: DVec3,
        camera_position: DVec3,
        models_bounding_box: Aabb,
    ) -> Self {
        Self {
            intersection_point: Some(point),
            distance_to_camera: Some(point.distance(camera_position)),
            models_bounding_box,
            picked_bounding_box: None,
        }
    }
}

/// State of an outstanding raycast.
#[derive(Debug, Clone, PartialEq)]
pub enum PickPoll {
    /// The answer arrived.
    Ready(PickResult),
    /// Still waiting.
    Pending,
    /// The producer went away without answering.
    Abandoned,
}

/// Sending half handed to whoever computes the answer.
#[derive(Debug, Clone)]
pub struct PickSender {
    tx: mpsc::Sender<PickResult>,
}

impl PickSender {
    /// Deliver the answer. Returns `false` if nobody is waiting anymore.
    pub fn send(self, result: PickResult) -> bool {
        self.tx.send(result).is_ok()
    }
}

/// Receiving half of a raycast.
#[derive(Debug)]
pub struct PendingPick {
    rx: mpsc::Receiver<PickResult>,
}

impl PendingPick {
    /// Already-answered raycast.
    #[must_use]
    pub fn ready(result: PickResult) -> Self {
        let (tx, pending) = Self::channel();
        let _ = tx.send(result);
        pending
    }

    /// Unanswered raycast plus the sender that will answer it.
    #[must_use]
    pub fn channel() -> (PickSender, Self) {
        let (tx, rx) = mpsc::channel();
        (PickSender { tx }, Self { rx })
    }

    /// Non-blocking check for the answer.
    pub fn poll(&self) -> PickPoll {
        match self.rx.try_recv() {
            Ok(result) => PickPoll::Ready(result),
            Err(mpsc::TryRecvError::Empty) => PickPoll::Pending,
            Err(mpsc::TryRecvError::Disconnected) => PickPoll::Abandoned,
        }
    }
}

/// Host-side scene raycaster.
pub trait Picker {
    /// Start a raycast through `query.pixel`.
    fn raycast(&mut self, query: PickQuery) -> PendingPick;
}

impl<F> Picker for F
where
    F: FnMut(PickQuery) -> PickResult,
{
    fn raycast(&mut self, query: PickQuery) -> PendingPick {
        PendingPick::ready(self(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_picker_answers_immediately() {
        let mut picker = |q: PickQuery| {
            PickResult::hit(
                DVec3::new(q.pixel.x, q.pixel.y, 0.0),
                DVec3::new(0.0, 0.0, 10.0),
                Aabb::EMPTY,
            )
        };
        let pending = picker.raycast(PickQuery {
            pixel: DVec2::new(1.0, 2.0),
            want_bounding_box: false,
        });
        let PickPoll::Ready(result) = pending.poll() else {
            panic!("expected ready");
        };
        assert_eq!(result.intersection_point, Some(DVec3::new(1.0, 2.0, 0.0)));
        assert!(result.distance_to_camera.is_some());
    }

    #[test]
    fn deferred_answer_from_another_thread() {
        let (tx, pending) = PendingPick::channel();
        assert_eq!(pending.poll(), PickPoll::Pending);
        let handle = std::thread::spawn(move || {
            tx.send(PickResult::miss(Aabb::EMPTY))
        });
        assert!(handle.join().unwrap());
        assert_eq!(pending.poll(), PickPoll::Ready(PickResult::default()));
    }

    #[test]
    fn dropped_sender_abandons() {
        let (tx, pending) = PendingPick::channel();
        drop(tx);
        assert_eq!(pending.poll(), PickPoll::Abandoned);
    }
}
