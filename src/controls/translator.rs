//! Grab-and-drag panning that keeps a picked point under the cursor.

use glam::{DVec2, DVec3};

use crate::camera::Camera;
use crate::geometry::Plane;

/// Drag helper gluing a world-space anchor to the cursor.
///
/// The anchor lies on a plane facing the camera. On every move the cursor
/// ray is intersected with that plane; moving the camera by
/// `anchor - hit` puts the anchor back under the cursor exactly, since
/// both points lie on the plane and a pure translation keeps ray
/// directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translator {
    anchor: DVec3,
    plane: Plane,
}

impl Translator {
    /// Anchor at `anchor` on the plane with normal `look_direction`.
    /// `None` for a zero or non-finite normal or anchor.
    #[must_use]
    pub fn new(anchor: DVec3, look_direction: DVec3) -> Option<Self> {
        if !anchor.is_finite() || !look_direction.is_finite() {
            return None;
        }
        let plane = Plane::from_normal_and_point(look_direction, anchor);
        (!plane.is_degenerate()).then_some(Self { anchor, plane })
    }

    /// The glued world point.
    #[must_use]
    pub fn anchor(&self) -> DVec3 {
        self.anchor
    }

    /// Camera translation that brings the anchor under `pixel`, or `None`
    /// when the cursor ray misses the plane.
    #[must_use]
    pub fn translation_for(&self, camera: &Camera, pixel: DVec2) -> Option<DVec3> {
        let hit = camera.ray_through_pixel(pixel)?.intersect_plane(&self.plane)?;
        let delta = self.anchor - hit;
        delta.is_finite().then_some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0);
        camera.set_viewport(600.0, 600.0);
        camera.position = DVec3::new(0.0, 0.0, 5.0);
        camera.look_at(DVec3::ZERO);
        camera
    }

    #[test]
    fn anchor_follows_cursor() {
        let mut camera = camera();
        let anchor = DVec3::new(0.3, -0.2, 0.0);
        let start = camera.project_to_pixel(anchor).unwrap();
        let translator = Translator::new(anchor, camera.forward()).unwrap();

        let cursor = start + DVec2::new(57.0, -31.0);
        let delta = translator.translation_for(&camera, cursor).unwrap();
        camera.position += delta;

        let now = camera.project_to_pixel(anchor).unwrap();
        assert!(now.distance(cursor) < 1e-6);
    }

    #[test]
    fn no_motion_without_cursor_motion() {
        let camera = camera();
        let translator = Translator::new(DVec3::ZERO, camera.forward()).unwrap();
        let delta = translator
            .translation_for(&camera, DVec2::new(300.0, 300.0))
            .unwrap();
        assert!(delta.length() < 1e-9);
    }

    #[test]
    fn plane_behind_camera_misses() {
        let camera = camera();
        let translator =
            Translator::new(DVec3::new(0.0, 0.0, 10.0), camera.forward()).unwrap();
        assert!(translator
            .translation_for(&camera, DVec2::new(300.0, 300.0))
            .is_none());
    }

    #[test]
    fn degenerate_normal_rejected() {
        assert!(Translator::new(DVec3::ZERO, DVec3::ZERO).is_none());
    }
}
