//! First-person look by tracking the world direction under the cursor.

use glam::{DVec2, DVec3};

use crate::camera::Camera;
use crate::geometry::spherical::shortest_angle;
use crate::geometry::Spherical;

/// Drag helper that turns the view so the direction first seen under the
/// cursor stays under it.
///
/// Each move compares the world-space ray directions through the previous
/// and the current pixel and returns the azimuth/polar change of the
/// camera vector (camera minus look-at point) that maps one onto the
/// other.
#[derive(Debug, Clone, Copy)]
pub struct Rotator {
    last_pixel: DVec2,
}

impl Rotator {
    /// Start tracking at `pixel`.
    #[must_use]
    pub fn new(pixel: DVec2) -> Self {
        Self { last_pixel: pixel }
    }

    /// Pixel of the previous move.
    #[must_use]
    pub fn last_pixel(&self) -> DVec2 {
        self.last_pixel
    }

    /// `(Δtheta, Δphi)` for the camera vector after the cursor moved to
    /// `pixel`. `None` for orthographic cameras, where every ray is
    /// parallel and there is nothing to track.
    pub fn rotate_to(&mut self, camera: &Camera, pixel: DVec2) -> Option<DVec2> {
        let previous = std::mem::replace(&mut self.last_pixel, pixel);
        if !camera.is_perspective() {
            return None;
        }
        let from = camera.ray_through_pixel(previous)?.direction;
        let to = camera.ray_through_pixel(pixel)?.direction;
        Some(angle_delta(from, to))
    }
}

/// Azimuth/polar change of the camera vector that brings the view
/// direction `to` onto `from`.
fn angle_delta(from: DVec3, to: DVec3) -> DVec2 {
    let from = Spherical::from_vector(from);
    let to = Spherical::from_vector(to);
    // The camera vector points against the view, so its polar angle is
    // mirrored while its azimuth is offset by π.
    DVec2::new(shortest_angle(from.theta - to.theta), to.phi - from.phi)
}
