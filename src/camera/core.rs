use glam::{DMat4, DQuat, DVec2, DVec3};

use crate::geometry::{self, Ray};

/// Projection model of a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    /// Perspective projection with a vertical field of view.
    Perspective,
    /// Orthographic projection with a fixed visible height.
    Orthographic,
}

/// Camera defined by a world-space pose and projection parameters.
///
/// The camera looks along its local -Z axis with local +Y up, so an
/// identity rotation looks down -Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: DVec3,
    /// World-from-camera rotation.
    pub rotation: DQuat,
    /// World up direction used by [`look_at`](Self::look_at).
    pub up: DVec3,
    /// Projection model.
    pub projection: ProjectionKind,
    /// Vertical field of view in degrees (perspective only).
    pub fov: f64,
    /// Viewport aspect ratio (width / height).
    pub aspect: f64,
    /// Near clipping plane distance.
    pub near: f64,
    /// Far clipping plane distance.
    pub far: f64,
    /// Zoom multiplier (orthographic only).
    pub zoom: f64,
    /// Visible world-space height at zoom 1 (orthographic only).
    pub ortho_height: f64,
    /// Viewport size in pixels.
    pub viewport: DVec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0, 0.1, 10_000.0)
    }
}

impl Camera {
    /// Perspective camera at the origin looking down -Z.
    #[must_use]
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            up: DVec3::Y,
            projection: ProjectionKind::Perspective,
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
            ortho_height: 10.0,
            viewport: DVec2::new(720.0 * aspect, 720.0),
        }
    }

    /// Orthographic camera showing `height` world units vertically.
    #[must_use]
    pub fn orthographic(height: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            projection: ProjectionKind::Orthographic,
            ortho_height: height,
            ..Self::perspective(60.0, aspect, near, far)
        }
    }

    /// Whether the camera uses a perspective projection.
    #[must_use]
    pub fn is_perspective(&self) -> bool {
        self.projection == ProjectionKind::Perspective
    }

    /// Half of the vertical field of view, in radians.
    #[must_use]
    pub fn half_fov_radians(&self) -> f64 {
        self.fov.to_radians() * 0.5
    }

    /// Update the viewport size and derived aspect ratio. Zero heights are
    /// ignored.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.viewport = DVec2::new(width, height);
            self.aspect = width / height;
        }
    }

    /// Orient the camera toward `target`. A target at the eye leaves the
    /// rotation unchanged.
    pub fn look_at(&mut self, target: DVec3) {
        if let Some(rotation) = geometry::look_rotation(target - self.position, self.up) {
            self.rotation = rotation;
        }
    }

    /// World-space look direction.
    #[must_use]
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// World-space camera right axis (local +X).
    #[must_use]
    pub fn right(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// World-space camera up axis (local +Y).
    #[must_use]
    pub fn local_up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    /// World-to-camera matrix.
    #[must_use]
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Projection matrix with [0, 1] depth range.
    #[must_use]
    pub fn projection_matrix(&self) -> DMat4 {
        match self.projection {
            ProjectionKind::Perspective => DMat4::perspective_rh(
                self.fov.to_radians(),
                self.aspect,
                self.near,
                self.far,
            ),
            ProjectionKind::Orthographic => {
                let half = self.ortho_half_extents();
                DMat4::orthographic_rh(
                    -half.x, half.x, -half.y, half.y, self.near, self.far,
                )
            }
        }
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Half width and height of the orthographic view volume.
    #[must_use]
    pub fn ortho_half_extents(&self) -> DVec2 {
        let half_h = self.ortho_height * 0.5 / self.zoom.max(f64::EPSILON);
        DVec2::new(half_h * self.aspect, half_h)
    }

    /// Pixel (origin top-left, y down) to normalized device coordinates
    /// (origin center, y up).
    #[must_use]
    pub fn pixel_to_ndc(&self, pixel: DVec2) -> DVec2 {
        let size = self.viewport.max(DVec2::ONE);
        DVec2::new(pixel.x / size.x * 2.0 - 1.0, 1.0 - pixel.y / size.y * 2.0)
    }

    /// Normalized device coordinates back to pixels.
    #[must_use]
    pub fn ndc_to_pixel(&self, ndc: DVec2) -> DVec2 {
        DVec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        )
    }

    /// World-space ray through a point given in normalized device
    /// coordinates.
    #[must_use]
    pub fn ray_through_ndc(&self, ndc: DVec2) -> Option<Ray> {
        match self.projection {
            ProjectionKind::Perspective => {
                let tan = self.half_fov_radians().tan();
                let local = DVec3::new(ndc.x * tan * self.aspect, ndc.y * tan, -1.0);
                Ray::new(self.position, self.rotation * local)
            }
            ProjectionKind::Orthographic => {
                let half = self.ortho_half_extents();
                let origin = self.position
                    + self.right() * (ndc.x * half.x)
                    + self.local_up() * (ndc.y * half.y);
                Ray::new(origin, self.forward())
            }
        }
    }

    /// World-space ray through a viewport pixel.
    #[must_use]
    pub fn ray_through_pixel(&self, pixel: DVec2) -> Option<Ray> {
        self.ray_through_ndc(self.pixel_to_ndc(pixel))
    }

    /// Pixel a world point projects to, `None` when it is behind a
    /// perspective camera.
    #[must_use]
    pub fn project_to_pixel(&self, point: DVec3) -> Option<DVec2> {
        let local = self.rotation.inverse() * (point - self.position);
        let ndc = match self.projection {
            ProjectionKind::Perspective => {
                if local.z >= 0.0 {
                    return None;
                }
                let tan = self.half_fov_radians().tan();
                let depth = -local.z;
                DVec2::new(local.x / (depth * tan * self.aspect), local.y / (depth * tan))
            }
            ProjectionKind::Orthographic => {
                let half = self.ortho_half_extents();
                DVec2::new(local.x / half.x, local.y / half.y)
            }
        };
        Some(self.ndc_to_pixel(ndc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at_z5() -> Camera {
        let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0);
        camera.set_viewport(800.0, 800.0);
        camera.position = DVec3::new(0.0, 0.0, 5.0);
        camera.look_at(DVec3::ZERO);
        camera
    }

    #[test]
    fn look_at_points_forward() {
        let camera = camera_at_z5();
        assert!(camera.forward().abs_diff_eq(DVec3::NEG_Z, 1e-12));
        assert!(camera.right().abs_diff_eq(DVec3::X, 1e-12));
    }

    #[test]
    fn center_pixel_ray_hits_target() {
        let camera = camera_at_z5();
        let ray = camera.ray_through_pixel(DVec2::new(400.0, 400.0)).unwrap();
        assert!(ray.direction.abs_diff_eq(DVec3::NEG_Z, 1e-12));
    }

    #[test]
    fn project_and_unproject_agree() {
        let camera = camera_at_z5();
        let point = DVec3::new(0.7, -0.3, 1.0);
        let pixel = camera.project_to_pixel(point).unwrap();
        let ray = camera.ray_through_pixel(pixel).unwrap();
        let to_point = (point - ray.origin).normalize();
        assert!(ray.direction.abs_diff_eq(to_point, 1e-9));
    }

    #[test]
    fn points_behind_are_not_projected() {
        let camera = camera_at_z5();
        assert!(camera.project_to_pixel(DVec3::new(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn view_projection_maps_target_to_center() {
        let camera = camera_at_z5();
        let clip = camera.view_projection_matrix().project_point3(DVec3::ZERO);
        assert!(clip.x.abs() < 1e-12 && clip.y.abs() < 1e-12);
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn orthographic_rays_are_parallel() {
        let mut camera = Camera::orthographic(10.0, 1.0, 0.1, 100.0);
        camera.set_viewport(100.0, 100.0);
        let a = camera.ray_through_pixel(DVec2::new(0.0, 0.0)).unwrap();
        let b = camera.ray_through_pixel(DVec2::new(100.0, 100.0)).unwrap();
        assert_eq!(a.direction, b.direction);
        assert!((a.origin - b.origin).length() > 1.0);
    }
}
