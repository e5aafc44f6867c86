//! Pure pose and projection helpers shared by the controls and the manager.

use glam::{DQuat, DVec2, DVec3};
use web_time::Duration;

use super::core::Camera;
use crate::geometry::{self, Aabb, Plane};

/// Smallest near plane produced when the camera is outside the box.
pub const MIN_NEAR: f64 = 0.1;

/// Radius used when fitting to an empty or point-sized box.
const MIN_FIT_RADIUS: f64 = 1e-3;

/// Animation time per world unit of travel.
const DURATION_PER_UNIT: Duration = Duration::from_millis(125);
/// Shortest default animation.
pub const MIN_ANIMATION_DURATION: Duration = Duration::from_millis(300);
/// Longest default animation.
pub const MAX_ANIMATION_DURATION: Duration = Duration::from_millis(1250);

/// Fit the near and far planes tightly around `bbox`.
///
/// Near is the largest distance at which the whole near rectangle stays
/// outside the box, floored at [`MIN_NEAR`]. Far reaches the farthest box
/// corner in front of the near plane and is never less than twice the near
/// distance. With the camera inside the box, near drops to
/// `min(0.1, far / 1000)` so close geometry is not clipped.
///
/// Empty or non-finite boxes leave the camera untouched and return `false`.
pub fn update_camera_near_and_far(camera: &mut Camera, bbox: &Aabb) -> bool {
    if bbox.is_empty() || !bbox.is_finite() || !camera.position.is_finite() {
        return false;
    }
    let position = camera.position;

    let tan_half_fov = if camera.is_perspective() {
        camera.half_fov_radians().tan()
    } else {
        0.0
    };
    let distance_to_box = bbox.distance_to_point(position);
    let corner_factor =
        (1.0 + tan_half_fov * tan_half_fov * (camera.aspect * camera.aspect + 1.0)).sqrt();
    let mut near = (distance_to_box / corner_factor).max(MIN_NEAR);

    let near_plane =
        Plane::from_normal_and_point(camera.forward(), position + camera.forward() * near);
    let mut far = bbox
        .corners()
        .iter()
        .filter(|corner| near_plane.distance_to_point(**corner) >= 0.0)
        .map(|corner| corner.distance(position))
        .fold(0.0, f64::max);
    far = far.max(2.0 * near);

    if bbox.contains_point(position) {
        near = MIN_NEAR.min(far / 1000.0);
    }

    if !near.is_finite() || !far.is_finite() {
        log::warn!("skipping near/far update, got near={near} far={far}");
        return false;
    }
    camera.near = near;
    camera.far = far;
    true
}

/// Target that keeps the current target distance but lies along the look
/// direction of `rotation`, seen from `new_position`.
#[must_use]
pub fn calculate_new_target_from_rotation(
    camera: &Camera,
    rotation: DQuat,
    current_target: DVec3,
    new_position: DVec3,
) -> DVec3 {
    let mut distance = current_target.distance(camera.position);
    if distance <= f64::EPSILON || !distance.is_finite() {
        distance = 1.0;
    }
    new_position + geometry::forward(rotation.normalize()) * distance
}

/// Look-at rotation from the camera position toward `new_target`. Falls back
/// to the current rotation when the target sits on the camera.
#[must_use]
pub fn calculate_new_rotation_from_target(camera: &Camera, new_target: DVec3) -> DQuat {
    geometry::look_rotation(new_target - camera.position, camera.up).unwrap_or(camera.rotation)
}

/// Pose that frames `bbox` along the camera's current view direction.
///
/// Returns `(position, target)`: the target is the box center and the
/// position backs off from it by the bounding-sphere radius times
/// `radius_factor`.
#[must_use]
pub fn fit_camera_to_bounding_box(
    camera: &Camera,
    bbox: &Aabb,
    radius_factor: f64,
) -> (DVec3, DVec3) {
    let target = bbox.center();
    let radius = bbox.bounding_sphere_radius().max(MIN_FIT_RADIUS);
    let direction = camera.forward().try_normalize().unwrap_or(DVec3::NEG_Z);
    (target - direction * (radius * radius_factor), target)
}

/// Default tween length for a move over `distance` world units: 125 ms
/// per unit, clamped to 300..=1250 ms.
#[must_use]
pub fn default_animation_duration(distance: f64) -> Duration {
    if !distance.is_finite() {
        return MAX_ANIMATION_DURATION;
    }
    DURATION_PER_UNIT
        .mul_f64(distance.max(0.0))
        .clamp(MIN_ANIMATION_DURATION, MAX_ANIMATION_DURATION)
}

/// Point straight ahead of the camera at the distance of `new_target`.
///
/// Tweens start from here rather than from the old target so the first
/// frame does not jerk the view.
#[must_use]
pub fn animation_start_target(camera: &Camera, new_target: DVec3) -> DVec3 {
    let distance = new_target.distance(camera.position);
    match camera.ray_through_ndc(DVec2::ZERO) {
        Some(ray) => ray.at(distance),
        None => new_target,
    }
}
