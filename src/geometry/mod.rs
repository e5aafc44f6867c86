//! World-space geometry primitives used by the camera controls.
//!
//! All math is double precision: poses round-trip through spherical
//! coordinates every frame and single precision drifts visibly.

mod aabb;
mod ray;
pub mod spherical;

pub use aabb::Aabb;
use glam::{DMat3, DQuat, DVec3};
pub use ray::{Plane, Ray};
pub use spherical::Spherical;

/// Rotation that points a camera's local -Z axis along `direction` with its
/// local +Y as close to `up` as possible.
///
/// Returns `None` for a zero or non-finite direction. When `direction` is
/// parallel to `up` the basis is nudged slightly so a valid rotation is
/// still produced.
#[must_use]
pub fn look_rotation(direction: DVec3, up: DVec3) -> Option<DQuat> {
    if !direction.is_finite() {
        return None;
    }
    let mut z = (-direction).try_normalize()?;
    let mut x = up.cross(z);
    if x.length_squared() < 1e-20 {
        if (up.z.abs() - 1.0).abs() < 1e-12 {
            z.x += 1e-4;
        } else {
            z.z += 1e-4;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    let x = x.try_normalize()?;
    let y = z.cross(x);
    Some(DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize())
}

/// Look direction (local -Z in world space) of a rotation.
#[must_use]
pub fn forward(rotation: DQuat) -> DVec3 {
    rotation * DVec3::NEG_Z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_rotation_points_forward() {
        let dir = DVec3::new(1.0, -0.5, 2.0).normalize();
        let q = look_rotation(dir, DVec3::Y).unwrap();
        assert!(forward(q).abs_diff_eq(dir, 1e-12));
        // Camera right stays horizontal.
        assert!((q * DVec3::X).y.abs() < 1e-12);
    }

    #[test]
    fn look_rotation_identity_for_neg_z() {
        let q = look_rotation(DVec3::NEG_Z, DVec3::Y).unwrap();
        assert!(q.abs_diff_eq(DQuat::IDENTITY, 1e-12));
    }

    #[test]
    fn look_rotation_handles_parallel_up() {
        let q = look_rotation(DVec3::NEG_Y, DVec3::Y).unwrap();
        assert!(q.is_finite());
        assert!(forward(q).dot(DVec3::NEG_Y) > 0.999_999);
    }

    #[test]
    fn look_rotation_rejects_degenerate_input() {
        assert!(look_rotation(DVec3::ZERO, DVec3::Y).is_none());
        assert!(look_rotation(DVec3::new(f64::NAN, 0.0, 1.0), DVec3::Y).is_none());
    }
}
