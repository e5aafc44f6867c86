use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
///
/// An empty box has `min` greater than `max` on at least one axis;
/// [`Aabb::EMPTY`] is the identity for [`Aabb::union`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// Box containing nothing.
    pub const EMPTY: Self = Self {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    /// Box from two corners, in any order.
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |acc, p| acc.expanded_by_point(p))
    }

    /// Whether the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x
            || self.max.y < self.min.y
            || self.max.z < self.min.z
    }

    /// Whether both corners are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Center point. Zero for an empty box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis. Zero for an empty box.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            return DVec3::ZERO;
        }
        self.max - self.min
    }

    /// Length of the min→max diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.size().length()
    }

    /// Radius of the sphere centered on the box that touches every corner.
    #[must_use]
    pub fn bounding_sphere_radius(&self) -> f64 {
        self.diagonal() * 0.5
    }

    /// The eight corners, ordered by the bits (x, y, z) of the index.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (lo, hi) = (self.min, self.max);
        std::array::from_fn(|i| {
            DVec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// Whether the point lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Euclidean distance from the point to the box, zero when inside.
    #[must_use]
    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        let clamped = point.clamp(self.min, self.max);
        point.distance(clamped)
    }

    /// Copy grown to include `point`.
    #[must_use]
    pub fn expanded_by_point(&self, point: DVec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Aabb {
        Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0))
    }

    #[test]
    fn empty_box_reports_empty_and_zero_size() {
        assert!(Aabb::EMPTY.is_empty());
        assert!(!Aabb::EMPTY.is_finite());
        assert_eq!(Aabb::EMPTY.size(), DVec3::ZERO);
        assert_eq!(Aabb::EMPTY.diagonal(), 0.0);
    }

    #[test]
    fn sphere_radius_of_cube() {
        let r = unit_cube().bounding_sphere_radius();
        assert!((r - 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn corners_cover_both_extremes() {
        let corners = unit_cube().corners();
        assert_eq!(corners[0], DVec3::splat(-1.0));
        assert_eq!(corners[7], DVec3::splat(1.0));
        assert_eq!(corners[1], DVec3::new(1.0, -1.0, -1.0));
        assert_eq!(corners[6], DVec3::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn distance_is_zero_inside() {
        let b = unit_cube();
        assert_eq!(b.distance_to_point(DVec3::new(0.5, 0.0, -0.5)), 0.0);
        assert!((b.distance_to_point(DVec3::new(0.0, 0.0, 4.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn from_points_and_union() {
        let a = Aabb::from_points([DVec3::ZERO, DVec3::ONE]);
        let b = Aabb::from_points([DVec3::splat(-2.0)]);
        let u = a.union(&b);
        assert_eq!(u.min, DVec3::splat(-2.0));
        assert_eq!(u.max, DVec3::ONE);
        assert_eq!(Aabb::EMPTY.union(&a), a);
    }
}
