//! Rays and planes for cursor picking against world-space geometry.

use glam::DVec3;

/// A plane `normal · p + constant = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: DVec3,
    /// Signed offset from the origin.
    pub constant: f64,
}

impl Plane {
    /// Create a plane from coefficients and normalize it. A zero normal
    /// yields a degenerate plane with zero normal.
    #[must_use]
    pub fn from_coefficients(a: f64, b: f64, c: f64, d: f64) -> Self {
        let len = (a * a + b * b + c * c).sqrt();
        if len > 0.0 {
            Self {
                normal: DVec3::new(a / len, b / len, c / len),
                constant: d / len,
            }
        } else {
            Self {
                normal: DVec3::ZERO,
                constant: 0.0,
            }
        }
    }

    /// Plane through `point` with the given normal.
    #[must_use]
    pub fn from_normal_and_point(normal: DVec3, point: DVec3) -> Self {
        let n = normal.normalize_or_zero();
        Self {
            normal: n,
            constant: -n.dot(point),
        }
    }

    /// Signed distance from point to plane (positive = in front, negative =
    /// behind)
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.constant
    }

    /// Whether the normal is usable.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal == DVec3::ZERO
    }
}

/// Half-line from `origin` along the unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: DVec3,
    /// Unit direction.
    pub direction: DVec3,
}

impl Ray {
    /// Ray with a normalized direction. `None` when the direction has no
    /// length.
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Intersection with a plane in front of the origin.
    #[must_use]
    pub fn intersect_plane(&self, plane: &Plane) -> Option<DVec3> {
        if plane.is_degenerate() {
            return None;
        }
        let denom = plane.normal.dot(self.direction);
        let origin_distance = plane.distance_to_point(self.origin);
        if denom.abs() < 1e-12 {
            // Parallel: only hits if the ray lies in the plane.
            return (origin_distance.abs() < 1e-12).then_some(self.origin);
        }
        let t = -origin_distance / denom;
        (t >= 0.0).then(|| self.at(t))
    }
}
