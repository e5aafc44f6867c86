//! Spherical coordinates in the y-up convention.
//!
//! `phi` is the polar angle measured from +Y, `theta` is the azimuth
//! measured around +Y starting at +Z (so `theta = atan2(x, z)`).

use std::f64::consts::PI;

use glam::DVec3;

/// Smallest distance `phi` keeps from either pole.
pub const POLE_EPSILON: f64 = 1e-6;

/// Point in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f64,
    /// Polar angle from +Y, in radians.
    pub phi: f64,
    /// Azimuth around +Y from +Z, in radians.
    pub theta: f64,
}

impl Default for Spherical {
    fn default() -> Self {
        Self {
            radius: 1.0,
            phi: 0.0,
            theta: 0.0,
        }
    }
}

impl Spherical {
    /// Spherical from components.
    #[must_use]
    pub fn new(radius: f64, phi: f64, theta: f64) -> Self {
        Self { radius, phi, theta }
    }

    /// Convert a cartesian vector. The zero vector maps to radius 0.
    #[must_use]
    pub fn from_vector(v: DVec3) -> Self {
        let radius = v.length();
        if radius == 0.0 || !radius.is_finite() {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Convert back to a cartesian vector.
    #[must_use]
    pub fn to_vector(&self) -> DVec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        DVec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep `phi` strictly inside `(0, π)` so the look direction never
    /// becomes parallel to the up axis.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);
    }
}

/// Wrap an angle difference into `(-π, π]`.
#[must_use]
pub fn shortest_angle(delta: f64) -> f64 {
    let wrapped = (delta + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}
