use glam::DVec3;

use super::DampedVector3;
use crate::geometry::spherical::shortest_angle;
use crate::geometry::Spherical;

/// A spherical offset damped toward a commanded end value.
///
/// Azimuth is blended along the shortest arc so damping never spins the
/// long way around.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DampedSpherical {
    /// Currently rendered value.
    pub value: Spherical,
    /// Commanded value.
    pub end: Spherical,
}

impl DampedSpherical {
    /// Hard snap of both slots to the spherical form of `v`.
    pub fn copy(&mut self, v: DVec3) {
        let mut s = Spherical::from_vector(v);
        s.make_safe();
        self.value = s;
        self.end = s;
    }

    /// Whether radius, polar or azimuth differ by more than `epsilon`.
    #[must_use]
    pub fn is_changed(&self, epsilon: f64) -> bool {
        (self.value.radius - self.end.radius).abs() > epsilon
            || (self.value.phi - self.end.phi).abs() > epsilon
            || shortest_angle(self.end.theta - self.value.theta).abs() > epsilon
    }

    /// Blend `value` toward `end` by `factor` in `[0, 1]`.
    pub fn damp(&mut self, factor: f64) {
        let v = &mut self.value;
        let e = &self.end;
        v.radius += (e.radius - v.radius) * factor;
        v.phi += (e.phi - v.phi) * factor;
        v.theta += shortest_angle(e.theta - v.theta) * factor;
    }

    /// `value := end`.
    pub fn synchronize(&mut self) {
        self.value = self.end;
    }

    /// `end := value`.
    pub fn synchronize_end(&mut self) {
        self.end = self.value;
    }

    /// Cartesian form of the rendered value.
    #[must_use]
    pub fn vector(&self) -> DVec3 {
        self.value.to_vector()
    }

    /// Cartesian form of the commanded value.
    #[must_use]
    pub fn vector_end(&self) -> DVec3 {
        self.end.to_vector()
    }

    /// Damp this offset together with the center it hangs from and return
    /// the resulting point.
    ///
    /// Damping the absolute point would move it along the chord between the
    /// two poses; damping center and offset separately keeps it on the arc.
    pub fn damp_as_vector_and_center(
        &mut self,
        center: &mut DampedVector3,
        factor: f64,
    ) -> DVec3 {
        center.damp(factor);
        self.damp(factor);
        center.value + self.vector()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn copy_round_trips_vector() {
        let mut s = DampedSpherical::default();
        let v = DVec3::new(3.0, 1.0, -2.0);
        s.copy(v);
        assert!(s.vector().abs_diff_eq(v, 1e-12));
        assert!(!s.is_changed(1e-9));
    }

    #[test]
    fn theta_damps_along_shortest_arc() {
        let mut s = DampedSpherical::default();
        s.copy(DVec3::Z);
        s.value.theta = PI - 0.1;
        s.end.theta = -PI + 0.1;
        s.damp(0.5);
        // Crosses +π instead of sweeping back through zero.
        assert!(s.value.theta > PI - 0.1);
        assert!((s.value.theta - PI).abs() < 1e-12);
    }

    #[test]
    fn full_turn_is_not_a_change() {
        let mut s = DampedSpherical::default();
        s.copy(DVec3::Z);
        s.end.theta += 2.0 * PI;
        assert!(!s.is_changed(1e-9));
    }

    #[test]
    fn orbit_damping_stays_on_the_arc() {
        let mut center = DampedVector3::new(DVec3::ZERO);
        let mut offset = DampedSpherical::default();
        offset.copy(DVec3::new(0.0, 0.0, 10.0));
        offset.end.theta = PI / 2.0;
        for _ in 0..10 {
            let p = offset.damp_as_vector_and_center(&mut center, 0.3);
            assert!((p.length() - 10.0).abs() < 1e-9);
        }
    }
}
