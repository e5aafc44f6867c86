use glam::DVec3;

/// A vector damped toward a commanded end value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DampedVector3 {
    /// Currently rendered value.
    pub value: DVec3,
    /// Commanded value.
    pub end: DVec3,
}

impl DampedVector3 {
    /// Damped vector at rest at `v`.
    #[must_use]
    pub fn new(v: DVec3) -> Self {
        Self { value: v, end: v }
    }

    /// Hard snap of both slots.
    pub fn copy(&mut self, v: DVec3) {
        self.value = v;
        self.end = v;
    }

    /// Whether any component of `value` differs from `end` by more than
    /// `epsilon`.
    #[must_use]
    pub fn is_changed(&self, epsilon: f64) -> bool {
        (self.value - self.end).abs().max_element() > epsilon
    }

    /// Blend `value` toward `end` by `factor` in `[0, 1]`.
    pub fn damp(&mut self, factor: f64) {
        self.value = self.value.lerp(self.end, factor);
    }

    /// `value := end`.
    pub fn synchronize(&mut self) {
        self.value = self.end;
    }

    /// `end := value`, dropping whatever motion was still pending.
    pub fn synchronize_end(&mut self) {
        self.end = self.value;
    }

    /// Reset both slots to zero.
    pub fn clear(&mut self) {
        self.copy(DVec3::ZERO);
    }

    /// Add another damped vector slot by slot.
    pub fn add(&mut self, other: &Self) {
        self.value += other.value;
        self.end += other.end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damping_converges_and_settles() {
        let mut v = DampedVector3::new(DVec3::ZERO);
        v.end = DVec3::new(10.0, 0.0, -4.0);
        let mut previous = v.value.distance(v.end);
        for _ in 0..200 {
            v.damp(0.2);
            let d = v.value.distance(v.end);
            assert!(d <= previous);
            previous = d;
        }
        assert!(!v.is_changed(1e-6));
        v.synchronize();
        assert_eq!(v.value, v.end);
    }

    #[test]
    fn synchronize_end_cancels_motion() {
        let mut v = DampedVector3::new(DVec3::ONE);
        v.end = DVec3::splat(5.0);
        v.synchronize_end();
        assert_eq!(v.end, DVec3::ONE);
        assert!(!v.is_changed(0.0));
    }

    #[test]
    fn add_and_clear() {
        let mut a = DampedVector3::new(DVec3::X);
        let mut b = DampedVector3::new(DVec3::Y);
        b.end = DVec3::Z;
        a.add(&b);
        assert_eq!(a.value, DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(a.end, DVec3::new(1.0, 0.0, 1.0));
        a.clear();
        assert_eq!(a, DampedVector3::default());
    }
}
