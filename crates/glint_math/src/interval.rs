#[derive(Debug, Clone, Copy, PartialEq)]

pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// The unit interval [0, 1], used for display color clamping.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(1e-3, 4.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(1e-3));
        assert!(!interval.surrounds(4.0));

        assert!(interval.surrounds(2.0));
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(f32::INFINITY));
    }

    #[test]
    fn test_interval_unbounded_above() {
        let interval = Interval::new(1e-3, f32::INFINITY);
        assert!(interval.surrounds(1e6));
        assert!(!interval.surrounds(-1.0));
    }

    #[test]
    fn test_interval_clamp() {
        let unit = Interval::UNIT;

        assert_eq!(unit.clamp(-5.0), 0.0);
        assert_eq!(unit.clamp(0.5), 0.5);
        assert_eq!(unit.clamp(3.0), 1.0);
    }
}
