//! Axis-aligned boxes of R^n with possibly infinite sides

use crate::{Error, PersistentId, Point, Result};

/// Cartesian product of 1-d intervals
///
/// Each side carries a finiteness flag. A side built from an infinite value
/// is flagged as infinite; the stored value is then only informative.
#[derive(Debug, Clone)]
pub struct Interval {
    id: PersistentId,
    lower: Point,
    upper: Point,
    finite_lower: Vec<bool>,
    finite_upper: Vec<bool>,
}

impl Interval {
    /// Build an interval from its bounds, deriving finiteness from the values
    pub fn new(lower: Point, upper: Point) -> Result<Self> {
        let finite_lower = lower.iter().map(|x| x.is_finite()).collect();
        let finite_upper = upper.iter().map(|x| x.is_finite()).collect();
        Self::with_finiteness(lower, upper, finite_lower, finite_upper)
    }

    /// Build an interval with explicit finiteness flags
    pub fn with_finiteness(
        lower: Point,
        upper: Point,
        finite_lower: Vec<bool>,
        finite_upper: Vec<bool>,
    ) -> Result<Self> {
        let dimension = lower.dimension();
        for (actual, context) in [
            (upper.dimension(), "interval upper bound"),
            (finite_lower.len(), "interval lower finiteness flags"),
            (finite_upper.len(), "interval upper finiteness flags"),
        ] {
            if actual != dimension {
                return Err(Error::dimension_mismatch(dimension, actual, context));
            }
        }
        Ok(Self {
            id: PersistentId::new(),
            lower,
            upper,
            finite_lower,
            finite_upper,
        })
    }

    /// The whole of R^n
    pub fn unbounded(dimension: usize) -> Self {
        Self {
            id: PersistentId::new(),
            lower: Point::filled(dimension, f64::NEG_INFINITY),
            upper: Point::filled(dimension, f64::INFINITY),
            finite_lower: vec![false; dimension],
            finite_upper: vec![false; dimension],
        }
    }

    pub fn id(&self) -> crate::Id {
        self.id.get()
    }

    pub fn dimension(&self) -> usize {
        self.lower.dimension()
    }

    pub fn lower_bound(&self) -> &Point {
        &self.lower
    }

    pub fn upper_bound(&self) -> &Point {
        &self.upper
    }

    pub fn finite_lower_bound(&self) -> &[bool] {
        &self.finite_lower
    }

    pub fn finite_upper_bound(&self) -> &[bool] {
        &self.finite_upper
    }

    /// Whether some component has an empty range
    pub fn is_empty(&self) -> bool {
        (0..self.dimension()).any(|i| {
            self.finite_lower[i] && self.finite_upper[i] && self.lower[i] > self.upper[i]
        })
    }

    /// Whether `x` lies inside the interval (infinite sides never exclude)
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dimension()
            && x.iter().enumerate().all(|(i, &xi)| {
                (!self.finite_lower[i] || xi >= self.lower[i])
                    && (!self.finite_upper[i] || xi <= self.upper[i])
            })
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower
            && self.upper == other.upper
            && self.finite_lower == other.finite_lower
            && self.finite_upper == other.finite_upper
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::unbounded(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finiteness_from_values() {
        let interval = Interval::new(
            Point::new(vec![0.0, f64::NEG_INFINITY]),
            Point::new(vec![f64::INFINITY, 2.0]),
        )
        .unwrap();
        assert_eq!(interval.finite_lower_bound(), &[true, false]);
        assert_eq!(interval.finite_upper_bound(), &[false, true]);
        assert!(interval.contains(&[1e300, -1e300]));
        assert!(!interval.contains(&[-1.0, 0.0]));
        assert!(!interval.contains(&[1.0]));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = Interval::new(Point::zeros(2), Point::zeros(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 2, actual: 3, .. }));
    }

    #[test]
    fn test_unbounded_and_empty() {
        let all = Interval::unbounded(3);
        assert!(!all.is_empty());
        assert!(all.contains(&[f64::MAX, -f64::MAX, 0.0]));

        let empty = Interval::new(Point::new(vec![1.0]), Point::new(vec![0.0])).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_clone_equal_but_distinct_identity() {
        let a = Interval::new(Point::zeros(1), Point::filled(1, 1.0)).unwrap();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());
    }
}
