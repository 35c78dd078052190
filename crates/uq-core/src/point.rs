//! Real-valued points

use serde::{Deserialize, Serialize};
use std::ops::{Add, Deref, DerefMut, Mul, Sub};

/// A point of R^n
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point(Vec<f64>);

impl Point {
    /// Create a point from its coordinates
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Point of the given dimension filled with `value`
    pub fn filled(dimension: usize, value: f64) -> Self {
        Self(vec![value; dimension])
    }

    /// Origin of R^n
    pub fn zeros(dimension: usize) -> Self {
        Self::filled(dimension, 0.0)
    }

    /// Number of coordinates
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Squared Euclidean norm
    pub fn norm_squared(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum()
    }

    /// Scalar product, `None` when dimensions disagree
    pub fn dot(&self, other: &Point) -> Option<f64> {
        if self.dimension() != other.dimension() {
            return None;
        }
        Some(self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum())
    }

    /// Consume the point and return its coordinates
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Point {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Point {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl Deref for Point {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl DerefMut for Point {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

// Component-wise arithmetic. Operands are expected to share a dimension;
// extra coordinates of the longer operand are dropped.

impl Add for &Point {
    type Output = Point;

    fn add(self, rhs: &Point) -> Point {
        Point(self.0.iter().zip(&rhs.0).map(|(a, b)| a + b).collect())
    }
}

impl Sub for &Point {
    type Output = Point;

    fn sub(self, rhs: &Point) -> Point {
        Point(self.0.iter().zip(&rhs.0).map(|(a, b)| a - b).collect())
    }
}

impl Mul<&Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: &Point) -> Point {
        Point(rhs.0.iter().map(|x| self * x).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_and_dot() {
        let p = Point::new(vec![3.0, 4.0]);
        assert_relative_eq!(p.norm(), 5.0);
        assert_relative_eq!(p.norm_squared(), 25.0);
        assert_eq!(p.dot(&Point::new(vec![1.0, 1.0])), Some(7.0));
        assert_eq!(p.dot(&Point::zeros(3)), None);
    }

    #[test]
    fn test_arithmetic() {
        let a = Point::new(vec![1.0, 2.0]);
        let b = Point::new(vec![3.0, -1.0]);
        assert_eq!(&a + &b, Point::new(vec![4.0, 1.0]));
        assert_eq!(&a - &b, Point::new(vec![-2.0, 3.0]));
        assert_eq!(0.5 * &(&a + &b), Point::new(vec![2.0, 0.5]));
    }

    #[test]
    fn test_slice_access() {
        let mut p = Point::filled(3, 1.5);
        p[1] = 2.0;
        assert_eq!(p.as_slice(), &[1.5, 2.0, 1.5]);
        assert_eq!(p.dimension(), 3);
    }
}
