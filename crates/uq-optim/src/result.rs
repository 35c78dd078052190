//! Outcome of an optimization run

use uq_core::{Point, Sample};

/// Optimal point, value and convergence diagnostics
///
/// Error estimates are `-1.0` until a run has recorded at least two
/// evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub optimal_point: Point,
    pub optimal_value: f64,
    pub evaluation_number: usize,
    pub absolute_error: f64,
    pub relative_error: f64,
    pub residual_error: f64,
    pub constraint_error: f64,
    /// Every point evaluated, in order
    pub input_history: Sample,
    /// Objective value and gradient norm of every evaluation
    pub output_history: Sample,
}

impl OptimizationResult {
    /// Result before any evaluation
    pub fn initial(point: Point, value: f64) -> Self {
        let dimension = point.dimension();
        Self {
            optimal_point: point,
            optimal_value: value,
            evaluation_number: 0,
            absolute_error: -1.0,
            relative_error: -1.0,
            residual_error: -1.0,
            constraint_error: -1.0,
            input_history: Sample::with_dimension(dimension),
            output_history: Sample::with_dimension(2),
        }
    }
}

impl Default for OptimizationResult {
    fn default() -> Self {
        Self::initial(Point::default(), 0.0)
    }
}
