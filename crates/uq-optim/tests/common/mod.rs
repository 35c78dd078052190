//! Shared problems for the solver integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use approx::assert_relative_eq;
use uq_core::{Interval, Point};
use uq_optim::{ClosureFunction, Function, OptimizationProblem};

pub const TOLERANCE: f64 = 1e-4;

/// `sum_i (x_i - target_i)^2` with its analytic gradient
pub fn paraboloid(target: Vec<f64>) -> ClosureFunction {
    let dimension = target.len();
    let gradient_target = target.clone();
    ClosureFunction::scalar(dimension, move |x| {
        x.iter().zip(&target).map(|(a, b)| (a - b) * (a - b)).sum()
    })
    .with_gradient(move |x| {
        Ok(nalgebra::DMatrix::from_iterator(
            x.len(),
            1,
            x.iter().zip(&gradient_target).map(|(a, b)| 2.0 * (a - b)),
        ))
    })
    .with_name("paraboloid")
}

/// Rosenbrock's banana function in two dimensions
pub fn rosenbrock() -> ClosureFunction {
    ClosureFunction::scalar(2, |x| {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    })
    .with_name("rosenbrock")
}

/// Box `[lower, upper]` in every direction
pub fn cube(dimension: usize, lower: f64, upper: f64) -> Interval {
    Interval::new(Point::filled(dimension, lower), Point::filled(dimension, upper))
        .expect("valid box")
}

/// Paraboloid problem whose objective counts its evaluations
pub fn counted(target: Vec<f64>) -> (OptimizationProblem, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let inner = paraboloid(target);
    let dimension = inner.input_dimension();
    let seen = Arc::clone(&counter);
    let objective = ClosureFunction::new(dimension, 1, move |x| {
        seen.fetch_add(1, Ordering::SeqCst);
        inner.evaluate(x).map(|y| y.into_inner())
    });
    (OptimizationProblem::new(objective), counter)
}

pub fn evaluations(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
