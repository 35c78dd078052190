//! Vector functions with gradients

use nalgebra::DMatrix;
use std::fmt;
use uq_core::{Error, Point, Result};

/// Step of the centered finite-difference gradient
pub const FINITE_DIFFERENCE_STEP: f64 = 1e-5;

/// A function from R^n to R^p
pub trait Function: fmt::Debug + Send + Sync {
    fn input_dimension(&self) -> usize;

    fn output_dimension(&self) -> usize;

    fn evaluate(&self, x: &[f64]) -> Result<Point>;

    /// Jacobian transposed: one row per input, one column per output
    fn gradient(&self, x: &[f64]) -> Result<DMatrix<f64>> {
        centered_gradient(self, x, FINITE_DIFFERENCE_STEP)
    }
}

/// Centered finite-difference gradient of `f` at `x`
pub fn centered_gradient<F: Function + ?Sized>(f: &F, x: &[f64], step: f64) -> Result<DMatrix<f64>> {
    check_input(f, x)?;
    let n = f.input_dimension();
    let p = f.output_dimension();
    let mut gradient = DMatrix::zeros(n, p);
    let mut shifted = x.to_vec();
    for i in 0..n {
        shifted[i] = x[i] + step;
        let forward = f.evaluate(&shifted)?;
        shifted[i] = x[i] - step;
        let backward = f.evaluate(&shifted)?;
        shifted[i] = x[i];
        for j in 0..p {
            gradient[(i, j)] = (forward[j] - backward[j]) / (2.0 * step);
        }
    }
    Ok(gradient)
}

fn check_input<F: Function + ?Sized>(f: &F, x: &[f64]) -> Result<()> {
    if x.len() != f.input_dimension() {
        return Err(Error::dimension_mismatch(
            f.input_dimension(),
            x.len(),
            "function input",
        ));
    }
    Ok(())
}

type ValueFn = dyn Fn(&[f64]) -> Result<Vec<f64>> + Send + Sync;
type GradientFn = dyn Fn(&[f64]) -> Result<DMatrix<f64>> + Send + Sync;

/// [`Function`] backed by closures
///
/// Without an analytic gradient, [`Function::gradient`] falls back to
/// centered finite differences.
pub struct ClosureFunction {
    name: String,
    input_dimension: usize,
    output_dimension: usize,
    value: Box<ValueFn>,
    gradient: Option<Box<GradientFn>>,
}

impl ClosureFunction {
    pub fn new<F>(input_dimension: usize, output_dimension: usize, value: F) -> Self
    where
        F: Fn(&[f64]) -> Result<Vec<f64>> + Send + Sync + 'static,
    {
        Self {
            name: "ClosureFunction".to_string(),
            input_dimension,
            output_dimension,
            value: Box::new(value),
            gradient: None,
        }
    }

    /// Scalar function of `input_dimension` variables
    pub fn scalar<F>(input_dimension: usize, value: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::new(input_dimension, 1, move |x| Ok(vec![value(x)]))
    }

    pub fn with_gradient<G>(mut self, gradient: G) -> Self
    where
        G: Fn(&[f64]) -> Result<DMatrix<f64>> + Send + Sync + 'static,
    {
        self.gradient = Some(Box::new(gradient));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_analytic_gradient(&self) -> bool {
        self.gradient.is_some()
    }
}

impl fmt::Debug for ClosureFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureFunction")
            .field("name", &self.name)
            .field("input_dimension", &self.input_dimension)
            .field("output_dimension", &self.output_dimension)
            .field("analytic_gradient", &self.gradient.is_some())
            .finish()
    }
}

impl Function for ClosureFunction {
    fn input_dimension(&self) -> usize {
        self.input_dimension
    }

    fn output_dimension(&self) -> usize {
        self.output_dimension
    }

    fn evaluate(&self, x: &[f64]) -> Result<Point> {
        check_input(self, x)?;
        let y = (self.value)(x)?;
        if y.len() != self.output_dimension {
            return Err(Error::Evaluation(format!(
                "{} returned {} values, expected {}",
                self.name,
                y.len(),
                self.output_dimension
            )));
        }
        Ok(Point::new(y))
    }

    fn gradient(&self, x: &[f64]) -> Result<DMatrix<f64>> {
        match &self.gradient {
            Some(gradient) => {
                check_input(self, x)?;
                let g = gradient(x)?;
                if g.shape() != (self.input_dimension, self.output_dimension) {
                    return Err(Error::Evaluation(format!(
                        "{} gradient has shape {:?}, expected ({}, {})",
                        self.name,
                        g.shape(),
                        self.input_dimension,
                        self.output_dimension
                    )));
                }
                Ok(g)
            }
            None => centered_gradient(self, x, FINITE_DIFFERENCE_STEP),
        }
    }
}
