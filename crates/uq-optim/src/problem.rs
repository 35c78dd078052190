//! Optimization problem definition

use crate::function::Function;
use std::sync::Arc;
use uq_core::{Error, Interval, Result};

/// Objective, optional bounds and constraints, and the optimization sense
#[derive(Debug, Clone)]
pub struct OptimizationProblem {
    objective: Arc<dyn Function>,
    bounds: Option<Interval>,
    minimization: bool,
    equality_constraint: Option<Arc<dyn Function>>,
    inequality_constraint: Option<Arc<dyn Function>>,
}

impl OptimizationProblem {
    /// Unbounded minimization of `objective`
    pub fn new(objective: impl Function + 'static) -> Self {
        Self::from_shared(Arc::new(objective))
    }

    pub fn from_shared(objective: Arc<dyn Function>) -> Self {
        Self {
            objective,
            bounds: None,
            minimization: true,
            equality_constraint: None,
            inequality_constraint: None,
        }
    }

    /// Restrict the search to `bounds`, which must match the input dimension
    pub fn with_bounds(mut self, bounds: Interval) -> Result<Self> {
        self.set_bounds(bounds)?;
        Ok(self)
    }

    pub fn maximize(mut self) -> Self {
        self.minimization = false;
        self
    }

    pub fn with_equality_constraint(mut self, constraint: impl Function + 'static) -> Self {
        self.equality_constraint = Some(Arc::new(constraint));
        self
    }

    pub fn with_inequality_constraint(mut self, constraint: impl Function + 'static) -> Self {
        self.inequality_constraint = Some(Arc::new(constraint));
        self
    }

    pub fn objective(&self) -> &Arc<dyn Function> {
        &self.objective
    }

    pub fn bounds(&self) -> Option<&Interval> {
        self.bounds.as_ref()
    }

    pub fn set_bounds(&mut self, bounds: Interval) -> Result<()> {
        if bounds.dimension() != self.dimension() {
            return Err(Error::dimension_mismatch(
                self.dimension(),
                bounds.dimension(),
                "problem bounds",
            ));
        }
        self.bounds = Some(bounds);
        Ok(())
    }

    /// Drop the dimension check, for callers that must hand over bounds as given
    pub fn set_bounds_unchecked(&mut self, bounds: Interval) {
        self.bounds = Some(bounds);
    }

    pub fn is_minimization(&self) -> bool {
        self.minimization
    }

    pub fn set_minimization(&mut self, minimization: bool) {
        self.minimization = minimization;
    }

    pub fn dimension(&self) -> usize {
        self.objective.input_dimension()
    }

    pub fn has_multiple_objective(&self) -> bool {
        self.objective.output_dimension() > 1
    }

    pub fn has_bounds(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn has_equality_constraint(&self) -> bool {
        self.equality_constraint.is_some()
    }

    pub fn has_inequality_constraint(&self) -> bool {
        self.inequality_constraint.is_some()
    }

    pub fn equality_constraint(&self) -> Option<&Arc<dyn Function>> {
        self.equality_constraint.as_ref()
    }

    pub fn inequality_constraint(&self) -> Option<&Arc<dyn Function>> {
        self.inequality_constraint.as_ref()
    }
}
