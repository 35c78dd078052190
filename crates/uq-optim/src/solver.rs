//! Common interface of optimization solvers

use crate::config::SolverSettings;
use crate::problem::OptimizationProblem;
use crate::result::OptimizationResult;
use uq_core::{Point, Result};

/// A solver bound to one problem at a time
pub trait OptimizationSolver {
    /// Reject problems the solver cannot handle
    fn check_problem(&self, problem: &OptimizationProblem) -> Result<()>;

    fn problem(&self) -> Option<&OptimizationProblem>;

    /// Replace the problem after checking it
    fn set_problem(&mut self, problem: OptimizationProblem) -> Result<()>;

    fn starting_point(&self) -> &Point;

    fn set_starting_point(&mut self, point: Point);

    fn settings(&self) -> &SolverSettings;

    fn settings_mut(&mut self) -> &mut SolverSettings;

    /// Solve the problem, storing the outcome in [`result`](Self::result)
    fn run(&mut self) -> Result<()>;

    fn result(&self) -> &OptimizationResult;
}
