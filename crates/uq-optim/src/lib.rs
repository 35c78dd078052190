//! Bound-constrained optimization for uncertainty quantification
//!
//! An [`OptimizationProblem`] pairs an objective [`Function`] with optional
//! bounds; an [`OptimizationSolver`] such as [`Tnc`] solves it and exposes
//! an [`OptimizationResult`] with error estimates and evaluation histories.
//!
//! # Example
//!
//! ```rust
//! use uq_core::Point;
//! use uq_optim::prelude::*;
//!
//! let objective = ClosureFunction::scalar(2, |x| (x[0] - 1.0).powi(2) + (x[1] + 0.5).powi(2));
//! let mut solver = Tnc::new(OptimizationProblem::new(objective));
//! solver.set_starting_point(Point::new(vec![3.0, 3.0]));
//! solver.run()?;
//!
//! let result = solver.result();
//! assert!((result.optimal_point[0] - 1.0).abs() < 1e-3);
//! assert!((result.optimal_point[1] + 0.5).abs() < 1e-3);
//! # Ok::<(), uq_core::Error>(())
//! ```

pub mod config;
pub mod function;
pub mod problem;
pub mod result;
pub mod solver;
pub mod tnc;

pub use config::SolverSettings;
pub use function::{centered_gradient, ClosureFunction, Function, FINITE_DIFFERENCE_STEP};
pub use problem::OptimizationProblem;
pub use result::OptimizationResult;
pub use solver::OptimizationSolver;
pub use tnc::{Tnc, TncParameters};

use uq_persistence::StorageManager;

/// Make the solver types loadable by class name
pub fn register_persistent_types(manager: &mut StorageManager) {
    manager.register::<Tnc>();
    manager.register::<TncParameters>();
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ClosureFunction, Function, OptimizationProblem, OptimizationResult, OptimizationSolver,
        SolverSettings, Tnc, TncParameters,
    };
}
