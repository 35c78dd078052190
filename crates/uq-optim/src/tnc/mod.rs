//! Truncated-Newton bound-constrained optimization
//!
//! [`routine`] is the numerical minimizer working on flat slices through a
//! status-code callback. [`Tnc`] adapts an [`OptimizationProblem`] to it:
//! infinite bounds become `±HUGE_BOUND`, maximization flips the sign, and
//! every evaluation is recorded to estimate the final errors.
//!
//! [`OptimizationProblem`]: crate::OptimizationProblem

mod parameters;
pub mod routine;
mod solver;

pub use parameters::TncParameters;
pub use routine::{minimize, Messages, Minimum, ReturnCode, RoutineOptions, HUGE_BOUND};
pub use solver::{sentinel_bounds, CallbackState, Tnc};
