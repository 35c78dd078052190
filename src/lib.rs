//! # uq-stats
//!
//! Uncertainty quantification building blocks: a persistence layer that
//! saves and restores graphs of shared objects, and bound-constrained
//! optimization through a truncated-Newton solver.
//!
//! ## Crates
//!
//! - [`core`]: errors, points, intervals and samples
//! - [`persistence`]: studies, storage managers and media
//! - [`optim`]: optimization problems and the TNC solver
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uq_stats::prelude::*;
//!
//! let objective = ClosureFunction::scalar(1, |x| (x[0] - 0.25).powi(2));
//! let mut solver = Tnc::new(OptimizationProblem::new(objective));
//! solver.set_starting_point(Point::new(vec![2.0]));
//! solver.run()?;
//! assert!((solver.result().optimal_point[0] - 0.25).abs() < 1e-4);
//!
//! let mut manager = StorageManager::new(MemoryMedium::new());
//! register_persistent_types(&mut manager);
//! let mut study = Study::new();
//! study.add_labeled("solver", Arc::new(solver), false)?;
//! study.save(&mut manager)?;
//!
//! let mut restored = Study::new();
//! restored.load(&mut manager)?;
//! assert!(restored.get_as::<Tnc>("solver").is_some());
//! # Ok::<(), uq_stats::core::Error>(())
//! ```

pub use uq_core as core;
pub use uq_optim as optim;
pub use uq_persistence as persistence;

pub use uq_optim::register_persistent_types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use uq_core::prelude::*;
    pub use uq_optim::prelude::*;
    pub use uq_optim::register_persistent_types;
    pub use uq_persistence::prelude::*;
}
