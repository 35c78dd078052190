//! Core types for uncertainty quantification
//!
//! This crate provides the pieces shared by the persistence and optimization
//! crates: the error taxonomy, object identity, and the small numeric
//! containers (points, samples, intervals) that flow through both.
//!
//! # Example
//!
//! ```rust
//! use uq_core::{Interval, Point};
//!
//! let bounds = Interval::new(
//!     Point::new(vec![0.0, f64::NEG_INFINITY]),
//!     Point::new(vec![1.0, 5.0]),
//! )?;
//! assert_eq!(bounds.finite_lower_bound(), &[true, false]);
//! # Ok::<(), uq_core::Error>(())
//! ```

pub mod error;
pub mod id;
pub mod interval;
pub mod point;
pub mod sample;

// Re-export core types
pub use error::{Error, Result};
pub use id::{next_id, Id, PersistentId};
pub use interval::Interval;
pub use point::Point;
pub use sample::{Description, Sample};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::{Description, Id, Interval, Point, Result, Sample};
}
