//! Identity-preserving persistence of statistical objects
//!
//! Objects implement [`PersistentObject`] and write their state through an
//! [`Advocate`]. A [`StorageManager`] drives a save or load pass over a
//! [`Medium`], storing each object once however many parents share it.
//! A [`Study`] is the labeled set of top-level objects of a pass.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uq_core::{Interval, Point};
//! use uq_persistence::{MemoryMedium, StorageManager, Study};
//!
//! let bounds = Interval::new(Point::zeros(2), Point::filled(2, 1.0))?;
//! let mut study = Study::new();
//! study.add_labeled("bounds", Arc::new(bounds), false)?;
//!
//! let mut manager = StorageManager::new(MemoryMedium::new());
//! study.save(&mut manager)?;
//!
//! let mut restored = Study::new();
//! restored.load(&mut manager)?;
//! assert!(restored.get_as::<Interval>("bounds").is_some());
//! # Ok::<(), uq_core::Error>(())
//! ```

pub mod advocate;
mod builtin;
pub mod catalog;
pub mod manager;
pub mod medium;
pub mod object;
pub mod scalar;
pub mod study;

pub use advocate::Advocate;
pub use catalog::Catalog;
pub use manager::{StorageManager, DEFAULT_STUDY_VERSION};
pub use medium::{
    Backing, Document, InMemory, InternalObject, JsonFile, JsonMedium, Medium, MemoryMedium,
    Node, NullMedium, TreeMedium,
};
pub use object::{
    downcast_shared, AsAny, Buildable, Handle, InterfaceObject, PersistentObject, SharedObject,
};
pub use scalar::{Scalar, Storable};
pub use study::{Study, StudyEntry};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Advocate, Buildable, Handle, InterfaceObject, Medium, MemoryMedium, PersistentObject,
        SharedObject, StorageManager, Study,
    };
}
