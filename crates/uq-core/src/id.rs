//! Object identity
//!
//! Every persistent object carries an [`Id`] drawn from a process-wide
//! counter. Identity, not value, is what the persistence layer uses to
//! recognise an object reachable from several parents.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identity of a persistent object
pub type Id = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a fresh identity
pub fn next_id() -> Id {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Identity slot embedded in persistent objects
///
/// Creating or cloning a `PersistentId` always allocates a new [`Id`]: a
/// copy of an object is a different object as far as persistence is
/// concerned. Containing types should compare their payload, not this field.
pub struct PersistentId(Id);

impl PersistentId {
    /// Allocate a new identity
    pub fn new() -> Self {
        Self(next_id())
    }

    /// The wrapped identity
    pub fn get(&self) -> Id {
        self.0
    }
}

impl Default for PersistentId {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PersistentId {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for PersistentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = PersistentId::new();
        let b = PersistentId::new();
        assert_ne!(a.get(), b.get());
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_clone_allocates_fresh_identity() {
        let a = PersistentId::default();
        let b = a.clone();
        assert_ne!(a.get(), b.get());
        assert_eq!(format!("{:?}", a), format!("#{}", a.get()));
    }
}
