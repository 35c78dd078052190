//! Persistent object contracts

use crate::advocate::Advocate;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uq_core::{Error, Id, Result};

/// Type-erasure helpers used to recover concrete types from shared objects
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// An object whose state can be externalized through an [`Advocate`]
///
/// The identity returned by [`id`](PersistentObject::id) decides whether
/// the object has already been written during the current pass.
pub trait PersistentObject: AsAny + fmt::Debug {
    /// Name used to rebuild the object on load
    fn class_name(&self) -> &'static str;

    fn id(&self) -> Id;

    /// Write the object's attributes
    fn save(&self, adv: &mut Advocate<'_>) -> Result<()>;

    /// Read the object's attributes back
    fn load(&mut self, adv: &mut Advocate<'_>) -> Result<()>;
}

/// Objects shared between several owners (and several parents in a study)
pub type SharedObject = Arc<dyn PersistentObject>;

/// Persistent objects that can be rebuilt from their class name alone
pub trait Buildable: PersistentObject + Default + Sized {
    const CLASS_NAME: &'static str;
}

/// Recover the concrete type of a shared object
pub fn downcast_shared<T: PersistentObject>(object: SharedObject) -> Option<Arc<T>> {
    object.into_any_arc().downcast::<T>().ok()
}

/// A handle whose state lives in a shared implementation object
///
/// Persisting an interface persists its implementation; loading one swaps
/// the reconstructed implementation in.
pub trait InterfaceObject {
    fn implementation(&self) -> SharedObject;

    fn set_implementation(&mut self, implementation: SharedObject) -> Result<()>;
}

/// Typed [`InterfaceObject`] over an `Arc<T>`
#[derive(Debug)]
pub struct Handle<T: PersistentObject>(Arc<T>);

impl<T: PersistentObject> Handle<T> {
    pub fn new(implementation: T) -> Self {
        Self(Arc::new(implementation))
    }

    pub fn from_shared(implementation: Arc<T>) -> Self {
        Self(implementation)
    }

    pub fn get(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T: PersistentObject> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Buildable> Default for Handle<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PersistentObject> InterfaceObject for Handle<T> {
    fn implementation(&self) -> SharedObject {
        self.0.clone()
    }

    fn set_implementation(&mut self, implementation: SharedObject) -> Result<()> {
        let class_name = implementation.class_name();
        self.0 = downcast_shared::<T>(implementation).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "cannot use a {class_name} as implementation of this handle"
            ))
        })?;
        Ok(())
    }
}
