//! Per-object serialization cursor

use crate::manager::{
    StorageManager, CLASS_ATTRIBUTE, COLLECTION_TAG, ID_ATTRIBUTE, SIZE_ATTRIBUTE,
};
use crate::medium::InternalObject;
use crate::object::{Buildable, InterfaceObject, PersistentObject, SharedObject};
use crate::scalar::{Scalar, Storable};
use std::sync::Arc;
use uq_core::{Error, Result};

/// Binds a [`StorageManager`] to the node of the object being saved or
/// loaded. All reads and writes go to the manager's medium at that node.
pub struct Advocate<'a> {
    manager: &'a mut StorageManager,
    node: InternalObject,
}

impl<'a> Advocate<'a> {
    pub(crate) fn new(manager: &'a mut StorageManager, node: InternalObject) -> Self {
        Self { manager, node }
    }

    pub fn node(&self) -> InternalObject {
        self.node
    }

    pub fn manager(&self) -> &StorageManager {
        &*self.manager
    }

    fn check_name(name: &str) -> Result<()> {
        if name == CLASS_ATTRIBUTE || name == ID_ATTRIBUTE {
            return Err(Error::InvalidArgument(format!(
                "attribute name {name:?} is reserved"
            )));
        }
        Ok(())
    }

    // Writing

    pub fn save_attribute<T: Storable>(&mut self, name: &str, value: &T) -> Result<()> {
        Self::check_name(name)?;
        self.manager
            .medium_mut()
            .add_attribute(self.node, name, value.to_scalar())
    }

    pub fn save_indexed_value<T: Storable>(&mut self, index: usize, value: &T) -> Result<()> {
        self.manager
            .medium_mut()
            .add_indexed_value(self.node, index, value.to_scalar())
    }

    /// Save a collection as a child node holding `size` and indexed values
    pub fn save_values<T: Storable>(&mut self, name: &str, values: &[T]) -> Result<()> {
        Self::check_name(name)?;
        let medium = self.manager.medium_mut();
        let child = medium.create_object(COLLECTION_TAG)?;
        medium.add_attribute(child, SIZE_ATTRIBUTE, Scalar::Unsigned64(values.len() as u64))?;
        for (index, value) in values.iter().enumerate() {
            medium.add_indexed_value(child, index, value.to_scalar())?;
        }
        medium.add_object_attribute(self.node, name, child)
    }

    /// Save a nested object, or a reference to it if already written
    pub fn save_object_attribute(&mut self, name: &str, value: &dyn PersistentObject) -> Result<()> {
        Self::check_name(name)?;
        let child = self.manager.write_object(value, false)?;
        self.manager
            .medium_mut()
            .add_object_attribute(self.node, name, child)
    }

    pub fn save_indexed_object(&mut self, index: usize, value: &dyn PersistentObject) -> Result<()> {
        let child = self.manager.write_object(value, false)?;
        self.manager
            .medium_mut()
            .add_indexed_object(self.node, index, child)
    }

    /// Save the implementation behind an interface
    pub fn save_interface_attribute(&mut self, name: &str, value: &dyn InterfaceObject) -> Result<()> {
        let implementation = value.implementation();
        self.save_object_attribute(name, implementation.as_ref())
    }

    pub fn set_label(&mut self, label: &str) -> Result<()> {
        self.manager.medium_mut().set_label(self.node, label)
    }

    pub fn set_visibility(&mut self, visible: bool) -> Result<()> {
        self.manager.medium_mut().set_visibility(self.node, visible)
    }

    // Reading

    pub fn has_attribute(&self, name: &str) -> Result<bool> {
        self.manager.medium().has_attribute(self.node, name)
    }

    /// Read `name` into `value`; `value` is left untouched when absent
    pub fn load_attribute<T: Storable>(&mut self, name: &str, value: &mut T) -> Result<()> {
        if let Some(scalar) = self.manager.medium().read_attribute(self.node, name)? {
            *value = T::from_scalar(scalar)?;
        }
        Ok(())
    }

    pub fn load_indexed_value<T: Storable>(&mut self, index: usize, value: &mut T) -> Result<()> {
        if let Some(scalar) = self.manager.medium().read_indexed_value(self.node, index)? {
            *value = T::from_scalar(scalar)?;
        }
        Ok(())
    }

    /// Read a collection written by [`save_values`](Self::save_values)
    pub fn load_values<T: Storable>(&mut self, name: &str, values: &mut Vec<T>) -> Result<()> {
        let medium = self.manager.medium();
        let Some(child) = medium.read_object_attribute(self.node, name)? else {
            return Ok(());
        };
        let size = match medium.read_attribute(child, SIZE_ATTRIBUTE)? {
            Some(scalar) => usize::from_scalar(scalar)?,
            None => {
                return Err(Error::Serialization(format!(
                    "collection {name} has no size"
                )))
            }
        };
        let mut loaded = Vec::with_capacity(size);
        for index in 0..size {
            match medium.read_indexed_value(child, index)? {
                Some(scalar) => loaded.push(T::from_scalar(scalar)?),
                None => {
                    return Err(Error::Serialization(format!(
                        "collection {name} misses entry {index} of {size}"
                    )))
                }
            }
        }
        *values = loaded;
        Ok(())
    }

    /// Rebuild a nested object of known type
    pub fn load_object_attribute<T: Buildable>(&mut self, name: &str) -> Result<Option<Arc<T>>> {
        match self.manager.medium().read_object_attribute(self.node, name)? {
            Some(child) => self.manager.read_typed::<T>(child).map(Some),
            None => Ok(None),
        }
    }

    pub fn load_indexed_object<T: Buildable>(&mut self, index: usize) -> Result<Option<Arc<T>>> {
        match self.manager.medium().read_indexed_object(self.node, index)? {
            Some(child) => self.manager.read_typed::<T>(child).map(Some),
            None => Ok(None),
        }
    }

    /// Rebuild a nested object of any registered class
    pub fn load_shared_attribute(&mut self, name: &str) -> Result<Option<SharedObject>> {
        match self.manager.medium().read_object_attribute(self.node, name)? {
            Some(child) => self.manager.read_shared(child).map(Some),
            None => Ok(None),
        }
    }

    /// Swap the reconstructed implementation into `value`
    pub fn load_interface_attribute(&mut self, name: &str, value: &mut dyn InterfaceObject) -> Result<()> {
        if let Some(implementation) = self.load_shared_attribute(name)? {
            value.set_implementation(implementation)?;
        }
        Ok(())
    }
}
