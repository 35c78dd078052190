//! Storage media
//!
//! A [`Medium`] is the physical side of persistence: a DOM, a file, a
//! buffer. The trait is the complete capability surface any backend may
//! provide. Every method has a default, and the defaults do nothing, so a
//! backend only overrides the subset it supports. [`NullMedium`] keeps all
//! the defaults.

mod tree;

pub use tree::{Backing, Document, InMemory, JsonFile, JsonMedium, MemoryMedium, Node, TreeMedium};

use crate::scalar::Scalar;
use std::fmt;
use uq_core::{Error, Result};

/// Opaque handle on a node of a medium
///
/// Only the medium that produced a handle knows what it designates. The
/// placeholder is what no-op media hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InternalObject(Option<usize>);

impl InternalObject {
    pub const fn placeholder() -> Self {
        Self(None)
    }

    pub const fn from_index(index: usize) -> Self {
        Self(Some(index))
    }

    pub fn index(&self) -> Option<usize> {
        self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.is_none()
    }
}

/// Capability interface of a storage backend
#[allow(unused_variables)]
pub trait Medium: fmt::Debug {
    /// Name used in diagnostics
    fn class_name(&self) -> &'static str {
        "Medium"
    }

    /// Administrative work before a save pass
    fn initialize_save(&mut self) -> Result<()> {
        Ok(())
    }

    /// Administrative work before a load pass
    fn initialize_load(&mut self) -> Result<()> {
        Ok(())
    }

    /// Administrative work after a save pass
    fn finalize_save(&mut self) -> Result<()> {
        Ok(())
    }

    /// Administrative work after a load pass
    fn finalize_load(&mut self) -> Result<()> {
        Ok(())
    }

    /// Read the physical medium and build the internal representation
    fn read(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write the internal representation to the physical medium
    fn write(&mut self) -> Result<()> {
        Ok(())
    }

    /// Current position of the medium, for those having one
    fn state(&self) -> InternalObject {
        InternalObject::placeholder()
    }

    /// Create a new empty node that will gather the saved information
    fn create_object(&mut self, tag: &str) -> Result<InternalObject> {
        Ok(InternalObject::placeholder())
    }

    /// Append a node to the collection of top-level objects
    fn append_object(&mut self, obj: InternalObject) -> Result<()> {
        Ok(())
    }

    /// Top-level nodes, in save order
    fn root_objects(&self) -> Result<Vec<InternalObject>> {
        Ok(Vec::new())
    }

    /// Tag given to a node at creation
    fn object_tag(&self, obj: InternalObject) -> Result<Option<String>> {
        Ok(None)
    }

    fn has_attribute(&self, obj: InternalObject, name: &str) -> Result<bool> {
        Err(Error::not_yet_implemented(self.class_name(), "has_attribute"))
    }

    fn add_attribute(&mut self, obj: InternalObject, name: &str, value: Scalar) -> Result<()> {
        Ok(())
    }

    fn add_indexed_value(&mut self, obj: InternalObject, index: usize, value: Scalar) -> Result<()> {
        Ok(())
    }

    /// Attach `child` to `obj` under `name`
    fn add_object_attribute(
        &mut self,
        obj: InternalObject,
        name: &str,
        child: InternalObject,
    ) -> Result<()> {
        Ok(())
    }

    /// Attach `child` to `obj` at `index`
    fn add_indexed_object(
        &mut self,
        obj: InternalObject,
        index: usize,
        child: InternalObject,
    ) -> Result<()> {
        Ok(())
    }

    fn read_attribute(&self, obj: InternalObject, name: &str) -> Result<Option<Scalar>> {
        Ok(None)
    }

    fn read_indexed_value(&self, obj: InternalObject, index: usize) -> Result<Option<Scalar>> {
        Ok(None)
    }

    fn read_object_attribute(&self, obj: InternalObject, name: &str) -> Result<Option<InternalObject>> {
        Ok(None)
    }

    fn read_indexed_object(&self, obj: InternalObject, index: usize) -> Result<Option<InternalObject>> {
        Ok(None)
    }

    fn set_label(&mut self, obj: InternalObject, label: &str) -> Result<()> {
        Ok(())
    }

    fn label(&self, obj: InternalObject) -> Result<Option<String>> {
        Ok(None)
    }

    fn set_visibility(&mut self, obj: InternalObject, visible: bool) -> Result<()> {
        Ok(())
    }

    fn visibility(&self, obj: InternalObject) -> Result<Option<bool>> {
        Ok(None)
    }

    /// Record the study version in the medium
    fn set_study_version(&mut self, version: u32) -> Result<()> {
        Ok(())
    }

    /// Study version found in the medium, if it stores one
    fn study_version(&self) -> Result<Option<u32>> {
        Ok(None)
    }
}

/// Medium that accepts everything and stores nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMedium;

impl Medium for NullMedium {
    fn class_name(&self) -> &'static str {
        "NullMedium"
    }
}
