//! Top-level registry of labeled persistent objects

use crate::manager::StorageManager;
use crate::object::{downcast_shared, PersistentObject, SharedObject};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use uq_core::{Error, Id, Result};

/// An object registered in a [`Study`]
#[derive(Debug, Clone)]
pub struct StudyEntry {
    pub object: SharedObject,
    pub label: Option<String>,
    pub visible: bool,
}

/// Ordered collection of shared objects, optionally labeled
///
/// A study is what gets saved and loaded as a whole. Objects keep their
/// insertion order; labels are unique.
#[derive(Debug, Default)]
pub struct Study {
    entries: Vec<StudyEntry>,
    labels: HashMap<String, Id>,
}

impl Study {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &StudyEntry> {
        self.entries.iter()
    }

    fn position(&self, id: Id) -> Option<usize> {
        self.entries.iter().position(|e| e.object.id() == id)
    }

    /// Register an unlabeled, visible object; adding it twice is a no-op
    pub fn add(&mut self, object: SharedObject) -> Id {
        let id = object.id();
        if self.position(id).is_none() {
            self.entries.push(StudyEntry {
                object,
                label: None,
                visible: true,
            });
        }
        id
    }

    /// Register an object under `label`
    ///
    /// An existing label is only replaced when `force` is set.
    pub fn add_labeled(&mut self, label: &str, object: SharedObject, force: bool) -> Result<Id> {
        if self.has_label(label) {
            if !force {
                return Err(Error::InvalidArgument(format!(
                    "Label {label} already defined in study. Use force to overwrite"
                )));
            }
            self.remove(label);
        }
        let id = self.add(object);
        self.define_label(id, label)?;
        Ok(id)
    }

    /// Remove the object labeled `label`
    pub fn remove(&mut self, label: &str) -> Option<SharedObject> {
        let id = self.labels.remove(label)?;
        let index = self.position(id)?;
        Some(self.entries.remove(index).object)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    pub fn has_object(&self, id: Id) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, label: &str) -> Option<SharedObject> {
        self.labels.get(label).and_then(|&id| self.get_by_id(id))
    }

    /// Labeled object as its concrete type
    pub fn get_as<T: PersistentObject>(&self, label: &str) -> Option<Arc<T>> {
        self.get(label).and_then(downcast_shared::<T>)
    }

    pub fn get_by_id(&self, id: Id) -> Option<SharedObject> {
        self.position(id).map(|i| Arc::clone(&self.entries[i].object))
    }

    /// Label the object `id`, replacing any label it had
    pub fn define_label(&mut self, id: Id, label: &str) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::InvalidArgument(format!("No object {id} in study")))?;
        match self.labels.get(label) {
            Some(&owner) if owner != id => {
                return Err(Error::InvalidArgument(format!(
                    "Label {label} already used by object {owner}"
                )));
            }
            _ => {}
        }
        if let Some(previous) = self.entries[index].label.replace(label.to_string()) {
            self.labels.remove(&previous);
        }
        self.labels.insert(label.to_string(), id);
        Ok(())
    }

    pub fn define_visibility(&mut self, id: Id, visible: bool) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::InvalidArgument(format!("No object {id} in study")))?;
        self.entries[index].visible = visible;
        Ok(())
    }

    pub fn is_visible(&self, id: Id) -> Option<bool> {
        self.position(id).map(|i| self.entries[i].visible)
    }

    /// Labels in use, sorted
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.labels.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.labels.clear();
    }

    /// Save every object of the study through `manager`
    #[instrument(skip_all, fields(objects = self.len(), medium = manager.class_name()))]
    pub fn save(&self, manager: &mut StorageManager) -> Result<()> {
        manager.clean_saved_objects();
        manager.initialize_save()?;
        for entry in &self.entries {
            manager.save_entry(entry.object.as_ref(), entry.label.as_deref(), entry.visible)?;
        }
        manager.finalize_save()?;
        manager.write()?;
        debug!(pass = %manager.pass_id(), saved = manager.saved_object_count(), "study saved");
        Ok(())
    }

    /// Replace the content of the study by what `manager` reads
    #[instrument(skip_all, fields(medium = manager.class_name()))]
    pub fn load(&mut self, manager: &mut StorageManager) -> Result<()> {
        self.clear();
        manager.load(self)?;
        debug!(objects = self.len(), "study loaded");
        Ok(())
    }
}
