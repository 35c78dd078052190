//! Medium-agnostic save/load engine
//!
//! The [`StorageManager`] walks the object graph, asks each object to write
//! itself through an [`Advocate`], and keeps the set of identities already
//! written so that an object reachable from several parents is stored once.
//! Later encounters produce a reference node that only carries the id; on
//! load, references resolve to the instance rebuilt earlier in the pass.

use crate::advocate::Advocate;
use crate::catalog::Catalog;
use crate::medium::{InternalObject, Medium};
use crate::object::{downcast_shared, Buildable, PersistentObject, SharedObject};
use crate::scalar::{Scalar, Storable};
use crate::study::Study;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};
use uq_core::{Error, Id, Result};
use uuid::Uuid;

/// Study version written and accepted by default
pub const DEFAULT_STUDY_VERSION: u32 = 1;

pub(crate) const OBJECT_TAG: &str = "object";
pub(crate) const REFERENCE_TAG: &str = "reference";
pub(crate) const COLLECTION_TAG: &str = "collection";
pub(crate) const CLASS_ATTRIBUTE: &str = "class";
pub(crate) const ID_ATTRIBUTE: &str = "id";
pub(crate) const SIZE_ATTRIBUTE: &str = "size";

/// Save/load engine bound to one medium
#[derive(Debug)]
pub struct StorageManager {
    medium: Box<dyn Medium>,
    catalog: Catalog,
    default_version: u32,
    version: u32,
    saved_objects: HashSet<Id>,
    /// Marking order, to roll back the marks of a failed save
    saved_order: Vec<Id>,
    /// Objects whose body is being written
    in_progress: HashSet<Id>,
    loaded_objects: HashMap<Id, SharedObject>,
    pass_id: Uuid,
}

impl StorageManager {
    /// Manager handling [`DEFAULT_STUDY_VERSION`]
    pub fn new(medium: impl Medium + 'static) -> Self {
        Self::with_version(medium, DEFAULT_STUDY_VERSION)
    }

    /// Manager handling exactly `default_version`
    pub fn with_version(medium: impl Medium + 'static, default_version: u32) -> Self {
        Self {
            medium: Box::new(medium),
            catalog: Catalog::with_builtins(),
            default_version,
            version: default_version,
            saved_objects: HashSet::new(),
            saved_order: Vec::new(),
            in_progress: HashSet::new(),
            loaded_objects: HashMap::new(),
            pass_id: Uuid::new_v4(),
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.medium.class_name()
    }

    pub fn medium(&self) -> &dyn Medium {
        self.medium.as_ref()
    }

    pub fn medium_mut(&mut self) -> &mut dyn Medium {
        self.medium.as_mut()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Make `T` loadable by class name
    pub fn register<T: Buildable>(&mut self) {
        self.catalog.register::<T>();
    }

    /// Identifier of the current (or last) save pass, for log correlation
    pub fn pass_id(&self) -> Uuid {
        self.pass_id
    }

    /// Current state of the medium
    pub fn state(&self) -> InternalObject {
        self.medium.state()
    }

    // Study versions

    /// Version of the study that the manager can read/write
    pub fn default_study_version(&self) -> u32 {
        self.default_version
    }

    pub fn study_version(&self) -> u32 {
        self.version
    }

    /// Only the default version is supported
    pub fn can_manage_version(&self, version: u32) -> bool {
        version == self.default_version
    }

    pub fn set_study_version(&mut self, version: u32) -> Result<()> {
        if !self.can_manage_version(version) {
            return Err(Error::unsupported_version(version));
        }
        self.version = version;
        Ok(())
    }

    // Saved objects

    /// Whether `id` has been written during the current pass
    pub fn is_saved_object(&self, id: Id) -> bool {
        self.saved_objects.contains(&id)
    }

    pub fn mark_object_as_saved(&mut self, id: Id) {
        if self.saved_objects.insert(id) {
            self.saved_order.push(id);
        }
    }

    /// Forget every saved identity; required before an independent pass
    pub fn clean_saved_objects(&mut self) {
        self.saved_objects.clear();
        self.saved_order.clear();
    }

    fn forget_saved_since(&mut self, checkpoint: usize) {
        for id in self.saved_order.drain(checkpoint..) {
            self.saved_objects.remove(&id);
        }
    }

    pub fn saved_object_count(&self) -> usize {
        self.saved_objects.len()
    }

    // Administrative hooks

    pub fn initialize_save(&mut self) -> Result<()> {
        self.pass_id = Uuid::new_v4();
        self.medium.initialize_save()?;
        self.medium.set_study_version(self.version)
    }

    pub fn initialize_load(&mut self) -> Result<()> {
        self.loaded_objects.clear();
        self.medium.initialize_load()
    }

    pub fn finalize_save(&mut self) -> Result<()> {
        self.medium.finalize_save()
    }

    pub fn finalize_load(&mut self) -> Result<()> {
        self.loaded_objects.clear();
        self.medium.finalize_load()
    }

    /// Read the physical medium
    pub fn read(&mut self) -> Result<()> {
        self.medium.read()
    }

    /// Flush the internal representation to the physical medium
    pub fn write(&mut self) -> Result<()> {
        self.medium.write()
    }

    // Object registration

    /// Create the node of `obj` and return an advocate scoped to it
    pub fn register_object(
        &mut self,
        obj: &dyn PersistentObject,
        from_study: bool,
    ) -> Result<Advocate<'_>> {
        let node = self.create_node(OBJECT_TAG, obj)?;
        if from_study {
            self.medium.append_object(node)?;
        }
        Ok(Advocate::new(self, node))
    }

    /// Advocate reading the object stored at `node`
    pub fn read_object(&mut self, node: InternalObject) -> Advocate<'_> {
        Advocate::new(self, node)
    }

    fn create_node(&mut self, tag: &str, obj: &dyn PersistentObject) -> Result<InternalObject> {
        let node = self.medium.create_object(tag)?;
        self.medium.add_attribute(
            node,
            CLASS_ATTRIBUTE,
            Scalar::String(obj.class_name().to_string()),
        )?;
        self.medium
            .add_attribute(node, ID_ATTRIBUTE, Scalar::Unsigned64(obj.id()))?;
        Ok(node)
    }

    /// Write `obj` unless already written, in which case write a reference
    ///
    /// The object is marked as saved, and appended to the top-level objects
    /// when `from_study` is set, only once its own save succeeded. A failure
    /// also forgets the sub-objects marked while writing it.
    pub(crate) fn write_object(
        &mut self,
        obj: &dyn PersistentObject,
        from_study: bool,
    ) -> Result<InternalObject> {
        let id = obj.id();
        if self.is_saved_object(id) || self.in_progress.contains(&id) {
            debug!(pass = %self.pass_id, class = obj.class_name(), id, "writing reference");
            let node = self.create_node(REFERENCE_TAG, obj)?;
            if from_study {
                self.medium.append_object(node)?;
            }
            return Ok(node);
        }

        let checkpoint = self.saved_order.len();
        self.in_progress.insert(id);
        let outcome = self.write_body(obj);
        self.in_progress.remove(&id);
        match outcome {
            Ok(node) => {
                self.mark_object_as_saved(id);
                if from_study {
                    self.medium.append_object(node)?;
                }
                Ok(node)
            }
            Err(err) => {
                self.forget_saved_since(checkpoint);
                Err(err)
            }
        }
    }

    fn write_body(&mut self, obj: &dyn PersistentObject) -> Result<InternalObject> {
        let node = self.create_node(OBJECT_TAG, obj)?;
        obj.save(&mut self.read_object(node))?;
        Ok(node)
    }

    // Save/load passes

    /// Save `obj` onto the medium
    ///
    /// With the `saveload-checking` feature, a failure is logged with the
    /// object's class name and swallowed so that the enclosing pass goes on.
    pub fn save(
        &mut self,
        obj: &dyn PersistentObject,
        label: Option<&str>,
        from_study: bool,
    ) -> Result<()> {
        self.save_checked(obj, label, true, from_study)
    }

    pub(crate) fn save_entry(
        &mut self,
        obj: &dyn PersistentObject,
        label: Option<&str>,
        visible: bool,
    ) -> Result<()> {
        self.save_checked(obj, label, visible, true)
    }

    fn save_checked(
        &mut self,
        obj: &dyn PersistentObject,
        label: Option<&str>,
        visible: bool,
        from_study: bool,
    ) -> Result<()> {
        let outcome = self.save_labeled(obj, label, visible, from_study);
        #[cfg(feature = "saveload-checking")]
        {
            if let Err(err) = &outcome {
                tracing::error!(pass = %self.pass_id, "When saving {} : {}", obj.class_name(), err);
                return Ok(());
            }
        }
        outcome
    }

    fn save_labeled(
        &mut self,
        obj: &dyn PersistentObject,
        label: Option<&str>,
        visible: bool,
        from_study: bool,
    ) -> Result<()> {
        let node = self.write_object(obj, from_study)?;
        if let Some(label) = label {
            self.medium.set_label(node, label)?;
        }
        if from_study {
            self.medium.set_visibility(node, visible)?;
        }
        Ok(())
    }

    /// Rebuild the content of the medium into `study`
    #[instrument(skip_all, fields(medium = self.class_name()))]
    pub fn load(&mut self, study: &mut Study) -> Result<()> {
        self.initialize_load()?;
        self.read()?;
        if let Some(version) = self.medium.study_version()? {
            self.set_study_version(version)?;
        }

        let roots = self.medium.root_objects()?;
        debug!(objects = roots.len(), "loading study");
        for node in roots {
            let object = self.read_shared(node)?;
            let id = object.id();
            let label = self.medium.label(node)?;
            let visible = self.medium.visibility(node)?.unwrap_or(true);
            study.add(object);
            if let Some(label) = label {
                study.define_label(id, &label)?;
            }
            study.define_visibility(id, visible)?;
        }
        self.finalize_load()
    }

    fn stored_id(&self, node: InternalObject) -> Result<Id> {
        match self.medium.read_attribute(node, ID_ATTRIBUTE)? {
            Some(scalar) => Id::from_scalar(scalar),
            None => Err(Error::Serialization("object node without id".to_string())),
        }
    }

    fn stored_class(&self, node: InternalObject) -> Result<String> {
        match self.medium.read_attribute(node, CLASS_ATTRIBUTE)? {
            Some(scalar) => String::from_scalar(scalar),
            None => Err(Error::Serialization("object node without class".to_string())),
        }
    }

    fn resolve_reference(&self, node: InternalObject) -> Result<Option<SharedObject>> {
        let tag = self.medium.object_tag(node)?;
        if tag.as_deref() != Some(REFERENCE_TAG) {
            return Ok(None);
        }
        let id = self.stored_id(node)?;
        self.loaded_objects.get(&id).cloned().map(Some).ok_or_else(|| {
            Error::Internal(format!("reference to object {id} precedes its definition"))
        })
    }

    /// Rebuild the object at `node`, whatever its class
    pub(crate) fn read_shared(&mut self, node: InternalObject) -> Result<SharedObject> {
        if let Some(object) = self.resolve_reference(node)? {
            return Ok(object);
        }
        let stored_id = self.stored_id(node)?;
        let class = self.stored_class(node)?;
        let mut object = self.catalog.build(&class)?;
        object.load(&mut self.read_object(node))?;
        let shared: SharedObject = Arc::from(object);
        self.loaded_objects.insert(stored_id, Arc::clone(&shared));
        Ok(shared)
    }

    /// Rebuild the object at `node` as a `T`
    pub(crate) fn read_typed<T: Buildable>(&mut self, node: InternalObject) -> Result<Arc<T>> {
        if let Some(object) = self.resolve_reference(node)? {
            let class = object.class_name();
            return downcast_shared::<T>(object).ok_or_else(|| {
                Error::Serialization(format!("expected {}, found {class}", T::CLASS_NAME))
            });
        }
        let stored_id = self.stored_id(node)?;
        let class = self.stored_class(node)?;
        if class != T::CLASS_NAME {
            return Err(Error::Serialization(format!(
                "expected {}, found {class}",
                T::CLASS_NAME
            )));
        }
        let mut object = T::default();
        object.load(&mut self.read_object(node))?;
        let object = Arc::new(object);
        self.loaded_objects.insert(stored_id, object.clone());
        Ok(object)
    }
}
