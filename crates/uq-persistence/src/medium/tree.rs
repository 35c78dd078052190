//! Document-tree media
//!
//! Nodes live in an arena inside a [`Document`]; handles are arena indices.
//! Where the document goes between passes is decided by a [`Backing`]: kept
//! in memory, or written to a JSON file.

use super::{InternalObject, Medium};
use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use uq_core::{Error, Result};

/// One persisted object, collection or reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Scalar>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexed: BTreeMap<usize, Scalar>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indexed_children: BTreeMap<usize, usize>,
}

/// Whole content of a tree medium
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub roots: Vec<usize>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Document {
    /// Number of nodes carrying `tag`
    pub fn count_tag(&self, tag: &str) -> usize {
        self.nodes.iter().filter(|n| n.tag == tag).count()
    }

    fn node(&self, obj: InternalObject) -> Result<&Node> {
        let index = Self::index_of(obj)?;
        self.nodes
            .get(index)
            .ok_or_else(|| Error::Internal(format!("node {index} does not exist")))
    }

    fn node_mut(&mut self, obj: InternalObject) -> Result<&mut Node> {
        let index = Self::index_of(obj)?;
        self.nodes
            .get_mut(index)
            .ok_or_else(|| Error::Internal(format!("node {index} does not exist")))
    }

    fn index_of(obj: InternalObject) -> Result<usize> {
        obj.index().ok_or_else(|| {
            Error::Internal("placeholder handle used with a document medium".to_string())
        })
    }

    fn check(&self, obj: InternalObject) -> Result<usize> {
        self.node(obj)?;
        Self::index_of(obj)
    }
}

/// Where a [`TreeMedium`] keeps its document between passes
pub trait Backing: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Fetch the last stored document, `None` when nothing was stored
    fn fetch(&mut self) -> Result<Option<Document>>;

    fn store(&mut self, document: &Document) -> Result<()>;
}

/// Keeps the written document in memory
#[derive(Debug, Default, Clone)]
pub struct InMemory {
    stored: Option<Document>,
}

impl Backing for InMemory {
    fn name(&self) -> &'static str {
        "MemoryMedium"
    }

    fn fetch(&mut self) -> Result<Option<Document>> {
        Ok(self.stored.clone())
    }

    fn store(&mut self, document: &Document) -> Result<()> {
        self.stored = Some(document.clone());
        Ok(())
    }
}

/// Writes the document as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl Backing for JsonFile {
    fn name(&self) -> &'static str {
        "JsonMedium"
    }

    fn fetch(&mut self) -> Result<Option<Document>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let document = serde_json::from_reader(reader).map_err(|e| {
            Error::Serialization(format!("cannot parse {}: {e}", self.path.display()))
        })?;
        Ok(Some(document))
    }

    fn store(&mut self, document: &Document) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, document).map_err(|e| {
            Error::Serialization(format!("cannot write {}: {e}", self.path.display()))
        })?;
        writer.flush()?;
        Ok(())
    }
}

/// Medium storing objects as a tree of [`Node`]s
#[derive(Debug, Default)]
pub struct TreeMedium<B: Backing> {
    backing: B,
    document: Document,
}

/// In-memory document medium
pub type MemoryMedium = TreeMedium<InMemory>;

/// JSON file medium
pub type JsonMedium = TreeMedium<JsonFile>;

impl TreeMedium<InMemory> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TreeMedium<JsonFile> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            backing: JsonFile { path: path.into() },
            document: Document::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.backing.path
    }
}

impl<B: Backing> TreeMedium<B> {
    /// Working document of the current pass
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl<B: Backing> Medium for TreeMedium<B> {
    fn class_name(&self) -> &'static str {
        self.backing.name()
    }

    fn initialize_save(&mut self) -> Result<()> {
        self.document = Document::default();
        Ok(())
    }

    fn read(&mut self) -> Result<()> {
        self.document = self.backing.fetch()?.unwrap_or_default();
        debug!(
            medium = self.backing.name(),
            nodes = self.document.nodes.len(),
            "document read"
        );
        Ok(())
    }

    fn write(&mut self) -> Result<()> {
        self.backing.store(&self.document)?;
        debug!(
            medium = self.backing.name(),
            nodes = self.document.nodes.len(),
            "document written"
        );
        Ok(())
    }

    fn create_object(&mut self, tag: &str) -> Result<InternalObject> {
        self.document.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        Ok(InternalObject::from_index(self.document.nodes.len() - 1))
    }

    fn append_object(&mut self, obj: InternalObject) -> Result<()> {
        let index = self.document.check(obj)?;
        self.document.roots.push(index);
        Ok(())
    }

    fn root_objects(&self) -> Result<Vec<InternalObject>> {
        Ok(self
            .document
            .roots
            .iter()
            .map(|&i| InternalObject::from_index(i))
            .collect())
    }

    fn object_tag(&self, obj: InternalObject) -> Result<Option<String>> {
        Ok(Some(self.document.node(obj)?.tag.clone()))
    }

    fn has_attribute(&self, obj: InternalObject, name: &str) -> Result<bool> {
        let node = self.document.node(obj)?;
        Ok(node.attributes.contains_key(name) || node.children.contains_key(name))
    }

    fn add_attribute(&mut self, obj: InternalObject, name: &str, value: Scalar) -> Result<()> {
        self.document
            .node_mut(obj)?
            .attributes
            .insert(name.to_string(), value);
        Ok(())
    }

    fn add_indexed_value(&mut self, obj: InternalObject, index: usize, value: Scalar) -> Result<()> {
        self.document.node_mut(obj)?.indexed.insert(index, value);
        Ok(())
    }

    fn add_object_attribute(
        &mut self,
        obj: InternalObject,
        name: &str,
        child: InternalObject,
    ) -> Result<()> {
        let child = self.document.check(child)?;
        self.document
            .node_mut(obj)?
            .children
            .insert(name.to_string(), child);
        Ok(())
    }

    fn add_indexed_object(
        &mut self,
        obj: InternalObject,
        index: usize,
        child: InternalObject,
    ) -> Result<()> {
        let child = self.document.check(child)?;
        self.document
            .node_mut(obj)?
            .indexed_children
            .insert(index, child);
        Ok(())
    }

    fn read_attribute(&self, obj: InternalObject, name: &str) -> Result<Option<Scalar>> {
        Ok(self.document.node(obj)?.attributes.get(name).cloned())
    }

    fn read_indexed_value(&self, obj: InternalObject, index: usize) -> Result<Option<Scalar>> {
        Ok(self.document.node(obj)?.indexed.get(&index).cloned())
    }

    fn read_object_attribute(&self, obj: InternalObject, name: &str) -> Result<Option<InternalObject>> {
        Ok(self
            .document
            .node(obj)?
            .children
            .get(name)
            .map(|&i| InternalObject::from_index(i)))
    }

    fn read_indexed_object(&self, obj: InternalObject, index: usize) -> Result<Option<InternalObject>> {
        Ok(self
            .document
            .node(obj)?
            .indexed_children
            .get(&index)
            .map(|&i| InternalObject::from_index(i)))
    }

    fn set_label(&mut self, obj: InternalObject, label: &str) -> Result<()> {
        self.document.node_mut(obj)?.label = Some(label.to_string());
        Ok(())
    }

    fn label(&self, obj: InternalObject) -> Result<Option<String>> {
        Ok(self.document.node(obj)?.label.clone())
    }

    fn set_visibility(&mut self, obj: InternalObject, visible: bool) -> Result<()> {
        self.document.node_mut(obj)?.visible = Some(visible);
        Ok(())
    }

    fn visibility(&self, obj: InternalObject) -> Result<Option<bool>> {
        Ok(self.document.node(obj)?.visible)
    }

    fn set_study_version(&mut self, version: u32) -> Result<()> {
        self.document.version = Some(version);
        Ok(())
    }

    fn study_version(&self) -> Result<Option<u32>> {
        Ok(self.document.version)
    }
}
