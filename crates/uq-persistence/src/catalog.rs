//! Class-name registry used for polymorphic reconstruction

use crate::object::{Buildable, PersistentObject};
use std::collections::HashMap;
use std::fmt;
use uq_core::{Error, Interval, Result, Sample};

type Builder = fn() -> Box<dyn PersistentObject>;

fn build_default<T: Buildable>() -> Box<dyn PersistentObject> {
    Box::new(T::default())
}

/// Maps class names to default constructors
#[derive(Clone, Default)]
pub struct Catalog {
    builders: HashMap<&'static str, Builder>,
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog knowing the core containers
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register::<Interval>();
        catalog.register::<Sample>();
        catalog
    }

    pub fn register<T: Buildable>(&mut self) {
        self.builders.insert(T::CLASS_NAME, build_default::<T>);
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.builders.contains_key(class_name)
    }

    /// Default instance of `class_name`, to be filled by `load`
    pub fn build(&self, class_name: &str) -> Result<Box<dyn PersistentObject>> {
        self.builders
            .get(class_name)
            .map(|build| build())
            .ok_or_else(|| {
                Error::InvalidArgument(format!("No factory registered for class {class_name}"))
            })
    }

    /// Registered class names, sorted
    pub fn class_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builders.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("classes", &self.class_names())
            .finish()
    }
}
