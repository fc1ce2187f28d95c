//! Thread-safe schema lookup by name.
//!
//! Modeled only as a lookup, per the system this core sits inside:
//! persistence, reload-from-disk, and admin APIs live outside this crate.
//! `get` takes the read lock so concurrent translations never block each
//! other; `register`/`remove` take the write lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::Schema;

/// A registry mapping schema name to an immutable, shared [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a schema, replacing any previous schema with the same
    /// name and returning it.
    pub fn register(&self, schema: Schema) -> Option<Arc<Schema>> {
        let name = schema.name().to_string();
        let mut schemas = self.schemas.write().expect("schema registry lock poisoned");
        let previous = schemas.insert(name.clone(), Arc::new(schema));
        tracing::info!(schema = %name, "registered schema");
        previous
    }

    /// Looks up a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        let schemas = self.schemas.read().expect("schema registry lock poisoned");
        schemas.get(name).cloned()
    }

    /// Removes a schema by name, returning it if it existed.
    pub fn remove(&self, name: &str) -> Option<Arc<Schema>> {
        let mut schemas = self.schemas.write().expect("schema registry lock poisoned");
        let removed = schemas.remove(name);
        if removed.is_some() {
            tracing::info!(schema = %name, "removed schema");
        }
        removed
    }

    /// Names of every registered schema.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let schemas = self.schemas.read().expect("schema registry lock poisoned");
        schemas.keys().cloned().collect()
    }
}
