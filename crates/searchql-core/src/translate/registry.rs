//! A keyed factory registry for [`Translator`] instances (spec.md §4.5).
//!
//! Translators carry per-call mutable state, so the registry hands out a
//! fresh instance per lookup rather than sharing one behind a lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::Translator;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("translator key must not be empty")]
    EmptyKey,
    #[error("translator {0:?} is already registered")]
    DuplicateKey(String),
}

pub type TranslatorFactory = Arc<dyn Fn() -> Box<dyn Translator> + Send + Sync>;

/// Maps a dialect key (`"postgres"`, `"mysql"`, `"sqlite"`, `"document"`, or
/// a caller-defined name) to a factory that builds a fresh [`Translator`].
#[derive(Default)]
pub struct TranslatorRegistry {
    factories: RwLock<HashMap<String, TranslatorFactory>>,
}

impl TranslatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry pre-populated with the four built-in dialects.
    #[must_use]
    pub fn with_builtin_dialects() -> Self {
        let registry = Self::new();
        registry
            .register("postgres", || Box::new(super::PostgresTranslator::new()))
            .expect("builtin key is non-empty and unique");
        registry
            .register("mysql", || Box::new(super::MySqlTranslator::new()))
            .expect("builtin key is non-empty and unique");
        registry
            .register("sqlite", || Box::new(super::SqliteTranslator::new()))
            .expect("builtin key is non-empty and unique");
        registry
            .register("document", || Box::new(super::DocumentTranslator::new()))
            .expect("builtin key is non-empty and unique");
        registry
    }

    pub fn register<F>(&self, key: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Translator> + Send + Sync + 'static,
    {
        let key = key.into();
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        let mut factories = self.factories.write().expect("translator registry lock poisoned");
        if factories.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        tracing::info!(dialect = %key, "registered translator");
        factories.insert(key, Arc::new(factory));
        Ok(())
    }

    pub fn remove(&self, key: &str) -> bool {
        let removed = self
            .factories
            .write()
            .expect("translator registry lock poisoned")
            .remove(key)
            .is_some();
        if removed {
            tracing::info!(dialect = %key, "removed translator");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Box<dyn Translator>> {
        let factories = self.factories.read().expect("translator registry lock poisoned");
        factories.get(key).map(|factory| factory())
    }

    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let factories = self.factories.read().expect("translator registry lock poisoned");
        let mut keys: Vec<String> = factories.keys().cloned().collect();
        keys.sort();
        keys
    }
}
