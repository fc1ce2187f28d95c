//! Parse cache (spec.md §5, §9: "Schema lookup cache").
//!
//! Externally synchronised LRU with optional per-entry TTL, keyed by the
//! raw query string and the schema it was parsed against. It is not part
//! of the core's correctness contract: a cold or expired lookup simply
//! re-parses, it never returns stale or incorrect results.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::ast::AstNode;
use crate::parser::ParseError;

#[derive(Debug, Clone)]
struct Entry {
    ast: AstNode,
    errors: Vec<ParseError>,
    inserted_at: Instant,
}

/// Caches `(query, schema_name) -> (AstNode, ParseError list)` so repeated
/// queries against the same schema skip the lex/parse pass.
pub struct ParseCache {
    entries: Mutex<LruCache<(String, String), Entry>>,
    ttl: Option<Duration>,
}

impl ParseCache {
    /// `capacity` is the maximum number of entries retained; `ttl`, if
    /// set, expires an entry after it has aged past the duration even if
    /// it is still within capacity.
    #[must_use]
    pub fn new(capacity: NonZeroUsize, ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Returns a cached parse for `(query, schema_name)`, if present and
    /// not expired. A stale entry is evicted, not returned.
    #[must_use]
    pub fn get(&self, query: &str, schema_name: &str) -> Option<(AstNode, Vec<ParseError>)> {
        let key = (query.to_string(), schema_name.to_string());
        let mut entries = self.entries.lock().expect("parse cache lock poisoned");

        let expired = match (entries.peek(&key), self.ttl) {
            (Some(entry), Some(ttl)) => entry.inserted_at.elapsed() > ttl,
            _ => false,
        };
        if expired {
            entries.pop(&key);
            return None;
        }

        entries.get(&key).map(|entry| (entry.ast.clone(), entry.errors.clone()))
    }

    /// Inserts (or replaces) the cached parse for `(query, schema_name)`.
    pub fn insert(&self, query: &str, schema_name: &str, ast: AstNode, errors: Vec<ParseError>) {
        let key = (query.to_string(), schema_name.to_string());
        let entry = Entry {
            ast,
            errors,
            inserted_at: Instant::now(),
        };
        self.entries.lock().expect("parse cache lock poisoned").put(key, entry);
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.lock().expect("parse cache lock poisoned").clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("parse cache lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn sample_ast() -> AstNode {
        AstNode::TermQuery {
            term: "foo".to_string(),
            position: Position::start(),
        }
    }

    #[test]
    fn stores_and_retrieves_by_query_and_schema() {
        let cache = ParseCache::new(NonZeroUsize::new(4).unwrap(), None);
        cache.insert("foo", "products", sample_ast(), Vec::new());
        assert!(cache.get("foo", "products").is_some());
        assert!(cache.get("foo", "other_schema").is_none());
    }

    #[test]
    fn evicts_least_recently_used_beyond_capacity() {
        let cache = ParseCache::new(NonZeroUsize::new(1).unwrap(), None);
        cache.insert("a", "s", sample_ast(), Vec::new());
        cache.insert("b", "s", sample_ast(), Vec::new());
        assert!(cache.get("a", "s").is_none());
        assert!(cache.get("b", "s").is_some());
    }

    #[test]
    fn expired_entry_is_evicted_on_access() {
        let cache = ParseCache::new(NonZeroUsize::new(4).unwrap(), Some(Duration::from_millis(1)));
        cache.insert("foo", "products", sample_ast(), Vec::new());
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("foo", "products").is_none());
        assert!(cache.is_empty());
    }
}
