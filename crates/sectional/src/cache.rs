// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Parsed schema caching.
//!
//! Parsing is a pure function of the template source, so a parsed schema can
//! be reused for any later request with byte-identical source. The cache is
//! owned by the caller; nothing in this crate holds one implicitly.
//!
//! ```
//! use sectional::SchemaCache;
//!
//! let cache = SchemaCache::new(64);
//! let source = r#"{% schema %}{"name":"Hero"}{% endschema %}"#;
//! let first = cache.get_or_parse(source).unwrap();
//! let second = cache.get_or_parse(source).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&first, &second));
//! ```

use crate::schema::parse_schema;
use crate::types::SchemaDefinition;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Hex SHA-256 digest of a template source, used as the cache key.
pub fn source_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-memory LRU cache of parsed schemas keyed by source hash.
///
/// Sources without a schema (or with a malformed one) are cached as `None`
/// too, so they are not re-parsed either. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct SchemaCache {
    cache: Arc<Mutex<LruCache<String, Option<Arc<SchemaDefinition>>>>>,
}

impl SchemaCache {
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Returns the cached schema for `source`, parsing it on a miss.
    ///
    /// A poisoned lock degrades to an uncached parse.
    pub fn get_or_parse(&self, source: &str) -> Option<Arc<SchemaDefinition>> {
        let key = source_hash(source);

        let Ok(mut cache) = self.cache.lock() else {
            warn!("Schema cache lock poisoned, parsing without cache");
            return parse_schema(source).map(Arc::new);
        };

        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }

        let parsed = parse_schema(source).map(Arc::new);
        cache.put(key, parsed.clone());
        parsed
    }

    /// True when `source` has an entry.
    pub fn contains(&self, source: &str) -> bool {
        let key = source_hash(source);
        self.cache.lock().map(|cache| cache.contains(&key)).unwrap_or(false)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    /// True when the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(128)
    }
}
