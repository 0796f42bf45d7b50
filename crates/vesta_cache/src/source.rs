//! Cache of parsed source files keyed by content.

use std::fmt;
use std::sync::Arc;

use tracing::trace;
use vesta_common::ContentHash;

use crate::shared::SharedCache;

/// Default number of parsed source files kept across requests.
pub const DEFAULT_SOURCE_CAPACITY: usize = 1500;

/// Parsed source files shared across build requests.
///
/// Entries are keyed by the hash of the file name, its text and the language
/// version it was parsed for, so an edited file or a changed target simply
/// misses. `T` is whatever representation the compiler produces.
pub struct SourceCache<T> {
    entries: SharedCache<ContentHash, Arc<T>>,
}

impl<T> SourceCache<T> {
    /// Creates a cache holding at most `capacity` parsed files.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: SharedCache::new(capacity),
        }
    }

    /// Computes the cache key for a file.
    pub fn key(name: &str, text: &str, lang_version: &str) -> ContentHash {
        ContentHash::from_parts([name.as_bytes(), text.as_bytes(), lang_version.as_bytes()])
    }

    /// Returns the cached parse of a file, running `parse` on a miss.
    ///
    /// `parse` runs without the lock held. Two requests missing on the same
    /// file may both parse it; the later result replaces the earlier one.
    pub fn get_or_insert_with<F>(
        &self,
        name: &str,
        text: &str,
        lang_version: &str,
        parse: F,
    ) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        let key = Self::key(name, text, lang_version);
        if let Some(hit) = self.entries.get(&key) {
            trace!(name, "source cache hit");
            return hit;
        }
        trace!(name, "source cache miss");
        let parsed = Arc::new(parse());
        self.entries.set(key, Arc::clone(&parsed));
        parsed
    }

    /// Returns `true` if a parse of this exact file is cached.
    pub fn contains(&self, name: &str, text: &str, lang_version: &str) -> bool {
        self.entries.has_key(&Self::key(name, text, lang_version))
    }

    /// Returns the number of cached files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for SourceCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_CAPACITY)
    }
}

impl<T> fmt::Debug for SourceCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceCache").field("len", &self.len()).finish()
    }
}
