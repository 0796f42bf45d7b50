//! The compiler's view of a resolved workspace.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::trace;
use vesta_cache::SourceCache;
use vesta_common::vpath;
use vesta_vfs::{FileResolver, Resolver};

/// File access and parsed-source lookup for a [`Compiler`](crate::Compiler).
///
/// The compiler sees the workspace tree with `/` as its current directory.
/// Relative names are treated as rooted at `/`.
pub struct CompilerHost<'a, S> {
    resolver: &'a Resolver,
    sources: &'a SourceCache<S>,
}

impl<'a, S> CompilerHost<'a, S> {
    /// Creates a host over `resolver` that caches parses in `sources`.
    pub fn new(resolver: &'a Resolver, sources: &'a SourceCache<S>) -> Self {
        Self { resolver, sources }
    }

    /// The directory relative names are resolved against.
    pub fn current_directory(&self) -> &'static str {
        vpath::ROOT
    }

    /// Returns the underlying workspace tree.
    pub fn resolver(&self) -> &'a Resolver {
        self.resolver
    }

    /// Roots a relative name at `/`.
    pub fn normalize(name: &str) -> Cow<'_, str> {
        if name.starts_with('/') {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(format!("/{name}"))
        }
    }

    /// Returns the parsed form of the file `name`, or `None` if it does not
    /// exist.
    ///
    /// The parse is reused from the session cache when a file with the same
    /// name and text was already parsed for `lang_version`. `name` is used as
    /// given (not normalized) for the cache key and passed to `parse` along
    /// with the file text.
    pub fn source_file<F>(&self, name: &str, lang_version: &str, parse: F) -> Option<Arc<S>>
    where
        F: FnOnce(&str, &str) -> S,
    {
        let path = Self::normalize(name);
        let Some(text) = self.resolver.read_to_string(&path) else {
            trace!(name, "source file not found");
            return None;
        };
        Some(
            self.sources
                .get_or_insert_with(name, &text, lang_version, || parse(name, &text)),
        )
    }
}

impl<S: Send + Sync> FileResolver for CompilerHost<'_, S> {
    fn file_exists(&self, path: &str) -> bool {
        self.resolver.file_exists(&Self::normalize(path))
    }

    fn read_file(&self, path: &str) -> Option<Arc<[u8]>> {
        self.resolver.read_file(&Self::normalize(path))
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.resolver.directory_exists(&Self::normalize(path))
    }

    fn list_directories(&self, path: &str) -> Option<Vec<String>> {
        self.resolver.list_directories(&Self::normalize(path))
    }
}
