//! The resolver capability interface and the closed set of resolver kinds.

use std::sync::Arc;

use crate::overlay::OverlayResolver;
use crate::prefix::PrefixResolver;
use crate::snapshot::{FileMap, SnapshotResolver};

/// The filesystem questions a compiler host asks.
///
/// Absence is never an error: a missing file reads as `None` and an unknown
/// directory lists as `None`. Paths are absolute virtual paths.
pub trait FileResolver: Send + Sync {
    /// Returns `true` if a file exists at `path`.
    fn file_exists(&self, path: &str) -> bool;

    /// Returns the raw contents of the file at `path`.
    fn read_file(&self, path: &str) -> Option<Arc<[u8]>>;

    /// Returns `true` if a directory exists at `path`.
    fn directory_exists(&self, path: &str) -> bool;

    /// Lists the names of the immediate child directories of `path`, sorted.
    ///
    /// Returns `None` if the directory is unknown.
    fn list_directories(&self, path: &str) -> Option<Vec<String>>;

    /// Reads the file at `path` as text, replacing invalid UTF-8.
    fn read_to_string(&self, path: &str) -> Option<String> {
        self.read_file(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A virtual filesystem assembled from a fixed set of building blocks.
///
/// Composition always forms a finite tree: snapshots are the leaves, prefix
/// resolvers relocate one subtree, overlays merge several.
#[derive(Debug)]
pub enum Resolver {
    /// A fixed map of files.
    Snapshot(SnapshotResolver),
    /// Another resolver relocated under a prefix.
    Prefix(PrefixResolver),
    /// Several resolvers in precedence order.
    Overlay(OverlayResolver),
}

impl Resolver {
    /// Builds a snapshot resolver over `files`.
    pub fn snapshot(files: FileMap) -> Self {
        Resolver::Snapshot(SnapshotResolver::new(files))
    }

    /// Relocates `inner` so that its root appears at `prefix`.
    pub fn prefixed(prefix: impl Into<String>, inner: Resolver) -> Self {
        Resolver::Prefix(PrefixResolver::new(prefix, inner))
    }

    /// Stacks `resolvers`, the first having the highest precedence.
    pub fn overlay(resolvers: Vec<Resolver>) -> Self {
        Resolver::Overlay(OverlayResolver::new(resolvers))
    }

    fn as_dyn(&self) -> &dyn FileResolver {
        match self {
            Resolver::Snapshot(r) => r,
            Resolver::Prefix(r) => r,
            Resolver::Overlay(r) => r,
        }
    }
}

impl FileResolver for Resolver {
    fn file_exists(&self, path: &str) -> bool {
        self.as_dyn().file_exists(path)
    }

    fn read_file(&self, path: &str) -> Option<Arc<[u8]>> {
        self.as_dyn().read_file(path)
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.as_dyn().directory_exists(path)
    }

    fn list_directories(&self, path: &str) -> Option<Vec<String>> {
        self.as_dyn().list_directories(path)
    }
}

impl From<SnapshotResolver> for Resolver {
    fn from(r: SnapshotResolver) -> Self {
        Resolver::Snapshot(r)
    }
}

impl From<PrefixResolver> for Resolver {
    fn from(r: PrefixResolver) -> Self {
        Resolver::Prefix(r)
    }
}

impl From<OverlayResolver> for Resolver {
    fn from(r: OverlayResolver) -> Self {
        Resolver::Overlay(r)
    }
}

/// Builds a [`FileMap`] from `(path, text)` pairs. Intended for tests.
pub fn file_map<'a, I>(entries: I) -> FileMap
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries
        .into_iter()
        .map(|(path, text)| (path.to_string(), Arc::from(text.as_bytes())))
        .collect()
}
