//! Precedence-ordered stacking of resolvers.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::resolver::{FileResolver, Resolver};

/// Merges several resolvers into one tree.
///
/// Files come from the first resolver that has them. A directory exists if
/// any resolver has it, and its listing is the union of the listings of the
/// resolvers that have it.
#[derive(Debug)]
pub struct OverlayResolver {
    resolvers: Vec<Resolver>,
}

impl OverlayResolver {
    /// Stacks `resolvers`, the first having the highest precedence.
    pub fn new(resolvers: Vec<Resolver>) -> Self {
        Self { resolvers }
    }

    /// Returns the stacked resolvers in precedence order.
    pub fn resolvers(&self) -> &[Resolver] {
        &self.resolvers
    }

    /// Returns the resolver that owns the file at `path`.
    fn owner(&self, path: &str) -> Option<&Resolver> {
        self.resolvers.iter().find(|r| r.file_exists(path))
    }
}

impl FileResolver for OverlayResolver {
    fn file_exists(&self, path: &str) -> bool {
        self.owner(path).is_some()
    }

    fn read_file(&self, path: &str) -> Option<Arc<[u8]>> {
        self.owner(path)?.read_file(path)
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.resolvers.iter().any(|r| r.directory_exists(path))
    }

    fn list_directories(&self, path: &str) -> Option<Vec<String>> {
        let mut known = false;
        let mut names = BTreeSet::new();
        // Some resolvers are expensive to list; only ask the ones that have the directory.
        for resolver in self.resolvers.iter().filter(|r| r.directory_exists(path)) {
            if let Some(children) = resolver.list_directories(path) {
                known = true;
                names.extend(children);
            }
        }
        known.then(|| names.into_iter().collect())
    }
}
