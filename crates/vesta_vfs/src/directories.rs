//! Directory structure inferred from a flat set of file paths.

use std::collections::{BTreeSet, HashMap};

use vesta_common::vpath::{self, ROOT};

/// Answers directory questions about a set of files without storing the
/// files themselves.
///
/// Every recorded directory maps to the names (not paths) of its immediate
/// child directories. If a directory is recorded, so is every ancestor up to
/// `/`, and its name appears in its parent's child set. Entries are never
/// removed.
///
/// All paths must be absolute with no trailing slash.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    dirs: HashMap<String, BTreeSet<String>>,
}

impl DirectoryIndex {
    /// Creates an empty index. Not even `/` exists until something is visited.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every directory leading to `file`, but not the file itself.
    pub fn visit_file(&mut self, file: &str) {
        self.visit_directory(vpath::parent(file));
    }

    /// Records `dir` and all of its ancestors.
    ///
    /// Idempotent. Stops climbing as soon as it reaches a directory that was
    /// already recorded, since that directory's ancestors are recorded too.
    pub fn visit_directory(&mut self, dir: &str) {
        let mut current = dir;
        let mut child: Option<&str> = None;
        loop {
            let existed = self.dirs.contains_key(current);
            let children = self.dirs.entry(current.to_string()).or_default();
            if let Some(name) = child {
                children.insert(name.to_string());
            }
            if existed || current == ROOT {
                return;
            }
            child = Some(vpath::basename(current));
            current = vpath::parent(current);
        }
    }

    /// Returns `true` if `dir` has been recorded.
    pub fn exists(&self, dir: &str) -> bool {
        self.dirs.contains_key(dir)
    }

    /// Lists the immediate child directory names of `dir`.
    ///
    /// Returns `None` for an unknown directory, which is distinct from a
    /// known directory with no children.
    pub fn list_children(&self, dir: &str) -> Option<&BTreeSet<String>> {
        self.dirs.get(dir)
    }

    /// Returns the number of recorded directories.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Returns `true` if no directory has been recorded.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
