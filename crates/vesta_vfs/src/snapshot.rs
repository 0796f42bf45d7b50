//! A resolver over a fixed, immutable set of files.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;
use vesta_common::vpath;

use crate::directories::DirectoryIndex;
use crate::resolver::FileResolver;

/// Map from absolute virtual path to file contents.
///
/// Contents are reference counted so that decoded archives can be cached and
/// merged into several snapshots without copying.
pub type FileMap = BTreeMap<String, Arc<[u8]>>;

/// Resolver serving a flat map of files, with directories inferred from the
/// file paths.
///
/// ```text
/// /etc/passwd
/// /etc/hosts
/// /home/zzz/hosts
/// ```
///
/// exposes the directories `/`, `/etc`, `/home` and `/home/zzz`. Directory
/// entries are never listed as files, and files are never listed by
/// [`list_directories`](FileResolver::list_directories).
///
/// # Panics
///
/// Every file path given to [`new`](Self::new) and every path queried must be
/// absolute. A relative path is a bug in the caller's path construction and
/// panics rather than being reported as absent.
pub struct SnapshotResolver {
    files: FileMap,
    directories: DirectoryIndex,
}

impl SnapshotResolver {
    /// Builds a snapshot over `files`, indexing their directories.
    pub fn new(files: FileMap) -> Self {
        let mut directories = DirectoryIndex::new();
        for path in files.keys() {
            require_absolute(path, "file");
            directories.visit_file(path);
        }
        Self { files, directories }
    }

    /// Returns the number of files in the snapshot.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the snapshot holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over the file paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Strips a trailing slash from a directory query, warning when one was present.
    fn directory_key<'a>(&self, dir: &'a str) -> &'a str {
        require_absolute(dir, "directory");
        match vpath::strip_trailing_slash(dir) {
            Some(stripped) => {
                warn!("trailing slash of directory name: {dir}");
                stripped
            }
            None => dir,
        }
    }
}

fn require_absolute(path: &str, kind: &str) {
    assert!(
        vpath::is_absolute(path),
        "non-absolute {kind} name: {path:?}"
    );
}

impl FileResolver for SnapshotResolver {
    fn file_exists(&self, path: &str) -> bool {
        require_absolute(path, "file");
        self.files.contains_key(path)
    }

    fn read_file(&self, path: &str) -> Option<Arc<[u8]>> {
        require_absolute(path, "file");
        self.files.get(path).cloned()
    }

    fn directory_exists(&self, path: &str) -> bool {
        let dir = self.directory_key(path);
        self.directories.exists(dir)
    }

    fn list_directories(&self, path: &str) -> Option<Vec<String>> {
        let dir = self.directory_key(path);
        self.directories
            .list_children(dir)
            .map(|children| children.iter().cloned().collect())
    }
}

impl fmt::Debug for SnapshotResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotResolver")
            .field("files", &self.files.len())
            .field("directories", &self.directories.len())
            .finish()
    }
}
