//! Relocation of a resolver under a fixed prefix.

use std::sync::Arc;

use vesta_common::vpath;

use crate::directories::DirectoryIndex;
use crate::resolver::{FileResolver, Resolver};

/// Makes every path of an inner resolver appear under `prefix`.
///
/// With prefix `/etc/node_modules`, the inner file `/lodash/index.d.ts` is
/// served as `/etc/node_modules/lodash/index.d.ts`. Paths outside the prefix
/// do not exist. The prefix and its ancestors always exist as directories, so
/// walking upward from any relocated path reaches `/`.
#[derive(Debug)]
pub struct PrefixResolver {
    prefix: String,
    inner: Box<Resolver>,
    ancestors: DirectoryIndex,
}

impl PrefixResolver {
    /// Relocates `inner` under `prefix`.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is not a well-formed virtual path.
    pub fn new(prefix: impl Into<String>, inner: Resolver) -> Self {
        let prefix = prefix.into();
        if let Err(err) = vpath::validate(&prefix) {
            panic!("malformed resolver prefix: {err}");
        }
        let mut ancestors = DirectoryIndex::new();
        ancestors.visit_directory(&prefix);
        Self {
            prefix,
            inner: Box::new(inner),
            ancestors,
        }
    }

    /// Returns the prefix the inner resolver is mounted at.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the relocated resolver.
    pub fn inner(&self) -> &Resolver {
        &self.inner
    }

    fn relocate<'a>(&self, path: &'a str) -> Option<&'a str> {
        vpath::relocate(path, &self.prefix)
    }
}

impl FileResolver for PrefixResolver {
    fn file_exists(&self, path: &str) -> bool {
        self.relocate(path)
            .is_some_and(|inner| self.inner.file_exists(inner))
    }

    fn read_file(&self, path: &str) -> Option<Arc<[u8]>> {
        self.inner.read_file(self.relocate(path)?)
    }

    fn directory_exists(&self, path: &str) -> bool {
        if self.ancestors.exists(path) {
            return true;
        }
        self.relocate(path)
            .is_some_and(|inner| self.inner.directory_exists(inner))
    }

    fn list_directories(&self, path: &str) -> Option<Vec<String>> {
        if path == self.prefix {
            return Some(self.inner.list_directories(vpath::ROOT).unwrap_or_default());
        }
        if let Some(children) = self.ancestors.list_children(path) {
            return Some(children.iter().cloned().collect());
        }
        self.inner.list_directories(self.relocate(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::file_map;

    const FILES: [&str; 7] = [
        "/lib_one/a.ts",
        "/lib_two/a.ts",
        "/lib_two/b.ts",
        "/nested/lib_one/a.ts",
        "/nested/lib_two/a.ts",
        "/nested/lib_two/b.ts",
        "/oops/super/nested/with/only/one/file.ts",
    ];

    fn inner() -> Resolver {
        Resolver::snapshot(file_map(FILES.iter().map(|f| (*f, ""))))
    }

    fn resolver() -> PrefixResolver {
        PrefixResolver::new("/etc/node_modules", inner())
    }

    #[test]
    fn file_exists() {
        let r = resolver();
        assert!(r.file_exists("/etc/node_modules/lib_one/a.ts"));
        assert!(!r.file_exists("/nonsense.ts"));
        assert!(!r.file_exists("/etc/node_modules/nonsense.ts"));
        assert!(!r.file_exists("/lib_one/a.ts"));
    }

    #[test]
    fn read_file_relocates() {
        let r = PrefixResolver::new(
            "/vendor",
            Resolver::snapshot(file_map([("/pkg/index.ts", "export const x = 1;")])),
        );
        assert_eq!(
            r.read_to_string("/vendor/pkg/index.ts").as_deref(),
            Some("export const x = 1;")
        );
        assert!(r.read_file("/pkg/index.ts").is_none());
    }

    #[test]
    fn directory_exists() {
        let r = resolver();
        assert!(r.directory_exists("/"));
        assert!(r.directory_exists("/etc"));
        assert!(r.directory_exists("/etc/node_modules"));
        assert!(r.directory_exists("/etc/node_modules/oops"));
        assert!(!r.directory_exists("/nonsense"));
        assert!(!r.directory_exists("/lib_one"));
    }

    #[test]
    fn list_directories() {
        let r = resolver();
        assert_eq!(r.list_directories("/").unwrap(), vec!["etc"]);
        assert_eq!(r.list_directories("/etc").unwrap(), vec!["node_modules"]);
        assert_eq!(
            r.list_directories("/etc/node_modules").unwrap(),
            vec!["lib_one", "lib_two", "nested", "oops"]
        );
        assert_eq!(
            r.list_directories("/etc/node_modules/nested").unwrap(),
            vec!["lib_one", "lib_two"]
        );
    }

    #[test]
    fn missing_directories_are_unknown() {
        let r = resolver();
        assert!(r.list_directories("/nonsense").is_none());
        assert!(r.list_directories("/etc/node_modules/hi").is_none());
    }

    #[test]
    fn shared_string_prefix_does_not_match() {
        let r = resolver();
        assert!(!r.file_exists("/etc/node_modules_extra/lib_one/a.ts"));
        assert!(!r.directory_exists("/etc/node_modules_extra"));
        assert!(r.list_directories("/etc/node_modules_extra/lib_one").is_none());
    }

    #[test]
    fn prefix_over_empty_inner_is_known_and_empty() {
        let r = PrefixResolver::new("/node_modules", Resolver::snapshot(Default::default()));
        assert!(r.directory_exists("/node_modules"));
        assert_eq!(r.list_directories("/node_modules"), Some(vec![]));
        assert_eq!(r.list_directories("/").unwrap(), vec!["node_modules"]);
    }

    #[test]
    fn root_prefix_is_identity() {
        let r = PrefixResolver::new("/", inner());
        assert!(r.file_exists("/lib_one/a.ts"));
        assert_eq!(
            r.list_directories("/").unwrap(),
            vec!["lib_one", "lib_two", "nested", "oops"]
        );
    }

    #[test]
    fn relocation_round_trip() {
        let plain = inner();
        let r = resolver();
        let probes = FILES
            .iter()
            .copied()
            .chain(["/lib_one", "/missing.ts", "/nested/lib_two/c.ts"]);
        for path in probes {
            let relocated = format!("/etc/node_modules{path}");
            assert_eq!(
                r.file_exists(&relocated),
                plain.file_exists(path),
                "mismatch for {path}"
            );
        }
    }

    #[test]
    #[should_panic(expected = "malformed resolver prefix")]
    fn malformed_prefix_panics() {
        PrefixResolver::new("node_modules/", inner());
    }
}
