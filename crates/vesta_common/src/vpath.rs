//! Virtual paths inside a resolver tree.
//!
//! A virtual path is an absolute, `/`-rooted string with no trailing slash
//! (except the root itself), no empty segments and no `..` segments. Equality
//! is exact string equality. The free functions in this module operate on
//! plain `&str` and assume the path is already well formed; [`VPath`] is the
//! validated form used at request boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The root of every virtual tree.
pub const ROOT: &str = "/";

/// Reasons a string is not a valid virtual path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The path does not start with `/`.
    #[error("virtual path '{0}' is not absolute")]
    NotAbsolute(String),

    /// The path ends with `/` and is not the root.
    #[error("virtual path '{0}' has a trailing slash")]
    TrailingSlash(String),

    /// The path contains a `..` segment.
    #[error("virtual path '{0}' contains a '..' segment")]
    ParentSegment(String),

    /// The path contains an empty segment (`//`).
    #[error("virtual path '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// Checks that `path` is a well-formed virtual path.
pub fn validate(path: &str) -> Result<(), PathError> {
    if !is_absolute(path) {
        return Err(PathError::NotAbsolute(path.to_string()));
    }
    if path == ROOT {
        return Ok(());
    }
    if path.ends_with('/') {
        return Err(PathError::TrailingSlash(path.to_string()));
    }
    for segment in path[1..].split('/') {
        match segment {
            "" => return Err(PathError::EmptySegment(path.to_string())),
            ".." => return Err(PathError::ParentSegment(path.to_string())),
            _ => {}
        }
    }
    Ok(())
}

/// Returns `true` if `path` starts with `/`.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Returns the parent directory of `path`. The parent of `/` is `/`.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => ROOT,
        Some(idx) => &path[..idx],
    }
}

/// Returns the last segment of `path`, or `""` for the root.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Joins a directory and a child name.
pub fn join(dir: &str, name: &str) -> String {
    if dir == ROOT {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Removes a single trailing slash from a non-root path.
///
/// Returns `None` if there was nothing to strip.
pub fn strip_trailing_slash(path: &str) -> Option<&str> {
    if path != ROOT && path.ends_with('/') {
        Some(&path[..path.len() - 1])
    } else {
        None
    }
}

/// Maps `path` into the tree rooted at `prefix`.
///
/// `prefix` itself maps to `/`, and `prefix/rest` maps to `/rest`. Paths that
/// merely share a string prefix (`/node_modules_x` for `/node_modules`) do not
/// match.
pub fn relocate<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == ROOT {
        return Some(path);
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(ROOT)
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// A validated virtual path.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VPath(String);

impl VPath {
    /// Validates and wraps `path`.
    pub fn new(path: impl Into<String>) -> Result<Self, PathError> {
        let path = path.into();
        validate(&path)?;
        Ok(Self(path))
    }

    /// Builds a virtual path from a path relative to the tree root.
    ///
    /// Leading slashes on `relative` are ignored.
    pub fn from_relative(relative: &str) -> Result<Self, PathError> {
        Self::new(format!("/{}", relative.trim_start_matches('/')))
    }

    /// Returns the root path `/`.
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the parent directory.
    pub fn parent(&self) -> VPath {
        VPath(parent(&self.0).to_string())
    }

    /// Returns the final path segment.
    pub fn file_name(&self) -> &str {
        basename(&self.0)
    }
}

impl TryFrom<String> for VPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VPath> for String {
    fn from(path: VPath) -> Self {
        path.0
    }
}

impl AsRef<str> for VPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for VPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VPath({:?})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_wellformed() {
        assert!(validate("/").is_ok());
        assert!(validate("/a").is_ok());
        assert!(validate("/node_modules/lodash/index.d.ts").is_ok());
    }

    #[test]
    fn validate_rejects_malformed() {
        assert_eq!(
            validate("src/a.ts"),
            Err(PathError::NotAbsolute("src/a.ts".to_string()))
        );
        assert!(matches!(validate("/a/"), Err(PathError::TrailingSlash(_))));
        assert!(matches!(validate("/a/../b"), Err(PathError::ParentSegment(_))));
        assert!(matches!(validate("/a//b"), Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn parent_and_basename() {
        assert_eq!(parent("/a/b/c.ts"), "/a/b");
        assert_eq!(parent("/a"), "/");
        assert_eq!(parent("/"), "/");
        assert_eq!(basename("/a/b/c.ts"), "c.ts");
        assert_eq!(basename("/a"), "a");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn join_handles_root() {
        assert_eq!(join("/", "etc"), "/etc");
        assert_eq!(join("/etc", "hosts"), "/etc/hosts");
    }

    #[test]
    fn strip_trailing() {
        assert_eq!(strip_trailing_slash("/etc/"), Some("/etc"));
        assert_eq!(strip_trailing_slash("/etc"), None);
        assert_eq!(strip_trailing_slash("/"), None);
    }

    #[test]
    fn relocate_under_prefix() {
        assert_eq!(relocate("/vendor/a/b.ts", "/vendor"), Some("/a/b.ts"));
        assert_eq!(relocate("/vendor", "/vendor"), Some("/"));
        assert_eq!(relocate("/vendored/a.ts", "/vendor"), None);
        assert_eq!(relocate("/src/a.ts", "/vendor"), None);
        assert_eq!(relocate("/src/a.ts", "/"), Some("/src/a.ts"));
    }

    #[test]
    fn vpath_from_relative() {
        let p = VPath::from_relative("src/main.ts").unwrap();
        assert_eq!(p.as_str(), "/src/main.ts");
        assert_eq!(p.file_name(), "main.ts");
        assert_eq!(p.parent().as_str(), "/src");
        assert!(VPath::from_relative("../escape.ts").is_err());
    }

    #[test]
    fn vpath_serde_validates() {
        let p: VPath = serde_json::from_str("\"/a/b\"").unwrap();
        assert_eq!(p.as_str(), "/a/b");
        assert!(serde_json::from_str::<VPath>("\"a/b\"").is_err());
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"/a/b\"");
    }
}
