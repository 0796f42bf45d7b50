//! Assembling the virtual tree a request compiles against.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use vesta_archive::{load_sources, ArchiveLoader, ArchiveSpec, Collision};
use vesta_common::{vpath, InternalError, VPath, VestaResult};
use vesta_vfs::{FileResolver, Resolver};

use crate::error::DriverError;
use crate::session::BuildSession;

/// The resolved inputs of one build request.
#[derive(Debug)]
pub struct Workspace {
    /// Sources at the tree root, overlaid on the dependency archives mounted
    /// under the dependency root.
    pub resolver: Resolver,
    /// Canonical virtual paths of the sources to compile.
    pub sources: Vec<VPath>,
    /// Maps each path below the dependency root to its archive.
    pub origins: HashMap<String, String>,
    /// Dependency paths provided by more than one archive.
    pub collisions: Vec<Collision>,
}

/// Builds the virtual tree for a request.
///
/// Dependency archives are decoded through the session's archive cache and
/// mounted at `dependency_root`. Sources are read from disk (or from
/// `.srcjar` archives, keeping entries with one of `extensions`) and take
/// precedence over dependency files at the same path.
pub fn resolve<S>(
    session: &BuildSession<S>,
    archives: &[ArchiveSpec],
    sources: &[PathBuf],
    source_root: &Path,
    dependency_root: &str,
    extensions: &[String],
) -> Result<Workspace, DriverError> {
    check_dependency_root(dependency_root)?;

    let deps = ArchiveLoader::new(session.archive_cache(), session.codec()).load(archives)?;
    let loaded = load_sources(sources, source_root, extensions)?;

    let resolver = Resolver::overlay(vec![
        loaded.resolver,
        Resolver::prefixed(dependency_root, deps.resolver),
    ]);

    check_sources(&resolver, &loaded.paths, dependency_root)?;

    debug!(
        sources = loaded.paths.len(),
        archives = archives.len(),
        dependency_files = deps.origins.len(),
        "resolved workspace"
    );
    Ok(Workspace {
        resolver,
        sources: loaded.paths,
        origins: deps.origins,
        collisions: deps.collisions,
    })
}

/// Every source must be served from the tree, ahead of any dependency file.
fn check_sources(
    resolver: &Resolver,
    sources: &[VPath],
    dependency_root: &str,
) -> VestaResult<()> {
    for source in sources {
        if !resolver.file_exists(source.as_str()) {
            return Err(InternalError::new(format!(
                "source {source} is missing from the resolved tree"
            )));
        }
        if vpath::relocate(source.as_str(), dependency_root).is_some() {
            warn!(source = %source, dependency_root, "source lies under the dependency root");
        }
    }
    Ok(())
}

fn check_dependency_root(root: &str) -> Result<(), DriverError> {
    let reason = match vpath::validate(root) {
        Err(err) => err.to_string(),
        Ok(()) if root == vpath::ROOT => "must not be the tree root".to_string(),
        Ok(()) => return Ok(()),
    };
    Err(DriverError::DependencyRoot {
        root: root.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_archive::{BundleCodec, TarCodec};

    fn write_tar(dir: &Path, name: &str, files: &[(&str, &str)]) -> String {
        let mut bytes = Vec::new();
        for (path, text) in files {
            bytes.extend(TarCodec.bundle(path, text.as_bytes()).unwrap());
        }
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn ts() -> Vec<String> {
        vec![".ts".to_string()]
    }

    #[test]
    fn mounts_dependencies_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let lib = write_tar(dir.path(), "lib.tar", &[("/lib/index.d.ts", "lib")]);
        std::fs::write(dir.path().join("main.ts"), "main").unwrap();

        let session: BuildSession<()> = BuildSession::default();
        let ws = resolve(
            &session,
            &[ArchiveSpec::new(lib.clone(), "c1")],
            &[dir.path().join("main.ts")],
            dir.path(),
            "/node_modules",
            &ts(),
        )
        .unwrap();

        assert_eq!(ws.sources, vec![VPath::new("/main.ts").unwrap()]);
        assert!(ws.resolver.file_exists("/main.ts"));
        assert!(ws.resolver.file_exists("/node_modules/lib/index.d.ts"));
        assert!(!ws.resolver.file_exists("/lib/index.d.ts"));
        assert_eq!(
            ws.resolver.list_directories("/").unwrap(),
            vec!["node_modules"]
        );
        assert_eq!(ws.origins["/lib/index.d.ts"], lib);
        assert_eq!(session.archive_cache().len(), 1);
    }

    #[test]
    fn sources_shadow_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        let lib = write_tar(dir.path(), "lib.tar", &[("/x.ts", "from archive")]);
        std::fs::create_dir(dir.path().join("deps")).unwrap();
        std::fs::write(dir.path().join("deps/x.ts"), "from source").unwrap();

        let session: BuildSession<()> = BuildSession::default();
        let ws = resolve(
            &session,
            &[ArchiveSpec::uncached(lib)],
            &[dir.path().join("deps/x.ts")],
            dir.path(),
            "/deps",
            &ts(),
        )
        .unwrap();

        assert_eq!(
            ws.resolver.read_to_string("/deps/x.ts").as_deref(),
            Some("from source")
        );
        assert!(session.archive_cache().is_empty());
    }

    #[test]
    fn rejects_root_as_dependency_root() {
        let session: BuildSession<()> = BuildSession::default();
        let err = resolve(&session, &[], &[], Path::new("/"), "/", &ts()).unwrap_err();
        assert!(matches!(err, DriverError::DependencyRoot { .. }));
    }

    #[test]
    fn rejects_relative_dependency_root() {
        let session: BuildSession<()> = BuildSession::default();
        let err = resolve(&session, &[], &[], Path::new("/"), "deps", &ts()).unwrap_err();
        assert!(matches!(err, DriverError::DependencyRoot { ref root, .. } if root == "deps"));
    }

    #[test]
    fn missing_archive_fails_request() {
        let dir = tempfile::tempdir().unwrap();
        let session: BuildSession<()> = BuildSession::default();
        let missing = dir.path().join("gone.tar").to_string_lossy().into_owned();
        let err = resolve(
            &session,
            &[ArchiveSpec::new(missing, "c1")],
            &[],
            dir.path(),
            "/node_modules",
            &ts(),
        )
        .unwrap_err();
        assert!(matches!(err, DriverError::Archive(_)));
        assert!(session.archive_cache().is_empty());
    }
}
