//! Loading the sources of the unit being compiled.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;
use vesta_common::VPath;
use vesta_vfs::{FileMap, Resolver};

use crate::error::ArchiveError;
use crate::srcjar::read_srcjar;

/// File name suffix marking a zip archive of generated sources.
pub const SRCJAR_EXTENSION: &str = ".srcjar";

/// The sources of a build request, ready to compile.
#[derive(Debug)]
pub struct LoadedSources {
    /// Resolver over the plain source files, then the source archive entries.
    pub resolver: Resolver,
    /// Virtual paths of every source, plain files first in request order.
    pub paths: Vec<VPath>,
}

/// Reads the sources of a build request.
///
/// Paths ending in [`SRCJAR_EXTENSION`] are opened as zip archives and their
/// entries ending in one of `extensions` become sources. Every other path is
/// read from disk; its `source_root` prefix, if any, is dropped so that
/// `<root>/src/main.ts` is served as `/src/main.ts`.
pub fn load_sources(
    sources: &[PathBuf],
    source_root: &Path,
    extensions: &[String],
) -> Result<LoadedSources, ArchiveError> {
    let (srcjars, files): (Vec<&PathBuf>, Vec<&PathBuf>) = sources
        .iter()
        .partition(|path| path.to_string_lossy().ends_with(SRCJAR_EXTENSION));

    let plain: Vec<(VPath, Arc<[u8]>)> = files
        .par_iter()
        .map(|path| -> Result<(VPath, Arc<[u8]>), ArchiveError> {
            let vpath = source_vpath(path, source_root)?;
            let data = std::fs::read(path).map_err(|err| ArchiveError::io(*path, err))?;
            Ok((vpath, Arc::from(data)))
        })
        .collect::<Result<_, _>>()?;

    let mut paths: Vec<VPath> = plain.iter().map(|(vpath, _)| vpath.clone()).collect();
    let plain_files: FileMap = plain
        .into_iter()
        .map(|(vpath, data)| (String::from(vpath), data))
        .collect();

    let mut archived = FileMap::new();
    for srcjar in srcjars {
        let entries = read_srcjar(srcjar, extensions)?;
        for name in entries.keys() {
            // Entry names were validated when the archive was read.
            if let Ok(vpath) = VPath::new(name.as_str()) {
                paths.push(vpath);
            }
        }
        archived.extend(entries);
    }

    debug!(
        files = plain_files.len(),
        archived = archived.len(),
        "loaded sources"
    );
    Ok(LoadedSources {
        resolver: Resolver::overlay(vec![
            Resolver::snapshot(plain_files),
            Resolver::snapshot(archived),
        ]),
        paths,
    })
}

/// Maps a source file on disk to its virtual path.
pub fn source_vpath(path: &Path, source_root: &Path) -> Result<VPath, ArchiveError> {
    let relative = path.strip_prefix(source_root).unwrap_or(path);
    let relative = relative.to_string_lossy().replace('\\', "/");
    VPath::from_relative(&relative).map_err(|source| ArchiveError::SourcePath {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use vesta_vfs::FileResolver;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn ts() -> Vec<String> {
        vec![".ts".to_string()]
    }

    fn vpaths(loaded: &LoadedSources) -> Vec<&str> {
        loaded.paths.iter().map(VPath::as_str).collect()
    }

    #[test]
    fn strips_source_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src/util")).unwrap();
        std::fs::write(dir.path().join("src/main.ts"), "main").unwrap();
        std::fs::write(dir.path().join("src/util/str.ts"), "str").unwrap();

        let sources = vec![
            dir.path().join("src/main.ts"),
            dir.path().join("src/util/str.ts"),
        ];
        let loaded = load_sources(&sources, dir.path(), &ts()).unwrap();

        assert_eq!(vpaths(&loaded), vec!["/src/main.ts", "/src/util/str.ts"]);
        assert_eq!(
            loaded.resolver.read_to_string("/src/main.ts").as_deref(),
            Some("main")
        );
        assert_eq!(loaded.resolver.list_directories("/src").unwrap(), vec!["util"]);
    }

    #[test]
    fn srcjar_entries_follow_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.ts"), "main").unwrap();
        let jar = dir.path().join("proto.srcjar");
        let mut writer = ZipWriter::new(File::create(&jar).unwrap());
        writer
            .start_file("gen/api.ts", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"api").unwrap();
        writer
            .start_file("gen/api.js", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"ignored").unwrap();
        writer.finish().unwrap();

        let sources = vec![jar, dir.path().join("main.ts")];
        let loaded = load_sources(&sources, dir.path(), &ts()).unwrap();

        assert_eq!(vpaths(&loaded), vec!["/main.ts", "/gen/api.ts"]);
        assert!(loaded.resolver.file_exists("/gen/api.ts"));
        assert!(!loaded.resolver.file_exists("/gen/api.js"));
        assert_eq!(loaded.resolver.list_directories("/").unwrap(), vec!["gen"]);
    }

    #[test]
    fn missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_sources(&[dir.path().join("gone.ts")], dir.path(), &ts()).unwrap_err();
        assert!(matches!(err, ArchiveError::Io { .. }));
    }

    #[test]
    fn source_vpath_outside_root_keeps_full_path() {
        let vpath = source_vpath(Path::new("/elsewhere/a.ts"), Path::new("/work")).unwrap();
        assert_eq!(vpath.as_str(), "/elsewhere/a.ts");
        let vpath = source_vpath(Path::new("/work/pkg/a.ts"), Path::new("/work")).unwrap();
        assert_eq!(vpath.as_str(), "/pkg/a.ts");
    }

    #[test]
    fn source_vpath_rejects_parent_segments() {
        let err = source_vpath(Path::new("../escape.ts"), Path::new("/work")).unwrap_err();
        assert!(matches!(err, ArchiveError::SourcePath { .. }));
    }
}
