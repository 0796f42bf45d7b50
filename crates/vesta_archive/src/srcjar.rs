//! Reading generated sources out of zip source archives.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use vesta_common::VPath;
use vesta_vfs::FileMap;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::ArchiveError;

/// Reads every entry of the zip file at `path` whose name ends with one of
/// `extensions`, exposing `dir/a.ts` as `/dir/a.ts`.
pub fn read_srcjar(path: &Path, extensions: &[String]) -> Result<FileMap, ArchiveError> {
    let file = File::open(path).map_err(|err| ArchiveError::io(path, err))?;
    read_sources(file, path, extensions)
}

fn read_sources<R: Read + Seek>(
    reader: R,
    path: &Path,
    extensions: &[String],
) -> Result<FileMap, ArchiveError> {
    let zip_error = |source| ArchiveError::SourceArchive {
        path: path.to_path_buf(),
        source,
    };
    let mut zip = ZipArchive::new(reader).map_err(zip_error)?;
    let mut files = FileMap::new();
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(zip_error)?;
        if !entry.is_file() {
            continue;
        }
        let name = entry.name().to_string();
        if !extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
            continue;
        }
        let vpath = VPath::from_relative(&name).map_err(|source| ArchiveError::SourcePath {
            path: path.join(&name),
            source,
        })?;
        let mut data = Vec::new();
        entry
            .read_to_end(&mut data)
            .map_err(|err| zip_error(ZipError::Io(err)))?;
        files.insert(vpath.into(), Arc::from(data));
    }
    debug!(count = files.len(), "read source archive entries");
    Ok(files)
}
