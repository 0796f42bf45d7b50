//! Packing compiled outputs into an output archive.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::BundleCodec;
use crate::error::ArchiveError;

/// Appends emitted files to an archive on disk, one bundle per file.
pub struct ArchiveWriter<'a> {
    path: PathBuf,
    codec: &'a dyn BundleCodec,
    out: BufWriter<File>,
    written: usize,
}

impl<'a> ArchiveWriter<'a> {
    /// Creates (or truncates) the archive at `path`.
    pub fn create(path: &Path, codec: &'a dyn BundleCodec) -> Result<Self, ArchiveError> {
        let file = File::create(path).map_err(|err| ArchiveError::io(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            codec,
            out: BufWriter::new(file),
            written: 0,
        })
    }

    /// Appends the file `name` with contents `data`.
    pub fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        let bundle = self
            .codec
            .bundle(name, data)
            .map_err(|source| ArchiveError::Encode {
                name: name.to_string(),
                source,
            })?;
        self.out
            .write_all(&bundle)
            .map_err(|err| ArchiveError::io(&self.path, err))?;
        self.written += 1;
        Ok(())
    }

    /// Flushes the archive and returns the number of files written.
    pub fn finish(mut self) -> Result<usize, ArchiveError> {
        self.out
            .flush()
            .map_err(|err| ArchiveError::io(&self.path, err))?;
        debug!(path = %self.path.display(), files = self.written, "wrote output archive");
        Ok(self.written)
    }
}
