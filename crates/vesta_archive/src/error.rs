//! Error types for archive decoding, loading and writing.

use std::path::PathBuf;

use vesta_common::PathError;

/// Errors produced by a [`BundleCodec`](crate::BundleCodec).
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The bytes are not a valid bundle.
    #[error("malformed bundle: {reason}")]
    Malformed {
        /// Description of the problem.
        reason: String,
    },

    /// An entry name cannot be mapped to a virtual path.
    #[error("invalid entry name '{entry}': {source}")]
    InvalidEntry {
        /// The entry name as stored in the bundle.
        entry: String,
        /// Why the mapped path was rejected.
        source: PathError,
    },

    /// The underlying reader or writer failed.
    #[error("bundle I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that fail a whole build request.
///
/// Nothing decoded during a request that fails with one of these is cached.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// An archive or source file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A dependency archive could not be decoded.
    #[error("failed to decode archive {name}: {source}")]
    Decode {
        /// The archive name.
        name: String,
        /// The codec failure.
        source: CodecError,
    },

    /// An emitted file could not be packed into the output archive.
    #[error("failed to bundle {name}: {source}")]
    Encode {
        /// The virtual path of the emitted file.
        name: String,
        /// The codec failure.
        source: CodecError,
    },

    /// A source archive is not a readable zip file.
    #[error("failed to read source archive {path}: {source}")]
    SourceArchive {
        /// The source archive path.
        path: PathBuf,
        /// The zip failure.
        source: zip::result::ZipError,
    },

    /// A source file path cannot be exposed in the virtual tree.
    #[error("source path {path} cannot be mapped into the virtual tree: {source}")]
    SourcePath {
        /// The source file as given in the request.
        path: PathBuf,
        /// Why the mapped path was rejected.
        source: PathError,
    },
}

impl ArchiveError {
    /// Wraps an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
