//! Errors that abort a build request.

use vesta_archive::ArchiveError;
use vesta_common::InternalError;

/// A failure that ends a request before an outcome can be produced.
///
/// Compile errors and dependency findings are not `DriverError`s; they are
/// diagnostics in the [`BuildOutcome`](crate::BuildOutcome).
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// An archive or source file could not be read, decoded or written.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The requested dependency root cannot be mounted.
    #[error("invalid dependency root '{root}': {reason}")]
    DependencyRoot {
        /// The root as requested.
        root: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The resolved tree is inconsistent.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
