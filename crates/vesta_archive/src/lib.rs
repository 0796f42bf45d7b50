//! Archives in and out of the virtual tree.
//!
//! Dependencies arrive as pre-bundled archives. [`ArchiveLoader`] decodes
//! them with a [`BundleCodec`], caching decoded file maps by checksum across
//! requests, and merges them into one resolver while remembering which archive
//! provided each path. [`load_sources`] builds the resolver for the unit being
//! compiled, and [`ArchiveWriter`] packs the compiler's outputs.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod loader;
pub mod sources;
pub mod srcjar;
pub mod writer;

pub use codec::{BundleCodec, TarCodec};
pub use error::{ArchiveError, CodecError};
pub use loader::{
    ArchiveCache, ArchiveLoader, ArchiveSpec, Collision, LoadedArchives, DEFAULT_ARCHIVE_CAPACITY,
};
pub use sources::{load_sources, source_vpath, LoadedSources, SRCJAR_EXTENSION};
pub use srcjar::read_srcjar;
pub use writer::ArchiveWriter;
