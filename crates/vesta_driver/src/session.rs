//! Process-wide build state.

use std::fmt;

use vesta_archive::{ArchiveCache, BundleCodec, TarCodec};
use vesta_cache::SourceCache;
use vesta_config::CacheConfig;

/// The caches shared by every request a worker serves.
///
/// Construct one at process start and pass it to each request. `S` is the
/// parsed source representation of the [`Compiler`](crate::Compiler) in use.
pub struct BuildSession<S> {
    archives: ArchiveCache,
    sources: SourceCache<S>,
    codec: Box<dyn BundleCodec>,
}

impl<S> BuildSession<S> {
    /// Creates a session with the given cache sizes, reading archives as tar.
    ///
    /// # Panics
    ///
    /// Panics if either capacity is zero.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_codec(config, Box::new(TarCodec))
    }

    /// Creates a session that decodes and writes archives with `codec`.
    pub fn with_codec(config: &CacheConfig, codec: Box<dyn BundleCodec>) -> Self {
        Self {
            archives: ArchiveCache::new(config.archive_capacity),
            sources: SourceCache::new(config.source_capacity),
            codec,
        }
    }

    /// Decoded dependency archives, keyed by checksum.
    pub fn archive_cache(&self) -> &ArchiveCache {
        &self.archives
    }

    /// Parsed source files, keyed by content.
    pub fn source_cache(&self) -> &SourceCache<S> {
        &self.sources
    }

    /// The codec archives are read and written with.
    pub fn codec(&self) -> &dyn BundleCodec {
        self.codec.as_ref()
    }
}

impl<S> Default for BuildSession<S> {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl<S> fmt::Debug for BuildSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildSession")
            .field("archives", &self.archives.len())
            .field("sources", &self.sources.len())
            .finish()
    }
}
