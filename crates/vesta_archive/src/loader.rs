//! Loading dependency archives into one resolver.
//!
//! Archives are decoded in parallel and merged in list order. Decoded file
//! maps are cached by the checksum the caller supplies, so a long-lived
//! worker decodes each distinct archive once no matter how many requests
//! reference it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vesta_cache::SharedCache;
use vesta_vfs::{FileMap, Resolver};

use crate::codec::BundleCodec;
use crate::error::ArchiveError;

/// Default number of decoded archives kept across requests.
pub const DEFAULT_ARCHIVE_CAPACITY: usize = 500;

/// Decoded archives keyed by content checksum.
pub type ArchiveCache = SharedCache<String, Arc<FileMap>>;

/// One dependency archive of a build request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSpec {
    /// Filesystem path of the archive. Also the name reported in diagnostics.
    pub name: String,
    /// Content checksum. Archives without one are decoded on every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl ArchiveSpec {
    /// Describes an archive with a known checksum.
    pub fn new(name: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checksum: Some(checksum.into()),
        }
    }

    /// Describes an archive that is never cached.
    pub fn uncached(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checksum: None,
        }
    }
}

/// A path provided by more than one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The contested path, relative to the dependency root.
    pub path: String,
    /// The archive whose file is served.
    pub winner: String,
    /// The earlier archive whose file was replaced.
    pub shadowed: String,
}

/// The merged view of all dependency archives of a request.
#[derive(Debug)]
pub struct LoadedArchives {
    /// Resolver over every file of every archive.
    pub resolver: Resolver,
    /// Maps each path in `resolver` to the name of the archive that provided it.
    pub origins: HashMap<String, String>,
    /// Paths provided by more than one archive, in merge order.
    pub collisions: Vec<Collision>,
}

/// Decodes and merges dependency archives using a shared cache.
pub struct ArchiveLoader<'a> {
    cache: &'a ArchiveCache,
    codec: &'a dyn BundleCodec,
}

impl<'a> ArchiveLoader<'a> {
    /// Creates a loader that reads through `cache` and decodes with `codec`.
    pub fn new(cache: &'a ArchiveCache, codec: &'a dyn BundleCodec) -> Self {
        Self { cache, codec }
    }

    /// Loads `archives` into one resolver.
    ///
    /// Later archives win when two provide the same path. Fails if any
    /// archive cannot be read or decoded, in which case nothing new is
    /// cached.
    pub fn load(&self, archives: &[ArchiveSpec]) -> Result<LoadedArchives, ArchiveError> {
        // Probe in list order so cache promotion is deterministic.
        let cached: Vec<Option<Arc<FileMap>>> = archives
            .iter()
            .map(|spec| spec.checksum.as_ref().and_then(|sum| self.cache.get(sum)))
            .collect();

        let decoded: Vec<Arc<FileMap>> = archives
            .par_iter()
            .zip(cached.par_iter())
            .map(|(spec, hit)| match hit {
                Some(files) => Ok(Arc::clone(files)),
                None => self.decode(spec).map(Arc::new),
            })
            .collect::<Result<_, _>>()?;

        for ((spec, hit), files) in archives.iter().zip(&cached).zip(&decoded) {
            if let (None, Some(sum)) = (hit, &spec.checksum) {
                self.cache.set(sum.clone(), Arc::clone(files));
            }
        }

        let hits = cached.iter().filter(|hit| hit.is_some()).count();
        debug!(
            archives = archives.len(),
            cache_hits = hits,
            "loaded dependency archives"
        );
        Ok(merge(archives, &decoded))
    }

    fn decode(&self, spec: &ArchiveSpec) -> Result<FileMap, ArchiveError> {
        let bytes = std::fs::read(Path::new(&spec.name))
            .map_err(|err| ArchiveError::io(&spec.name, err))?;
        debug!(archive = %spec.name, bytes = bytes.len(), "decoding archive");
        self.codec
            .unbundle(&bytes)
            .map_err(|source| ArchiveError::Decode {
                name: spec.name.clone(),
                source,
            })
    }
}

fn merge(archives: &[ArchiveSpec], decoded: &[Arc<FileMap>]) -> LoadedArchives {
    let mut files = FileMap::new();
    let mut origins: HashMap<String, String> = HashMap::new();
    let mut collisions = Vec::new();

    for (spec, archive) in archives.iter().zip(decoded) {
        for (path, data) in archive.iter() {
            if let Some(previous) = origins.insert(path.clone(), spec.name.clone()) {
                if previous != spec.name {
                    warn!(
                        path = %path,
                        winner = %spec.name,
                        shadowed = %previous,
                        "dependency path provided by more than one archive"
                    );
                    collisions.push(Collision {
                        path: path.clone(),
                        winner: spec.name.clone(),
                        shadowed: previous,
                    });
                }
            }
            files.insert(path.clone(), Arc::clone(data));
        }
    }

    LoadedArchives {
        resolver: Resolver::snapshot(files),
        origins,
        collisions,
    }
}
