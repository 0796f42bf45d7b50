//! The bundle codec interface and the tar-based implementation.

use std::io::Read;
use std::sync::Arc;

use flate2::read::GzDecoder;
use vesta_common::VPath;
use vesta_vfs::FileMap;

use crate::error::CodecError;

/// Packs and unpacks file trees.
///
/// `unbundle` turns a whole archive into a [`FileMap`] with absolute virtual
/// paths. `bundle` packs one file; concatenating the results for several
/// files forms an archive `unbundle` accepts.
pub trait BundleCodec: Send + Sync {
    /// Decodes an archive into its files.
    fn unbundle(&self, bytes: &[u8]) -> Result<FileMap, CodecError>;

    /// Encodes one file as an archive fragment.
    fn bundle(&self, path: &str, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Size of the two zero blocks that terminate a tar stream.
const END_OF_ARCHIVE_LEN: usize = 1024;

/// Leading bytes of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Tar archives, optionally gzip-compressed.
///
/// Entry names are stored relative (`lodash/index.d.ts`) and exposed as
/// absolute virtual paths (`/lodash/index.d.ts`). Only regular files are
/// kept. Fragments produced by [`bundle`](BundleCodec::bundle) carry no
/// end-of-archive marker so they can be appended to one another.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarCodec;

impl TarCodec {
    fn read_entries<R: Read>(reader: R) -> Result<FileMap, CodecError> {
        let mut archive = tar::Archive::new(reader);
        let mut files = FileMap::new();
        for entry in archive.entries()? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let path = entry_path(&name)?;
            // The header size is untrusted; the buffer grows with the bytes
            // actually present.
            let declared = entry.size();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            if data.len() as u64 != declared {
                return Err(CodecError::Malformed {
                    reason: format!(
                        "entry '{name}' declares {declared} bytes but holds {}",
                        data.len()
                    ),
                });
            }
            files.insert(path, Arc::from(data));
        }
        Ok(files)
    }
}

impl BundleCodec for TarCodec {
    fn unbundle(&self, bytes: &[u8]) -> Result<FileMap, CodecError> {
        if bytes.starts_with(&GZIP_MAGIC) {
            Self::read_entries(GzDecoder::new(bytes))
        } else {
            Self::read_entries(bytes)
        }
    }

    fn bundle(&self, path: &str, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let name = path.trim_start_matches('/');
        if name.is_empty() {
            return Err(CodecError::Malformed {
                reason: format!("cannot bundle a file at '{path}'"),
            });
        }
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        let mut builder = tar::Builder::new(Vec::new());
        builder.append_data(&mut header, name, data)?;
        let mut bytes = builder.into_inner()?;
        bytes.truncate(bytes.len() - END_OF_ARCHIVE_LEN);
        Ok(bytes)
    }
}

/// Maps a stored entry name to an absolute virtual path.
fn entry_path(name: &str) -> Result<String, CodecError> {
    let relative = name.trim_start_matches("./");
    VPath::from_relative(relative)
        .map(String::from)
        .map_err(|source| CodecError::InvalidEntry {
            entry: name.to_string(),
            source,
        })
}
