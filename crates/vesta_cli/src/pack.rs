//! `vesta pack`: bundle files into an archive with the tar codec.

use std::path::{Path, PathBuf};

use vesta_archive::{source_vpath, ArchiveError, ArchiveWriter, TarCodec};

use crate::{GlobalArgs, PackArgs};

/// Runs the `vesta pack` command.
///
/// Each file is stored under its path relative to `--root`, rooted at `/`,
/// so the archive can later be mounted as a dependency.
pub fn run(args: &PackArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let files: Vec<PathBuf> = args.files.iter().map(PathBuf::from).collect();
    let count = pack(Path::new(&args.output), Path::new(&args.root), &files)?;
    if !global.quiet {
        eprintln!("      Packed {count} file(s) into {}", args.output);
    }
    Ok(0)
}

fn pack(output: &Path, root: &Path, files: &[PathBuf]) -> Result<usize, ArchiveError> {
    let mut writer = ArchiveWriter::create(output, &TarCodec)?;
    for file in files {
        let name = source_vpath(file, root)?;
        let data = std::fs::read(file).map_err(|err| ArchiveError::io(file, err))?;
        writer.write_file(name.as_str(), &data)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_archive::BundleCodec;

    #[test]
    fn packed_files_are_rooted_below_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib/util")).unwrap();
        std::fs::write(dir.path().join("lib/index.d.ts"), "export * from './util';").unwrap();
        std::fs::write(dir.path().join("lib/util/index.d.ts"), "export {};").unwrap();

        let out = dir.path().join("lib.tar");
        let files = vec![
            dir.path().join("lib/index.d.ts"),
            dir.path().join("lib/util/index.d.ts"),
        ];
        assert_eq!(pack(&out, dir.path(), &files).unwrap(), 2);

        let unpacked = TarCodec.unbundle(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(
            unpacked.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["/lib/index.d.ts", "/lib/util/index.d.ts"]
        );
        assert_eq!(&*unpacked["/lib/util/index.d.ts"], b"export {};");
    }

    #[test]
    fn missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = pack(
            &dir.path().join("out.tar"),
            dir.path(),
            &[dir.path().join("absent.ts")],
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::Io { .. }));
    }
}
