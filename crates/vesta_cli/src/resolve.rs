//! `vesta resolve`: build the virtual tree of a request and inspect it.

use std::io::Write;
use std::path::Path;

use vesta_driver::{resolve, BuildSession, CompilerHost, Workspace};
use vesta_vfs::FileResolver;

use crate::request::load_request;
use crate::{GlobalArgs, ResolveArgs};

/// Runs the `vesta resolve` command.
///
/// Paths are looked up the way the compiler sees them, so relative paths
/// are rooted at `/`. Without `--list` or `--cat`, prints a summary of the
/// tree and, with `--verbose`, every source path. Returns 1 if a requested
/// path is not in the tree.
pub fn run(args: &ResolveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_request(global)?;
    let session: BuildSession<()> = BuildSession::new(&config.cache);
    let workspace = resolve(
        &session,
        &config.archives,
        &config.source_paths(),
        Path::new(&config.request.source_root),
        &config.request.dependency_root,
        &config.compiler.source_extensions,
    )?;

    let host = CompilerHost::new(&workspace.resolver, session.source_cache());
    let mut out = std::io::stdout().lock();
    let mut code = 0;

    if let Some(dir) = &args.list {
        match host.list_directories(dir) {
            Some(children) => {
                for child in children {
                    writeln!(out, "{child}")?;
                }
            }
            None => {
                eprintln!("error: no such directory: {dir}");
                code = 1;
            }
        }
    }

    if let Some(file) = &args.cat {
        match host.read_file(file) {
            Some(data) => out.write_all(&data)?,
            None => {
                eprintln!("error: no such file: {file}");
                code = 1;
            }
        }
    }

    if args.list.is_none() && args.cat.is_none() {
        summarize(&workspace, &config.request.dependency_root, global, &mut out)?;
    }

    Ok(code)
}

fn summarize(
    workspace: &Workspace,
    dependency_root: &str,
    global: &GlobalArgs,
    out: &mut impl Write,
) -> std::io::Result<()> {
    if global.verbose {
        for source in &workspace.sources {
            writeln!(out, "{source}")?;
        }
    }
    for collision in &workspace.collisions {
        eprintln!(
            "warning: {} is provided by both {} and {}; using {}",
            collision.path, collision.shadowed, collision.winner, collision.winner
        );
    }
    if !global.quiet {
        eprintln!(
            "   Resolved {} source(s), {} file(s) under {}",
            workspace.sources.len(),
            workspace.origins.len(),
            dependency_root
        );
    }
    Ok(())
}
