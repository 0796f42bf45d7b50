//! `vesta audit`: check a compiler's import table against the request's
//! declared dependencies.

use std::io::Write;

use vesta_archive::ArchiveLoader;
use vesta_config::AuditPolicy;
use vesta_deps::ImportTable;
use vesta_diagnostics::{DiagnosticRenderer, DiagnosticSink, JsonRenderer, TerminalRenderer};
use vesta_driver::{audit_request, BuildSession, ExitStatus};

use crate::request::load_request;
use crate::{AuditArgs, GlobalArgs, ReportFormat};

/// Runs the `vesta audit` command.
///
/// Only the request's dependency archives are loaded; sources are not read.
/// Returns 3 if the audit finds a violation under the `error` policy.
pub fn run(args: &AuditArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_request(global)?;
    if config.audit.policy == AuditPolicy::Off {
        if !global.quiet {
            eprintln!("   Audit disabled by policy");
        }
        return Ok(ExitStatus::Success.code());
    }

    let json = std::fs::read_to_string(&args.imports)
        .map_err(|e| format!("cannot read import table {}: {e}", args.imports))?;
    let imports = ImportTable::from_json(&json)
        .map_err(|e| format!("malformed import table {}: {e}", args.imports))?;

    let session: BuildSession<()> = BuildSession::new(&config.cache);
    let deps =
        ArchiveLoader::new(session.archive_cache(), session.codec()).load(&config.archives)?;
    let sink = DiagnosticSink::new();
    sink.extend(audit_request(&config, &imports, &deps.origins));
    let findings = sink.take_all();

    let mut out = std::io::stdout().lock();
    match args.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &findings {
                eprintln!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            for diag in &findings {
                writeln!(out, "{}", JsonRenderer.render(diag))?;
            }
        }
    }

    let errors = sink.error_count();
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Audited {} import(s): {} error(s), {} warning(s)",
            imports.records().count(),
            errors,
            findings.len() - errors
        );
    }

    let status = if sink.has_errors() {
        ExitStatus::DependencyViolation
    } else {
        ExitStatus::Success
    };
    Ok(status.code())
}
