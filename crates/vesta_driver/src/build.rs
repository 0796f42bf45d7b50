//! Running one build request end to end.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};
use vesta_archive::{ArchiveWriter, Collision};
use vesta_config::{AuditPolicy, BuildConfig};
use vesta_deps::{DependencyAuditor, ImportTable};
use vesta_diagnostics::{Diagnostic, Severity};

use crate::compiler::{CompileOptions, Compiler};
use crate::error::DriverError;
use crate::host::CompilerHost;
use crate::resolve::resolve;
use crate::session::BuildSession;

/// How a build request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Compiled, written and audited cleanly.
    Success,
    /// The compiler reported errors, or the request could not be carried out.
    CompileFailure,
    /// The build compiled but violates dependency hygiene.
    DependencyViolation,
}

impl ExitStatus {
    /// The process exit code for this status.
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::CompileFailure => 1,
            ExitStatus::DependencyViolation => 3,
        }
    }
}

/// The result of a build request.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Overall status.
    pub status: ExitStatus,
    /// Diagnostics reported by the compiler.
    pub diagnostics: Vec<Diagnostic>,
    /// Dependency hygiene findings.
    pub hygiene: Vec<Diagnostic>,
    /// Number of artifacts written to the output archive.
    pub artifacts_written: usize,
    /// Dependency paths provided by more than one archive.
    pub collisions: Vec<Collision>,
}

/// Resolves, compiles, writes and audits one build request.
///
/// Compiler errors end the request with [`ExitStatus::CompileFailure`]
/// before anything is written or audited. Otherwise artifacts are written to
/// the configured output archive, then the resolved imports are audited
/// according to the request's audit policy.
pub fn run_build<C: Compiler>(
    session: &BuildSession<C::Source>,
    config: &BuildConfig,
    compiler: &C,
) -> Result<BuildOutcome, DriverError> {
    let request = &config.request;
    let workspace = resolve(
        session,
        &config.archives,
        &config.source_paths(),
        Path::new(&request.source_root),
        &request.dependency_root,
        &config.compiler.source_extensions,
    )?;

    let host = CompilerHost::new(&workspace.resolver, session.source_cache());
    let options = CompileOptions::from(&config.compiler);
    let output = compiler.compile(&host, &workspace.sources, &options);

    if output.has_errors() {
        info!(diagnostics = output.diagnostics.len(), "compilation failed");
        return Ok(BuildOutcome {
            status: ExitStatus::CompileFailure,
            diagnostics: output.diagnostics,
            hygiene: Vec::new(),
            artifacts_written: 0,
            collisions: workspace.collisions,
        });
    }

    let mut artifacts_written = 0;
    if let Some(out) = &request.output {
        let mut writer = ArchiveWriter::create(Path::new(out), session.codec())?;
        for artifact in &output.artifacts {
            writer.write_file(&artifact.path, &artifact.data)?;
        }
        artifacts_written = writer.finish()?;
    }

    let hygiene = audit_request(config, &output.imports, &workspace.origins);

    let status = if hygiene.iter().any(|d| d.severity.is_error()) {
        ExitStatus::DependencyViolation
    } else {
        ExitStatus::Success
    };
    debug!(
        ?status,
        artifacts = artifacts_written,
        findings = hygiene.len(),
        "build finished"
    );
    Ok(BuildOutcome {
        status,
        diagnostics: output.diagnostics,
        hygiene,
        artifacts_written,
        collisions: workspace.collisions,
    })
}

/// Audits `imports` under the request's audit policy.
///
/// `off` yields no findings. `warn` reports every error as a warning.
pub fn audit_request(
    config: &BuildConfig,
    imports: &ImportTable,
    origins: &HashMap<String, String>,
) -> Vec<Diagnostic> {
    let policy = config.audit.policy;
    if policy == AuditPolicy::Off {
        return Vec::new();
    }
    let findings = DependencyAuditor::new(
        &config.request.dependency_root,
        &config.dependencies,
        &config.audit.exempt,
    )
    .audit_imports(imports, origins);
    if policy == AuditPolicy::Warn {
        findings
            .into_iter()
            .map(|d| match d.severity {
                Severity::Error => d.with_severity(Severity::Warning),
                _ => d,
            })
            .collect()
    } else {
        findings
    }
}
