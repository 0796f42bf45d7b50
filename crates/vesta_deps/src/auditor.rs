//! Checking resolved imports against declared dependencies.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use vesta_common::vpath;
use vesta_diagnostics::{Category, Diagnostic, DiagnosticCode};

use crate::imports::ImportTable;

/// A source imports a file from an archive no declared dependency covers.
pub const UNDECLARED_IMPORT: DiagnosticCode = DiagnosticCode::new(Category::Dependency, 1);

/// A declared dependency is never imported.
pub const UNUSED_DEPENDENCY: DiagnosticCode = DiagnosticCode::new(Category::Dependency, 2);

/// A source imports a file under the dependency root that no archive provided.
pub const UNOWNED_IMPORT: DiagnosticCode = DiagnosticCode::new(Category::Dependency, 3);

/// A dependency the build declares, and the archive that provides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// The name the dependency is reported under.
    pub label: String,
    /// The archive name, as given to the archive loader.
    pub archive: String,
}

impl Declaration {
    /// Creates a declaration.
    pub fn new(label: impl Into<String>, archive: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            archive: archive.into(),
        }
    }
}

/// Classifies resolved imports as same-tree, declared or transitive.
///
/// Only imports under the dependency root are checked. Their path below the
/// root is looked up in the archive origin map produced when the archives
/// were loaded.
#[derive(Debug)]
pub struct DependencyAuditor<'a> {
    dependency_root: &'a str,
    declared: &'a [Declaration],
    labels_by_archive: HashMap<&'a str, Vec<&'a str>>,
    exempt: HashSet<&'a str>,
}

impl<'a> DependencyAuditor<'a> {
    /// Creates an auditor for dependencies mounted at `dependency_root`.
    ///
    /// Labels in `exempt` are never reported as unused.
    pub fn new(dependency_root: &'a str, declared: &'a [Declaration], exempt: &'a [String]) -> Self {
        let mut labels_by_archive: HashMap<&str, Vec<&str>> = HashMap::new();
        for decl in declared {
            labels_by_archive
                .entry(decl.archive.as_str())
                .or_default()
                .push(decl.label.as_str());
        }
        Self {
            dependency_root,
            declared,
            labels_by_archive,
            exempt: exempt.iter().map(String::as_str).collect(),
        }
    }

    /// Audits `imports`, returning findings in table order followed by unused
    /// dependencies in declaration order.
    ///
    /// `origins` maps each path inside the dependency tree (relative to the
    /// dependency root, starting with `/`) to the archive that provided it.
    pub fn audit_imports(
        &self,
        imports: &ImportTable,
        origins: &HashMap<String, String>,
    ) -> Vec<Diagnostic> {
        let mut findings = Vec::new();
        let mut used: HashSet<&str> = HashSet::new();

        for (source, imported) in imports.records() {
            let Some(inner) = vpath::relocate(imported, self.dependency_root) else {
                continue;
            };
            let display = inner.trim_start_matches('/');
            let Some(archive) = origins.get(inner) else {
                findings.push(
                    Diagnostic::warning(
                        UNOWNED_IMPORT,
                        format!("{source} imports {display}, which no dependency archive provides"),
                    )
                    .with_file(source),
                );
                continue;
            };
            match self.labels_by_archive.get(archive.as_str()) {
                Some(labels) => used.extend(labels.iter().copied()),
                None => findings.push(
                    Diagnostic::error(
                        UNDECLARED_IMPORT,
                        format!(
                            "{source} imports {display} from {archive}, which is not a declared dependency"
                        ),
                    )
                    .with_file(source)
                    .with_help(format!("declare the dependency that provides {archive}")),
                ),
            }
        }

        let mut reported: HashSet<&str> = HashSet::new();
        for decl in self.declared {
            let label = decl.label.as_str();
            if used.contains(label) || self.exempt.contains(label) || !reported.insert(label) {
                continue;
            }
            findings.push(
                Diagnostic::error(UNUSED_DEPENDENCY, format!("unused dependency {label}"))
                    .with_note(format!("nothing imports from {}", decl.archive)),
            );
        }

        debug!(
            records = imports.records().count(),
            findings = findings.len(),
            "audited imports"
        );
        findings
    }
}

/// Audits `imports` and renders each finding as one line.
///
/// An empty result means the build's dependencies are clean.
pub fn audit(
    imports: &ImportTable,
    origins: &HashMap<String, String>,
    declared: &[Declaration],
    exempt: &[String],
    dependency_root: &str,
) -> Vec<String> {
    DependencyAuditor::new(dependency_root, declared, exempt)
        .audit_imports(imports, origins)
        .iter()
        .map(Diagnostic::to_string)
        .collect()
}
