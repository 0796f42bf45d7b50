//! The seam between the build driver and the compiler it runs.

use vesta_common::VPath;
use vesta_config::CompilerConfig;
use vesta_deps::ImportTable;
use vesta_diagnostics::Diagnostic;

use crate::host::CompilerHost;

/// A compiler that reads its inputs through a [`CompilerHost`].
///
/// The compiler commits to reporting every import it resolved in the
/// returned [`ImportTable`], keyed by the importing source's virtual path.
pub trait Compiler {
    /// Parsed source representation cached across requests.
    type Source: Send + Sync;

    /// Compiles `sources`, reading every file through `host`.
    fn compile(
        &self,
        host: &CompilerHost<'_, Self::Source>,
        sources: &[VPath],
        options: &CompileOptions,
    ) -> CompileOutput;
}

/// Settings passed through to the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Extra command-line arguments.
    pub args: Vec<String>,
    /// Language version sources are parsed for.
    pub lang_version: String,
}

impl From<&CompilerConfig> for CompileOptions {
    fn from(config: &CompilerConfig) -> Self {
        Self {
            args: config.args.clone(),
            lang_version: config.lang_version.clone(),
        }
    }
}

/// A file the compiler emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Virtual path of the emitted file.
    pub path: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl Artifact {
    /// Creates an artifact.
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// Everything a compile produced.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    /// Emitted files, in emit order.
    pub artifacts: Vec<Artifact>,
    /// Compiler diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Resolved imports of every source.
    pub imports: ImportTable,
}

impl CompileOutput {
    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_diagnostics::{Category, DiagnosticCode};

    #[test]
    fn options_from_config() {
        let config = CompilerConfig {
            args: vec!["--strict".to_string()],
            ..CompilerConfig::default()
        };
        let options = CompileOptions::from(&config);
        assert_eq!(options.args, vec!["--strict"]);
        assert_eq!(options.lang_version, "es2020");
    }

    #[test]
    fn warnings_are_not_errors() {
        let code = DiagnosticCode::new(Category::Warning, 1);
        let mut output = CompileOutput::default();
        output.diagnostics.push(Diagnostic::warning(code, "unused variable"));
        assert!(!output.has_errors());
        let code = DiagnosticCode::new(Category::Error, 1);
        output.diagnostics.push(Diagnostic::error(code, "type mismatch"));
        assert!(output.has_errors());
    }
}
