//! End-to-end build requests against a line-oriented test compiler.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use vesta_archive::{BundleCodec, TarCodec};
use vesta_common::VPath;
use vesta_config::{load_config_from_str, BuildConfig};
use vesta_deps::{ImportTable, UNDECLARED_IMPORT, UNUSED_DEPENDENCY};
use vesta_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};
use vesta_driver::{
    run_build, Artifact, BuildSession, CompileOptions, CompileOutput, Compiler, CompilerHost,
    ExitStatus,
};
use vesta_vfs::FileResolver;

const UNRESOLVED: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);

/// Treats every `import <path>` line as an import of an absolute path and
/// emits each source unchanged with a `.js` suffix.
#[derive(Default)]
struct LineCompiler {
    parses: AtomicUsize,
}

impl Compiler for LineCompiler {
    type Source = Vec<String>;

    fn compile(
        &self,
        host: &CompilerHost<'_, Vec<String>>,
        sources: &[VPath],
        options: &CompileOptions,
    ) -> CompileOutput {
        let mut output = CompileOutput::default();
        let mut imports = ImportTable::new();
        for source in sources {
            let Some(lines) = host.source_file(source.as_str(), &options.lang_version, |_, text| {
                self.parses.fetch_add(1, Ordering::SeqCst);
                text.lines().map(str::to_string).collect()
            }) else {
                continue;
            };
            for target in lines.iter().filter_map(|l| l.strip_prefix("import ")) {
                if host.file_exists(target) {
                    imports.note_import(source.as_str(), target);
                } else {
                    output.diagnostics.push(
                        Diagnostic::error(UNRESOLVED, format!("cannot find module {target}"))
                            .with_file(source.as_str()),
                    );
                }
            }
            let js = source.as_str().replace(".ts", ".js");
            output.artifacts.push(Artifact::new(js, lines.join("\n")));
        }
        output.imports = imports;
        output
    }
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fixture.archive("a.tar", &[("/libA/index.d.ts", "export const a = 1;")]);
        fixture.archive("b.tar", &[("/libB/index.d.ts", "export const b = 2;")]);
        fixture.archive("c.tar", &[("/libC/index.d.ts", "export const c = 3;")]);
        std::fs::create_dir(fixture.path().join("app")).unwrap();
        fixture
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn archive(&self, name: &str, files: &[(&str, &str)]) {
        let mut bytes = Vec::new();
        for (path, text) in files {
            bytes.extend(TarCodec.bundle(path, text.as_bytes()).unwrap());
        }
        std::fs::write(self.path().join(name), bytes).unwrap();
    }

    fn source(&self, name: &str, text: &str) {
        std::fs::write(self.path().join(name), text).unwrap();
    }

    /// A request over `app/main.ts` declaring `declared` (labels of the
    /// fixture archives) with the given audit policy.
    fn config(&self, declared: &[&str], policy: &str) -> BuildConfig {
        let root = self.path().display();
        let mut toml = format!(
            r#"
[request]
source_root = '{root}'
sources = ['{root}/app/main.ts']
output = '{root}/out.tar'

[audit]
policy = "{policy}"
"#
        );
        for label in ["a", "b", "c"] {
            toml.push_str(&format!(
                "\n[[archives]]\nname = '{root}/{label}.tar'\nchecksum = '{label}-1'\n"
            ));
        }
        for label in declared {
            toml.push_str(&format!(
                "\n[[dependencies]]\nlabel = '{label}'\narchive = '{root}/{label}.tar'\n"
            ));
        }
        load_config_from_str(&toml).unwrap()
    }
}

const MAIN: &str = "import /node_modules/libA/index.d.ts\nimport /node_modules/libB/index.d.ts\nlet x = a + b;";

#[test]
fn clean_build_writes_artifacts() {
    let fx = Fixture::new();
    fx.source("app/main.ts", MAIN);
    let session = BuildSession::default();
    let compiler = LineCompiler::default();

    let outcome = run_build(&session, &fx.config(&["a", "b"], "error"), &compiler).unwrap();

    assert_eq!(outcome.status, ExitStatus::Success);
    assert!(outcome.diagnostics.is_empty());
    assert!(outcome.hygiene.is_empty());
    assert_eq!(outcome.artifacts_written, 1);
    let written = TarCodec
        .unbundle(&std::fs::read(fx.path().join("out.tar")).unwrap())
        .unwrap();
    assert_eq!(
        written.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["/app/main.js"]
    );
}

#[test]
fn transitive_dependency_fails_with_status_3() {
    let fx = Fixture::new();
    fx.source("app/main.ts", MAIN);
    let session = BuildSession::default();

    let outcome = run_build(&session, &fx.config(&["a"], "error"), &LineCompiler::default()).unwrap();

    assert_eq!(outcome.status, ExitStatus::DependencyViolation);
    assert_eq!(outcome.status.code(), 3);
    assert_eq!(outcome.hygiene.len(), 1);
    assert_eq!(outcome.hygiene[0].code, UNDECLARED_IMPORT);
    assert!(outcome.hygiene[0].message.contains("b.tar"));
    assert_eq!(outcome.hygiene[0].file.as_deref(), Some("/app/main.ts"));
}

#[test]
fn unused_dependency_fails_with_status_3() {
    let fx = Fixture::new();
    fx.source("app/main.ts", MAIN);
    let session = BuildSession::default();

    let outcome = run_build(
        &session,
        &fx.config(&["a", "b", "c"], "error"),
        &LineCompiler::default(),
    )
    .unwrap();

    assert_eq!(outcome.status, ExitStatus::DependencyViolation);
    let codes: Vec<_> = outcome.hygiene.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![UNUSED_DEPENDENCY]);
    assert!(outcome.hygiene[0].message.contains("c"));
}

#[test]
fn warn_policy_keeps_success() {
    let fx = Fixture::new();
    fx.source("app/main.ts", MAIN);
    let session = BuildSession::default();

    let outcome = run_build(&session, &fx.config(&["a"], "warn"), &LineCompiler::default()).unwrap();

    assert_eq!(outcome.status, ExitStatus::Success);
    assert_eq!(outcome.hygiene.len(), 1);
    assert_eq!(outcome.hygiene[0].severity, Severity::Warning);
}

#[test]
fn off_policy_skips_audit() {
    let fx = Fixture::new();
    fx.source("app/main.ts", MAIN);
    let session = BuildSession::default();

    let outcome = run_build(&session, &fx.config(&[], "off"), &LineCompiler::default()).unwrap();

    assert_eq!(outcome.status, ExitStatus::Success);
    assert!(outcome.hygiene.is_empty());
}

#[test]
fn compile_error_writes_nothing() {
    let fx = Fixture::new();
    fx.source("app/main.ts", "import /node_modules/libZ/index.d.ts");
    let session = BuildSession::default();

    let outcome = run_build(&session, &fx.config(&["a"], "error"), &LineCompiler::default()).unwrap();

    assert_eq!(outcome.status, ExitStatus::CompileFailure);
    assert_eq!(outcome.status.code(), 1);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.hygiene.is_empty());
    assert!(!fx.path().join("out.tar").exists());
}

#[test]
fn caches_survive_across_requests() {
    let fx = Fixture::new();
    fx.source("app/main.ts", MAIN);
    let session = BuildSession::default();
    let compiler = LineCompiler::default();
    let config = fx.config(&["a", "b"], "error");

    run_build(&session, &config, &compiler).unwrap();
    run_build(&session, &config, &compiler).unwrap();
    assert_eq!(compiler.parses.load(Ordering::SeqCst), 1);
    assert_eq!(session.archive_cache().len(), 3);

    fx.source("app/main.ts", "import /node_modules/libA/index.d.ts\nimport /node_modules/libB/index.d.ts");
    run_build(&session, &config, &compiler).unwrap();
    assert_eq!(compiler.parses.load(Ordering::SeqCst), 2);
}

#[test]
fn colliding_archives_are_reported() {
    let fx = Fixture::new();
    fx.archive("c.tar", &[("/libA/index.d.ts", "shadow")]);
    fx.source("app/main.ts", "import /node_modules/libA/index.d.ts");
    let session = BuildSession::default();

    let outcome = run_build(&session, &fx.config(&["c"], "error"), &LineCompiler::default()).unwrap();

    assert_eq!(outcome.collisions.len(), 1);
    assert_eq!(outcome.collisions[0].path, "/libA/index.d.ts");
    assert!(outcome.collisions[0].winner.ends_with("c.tar"));
    assert_eq!(outcome.status, ExitStatus::Success);
}

#[test]
fn missing_source_is_a_driver_error() {
    let fx = Fixture::new();
    let session: BuildSession<Vec<String>> = BuildSession::default();

    let err = run_build(&session, &fx.config(&[], "off"), &LineCompiler::default()).unwrap_err();

    assert!(matches!(err, vesta_driver::DriverError::Archive(_)));
}
