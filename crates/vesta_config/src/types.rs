//! Configuration types deserialized from `vesta.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use vesta_archive::ArchiveSpec;
pub use vesta_deps::Declaration;

/// Where dependency archives are mounted unless the request says otherwise.
pub const DEFAULT_DEPENDENCY_ROOT: &str = "/node_modules";

/// The top-level build request parsed from `vesta.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// What to compile and where to put the result.
    pub request: RequestConfig,
    /// Dependency archives to mount, in merge order.
    #[serde(default)]
    pub archives: Vec<ArchiveSpec>,
    /// Dependencies the build declares.
    #[serde(default)]
    pub dependencies: Vec<Declaration>,
    /// Dependency audit settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Cache sizes for a long-lived worker.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Options passed through to the compiler.
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// The sources of the build and its output.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    /// Directory stripped from source paths to form virtual paths.
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Source files and `.srcjar` archives to compile.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Virtual directory the dependency archives are mounted under.
    #[serde(default = "default_dependency_root")]
    pub dependency_root: String,
    /// Archive the compiled outputs are written to.
    #[serde(default)]
    pub output: Option<String>,
}

fn default_source_root() -> String {
    ".".to_string()
}

fn default_dependency_root() -> String {
    DEFAULT_DEPENDENCY_ROOT.to_string()
}

/// How dependency hygiene findings affect the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditPolicy {
    /// Findings fail the build with the dependency exit status.
    #[default]
    Error,
    /// Findings are reported as warnings and the build succeeds.
    Warn,
    /// The audit is skipped.
    Off,
}

/// Dependency audit settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Labels never reported as unused.
    #[serde(default)]
    pub exempt: Vec<String>,
    /// How findings affect the build.
    #[serde(default)]
    pub policy: AuditPolicy,
}

/// Capacities of the process-wide caches.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Decoded dependency archives kept across requests.
    #[serde(default = "default_archive_capacity")]
    pub archive_capacity: usize,
    /// Parsed source files kept across requests.
    #[serde(default = "default_source_capacity")]
    pub source_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            archive_capacity: default_archive_capacity(),
            source_capacity: default_source_capacity(),
        }
    }
}

fn default_archive_capacity() -> usize {
    vesta_archive::DEFAULT_ARCHIVE_CAPACITY
}

fn default_source_capacity() -> usize {
    vesta_cache::DEFAULT_SOURCE_CAPACITY
}

/// Compiler pass-through settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    /// Extra command-line arguments for the compiler.
    #[serde(default)]
    pub args: Vec<String>,
    /// Suffixes of the entries taken from `.srcjar` archives.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
    /// Language version sources are parsed for. Part of the source cache key.
    #[serde(default = "default_lang_version")]
    pub lang_version: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            source_extensions: default_source_extensions(),
            lang_version: default_lang_version(),
        }
    }
}

fn default_source_extensions() -> Vec<String> {
    vec![".ts".to_string(), ".tsx".to_string()]
}

fn default_lang_version() -> String {
    "es2020".to_string()
}

impl BuildConfig {
    /// Makes every relative filesystem path in the request relative to `base`.
    ///
    /// Archive names in `[[archives]]` and `[[dependencies]]` are rewritten
    /// identically so declarations keep matching.
    pub fn rebase(&mut self, base: &Path) {
        let join = |path: &str| -> String {
            if Path::new(path).is_absolute() {
                path.to_string()
            } else {
                base.join(path).to_string_lossy().into_owned()
            }
        };
        self.request.source_root = join(&self.request.source_root);
        for source in &mut self.request.sources {
            *source = join(source);
        }
        if let Some(output) = &mut self.request.output {
            *output = join(output);
        }
        for archive in &mut self.archives {
            archive.name = join(&archive.name);
        }
        for decl in &mut self.dependencies {
            decl.archive = join(&decl.archive);
        }
    }

    /// Returns the source paths as filesystem paths.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.request.sources.iter().map(PathBuf::from).collect()
    }
}
