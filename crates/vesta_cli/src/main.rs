//! Vesta CLI, the command-line interface to the Vesta build layer.
//!
//! Provides `vesta resolve` for inspecting the virtual tree a build request
//! compiles against, `vesta audit` for checking a compiler's import table
//! against the declared dependencies, and `vesta pack` for bundling files
//! into an archive.

#![warn(missing_docs)]

mod audit;
mod pack;
mod request;
mod resolve;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Vesta, a hermetic module tree and dependency auditor for compilers.
#[derive(Parser, Debug)]
#[command(name = "vesta", version, about = "Vesta build layer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `vesta.toml` build request.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the virtual tree of a request and inspect it.
    Resolve(ResolveArgs),
    /// Audit a compiler import table against the declared dependencies.
    Audit(AuditArgs),
    /// Bundle files into an archive.
    Pack(PackArgs),
}

/// Arguments for the `vesta resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// List the subdirectories of a virtual directory.
    #[arg(long, value_name = "DIR")]
    pub list: Option<String>,

    /// Print the contents of a virtual file.
    #[arg(long, value_name = "FILE")]
    pub cat: Option<String>,
}

/// Arguments for the `vesta audit` subcommand.
#[derive(Parser, Debug)]
pub struct AuditArgs {
    /// JSON import table written by the compiler.
    #[arg(long, value_name = "FILE")]
    pub imports: String,

    /// Output format for findings.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `vesta pack` subcommand.
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Archive to write.
    #[arg(short, long, value_name = "FILE")]
    pub output: String,

    /// Directory stripped from each file path to form its archive name.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: String,

    /// Files to bundle.
    #[arg(required = true)]
    pub files: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output, one finding per line.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom build request file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.quiet, cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Resolve(ref args) => resolve::run(args, &global),
        Command::Audit(ref args) => audit::run(args, &global),
        Command::Pack(ref args) => pack::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` overrides the flag-derived level.
fn init_logging(quiet: bool, verbose: bool) {
    let default = log_directive(quiet, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn log_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}
