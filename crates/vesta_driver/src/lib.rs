//! Build orchestration for Vesta.
//!
//! A [`BuildSession`] owns the process-wide caches and is created once per
//! worker. Each request is resolved into one virtual tree (sources at the
//! root, dependency archives under the dependency root), handed to a
//! [`Compiler`] through a [`CompilerHost`], and finally audited for
//! dependency hygiene by [`run_build`].

#![warn(missing_docs)]

pub mod build;
pub mod compiler;
pub mod error;
pub mod host;
pub mod resolve;
pub mod session;

pub use build::{audit_request, run_build, BuildOutcome, ExitStatus};
pub use compiler::{Artifact, CompileOptions, CompileOutput, Compiler};
pub use error::DriverError;
pub use host::CompilerHost;
pub use resolve::{resolve, Workspace};
pub use session::BuildSession;
