//! Structured diagnostics for compilation and dependency hygiene.
//!
//! A [`Diagnostic`] carries a [`Severity`], a categorized [`DiagnosticCode`],
//! a message, the file it concerns and optional notes. Compiler findings and
//! dependency audit findings share this model so the driver can collect both
//! in one [`DiagnosticSink`] and render them with a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
