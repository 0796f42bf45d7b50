//! Dependency hygiene checking.
//!
//! After compilation the compiler reports which files each source resolved
//! as modules, as an [`ImportTable`]. The [`DependencyAuditor`] compares
//! those imports with the dependencies the build declared: importing from an
//! archive no declaration covers is a transitive import, and a declared
//! dependency nothing imports is unused.

#![warn(missing_docs)]

pub mod auditor;
pub mod imports;

pub use auditor::{
    audit, Declaration, DependencyAuditor, UNDECLARED_IMPORT, UNOWNED_IMPORT, UNUSED_DEPENDENCY,
};
pub use imports::ImportTable;
