//! Shared foundational types used across the Vesta build layer.
//!
//! This crate provides content hashing for cache keys, virtual path helpers
//! for the `/`-rooted trees presented to the compiler, and the common
//! internal-error result type.

#![warn(missing_docs)]

pub mod hash;
pub mod result;
pub mod vpath;

pub use hash::ContentHash;
pub use result::{InternalError, VestaResult};
pub use vpath::{PathError, VPath};
