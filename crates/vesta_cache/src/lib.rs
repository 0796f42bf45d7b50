//! Bounded in-memory caches shared across build requests.
//!
//! [`RecencyCache`] is a plain least-recently-used map. [`SharedCache`] puts
//! one behind a mutex so a long-lived worker can reuse decoded archives
//! between requests, and [`SourceCache`] keys parsed source files by their
//! content.

#![warn(missing_docs)]

pub mod recency;
pub mod shared;
pub mod source;

pub use recency::RecencyCache;
pub use shared::SharedCache;
pub use source::{SourceCache, DEFAULT_SOURCE_CAPACITY};
