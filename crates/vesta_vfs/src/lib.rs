//! Composable in-memory virtual filesystems for the compiler.
//!
//! A [`Resolver`] answers the four questions a compiler host asks of a
//! filesystem: does a file exist, what are its contents, does a directory
//! exist, and which directories does it contain. Resolvers never touch the
//! real filesystem. They are built once per request from in-memory file maps
//! and composed:
//!
//! - [`SnapshotResolver`] serves a fixed map of files and infers directories
//!   from their paths with a [`DirectoryIndex`].
//! - [`PrefixResolver`] makes another resolver appear under a prefix such as
//!   `/node_modules`.
//! - [`OverlayResolver`] stacks resolvers with first-match-wins precedence.
//!
//! All resolvers are immutable after construction and may be queried from
//! many threads at once.

#![warn(missing_docs)]

pub mod directories;
pub mod overlay;
pub mod prefix;
pub mod resolver;
pub mod snapshot;

pub use directories::DirectoryIndex;
pub use overlay::OverlayResolver;
pub use prefix::PrefixResolver;
pub use resolver::{file_map, FileResolver, Resolver};
pub use snapshot::{FileMap, SnapshotResolver};
