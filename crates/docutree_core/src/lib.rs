#![doc = include_str!("../README.md")]

/// Category sidecars (`_category_.json`)
pub mod category;

/// Configuration options
pub mod config;

/// Content root discovery
pub mod discovery;

/// Error (common error types)
pub mod error;

/// Markdown frontmatter
pub mod frontmatter;

/// Filesystem abstraction
pub mod fs;

/// Document templates
pub mod template;

/// Tree model, sorting and image grouping
pub mod tree;

/// Workspace (the session every operation runs in)
pub mod workspace;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use discovery::{ContentKind, ContentRoot, DiscoveredRoots};
pub use error::{DocutreeError, ErrorClass, Result};
pub use tree::{DocNode, NodeKind};
pub use workspace::{Confirm, ConfirmRequest, Workspace};
