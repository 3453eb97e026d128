//! Filesystem-backed notebooks.
//!
//! A notebook is a directory holding a `.zk` directory. Notes are the
//! Markdown files below it; `.zk/config.toml` selects the Markdown flavor
//! and the link style used when inserting links.

pub mod config;
pub mod discovery;
pub mod format;
pub mod notebook;
pub mod storage;
pub mod store;

pub use config::{LinkFormat, MarkdownConfig, MarkdownConfigError, NotebookConfig};
pub use format::ConfiguredLinkFormatter;
pub use notebook::FsNotebook;
pub use storage::FsStorage;
pub use store::FsNotebookStore;

/// Name of the directory marking a notebook root.
pub const NOTEBOOK_DIR: &str = ".zk";
