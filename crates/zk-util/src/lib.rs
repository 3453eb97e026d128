//! Shared utilities for the zk crates.

pub mod paths;
pub mod strings;
pub mod version;

pub use paths::clean_path;
pub use strings::{is_url, pluralize};
pub use version::{cargo_version, cli_version};
