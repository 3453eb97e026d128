//! Command implementations

pub mod lsp;
