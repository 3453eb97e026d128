/*
 * error.rs
 * Copyright (c) 2025 zk contributors
 *
 * Errors raised while answering editor queries.
 */

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::notebook::NotebookError;

#[derive(Debug, Error)]
pub enum LspCoreError {
    /// The href points outside anything expressible relative to the notebook.
    #[error("failed to resolve href: {href}")]
    UnresolvableHref { href: String },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Notebook(#[from] NotebookError),
}

impl LspCoreError {
    /// True when the error means "there is nothing here" rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Notebook(NotebookError::NotFound(_)))
    }
}

pub type Result<T> = std::result::Result<T, LspCoreError>;
