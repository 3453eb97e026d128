/*
 * notebook.rs
 * Copyright (c) 2025 zk contributors
 *
 * The collaborators the server queries but does not own: the filesystem
 * and the notebook repository.
 */

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("no notebook found containing {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid notebook config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("invalid link format: {0}")]
    LinkFormat(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Filesystem access.
pub trait FileStorage: Send + Sync {
    /// Absolute, symlink-free form of `path`. Falls back to `path` itself
    /// when it cannot be resolved.
    fn canonical(&self, path: &Path) -> PathBuf;

    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Locates the notebook owning a path.
pub trait NotebookStore: Send + Sync {
    fn open(&self, path: &Path) -> Result<Arc<dyn Notebook>, NotebookError>;
}

/// A note indexed in a notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Path relative to the notebook root.
    pub path: PathBuf,
    /// Empty when the note has no title.
    pub title: String,
    pub raw_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Tag,
}

/// A named group of notes, with the number of notes it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub kind: CollectionKind,
    pub name: String,
    pub note_count: usize,
}

/// The Markdown flavor a notebook is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownSettings {
    pub hashtags: bool,
    pub colon_tags: bool,
    pub multiword_tags: bool,
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            hashtags: true,
            colon_tags: false,
            multiword_tags: false,
        }
    }
}

/// Renders a link to a note in the notebook's configured style.
pub trait LinkFormatter: Send + Sync {
    /// `path` uses `/` separators and is relative to the linking document
    /// when possible.
    fn format(&self, path: &str, title: &str) -> Result<String, NotebookError>;
}

pub trait Notebook: Send + Sync {
    /// The notebook's root directory.
    fn root(&self) -> &Path;

    fn markdown_settings(&self) -> MarkdownSettings;

    /// The note an href (relative to the root) designates, if any.
    fn find_by_href(&self, href: &str) -> Result<Option<Note>, NotebookError>;

    /// The notes several hrefs designate, in the order given.
    ///
    /// Implementations that list notes from storage do it once per call.
    fn find_by_hrefs(&self, hrefs: &[String]) -> Result<Vec<Option<Note>>, NotebookError> {
        hrefs.iter().map(|href| self.find_by_href(href)).collect()
    }

    fn find_notes(&self) -> Result<Vec<Note>, NotebookError>;

    fn find_collections(&self, kind: CollectionKind) -> Result<Vec<Collection>, NotebookError>;

    fn link_formatter(&self) -> Result<Box<dyn LinkFormatter>, NotebookError>;
}
