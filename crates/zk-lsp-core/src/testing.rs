//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::notebook::{
    Collection, CollectionKind, FileStorage, LinkFormatter, MarkdownSettings, Note, Notebook,
    NotebookError,
};

/// Paths are already canonical; reads come from a map.
#[derive(Default)]
pub struct FakeStorage {
    pub files: HashMap<PathBuf, String>,
}

impl FileStorage for FakeStorage {
    fn canonical(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

/// Wiki-style links: `[[path]]`.
pub struct WikiFormatter;

impl LinkFormatter for WikiFormatter {
    fn format(&self, path: &str, _title: &str) -> Result<String, NotebookError> {
        Ok(format!("[[{}]]", path))
    }
}

pub struct FakeNotebook {
    pub root: PathBuf,
    pub settings: MarkdownSettings,
    pub notes: Vec<Note>,
    pub tags: Vec<Collection>,
    batch_lookups: AtomicUsize,
}

impl FakeNotebook {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            settings: MarkdownSettings::default(),
            notes: Vec::new(),
            tags: Vec::new(),
            batch_lookups: AtomicUsize::new(0),
        }
    }

    /// How many times `find_by_hrefs` was called.
    pub fn batch_lookups(&self) -> usize {
        self.batch_lookups.load(Ordering::Relaxed)
    }

    pub fn with_note(mut self, path: &str, title: &str, content: &str) -> Self {
        self.notes.push(Note {
            path: PathBuf::from(path),
            title: title.to_string(),
            raw_content: content.to_string(),
        });
        self
    }

    pub fn with_tag(mut self, name: &str, note_count: usize) -> Self {
        self.tags.push(Collection {
            kind: CollectionKind::Tag,
            name: name.to_string(),
            note_count,
        });
        self
    }
}

impl Notebook for FakeNotebook {
    fn root(&self) -> &Path {
        &self.root
    }

    fn markdown_settings(&self) -> MarkdownSettings {
        self.settings
    }

    fn find_by_href(&self, href: &str) -> Result<Option<Note>, NotebookError> {
        Ok(self
            .notes
            .iter()
            .find(|note| {
                let path = note.path.to_string_lossy();
                path == href || path.strip_suffix(".md") == Some(href)
            })
            .cloned())
    }

    fn find_by_hrefs(&self, hrefs: &[String]) -> Result<Vec<Option<Note>>, NotebookError> {
        self.batch_lookups.fetch_add(1, Ordering::Relaxed);
        hrefs.iter().map(|href| self.find_by_href(href)).collect()
    }

    fn find_notes(&self) -> Result<Vec<Note>, NotebookError> {
        Ok(self.notes.clone())
    }

    fn find_collections(&self, kind: CollectionKind) -> Result<Vec<Collection>, NotebookError> {
        Ok(self
            .tags
            .iter()
            .filter(|collection| collection.kind == kind)
            .cloned()
            .collect())
    }

    fn link_formatter(&self) -> Result<Box<dyn LinkFormatter>, NotebookError> {
        Ok(Box::new(WikiFormatter))
    }
}
