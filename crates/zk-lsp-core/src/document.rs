//! Open documents and the edits the editor sends for them.
//!
//! A [`DocumentSession`] mirrors the text of one document open in the
//! editor. Each change notification must carry a version newer than the
//! current one; when it does not, or when an edit cannot be applied, the
//! session can no longer be trusted and [`DocumentStore::change`] drops it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::links::{self, Link};
use crate::notebook::FileStorage;
use crate::text::{self, PositionError};
use crate::types::{Position, Range};

/// Language identifiers accepted on open.
pub const NOTE_LANGUAGE_IDS: &[&str] = &["markdown", "vimwiki"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("version {received} is not newer than current version {current}")]
    StaleVersion { current: i32, received: i32 },

    #[error("edit range ends before it starts: {start:?} > {end:?}")]
    InvertedRange { start: Position, end: Position },

    #[error(transparent)]
    Position(#[from] PositionError),
}

/// One content change from a `didChange` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextChange {
    /// Replace the whole document.
    Full(String),
    /// Replace `range` with `text`.
    Range { range: Range, text: String },
}

/// The payload of a `didOpen` notification.
#[derive(Debug, Clone)]
pub struct OpenDocument {
    pub uri: String,
    pub language_id: String,
    pub version: i32,
    pub text: String,
}

impl OpenDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }
}

/// The server's copy of a document open in the editor.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    uri: String,
    path: PathBuf,
    content: String,
    version: i32,
}

impl DocumentSession {
    pub fn new(
        uri: impl Into<String>,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        version: i32,
    ) -> Self {
        Self {
            uri: uri.into(),
            path: path.into(),
            content: content.into(),
            version,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Canonical filesystem path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Apply `changes` in order and move to `version`.
    ///
    /// Range positions of each change are interpreted against the text left
    /// by the previous one. On error the content is left untouched.
    pub fn apply_changes(&mut self, version: i32, changes: &[TextChange]) -> Result<(), EditError> {
        if version <= self.version {
            return Err(EditError::StaleVersion {
                current: self.version,
                received: version,
            });
        }

        let mut content = self.content.clone();
        for change in changes {
            match change {
                TextChange::Full(text) => content = text.clone(),
                TextChange::Range { range, text } => {
                    if range.end < range.start {
                        return Err(EditError::InvertedRange {
                            start: range.start,
                            end: range.end,
                        });
                    }
                    let start = edit_offset(&content, range.start)?;
                    let end = edit_offset(&content, range.end)?;
                    // Clamping can pull the end back before the start.
                    content.replace_range(start..end.max(start), text);
                }
            }
        }

        self.content = content;
        self.version = version;
        Ok(())
    }

    /// The `count` characters right before `pos` on its line, or `None`
    /// when the line holds fewer.
    pub fn look_behind(&self, pos: Position, count: usize) -> Option<&str> {
        let (start, _) = text::line_bounds(&self.content, pos.line)?;
        let cursor = text::offset_at(&self.content, pos).ok()?;
        let before = &self.content[start..cursor];
        if count == 0 {
            return Some("");
        }
        let (index, _) = before.char_indices().rev().nth(count - 1)?;
        Some(&before[index..])
    }

    /// Every link in the document, in order of appearance.
    pub fn links(&self) -> Vec<Link> {
        links::scan(&self.content)
    }

    /// The link whose range contains `pos`, ends included.
    pub fn link_at(&self, pos: Position) -> Option<Link> {
        self.links()
            .into_iter()
            .find(|link| link.range.contains_inclusive(pos))
    }
}

/// Byte offset of an edit position. The line right after the last one is
/// the end of the document, which editors send when deleting the last line.
fn edit_offset(content: &str, pos: Position) -> Result<usize, PositionError> {
    if pos.line as usize == text::line_count(content) {
        return Ok(content.len());
    }
    text::offset_at(content, pos)
}

/// Filesystem path a document URI designates.
pub fn uri_to_path(uri: &str) -> PathBuf {
    let raw = uri.strip_prefix("file://").unwrap_or(uri);
    let decoded = urlencoding::decode_binary(raw.as_bytes());
    PathBuf::from(String::from_utf8_lossy(&decoded).as_ref())
}

/// All open documents, keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    sessions: HashMap<String, DocumentSession>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a document. Returns `false` when its language is not
    /// one notes are written in.
    pub fn open(&mut self, document: OpenDocument, fs: &dyn FileStorage) -> bool {
        if !NOTE_LANGUAGE_IDS.contains(&document.language_id.as_str()) {
            return false;
        }
        let path = fs.canonical(&uri_to_path(&document.uri));
        let session = DocumentSession::new(
            document.uri.clone(),
            path,
            document.text,
            document.version,
        );
        self.sessions.insert(document.uri, session);
        true
    }

    /// Apply a change notification.
    ///
    /// Returns `Ok(false)` for documents that are not open. A failed edit
    /// closes the session before the error is returned.
    pub fn change(
        &mut self,
        uri: &str,
        version: i32,
        changes: &[TextChange],
    ) -> Result<bool, EditError> {
        let Some(session) = self.sessions.get_mut(uri) else {
            return Ok(false);
        };
        if let Err(err) = session.apply_changes(version, changes) {
            self.sessions.remove(uri);
            return Err(err);
        }
        Ok(true)
    }

    /// Stop tracking a document. Returns `false` if it was not open.
    pub fn close(&mut self, uri: &str) -> bool {
        self.sessions.remove(uri).is_some()
    }

    pub fn get(&self, uri: &str) -> Option<&DocumentSession> {
        self.sessions.get(uri)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
