//! Core types for editor queries.
//!
//! These types are transport-agnostic and convert one-to-one into their
//! `lsp-types` counterparts in `zk-lsp`.
//!
//! All positions use 0-based line and character indices. Characters are
//! counted in UTF-16 code units, matching the protocol default.

use serde::{Deserialize, Serialize};

/// A position in a text document, expressed as zero-based line and character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based character offset (UTF-16 code units).
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.character.cmp(&other.character))
    }
}

/// A range in a text document, expressed as start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Check if this range contains a position, counting both ends.
    ///
    /// Link lookups use this so a cursor sitting just after the closing
    /// bracket still hits the link.
    pub fn contains_inclusive(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// A replacement of `range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

/// A completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompletionItem {
    /// The text shown in the completion list.
    pub label: String,
    /// Text inserted at the cursor when no `text_edit` is given.
    pub insert_text: Option<String>,
    /// Replacement of existing text around the cursor.
    pub text_edit: Option<TextEdit>,
    /// Short secondary text, e.g. "3 notes".
    pub detail: Option<String>,
    /// Markdown shown next to the list.
    pub documentation: Option<String>,
}

/// A location in another (or the same) document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

/// A link in a document whose target was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    /// Where the link appears in the source document.
    pub range: Range,
    /// A `file://` URL to a note, or an external URL as written.
    pub target: String,
}
