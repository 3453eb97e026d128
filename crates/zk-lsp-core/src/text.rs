/*
 * text.rs
 * Copyright (c) 2025 zk contributors
 *
 * Conversions between protocol positions and byte offsets.
 *
 * Lines are separated by `\n`. A `\r` right before the `\n` is part of the
 * terminator, so a character offset past the end of a line lands before it.
 */

use crate::types::Position;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("line {line} is outside the document ({line_count} lines)")]
    LineOutOfRange { line: u32, line_count: usize },

    #[error("character {character} on line {line} falls inside a surrogate pair")]
    InsideCharacter { line: u32, character: u32 },
}

/// Byte range of line `line`, excluding its terminator.
pub fn line_bounds(text: &str, line: u32) -> Option<(usize, usize)> {
    let start = if line == 0 {
        0
    } else {
        text.match_indices('\n').nth(line as usize - 1)?.0 + 1
    };
    let end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    let end = if end > start && text.as_bytes()[end - 1] == b'\r' && end < text.len() {
        end - 1
    } else {
        end
    };
    Some((start, end))
}

pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Byte offset of `pos` in `text`.
///
/// A character past the end of the line clamps to the line end.
pub fn offset_at(text: &str, pos: Position) -> Result<usize, PositionError> {
    let (start, end) = line_bounds(text, pos.line).ok_or(PositionError::LineOutOfRange {
        line: pos.line,
        line_count: line_count(text),
    })?;

    let mut units = 0u32;
    for (index, ch) in text[start..end].char_indices() {
        if units == pos.character {
            return Ok(start + index);
        }
        units += ch.len_utf16() as u32;
        if units > pos.character {
            return Err(PositionError::InsideCharacter {
                line: pos.line,
                character: pos.character,
            });
        }
    }
    Ok(end)
}

/// Position of byte `offset`, which must lie on a character boundary.
pub fn position_at(text: &str, offset: usize) -> Position {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Position::new(
        before.matches('\n').count() as u32,
        utf16_len(&text[line_start..offset]),
    )
}

pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}
