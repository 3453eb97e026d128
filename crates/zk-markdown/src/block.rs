/*
 * block.rs
 * Copyright (c) 2025 zk contributors
 *
 * Split note text into blocks.
 *
 * Block structure comes from pulldown-cmark. Only the leaf blocks the
 * inline extensions care about are kept: paragraphs, headings, list items,
 * plus code and raw blocks so they can be skipped. Every block keeps its
 * content lines as byte segments into the original source so inline
 * parsers can reason about the exact end of the block.
 */

use std::collections::BTreeMap;
use std::ops::Range;

use crate::Inline;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

/// A half-open byte range `[start, stop)` of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    pub start: usize,
    pub stop: usize,
}

impl Segment {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.stop]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    ListItem,
    /// Indented or fenced code. Lines are kept but never inline-scanned.
    CodeBlock,
    /// An HTML block or a metadata header, never inline-scanned.
    Raw,
}

impl BlockKind {
    /// Whether inline parsers run over blocks of this kind.
    pub fn has_inlines(self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::Heading { .. } | BlockKind::ListItem
        )
    }
}

/// A block of note content.
///
/// `lines` hold only the block's content: container markers, indentation
/// and line terminators are left out. The stop of the last line is the end
/// of the block as far as inline parsers are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    pub lines: Vec<Segment>,
    pub inlines: Vec<Inline>,
}

impl Block {
    /// Byte offset where the block's content ends.
    pub fn stop(&self) -> Option<usize> {
        self.lines.last().map(|line| line.stop)
    }
}

/// A block whose content spans are still being collected.
struct OpenBlock {
    kind: BlockKind,
    spans: Vec<Range<usize>>,
}

impl OpenBlock {
    fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            spans: Vec::new(),
        }
    }

    /// Fold the collected spans into one segment per source line. Blocks
    /// without content are dropped.
    fn finish(self, source: &str) -> Option<Block> {
        let mut by_line: BTreeMap<usize, Segment> = BTreeMap::new();
        for span in self.spans {
            for piece in line_pieces(source, span) {
                by_line
                    .entry(line_start(source, piece.start))
                    .and_modify(|line| {
                        line.start = line.start.min(piece.start);
                        line.stop = line.stop.max(piece.stop);
                    })
                    .or_insert(piece);
            }
        }

        if by_line.is_empty() {
            return None;
        }
        Some(Block {
            kind: self.kind,
            lines: by_line.into_values().collect(),
            inlines: Vec::new(),
        })
    }
}

fn parser_options() -> Options {
    Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Split `source` into blocks using CommonMark block structure. Inlines are
/// left empty. Blocks come back in source order.
pub fn split_blocks(source: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open: Vec<OpenBlock> = Vec::new();

    for (event, range) in Parser::new_ext(source, parser_options()).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if let Some(kind) = block_kind(&tag) {
                    open.push(OpenBlock::new(kind));
                } else if is_inline_container(&tag) {
                    push_span(&mut open, range);
                }
            }
            Event::End(tag) => {
                if closes_block(tag)
                    && let Some(block) = open.pop().and_then(|block| block.finish(source))
                {
                    blocks.push(block);
                }
            }
            Event::Text(_)
            | Event::Code(_)
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::FootnoteReference(_)
            | Event::TaskListMarker(_) => push_span(&mut open, range),
            _ => {}
        }
    }

    // List items close after the items nested in them.
    blocks.sort_by_key(|block| block.lines[0].start);
    blocks
}

fn block_kind(tag: &Tag<'_>) -> Option<BlockKind> {
    let kind = match tag {
        Tag::Paragraph => BlockKind::Paragraph,
        Tag::Heading { level, .. } => BlockKind::Heading {
            level: level_to_u8(*level),
        },
        Tag::Item => BlockKind::ListItem,
        Tag::CodeBlock(_) => BlockKind::CodeBlock,
        Tag::HtmlBlock | Tag::MetadataBlock(_) => BlockKind::Raw,
        _ => return None,
    };
    Some(kind)
}

fn closes_block(tag: TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::Item
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
    )
}

/// Inline tags whose range covers their delimiters, e.g. the whole `[a](b)`.
fn is_inline_container(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn push_span(open: &mut [OpenBlock], range: Range<usize>) {
    if let Some(block) = open.last_mut() {
        block.spans.push(range);
    }
}

fn level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Offset of the start of the line containing `offset`.
fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |index| index + 1)
}

/// Split `range` at line breaks, dropping terminators and empty pieces.
fn line_pieces(source: &str, range: Range<usize>) -> impl Iterator<Item = Segment> + '_ {
    let mut start = range.start;
    let end = range.end;
    std::iter::from_fn(move || {
        while start < end {
            let stop = source[start..end].find('\n').map_or(end, |pos| start + pos);
            let piece_start = start;
            start = stop + 1;

            let text = source[piece_start..stop].trim_end_matches('\r');
            if !text.is_empty() {
                return Some(Segment::new(piece_start, piece_start + text.len()));
            }
        }
        None
    })
}
