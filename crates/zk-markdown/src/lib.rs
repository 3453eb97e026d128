/*
 * lib.rs
 * Copyright (c) 2025 zk contributors
 *
 * Block and inline scanning for zk note markdown.
 *
 * This crate does not render markdown. It splits note text into blocks,
 * then walks each block's lines with an inline scanner that hands trigger
 * characters to pluggable inline parsers. The zk-specific syntaxes (block
 * anchors, hashtags, colon tags) are implemented as such parsers in
 * `extensions`.
 */

mod block;
pub mod extensions;
mod scanner;

pub use block::{Block, BlockKind, Segment, split_blocks};
pub use extensions::{BlockAnchorExtension, TagExtension, TagOptions};
pub use scanner::{Extension, InlineInput, InlineMatch, InlineParser, MarkdownParser};

use serde::Serialize;

/// A parsed note: its blocks, each with scanned inlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// All block anchors in document order.
    pub fn block_anchors(&self) -> impl Iterator<Item = &BlockAnchor> {
        self.inlines().filter_map(|inline| match inline {
            Inline::BlockAnchor(anchor) => Some(anchor),
            _ => None,
        })
    }

    /// All tag names in document order, duplicates included.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.inlines()
            .filter_map(|inline| match inline {
                Inline::Tag(tag) => Some(tag.names.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
    }

    fn inlines(&self) -> impl Iterator<Item = &Inline> {
        self.blocks.iter().flat_map(|block| block.inlines.iter())
    }
}

/// An inline node produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "t", content = "c")]
pub enum Inline {
    /// Literal text, never spanning a line break.
    Text(Segment),
    BlockAnchor(BlockAnchor),
    Tag(Tag),
}

/// A `^identifier` token marking the enclosing block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockAnchor {
    /// The identifier, without the caret.
    pub id: String,
    /// Byte span of the token in the source, caret included.
    pub span: Segment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagStyle {
    Hashtag,
    MultiwordHashtag,
    Colon,
}

/// One tag token. Colon tags (`:a:b:`) carry several names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub names: Vec<String>,
    pub style: TagStyle,
    pub span: Segment,
}

/// Parse `source` with the block anchor extension and default tag options.
pub fn parse(source: &str) -> Document {
    MarkdownParser::new()
        .with_extension(BlockAnchorExtension)
        .with_extension(TagExtension::new(TagOptions::default()))
        .parse(source)
}
