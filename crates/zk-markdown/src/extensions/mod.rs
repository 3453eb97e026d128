//! Inline parsers for zk-specific syntax.

mod block_anchor;
mod tags;

pub use block_anchor::{BLOCK_ANCHOR_PRIORITY, BlockAnchorExtension, BlockAnchorParser};
pub use tags::{
    ColonTagParser, HashtagParser, TAG_PRIORITY, TagExtension, TagOptions, is_valid_tag_char,
};
