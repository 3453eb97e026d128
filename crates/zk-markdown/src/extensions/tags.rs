/*
 * tags.rs
 * Copyright (c) 2025 zk contributors
 *
 * Recognize tags written inline in notes.
 *
 * - Hashtags: `#tag`, with `\ ` escaping a space inside the name.
 * - Multi-word hashtags (opt-in): `#several words#`.
 * - Colon tags (opt-in): `:tag1:tag2:`.
 *
 * All forms must start the line or follow whitespace.
 */

use crate::block::Segment;
use crate::scanner::{Extension, InlineInput, InlineMatch, InlineParser, MarkdownParser};
use crate::{Inline, Tag, TagStyle};

pub const TAG_PRIORITY: u32 = 1000;

/// Which tag syntaxes are enabled for a notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOptions {
    pub hashtags: bool,
    pub multiword_tags: bool,
    pub colon_tags: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        Self {
            hashtags: true,
            multiword_tags: false,
            colon_tags: false,
        }
    }
}

pub struct TagExtension {
    options: TagOptions,
}

impl TagExtension {
    pub fn new(options: TagOptions) -> Self {
        Self { options }
    }
}

impl Extension for TagExtension {
    fn extend(self, parser: &mut MarkdownParser) {
        if self.options.hashtags {
            parser.add_inline_parser(
                HashtagParser {
                    multiword: self.options.multiword_tags,
                },
                TAG_PRIORITY,
            );
        }
        if self.options.colon_tags {
            parser.add_inline_parser(ColonTagParser, TAG_PRIORITY);
        }
    }
}

/// Characters allowed in a tag name besides escaped spaces.
pub fn is_valid_tag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | '@' | '\'' | '~')
}

fn follows_whitespace(input: &InlineInput<'_>) -> bool {
    input.preceding_char().is_whitespace()
}

/// A purely numeric name is an issue reference (`#12`), not a tag.
fn is_plausible_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().all(|c| c.is_ascii_digit())
}

pub struct HashtagParser {
    pub multiword: bool,
}

impl HashtagParser {
    /// `#several words#`, closed by a `#` followed by whitespace or line end.
    fn parse_multiword(line: &str) -> Option<(String, usize)> {
        let body = &line[1..];
        let close = body.find('#')?;
        let name = &body[..close];
        if name.starts_with(char::is_whitespace) || name.ends_with(char::is_whitespace) {
            return None;
        }
        if !name.contains(' ') || !name.chars().all(|c| c == ' ' || is_valid_tag_char(c)) {
            return None;
        }
        let rest = &body[close + 1..];
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        is_plausible_name(name).then(|| (name.to_string(), close + 2))
    }

    /// `#tag` or `#escaped\ tag`.
    fn parse_single(line: &str) -> Option<(String, usize)> {
        let mut name = String::new();
        let mut consumed = 1;
        let mut chars = line[1..].chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\\' && chars.peek() == Some(&' ') {
                chars.next();
                name.push(' ');
                consumed += 2;
            } else if is_valid_tag_char(c) {
                name.push(c);
                consumed += c.len_utf8();
            } else {
                break;
            }
        }

        // A trailing escaped space belongs to the text, not the tag.
        if name.ends_with(' ') {
            return None;
        }
        is_plausible_name(&name).then_some((name, consumed))
    }
}

impl InlineParser for HashtagParser {
    fn triggers(&self) -> &[char] {
        &['#']
    }

    fn parse(&self, input: &InlineInput<'_>) -> Option<InlineMatch> {
        if !follows_whitespace(input) {
            return None;
        }
        let line = input.peek_line();

        let (name, advance, style) = match self
            .multiword
            .then(|| Self::parse_multiword(line))
            .flatten()
        {
            Some((name, advance)) => (name, advance, TagStyle::MultiwordHashtag),
            None => {
                let (name, advance) = Self::parse_single(line)?;
                (name, advance, TagStyle::Hashtag)
            }
        };

        Some(InlineMatch {
            node: Inline::Tag(Tag {
                names: vec![name],
                style,
                span: Segment::new(input.offset(), input.offset() + advance),
            }),
            advance,
        })
    }
}

pub struct ColonTagParser;

impl InlineParser for ColonTagParser {
    fn triggers(&self) -> &[char] {
        &[':']
    }

    fn parse(&self, input: &InlineInput<'_>) -> Option<InlineMatch> {
        if !follows_whitespace(input) {
            return None;
        }
        let line = input.peek_line();

        let mut names = Vec::new();
        let mut advance = 1;
        let mut rest = &line[1..];
        loop {
            let len: usize = rest
                .chars()
                .take_while(|&c| is_valid_tag_char(c))
                .map(char::len_utf8)
                .sum();
            if len == 0 || !rest[len..].starts_with(':') {
                break;
            }
            names.push(rest[..len].to_string());
            advance += len + 1;
            rest = &rest[len + 1..];
        }

        if names.is_empty() || names.iter().any(|name| !is_plausible_name(name)) {
            return None;
        }
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }

        Some(InlineMatch {
            node: Inline::Tag(Tag {
                names,
                style: TagStyle::Colon,
                span: Segment::new(input.offset(), input.offset() + advance),
            }),
            advance,
        })
    }
}
