/*
 * scanner.rs
 * Copyright (c) 2025 zk contributors
 *
 * The inline scanner and its extension points.
 *
 * The scanner walks a block line by line. Whenever it sits on a character
 * some registered parser declared as a trigger, it builds an `InlineInput`
 * describing the cursor and offers it to those parsers in priority order.
 * A parser either declines (the character becomes literal text) or returns
 * a node plus the number of bytes to advance. Parsers never move the cursor
 * themselves.
 */

use crate::block::{Block, Segment, split_blocks};
use crate::{Document, Inline};

/// The cursor handed to an inline parser.
#[derive(Debug, Clone, Copy)]
pub struct InlineInput<'a> {
    source: &'a str,
    lines: &'a [Segment],
    line: usize,
    offset: usize,
}

impl<'a> InlineInput<'a> {
    pub fn new(source: &'a str, lines: &'a [Segment], line: usize, offset: usize) -> Self {
        debug_assert!(line < lines.len());
        debug_assert!(lines[line].start <= offset && offset <= lines[line].stop);
        Self {
            source,
            lines,
            line,
            offset,
        }
    }

    /// The character before the cursor in the whole source, or `'\n'` at the
    /// start of input.
    pub fn preceding_char(&self) -> char {
        self.source[..self.offset].chars().next_back().unwrap_or('\n')
    }

    /// The rest of the current line, starting at the cursor.
    pub fn peek_line(&self) -> &'a str {
        &self.source[self.offset..self.line_stop()]
    }

    /// Absolute byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Index of the cursor's line within the block.
    pub fn line_index(&self) -> usize {
        self.line
    }

    pub fn is_last_line(&self) -> bool {
        self.line + 1 == self.lines.len()
    }

    /// Byte offset where the cursor's line stops.
    pub fn line_stop(&self) -> usize {
        self.lines[self.line].stop
    }

    /// Byte offset where the enclosing block's last line stops.
    pub fn block_stop(&self) -> usize {
        self.lines.last().map_or(self.offset, |line| line.stop)
    }
}

/// A recognized inline node and how far the scanner must advance past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    pub node: Inline,
    /// Bytes consumed, counted from the trigger character.
    pub advance: usize,
}

pub trait InlineParser: Send + Sync {
    /// Characters that make the scanner consult this parser.
    fn triggers(&self) -> &[char];

    /// Recognize a node starting exactly at the cursor.
    fn parse(&self, input: &InlineInput<'_>) -> Option<InlineMatch>;
}

/// A bundle of parsers registered together.
pub trait Extension {
    fn extend(self, parser: &mut MarkdownParser);
}

struct Prioritized {
    priority: u32,
    parser: Box<dyn InlineParser>,
}

/// CommonMark block structure plus a prioritized set of inline parsers.
#[derive(Default)]
pub struct MarkdownParser {
    inline_parsers: Vec<Prioritized>,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: impl Extension) -> Self {
        extension.extend(&mut self);
        self
    }

    /// Register `parser`. Higher priorities are consulted first; equal
    /// priorities keep registration order.
    pub fn add_inline_parser(&mut self, parser: impl InlineParser + 'static, priority: u32) {
        let index = self
            .inline_parsers
            .iter()
            .position(|p| p.priority < priority)
            .unwrap_or(self.inline_parsers.len());
        self.inline_parsers.insert(
            index,
            Prioritized {
                priority,
                parser: Box::new(parser),
            },
        );
    }

    pub fn parse(&self, source: &str) -> Document {
        let mut blocks = split_blocks(source);
        for block in &mut blocks {
            if block.kind.has_inlines() {
                block.inlines = self.scan_block(source, block);
            }
        }
        Document { blocks }
    }

    fn is_trigger(&self, ch: char) -> bool {
        self.inline_parsers
            .iter()
            .any(|p| p.parser.triggers().contains(&ch))
    }

    fn scan_block(&self, source: &str, block: &Block) -> Vec<Inline> {
        let mut inlines = Vec::new();

        for (line_index, line) in block.lines.iter().enumerate() {
            let mut pos = line.start;
            let mut text_start = pos;

            while pos < line.stop {
                let Some(ch) = source[pos..line.stop].chars().next() else {
                    break;
                };

                if ch == '`' {
                    pos = skip_code_span(source, pos, line.stop);
                    continue;
                }

                if self.is_trigger(ch) {
                    let input = InlineInput::new(source, &block.lines, line_index, pos);
                    if let Some(found) = self.try_parsers(ch, &input) {
                        push_text(&mut inlines, text_start, pos);
                        pos += found.advance;
                        text_start = pos;
                        inlines.push(found.node);
                        continue;
                    }
                }

                pos += ch.len_utf8();
            }

            push_text(&mut inlines, text_start, line.stop);
        }

        inlines
    }

    fn try_parsers(&self, ch: char, input: &InlineInput<'_>) -> Option<InlineMatch> {
        self.inline_parsers
            .iter()
            .filter(|p| p.parser.triggers().contains(&ch))
            .find_map(|p| p.parser.parse(input))
            .filter(|found| {
                found.advance > 0 && input.offset() + found.advance <= input.line_stop()
            })
    }
}

fn push_text(inlines: &mut Vec<Inline>, start: usize, stop: usize) {
    if stop > start {
        inlines.push(Inline::Text(Segment::new(start, stop)));
    }
}

/// Skip a backtick code span starting at `pos`. An unmatched run of
/// backticks is skipped as plain text.
fn skip_code_span(source: &str, pos: usize, stop: usize) -> usize {
    let bytes = source.as_bytes();
    let run = bytes[pos..stop].iter().take_while(|&&b| b == b'`').count();
    let mut cursor = pos + run;

    while cursor < stop {
        if bytes[cursor] == b'`' {
            let closing = bytes[cursor..stop].iter().take_while(|&&b| b == b'`').count();
            if closing == run {
                return cursor + closing;
            }
            cursor += closing;
        } else {
            cursor += 1;
        }
    }

    pos + run
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Recognizes `@` followed by one lowercase letter.
    struct MentionParser;

    impl InlineParser for MentionParser {
        fn triggers(&self) -> &[char] {
            &['@']
        }

        fn parse(&self, input: &InlineInput<'_>) -> Option<InlineMatch> {
            let line = input.peek_line();
            let next = line[1..].chars().next().filter(char::is_ascii_lowercase)?;
            Some(InlineMatch {
                node: Inline::Text(Segment::new(input.offset(), input.offset() + 2)),
                advance: 1 + next.len_utf8(),
            })
        }
    }

    /// Claims every `@` with a fixed advance, to check priority ordering.
    struct GreedyParser(usize);

    impl InlineParser for GreedyParser {
        fn triggers(&self) -> &[char] {
            &['@']
        }

        fn parse(&self, input: &InlineInput<'_>) -> Option<InlineMatch> {
            Some(InlineMatch {
                node: Inline::Text(Segment::new(input.offset(), input.offset() + self.0)),
                advance: self.0,
            })
        }
    }

    #[test]
    fn preceding_char_defaults_to_newline() {
        let source = "^abc";
        let lines = [Segment::new(0, 4)];
        let input = InlineInput::new(source, &lines, 0, 0);
        assert_eq!(input.preceding_char(), '\n');
        assert_eq!(input.peek_line(), "^abc");
    }

    #[test]
    fn preceding_char_crosses_line_boundaries() {
        let source = "one\n^two";
        let lines = [Segment::new(0, 3), Segment::new(4, 8)];
        let input = InlineInput::new(source, &lines, 1, 4);
        assert_eq!(input.preceding_char(), '\n');
        assert!(input.is_last_line());
        assert_eq!(input.block_stop(), 8);
    }

    #[test]
    fn unmatched_triggers_become_text() {
        let mut parser = MarkdownParser::new();
        parser.add_inline_parser(MentionParser, 100);
        let doc = parser.parse("a @1 b");
        assert_eq!(
            doc.blocks[0].inlines,
            vec![Inline::Text(Segment::new(0, 6))]
        );
    }

    #[test]
    fn matches_split_surrounding_text() {
        let mut parser = MarkdownParser::new();
        parser.add_inline_parser(MentionParser, 100);
        let doc = parser.parse("a @b c");
        assert_eq!(
            doc.blocks[0].inlines,
            vec![
                Inline::Text(Segment::new(0, 2)),
                Inline::Text(Segment::new(2, 4)),
                Inline::Text(Segment::new(4, 6)),
            ]
        );
    }

    #[test]
    fn higher_priority_parsers_run_first() {
        let mut parser = MarkdownParser::new();
        parser.add_inline_parser(GreedyParser(1), 10);
        parser.add_inline_parser(GreedyParser(3), 20);
        let doc = parser.parse("@abc");
        assert_eq!(doc.blocks[0].inlines[0], Inline::Text(Segment::new(0, 3)));
    }

    #[test]
    fn code_spans_hide_triggers() {
        let mut parser = MarkdownParser::new();
        parser.add_inline_parser(MentionParser, 100);
        let doc = parser.parse("`@a` and ``x`@b``");
        assert_eq!(
            doc.blocks[0].inlines,
            vec![Inline::Text(Segment::new(0, 17))]
        );
    }

    #[test]
    fn code_blocks_are_not_scanned() {
        let mut parser = MarkdownParser::new();
        parser.add_inline_parser(MentionParser, 100);
        let doc = parser.parse("```\n@a\n```\n\n    @b\n\n<div>\n@c\n</div>");
        assert_eq!(doc.blocks.len(), 3);
        assert!(doc.blocks.iter().all(|block| block.inlines.is_empty()));
    }
}
