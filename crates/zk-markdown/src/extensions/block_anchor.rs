/*
 * block_anchor.rs
 * Copyright (c) 2025 zk contributors
 *
 * Recognize block anchors: `^identifier` at the very end of a block.
 *
 * Rules, checked in order:
 * - the caret is preceded by a space, a newline, or nothing
 * - the identifier is a non-empty run of [a-zA-Z0-9-]
 * - the identifier ends exactly where the block's last line ends
 */

use crate::block::Segment;
use crate::scanner::{Extension, InlineInput, InlineMatch, InlineParser, MarkdownParser};
use crate::{BlockAnchor, Inline};

/// Block anchors are tried before every other caret-triggered syntax.
pub const BLOCK_ANCHOR_PRIORITY: u32 = 2000;

pub struct BlockAnchorExtension;

impl Extension for BlockAnchorExtension {
    fn extend(self, parser: &mut MarkdownParser) {
        parser.add_inline_parser(BlockAnchorParser, BLOCK_ANCHOR_PRIORITY);
    }
}

pub struct BlockAnchorParser;

impl InlineParser for BlockAnchorParser {
    fn triggers(&self) -> &[char] {
        &['^']
    }

    fn parse(&self, input: &InlineInput<'_>) -> Option<InlineMatch> {
        let before = input.preceding_char();
        if before != ' ' && before != '\n' {
            return None;
        }

        let line = input.peek_line();
        let id_len = line
            .bytes()
            .skip(1)
            .take_while(|&b| is_valid_block_id_byte(b))
            .count();
        if id_len == 0 {
            return None;
        }

        let advance = id_len + 1;
        let stop = input.offset() + advance;
        if !input.is_last_line() || stop != input.block_stop() {
            return None;
        }

        Some(InlineMatch {
            node: Inline::BlockAnchor(BlockAnchor {
                id: line[1..advance].to_string(),
                span: Segment::new(input.offset(), stop),
            }),
            advance,
        })
    }
}

/// ASCII letters, digits and hyphen-minus. Unicode letters are not allowed.
fn is_valid_block_id_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(source: &str) -> Vec<String> {
        MarkdownParser::new()
            .with_extension(BlockAnchorExtension)
            .parse(source)
            .block_anchors()
            .map(|anchor| anchor.id.clone())
            .collect()
    }

    fn lines_of(source: &str) -> Vec<Segment> {
        let mut lines = Vec::new();
        let mut start = 0;
        for line in source.split('\n') {
            lines.push(Segment::new(start, start + line.len()));
            start += line.len() + 1;
        }
        lines
    }

    #[test]
    fn accepts_anchor_after_space_at_block_end() {
        assert_eq!(anchors("Some text. ^blk-1"), vec!["blk-1"]);
    }

    #[test]
    fn rejects_anchor_without_preceding_space() {
        assert!(anchors("Some text.^blk-1").is_empty());
    }

    #[test]
    fn rejects_trailing_content() {
        assert!(anchors("^blk-1 extra").is_empty());
        assert!(anchors("text ^blk-1.").is_empty());
        assert!(anchors("text ^blk-1 more").is_empty());
    }

    #[test]
    fn trailing_spaces_are_outside_the_block() {
        assert_eq!(anchors("text ^blk-1  \n"), vec!["blk-1"]);
    }

    #[test]
    fn block_ends_follow_commonmark() {
        assert_eq!(anchors("Title ^setext\n---"), vec!["setext"]);
        assert_eq!(anchors("Title ^setext2\n====="), vec!["setext2"]);
        assert_eq!(anchors("para ^brk\n***"), vec!["brk"]);
        assert_eq!(anchors("para ^brk2\n___"), vec!["brk2"]);
        assert_eq!(anchors("> quoted ^bq\n\nafter"), vec!["bq"]);
    }

    #[test]
    fn code_and_html_blocks_have_no_anchors() {
        assert!(anchors("    ^indented-code").is_empty());
        assert!(anchors("```\ncode ^fenced\n```").is_empty());
        assert!(anchors("<div>\ntext ^html\n</div>").is_empty());
    }

    #[test]
    fn rejects_other_whitespace_before_caret() {
        assert!(anchors("text\t^blk-1").is_empty());
    }

    #[test]
    fn accepts_anchor_at_start_of_input() {
        assert_eq!(anchors("^start"), vec!["start"]);
    }

    #[test]
    fn rejects_bare_caret() {
        assert!(anchors("text ^").is_empty());
        assert!(anchors("^").is_empty());
    }

    #[test]
    fn rejects_caret_followed_by_invalid_char() {
        assert!(anchors("text ^^abc").is_empty());
        assert!(anchors("text ^_abc").is_empty());
        assert!(anchors("text ^éabc").is_empty());
    }

    #[test]
    fn multiline_blocks_check_the_last_line() {
        assert_eq!(anchors("first line\nsecond line ^end"), vec!["end"]);
        assert_eq!(anchors("first line\n^own-line"), vec!["own-line"]);
        assert!(anchors("first ^early\nsecond line").is_empty());
    }

    #[test]
    fn each_block_gets_its_own_anchor() {
        assert_eq!(anchors("para one ^a\n\npara two ^b"), vec!["a", "b"]);
    }

    #[test]
    fn anchors_in_headings_and_list_items() {
        assert_eq!(anchors("# Heading ^h1\n- item ^li\n"), vec!["h1", "li"]);
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(anchors("text ^crlf\r\n"), vec!["crlf"]);
    }

    #[test]
    fn parser_reports_advance_and_span() {
        let source = "Some text. ^blk-1";
        let lines = lines_of(source);
        let input = InlineInput::new(source, &lines, 0, 11);
        let found = BlockAnchorParser.parse(&input).expect("anchor");
        assert_eq!(found.advance, 6);
        assert_eq!(
            found.node,
            Inline::BlockAnchor(BlockAnchor {
                id: "blk-1".to_string(),
                span: Segment::new(11, 17),
            })
        );
    }

    #[test]
    fn rejection_leaves_text_intact() {
        let source = "Some text.^blk-1";
        let doc = MarkdownParser::new()
            .with_extension(BlockAnchorExtension)
            .parse(source);
        assert_eq!(
            doc.blocks[0].inlines,
            vec![Inline::Text(Segment::new(0, source.len()))]
        );
    }
}
