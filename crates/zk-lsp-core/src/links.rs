/*
 * links.rs
 * Copyright (c) 2025 zk contributors
 *
 * Find links written in note text.
 *
 * Two forms are recognized, each on a single line:
 *
 * - Markdown links `[label](href)`, optionally `[label](<href>)` or with a
 *   quoted title. The href is percent-decoded.
 * - Wiki links `[[href]]` and `[[href|label]]`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::utf16_len;
use crate::types::{Position, Range};

static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[[^\]]*\]\((?:<([^>]*)>|([^)\s]+))(?:\s+"[^"]*")?\)"#)
        .expect("markdown link pattern is valid")
});

static WIKI_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\[\]|]+?)(?:\|[^\[\]]*)?\]\]").expect("wiki link pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The target exactly as the note means it: decoded, fragment included.
    pub href: String,
    /// Span of the whole link syntax.
    pub range: Range,
}

/// Every link in `text`, ordered by position.
pub fn scan(text: &str) -> Vec<Link> {
    let mut links = Vec::new();

    for (line_number, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let range_of = |start: usize, end: usize| {
            Range::new(
                Position::new(line_number as u32, utf16_len(&line[..start])),
                Position::new(line_number as u32, utf16_len(&line[..end])),
            )
        };

        let mut found: Vec<(usize, Link)> = Vec::new();

        for caps in MARKDOWN_LINK.captures_iter(line) {
            let whole = caps.get(0).expect("group 0 always matches");
            let Some(href) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            let href = urlencoding::decode(href.as_str())
                .map_or_else(|_| href.as_str().to_string(), |decoded| decoded.into_owned());
            found.push((
                whole.start(),
                Link {
                    href,
                    range: range_of(whole.start(), whole.end()),
                },
            ));
        }

        for caps in WIKI_LINK.captures_iter(line) {
            let whole = caps.get(0).expect("group 0 always matches");
            let href = caps[1].trim().to_string();
            if href.is_empty() {
                continue;
            }
            found.push((
                whole.start(),
                Link {
                    href,
                    range: range_of(whole.start(), whole.end()),
                },
            ));
        }

        found.sort_by_key(|(start, _)| *start);
        links.extend(found.into_iter().map(|(_, link)| link));
    }

    links
}
