//! String helpers shared by the resolver and completion builders.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[a-zA-Z][a-zA-Z0-9+.\-]*://|mailto:|www\.)").unwrap());

/// Whether `s` is a fully-qualified external URL rather than a note reference.
///
/// A scheme followed by `://` qualifies, as do `mailto:` and bare `www.` hosts.
/// Windows drive letters (`C:\notes`) and colon tags do not.
pub fn is_url(s: &str) -> bool {
    URL_RE.is_match(s)
}

/// Pluralize `word` for `count`. Callers format the count themselves.
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
