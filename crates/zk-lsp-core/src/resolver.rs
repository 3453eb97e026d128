/*
 * resolver.rs
 * Copyright (c) 2025 zk contributors
 *
 * Turn hrefs written in a note into targets, and notes into link text.
 */

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use zk_util::{clean_path, is_url};

use crate::error::{LspCoreError, Result};
use crate::notebook::{FileStorage, LinkFormatter, Note, Notebook};
use crate::types::{Position, Range, TextEdit};

/// What an href designates before any note lookup.
enum HrefTarget {
    Url(String),
    /// A `/`-separated path relative to the notebook root.
    Note(String),
    Nothing,
}

fn classify(notebook: &dyn Notebook, document_path: &Path, href: &str) -> Result<HrefTarget> {
    if is_url(href) {
        return Ok(HrefTarget::Url(href.to_string()));
    }

    let path_part = href.split_once('#').map_or(href, |(path, _)| path);
    if path_part.is_empty() {
        return Ok(HrefTarget::Nothing);
    }

    let directory = document_path.parent().unwrap_or(Path::new(""));
    let target = clean_path(&directory.join(path_part));
    let relative =
        relative_to(&target, notebook.root()).ok_or_else(|| LspCoreError::UnresolvableHref {
            href: href.to_string(),
        })?;
    Ok(HrefTarget::Note(to_slash(&relative)))
}

fn note_url(notebook: &dyn Notebook, note: &Note) -> String {
    format!("file://{}", notebook.root().join(&note.path).display())
}

/// Resolve `href`, found in the document at `document_path`, to a target.
///
/// External URLs come back unchanged. Anything else is taken relative to
/// the document's directory and looked up in the notebook; a match yields
/// a `file://` URL to the note and no match yields `None`. A `#fragment`
/// is ignored for the lookup.
pub fn resolve_href(
    notebook: &dyn Notebook,
    document_path: &Path,
    href: &str,
) -> Result<Option<String>> {
    match classify(notebook, document_path, href)? {
        HrefTarget::Url(url) => Ok(Some(url)),
        HrefTarget::Nothing => Ok(None),
        HrefTarget::Note(relative) => {
            let note = notebook
                .find_by_href(&relative)
                .inspect_err(|err| warn!(href, error = %err, "note lookup failed"))?;
            Ok(note.map(|note| note_url(notebook, &note)))
        }
    }
}

/// Resolve every href of one document with a single notebook lookup.
///
/// Targets come back in the order of `hrefs`. An href that cannot be
/// expressed relative to the notebook resolves to `None`.
pub fn resolve_hrefs(
    notebook: &dyn Notebook,
    document_path: &Path,
    hrefs: &[&str],
) -> Result<Vec<Option<String>>> {
    let targets: Vec<HrefTarget> = hrefs
        .iter()
        .map(|&href| {
            classify(notebook, document_path, href).unwrap_or_else(|err| {
                debug!(href, error = %err, "dropping unresolvable href");
                HrefTarget::Nothing
            })
        })
        .collect();

    let lookups: Vec<String> = targets
        .iter()
        .filter_map(|target| match target {
            HrefTarget::Note(relative) => Some(relative.clone()),
            _ => None,
        })
        .collect();
    let mut notes = notebook
        .find_by_hrefs(&lookups)
        .inspect_err(|err| warn!(error = %err, "note lookup failed"))?
        .into_iter();

    Ok(targets
        .into_iter()
        .map(|target| match target {
            HrefTarget::Url(url) => Some(url),
            HrefTarget::Nothing => None,
            HrefTarget::Note(_) => notes.next().flatten().map(|note| note_url(notebook, &note)),
        })
        .collect())
}

/// The edit inserting a link to `note` over the `[[` typed before `pos`.
pub fn build_text_edit_for_link(
    notebook: &dyn Notebook,
    fs: &dyn FileStorage,
    formatter: &dyn LinkFormatter,
    document_path: &Path,
    note: &Note,
    pos: Position,
) -> Result<TextEdit> {
    let note_path = fs.canonical(&notebook.root().join(&note.path));
    let directory = document_path.parent().unwrap_or(Path::new(""));
    let link_path = relative_to(&note_path, directory).unwrap_or_else(|| note.path.clone());

    let new_text = formatter.format(&to_slash(&link_path), &note.title)?;
    let start = Position::new(pos.line, pos.character.saturating_sub(2));
    Ok(TextEdit {
        range: Range::new(start, pos),
        new_text,
    })
}

/// `path` relative to `base`, or `None` when only one of them is absolute.
fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() != base.is_absolute() {
        return None;
    }
    pathdiff::diff_paths(path, base)
}

/// Render a relative path with `/` separators regardless of platform.
fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNotebook, FakeStorage, WikiFormatter};

    fn notebook() -> FakeNotebook {
        FakeNotebook::new("notebook")
            .with_note("notes/idea.md", "Idea", "# Idea")
            .with_note("index.md", "Index", "# Index")
    }

    #[test]
    fn test_relative_href_resolves_to_note() {
        let target = resolve_href(&notebook(), Path::new("notebook/sub/doc.md"), "../notes/idea")
            .unwrap();
        assert_eq!(target.as_deref(), Some("file://notebook/notes/idea.md"));
    }

    #[test]
    fn test_urls_are_returned_unchanged() {
        let target = resolve_href(
            &notebook(),
            Path::new("notebook/doc.md"),
            "https://example.com/a?b",
        )
        .unwrap();
        assert_eq!(target.as_deref(), Some("https://example.com/a?b"));
    }

    #[test]
    fn test_missing_note_is_none() {
        let target = resolve_href(&notebook(), Path::new("notebook/doc.md"), "nothing").unwrap();
        assert_eq!(target, None);
    }

    #[test]
    fn test_fragment_is_ignored_for_lookup() {
        let nb = notebook();
        let doc = Path::new("notebook/doc.md");
        assert_eq!(
            resolve_href(&nb, doc, "index#^blk-1").unwrap().as_deref(),
            Some("file://notebook/index.md")
        );
        assert_eq!(resolve_href(&nb, doc, "#heading").unwrap(), None);
    }

    #[test]
    fn test_unrelatable_paths_are_errors() {
        let nb = notebook();
        let err = resolve_href(&nb, Path::new("/elsewhere/doc.md"), "idea").unwrap_err();
        assert!(matches!(err, LspCoreError::UnresolvableHref { href } if href == "idea"));
    }

    #[test]
    fn test_resolve_hrefs_keeps_order() {
        let nb = notebook();
        let targets = resolve_hrefs(
            &nb,
            Path::new("notebook/doc.md"),
            &["index", "https://example.com", "nothing", "#top", "notes/idea.md"],
        )
        .unwrap();
        assert_eq!(
            targets,
            vec![
                Some("file://notebook/index.md".to_string()),
                Some("https://example.com".to_string()),
                None,
                None,
                Some("file://notebook/notes/idea.md".to_string()),
            ]
        );
    }

    #[test]
    fn test_resolve_hrefs_drops_unrelatable_paths() {
        let targets = resolve_hrefs(&notebook(), Path::new("/elsewhere/doc.md"), &["idea"]).unwrap();
        assert_eq!(targets, vec![None]);
    }

    #[test]
    fn test_link_edit_replaces_brackets() {
        let nb = FakeNotebook::new("/nb");
        let note = Note {
            path: PathBuf::from("notes/idea.md"),
            title: "Idea".to_string(),
            raw_content: String::new(),
        };
        let edit = build_text_edit_for_link(
            &nb,
            &FakeStorage::default(),
            &WikiFormatter,
            Path::new("/nb/journal/today.md"),
            &note,
            Position::new(3, 7),
        )
        .unwrap();

        assert_eq!(edit.new_text, "[[../notes/idea.md]]");
        assert_eq!(
            edit.range,
            Range::new(Position::new(3, 5), Position::new(3, 7))
        );
    }

    #[test]
    fn test_link_edit_falls_back_to_note_path() {
        let nb = FakeNotebook::new("/nb");
        let note = Note {
            path: PathBuf::from("idea.md"),
            title: String::new(),
            raw_content: String::new(),
        };
        let edit = build_text_edit_for_link(
            &nb,
            &FakeStorage::default(),
            &WikiFormatter,
            Path::new("relative/doc.md"),
            &note,
            Position::new(0, 1),
        )
        .unwrap();

        assert_eq!(edit.new_text, "[[idea.md]]");
        assert_eq!(edit.range.start, Position::new(0, 0));
    }
}
