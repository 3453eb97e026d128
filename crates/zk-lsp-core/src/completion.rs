/*
 * completion.rs
 * Copyright (c) 2025 zk contributors
 *
 * Completion lists for tags and note links.
 *
 * Completion only runs when the editor reports that a trigger character
 * was typed; explicit invocations get an empty list.
 */

use tracing::warn;
use zk_util::pluralize;

use crate::document::DocumentSession;
use crate::error::Result;
use crate::notebook::{CollectionKind, FileStorage, MarkdownSettings, Notebook};
use crate::resolver::build_text_edit_for_link;
use crate::types::{CompletionItem, Position};

/// What a typed trigger character asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTrigger {
    /// `#`, when hashtags are enabled.
    Hashtag,
    /// `:`, when colon tags are enabled.
    ColonTag,
    /// The second `[` of `[[`.
    WikiLink,
}

impl CompletionTrigger {
    pub fn detect(
        character: &str,
        session: &DocumentSession,
        pos: Position,
        settings: MarkdownSettings,
    ) -> Option<Self> {
        match character {
            "#" if settings.hashtags => Some(Self::Hashtag),
            ":" if settings.colon_tags => Some(Self::ColonTag),
            "[" if session.look_behind(pos, 2) == Some("[[") => Some(Self::WikiLink),
            _ => None,
        }
    }
}

/// Completion items for `trigger_character` typed at `pos`.
///
/// `trigger_character` is `None` unless the request was caused by typing
/// one of the registered trigger characters.
pub fn completion_items(
    session: &DocumentSession,
    notebook: &dyn Notebook,
    fs: &dyn FileStorage,
    trigger_character: Option<&str>,
    pos: Position,
) -> Result<Vec<CompletionItem>> {
    let Some(character) = trigger_character else {
        return Ok(Vec::new());
    };
    let settings = notebook.markdown_settings();

    match CompletionTrigger::detect(character, session, pos, settings) {
        Some(trigger @ (CompletionTrigger::Hashtag | CompletionTrigger::ColonTag)) => {
            tag_items(notebook, trigger, settings)
        }
        Some(CompletionTrigger::WikiLink) => link_items(session, notebook, fs, pos),
        None => Ok(Vec::new()),
    }
}

fn tag_items(
    notebook: &dyn Notebook,
    trigger: CompletionTrigger,
    settings: MarkdownSettings,
) -> Result<Vec<CompletionItem>> {
    let tags = notebook.find_collections(CollectionKind::Tag)?;
    Ok(tags
        .into_iter()
        .map(|tag| CompletionItem {
            insert_text: Some(tag_insert_text(&tag.name, trigger, settings)),
            detail: Some(format!("{} {}", tag.note_count, pluralize("note", tag.note_count))),
            label: tag.name,
            ..Default::default()
        })
        .collect())
}

/// The text inserted after the trigger character for tag `name`.
pub fn tag_insert_text(name: &str, trigger: CompletionTrigger, settings: MarkdownSettings) -> String {
    match trigger {
        CompletionTrigger::ColonTag => format!("{}:", name),
        CompletionTrigger::Hashtag if name.contains(' ') => {
            if settings.multiword_tags {
                format!("{}#", name)
            } else {
                name.replace(' ', "\\ ")
            }
        }
        _ => name.to_string(),
    }
}

fn link_items(
    session: &DocumentSession,
    notebook: &dyn Notebook,
    fs: &dyn FileStorage,
    pos: Position,
) -> Result<Vec<CompletionItem>> {
    let notes = notebook.find_notes()?;
    let formatter = notebook.link_formatter()?;

    let mut items = Vec::with_capacity(notes.len());
    for note in notes {
        let edit = match build_text_edit_for_link(
            notebook,
            fs,
            formatter.as_ref(),
            session.path(),
            &note,
            pos,
        ) {
            Ok(edit) => edit,
            Err(err) => {
                warn!(path = %note.path.display(), error = %err, "skipping link completion");
                continue;
            }
        };

        let label = if note.title.is_empty() {
            note.path.to_string_lossy().into_owned()
        } else {
            note.title.clone()
        };
        items.push(CompletionItem {
            label,
            text_edit: Some(edit),
            documentation: Some(note.raw_content),
            ..Default::default()
        });
    }
    Ok(items)
}
