//! Conversion between zk-lsp-core types and tower_lsp::lsp_types.

use tower_lsp::lsp_types::{
    CompletionItem as LspCompletionItem, CompletionTextEdit, Documentation, DocumentLink,
    Location as LspLocation, MarkupContent, MarkupKind, Position as LspPosition,
    Range as LspRange, TextDocumentContentChangeEvent, TextEdit as LspTextEdit, Url,
};

use zk_lsp_core::{
    CompletionItem, Location, Position, Range, ResolvedLink, TextChange, TextEdit,
};

pub fn position_to_lsp(pos: Position) -> LspPosition {
    LspPosition {
        line: pos.line,
        character: pos.character,
    }
}

pub fn position_from_lsp(pos: LspPosition) -> Position {
    Position::new(pos.line, pos.character)
}

pub fn range_to_lsp(range: Range) -> LspRange {
    LspRange {
        start: position_to_lsp(range.start),
        end: position_to_lsp(range.end),
    }
}

pub fn range_from_lsp(range: LspRange) -> Range {
    Range::new(position_from_lsp(range.start), position_from_lsp(range.end))
}

/// A `didChange` content change without a range replaces the whole text.
pub fn change_from_lsp(change: TextDocumentContentChangeEvent) -> TextChange {
    match change.range {
        Some(range) => TextChange::Range {
            range: range_from_lsp(range),
            text: change.text,
        },
        None => TextChange::Full(change.text),
    }
}

pub fn text_edit_to_lsp(edit: TextEdit) -> LspTextEdit {
    LspTextEdit {
        range: range_to_lsp(edit.range),
        new_text: edit.new_text,
    }
}

fn markdown(value: String) -> MarkupContent {
    MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    }
}

pub fn completion_item_to_lsp(item: CompletionItem) -> LspCompletionItem {
    LspCompletionItem {
        label: item.label,
        insert_text: item.insert_text,
        text_edit: item
            .text_edit
            .map(|edit| CompletionTextEdit::Edit(text_edit_to_lsp(edit))),
        detail: item.detail,
        documentation: item
            .documentation
            .map(|value| Documentation::MarkupContent(markdown(value))),
        ..Default::default()
    }
}

pub fn hover_contents_to_lsp(content: String) -> MarkupContent {
    markdown(content)
}

/// `None` when the target is not a valid URL.
pub fn document_link_to_lsp(link: ResolvedLink) -> Option<DocumentLink> {
    Some(DocumentLink {
        range: range_to_lsp(link.range),
        target: Some(Url::parse(&link.target).ok()?),
        tooltip: None,
        data: None,
    })
}

/// `None` when the target is not a valid URL.
pub fn location_to_lsp(location: Location) -> Option<LspLocation> {
    Some(LspLocation {
        uri: Url::parse(&location.uri).ok()?,
        range: range_to_lsp(location.range),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_without_range_is_full_replacement() {
        let change = TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "all new".to_string(),
        };
        assert_eq!(change_from_lsp(change), TextChange::Full("all new".to_string()));
    }

    #[test]
    fn test_change_with_range() {
        let change = TextDocumentContentChangeEvent {
            range: Some(LspRange {
                start: LspPosition::new(1, 2),
                end: LspPosition::new(1, 4),
            }),
            range_length: None,
            text: "x".to_string(),
        };
        assert_eq!(
            change_from_lsp(change),
            TextChange::Range {
                range: Range::new(Position::new(1, 2), Position::new(1, 4)),
                text: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_completion_item_conversion() {
        let item = CompletionItem {
            label: "Idea".to_string(),
            text_edit: Some(TextEdit {
                range: Range::new(Position::new(0, 4), Position::new(0, 6)),
                new_text: "[[idea]]".to_string(),
            }),
            documentation: Some("# Idea".to_string()),
            ..Default::default()
        };
        let lsp = completion_item_to_lsp(item);

        assert_eq!(lsp.label, "Idea");
        match lsp.text_edit {
            Some(CompletionTextEdit::Edit(edit)) => {
                assert_eq!(edit.new_text, "[[idea]]");
                assert_eq!(edit.range.start, LspPosition::new(0, 4));
            }
            other => panic!("unexpected text edit: {:?}", other),
        }
        match lsp.documentation {
            Some(Documentation::MarkupContent(content)) => {
                assert_eq!(content.kind, MarkupKind::Markdown);
                assert_eq!(content.value, "# Idea");
            }
            other => panic!("unexpected documentation: {:?}", other),
        }
    }

    #[test]
    fn test_document_link_requires_valid_url() {
        let range = Range::new(Position::new(0, 0), Position::new(0, 8));
        let link = document_link_to_lsp(ResolvedLink {
            range,
            target: "file:///nb/idea.md".to_string(),
        })
        .unwrap();
        assert_eq!(link.target.unwrap().path(), "/nb/idea.md");

        assert!(
            document_link_to_lsp(ResolvedLink {
                range,
                target: "not a url".to_string(),
            })
            .is_none()
        );
    }
}
