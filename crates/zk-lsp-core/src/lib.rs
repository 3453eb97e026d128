//! Transport-agnostic editor integration for zk notebooks.
//!
//! This crate holds the state and queries behind the zk language server
//! without any JSON-RPC or `lsp-types` dependency. The protocol layer lives
//! in `zk-lsp`; the note repository and filesystem are reached through the
//! traits in [`notebook`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          zk-lsp-core                            │
//! │  DocumentStore ── DocumentSession ── links ── resolver          │
//! │  WorkspaceRegistry          completion          navigation      │
//! └─────────────────────────────────────────────────────────────────┘
//!             │                                    │
//!             ▼                                    ▼
//! ┌───────────────────────┐          ┌─────────────────────────────┐
//! │        zk-lsp         │          │         zk-notebook         │
//! │ (tower-lsp handler)   │          │ (Notebook, FileStorage impl)│
//! └───────────────────────┘          └─────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use zk_lsp_core::{DocumentStore, OpenDocument, Position};
//!
//! let mut store = DocumentStore::new();
//! store.open(OpenDocument::new("file:///nb/a.md", "markdown", 1, "See [[b]]"), &fs);
//! let session = store.get("file:///nb/a.md").unwrap();
//! assert_eq!(session.look_behind(Position::new(0, 6), 2), Some("[["));
//! ```

pub mod completion;
pub mod document;
pub mod error;
pub mod links;
pub mod navigation;
pub mod notebook;
pub mod resolver;
pub mod text;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use completion::{CompletionTrigger, completion_items};
pub use document::{DocumentSession, DocumentStore, EditError, OpenDocument, TextChange};
pub use error::{LspCoreError, Result};
pub use links::Link;
pub use navigation::{definition, document_links, hover};
pub use notebook::{
    Collection, CollectionKind, FileStorage, LinkFormatter, MarkdownSettings, Note, Notebook,
    NotebookError, NotebookStore,
};
pub use resolver::{build_text_edit_for_link, resolve_href, resolve_hrefs};
pub use types::{CompletionItem, Location, Position, Range, ResolvedLink, TextEdit};
pub use workspace::WorkspaceRegistry;
