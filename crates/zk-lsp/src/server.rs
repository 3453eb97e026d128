//! LSP server implementation using tower-lsp.
//!
//! Every handler looks up the document session for the request's URI,
//! finds the notebook owning it, and delegates to `zk-lsp-core`. Requests
//! for documents that are not open, or that live outside any notebook,
//! answer with empty results.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::{self, ErrorCode, Result};
use tower_lsp::lsp_types::notification::LogTrace;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info, warn};

use zk_lsp_core::{
    DocumentSession, DocumentStore, FileStorage, LspCoreError, Notebook, NotebookStore,
    OpenDocument, WorkspaceRegistry, completion_items, definition, document_links, hover,
};
use zk_notebook::{FsNotebookStore, FsStorage};

use crate::capabilities::{server_capabilities, supports_definition_links};
use crate::convert;
use crate::logging::LogSink;

/// The client side of the connection, as far as the server uses it.
#[tower_lsp::async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn log_trace(&self, params: LogTraceParams);
}

#[tower_lsp::async_trait]
impl LspClient for Client {
    async fn log_trace(&self, params: LogTraceParams) {
        self.send_notification::<LogTrace>(params).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionState {
    Uninitialized,
    Initialized,
    ShuttingDown,
}

/// Protocol tracing requested through `$/setTrace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraceLevel {
    Off,
    Messages,
    Verbose,
}

impl From<TraceValue> for TraceLevel {
    fn from(value: TraceValue) -> Self {
        match value {
            TraceValue::Off => Self::Off,
            TraceValue::Messages => Self::Messages,
            TraceValue::Verbose => Self::Verbose,
        }
    }
}

/// The zk language server.
pub struct ZkLanguageServer<C = Client> {
    client: C,
    documents: RwLock<DocumentStore>,
    workspace: RwLock<WorkspaceRegistry>,
    notebooks: Arc<dyn NotebookStore>,
    fs: Arc<dyn FileStorage>,
    state: Mutex<ConnectionState>,
    trace: RwLock<TraceLevel>,
    log_sink: Option<LogSink>,
}

impl<C: LspClient> ZkLanguageServer<C> {
    pub fn new(client: C, notebooks: Arc<dyn NotebookStore>, fs: Arc<dyn FileStorage>) -> Self {
        Self {
            client,
            documents: RwLock::new(DocumentStore::new()),
            workspace: RwLock::new(WorkspaceRegistry::new()),
            notebooks,
            fs,
            state: Mutex::new(ConnectionState::Uninitialized),
            trace: RwLock::new(TraceLevel::Off),
            log_sink: None,
        }
    }

    /// Flush `sink` when the client asks the server to shut down.
    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Handler for the `$/setTrace` notification.
    pub async fn set_trace(&self, params: SetTraceParams) {
        debug!(value = ?params.value, "trace level changed");
        *self.trace.write().await = params.value.into();
    }

    /// Workspace folders currently registered, sorted.
    pub async fn workspace_folders(&self) -> Vec<String> {
        let workspace = self.workspace.read().await;
        let mut folders: Vec<String> = workspace.folders().map(str::to_string).collect();
        folders.sort();
        folders
    }

    /// Send `$/logTrace` for a handled message when tracing is on.
    async fn trace(&self, method: &str, params: &impl Serialize) {
        let level = *self.trace.read().await;
        if level == TraceLevel::Off {
            return;
        }
        let verbose = match level {
            TraceLevel::Verbose => serde_json::to_string_pretty(params).ok(),
            _ => None,
        };
        self.client
            .log_trace(LogTraceParams {
                message: format!("Received '{}'", method),
                verbose,
            })
            .await;
    }

    /// The notebook owning `session`, or `None` outside any notebook.
    fn notebook_for(&self, session: &DocumentSession) -> Result<Option<Arc<dyn Notebook>>> {
        match self.notebooks.open(session.path()).map_err(LspCoreError::from) {
            Ok(notebook) => Ok(Some(notebook)),
            Err(err) if err.is_not_found() => {
                debug!(path = %session.path().display(), "document is not in a notebook");
                Ok(None)
            }
            Err(err) => Err(request_failed(session.uri(), err)),
        }
    }
}

/// Log a failed request and turn it into a JSON-RPC error for that request.
fn request_failed(uri: &str, err: LspCoreError) -> jsonrpc::Error {
    error!(uri, error = %err, "request failed");
    jsonrpc::Error {
        code: ErrorCode::InternalError,
        message: err.to_string().into(),
        data: None,
    }
}

#[tower_lsp::async_trait]
impl<C: LspClient> LanguageServer for ZkLanguageServer<C> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        {
            let mut state = self.state.lock().await;
            if *state != ConnectionState::Uninitialized {
                return Err(jsonrpc::Error::invalid_request());
            }
            *state = ConnectionState::Initialized;
        }

        if let Some(trace) = params.trace {
            *self.trace.write().await = trace.into();
        }

        let folders = params
            .workspace_folders
            .unwrap_or_default()
            .into_iter()
            .map(|folder| folder.uri.to_string())
            .collect();
        #[allow(deprecated)]
        let registry = WorkspaceRegistry::from_initial_roots(
            folders,
            params.root_uri.map(|uri| uri.to_string()),
            params.root_path,
        );
        *self.workspace.write().await = registry;

        // Plain locations are returned even when the client takes links.
        info!(
            definition_links = supports_definition_links(&params.capabilities),
            "server initialized"
        );

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "zk".to_string(),
                version: Some(zk_util::cli_version().to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        debug!("client acknowledged initialization");
    }

    async fn shutdown(&self) -> Result<()> {
        *self.state.lock().await = ConnectionState::ShuttingDown;
        *self.trace.write().await = TraceLevel::Off;
        info!("shutting down");

        if let Some(sink) = &self.log_sink {
            let mut sink = sink.clone();
            if let Err(err) = std::io::Write::flush(&mut sink) {
                warn!(error = %err, "failed to flush log");
            }
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.trace("textDocument/didOpen", &params).await;
        let item = params.text_document;
        let uri = item.uri.to_string();

        let opened = self.documents.write().await.open(
            OpenDocument::new(uri.clone(), item.language_id, item.version, item.text),
            self.fs.as_ref(),
        );
        if !opened {
            debug!(uri = %uri, "ignoring document in another language");
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.trace("textDocument/didChange", &params).await;
        let uri = params.text_document.uri.to_string();
        let changes: Vec<_> = params
            .content_changes
            .into_iter()
            .map(convert::change_from_lsp)
            .collect();

        let mut documents = self.documents.write().await;
        if let Err(err) = documents.change(&uri, params.text_document.version, &changes) {
            warn!(uri = %uri, error = %err, "closing document after rejected edit");
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.trace("textDocument/didClose", &params).await;
        self.documents
            .write()
            .await
            .close(params.text_document.uri.as_str());
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        self.trace("workspace/didChangeWorkspaceFolders", &params).await;
        let mut workspace = self.workspace.write().await;
        for folder in params.event.added {
            workspace.add_folder(folder.uri.to_string());
        }
        for folder in params.event.removed {
            workspace.remove_folder(folder.uri.as_str());
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        self.trace("textDocument/completion", &params).await;
        let uri = params.text_document_position.text_document.uri;
        let position = convert::position_from_lsp(params.text_document_position.position);
        let trigger_character = params
            .context
            .filter(|context| context.trigger_kind == CompletionTriggerKind::TRIGGER_CHARACTER)
            .and_then(|context| context.trigger_character);

        let documents = self.documents.read().await;
        let Some(session) = documents.get(uri.as_str()) else {
            return Ok(None);
        };
        let Some(notebook) = self.notebook_for(session)? else {
            return Ok(None);
        };

        let items = completion_items(
            session,
            notebook.as_ref(),
            self.fs.as_ref(),
            trigger_character.as_deref(),
            position,
        )
        .map_err(|err| request_failed(uri.as_str(), err))?;

        Ok(Some(CompletionResponse::Array(
            items
                .into_iter()
                .map(convert::completion_item_to_lsp)
                .collect(),
        )))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        self.trace("textDocument/hover", &params).await;
        let uri = params.text_document_position_params.text_document.uri;
        let position = convert::position_from_lsp(params.text_document_position_params.position);

        let documents = self.documents.read().await;
        let Some(session) = documents.get(uri.as_str()) else {
            return Ok(None);
        };
        let Some(notebook) = self.notebook_for(session)? else {
            return Ok(None);
        };

        let content = hover(session, notebook.as_ref(), self.fs.as_ref(), position)
            .map_err(|err| request_failed(uri.as_str(), err))?;

        Ok(content.map(|content| Hover {
            contents: HoverContents::Markup(convert::hover_contents_to_lsp(content)),
            range: None,
        }))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        self.trace("textDocument/definition", &params).await;
        let uri = params.text_document_position_params.text_document.uri;
        let position = convert::position_from_lsp(params.text_document_position_params.position);

        let documents = self.documents.read().await;
        let Some(session) = documents.get(uri.as_str()) else {
            return Ok(None);
        };
        let Some(notebook) = self.notebook_for(session)? else {
            return Ok(None);
        };

        let location = definition(session, notebook.as_ref(), position)
            .map_err(|err| request_failed(uri.as_str(), err))?;

        Ok(location
            .and_then(convert::location_to_lsp)
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn document_link(&self, params: DocumentLinkParams) -> Result<Option<Vec<DocumentLink>>> {
        self.trace("textDocument/documentLink", &params).await;
        let uri = params.text_document.uri;

        let documents = self.documents.read().await;
        let Some(session) = documents.get(uri.as_str()) else {
            return Ok(None);
        };
        let Some(notebook) = self.notebook_for(session)? else {
            return Ok(None);
        };

        Ok(Some(
            document_links(session, notebook.as_ref())
                .into_iter()
                .filter_map(convert::document_link_to_lsp)
                .collect(),
        ))
    }

    /// Links are fully resolved when listed.
    async fn document_link_resolve(&self, params: DocumentLink) -> Result<DocumentLink> {
        self.trace("documentLink/resolve", &params).await;
        Ok(params)
    }
}

/// Run the LSP server over stdio.
///
/// Messages are handled one at a time, so every query sees the effect of
/// every edit received before it.
pub async fn run_server(log_sink: LogSink) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let sink = log_sink.clone();
    let (service, socket) = LspService::build(move |client| {
        ZkLanguageServer::new(client, Arc::new(FsNotebookStore::new()), Arc::new(FsStorage))
            .with_log_sink(sink)
    })
    .custom_method("$/setTrace", ZkLanguageServer::<Client>::set_trace)
    .finish();

    Server::new(stdin, stdout, socket)
        .concurrency_level(1)
        .serve(service)
        .await;

    let mut log_sink = log_sink;
    if let Err(err) = std::io::Write::flush(&mut log_sink) {
        eprintln!("zk: failed to flush log: {}", err);
    }
}
