//! LSP server command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use zk_lsp::LogSink;
use zk_lsp::logging;

/// Execute the LSP server.
///
/// The server speaks JSON-RPC over stdio. Logs go to `log` when given,
/// otherwise to stderr.
pub fn execute(log: Option<&Path>) -> Result<()> {
    let sink = match log {
        Some(path) => LogSink::file(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?,
        None => LogSink::stderr(),
    };

    // A single-threaded runtime keeps the scoped subscriber in effect for
    // every handler.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let _guard = logging::install(sink.clone());
    tracing::info!(version = %zk_util::cli_version(), "starting language server");

    runtime.block_on(zk_lsp::run_server(sink));

    Ok(())
}
