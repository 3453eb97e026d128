//! zk Language Server Protocol implementation.
//!
//! This crate provides the LSP server for zk notebooks, wrapping
//! `zk-lsp-core` with the tower-lsp framework.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                            zk-lsp                             │
//! │      tower-lsp wrapper, JSON-RPC/stdio, `zk lsp` command      │
//! │                                                               │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐   │
//! │  │  server.rs  │  │ convert.rs  │  │   capabilities.rs    │   │
//! │  │LanguageServer│ │ Core ↔ LSP  │  │ Capability negotiation│  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────────────────────┘   │
//! │         │                │            logging.rs: LogSink     │
//! │  ┌──────▼────────────────▼───────────────────────────────┐    │
//! │  │          zk-lsp-core  +  zk-notebook                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! The server is invoked via the `zk lsp` subcommand:
//!
//! ```bash
//! zk lsp --log /tmp/zk-lsp.log
//! ```
//!
//! Or programmatically:
//!
//! ```rust,ignore
//! zk_lsp::run_server(zk_lsp::LogSink::stderr()).await;
//! ```

pub mod capabilities;
pub mod convert;
pub mod logging;
pub mod server;

pub use logging::LogSink;
pub use server::{LspClient, ZkLanguageServer, run_server};
