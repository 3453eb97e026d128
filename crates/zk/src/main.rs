//! zk CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zk")]
#[command(version = zk_util::cli_version())]
#[command(about = "A plain text note-taking assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a server for the Language Server Protocol on stdio
    Lsp {
        /// Write server logs to FILE instead of stderr
        #[arg(long, value_name = "FILE")]
        log: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lsp { log } => commands::lsp::execute(log.as_deref()),
    }
}
