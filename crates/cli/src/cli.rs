// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Backend;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  offsync init                          Initialize in the current directory
  offsync enqueue form_submission '{}'  Queue an operation
  offsync save media '{\"title\":\"x\"}'    Save a document
  offsync status                        Show sync state
  offsync sync                          Deliver pending work";

#[derive(Parser)]
#[command(name = "offsync")]
#[command(about = "Offline-first write queue and sync engine")]
#[command(
    long_about = "Offline-first write queue and sync engine.\n\n\
    Writes are stored durably on this device and delivered to a remote \
    target when connectivity allows."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize offsync in a directory
    #[command(after_help = "Examples:\n  \
        offsync init                              File store, local outbox\n  \
        offsync init --backend sqlite             SQLite store\n  \
        offsync init --remote wss://sync.example  Deliver over WebSocket")]
    Init {
        /// Durable store backend
        #[arg(long, value_enum, default_value_t = Backend::File)]
        backend: Backend,

        /// Remote target URL (outbox:<path>, ws://..., wss://...)
        #[arg(long)]
        remote: Option<String>,
    },

    /// Queue an operation for the next sync
    #[command(arg_required_else_help = true)]
    Enqueue {
        /// Operation kind, e.g. form_submission
        kind: String,

        /// JSON payload (default: {})
        payload: Option<String>,
    },

    /// Save a document
    #[command(arg_required_else_help = true)]
    Save {
        /// Document type, e.g. media
        #[arg(value_name = "TYPE")]
        doc_type: String,

        /// JSON object of document fields (default: {})
        fields: Option<String>,

        /// Document id; generated as <type>_<millis> when omitted
        #[arg(long)]
        id: Option<String>,
    },

    /// List documents of a type
    #[command(arg_required_else_help = true)]
    Docs {
        /// Document type to match exactly
        #[arg(value_name = "TYPE")]
        doc_type: String,

        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// List queued operations
    Pending {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Show sync state
    Status {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Deliver pending work now
    Sync,

    /// Read and write cached offline data
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Stay running and sync whenever connectivity returns
    Watch,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Cache a JSON value under a key
    Set {
        key: String,
        /// JSON value
        value: String,
    },

    /// Print the JSON value cached under a key
    Get { key: String },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
