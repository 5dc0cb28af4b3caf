// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! offsync_cli - command line front end for the offsync engine.
//!
//! Every command except `init` finds the nearest `.offsync/` directory,
//! loads its config, opens the [`SyncEngine`](offsync_core::SyncEngine) on
//! a single-threaded tokio runtime, runs, and closes the engine again.
//!
//! ```rust,ignore
//! use offsync_cli::{find_work_dir, Config};
//!
//! let work_dir = find_work_dir(Path::new("."))?;
//! let config = Config::load(&work_dir)?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod env;
pub mod error;

pub use cli::{CacheCommand, Cli, Command, OutputFormat};
pub use config::{find_work_dir, init_work_dir, Backend, Config};
pub use error::{Error, Result};

use std::path::PathBuf;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let root = project_root(cli.directory)?;

    if let Command::Init { backend, remote } = cli.command {
        return commands::init::run(&root, backend, remote);
    }

    let work_dir = find_work_dir(&root)?;
    let config = Config::load(&work_dir)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let engine = commands::open_engine(&work_dir, &config).await?;
        let result = dispatch(&engine, &config, cli.command).await;
        // Keep the command's error if both fail
        let closed = engine.close();
        result?;
        closed?;
        Ok::<(), Error>(())
    })
}

async fn dispatch(
    engine: &offsync_core::SyncEngine,
    config: &Config,
    command: Command,
) -> Result<()> {
    match command {
        Command::Init { .. } => Ok(()),
        Command::Enqueue { kind, payload } => {
            commands::enqueue::run(engine, &kind, payload.as_deref())
        }
        Command::Save {
            doc_type,
            fields,
            id,
        } => commands::save::run(engine, &doc_type, fields.as_deref(), id),
        Command::Docs { doc_type, output } => commands::docs::run(engine, &doc_type, output),
        Command::Pending { output } => commands::pending::run(engine, output),
        Command::Status { output } => commands::status::run(engine, output),
        Command::Sync => commands::sync::run(engine).await,
        Command::Cache(cmd) => match cmd {
            CacheCommand::Set { key, value } => commands::cache::set(engine, &key, &value),
            CacheCommand::Get { key } => commands::cache::get(engine, &key),
        },
        Command::Watch => commands::watch::run(engine, config).await,
    }
}

/// Resolves where to look for `.offsync/`: `-C`, then `OFFSYNC_DIR`, then
/// the current directory.
fn project_root(directory: Option<PathBuf>) -> Result<PathBuf> {
    match directory.or_else(env::project_dir) {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

/// Installs the stderr log subscriber, filtered by `OFFSYNC_LOG` (default
/// `warn`).
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(env::vars::OFFSYNC_LOG)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
