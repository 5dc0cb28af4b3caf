// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running mode: follows connectivity and prints every state change
//! until Ctrl-C.

use std::sync::Arc;

use offsync_core::connectivity::poll_reachability;
use offsync_core::{SyncEngine, TcpProbe};
use tokio_util::sync::CancellationToken;

use super::status::format_state_line;
use crate::config::Config;
use crate::env;
use crate::error::Result;

pub async fn run(engine: &SyncEngine, config: &Config) -> Result<()> {
    let cancel = CancellationToken::new();

    let poller = match &config.connectivity.probe {
        Some(addr) if !env::force_offline() => {
            let probe = TcpProbe::new(addr.clone(), config.connectivity.probe_timeout());
            Some(tokio::spawn(poll_reachability(
                Arc::clone(engine.monitor()),
                probe,
                config.connectivity.poll_config(),
                cancel.clone(),
            )))
        }
        _ => None,
    };

    let mut states = engine.subscribe_state();
    println!("{}", format_state_line(&states.borrow_and_update()));

    // Work left over from an earlier run goes out without waiting for an edge
    if engine.pending_count() > 0 {
        let engine = engine.clone();
        tokio::spawn(async move {
            let outcome = engine.request_sync().await;
            tracing::debug!(%outcome, "startup sync");
        });
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", format_state_line(&states.borrow_and_update()));
            }
        }
    }

    cancel.cancel();
    if let Some(poller) = poller {
        let _ = poller.await;
    }
    Ok(())
}
