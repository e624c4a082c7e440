// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `loadcast serve` command implementation.
//!
//! Wires the console transport, the persisted auto-blacklist, and the
//! command session together, announces startup into the control channel,
//! and runs until the control input closes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use loadcast_config::model::LoadcastConfig;
use loadcast_core::error::LoadcastError;
use loadcast_core::traits::Transport;
use loadcast_engine::classify::Classifier;
use loadcast_engine::replies;
use loadcast_engine::scheduler::{BroadcastState, Scheduler};
use loadcast_engine::session::Session;
use loadcast_engine::store::ContentStore;
use loadcast_storage::JsonBlacklistStore;

use crate::console::{self, ConsoleTransport};

/// Runs the `loadcast serve` command.
pub async fn run_serve(config: LoadcastConfig) -> Result<(), LoadcastError> {
    init_tracing(&config.relay.log_level);

    info!("starting loadcast serve");

    let blacklist = Arc::new(JsonBlacklistStore::open(&config.storage.auto_blacklist_path).await?);
    info!(
        path = config.storage.auto_blacklist_path.as_str(),
        "auto-blacklist store opened"
    );

    let lines = console::spawn_stdin_reader();
    let transport: Arc<dyn Transport> =
        Arc::new(ConsoleTransport::new(&config.console.groups, lines));

    transport.connect().await?;
    if !transport.is_authorized().await? {
        return Err(LoadcastError::Config(
            "transport is not authorized; log in with the operator account first".to_string(),
        ));
    }

    let classifier = Classifier::with_extra_phrases(&config.classifier.extra_phrases);
    let store = Arc::new(ContentStore::new());
    let scheduler = Arc::new(Scheduler::new(
        transport.clone(),
        blacklist,
        Duration::from_secs(config.relay.max_backoff_secs),
        config.groups.blacklist.clone(),
        config.groups.whitelist.clone(),
        Arc::new(BroadcastState::default()),
    ));
    let session = Session::new(
        transport.clone(),
        classifier,
        store,
        scheduler,
        config.relay.clone(),
    );

    session.bootstrap().await?;
    if let Err(e) = transport.reply(replies::CONNECTED).await {
        warn!(error = %e, "failed to announce startup");
    }

    if let Err(e) = session.run().await {
        // The console transport ends the stream on Ctrl+C/Ctrl+D.
        info!(reason = %e, "control channel closed");
    }

    info!("loadcast serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("loadcast={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
