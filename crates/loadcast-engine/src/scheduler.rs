// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broadcast lifecycle: single passes, repeating loops, and the shared
//! run state that keeps them mutually exclusive.
//!
//! The operator observes progress through control-channel replies; reply
//! failures are logged and never abort a broadcast.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use loadcast_core::error::LoadcastError;
use loadcast_core::traits::{BlacklistStore, Transport};
use loadcast_core::types::Destination;

use crate::broadcast::Broadcaster;
use crate::filter;
use crate::replies;

/// Shared broadcast run state.
///
/// `try_begin` wins at most once until the matching `finish`; the stop flag
/// is cooperative and only observed between rounds, so an in-flight fan-out
/// always completes.
#[derive(Default)]
pub struct BroadcastState {
    broadcasting: AtomicBool,
    stop: AtomicBool,
}

impl BroadcastState {
    /// Claims the broadcasting slot. Clears any stale stop request on
    /// success.
    pub fn try_begin(&self) -> bool {
        let won = self
            .broadcasting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if won {
            self.stop.store(false, Ordering::SeqCst);
        }
        won
    }

    pub fn finish(&self) {
        self.broadcasting.store(false, Ordering::SeqCst);
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn is_broadcasting(&self) -> bool {
        self.broadcasting.load(Ordering::SeqCst)
    }
}

/// Runs broadcast passes and loops over a captured snapshot of texts.
///
/// Callers claim the run slot with [`BroadcastState::try_begin`] before
/// invoking `run_single` or `run_loop`; both release it on exit.
pub struct Scheduler {
    transport: Arc<dyn Transport>,
    blacklist: Arc<dyn BlacklistStore>,
    broadcaster: Broadcaster,
    static_blacklist: Vec<String>,
    whitelist: Vec<String>,
    state: Arc<BroadcastState>,
}

impl Scheduler {
    pub fn new(
        transport: Arc<dyn Transport>,
        blacklist: Arc<dyn BlacklistStore>,
        max_backoff: Duration,
        static_blacklist: Vec<String>,
        whitelist: Vec<String>,
        state: Arc<BroadcastState>,
    ) -> Self {
        let broadcaster = Broadcaster::new(transport.clone(), blacklist.clone(), max_backoff);
        Self {
            transport,
            blacklist,
            broadcaster,
            static_blacklist,
            whitelist,
            state,
        }
    }

    pub fn state(&self) -> &Arc<BroadcastState> {
        &self.state
    }

    /// Resolves the destination set for the current cycle. Dialogs and the
    /// auto-blacklist are re-read every time; membership changes between
    /// cycles must be picked up.
    pub async fn eligible_destinations(&self) -> Result<Vec<Destination>, LoadcastError> {
        let dialogs = self.transport.list_dialogs().await?;
        let auto = self.blacklist.entries().await?;
        Ok(filter::resolve(
            &dialogs,
            &self.static_blacklist,
            &auto,
            &self.whitelist,
        ))
    }

    /// One pass over `texts`, then a summary reply. Releases the run slot.
    pub async fn run_single(&self, texts: Vec<String>) {
        let result = self.single_inner(&texts).await;
        self.state.finish();
        if let Err(err) = result {
            warn!(error = %err, "broadcast pass aborted");
        }
    }

    async fn single_inner(&self, texts: &[String]) -> Result<(), LoadcastError> {
        let destinations = self.eligible_destinations().await?;
        if destinations.is_empty() {
            self.reply_best_effort(replies::NO_GROUPS).await;
            return Ok(());
        }

        self.reply_best_effort(&replies::pass_started(texts.len()))
            .await;
        info!(loads = texts.len(), groups = destinations.len(), "broadcast pass starting");

        let sent = self.broadcaster.run_pass(texts, &destinations).await;
        let attempted = texts.len() * destinations.len();
        info!(sent, attempted, "broadcast pass finished");

        self.reply_best_effort(&replies::pass_finished(texts.len(), sent, attempted))
            .await;
        Ok(())
    }

    /// Rebroadcasts `texts` every `delay` until stopped or no destinations
    /// remain. Releases the run slot.
    pub async fn run_loop(&self, texts: Vec<String>, delay: Duration) {
        let result = self.loop_inner(&texts, delay).await;
        self.state.finish();
        if let Err(err) = result {
            warn!(error = %err, "broadcast loop aborted");
        }
    }

    async fn loop_inner(&self, texts: &[String], delay: Duration) -> Result<(), LoadcastError> {
        self.reply_best_effort(&replies::loop_started(texts.len(), delay.as_secs()))
            .await;

        let mut round: u32 = 0;
        loop {
            // Destinations resolved fresh each round; a round may shrink the
            // auto-blacklist's complement underneath us.
            let destinations = self.eligible_destinations().await?;
            if destinations.is_empty() {
                self.reply_best_effort(replies::NO_GROUPS_LOOP).await;
                return Ok(());
            }

            round += 1;
            let sent = self.broadcaster.run_pass(texts, &destinations).await;
            info!(round, sent, groups = destinations.len(), "broadcast round finished");
            self.reply_best_effort(&replies::round_finished(round, texts.len(), sent))
                .await;

            if self.state.stop_requested() {
                return Ok(());
            }
            tokio::time::sleep(delay).await;
            if self.state.stop_requested() {
                return Ok(());
            }
        }
    }

    async fn reply_best_effort(&self, text: &str) {
        if let Err(err) = self.transport.reply(text).await {
            warn!(error = %err, "failed to send status reply");
        }
    }
}
