// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command session: the event loop that turns control-channel messages
//! into store updates and broadcast runs.
//!
//! Command vocabulary:
//! - `/start` — help text
//! - `/send` — one pass over everything stored
//! - `/send<N>`, `/send/<N>`, `/send <N>` — rebroadcast every N seconds
//! - `/stop` — cooperative stop
//! - `/status` — run state, destination count, pending count
//!
//! Any other `/`-prefixed text is silently ignored. Non-command text is
//! classified: fake commands get a correction reply, the relay's own
//! replies are dropped, and everything else is stored as a load.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use loadcast_config::model::RelayConfig;
use loadcast_core::error::LoadcastError;
use loadcast_core::traits::Transport;

use crate::classify::{self, Classification, Classifier};
use crate::replies;
use crate::scheduler::{BroadcastState, Scheduler};
use crate::store::ContentStore;

pub struct Session {
    transport: Arc<dyn Transport>,
    classifier: Classifier,
    store: Arc<ContentStore>,
    scheduler: Arc<Scheduler>,
    state: Arc<BroadcastState>,
    relay: RelayConfig,
}

impl Session {
    pub fn new(
        transport: Arc<dyn Transport>,
        classifier: Classifier,
        store: Arc<ContentStore>,
        scheduler: Arc<Scheduler>,
        relay: RelayConfig,
    ) -> Self {
        let state = scheduler.state().clone();
        Self {
            transport,
            classifier,
            store,
            scheduler,
            state,
            relay,
        }
    }

    /// Initial fill of the content store from the channel history.
    pub async fn bootstrap(&self) -> Result<(), LoadcastError> {
        let loaded = self
            .store
            .reload(
                self.transport.as_ref(),
                &self.classifier,
                self.relay.fetch_limit,
            )
            .await?;
        info!(loaded, "content store bootstrapped from channel history");
        Ok(())
    }

    /// Drives the session until the transport's event stream ends.
    pub async fn run(&self) -> Result<(), LoadcastError> {
        loop {
            let event = self.transport.next_event().await?;
            let Some(text) = event.message.display_text() else {
                continue;
            };
            let text = text.to_string();
            debug!(outgoing = event.outgoing, "control-channel message");
            self.handle_text(&text).await;
        }
    }

    /// Dispatches one control-channel text.
    pub async fn handle_text(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.starts_with('/') {
            self.handle_command(trimmed).await;
            return;
        }

        match self.classifier.classify(trimmed) {
            // Non-empty text that still classified as a command is a fake
            // command (`send 10` without the prefix).
            Classification::Command if !trimmed.is_empty() => {
                self.reply_best_effort(replies::NOT_A_COMMAND).await;
            }
            Classification::Command | Classification::SelfGenerated => {}
            Classification::Broadcastable => self.handle_new_load(trimmed).await,
        }
    }

    async fn handle_command(&self, text: &str) {
        match text {
            "/start" => self.reply_best_effort(replies::HELP).await,
            "/stop" => {
                self.state.request_stop();
                self.reply_best_effort(replies::STOPPED).await;
            }
            "/status" => self.handle_status().await,
            "/send" => self.handle_send(None).await,
            other => {
                if let Some(interval) = classify::parse_loop_command(other) {
                    self.handle_send(Some(interval)).await;
                }
                // Any other slash text is ignored on purpose.
            }
        }
    }

    async fn handle_status(&self) {
        let groups = match self.scheduler.eligible_destinations().await {
            Ok(destinations) => destinations.len(),
            Err(err) => {
                warn!(error = %err, "failed to resolve destinations for status");
                0
            }
        };
        self.reply_best_effort(&replies::status(
            self.state.is_broadcasting(),
            groups,
            self.store.len(),
        ))
        .await;
    }

    /// `/send` (one pass) or `/send<N>` (loop every N seconds).
    async fn handle_send(&self, interval_secs: Option<u64>) {
        if let Some(secs) = interval_secs {
            let (min, max) = (self.relay.loop_min_secs, self.relay.loop_max_secs);
            if secs < min || secs > max {
                self.reply_best_effort(&replies::loop_range(min, max)).await;
                return;
            }
        }

        if !self.state.try_begin() {
            self.reply_best_effort(replies::ALREADY_RUNNING).await;
            return;
        }

        // Refresh against the channel so deleted or edited notices never go
        // out before capturing the pass.
        if let Err(err) = self
            .store
            .reconcile(self.transport.as_ref(), &self.classifier)
            .await
        {
            warn!(error = %err, "reconcile failed, broadcasting the stale snapshot");
        }

        let texts = self.store.snapshot_texts();
        if texts.is_empty() {
            self.state.finish();
            self.reply_best_effort(replies::NO_LOADS).await;
            return;
        }

        let scheduler = self.scheduler.clone();
        match interval_secs {
            None => {
                // A one-shot pass consumes the store: anything arriving from
                // here on belongs to the next broadcast.
                self.store.clear();
                tokio::spawn(async move { scheduler.run_single(texts).await });
            }
            Some(secs) => {
                // A loop rebroadcasts the same snapshot every round and
                // leaves the store intact.
                let delay = Duration::from_secs(secs);
                tokio::spawn(async move { scheduler.run_loop(texts, delay).await });
            }
        }
    }

    /// A new load notice arrived: stop any active broadcast, refill the
    /// store from the channel, and acknowledge with the pending count.
    async fn handle_new_load(&self, text: &str) {
        let was_broadcasting = self.state.is_broadcasting();
        if was_broadcasting {
            self.state.request_stop();
        }

        if let Err(err) = self
            .store
            .reload(
                self.transport.as_ref(),
                &self.classifier,
                self.relay.fetch_limit,
            )
            .await
        {
            warn!(error = %err, "failed to reload content store on new load");
        }

        let total = self.store.len();
        let ack = if was_broadcasting {
            replies::load_stored_while_broadcasting(total)
        } else {
            replies::load_stored(text.chars().count(), total)
        };
        self.reply_best_effort(&ack).await;
    }

    async fn reply_best_effort(&self, text: &str) {
        if let Err(err) = self.transport.reply(text).await {
            warn!(error = %err, "failed to send status reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadcast_storage::JsonBlacklistStore;
    use loadcast_test_utils::MockTransport;
    use tempfile::TempDir;

    async fn session(mock: Arc<MockTransport>) -> (Session, TempDir) {
        let dir = TempDir::new().unwrap();
        let blacklist = Arc::new(
            JsonBlacklistStore::open(dir.path().join("auto.json"))
                .await
                .unwrap(),
        );
        let relay = RelayConfig::default();
        let scheduler = Arc::new(Scheduler::new(
            mock.clone(),
            blacklist,
            Duration::from_secs(relay.max_backoff_secs),
            Vec::new(),
            Vec::new(),
            Arc::new(BroadcastState::default()),
        ));
        (
            Session::new(
                mock,
                Classifier::default(),
                Arc::new(ContentStore::new()),
                scheduler,
                relay,
            ),
            dir,
        )
    }

    async fn wait_until_idle(state: &BroadcastState) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while state.is_broadcasting() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("broadcast did not finish");
    }

    #[tokio::test]
    async fn start_replies_with_help() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        session.handle_text("/start").await;
        assert_eq!(mock.replies(), vec![replies::HELP.to_string()]);
    }

    #[tokio::test]
    async fn unknown_slash_command_is_ignored() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        session.handle_text("/frobnicate").await;
        assert!(mock.replies().is_empty());
    }

    #[tokio::test]
    async fn fake_command_gets_a_correction() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        session.handle_text("send/10").await;
        assert_eq!(mock.replies(), vec![replies::NOT_A_COMMAND.to_string()]);
    }

    #[tokio::test]
    async fn self_generated_text_is_dropped_silently() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        session.handle_text(&replies::pass_finished(2, 4, 4)).await;
        assert!(mock.replies().is_empty());
        assert!(session.store.is_empty());
    }

    #[tokio::test]
    async fn new_load_is_stored_and_acknowledged() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        let text = "Load: Nukus -> Urgench, 15t";
        mock.push_history(text);
        session.handle_text(text).await;

        assert_eq!(session.store.len(), 1);
        assert_eq!(
            mock.replies(),
            vec![replies::load_stored(text.chars().count(), 1)]
        );
    }

    #[tokio::test]
    async fn send_with_empty_store_replies_no_loads() {
        let mock = Arc::new(MockTransport::new());
        mock.set_dialogs(vec![MockTransport::group("g1", "One")]);
        let (session, _dir) = session(mock.clone()).await;

        session.handle_text("/send").await;
        assert_eq!(mock.replies(), vec![replies::NO_LOADS.to_string()]);
        assert!(!session.state.is_broadcasting());
    }

    #[tokio::test]
    async fn send_clears_the_store_immediately() {
        let mock = Arc::new(MockTransport::new());
        mock.set_dialogs(vec![MockTransport::group("g1", "One")]);
        let (session, _dir) = session(mock.clone()).await;

        mock.push_history("Load: Jizzakh -> Gulistan, 3t");
        session.bootstrap().await.unwrap();
        assert_eq!(session.store.len(), 1);

        session.handle_text("/send").await;
        assert!(session.store.is_empty());

        wait_until_idle(&session.state).await;
        assert_eq!(mock.attempts().len(), 1);
    }

    #[tokio::test]
    async fn loop_start_leaves_the_store_intact() {
        let mock = Arc::new(MockTransport::new());
        mock.set_dialogs(vec![MockTransport::group("g1", "One")]);
        let (session, _dir) = session(mock.clone()).await;

        mock.push_history("Load: Navoi -> Zarafshan, 11t");
        session.bootstrap().await.unwrap();
        assert_eq!(session.store.len(), 1);

        session.handle_text("/send10").await;
        assert_eq!(session.store.len(), 1);

        session.state.request_stop();
    }

    #[tokio::test]
    async fn loop_interval_out_of_range_is_rejected() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        mock.push_history("Load: Termez -> Denau, 6t");
        session.bootstrap().await.unwrap();

        session.handle_text("/send500").await;
        assert_eq!(mock.replies(), vec![replies::loop_range(10, 300)]);
        assert!(!session.state.is_broadcasting());
        // The store is untouched by a rejected command.
        assert_eq!(session.store.len(), 1);
    }

    #[tokio::test]
    async fn second_send_while_running_is_rejected() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        assert!(session.state.try_begin());
        session.handle_text("/send").await;
        assert_eq!(mock.replies(), vec![replies::ALREADY_RUNNING.to_string()]);
        session.state.finish();
    }

    #[tokio::test]
    async fn status_reports_groups_and_pending() {
        let mock = Arc::new(MockTransport::new());
        mock.set_dialogs(vec![
            MockTransport::group("g1", "One"),
            MockTransport::group("g2", "Two"),
        ]);
        let (session, _dir) = session(mock.clone()).await;

        mock.push_history("Load: Kokand -> Margilan, 2t");
        session.bootstrap().await.unwrap();

        session.handle_text("/status").await;
        assert_eq!(mock.replies(), vec![replies::status(false, 2, 1)]);
    }

    #[tokio::test]
    async fn stop_requests_a_stop_and_acknowledges() {
        let mock = Arc::new(MockTransport::new());
        let (session, _dir) = session(mock.clone()).await;

        assert!(session.state.try_begin());
        session.handle_text("/stop").await;
        assert!(session.state.stop_requested());
        assert_eq!(mock.replies(), vec![replies::STOPPED.to_string()]);
        session.state.finish();
    }

    #[tokio::test]
    async fn send_skips_notices_deleted_before_the_pass() {
        let mock = Arc::new(MockTransport::new());
        mock.set_dialogs(vec![MockTransport::group("g1", "One")]);
        let (session, _dir) = session(mock.clone()).await;

        let doomed = mock.push_history("Load: Angren -> Almalyk, 4t");
        mock.push_history("Load: Chirchik -> Parkent, 5t");
        session.bootstrap().await.unwrap();
        assert_eq!(session.store.len(), 2);

        mock.set_history_text(&doomed, None);
        session.handle_text("/send").await;
        wait_until_idle(&session.state).await;

        let attempts = mock.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].text, "Load: Chirchik -> Parkent, 5t");
    }
}
