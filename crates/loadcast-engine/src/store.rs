// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store of pending load notices.
//!
//! The store is the single owner of pending content. It is filled from the
//! control-channel history ([`ContentStore::reload`]) and kept honest
//! against later edits and deletions ([`ContentStore::reconcile`]), so a
//! broadcast never sends text the operator has since removed or rewritten.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, warn};

use loadcast_core::error::LoadcastError;
use loadcast_core::traits::Transport;
use loadcast_core::types::ContentItem;

use crate::classify::{Classification, Classifier};

/// Outcome of one reconciliation: how many items survived and how many were
/// dropped because their source message changed underneath us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileDelta {
    pub kept: usize,
    pub removed: usize,
}

/// Pending load notices, oldest first, deduplicated by message id.
#[derive(Default)]
pub struct ContentStore {
    items: Mutex<Vec<ContentItem>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the store from the most recent control-channel messages.
    ///
    /// Fetches up to `fetch_limit` messages, keeps only texts the classifier
    /// accepts as broadcastable, and replaces the current contents with them
    /// oldest first.
    pub async fn reload(
        &self,
        transport: &dyn Transport,
        classifier: &Classifier,
        fetch_limit: usize,
    ) -> Result<usize, LoadcastError> {
        let recent = transport.fetch_recent(fetch_limit).await?;
        let fetched = recent.len();

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        let mut any_text = false;
        // fetch_recent returns newest first; the store keeps oldest first.
        for message in recent.into_iter().rev() {
            let Some(text) = message.display_text() else {
                continue;
            };
            any_text = true;
            if classifier.classify(text) != Classification::Broadcastable {
                continue;
            }
            if seen.insert(message.id.clone()) {
                items.push(ContentItem {
                    id: message.id.clone(),
                    text: text.to_string(),
                });
            }
        }

        if fetched > 0 && !any_text {
            warn!(fetched, "fetched messages but none carried text");
        }

        let loaded = items.len();
        debug!(fetched, loaded, "content store reloaded");
        *self.items.lock().unwrap() = items;
        Ok(loaded)
    }

    /// Re-fetches every stored message by id and drops items whose source
    /// message was deleted, emptied, or edited into something that no longer
    /// classifies as broadcastable. Surviving items take the refreshed text.
    pub async fn reconcile(
        &self,
        transport: &dyn Transport,
        classifier: &Classifier,
    ) -> Result<ReconcileDelta, LoadcastError> {
        let ids: Vec<_> = {
            let items = self.items.lock().unwrap();
            items.iter().map(|item| item.id.clone()).collect()
        };
        if ids.is_empty() {
            return Ok(ReconcileDelta::default());
        }

        let fetched = transport.fetch_by_ids(&ids).await?;

        let mut kept = Vec::new();
        for (id, message) in ids.into_iter().zip(fetched) {
            let Some(message) = message else {
                debug!(%id, "dropping item: source message deleted");
                continue;
            };
            let Some(text) = message.display_text() else {
                debug!(%id, "dropping item: source message lost its text");
                continue;
            };
            if classifier.classify(text) != Classification::Broadcastable {
                debug!(%id, "dropping item: edited text no longer broadcastable");
                continue;
            }
            kept.push(ContentItem {
                id,
                text: text.to_string(),
            });
        }

        let mut items = self.items.lock().unwrap();
        let delta = ReconcileDelta {
            kept: kept.len(),
            removed: items.len().saturating_sub(kept.len()),
        };
        *items = kept;
        Ok(delta)
    }

    /// Ordered texts forming one broadcast pass.
    pub fn snapshot_texts(&self) -> Vec<String> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .map(|item| item.text.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.items.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadcast_test_utils::MockTransport;

    #[tokio::test]
    async fn reload_keeps_broadcastable_oldest_first() {
        let mock = MockTransport::new();
        mock.push_history("Load: Tashkent -> Andijan, 10t");
        mock.push_history("/send"); // command, skipped
        mock.push_history("Load: Fergana -> Namangan, 5t");

        let store = ContentStore::new();
        let loaded = store
            .reload(&mock, &Classifier::default(), 100)
            .await
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(
            store.snapshot_texts(),
            vec![
                "Load: Tashkent -> Andijan, 10t".to_string(),
                "Load: Fergana -> Namangan, 5t".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn reload_respects_fetch_limit() {
        let mock = MockTransport::new();
        mock.push_history("oldest load, 1t");
        mock.push_history("middle load, 2t");
        mock.push_history("newest load, 3t");

        let store = ContentStore::new();
        store.reload(&mock, &Classifier::default(), 2).await.unwrap();

        // Limit applies to the most recent messages.
        assert_eq!(
            store.snapshot_texts(),
            vec!["middle load, 2t".to_string(), "newest load, 3t".to_string()]
        );
    }

    #[tokio::test]
    async fn reload_excludes_own_replies() {
        let mock = MockTransport::new();
        mock.push_history("Load: Bukhara -> Khiva, 8t");
        mock.reply(&crate::replies::load_stored(20, 1)).await.unwrap();

        let store = ContentStore::new();
        store
            .reload(&mock, &Classifier::default(), 100)
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn reconcile_drops_deleted_and_refreshes_edited() {
        let mock = MockTransport::new();
        let deleted = mock.push_history("Load A, 4t");
        let edited = mock.push_history("Load B, 6t");
        mock.push_history("Load C, 9t");

        let store = ContentStore::new();
        let classifier = Classifier::default();
        store.reload(&mock, &classifier, 100).await.unwrap();
        assert_eq!(store.len(), 3);

        mock.set_history_text(&deleted, None);
        mock.set_history_text(&edited, Some("Load B updated, 7t"));

        let delta = store.reconcile(&mock, &classifier).await.unwrap();
        assert_eq!(delta, ReconcileDelta { kept: 2, removed: 1 });
        assert_eq!(
            store.snapshot_texts(),
            vec!["Load B updated, 7t".to_string(), "Load C, 9t".to_string()]
        );
    }

    #[tokio::test]
    async fn reconcile_drops_items_edited_into_commands() {
        let mock = MockTransport::new();
        let id = mock.push_history("Load D, 12t");

        let store = ContentStore::new();
        let classifier = Classifier::default();
        store.reload(&mock, &classifier, 100).await.unwrap();

        mock.set_history_text(&id, Some("send/10"));

        let delta = store.reconcile(&mock, &classifier).await.unwrap();
        assert_eq!(delta, ReconcileDelta { kept: 0, removed: 1 });
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn reconcile_on_empty_store_is_a_noop() {
        let mock = MockTransport::new();
        let store = ContentStore::new();

        let delta = store
            .reconcile(&mock, &Classifier::default())
            .await
            .unwrap();
        assert_eq!(delta, ReconcileDelta::default());
    }
}
