// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements `Transport` entirely in memory:
//! - **dialogs**: a settable list returned by `list_dialogs()`
//! - **history**: a growable control-channel message log backing
//!   `fetch_recent()` and `fetch_by_ids()`; replies are appended to it,
//!   exactly as they would land in the real control channel
//! - **outcomes**: per-destination scripted results consumed by `send()`
//!   (defaulting to success), with every attempt captured for assertions
//! - **events**: injected control-channel events returned by `next_event()`

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use loadcast_core::error::{LoadcastError, SendError};
use loadcast_core::traits::Transport;
use loadcast_core::types::{ControlEvent, Destination, MessageId, RawMessage};

/// A delivery attempt captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendAttempt {
    pub destination_id: String,
    pub text: String,
}

#[derive(Default)]
struct Inner {
    dialogs: Vec<Destination>,
    history: Vec<RawMessage>,
    outcomes: HashMap<String, VecDeque<Result<(), SendError>>>,
    attempts: Vec<SendAttempt>,
    replies: Vec<String>,
    events: VecDeque<ControlEvent>,
    closed: bool,
}

/// A mock messaging transport for testing.
pub struct MockTransport {
    inner: Mutex<Inner>,
    notify: Notify,
    next_id: AtomicU64,
}

impl MockTransport {
    /// Create a new mock with no dialogs, history, or scripted outcomes.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            notify: Notify::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Convenience constructor for a plain active group destination.
    pub fn group(id: &str, name: &str) -> Destination {
        Destination {
            id: id.to_string(),
            name: name.to_string(),
            is_group: true,
            is_deactivated: false,
        }
    }

    /// Replace the dialog list returned by `list_dialogs()`.
    pub fn set_dialogs(&self, dialogs: Vec<Destination>) {
        self.inner.lock().unwrap().dialogs = dialogs;
    }

    /// Queue a scripted outcome for the next `send()` to `destination_id`.
    ///
    /// Once the queue for a destination is exhausted, sends succeed.
    pub fn script_outcome(&self, destination_id: &str, outcome: Result<(), SendError>) {
        self.inner
            .lock()
            .unwrap()
            .outcomes
            .entry(destination_id.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Append a message to the control-channel history, returning its id.
    pub fn push_history(&self, text: &str) -> MessageId {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed).to_string());
        self.inner
            .lock()
            .unwrap()
            .history
            .push(RawMessage::with_text(id.clone(), text));
        id
    }

    /// Edit a history message in place. `None` deletes it.
    pub fn set_history_text(&self, id: &MessageId, text: Option<&str>) {
        let mut inner = self.inner.lock().unwrap();
        match text {
            Some(text) => {
                if let Some(msg) = inner.history.iter_mut().find(|m| &m.id == id) {
                    msg.text = Some(text.to_string());
                }
            }
            None => inner.history.retain(|m| &m.id != id),
        }
    }

    /// Append to history and deliver the same text as a control event,
    /// the way a message typed into the control channel arrives.
    pub fn inject_message(&self, text: &str) -> MessageId {
        let id = self.push_history(text);
        let message = RawMessage::with_text(id.clone(), text);
        self.inner
            .lock()
            .unwrap()
            .events
            .push_back(ControlEvent {
                message,
                outgoing: true,
            });
        self.notify.notify_one();
        id
    }

    /// Close the event stream; `next_event()` returns an error afterwards.
    pub fn close(&self) {
        self.inner.lock().unwrap().closed = true;
        self.notify.notify_one();
    }

    /// All delivery attempts made through `send()`, in order.
    pub fn attempts(&self) -> Vec<SendAttempt> {
        self.inner.lock().unwrap().attempts.clone()
    }

    /// All status replies sent into the control channel, in order.
    pub fn replies(&self) -> Vec<String> {
        self.inner.lock().unwrap().replies.clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self) -> Result<(), LoadcastError> {
        Ok(())
    }

    async fn is_authorized(&self) -> Result<bool, LoadcastError> {
        Ok(true)
    }

    async fn list_dialogs(&self) -> Result<Vec<Destination>, LoadcastError> {
        Ok(self.inner.lock().unwrap().dialogs.clone())
    }

    async fn send(&self, destination_id: &str, text: &str) -> Result<(), SendError> {
        let mut inner = self.inner.lock().unwrap();
        inner.attempts.push(SendAttempt {
            destination_id: destination_id.to_string(),
            text: text.to_string(),
        });
        inner
            .outcomes
            .get_mut(destination_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(()))
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<RawMessage>, LoadcastError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.history.iter().rev().take(limit).cloned().collect())
    }

    async fn fetch_by_ids(
        &self,
        ids: &[MessageId],
    ) -> Result<Vec<Option<RawMessage>>, LoadcastError> {
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .map(|id| inner.history.iter().find(|m| &m.id == id).cloned())
            .collect())
    }

    async fn reply(&self, text: &str) -> Result<(), LoadcastError> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed).to_string());
        let mut inner = self.inner.lock().unwrap();
        inner.replies.push(text.to_string());
        // Replies land in the control channel like any other message.
        inner.history.push(RawMessage::with_text(id, text));
        Ok(())
    }

    async fn next_event(&self) -> Result<ControlEvent, LoadcastError> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(event) = inner.events.pop_front() {
                    return Ok(event);
                }
                if inner.closed {
                    return Err(LoadcastError::Transport {
                        message: "mock event stream closed".into(),
                        source: None,
                    });
                }
            }
            self.notify.notified().await;
        }
    }
}
