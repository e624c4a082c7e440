// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console transport: drives the relay from a local readline prompt.
//!
//! Every line typed at the prompt arrives as a control-channel message, the
//! configured group names become destinations whose deliveries print to
//! stdout, and an in-memory history backs `fetch_recent`/`fetch_by_ids` so
//! the reload and reconcile paths behave exactly as they would against a
//! real channel.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing::debug;

use loadcast_core::error::{LoadcastError, SendError};
use loadcast_core::traits::Transport;
use loadcast_core::types::{ControlEvent, Destination, MessageId, RawMessage};

/// Spawns the readline loop on a dedicated thread and returns the line
/// stream. The channel closes when the operator hits Ctrl+C or Ctrl+D.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("{}: failed to initialize readline: {e}", "error".red());
                return;
            }
        };

        let prompt = format!("{}> ", "loadcast".green());
        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(&line);
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    eprintln!("{}: {e}", "error".red());
                    break;
                }
            }
        }
    });

    rx
}

pub struct ConsoleTransport {
    groups: Vec<Destination>,
    history: Mutex<Vec<RawMessage>>,
    next_id: AtomicU64,
    lines: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ConsoleTransport {
    /// Builds the transport over an already-running line stream; each
    /// configured name becomes one active group destination.
    pub fn new(group_names: &[String], lines: mpsc::UnboundedReceiver<String>) -> Self {
        let groups = group_names
            .iter()
            .map(|name| Destination {
                id: name.clone(),
                name: name.clone(),
                is_group: true,
                is_deactivated: false,
            })
            .collect();

        Self {
            groups,
            history: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            lines: tokio::sync::Mutex::new(lines),
        }
    }

    fn record(&self, text: &str) -> RawMessage {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed).to_string());
        let message = RawMessage::with_text(id, text);
        self.history.lock().unwrap().push(message.clone());
        message
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn connect(&self) -> Result<(), LoadcastError> {
        debug!(groups = self.groups.len(), "console transport ready");
        Ok(())
    }

    async fn is_authorized(&self) -> Result<bool, LoadcastError> {
        Ok(true)
    }

    async fn list_dialogs(&self) -> Result<Vec<Destination>, LoadcastError> {
        Ok(self.groups.clone())
    }

    async fn send(&self, destination_id: &str, text: &str) -> Result<(), SendError> {
        println!("{} {}", format!("→ {destination_id}:").cyan(), text);
        Ok(())
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<RawMessage>, LoadcastError> {
        let history = self.history.lock().unwrap();
        Ok(history.iter().rev().take(limit).cloned().collect())
    }

    async fn fetch_by_ids(
        &self,
        ids: &[MessageId],
    ) -> Result<Vec<Option<RawMessage>>, LoadcastError> {
        let history = self.history.lock().unwrap();
        Ok(ids
            .iter()
            .map(|id| history.iter().find(|m| &m.id == id).cloned())
            .collect())
    }

    async fn reply(&self, text: &str) -> Result<(), LoadcastError> {
        println!("{}", text.yellow());
        // Replies land in the channel history like any other message.
        self.record(text);
        Ok(())
    }

    async fn next_event(&self) -> Result<ControlEvent, LoadcastError> {
        let line = {
            let mut lines = self.lines.lock().await;
            lines.recv().await
        };
        match line {
            Some(line) => {
                let message = self.record(&line);
                Ok(ControlEvent {
                    message,
                    outgoing: true,
                })
            }
            None => Err(LoadcastError::Transport {
                message: "console input closed".into(),
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> (ConsoleTransport, mpsc::UnboundedSender<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = ConsoleTransport::new(
            &["dispatch-a".to_string(), "dispatch-b".to_string()],
            rx,
        );
        (transport, tx)
    }

    #[tokio::test]
    async fn configured_names_become_group_destinations() {
        let (transport, _tx) = transport();
        let dialogs = transport.list_dialogs().await.unwrap();
        assert_eq!(dialogs.len(), 2);
        assert!(dialogs.iter().all(|d| d.is_group && !d.is_deactivated));
        assert_eq!(dialogs[0].id, "dispatch-a");
    }

    #[tokio::test]
    async fn typed_lines_arrive_as_events_and_enter_history() {
        let (transport, tx) = transport();
        tx.send("Load: Tashkent -> Osh, 18t".to_string()).unwrap();

        let event = transport.next_event().await.unwrap();
        assert!(event.outgoing);
        assert_eq!(event.message.display_text(), Some("Load: Tashkent -> Osh, 18t"));

        let recent = transport.fetch_recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[tokio::test]
    async fn closed_input_ends_the_event_stream() {
        let (transport, tx) = transport();
        drop(tx);
        assert!(transport.next_event().await.is_err());
    }

    #[tokio::test]
    async fn replies_are_fetchable_by_id() {
        let (transport, _tx) = transport();
        transport.reply("📊 Status: idle.").await.unwrap();

        let recent = transport.fetch_recent(10).await.unwrap();
        let id = recent[0].id.clone();
        let fetched = transport.fetch_by_ids(&[id]).await.unwrap();
        assert!(fetched[0].is_some());
    }
}
