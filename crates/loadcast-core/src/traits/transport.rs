// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport seam over the underlying messaging client.
//!
//! The relay never talks to a messaging platform directly; everything goes
//! through this trait. The MTProto client, session persistence, and
//! authentication flows live behind it as external collaborators.

use async_trait::async_trait;

use crate::error::{LoadcastError, SendError};
use crate::types::{ControlEvent, Destination, MessageId, RawMessage};

/// Minimal capability surface the relay requires from a messaging client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establishes the connection. Idempotent.
    async fn connect(&self) -> Result<(), LoadcastError>;

    /// Whether the stored session is authorized to act.
    async fn is_authorized(&self) -> Result<bool, LoadcastError>;

    /// Lists all dialogs visible to the account, in source order.
    async fn list_dialogs(&self) -> Result<Vec<Destination>, LoadcastError>;

    /// Delivers `text` to one destination.
    ///
    /// Failure classification (rate-limited / permanent / transient) is the
    /// transport's responsibility; the engine only reacts to the variants.
    async fn send(&self, destination_id: &str, text: &str) -> Result<(), SendError>;

    /// Fetches up to `limit` of the most recent control-channel messages,
    /// newest first.
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<RawMessage>, LoadcastError>;

    /// Re-fetches specific control-channel messages by id.
    ///
    /// The result is positionally aligned with `ids`; a deleted message
    /// comes back as `None`.
    async fn fetch_by_ids(
        &self,
        ids: &[MessageId],
    ) -> Result<Vec<Option<RawMessage>>, LoadcastError>;

    /// Sends a status reply into the control channel.
    async fn reply(&self, text: &str) -> Result<(), LoadcastError>;

    /// Waits for the next control-channel event (incoming or outgoing).
    async fn next_event(&self) -> Result<ControlEvent, LoadcastError>;
}
