// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the relay engine and transport adapters.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a message in the control channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A dialog reported by the transport.
///
/// Recomputed from [`Transport::list_dialogs`] on every broadcast cycle and
/// never cached, because membership and visibility can change between cycles.
///
/// [`Transport::list_dialogs`]: crate::traits::Transport::list_dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Canonical dialog identifier as a string.
    pub id: String,
    /// Display name (group title).
    pub name: String,
    /// Whether this dialog is a group chat.
    pub is_group: bool,
    /// Whether the group has been deactivated upstream.
    pub is_deactivated: bool,
}

/// A message fetched from the control channel.
///
/// Transports differ in which field carries the human-visible text, so all
/// known representations travel along and [`display_text`] picks the first
/// non-empty one.
///
/// [`display_text`]: RawMessage::display_text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub id: MessageId,
    pub text: Option<String>,
    pub raw_text: Option<String>,
    pub caption: Option<String>,
}

impl RawMessage {
    /// Creates a message carrying only the primary text representation.
    pub fn with_text(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: Some(text.into()),
            raw_text: None,
            caption: None,
        }
    }

    /// Returns the first non-empty text representation, trimmed.
    pub fn display_text(&self) -> Option<&str> {
        [
            self.text.as_deref(),
            self.raw_text.as_deref(),
            self.caption.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
    }
}

/// One pending load notice, owned exclusively by the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: MessageId,
    pub text: String,
}

/// An inbound or outbound message observed in the control channel.
#[derive(Debug, Clone)]
pub struct ControlEvent {
    pub message: RawMessage,
    /// `true` for messages the operator account itself sent.
    pub outgoing: bool,
}
