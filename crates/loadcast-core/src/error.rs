// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Loadcast relay.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across Loadcast crates.
#[derive(Debug, Error)]
pub enum LoadcastError {
    /// Configuration errors (invalid TOML, missing required fields, bad paths).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence errors (auto-blacklist file read/write/parse).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (connection, dialog listing, history fetch, event stream).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Outcome of a single failed delivery attempt, raised by [`Transport::send`].
///
/// The broadcast engine treats each variant differently: rate limits are
/// retried after the reported wait, permanent failures blacklist the
/// destination, transient failures are logged and skipped.
///
/// [`Transport::send`]: crate::traits::Transport::send
#[derive(Debug, Clone, Error)]
pub enum SendError {
    /// The transport asked us to back off for the given duration.
    #[error("rate limited, retry after {wait:?}")]
    RateLimited { wait: Duration },

    /// The destination will never accept this sender (writes forbidden,
    /// sender banned, invalid/private/restricted peer, payment required).
    #[error("permanent failure: {reason}")]
    Permanent { reason: String },

    /// Anything else; may succeed on a later round.
    #[error("transient failure: {message}")]
    Transient { message: String },
}
