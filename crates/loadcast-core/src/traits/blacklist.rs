// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable set store for the auto-blacklist.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::LoadcastError;

/// Persisted, deduplicated set of blacklist entries.
///
/// Entries are destination ids or display names. The set is append-only
/// during a run; the broadcast engine adds entries on permanent send
/// failures and the destination filter reads the full set every cycle.
#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Returns all persisted entries.
    async fn entries(&self) -> Result<HashSet<String>, LoadcastError>;

    /// Adds entries and persists the result. Duplicates are ignored.
    async fn add(&self, entries: &[String]) -> Result<(), LoadcastError>;
}
