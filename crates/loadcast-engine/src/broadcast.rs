// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out delivery of stored texts to the eligible destinations.
//!
//! Delivery policy per destination:
//! - rate limits are honored at the transport-reported cadence, retrying
//!   until the accumulated wait would exceed the configured backoff cap;
//! - permanent failures append the destination to the persisted
//!   auto-blacklist so later cycles skip it;
//! - transient failures are logged and skipped.
//!
//! A failed destination never aborts the pass.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use loadcast_core::error::SendError;
use loadcast_core::traits::{BlacklistStore, Transport};
use loadcast_core::types::Destination;

pub struct Broadcaster {
    transport: Arc<dyn Transport>,
    blacklist: Arc<dyn BlacklistStore>,
    max_backoff: Duration,
}

impl Broadcaster {
    pub fn new(
        transport: Arc<dyn Transport>,
        blacklist: Arc<dyn BlacklistStore>,
        max_backoff: Duration,
    ) -> Self {
        Self {
            transport,
            blacklist,
            max_backoff,
        }
    }

    /// Delivers one text to one destination. Returns whether it was sent.
    pub async fn send_one(&self, dest: &Destination, text: &str) -> bool {
        let mut waited = Duration::ZERO;
        loop {
            match self.transport.send(&dest.id, text).await {
                Ok(()) => {
                    debug!(dest = %dest.id, name = %dest.name, "delivered");
                    return true;
                }
                Err(SendError::RateLimited { wait }) => {
                    if waited + wait > self.max_backoff {
                        warn!(
                            dest = %dest.id,
                            waited_secs = waited.as_secs(),
                            wait_secs = wait.as_secs(),
                            "rate limit exceeds backoff cap, giving up"
                        );
                        return false;
                    }
                    debug!(dest = %dest.id, wait_secs = wait.as_secs(), "rate limited, waiting");
                    tokio::time::sleep(wait).await;
                    waited += wait;
                }
                Err(SendError::Permanent { reason }) => {
                    warn!(dest = %dest.id, name = %dest.name, %reason, "permanent failure, auto-blacklisting");
                    let entries = [dest.id.clone(), dest.name.clone()];
                    if let Err(err) = self.blacklist.add(&entries).await {
                        warn!(dest = %dest.id, error = %err, "failed to persist auto-blacklist entry");
                    }
                    return false;
                }
                Err(SendError::Transient { message }) => {
                    warn!(dest = %dest.id, %message, "transient failure, skipping");
                    return false;
                }
            }
        }
    }

    /// Runs one pass: every text to every destination, texts in order,
    /// destinations in parallel. Returns the number of successful deliveries
    /// out of `texts.len() * destinations.len()` attempts.
    pub async fn run_pass(&self, texts: &[String], destinations: &[Destination]) -> usize {
        let mut sent = 0;
        for text in texts {
            let results =
                join_all(destinations.iter().map(|dest| self.send_one(dest, text))).await;
            sent += results.into_iter().filter(|ok| *ok).count();
        }
        sent
    }
}
