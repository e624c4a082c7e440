// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable auto-blacklist persistence for the Loadcast relay.
//!
//! The auto-blacklist is a small, deduplicated set of strings (destination
//! ids and display names) stored as a JSON array. It grows only when the
//! broadcast engine hits a permanent send failure, so the store is
//! append-mostly and optimized for a full read at cycle time.

pub mod blacklist;

pub use blacklist::JsonBlacklistStore;
