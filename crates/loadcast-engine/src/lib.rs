// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core relay engine: classification, content tracking, destination
//! filtering, and broadcast scheduling.
//!
//! The engine is transport-agnostic; everything network-shaped reaches it
//! through the [`Transport`] trait from `loadcast-core`.
//!
//! [`Transport`]: loadcast_core::traits::Transport

pub mod broadcast;
pub mod classify;
pub mod filter;
pub mod replies;
pub mod scheduler;
pub mod session;
pub mod store;

pub use broadcast::Broadcaster;
pub use classify::{Classification, Classifier};
pub use scheduler::{BroadcastState, Scheduler};
pub use session::Session;
pub use store::{ContentStore, ReconcileDelta};
