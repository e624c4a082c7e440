// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams the relay engine calls through.

pub mod blacklist;
pub mod transport;

pub use blacklist::BlacklistStore;
pub use transport::Transport;
