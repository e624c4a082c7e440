// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test helpers for the Loadcast relay.
//!
//! Provides [`MockTransport`], a deterministic in-memory [`Transport`]
//! implementation with scripted dialogs, send outcomes, and a control-channel
//! history, so engine behavior can be asserted without a network.
//!
//! [`Transport`]: loadcast_core::traits::Transport

pub mod mock_transport;

pub use mock_transport::MockTransport;
