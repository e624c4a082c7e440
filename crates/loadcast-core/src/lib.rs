// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types and trait seams for the Loadcast relay.
//!
//! Defines the error taxonomy, the shared data model (messages, destinations,
//! content items), and the [`Transport`] and [`BlacklistStore`] traits that
//! separate the relay engine from its external collaborators.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{LoadcastError, SendError};
pub use traits::{BlacklistStore, Transport};
