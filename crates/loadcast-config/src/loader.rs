// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./loadcast.toml` > `~/.config/loadcast/loadcast.toml`
//! > `/etc/loadcast/loadcast.toml` with environment variable overrides via the
//! `LOADCAST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LoadcastConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/loadcast/loadcast.toml` (system-wide)
/// 3. `~/.config/loadcast/loadcast.toml` (user XDG config)
/// 4. `./loadcast.toml` (local directory)
/// 5. `LOADCAST_*` environment variables
pub fn load_config() -> Result<LoadcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LoadcastConfig::default()))
        .merge(Toml::file("/etc/loadcast/loadcast.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("loadcast/loadcast.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("loadcast.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LoadcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LoadcastConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LoadcastConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LoadcastConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LOADCAST_RELAY_LOOP_MIN_SECS` must map
/// to `relay.loop_min_secs`, not `relay.loop.min.secs`.
fn env_provider() -> Env {
    Env::prefixed("LOADCAST_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: LOADCAST_RELAY_FETCH_LIMIT -> "relay_fetch_limit"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("relay_", "relay.", 1)
            .replacen("groups_", "groups.", 1)
            .replacen("classifier_", "classifier.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("console_", "console.", 1);
        mapped.into()
    })
}
