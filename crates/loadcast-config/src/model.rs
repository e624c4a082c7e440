// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Loadcast relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized keys are
//! rejected at startup with an actionable diagnostic.

use serde::{Deserialize, Serialize};

/// Top-level Loadcast configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default sensibly.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoadcastConfig {
    /// Relay timing and fetch limits.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Static blacklist and whitelist of group destinations.
    #[serde(default)]
    pub groups: GroupsConfig,

    /// Text classifier extensions.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Durable state paths.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Console transport settings.
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Relay timing and fetch limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Ceiling on how many recent control-channel messages a reload scans.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    /// Smallest accepted `/send<N>` interval, in seconds.
    #[serde(default = "default_loop_min_secs")]
    pub loop_min_secs: u64,

    /// Largest accepted `/send<N>` interval, in seconds.
    #[serde(default = "default_loop_max_secs")]
    pub loop_max_secs: u64,

    /// Cap on total rate-limit backoff per destination and text, in seconds.
    /// Once exceeded the delivery is given up as undelivered.
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            loop_min_secs: default_loop_min_secs(),
            loop_max_secs: default_loop_max_secs(),
            max_backoff_secs: default_max_backoff_secs(),
            log_level: default_log_level(),
        }
    }
}

fn default_fetch_limit() -> usize {
    10_000
}

fn default_loop_min_secs() -> u64 {
    10
}

fn default_loop_max_secs() -> u64 {
    300
}

fn default_max_backoff_secs() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Static blacklist and whitelist of group destinations.
///
/// Entries match a destination id or display name exactly. A non-empty
/// whitelist restricts broadcasting to the listed groups before the
/// blacklist is subtracted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GroupsConfig {
    /// Groups never broadcast to.
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// If non-empty, the only groups broadcast to.
    #[serde(default)]
    pub whitelist: Vec<String>,
}

/// Text classifier extensions.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Additional self-generated phrases to exclude from content,
    /// matched case-insensitively as substrings.
    #[serde(default)]
    pub extra_phrases: Vec<String>,
}

/// Durable state paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the persisted auto-blacklist JSON file.
    #[serde(default = "default_auto_blacklist_path")]
    pub auto_blacklist_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            auto_blacklist_path: default_auto_blacklist_path(),
        }
    }
}

fn default_auto_blacklist_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("loadcast").join("auto_blacklist.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("auto_blacklist.json"))
        .to_string_lossy()
        .into_owned()
}

/// Console transport settings.
///
/// The console transport drives the relay from a local REPL; each name
/// becomes a group destination whose deliveries print to stdout.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Group names the console transport exposes as destinations.
    #[serde(default)]
    pub groups: Vec<String>,
}
