// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as interval ordering and list consistency.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::LoadcastConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LoadcastConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.relay.fetch_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.fetch_limit must be at least 1".to_string(),
        });
    }

    if config.relay.loop_min_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.loop_min_secs must be at least 1".to_string(),
        });
    }

    if config.relay.loop_min_secs > config.relay.loop_max_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "relay.loop_min_secs ({}) must not exceed relay.loop_max_secs ({})",
                config.relay.loop_min_secs, config.relay.loop_max_secs
            ),
        });
    }

    if config.storage.auto_blacklist_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.auto_blacklist_path must not be empty".to_string(),
        });
    }

    // An entry that is both whitelisted and blacklisted never receives a
    // broadcast (blacklist wins); flag it as an operator mistake.
    let whitelist: HashSet<&String> = config.groups.whitelist.iter().collect();
    for entry in &config.groups.blacklist {
        if whitelist.contains(entry) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "group `{entry}` appears in both groups.blacklist and groups.whitelist"
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
