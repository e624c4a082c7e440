// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Loadcast configuration system.

use loadcast_config::diagnostic::ConfigError;
use loadcast_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_loadcast_config() {
    let toml = r#"
[relay]
fetch_limit = 500
loop_min_secs = 15
loop_max_secs = 120
max_backoff_secs = 600
log_level = "debug"

[groups]
blacklist = ["spam group"]
whitelist = ["dispatch-a", "dispatch-b"]

[classifier]
extra_phrases = ["auto-reply"]

[storage]
auto_blacklist_path = "/tmp/auto_blacklist.json"

[console]
groups = ["dispatch-a"]
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.relay.fetch_limit, 500);
    assert_eq!(config.relay.loop_min_secs, 15);
    assert_eq!(config.relay.loop_max_secs, 120);
    assert_eq!(config.relay.max_backoff_secs, 600);
    assert_eq!(config.relay.log_level, "debug");
    assert_eq!(config.groups.blacklist, vec!["spam group"]);
    assert_eq!(config.groups.whitelist, vec!["dispatch-a", "dispatch-b"]);
    assert_eq!(config.classifier.extra_phrases, vec!["auto-reply"]);
    assert_eq!(config.storage.auto_blacklist_path, "/tmp/auto_blacklist.json");
    assert_eq!(config.console.groups, vec!["dispatch-a"]);
}

/// Empty TOML yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML should deserialize");
    assert_eq!(config.relay.fetch_limit, 10_000);
    assert_eq!(config.relay.loop_min_secs, 10);
    assert_eq!(config.relay.loop_max_secs, 300);
    assert!(config.groups.blacklist.is_empty());
    assert!(config.groups.whitelist.is_empty());
    assert!(config.classifier.extra_phrases.is_empty());
}

/// Unknown key in [relay] produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_relay_key_produces_suggestion() {
    let toml = r#"
[relay]
fetch_limt = 500
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion, .. }
            if key == "fetch_limt" && suggestion.as_deref() == Some("fetch_limit")
    )));
}

/// Wrong value type produces an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type_error() {
    let toml = r#"
[relay]
fetch_limit = "lots"
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))));
}

/// Semantic validation runs after deserialization.
#[test]
fn inverted_loop_range_is_rejected() {
    let toml = r#"
[relay]
loop_min_secs = 200
loop_max_secs = 100
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("loop_min_secs")
    )));
}
