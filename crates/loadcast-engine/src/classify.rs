// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text classification: command vs. self-generated reply vs. broadcastable
//! content.
//!
//! Classification is a prioritized rule list with fixed precedence
//! Command > SelfGenerated > Broadcastable. The rules are data (a phrase
//! list plus a few compiled patterns), so operators can extend them through
//! configuration without touching control flow.
//!
//! The SelfGenerated rules are deliberately broad: a status reply that
//! slips back into the content store gets rebroadcast, re-detected as new
//! content, and re-stored — an infinite duplication loop. When in doubt,
//! exclude.

use std::sync::LazyLock;

use regex::Regex;

/// What an incoming control-channel text turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A command, a fake command (`send 10` without the prefix), or empty
    /// input. Never stored, never broadcast.
    Command,
    /// One of the relay's own status replies. Never stored, never broadcast.
    SelfGenerated,
    /// Genuine content eligible for broadcast.
    Broadcastable,
}

/// One authoritative pattern for "send-with-number" texts.
///
/// With the leading slash it is the repeating-loop command; without it, it
/// is a fake command that must not be stored as content. Keeping both in a
/// single pattern stops the two from drifting apart.
static SEND_WITH_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(/?)send[\s/]*(\d+)$").expect("send pattern is valid"));

/// Parses a repeating-loop command (`/send10`, `/send/15`, `/send 20`).
///
/// Returns the interval in seconds, or `None` when the text is not a loop
/// command. Range checking is the caller's job.
pub fn parse_loop_command(text: &str) -> Option<u64> {
    let caps = SEND_WITH_NUMBER.captures(text.trim())?;
    if caps.get(1).map_or(true, |m| m.is_empty()) {
        return None; // missing slash prefix: fake command, not a command
    }
    caps.get(2)?.as_str().parse().ok()
}

/// Data-driven SelfGenerated detection rules.
pub struct Rules {
    /// Case-insensitive substrings of known status replies. Stored
    /// lowercased.
    pub phrases: Vec<String>,
    /// Progress announcements: a count, a unit, and a progress verb.
    pub progress_patterns: Vec<Regex>,
    /// Pairs of substrings that must co-occur (timing phrase + progress
    /// verb), lowercased.
    pub compound_phrases: Vec<(String, String)>,
}

impl Default for Rules {
    fn default() -> Self {
        let phrases = [
            // Help text
            "send a load notice",
            "stop broadcasting",
            // Status and acknowledgments
            "status:",
            "groups:",
            "stored loads",
            "load stored",
            "total stored",
            "loadcast connected",
            // Completion and failure announcements
            "broadcast finished",
            "broadcast stopped",
            "broadcast already running",
            "no eligible groups",
            "deliveries",
            // Warnings
            "not a command",
            "use a number between",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let progress_patterns = vec![
            Regex::new(r"(?i)\bbroadcasting\s+\d+\s+loads?\b")
                .expect("progress pattern is valid"),
            Regex::new(r"(?i)\b\d+\s+loads?\s+broadcasting\b")
                .expect("progress pattern is valid"),
        ];

        let compound_phrases = vec![("every".to_string(), "broadcasting".to_string())];

        Self {
            phrases,
            progress_patterns,
            compound_phrases,
        }
    }
}

/// Classifier over a fixed rule set.
pub struct Classifier {
    rules: Rules,
}

impl Classifier {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    /// Default rules plus operator-configured phrases.
    pub fn with_extra_phrases(extra: &[String]) -> Self {
        let mut rules = Rules::default();
        rules
            .phrases
            .extend(extra.iter().map(|p| p.to_lowercase()));
        Self::new(rules)
    }

    /// Classifies one control-channel text.
    pub fn classify(&self, text: &str) -> Classification {
        let trimmed = text.trim();

        // Empty input is rejected the same way commands are: never stored.
        if trimmed.is_empty() || trimmed.starts_with('/') {
            return Classification::Command;
        }
        if SEND_WITH_NUMBER.is_match(trimmed) {
            return Classification::Command;
        }

        let lower = trimmed.to_lowercase();
        if self.rules.phrases.iter().any(|p| lower.contains(p)) {
            return Classification::SelfGenerated;
        }
        if self
            .rules
            .progress_patterns
            .iter()
            .any(|re| re.is_match(trimmed))
        {
            return Classification::SelfGenerated;
        }
        if self
            .rules
            .compound_phrases
            .iter()
            .any(|(a, b)| lower.contains(a) && lower.contains(b))
        {
            return Classification::SelfGenerated;
        }

        Classification::Broadcastable
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}
