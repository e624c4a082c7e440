// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destination filtering: which dialogs receive a broadcast.
//!
//! Pure set arithmetic over a fresh dialog list. Entries match a destination
//! by exact string equality against either its id or its display name.
//! Precedence: a destination on any blacklist never receives a broadcast,
//! even when the whitelist names it.

use std::collections::HashSet;

use loadcast_core::types::Destination;

fn matches(entries: &HashSet<&str>, dest: &Destination) -> bool {
    entries.contains(dest.id.as_str()) || entries.contains(dest.name.as_str())
}

/// Resolves the eligible destination set for one broadcast cycle.
///
/// Keeps active group dialogs, intersects with the whitelist when it is
/// non-empty, then subtracts the union of the static and auto blacklists.
/// Source order is preserved and the computation is idempotent.
pub fn resolve(
    dialogs: &[Destination],
    static_blacklist: &[String],
    auto_blacklist: &HashSet<String>,
    whitelist: &[String],
) -> Vec<Destination> {
    let whitelist: HashSet<&str> = whitelist.iter().map(String::as_str).collect();
    let blocked: HashSet<&str> = static_blacklist
        .iter()
        .map(String::as_str)
        .chain(auto_blacklist.iter().map(String::as_str))
        .collect();

    dialogs
        .iter()
        .filter(|d| d.is_group && !d.is_deactivated)
        .filter(|d| whitelist.is_empty() || matches(&whitelist, d))
        .filter(|d| !matches(&blocked, d))
        .cloned()
        .collect()
}
