// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status reply templates sent into the control channel.
//!
//! Every string produced here must be recognizable by the classifier's
//! default phrase set ([`crate::classify::Rules::default`]); a reply that
//! slipped back into the content store would be rebroadcast forever.

/// `/start` help text.
pub const HELP: &str = "📝 Send a load notice and it is stored.\n\
📤 /send — broadcast every stored load once.\n\
⏱️ /send10 … /send300 — rebroadcast every N seconds.\n\
🛑 /stop — stop broadcasting.\n\
📊 /status — state and group count.";

/// `/stop` acknowledgment.
pub const STOPPED: &str = "🛑 Broadcast stopped.";

/// Startup announcement.
pub const CONNECTED: &str = "Loadcast connected.";

/// `/send` while another pass or loop is active.
pub const ALREADY_RUNNING: &str = "Broadcast already running. Use /stop first.";

/// `/send` with an empty store.
pub const NO_LOADS: &str = "No stored loads. Send a load notice first.";

/// Destination set came up empty.
pub const NO_GROUPS: &str = "❌ No eligible groups left (blacklist).";

/// Destination set came up empty mid-loop.
pub const NO_GROUPS_LOOP: &str = "❌ No eligible groups left (blacklist). Broadcast stopped.";

/// Fake-command text that is neither a command nor a load.
pub const NOT_A_COMMAND: &str =
    "That is not a command and it will not be stored as a load. \
     Use /send or /send10 to broadcast.";

/// `/send<N>` with N outside the accepted range.
pub fn loop_range(min: u64, max: u64) -> String {
    format!("⏱️ Use a number between {min} and {max}, e.g. /send{min}.")
}

/// `/status` report.
pub fn status(running: bool, groups: usize, loads: usize) -> String {
    let state = if running {
        "broadcast running"
    } else {
        "idle"
    };
    format!("📊 Status: {state}.\nGroups: {groups}\nStored loads: {loads}")
}

/// Single-pass kickoff.
pub fn pass_started(loads: usize) -> String {
    format!("📤 Broadcasting {loads} loads…")
}

/// Loop kickoff.
pub fn loop_started(loads: usize, delay_secs: u64) -> String {
    format!("📤 Broadcasting {loads} loads, ⏱️ every {delay_secs}s.")
}

/// Single-pass completion summary.
pub fn pass_finished(loads: usize, sent: usize, attempted: usize) -> String {
    format!("✅ Broadcast finished.\n📊 {loads} loads, {sent}/{attempted} deliveries.")
}

/// Per-round summary inside a loop.
pub fn round_finished(round: u32, loads: usize, sent: usize) -> String {
    format!("🔄 Round {round}: {loads} loads, {sent} deliveries.")
}

/// Acknowledgment for a newly stored load.
pub fn load_stored(chars: usize, total: usize) -> String {
    format!("✅ Load stored ({chars} chars).\n⚡ Total stored: {total}.")
}

/// A load arrived while a broadcast was active; the loop will stop.
pub fn load_stored_while_broadcasting(total: usize) -> String {
    format!("⏹️ New load stored. 🛑 Broadcast stopped.\n⚡ Total stored: {total}.")
}
