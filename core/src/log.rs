//! Logging utilities
//!
//! Thin wrappers over the `log` facade. Nothing is printed unless the host
//! installs a logger (the simulator uses `env_logger`). The in-match battle
//! log is separate and lives in [`crate::state::MatchState::log`].

const TARGET: &str = "pitpet";

/// Log an info message
#[inline(always)]
pub fn info(msg: &str) {
    ::log::info!(target: TARGET, "{msg}");
}

/// Log a warning message
#[inline(always)]
pub fn warn(msg: &str) {
    ::log::warn!(target: TARGET, "{msg}");
}

/// Log a debug message with a label
#[inline(always)]
pub fn debug(label: &str, msg: &str) {
    ::log::debug!(target: TARGET, "[{label}] {msg}");
}

/// Log match state summary
#[inline(always)]
pub fn state_summary(phase: &str, round: u32, coins: u32, bet: u32, player_hp: f64, opponent_hp: f64) {
    ::log::debug!(
        target: TARGET,
        "phase={phase} round={round} coins={coins} bet={bet} hp={player_hp:.2}/{opponent_hp:.2}"
    );
}

/// Log an action being performed
#[inline(always)]
pub fn action(name: &str, details: &str) {
    ::log::debug!(target: TARGET, ">> {name}: {details}");
}

/// Log action result
#[inline(always)]
pub fn result(success: bool, msg: &str) {
    if success {
        ::log::debug!(target: TARGET, "<< ok: {msg}");
    } else {
        ::log::warn!(target: TARGET, "<< rejected: {msg}");
    }
}
