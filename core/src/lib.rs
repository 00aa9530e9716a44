//! Pitpet Duel core
//!
//! A deterministic, seed-driven duel engine. Each round both sides spin a 3x3
//! reel grid of actions, elements and modifiers, pick a row, and the resolver
//! plays the two combos against each other. Everything random flows from one
//! LCG stored in the match state, so a seed plus a command list reproduces a
//! match exactly.

pub mod combat;
pub mod command;
pub mod config;
pub mod elements;
pub mod engine;
pub mod error;
pub mod log;
pub mod opponent;
pub mod petjack;
pub mod reels;
pub mod rng;
pub mod state;
pub mod transition;
pub mod types;
pub mod view;
pub mod weighted;

#[cfg(test)]
mod tests;

pub use command::{Command, CommandJournal};
pub use config::{DuelConfig, Ruleset};
pub use engine::{DuelEngine, SubscriptionId};
pub use error::{ConfigError, DuelError, DuelResult};
pub use state::{LogLine, MatchState, Phase};
pub use transition::{apply, MatchEvent, Transition};
pub use types::*;
pub use view::Snapshot;
