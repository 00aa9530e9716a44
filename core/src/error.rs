//! Error types for duel commands and configuration
//!
//! Command errors never escape the engine: the transition turns them into a
//! log line and a `Rejected` event. Configuration errors are surfaced once,
//! when an engine is built.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::petjack::PetJackStage;
use crate::state::Phase;
use crate::types::Column;

/// Reasons a command is refused
#[derive(
    Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize, thiserror::Error,
)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DuelError {
    #[error("{command} is not allowed during the {phase:?} phase")]
    WrongPhase { command: String, phase: Phase },
    #[error("not enough coins: have {have}, need {need}")]
    NotEnoughCoins { have: u32, need: u32 },
    #[error("no grid has been spun this round")]
    NoGrid,
    #[error("the lock is already placed on another cell")]
    LockAlreadyUsed,
    #[error("cannot lock a cell after a respin")]
    LockAfterRespin,
    #[error("respin unavailable for the {column:?} reel: lock used or already respun")]
    RespinUnavailable { column: Column },
    #[error("cell ({row}, {column}) is outside the 3x3 grid")]
    InvalidCell { row: u8, column: u8 },
    #[error("row {index} is outside the grid")]
    InvalidRow { index: u8 },
    #[error("seed must be a finite number")]
    NonFiniteSeed,
    #[error("{amount} is not a configured bet tier")]
    UnknownBetTier { amount: u32 },
    #[error("PetJack is in the {stage:?} stage")]
    WrongPetJackStage { stage: PetJackStage },
    #[error("PetJack hand already holds {cards} cards")]
    PetJackHandFull { cards: u8 },
    #[error("no PetJack game is running")]
    NoPetJack,
    #[error("command journal is malformed")]
    MalformedJournal,
}

/// Result type alias for duel operations
pub type DuelResult<T> = Result<T, DuelError>;

/// Problems found while loading or validating a [`crate::config::DuelConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{table} reel table is empty")]
    EmptyTable { table: &'static str },
    #[error("{table} reel table has an invalid weight {weight}")]
    InvalidWeight { table: &'static str, weight: f64 },
    #[error("{table} reel table has zero total weight")]
    ZeroTotalWeight { table: &'static str },
    #[error("at least one bet tier is required")]
    NoBetTiers,
    #[error("bet tier {amount} has an invalid boost {boost}")]
    InvalidBetBoost { amount: u32, boost: f64 },
    #[error("element chain needs at least two distinct non-Wild, non-Void elements")]
    InvalidElementChain,
    #[error("multiplier {name} must be finite and positive")]
    InvalidMultiplier { name: &'static str },
    #[error("max rounds must be at least 1")]
    NoRounds,
    #[error("PetJack deck is empty or contains a zero card")]
    InvalidDeck,
    #[error("{fighter} has an HP cap of zero")]
    InvalidFighter { fighter: String },
}
