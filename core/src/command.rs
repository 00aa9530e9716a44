//! Commands and the command journal
//!
//! Every external input to a match is a [`Command`]. A [`CommandJournal`]
//! (seed plus commands) is enough to rebuild a match exactly, and it is
//! SCALE-encoded so it can be stored or shipped compactly.

use parity_scale_codec::{Decode, DecodeAll, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::config::Ruleset;
use crate::error::{DuelError, DuelResult};
use crate::log;
use crate::state::MatchState;
use crate::transition;
use crate::types::{Buff, Column};

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Spin,
    SetBet { amount: u32 },
    LockCell { row: u8, column: u8 },
    Respin { column: Column },
    ChooseRow { index: u8 },
    PetJackHit,
    PetJackStand,
    ApplyPetJackBuff { buff: Buff },
    /// Seed as the bit pattern of an `f64`, so non-finite input survives
    /// encoding and is rejected by the transition
    SetSeed { bits: u64 },
    RestartMatch,
    ResetConfig,
}

impl Command {
    pub fn set_seed(value: f64) -> Self {
        Command::SetSeed {
            bits: value.to_bits(),
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Command::Spin => "Spin",
            Command::SetBet { .. } => "Set bet",
            Command::LockCell { .. } => "Lock",
            Command::Respin { .. } => "Respin",
            Command::ChooseRow { .. } => "Row choice",
            Command::PetJackHit => "PetJack hit",
            Command::PetJackStand => "PetJack stand",
            Command::ApplyPetJackBuff { .. } => "PetJack buff",
            Command::SetSeed { .. } => "Seed",
            Command::RestartMatch => "Restart",
            Command::ResetConfig => "Config reset",
        }
    }
}

/// Seed and ordered commands of one engine's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandJournal {
    pub seed: u32,
    pub commands: Vec<Command>,
}

impl CommandJournal {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            commands: Vec::new(),
        }
    }

    pub fn record(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode()
    }

    /// Decode a journal, rejecting trailing bytes
    pub fn from_bytes(bytes: &[u8]) -> DuelResult<Self> {
        Self::decode_all(&mut &bytes[..]).map_err(|e| {
            log::warn(&format!("journal decode failed: {e}"));
            DuelError::MalformedJournal
        })
    }

    /// Rebuild the final state by running every command from a fresh match
    pub fn replay(&self, rules: &Ruleset) -> MatchState {
        let mut state = MatchState::new(rules, self.seed);
        for command in &self.commands {
            transition::apply_in_place(rules, &mut state, command);
        }
        state
    }
}
