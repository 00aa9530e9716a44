use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::combat::Combatant;
use crate::config::Ruleset;
use crate::petjack::PetJack;
use crate::reels::SlotGrid;
use crate::rng::LcgRng;
use crate::types::MatchOutcome;

/// Round the first spin of a match belongs to
pub const FIRST_ROUND: u32 = 1;
/// Round attached to log lines written outside of any round
pub const NO_ROUND: u32 = 0;
/// Respins cost the bet divided by this, rounded down
pub const RESPIN_COST_DIVISOR: u32 = 5;

/// Current phase of the match
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Spun,
    PetJack,
    ResolveTurn,
    EndRound,
    Finished,
}

/// One entry of the append-only match log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    pub text: String,
    pub round: u32,
}

/// The complete match state
///
/// Plain data: every command is a pure function of this value and the rules,
/// so cloning it forks the match, RNG included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub phase: Phase,
    pub coins: u32,
    /// Current bet (always a configured tier)
    pub bet: u32,
    /// Current round number (1-indexed)
    pub round: u32,
    pub player: Combatant,
    pub opponent: Combatant,
    pub player_grid: Option<SlotGrid>,
    pub opponent_grid: Option<SlotGrid>,
    pub player_row: Option<usize>,
    pub opponent_row: Option<usize>,
    /// Sum of every bet paid since the last config reset
    pub total_wagered: u32,
    pub log: Vec<LogLine>,
    pub petjack: Option<PetJack>,
    pub rng: LcgRng,
    /// Seed last applied, as a raw `u32`
    pub seed: u32,
    /// Result of the last finished match
    pub outcome: Option<MatchOutcome>,
}

impl MatchState {
    pub fn new(rules: &Ruleset, seed: u32) -> Self {
        let config = rules.config();
        Self {
            phase: Phase::Idle,
            coins: config.starting_coins,
            bet: config.default_bet(),
            round: FIRST_ROUND,
            player: Combatant::new(&config.fighters.player),
            opponent: Combatant::new(&config.fighters.opponent),
            player_grid: None,
            opponent_grid: None,
            player_row: None,
            opponent_row: None,
            total_wagered: 0,
            log: Vec::new(),
            petjack: None,
            rng: LcgRng::new(seed),
            seed,
            outcome: None,
        }
    }

    pub fn can_spin(&self) -> bool {
        self.phase == Phase::Idle && self.coins >= self.bet
    }

    pub fn respin_cost(&self) -> u32 {
        self.bet / RESPIN_COST_DIVISOR
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}
