//! View types for observers
//!
//! A [`Snapshot`] is an immutable, serializable read model derived from a
//! [`MatchState`]. Observers never see the state itself.

use serde::Serialize;

use crate::combat::{Combatant, DotEffect};
use crate::petjack::{PetJack, PetJackOutcome, PetJackStage};
use crate::reels::SlotGrid;
use crate::state::{LogLine, MatchState, Phase};
use crate::types::{ComboRow, Element, MatchOutcome, GRID_SIZE};

/// Number of trailing log lines carried by a snapshot
pub const SNAPSHOT_LOG_LINES: usize = 120;

/// View of one fighter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantView {
    pub name: String,
    pub level: u32,
    pub hp: f64,
    pub max_hp: f64,
    pub shield: f64,
    pub dot: Option<DotEffect>,
    pub charge_bonus: bool,
    pub crit_mod: f64,
    pub status_mod: f64,
    pub initiative_boost: bool,
    pub skip_next: bool,
    pub bet_boost: f64,
    pub last_element: Option<Element>,
}

impl From<&Combatant> for CombatantView {
    fn from(c: &Combatant) -> Self {
        Self {
            name: c.name.clone(),
            level: c.stats.level,
            hp: c.hp,
            max_hp: c.stats.hp,
            shield: c.shield,
            dot: c.dot,
            charge_bonus: c.charge_bonus,
            crit_mod: c.crit_mod,
            status_mod: c.status_mod,
            initiative_boost: c.initiative_boost,
            skip_next: c.skip_next,
            bet_boost: c.bet_boost,
            last_element: c.last_element,
        }
    }
}

/// A grid together with the combos read off it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub grid: SlotGrid,
    pub combos: [ComboRow; GRID_SIZE],
    /// Row chosen for this round, once known. The opponent's is withheld
    /// while the player is still choosing.
    pub chosen_row: Option<usize>,
}

impl GridView {
    fn new(grid: &SlotGrid, chosen_row: Option<usize>) -> Self {
        Self {
            grid: grid.clone(),
            combos: grid.combos(),
            chosen_row,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetJackView {
    pub player_hand: Vec<u8>,
    pub dealer_hand: Vec<u8>,
    pub player_total: u32,
    pub dealer_total: u32,
    pub stage: PetJackStage,
    pub outcome: Option<PetJackOutcome>,
}

impl From<&PetJack> for PetJackView {
    fn from(game: &PetJack) -> Self {
        Self {
            player_hand: game.player_hand.clone(),
            dealer_hand: game.dealer_hand.clone(),
            player_total: game.player_total(),
            dealer_total: game.dealer_total(),
            stage: game.stage,
            outcome: game.outcome,
        }
    }
}

/// Per-column respin availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanRespin {
    pub action: bool,
    pub element: bool,
    pub modifier: bool,
}

/// The complete match view handed to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: Phase,
    pub coins: u32,
    pub bet: u32,
    pub round: u32,
    pub seed: u32,
    pub total_wagered: u32,
    pub player: CombatantView,
    pub opponent: CombatantView,
    pub player_grid: Option<GridView>,
    pub opponent_grid: Option<GridView>,
    /// Last [`SNAPSHOT_LOG_LINES`] log lines
    pub logs: Vec<LogLine>,
    pub petjack: Option<PetJackView>,
    pub outcome: Option<MatchOutcome>,
    pub can_spin: bool,
    pub can_respin: CanRespin,
}

impl Snapshot {
    pub fn from_state(state: &MatchState) -> Self {
        let respin_open = state.phase == Phase::Spun
            && state.coins >= state.respin_cost()
            && state
                .player_grid
                .as_ref()
                .is_some_and(|grid| grid.can_respin());
        let start = state.log.len().saturating_sub(SNAPSHOT_LOG_LINES);
        // The opponent's row stays hidden until the round resolves
        let opponent_row = match state.phase {
            Phase::Spun | Phase::PetJack => None,
            _ => state.opponent_row,
        };

        Self {
            phase: state.phase,
            coins: state.coins,
            bet: state.bet,
            round: state.round,
            seed: state.seed,
            total_wagered: state.total_wagered,
            player: CombatantView::from(&state.player),
            opponent: CombatantView::from(&state.opponent),
            player_grid: state
                .player_grid
                .as_ref()
                .map(|grid| GridView::new(grid, state.player_row)),
            opponent_grid: state
                .opponent_grid
                .as_ref()
                .map(|grid| GridView::new(grid, opponent_row)),
            logs: state.log[start..].to_vec(),
            petjack: state.petjack.as_ref().map(PetJackView::from),
            outcome: state.outcome,
            can_spin: state.can_spin(),
            can_respin: CanRespin {
                action: respin_open,
                element: respin_open,
                modifier: respin_open,
            },
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
