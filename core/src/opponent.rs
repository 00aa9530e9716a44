//! Opponent policy
//!
//! Scores combo rows by a rough expected damage value and uses that to pick a
//! spin, at most one respin trial, and a row. The lookahead is
//! shallow: each column is tried once against the original grid and the
//! trials are never combined.

use crate::combat::{effective_defense, Combatant};
use crate::config::Ruleset;
use crate::reels::SlotGrid;
use crate::rng::DuelRng;
use crate::types::{Action, Buff, Column, ComboRow};

/// Flat bonus (as a share of ATK) for denying the defender a turn
const STEAL_TURN_BONUS: f64 = 0.6;

/// Outcome of an automated spin
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentPlan {
    pub grid: SlotGrid,
    pub row: usize,
    /// Column whose trial was kept, if any beat the original grid
    pub respun: Option<Column>,
}

/// Expected value of playing `combo` from `attacker` against `defender`
pub fn expected_value(
    rules: &Ruleset,
    combo: &ComboRow,
    attacker: &Combatant,
    defender: &Combatant,
) -> f64 {
    let power = combo.action.hit_power() * combo.action.hit_count() as f64;
    let base = attacker.stats.atk / effective_defense(defender, combo.modifier) * power;
    let element = if combo.action == Action::Wild {
        rules.elements().advantage_multiplier()
    } else {
        rules
            .elements()
            .multiplier(combo.element, defender.last_element)
    };
    let bonus = if combo.action == Action::StealTurn {
        attacker.stats.atk * STEAL_TURN_BONUS
    } else {
        0.0
    };
    base * element * combo.modifier.scalar() * attacker.bet_boost + bonus
}

fn best_value(rules: &Ruleset, grid: &SlotGrid, attacker: &Combatant, defender: &Combatant) -> f64 {
    grid.combos()
        .iter()
        .map(|combo| expected_value(rules, combo, attacker, defender))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Try one respin per column on top of `grid` and keep the best trial if it
/// strictly beats the original. All three trials are always drawn.
pub fn optimize(
    rules: &Ruleset,
    grid: SlotGrid,
    bet: u32,
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut impl DuelRng,
) -> (SlotGrid, Option<Column>) {
    let mut best_score = best_value(rules, &grid, attacker, defender);
    let mut best: Option<(SlotGrid, Column)> = None;

    for column in Column::ALL {
        let trial = rules.reels().respin_unchecked(rng, bet, column, &grid);
        let score = best_value(rules, &trial, attacker, defender);
        if score > best_score {
            best_score = score;
            best = Some((trial, column));
        }
    }

    match best {
        Some((trial, column)) => (trial, Some(column)),
        None => (grid, None),
    }
}

/// Index of the strictly best row; the first one wins ties
pub fn choose_row(
    rules: &Ruleset,
    grid: &SlotGrid,
    attacker: &Combatant,
    defender: &Combatant,
) -> usize {
    let mut best_index = 0;
    let mut best = f64::NEG_INFINITY;
    for (index, combo) in grid.combos().iter().enumerate() {
        let value = expected_value(rules, combo, attacker, defender);
        if value > best {
            best = value;
            best_index = index;
        }
    }
    best_index
}

/// Spin, optimize and choose a row in one go
pub fn plan(
    rules: &Ruleset,
    bet: u32,
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut impl DuelRng,
) -> OpponentPlan {
    let spun = rules.reels().spin(rng, bet, None);
    let (grid, respun) = optimize(rules, spun, bet, attacker, defender, rng);
    let row = choose_row(rules, &grid, attacker, defender);
    OpponentPlan { grid, row, respun }
}

/// Buff the automated side takes after winning a PetJack hand
pub fn choose_buff() -> Buff {
    Buff::Initiative
}
