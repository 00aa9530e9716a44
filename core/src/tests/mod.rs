mod combat;
mod elements;
mod view;

use std::collections::VecDeque;

use crate::combat::Combatant;
use crate::config::{DuelConfig, FighterConfig, Ruleset};
use crate::reels::SlotGrid;
use crate::rng::DuelRng;
use crate::state::{MatchState, Phase};
use crate::types::*;

// ==========================================
// HELPER FUNCTIONS (Boilerplate Reduction)
// ==========================================

/// RNG that replays a fixed list of unit draws, for pinning exact rolls
struct ScriptedRng {
    draws: VecDeque<f64>,
    used: usize,
}

impl ScriptedRng {
    fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.iter().copied().collect(),
            used: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl DuelRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_unit() * 4_294_967_296.0) as u32
    }

    fn next_unit(&mut self) -> f64 {
        self.used += 1;
        self.draws
            .pop_front()
            .expect("scripted rng ran out of draws")
    }
}

/// Wraps another RNG and counts draws
struct CountingRng<R> {
    inner: R,
    count: usize,
}

impl<R: DuelRng> CountingRng<R> {
    fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: DuelRng> DuelRng for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.count += 1;
        self.inner.next_u32()
    }
}

fn stats(hp: f64, atk: f64, def: f64, spd: f64, luk: f64, wis: f64) -> CombatStats {
    CombatStats {
        hp,
        atk,
        def,
        spd,
        luk,
        wis,
        level: 1,
    }
}

fn create_combatant(name: &str, stats: CombatStats) -> Combatant {
    Combatant::new(&FighterConfig {
        name: name.to_string(),
        stats,
    })
}

/// The two default fighters, as fresh combatants
fn default_pair() -> (Combatant, Combatant) {
    let config = DuelConfig::default();
    (
        Combatant::new(&config.fighters.player),
        Combatant::new(&config.fighters.opponent),
    )
}

fn combo(action: Action, element: Element, modifier: Modifier) -> ComboRow {
    ComboRow {
        action,
        element,
        modifier,
    }
}

/// A grid with the same combo on every row
fn uniform_grid(action: Action, element: Element, modifier: Modifier) -> SlotGrid {
    SlotGrid {
        actions: [action; GRID_SIZE],
        elements: [element; GRID_SIZE],
        modifiers: [modifier; GRID_SIZE],
        ..SlotGrid::default()
    }
}

fn guard_grid() -> SlotGrid {
    uniform_grid(Action::Guard, Element::Flame, Modifier::Times1)
}

/// A match already spun, with hand-picked grids and opponent row 0
fn spun_state(rules: &Ruleset, player_grid: SlotGrid, opponent_grid: SlotGrid) -> MatchState {
    let mut state = MatchState::new(rules, 7);
    state.phase = Phase::Spun;
    state.coins -= state.bet;
    state.total_wagered += state.bet;
    state.player_grid = Some(player_grid);
    state.opponent_grid = Some(opponent_grid);
    state.opponent_row = Some(0);
    state
}

fn log_texts(state: &MatchState) -> Vec<&str> {
    state.log.iter().map(|line| line.text.as_str()).collect()
}
