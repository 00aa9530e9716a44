//! Combat resolution
//!
//! Applies one combo row from an attacker to a defender. Draw order is fixed:
//! status modifier rolls first (Shield+, Cleanse, DoT), then the action's own
//! rolls (Hex status roll, or hit then crit per hit). Modifier lines are held
//! back and appended after the action's lines.

use serde::{Deserialize, Serialize};

use crate::config::FighterConfig;
use crate::elements::ElementChain;
use crate::rng::DuelRng;
use crate::types::{Action, Buff, CombatStats, ComboRow, Element, Modifier};

/// Rounds a DoT lasts once applied
pub const DOT_TICKS: u32 = 2;
/// Share of the defender's HP cap dealt per DoT tick
pub const DOT_HP_SHARE: f64 = 0.08 * 0.5;
/// Crit adjustment for losing a PetJack hand
pub const PETJACK_LOSS_CRIT: f64 = -5.0;

const GUARD_SHIELD_SHARE: f64 = 0.10;
const SHIELD_UP_SHARE: f64 = 0.15;
const CHARGE_MULTIPLIER: f64 = 1.25;
const PIERCE_DEF_SHARE: f64 = 0.6;
const MISS_PENALTY: f64 = 30.0;
const CRIT_UP_BONUS: f64 = 15.0;
const LEECH_SHARE: f64 = 0.3;

/// Destination for human-readable combat lines
pub trait LogSink {
    fn push_line(&mut self, line: String);
}

impl LogSink for Vec<String> {
    fn push_line(&mut self, line: String) {
        self.push(line);
    }
}

/// Active damage-over-time effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotEffect {
    pub ticks_left: u32,
    pub damage: f64,
}

/// Mutable per-match state of one fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub name: String,
    pub stats: CombatStats,
    pub hp: f64,
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

impl Combatant {
    pub fn new(fighter: &FighterConfig) -> Self {
        Self {
            name: fighter.name.clone(),
            stats: fighter.stats,
            hp: fighter.stats.hp,
            shield: 0.0,
            dot: None,
            charge_bonus: false,
            crit_mod: 0.0,
            status_mod: 0.0,
            initiative_boost: false,
            skip_next: false,
            bet_boost: 1.0,
            last_element: None,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }

    /// Clear the modifiers that only last for one round
    pub fn reset_transient(&mut self) {
        self.crit_mod = 0.0;
        self.status_mod = 0.0;
        self.initiative_boost = false;
    }

    /// Apply a PetJack reward for the current round
    pub fn apply_buff(&mut self, buff: Buff) {
        match buff {
            Buff::Initiative => self.initiative_boost = true,
            Buff::Crit => self.crit_mod += 15.0,
            Buff::Status => self.status_mod += 10.0,
        }
    }

    fn heal(&mut self, amount: f64) {
        self.hp = (self.hp + amount).min(self.stats.hp);
    }

    /// Shield soaks `damage` first; returns (absorbed, dealt to HP)
    fn take_damage(&mut self, damage: f64) -> (f64, f64) {
        let absorbed = self.shield.min(damage);
        self.shield -= absorbed;
        let remainder = damage - absorbed;
        self.hp = (self.hp - remainder).max(0.0);
        (absorbed, remainder)
    }
}

/// What one combo did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionReport {
    /// Element the action was resolved with (Wild actions pick theirs)
    pub element: Option<Element>,
    pub hits: u32,
    pub misses: u32,
    pub crits: u32,
    /// Damage rolled before shields
    pub raw_damage: f64,
    pub shield_absorbed: f64,
    pub hp_damage: f64,
    pub defender_defeated: bool,
}

fn fmt2(value: f64) -> String {
    format!("{value:.2}")
}

/// Shared chance for status modifiers and Hex
pub fn status_chance(attacker: &Combatant, defender: &Combatant) -> f64 {
    (35.0 + (attacker.stats.wis - defender.stats.wis) / 4.0 + attacker.status_mod).clamp(15.0, 65.0)
}

pub fn hit_chance(attacker: &Combatant, defender: &Combatant, modifier: Modifier) -> f64 {
    let penalty = if modifier == Modifier::MissChance {
        MISS_PENALTY
    } else {
        0.0
    };
    (90.0 + (attacker.stats.spd - defender.stats.spd) / 5.0 - penalty).clamp(30.0, 98.0)
}

pub fn crit_chance(attacker: &Combatant, modifier: Modifier) -> f64 {
    let bonus = if modifier == Modifier::CritUp {
        CRIT_UP_BONUS
    } else {
        0.0
    };
    (10.0 + attacker.stats.luk / 3.0 + attacker.crit_mod + bonus).clamp(0.0, 100.0)
}

pub fn crit_multiplier(attacker: &Combatant) -> f64 {
    1.75 * (1.0 + attacker.stats.luk / 400.0)
}

/// Defense used against `modifier`, floored at 1 so it can divide
pub fn effective_defense(defender: &Combatant, modifier: Modifier) -> f64 {
    let def = if modifier == Modifier::Pierce {
        defender.stats.def * PIERCE_DEF_SHARE
    } else {
        defender.stats.def
    };
    def.max(1.0)
}

fn status_roll(
    label: &str,
    attacker: &Combatant,
    defender: &Combatant,
    rng: &mut impl DuelRng,
    lines: &mut Vec<String>,
) -> bool {
    let chance = status_chance(attacker, defender);
    let roll = rng.roll_percent();
    lines.push(format!("{label} roll {} vs {}.", fmt2(roll), fmt2(chance)));
    roll <= chance
}

fn inflict_dot(defender: &mut Combatant) -> f64 {
    let damage = defender.stats.hp * DOT_HP_SHARE;
    defender.dot = Some(DotEffect {
        ticks_left: DOT_TICKS,
        damage,
    });
    damage
}

/// Roll the status modifier (if any) before the action resolves.
///
/// Returns the lines to append once the action is done.
fn roll_status_modifier(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    modifier: Modifier,
    rng: &mut impl DuelRng,
) -> Vec<String> {
    let mut lines = Vec::new();
    match modifier {
        Modifier::ShieldUp => {
            if status_roll("Shield+ status", attacker, defender, rng, &mut lines) {
                let value = attacker.stats.hp * SHIELD_UP_SHARE;
                attacker.shield += value;
                lines.push(format!("Shield+ adds {} shield.", fmt2(value)));
            } else {
                lines.push("Shield+ fizzles.".to_string());
            }
        }
        Modifier::Cleanse => {
            if status_roll("Cleanse", attacker, defender, rng, &mut lines) {
                attacker.dot = None;
                attacker.crit_mod = attacker.crit_mod.max(0.0);
                lines.push("Cleanse removes negative effects.".to_string());
            } else {
                lines.push("Cleanse fails.".to_string());
            }
        }
        Modifier::Dot => {
            if status_roll("DoT", attacker, defender, rng, &mut lines) {
                let damage = inflict_dot(defender);
                lines.push(format!(
                    "DoT inflicts {} over {DOT_TICKS} rounds.",
                    fmt2(damage)
                ));
            } else {
                lines.push("DoT fails to stick.".to_string());
            }
        }
        _ => {}
    }
    lines
}

/// One pass of the hit/damage pipeline
#[allow(clippy::too_many_arguments)]
fn resolve_hit(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    combo: ComboRow,
    element: Element,
    power: f64,
    elements: &ElementChain,
    rng: &mut impl DuelRng,
    log: &mut impl LogSink,
    report: &mut ActionReport,
) {
    let modifier = combo.modifier;
    let chance = hit_chance(attacker, defender, modifier);
    let roll = rng.roll_percent();
    let hit = roll <= chance;
    log.push_line(format!(
        "Hit Roll {} vs {}% -> {}",
        fmt2(roll),
        fmt2(chance),
        if hit { "Hit" } else { "Miss" }
    ));
    if !hit {
        report.misses += 1;
        return;
    }
    report.hits += 1;

    let mut damage = attacker.stats.atk / effective_defense(defender, modifier) * power;
    if attacker.charge_bonus {
        damage *= CHARGE_MULTIPLIER;
        attacker.charge_bonus = false;
        log.push_line("Charge bonus consumed (+25% power).".to_string());
    }

    let element_mult = elements.multiplier(element, defender.last_element);
    log.push_line(format!("Element multiplier: {}", fmt2(element_mult)));
    let scalar = modifier.scalar();
    log.push_line(format!("Mod scalar: {}", fmt2(scalar)));

    let crit_chance = crit_chance(attacker, modifier);
    let crit_roll = rng.roll_percent();
    let critical = crit_roll <= crit_chance;
    log.push_line(format!(
        "Crit chance {}% roll {}",
        fmt2(crit_chance),
        fmt2(crit_roll)
    ));
    if critical {
        report.crits += 1;
    }
    let crit_mult = if critical {
        crit_multiplier(attacker)
    } else {
        1.0
    };
    log.push_line(format!("Bet boost {}x", fmt2(attacker.bet_boost)));

    damage *= element_mult * scalar * crit_mult * attacker.bet_boost;
    if modifier == Modifier::MissChance {
        damage *= 0.5;
    }
    let damage = damage.max(0.0);
    log.push_line(format!("Final damage before shields: {}", fmt2(damage)));
    report.raw_damage += damage;

    let had_shield = defender.shield > 0.0;
    let (absorbed, dealt) = defender.take_damage(damage);
    if had_shield {
        log.push_line(format!("Shield absorbed {}.", fmt2(absorbed)));
    }
    report.shield_absorbed += absorbed;
    report.hp_damage += dealt;
    log.push_line(format!(
        "Damage dealt to HP: {} (HP now {})",
        fmt2(dealt),
        fmt2(defender.hp)
    ));

    match modifier {
        Modifier::Leech => {
            let heal = dealt * LEECH_SHARE;
            attacker.heal(heal);
            log.push_line(format!("Leech healed {} HP.", fmt2(heal)));
        }
        Modifier::Splash => log.push_line("Splash echoes for 50% (log-only).".to_string()),
        _ => {}
    }
}

/// Resolve `combo` from `attacker` against `defender`
pub fn resolve_combo(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    combo: ComboRow,
    elements: &ElementChain,
    rng: &mut impl DuelRng,
    log: &mut impl LogSink,
) -> ActionReport {
    let element = if combo.action == Action::Wild {
        let chosen = elements.choose_wild_element(defender.last_element);
        log.push_line(format!("Wild element optimizes to {chosen:?}."));
        chosen
    } else {
        combo.element
    };
    attacker.last_element = Some(element);

    let mut report = ActionReport {
        element: Some(element),
        ..ActionReport::default()
    };
    let mut trailing = roll_status_modifier(attacker, defender, combo.modifier, rng);

    match combo.action {
        Action::Guard => {
            let value = attacker.stats.hp * GUARD_SHIELD_SHARE;
            attacker.shield += value;
            log.push_line(format!("Guard grants {} shield.", fmt2(value)));
        }
        Action::Heal => {
            let value = attacker.stats.atk / attacker.stats.def.max(1.0) * attacker.bet_boost;
            attacker.heal(value);
            log.push_line(format!(
                "Heal restores {} HP (HP now {}).",
                fmt2(value),
                fmt2(attacker.hp)
            ));
        }
        Action::Charge => {
            attacker.charge_bonus = true;
            log.push_line("Charge readies +25% on next damaging action.".to_string());
        }
        Action::StealTurn => {
            defender.skip_next = true;
            log.push_line("StealTurn triggers: defender skips their action this round.".to_string());
        }
        Action::Hex => {
            let chance = status_chance(attacker, defender);
            let roll = rng.roll_percent();
            log.push_line(format!("Hex status roll {} vs {}.", fmt2(roll), fmt2(chance)));
            if roll <= chance {
                let damage = inflict_dot(defender);
                log.push_line(format!(
                    "Hex inflicts DoT for {} over {DOT_TICKS} rounds.",
                    fmt2(damage)
                ));
            } else {
                log.push_line("Hex fails to take hold.".to_string());
            }
        }
        Action::Strike | Action::Wild | Action::Double => {
            let power = combo.action.hit_power();
            for hit in 0..combo.action.hit_count() {
                let misses_before = report.misses;
                resolve_hit(
                    attacker,
                    defender,
                    combo,
                    element,
                    power,
                    elements,
                    rng,
                    log,
                    &mut report,
                );
                if combo.action == Action::Double && report.misses > misses_before {
                    trailing.push(format!("Double hit {} missed.", hit + 1));
                }
                if defender.is_defeated() {
                    break;
                }
            }
            if combo.action == Action::Double {
                trailing.push(format!("Double total damage {}.", fmt2(report.hp_damage)));
            }
        }
    }

    for line in trailing {
        log.push_line(line);
    }
    report.defender_defeated = defender.is_defeated();
    report
}

/// Advance a DoT by one tick. Returns the tick damage, if any.
pub fn tick_dot(target: &mut Combatant, log: &mut impl LogSink) -> Option<f64> {
    let mut dot = target.dot?;
    if dot.ticks_left == 0 {
        target.dot = None;
        return None;
    }
    dot.ticks_left -= 1;
    let had_shield = target.shield > 0.0;
    let (absorbed, _) = target.take_damage(dot.damage);
    if had_shield {
        log.push_line(format!(
            "{} DoT tick {} (shield absorbed {}).",
            target.name,
            fmt2(dot.damage),
            fmt2(absorbed)
        ));
    } else {
        log.push_line(format!("{} DoT tick {}.", target.name, fmt2(dot.damage)));
    }
    target.dot = (dot.ticks_left > 0).then_some(dot);
    Some(dot.damage)
}
