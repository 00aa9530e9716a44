use super::*;
use crate::combat::{
    crit_chance, effective_defense, resolve_combo, status_chance, tick_dot, ActionReport, DotEffect,
};
use crate::rng::LcgRng;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Resolve `c` from Flaro against Aqualin with scripted draws
fn run(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    c: ComboRow,
    draws: &[f64],
) -> (ActionReport, Vec<String>, usize) {
    let rules = Ruleset::default();
    let mut rng = ScriptedRng::new(draws);
    let mut lines = Vec::new();
    let report = resolve_combo(attacker, defender, c, rules.elements(), &mut rng, &mut lines);
    (report, lines, rng.remaining())
}

fn position(lines: &[String], prefix: &str) -> usize {
    lines
        .iter()
        .position(|l| l.starts_with(prefix))
        .unwrap_or_else(|| panic!("no line starting with {prefix:?} in {lines:#?}"))
}

// ==========================================
// DAMAGE PIPELINE
// ==========================================

#[test]
fn test_strike_hit_without_crit() {
    let (mut flaro, mut aqualin) = default_pair();
    let (report, lines, left) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Times1),
        &[0.5, 0.99],
    );

    assert_eq!(left, 0);
    assert_eq!((report.hits, report.crits, report.misses), (1, 0, 0));
    assert!(close(report.hp_damage, 40.0 / 34.0));
    assert!(close(aqualin.hp, 220.0 - 40.0 / 34.0));
    assert_eq!(lines[0], "Hit Roll 50.00 vs 90.80% -> Hit");
    assert!(lines.contains(&"Crit chance 14.67% roll 99.00".to_string()));
}

#[test]
fn test_miss_skips_crit_roll() {
    let (mut flaro, mut aqualin) = default_pair();
    let (report, lines, left) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Times1),
        &[0.95],
    );

    assert_eq!(left, 0);
    assert_eq!(report.misses, 1);
    assert_eq!(report.hp_damage, 0.0);
    assert_eq!(aqualin.hp, 220.0);
    assert_eq!(lines, vec!["Hit Roll 95.00 vs 90.80% -> Miss".to_string()]);
}

#[test]
fn test_crit_multiplier_scales_with_luck() {
    let (mut flaro, mut aqualin) = default_pair();
    let (report, _, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Times1),
        &[0.0, 0.0],
    );

    assert_eq!(report.crits, 1);
    assert!(close(report.hp_damage, 40.0 / 34.0 * 1.75 * (1.0 + 14.0 / 400.0)));
}

#[test]
fn test_miss_chance_modifier_lowers_hit_and_halves_damage() {
    let (mut flaro, mut aqualin) = default_pair();
    let (report, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::MissChance),
        &[0.5, 0.99],
    );

    assert_eq!(lines[0], "Hit Roll 50.00 vs 60.80% -> Hit");
    assert!(close(report.hp_damage, 40.0 / 34.0 * 0.5));
}

#[test]
fn test_hit_chance_is_clamped() {
    let (mut flaro, mut aqualin) = default_pair();
    flaro.stats.spd = 500.0;
    let (_, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Times1),
        &[0.99],
    );
    assert_eq!(lines[0], "Hit Roll 99.00 vs 98.00% -> Miss");

    let (mut flaro, mut aqualin) = default_pair();
    flaro.stats.spd = -500.0;
    let (_, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::MissChance),
        &[0.25, 0.99],
    );
    assert_eq!(lines[0], "Hit Roll 25.00 vs 30.00% -> Hit");
}

#[test]
fn test_zero_defense_floors_at_one() {
    let mut sage = create_combatant("Sage", stats(50.0, 10.0, 0.0, 20.0, 0.0, 200.0));
    let mut husk = create_combatant("Husk", stats(50.0, 10.0, 0.0, 20.0, 0.0, 0.0));

    assert_eq!(effective_defense(&husk, Modifier::Times1), 1.0);
    assert_eq!(effective_defense(&husk, Modifier::Pierce), 1.0);
    assert_eq!(status_chance(&sage, &husk), 65.0);
    assert_eq!(status_chance(&husk, &sage), 15.0);
    assert_eq!(crit_chance(&sage, Modifier::Times1), 10.0);

    let (report, lines, _) = run(
        &mut sage,
        &mut husk,
        combo(Action::Strike, Element::Flame, Modifier::Times1),
        &[0.0, 0.99],
    );
    assert!(close(report.hp_damage, 10.0));
    assert!(close(husk.hp, 40.0));
    assert!(lines.contains(&"Damage dealt to HP: 10.00 (HP now 40.00)".to_string()));
}

#[test]
fn test_pierce_and_bet_boost() {
    let (mut flaro, mut aqualin) = default_pair();
    flaro.bet_boost = 1.25;
    let (report, _, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Pierce),
        &[0.1, 0.99],
    );
    assert!(close(report.hp_damage, 40.0 / (34.0 * 0.6) * 1.25));
}

#[test]
fn test_shield_absorbs_before_hp() {
    let (mut flaro, mut aqualin) = default_pair();
    aqualin.shield = 1.0;
    let (report, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Times2),
        &[0.1, 0.99],
    );

    let raw = 40.0 / 34.0 * 2.0;
    assert!(close(report.raw_damage, raw));
    assert!(close(report.shield_absorbed, 1.0));
    assert!(close(report.hp_damage, raw - 1.0));
    assert_eq!(aqualin.shield, 0.0);
    assert!(lines.contains(&"Shield absorbed 1.00.".to_string()));
}

#[test]
fn test_double_hits_twice() {
    let (mut flaro, mut aqualin) = default_pair();
    let (report, lines, left) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Double, Element::Flame, Modifier::Times1),
        &[0.1, 0.99, 0.95],
    );

    assert_eq!(left, 0);
    assert_eq!((report.hits, report.misses), (1, 1));
    assert!(close(report.hp_damage, 40.0 / 34.0 * 0.7));
    let missed = position(&lines, "Double hit 2 missed.");
    let total = position(&lines, "Double total damage");
    assert!(missed < total);
    assert_eq!(total, lines.len() - 1);
}

#[test]
fn test_double_stops_when_defender_falls() {
    let (mut flaro, mut aqualin) = default_pair();
    aqualin.hp = 0.5;
    let (report, lines, left) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Double, Element::Flame, Modifier::Times1),
        &[0.1, 0.99, 0.1, 0.99],
    );

    assert_eq!(left, 2, "second hit must not draw");
    assert_eq!(report.hits, 1);
    assert!(report.defender_defeated);
    assert_eq!(aqualin.hp, 0.0);
    assert!(close(report.hp_damage, 40.0 / 34.0 * 0.7));
    assert!(lines.last().unwrap().starts_with("Double total damage"));
}

#[test]
fn test_charge_boosts_next_hit_once() {
    let (mut flaro, mut aqualin) = default_pair();
    let (_, _, left) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Charge, Element::Flame, Modifier::Times1),
        &[],
    );
    assert_eq!(left, 0);
    assert!(flaro.charge_bonus);

    let (report, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Times1),
        &[0.1, 0.99],
    );
    assert!(!flaro.charge_bonus);
    assert!(close(report.hp_damage, 40.0 / 34.0 * 1.25));
    assert!(lines.contains(&"Charge bonus consumed (+25% power).".to_string()));
}

#[test]
fn test_charge_survives_a_miss() {
    let (mut flaro, mut aqualin) = default_pair();
    flaro.charge_bonus = true;
    run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Times1),
        &[0.99],
    );
    assert!(flaro.charge_bonus);
}

#[test]
fn test_leech_heals_from_hp_damage_only() {
    let (mut flaro, mut aqualin) = default_pair();
    flaro.hp = 100.0;
    aqualin.shield = 100.0;
    let (report, _, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Leech),
        &[0.1, 0.99],
    );
    assert_eq!(report.hp_damage, 0.0);
    assert_eq!(flaro.hp, 100.0);

    aqualin.shield = 0.0;
    let (report, _, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Leech),
        &[0.1, 0.99],
    );
    assert!(close(flaro.hp, 100.0 + report.hp_damage * 0.3));
}

#[test]
fn test_splash_is_log_only() {
    let (mut flaro, mut aqualin) = default_pair();
    let (report, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Splash),
        &[0.1, 0.99],
    );
    assert!(close(report.hp_damage, 40.0 / 34.0));
    assert_eq!(lines.last().unwrap(), "Splash echoes for 50% (log-only).");
}

#[test]
fn test_wild_action_picks_advantaged_element() {
    let (mut flaro, mut aqualin) = default_pair();
    aqualin.last_element = Some(Element::Bloom);
    let (report, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Wild, Element::Metal, Modifier::Times1),
        &[0.1, 0.99],
    );

    assert_eq!(lines[0], "Wild element optimizes to Flame.");
    assert_eq!(report.element, Some(Element::Flame));
    assert_eq!(flaro.last_element, Some(Element::Flame));
    assert!(close(report.hp_damage, 40.0 / 34.0 * 1.25));
}

// ==========================================
// SUPPORT ACTIONS
// ==========================================

#[test]
fn test_support_actions() {
    let (mut flaro, mut aqualin) = default_pair();

    run(&mut flaro, &mut aqualin, combo(Action::Guard, Element::Volt, Modifier::Times1), &[]);
    assert!(close(flaro.shield, 18.0));
    // Every action records its element
    assert_eq!(flaro.last_element, Some(Element::Volt));

    flaro.hp = 100.0;
    run(&mut flaro, &mut aqualin, combo(Action::Heal, Element::Volt, Modifier::Times1), &[]);
    assert!(close(flaro.hp, 100.0 + 40.0 / 28.0));

    flaro.hp = 180.0;
    run(&mut flaro, &mut aqualin, combo(Action::Heal, Element::Volt, Modifier::Times1), &[]);
    assert_eq!(flaro.hp, 180.0);

    run(&mut flaro, &mut aqualin, combo(Action::StealTurn, Element::Volt, Modifier::Times1), &[]);
    assert!(aqualin.skip_next);
}

#[test]
fn test_hex_rolls_status() {
    let (mut flaro, mut aqualin) = default_pair();
    let (_, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Hex, Element::Flame, Modifier::Times1),
        &[0.5],
    );
    // status chance = 35 + (16 - 20) / 4 = 34
    assert_eq!(lines[0], "Hex status roll 50.00 vs 34.00.");
    assert!(aqualin.dot.is_none());

    run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Hex, Element::Flame, Modifier::Times1),
        &[0.2],
    );
    let dot = aqualin.dot.unwrap();
    assert_eq!(dot.ticks_left, 2);
    assert!(close(dot.damage, 220.0 * 0.04));
}

// ==========================================
// STATUS MODIFIERS
// ==========================================

#[test]
fn test_status_modifier_lines_follow_action() {
    let (mut flaro, mut aqualin) = default_pair();
    // status roll first, then hit, then crit
    let (_, lines, left) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Strike, Element::Flame, Modifier::Dot),
        &[0.0, 0.1, 0.99],
    );

    assert_eq!(left, 0);
    assert!(aqualin.dot.is_some());
    assert!(lines[0].starts_with("Hit Roll 10.00"));
    let damage = position(&lines, "Damage dealt to HP");
    let roll = position(&lines, "DoT roll");
    let result = position(&lines, "DoT inflicts");
    assert!(damage < roll && roll < result);
}

#[test]
fn test_shield_up_grants_shield_after_guard() {
    let (mut flaro, mut aqualin) = default_pair();
    let (_, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Guard, Element::Flame, Modifier::ShieldUp),
        &[0.0],
    );
    assert!(close(flaro.shield, 18.0 + 27.0));
    assert!(lines[0].starts_with("Guard grants"));
    assert_eq!(lines.last().unwrap(), "Shield+ adds 27.00 shield.");
}

#[test]
fn test_cleanse_clears_negative_effects() {
    let (mut flaro, mut aqualin) = default_pair();
    flaro.dot = Some(DotEffect {
        ticks_left: 2,
        damage: 5.0,
    });
    flaro.crit_mod = -5.0;

    run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Guard, Element::Flame, Modifier::Cleanse),
        &[0.99],
    );
    assert!(flaro.dot.is_some(), "failed roll leaves effects");

    run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Guard, Element::Flame, Modifier::Cleanse),
        &[0.0],
    );
    assert!(flaro.dot.is_none());
    assert_eq!(flaro.crit_mod, 0.0);
}

#[test]
fn test_status_buff_raises_status_chance() {
    let (mut flaro, mut aqualin) = default_pair();
    flaro.apply_buff(Buff::Status);
    let (_, lines, _) = run(
        &mut flaro,
        &mut aqualin,
        combo(Action::Hex, Element::Flame, Modifier::Times1),
        &[0.4],
    );
    assert_eq!(lines[0], "Hex status roll 40.00 vs 44.00.");
    assert!(aqualin.dot.is_some());
}

// ==========================================
// INVARIANTS
// ==========================================

#[test]
fn test_damage_non_negative_and_shield_conserved() {
    let rules = Ruleset::default();
    let actions = [
        Action::Strike,
        Action::Guard,
        Action::Hex,
        Action::Heal,
        Action::Charge,
        Action::StealTurn,
        Action::Double,
        Action::Wild,
    ];
    let modifiers = rules
        .config()
        .reels
        .modifiers
        .iter()
        .map(|o| o.label)
        .collect::<Vec<_>>();
    let mut rng = LcgRng::new(31337);

    for (i, &action) in actions.iter().enumerate() {
        for (j, &modifier) in modifiers.iter().enumerate() {
            let (mut attacker, mut defender) = default_pair();
            defender.shield = (i * j) as f64 * 0.3;
            defender.hp = 1.0 + j as f64;
            attacker.charge_bonus = i % 2 == 0;
            let hp_before = defender.hp;
            let shield_before = defender.shield;

            let mut lines = Vec::new();
            let report = resolve_combo(
                &mut attacker,
                &mut defender,
                combo(action, Element::Terra, modifier),
                rules.elements(),
                &mut rng,
                &mut lines,
            );

            assert!(defender.hp >= 0.0 && defender.shield >= 0.0);
            assert!(attacker.hp >= 0.0 && attacker.hp <= attacker.stats.hp);
            assert!(report.raw_damage >= 0.0);
            assert!(report.hp_damage + report.shield_absorbed <= report.raw_damage + 1e-9);
            assert!(report.shield_absorbed <= shield_before + 1e-9);
            assert!(hp_before - defender.hp <= report.hp_damage + 1e-9);
        }
    }
}

#[test]
fn test_tick_dot_absorbs_then_expires() {
    let (mut flaro, _) = default_pair();
    flaro.shield = 3.0;
    flaro.dot = Some(DotEffect {
        ticks_left: 2,
        damage: 5.0,
    });
    let mut lines = Vec::new();

    assert_eq!(tick_dot(&mut flaro, &mut lines), Some(5.0));
    assert_eq!(flaro.shield, 0.0);
    assert_eq!(flaro.hp, 178.0);
    assert_eq!(flaro.dot.unwrap().ticks_left, 1);
    assert_eq!(lines[0], "Flaro DoT tick 5.00 (shield absorbed 3.00).");

    assert_eq!(tick_dot(&mut flaro, &mut lines), Some(5.0));
    assert_eq!(flaro.hp, 173.0);
    assert!(flaro.dot.is_none());
    assert_eq!(lines[1], "Flaro DoT tick 5.00.");

    assert_eq!(tick_dot(&mut flaro, &mut lines), None);
    assert_eq!(lines.len(), 2);
}
