use super::*;
use crate::engine::DuelEngine;
use crate::transition::apply;
use crate::view::{Snapshot, SNAPSHOT_LOG_LINES};
use crate::Command;

#[test]
fn test_fresh_snapshot() {
    let engine = DuelEngine::with_defaults(1);
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.coins, 1000);
    assert_eq!(snapshot.bet, 10);
    assert_eq!(snapshot.round, 1);
    assert_eq!(snapshot.seed, 1);
    assert!(snapshot.can_spin);
    assert!(!snapshot.can_respin.action);
    assert!(snapshot.player_grid.is_none());
    assert_eq!(snapshot.player.name, "Flaro");
    assert_eq!(snapshot.player.max_hp, 180.0);
    assert_eq!(snapshot.opponent.level, 8);
}

#[test]
fn test_grid_view_carries_combos_and_rows() {
    let mut engine = DuelEngine::with_defaults(42);
    engine.spin();
    let snapshot = engine.snapshot();

    assert!(!snapshot.can_spin);
    assert!(snapshot.can_respin.modifier);
    let player = snapshot.player_grid.unwrap();
    assert_eq!(player.combos, player.grid.combos());
    assert_eq!(player.chosen_row, None);
    let opponent = snapshot.opponent_grid.unwrap();
    assert_eq!(opponent.combos[2].modifier, Modifier::CardTicket);
    // Committed, but not shown while the player picks
    assert_eq!(engine.state().opponent_row, Some(0));
    assert_eq!(opponent.chosen_row, None);
}

#[test]
fn test_opponent_row_hidden_until_resolution() {
    let rules = Ruleset::default();
    let mut player = guard_grid();
    player.modifiers[0] = Modifier::CardTicket;
    let mut state = spun_state(&rules, player, guard_grid());
    state.opponent_row = Some(2);
    state.opponent.hp = 1.0;
    state.opponent.dot = Some(crate::combat::DotEffect {
        ticks_left: 1,
        damage: 50.0,
    });
    let hidden = |state: &MatchState| {
        Snapshot::from_state(state)
            .opponent_grid
            .and_then(|grid| grid.chosen_row)
    };
    assert_eq!(hidden(&state), None);

    let state = apply(&rules, state, &Command::ChooseRow { index: 0 }).state;
    assert_eq!(state.phase, Phase::PetJack);
    assert_eq!(hidden(&state), None);

    // Finished matches keep their grids, so the row can be shown
    let state = apply(&rules, state, &Command::PetJackStand).state;
    let state = match state.phase {
        Phase::PetJack => apply(&rules, state, &Command::ApplyPetJackBuff { buff: Buff::Crit }).state,
        _ => state,
    };
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(hidden(&state), Some(2));
}

#[test]
fn test_respin_flags_follow_coins() {
    let rules = Ruleset::default();
    let mut state = spun_state(&rules, guard_grid(), guard_grid());
    assert!(Snapshot::from_state(&state).can_respin.element);

    state.coins = 1;
    let snapshot = Snapshot::from_state(&state);
    assert!(!snapshot.can_respin.action);
    assert!(!snapshot.can_respin.element);
    assert!(!snapshot.can_respin.modifier);
    assert!(!snapshot.can_spin);
}

#[test]
fn test_log_tail_is_bounded() {
    let rules = Ruleset::default();
    let mut state = MatchState::new(&rules, 1);
    for amount in [10, 20, 50, 100].iter().cycle().take(150) {
        state = apply(&rules, state, &Command::SetBet { amount: *amount }).state;
    }
    assert_eq!(state.log.len(), 150);

    let snapshot = Snapshot::from_state(&state);
    assert_eq!(snapshot.logs.len(), SNAPSHOT_LOG_LINES);
    assert_eq!(snapshot.logs.last(), state.log.last());
    assert_eq!(snapshot.logs[0], state.log[30]);
}

#[test]
fn test_petjack_view_totals() {
    let rules = Ruleset::default();
    let mut player = guard_grid();
    player.modifiers[1] = Modifier::CardTicket;
    let state = spun_state(&rules, player, guard_grid());
    let state = apply(&rules, state, &Command::ChooseRow { index: 1 }).state;

    let view = Snapshot::from_state(&state).petjack.unwrap();
    let game = state.petjack.as_ref().unwrap();
    assert_eq!(view.player_hand, game.player_hand);
    assert_eq!(view.player_total, game.player_total());
    assert_eq!(view.dealer_total, game.dealer_total());
    assert_eq!(view.outcome, None);
}

#[test]
fn test_snapshot_json_uses_camel_case() {
    let mut engine = DuelEngine::with_defaults(3);
    engine.spin();
    let json = engine.snapshot().to_json_pretty().unwrap();
    assert!(json.contains("\"totalWagered\": 10"));
    assert!(json.contains("\"canRespin\""));
    assert!(json.contains("\"playerGrid\""));
}
