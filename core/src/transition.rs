//! Pure match transitions
//!
//! [`apply`] maps `(state, command)` to the next state plus the events the
//! command produced. A rejected command changes nothing except the log: all
//! preconditions are checked before the first mutation, and the rejection is
//! recorded as a log line and a [`MatchEvent::Rejected`] event.

use serde::Serialize;

use crate::combat::{self, PETJACK_LOSS_CRIT};
use crate::command::Command;
use crate::config::Ruleset;
use crate::error::{DuelError, DuelResult};
use crate::log;
use crate::opponent;
use crate::petjack::{PetJack, PetJackOutcome, PetJackStage};
use crate::reels::LockChange;
use crate::rng::seed_from_f64;
use crate::state::{LogLine, MatchState, Phase, FIRST_ROUND, NO_ROUND};
use crate::types::{Buff, Column, ComboRow, MatchOutcome, Modifier, Side, GRID_SIZE};

/// Something observable that a command caused
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MatchEvent {
    Logged { line: LogLine },
    Rejected { command: String, reason: DuelError },
    PhaseChanged { from: Phase, to: Phase },
    RoundResolved { round: u32, player_hp: f64, opponent_hp: f64 },
    MatchFinished { outcome: MatchOutcome, payout: u32 },
}

/// Result of applying one command
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: MatchState,
    pub events: Vec<MatchEvent>,
}

/// Apply `command` to `state`, returning the next state and its events
pub fn apply(rules: &Ruleset, mut state: MatchState, command: &Command) -> Transition {
    let events = apply_in_place(rules, &mut state, command);
    Transition { state, events }
}

/// [`apply`] without moving the state
pub fn apply_in_place(rules: &Ruleset, state: &mut MatchState, command: &Command) -> Vec<MatchEvent> {
    log::action(command.name(), &format!("{command:?}"));
    let mut reducer = Reducer {
        rules,
        state,
        events: Vec::new(),
    };
    match reducer.dispatch(command) {
        Ok(()) => log::result(true, command.name()),
        Err(reason) => {
            log::result(false, &reason.to_string());
            reducer.log(format!("{} rejected: {reason}.", command.name()));
            reducer.events.push(MatchEvent::Rejected {
                command: command.name().to_string(),
                reason,
            });
        }
    }
    let state = &*reducer.state;
    log::state_summary(
        &format!("{:?}", state.phase),
        state.round,
        state.coins,
        state.bet,
        state.player.hp,
        state.opponent.hp,
    );
    reducer.events
}

fn wrong_phase(command: &str, phase: Phase) -> DuelError {
    DuelError::WrongPhase {
        command: command.to_string(),
        phase,
    }
}

struct Reducer<'a> {
    rules: &'a Ruleset,
    state: &'a mut MatchState,
    events: Vec<MatchEvent>,
}

impl<'a> Reducer<'a> {
    fn dispatch(&mut self, command: &Command) -> DuelResult<()> {
        match *command {
            Command::Spin => self.spin(),
            Command::SetBet { amount } => self.set_bet(amount),
            Command::LockCell { row, column } => self.lock_cell(row as usize, column as usize),
            Command::Respin { column } => self.respin(column),
            Command::ChooseRow { index } => self.choose_row(index),
            Command::PetJackHit => self.petjack_hit(),
            Command::PetJackStand => self.petjack_stand(),
            Command::ApplyPetJackBuff { buff } => self.apply_petjack_buff(buff),
            Command::SetSeed { bits } => self.set_seed(f64::from_bits(bits)),
            Command::RestartMatch => {
                self.restart_match();
                Ok(())
            }
            Command::ResetConfig => {
                self.reset_config();
                Ok(())
            }
        }
    }

    // ==========================================
    // BOOKKEEPING
    // ==========================================

    fn log(&mut self, text: impl Into<String>) {
        self.log_at(text, self.state.round);
    }

    fn log_at(&mut self, text: impl Into<String>, round: u32) {
        let line = LogLine {
            text: text.into(),
            round,
        };
        self.state.log.push(line.clone());
        self.events.push(MatchEvent::Logged { line });
    }

    fn log_all(&mut self, lines: Vec<String>) {
        for line in lines {
            self.log(line);
        }
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        if from != to {
            self.state.phase = to;
            self.events.push(MatchEvent::PhaseChanged { from, to });
        }
    }

    fn expect_phase(&self, command: &str, phase: Phase) -> DuelResult<()> {
        if self.state.phase != phase {
            return Err(wrong_phase(command, self.state.phase));
        }
        Ok(())
    }

    fn deck(&self) -> &'a [u8] {
        &self.rules.config().petjack.deck_values
    }

    // ==========================================
    // SPIN / BET / SEED
    // ==========================================

    fn spin(&mut self) -> DuelResult<()> {
        self.expect_phase("spin", Phase::Idle)?;
        let bet = self.state.bet;
        if self.state.coins < bet {
            return Err(DuelError::NotEnoughCoins {
                have: self.state.coins,
                need: bet,
            });
        }
        let boost = self
            .rules
            .config()
            .bet_boost(bet)
            .ok_or(DuelError::UnknownBetTier { amount: bet })?;

        let state = &mut *self.state;
        state.coins -= bet;
        state.total_wagered = state.total_wagered.saturating_add(bet);
        for side in [&mut state.player, &mut state.opponent] {
            side.bet_boost = boost;
            side.reset_transient();
        }

        state.player_grid = Some(self.rules.reels().spin(&mut state.rng, bet, None));
        let plan = opponent::plan(self.rules, bet, &state.opponent, &state.player, &mut state.rng);
        if let Some(column) = plan.respun {
            log::debug("opponent", &format!("kept {column:?} respin trial"));
        }
        state.opponent_grid = Some(plan.grid);
        state.opponent_row = Some(plan.row);
        state.player_row = None;

        self.set_phase(Phase::Spun);
        self.log(format!("Round {}: reels spun.", self.state.round));
        Ok(())
    }

    fn set_bet(&mut self, amount: u32) -> DuelResult<()> {
        self.expect_phase("set bet", Phase::Idle)?;
        if self.rules.config().bet_boost(amount).is_none() {
            return Err(DuelError::UnknownBetTier { amount });
        }
        self.state.bet = amount;
        self.log(format!("Bet set to {amount}."));
        Ok(())
    }

    fn set_seed(&mut self, value: f64) -> DuelResult<()> {
        if !value.is_finite() {
            return Err(DuelError::NonFiniteSeed);
        }
        let seed = seed_from_f64(value);
        self.state.rng.set_seed(seed);
        self.state.seed = seed;
        self.log(format!("Seed set to {seed}"));
        Ok(())
    }

    // ==========================================
    // GRID PRIVILEGES
    // ==========================================

    fn lock_cell(&mut self, row: usize, column: usize) -> DuelResult<()> {
        self.expect_phase("lock", Phase::Spun)?;
        let grid = self.state.player_grid.as_mut().ok_or(DuelError::NoGrid)?;
        let message = match grid.toggle_lock(row, column)? {
            LockChange::Locked(_) => {
                format!("Locked cell ({}, {}).", row + 1, column + 1)
            }
            LockChange::Cleared(_) => {
                format!("Unlocked cell ({}, {}).", row + 1, column + 1)
            }
        };
        self.log(message);
        Ok(())
    }

    fn respin(&mut self, column: Column) -> DuelResult<()> {
        self.expect_phase("respin", Phase::Spun)?;
        let state = &mut *self.state;
        let grid = state.player_grid.as_ref().ok_or(DuelError::NoGrid)?;
        if !grid.can_respin() {
            return Err(DuelError::RespinUnavailable { column });
        }
        let cost = state.respin_cost();
        if state.coins < cost {
            return Err(DuelError::NotEnoughCoins {
                have: state.coins,
                need: cost,
            });
        }

        let respun = self
            .rules
            .reels()
            .respin(&mut state.rng, state.bet, column, grid)?;
        state.coins -= cost;
        state.player_grid = Some(respun);
        let reel = format!("{column:?}").to_uppercase();
        self.log(format!("Respins reel {reel} for {cost} coins."));
        Ok(())
    }

    // ==========================================
    // ROW CHOICE / PETJACK
    // ==========================================

    fn choose_row(&mut self, index: u8) -> DuelResult<()> {
        self.expect_phase("choose row", Phase::Spun)?;
        let row = index as usize;
        if row >= GRID_SIZE {
            return Err(DuelError::InvalidRow { index });
        }
        let combo = self
            .state
            .player_grid
            .as_ref()
            .ok_or(DuelError::NoGrid)?
            .combo(row);
        if self.state.opponent_grid.is_none() {
            return Err(DuelError::NoGrid);
        }

        self.state.player_row = Some(row);
        self.log(format!("Player selects {combo}."));

        if combo.modifier == Modifier::CardTicket {
            let game = PetJack::deal(self.deck(), &mut self.state.rng);
            self.log(format!(
                "PetJack dealt: player {:?} ({}), dealer shows {}.",
                game.player_hand,
                game.player_total(),
                game.dealer_hand.first().copied().unwrap_or_default()
            ));
            self.state.petjack = Some(game);
            self.set_phase(Phase::PetJack);
            return Ok(());
        }
        self.resolve_round();
        Ok(())
    }

    fn petjack_mut(&mut self) -> DuelResult<&mut PetJack> {
        self.state.petjack.as_mut().ok_or(DuelError::NoPetJack)
    }

    fn petjack_hit(&mut self) -> DuelResult<()> {
        self.expect_phase("PetJack hit", Phase::PetJack)?;
        let deck = self.deck();
        let state = &mut *self.state;
        let game = state.petjack.as_mut().ok_or(DuelError::NoPetJack)?;
        let outcome = game.hit(deck, &mut state.rng)?;
        let card = game.player_hand.last().copied().unwrap_or_default();
        let total = game.player_total();
        self.log(format!("PetJack hit draws {card} (total {total})."));
        if let Some(outcome) = outcome {
            self.settle_petjack(outcome);
        }
        Ok(())
    }

    fn petjack_stand(&mut self) -> DuelResult<()> {
        self.expect_phase("PetJack stand", Phase::PetJack)?;
        let deck = self.deck();
        let state = &mut *self.state;
        let game = state.petjack.as_mut().ok_or(DuelError::NoPetJack)?;
        let stage = game.stage;
        let outcome = match stage {
            PetJackStage::PlayerTurn => game.stand(deck, &mut state.rng)?,
            PetJackStage::DealerTurn => game.play_dealer(deck, &mut state.rng)?,
            stage => return Err(DuelError::WrongPetJackStage { stage }),
        };
        self.settle_petjack(outcome);
        Ok(())
    }

    /// Apply a finished hand. A player win waits for the buff choice.
    fn settle_petjack(&mut self, outcome: PetJackOutcome) {
        if let Some(game) = self.state.petjack.as_ref() {
            let line = format!(
                "PetJack: player {} vs dealer {}.",
                game.player_total(),
                game.dealer_total()
            );
            self.log(line);
        }
        match outcome {
            PetJackOutcome::Dealer => {
                self.state.player.crit_mod += PETJACK_LOSS_CRIT;
                self.log("PetJack loss: -5% crit this round.");
                self.resolve_round();
            }
            PetJackOutcome::Push => {
                self.log("PetJack push: no effect.");
                self.resolve_round();
            }
            PetJackOutcome::Player => self.log("PetJack win: choose a buff."),
        }
    }

    fn apply_petjack_buff(&mut self, buff: Buff) -> DuelResult<()> {
        self.expect_phase("PetJack buff", Phase::PetJack)?;
        let stage = self.petjack_mut()?.stage;
        if stage != PetJackStage::BuffChoice {
            return Err(DuelError::WrongPetJackStage { stage });
        }
        self.state.player.apply_buff(buff);
        self.log(match buff {
            Buff::Initiative => "PetJack buff: Initiative secured.",
            Buff::Crit => "PetJack buff: +15% Crit this round.",
            Buff::Status => "PetJack buff: +10 Status chance this round.",
        });
        self.resolve_round();
        Ok(())
    }

    // ==========================================
    // ROUND RESOLUTION
    // ==========================================

    fn chosen_combos(&self) -> Option<(ComboRow, ComboRow)> {
        let player = self.state.player_grid.as_ref()?.combo(self.state.player_row?);
        let opponent = self
            .state
            .opponent_grid
            .as_ref()?
            .combo(self.state.opponent_row.unwrap_or(0));
        Some((player, opponent))
    }

    /// Acting order: uncontested initiative, then speed, ties to the player
    fn action_order(&self) -> [Side; 2] {
        let player = &self.state.player;
        let opponent = &self.state.opponent;
        let player_first = match (player.initiative_boost, opponent.initiative_boost) {
            (true, false) => true,
            (false, true) => false,
            _ => player.stats.spd >= opponent.stats.spd,
        };
        if player_first {
            [Side::Player, Side::Opponent]
        } else {
            [Side::Opponent, Side::Player]
        }
    }

    fn opponent_petjack(&mut self) {
        let game = PetJack::autoplay(self.deck(), &mut self.state.rng);
        let name = self.state.opponent.name.clone();
        match game.outcome {
            Some(PetJackOutcome::Player) => {
                let buff = opponent::choose_buff();
                self.state.opponent.apply_buff(buff);
                self.log(format!("{name} wins PetJack: gains {buff:?} buff."));
            }
            Some(PetJackOutcome::Dealer) => {
                self.state.opponent.crit_mod += PETJACK_LOSS_CRIT;
                self.log(format!("{name} loses PetJack: -5% crit."));
            }
            _ => self.log(format!("{name} PetJack push: no effect.")),
        }
    }

    fn resolve_round(&mut self) {
        self.state.petjack = None;
        self.set_phase(Phase::ResolveTurn);
        let Some((player_combo, opponent_combo)) = self.chosen_combos() else {
            return;
        };
        let opponent_name = self.state.opponent.name.clone();
        self.log(format!("{opponent_name} selects {opponent_combo}."));

        if opponent_combo.modifier == Modifier::CardTicket {
            self.opponent_petjack();
        }

        for side in self.action_order() {
            let combo = match side {
                Side::Player => player_combo,
                Side::Opponent => opponent_combo,
            };
            let state = &mut *self.state;
            let (attacker, defender) = match side {
                Side::Player => (&mut state.player, &mut state.opponent),
                Side::Opponent => (&mut state.opponent, &mut state.player),
            };
            if attacker.is_defeated() || defender.is_defeated() {
                continue;
            }
            if attacker.skip_next {
                attacker.skip_next = false;
                let line = format!("{} skips their action.", attacker.name);
                self.log(line);
                continue;
            }

            let mut lines = vec![format!("{} executes {combo}.", attacker.name)];
            let report = combat::resolve_combo(
                attacker,
                defender,
                combo,
                self.rules.elements(),
                &mut state.rng,
                &mut lines,
            );
            if report.defender_defeated {
                lines.push(format!("{} is defeated!", defender.name));
            }
            self.log_all(lines);
            if report.defender_defeated {
                break;
            }
        }

        let mut lines = Vec::new();
        combat::tick_dot(&mut self.state.player, &mut lines);
        combat::tick_dot(&mut self.state.opponent, &mut lines);
        self.log_all(lines);

        self.events.push(MatchEvent::RoundResolved {
            round: self.state.round,
            player_hp: self.state.player.hp,
            opponent_hp: self.state.opponent.hp,
        });
        self.set_phase(Phase::EndRound);
        self.check_match_end();
    }

    fn check_match_end(&mut self) {
        let player_down = self.state.player.is_defeated();
        let opponent_down = self.state.opponent.is_defeated();
        let player_name = self.state.player.name.clone();
        let opponent_name = self.state.opponent.name.clone();

        if player_down && opponent_down {
            self.log("Both pitpets fall! Match draws.");
            return self.finish(MatchOutcome::Draw);
        }
        if opponent_down {
            self.log(format!("{player_name} wins the duel!"));
            return self.finish(MatchOutcome::PlayerWin);
        }
        if player_down {
            self.log(format!("{opponent_name} wins the duel."));
            return self.finish(MatchOutcome::OpponentWin);
        }
        if self.state.round >= self.rules.config().max_rounds {
            let (outcome, winner) = if self.state.player.hp >= self.state.opponent.hp {
                (MatchOutcome::PlayerWin, player_name)
            } else {
                (MatchOutcome::OpponentWin, opponent_name)
            };
            self.log(format!("Max rounds reached. Winner: {winner}."));
            return self.finish(outcome);
        }

        let state = &mut *self.state;
        state.round += 1;
        state.player.skip_next = false;
        state.opponent.skip_next = false;
        state.player_grid = None;
        state.opponent_grid = None;
        state.player_row = None;
        state.opponent_row = None;
        state.petjack = None;
        self.set_phase(Phase::Idle);
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        let payout = match outcome {
            MatchOutcome::PlayerWin => self.state.bet.saturating_mul(2),
            MatchOutcome::OpponentWin => self.state.total_wagered / 10,
            MatchOutcome::Draw => 0,
        };
        self.state.coins = self.state.coins.saturating_add(payout);
        self.state.outcome = Some(outcome);
        if payout > 0 {
            self.log(format!("Payout: {payout} coins."));
        }
        self.set_phase(Phase::Finished);
        self.events.push(MatchEvent::MatchFinished { outcome, payout });
    }

    // ==========================================
    // RESTART / RESET
    // ==========================================

    fn restart_match(&mut self) {
        let fighters = &self.rules.config().fighters;
        let state = &mut *self.state;
        state.player = combat::Combatant::new(&fighters.player);
        state.opponent = combat::Combatant::new(&fighters.opponent);
        state.round = FIRST_ROUND;
        state.player_grid = None;
        state.opponent_grid = None;
        state.player_row = None;
        state.opponent_row = None;
        state.petjack = None;
        state.outcome = None;
        self.log_at("--- Match restarted ---", NO_ROUND);
        self.set_phase(Phase::Idle);
    }

    fn reset_config(&mut self) {
        self.restart_match();
        self.state.coins = self.rules.config().starting_coins;
        self.state.total_wagered = 0;
        self.log("Config reset to defaults.");
    }
}
