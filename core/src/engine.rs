//! Duel engine
//!
//! [`DuelEngine`] owns a [`MatchState`], runs commands through the pure
//! transition, keeps a journal of every command, and publishes one
//! [`Snapshot`] to subscribers per command, accepted or not.

use crate::command::{Command, CommandJournal};
use crate::config::{DuelConfig, Ruleset};
use crate::error::ConfigError;
use crate::log;
use crate::state::MatchState;
use crate::transition::{self, MatchEvent};
use crate::types::{Buff, Column};
use crate::view::Snapshot;

/// Handle returned by [`DuelEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Snapshot)>;

pub struct DuelEngine {
    rules: Ruleset,
    state: MatchState,
    journal: CommandJournal,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl DuelEngine {
    /// Validate `config` and start a match from `seed`
    pub fn new(config: DuelConfig, seed: u32) -> Result<Self, ConfigError> {
        Ok(Self::from_rules(Ruleset::new(config)?, seed))
    }

    pub fn with_defaults(seed: u32) -> Self {
        Self::from_rules(Ruleset::default(), seed)
    }

    pub fn from_rules(rules: Ruleset, seed: u32) -> Self {
        log::info(&format!("=== PITPET DUEL ENGINE INITIALIZED (seed {seed}) ==="));
        let state = MatchState::new(&rules, seed);
        Self {
            rules,
            state,
            journal: CommandJournal::new(seed),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Rebuild an engine by replaying `journal` from its seed
    pub fn replay(rules: Ruleset, journal: &CommandJournal) -> Self {
        let mut engine = Self::from_rules(rules, journal.seed);
        for command in &journal.commands {
            engine.execute(command.clone());
        }
        engine
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn journal(&self) -> &CommandJournal {
        &self.journal
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(&self.state)
    }

    // ==========================================
    // SUBSCRIPTIONS
    // ==========================================

    /// Register `callback`; it is called at once with the current snapshot
    /// and again after every command.
    pub fn subscribe(&mut self, mut callback: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        callback(&self.snapshot());
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns whether `id` was still subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&snapshot);
        }
    }

    // ==========================================
    // COMMANDS
    // ==========================================

    /// Run one command, record it and publish exactly one snapshot
    pub fn execute(&mut self, command: Command) -> Vec<MatchEvent> {
        let events = transition::apply_in_place(&self.rules, &mut self.state, &command);
        self.journal.record(command);
        self.publish();
        events
    }

    pub fn spin(&mut self) -> Vec<MatchEvent> {
        self.execute(Command::Spin)
    }

    pub fn set_bet(&mut self, amount: u32) -> Vec<MatchEvent> {
        self.execute(Command::SetBet { amount })
    }

    pub fn lock_cell(&mut self, row: u8, column: u8) -> Vec<MatchEvent> {
        self.execute(Command::LockCell { row, column })
    }

    pub fn respin(&mut self, column: Column) -> Vec<MatchEvent> {
        self.execute(Command::Respin { column })
    }

    pub fn choose_row(&mut self, index: u8) -> Vec<MatchEvent> {
        self.execute(Command::ChooseRow { index })
    }

    pub fn petjack_hit(&mut self) -> Vec<MatchEvent> {
        self.execute(Command::PetJackHit)
    }

    pub fn petjack_stand(&mut self) -> Vec<MatchEvent> {
        self.execute(Command::PetJackStand)
    }

    pub fn apply_petjack_buff(&mut self, buff: Buff) -> Vec<MatchEvent> {
        self.execute(Command::ApplyPetJackBuff { buff })
    }

    pub fn set_seed(&mut self, value: f64) -> Vec<MatchEvent> {
        self.execute(Command::set_seed(value))
    }

    pub fn restart_match(&mut self) -> Vec<MatchEvent> {
        self.execute(Command::RestartMatch)
    }

    pub fn reset_config(&mut self) -> Vec<MatchEvent> {
        self.execute(Command::ResetConfig)
    }
}
