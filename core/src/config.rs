//! Duel configuration
//!
//! [`DuelConfig`] is plain data, loaded once (from JSON or [`Default`]) and
//! never mutated by gameplay. [`Ruleset`] is the validated, compiled form the
//! engine actually runs against.

use serde::{Deserialize, Serialize};

use crate::elements::ElementChain;
use crate::error::ConfigError;
use crate::reels::ReelSet;
use crate::types::{Action, CombatStats, Element, Modifier, ReelOption, Side};

/// A selectable bet amount and the damage boost it buys
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetTier {
    pub amount: u32,
    pub boost: f64,
}

/// Name and stats of one fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FighterConfig {
    pub name: String,
    pub stats: CombatStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fighters {
    pub player: FighterConfig,
    pub opponent: FighterConfig,
}

impl Fighters {
    pub fn get(&self, side: Side) -> &FighterConfig {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }
}

/// Weight tables for the three reels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelTables {
    pub actions: Vec<ReelOption<Action>>,
    pub elements: Vec<ReelOption<Element>>,
    pub modifiers: Vec<ReelOption<Modifier>>,
    /// Modifiers whose weight doubles once the bet reaches `boost_threshold`
    pub boosted_modifiers: Vec<Modifier>,
    pub boost_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetJackConfig {
    pub deck_values: Vec<u8>,
}

/// Everything that shapes a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DuelConfig {
    pub starting_coins: u32,
    pub max_rounds: u32,
    pub bet_tiers: Vec<BetTier>,
    /// Advantage cycle; each element beats the next one and the last wraps to the first
    pub element_chain: Vec<Element>,
    pub advantage_multiplier: f64,
    pub disadvantage_multiplier: f64,
    pub neutral_multiplier: f64,
    pub fighters: Fighters,
    pub reels: ReelTables,
    pub petjack: PetJackConfig,
}

impl Default for DuelConfig {
    fn default() -> Self {
        use Action::*;
        use Element as E;
        use Modifier as M;

        Self {
            starting_coins: 1000,
            max_rounds: 10,
            bet_tiers: vec![
                BetTier { amount: 10, boost: 1.0 },
                BetTier { amount: 20, boost: 1.1 },
                BetTier { amount: 50, boost: 1.25 },
                BetTier { amount: 100, boost: 1.45 },
            ],
            element_chain: vec![
                E::Flame,
                E::Bloom,
                E::Terra,
                E::Volt,
                E::Gale,
                E::Metal,
                E::Aqua,
            ],
            advantage_multiplier: 1.25,
            disadvantage_multiplier: 0.8,
            neutral_multiplier: 1.0,
            fighters: Fighters {
                player: FighterConfig {
                    name: "Flaro".to_string(),
                    stats: CombatStats {
                        hp: 180.0,
                        atk: 40.0,
                        def: 28.0,
                        spd: 22.0,
                        luk: 14.0,
                        wis: 16.0,
                        level: 8,
                    },
                },
                opponent: FighterConfig {
                    name: "Aqualin".to_string(),
                    stats: CombatStats {
                        hp: 220.0,
                        atk: 34.0,
                        def: 34.0,
                        spd: 18.0,
                        luk: 10.0,
                        wis: 20.0,
                        level: 8,
                    },
                },
            },
            reels: ReelTables {
                actions: vec![
                    ReelOption::new(Strike, 36.0),
                    ReelOption::new(Guard, 16.0),
                    ReelOption::new(Hex, 14.0),
                    ReelOption::new(Heal, 14.0),
                    ReelOption::new(Charge, 10.0),
                    ReelOption::new(StealTurn, 5.0),
                    ReelOption::new(Double, 4.0),
                    ReelOption::new(Wild, 1.0),
                ],
                elements: vec![
                    ReelOption::new(E::Flame, 12.0),
                    ReelOption::new(E::Aqua, 12.0),
                    ReelOption::new(E::Terra, 12.0),
                    ReelOption::new(E::Volt, 12.0),
                    ReelOption::new(E::Gale, 12.0),
                    ReelOption::new(E::Bloom, 12.0),
                    ReelOption::new(E::Metal, 12.0),
                    ReelOption::new(E::Void, 12.0),
                    ReelOption::new(E::Wild, 4.0),
                ],
                modifiers: vec![
                    ReelOption::new(M::Times1, 30.0),
                    ReelOption::new(M::Times1Half, 22.0),
                    ReelOption::new(M::Times2, 10.0),
                    ReelOption::new(M::CritUp, 12.0),
                    ReelOption::new(M::Pierce, 8.0),
                    ReelOption::new(M::Dot, 6.0),
                    ReelOption::new(M::Splash, 5.0),
                    ReelOption::new(M::ShieldUp, 4.0),
                    ReelOption::new(M::Leech, 2.0),
                    ReelOption::new(M::Cleanse, 0.8),
                    ReelOption::new(M::MissChance, 0.2),
                    ReelOption::new(M::CardTicket, 10.0),
                ],
                boosted_modifiers: vec![M::Times2, M::CritUp, M::Pierce, M::Leech],
                boost_threshold: 50,
            },
            petjack: PetJackConfig {
                deck_values: (1..=11).collect(),
            },
        }
    }
}

impl DuelConfig {
    /// Parse a (possibly partial) JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DuelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every invariant the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.bet_tiers.is_empty() {
            return Err(ConfigError::NoBetTiers);
        }
        if let Some(tier) = self
            .bet_tiers
            .iter()
            .find(|t| !t.boost.is_finite() || t.boost <= 0.0)
        {
            return Err(ConfigError::InvalidBetBoost {
                amount: tier.amount,
                boost: tier.boost,
            });
        }

        let chain = &self.element_chain;
        let has_outlier = chain
            .iter()
            .any(|e| matches!(e, Element::Wild | Element::Void));
        let distinct = chain
            .iter()
            .enumerate()
            .all(|(i, e)| !chain[..i].contains(e));
        if chain.len() < 2 || has_outlier || !distinct {
            return Err(ConfigError::InvalidElementChain);
        }

        for (name, value) in [
            ("advantage", self.advantage_multiplier),
            ("disadvantage", self.disadvantage_multiplier),
            ("neutral", self.neutral_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidMultiplier { name });
            }
        }

        for side in [Side::Player, Side::Opponent] {
            let fighter = self.fighters.get(side);
            if !fighter.stats.hp.is_finite() || fighter.stats.hp <= 0.0 {
                return Err(ConfigError::InvalidFighter {
                    fighter: fighter.name.clone(),
                });
            }
        }

        if self.petjack.deck_values.is_empty() || self.petjack.deck_values.contains(&0) {
            return Err(ConfigError::InvalidDeck);
        }

        // Reel tables validate themselves while compiling
        ReelSet::from_tables(&self.reels)?;
        Ok(())
    }

    /// Damage boost bought by a bet amount, if it is a configured tier
    pub fn bet_boost(&self, amount: u32) -> Option<f64> {
        self.bet_tiers
            .iter()
            .find(|t| t.amount == amount)
            .map(|t| t.boost)
    }

    pub fn default_bet(&self) -> u32 {
        self.bet_tiers.first().map(|t| t.amount).unwrap_or_default()
    }
}

/// A validated config together with the tables compiled from it
#[derive(Debug, Clone)]
pub struct Ruleset {
    config: DuelConfig,
    reels: ReelSet,
    elements: ElementChain,
}

impl Ruleset {
    pub fn new(config: DuelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let reels = ReelSet::from_tables(&config.reels)?;
        let elements = ElementChain::from_config(&config);
        Ok(Self {
            config,
            reels,
            elements,
        })
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn reels(&self) -> &ReelSet {
        &self.reels
    }

    pub fn elements(&self) -> &ElementChain {
        &self.elements
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        let config = DuelConfig::default();
        Self {
            reels: ReelSet::from_tables(&config.reels).expect("default reel tables are valid"),
            elements: ElementChain::from_config(&config),
            config,
        }
    }
}
