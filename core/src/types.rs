use core::fmt;

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Number of rows (and columns) on a slot grid
pub const GRID_SIZE: usize = 3;

// ==========================================
// REEL SYMBOLS
// ==========================================

/// Action reel symbols
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
pub enum Action {
    Strike,
    Guard,
    Hex,
    Heal,
    Charge,
    StealTurn,
    Double,
    Wild,
}

impl Action {
    /// Power per hit used by the resolver
    pub fn hit_power(self) -> f64 {
        match self {
            Action::Double => 0.7,
            Action::Strike | Action::Wild => 1.0,
            _ => 0.0,
        }
    }

    /// Number of independent hits a damaging action performs
    pub fn hit_count(self) -> usize {
        match self {
            Action::Double => 2,
            Action::Strike | Action::Wild => 1,
            _ => 0,
        }
    }
}

/// Element reel symbols
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
pub enum Element {
    Flame,
    Aqua,
    Terra,
    Volt,
    Gale,
    Bloom,
    Metal,
    Void,
    Wild,
}

/// Modifier reel symbols
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
pub enum Modifier {
    #[serde(rename = "x1")]
    Times1,
    #[serde(rename = "x1.5")]
    Times1Half,
    #[serde(rename = "x2")]
    Times2,
    #[serde(rename = "Crit+")]
    CritUp,
    Pierce,
    #[serde(rename = "DoT")]
    Dot,
    Splash,
    #[serde(rename = "Shield+")]
    ShieldUp,
    Leech,
    Cleanse,
    #[serde(rename = "Miss?")]
    MissChance,
    #[serde(rename = "Card-Ticket")]
    CardTicket,
}

impl Modifier {
    /// Literal damage multiplier; every non-multiplier modifier is neutral
    pub fn scalar(self) -> f64 {
        match self {
            Modifier::Times1Half => 1.5,
            Modifier::Times2 => 2.0,
            _ => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Modifier::Times1 => "x1",
            Modifier::Times1Half => "x1.5",
            Modifier::Times2 => "x2",
            Modifier::CritUp => "Crit+",
            Modifier::Pierce => "Pierce",
            Modifier::Dot => "DoT",
            Modifier::Splash => "Splash",
            Modifier::ShieldUp => "Shield+",
            Modifier::Leech => "Leech",
            Modifier::Cleanse => "Cleanse",
            Modifier::MissChance => "Miss?",
            Modifier::CardTicket => "Card-Ticket",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grid columns, one per reel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Action,
    Element,
    Modifier,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Action, Column::Element, Column::Modifier];

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }
}

// ==========================================
// COMBO ROWS
// ==========================================

/// One (action, element, modifier) triple read off a grid row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboRow {
    pub action: Action,
    pub element: Element,
    pub modifier: Modifier,
}

impl fmt::Display for ComboRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} | {:?} | {}", self.action, self.element, self.modifier)
    }
}

// ==========================================
// SIDES, BUFFS, STATS
// ==========================================

/// The two seats at the table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Player,
    Opponent,
}

/// Reward picked after winning a PetJack hand, valid for the current round
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Buff {
    /// Act first this round unless the other side holds it too
    Initiative,
    /// +15 crit chance
    Crit,
    /// +10 status chance
    Status,
}

/// How a match ended
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum MatchOutcome {
    PlayerWin,
    OpponentWin,
    Draw,
}

/// Fixed per-match stat block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    pub luk: f64,
    pub wis: f64,
    pub level: u32,
}

/// A weighted reel entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelOption<T> {
    pub label: T,
    pub weight: f64,
}

impl<T> ReelOption<T> {
    pub fn new(label: T, weight: f64) -> Self {
        Self { label, weight }
    }
}
