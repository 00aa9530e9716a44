//! PetJack: a push-17 card duel
//!
//! Aces count as a flat low value. The player may take one extra card (hand
//! cap of three) and the dealer draws while below 17. Winning the hand earns a
//! buff for the current round; losing it costs crit chance.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::error::{DuelError, DuelResult};
use crate::rng::DuelRng;

/// Most cards a player hand may hold
pub const PLAYER_HAND_CAP: usize = 3;
/// Dealer (and automated player) stands at or above this total
pub const STAND_THRESHOLD: u32 = 17;
pub const BUST_LIMIT: u32 = 21;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PetJackStage {
    PlayerTurn,
    DealerTurn,
    Result,
    BuffChoice,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PetJackOutcome {
    Player,
    Dealer,
    Push,
}

/// Sum of a hand; no soft aces
pub fn hand_total(hand: &[u8]) -> u32 {
    hand.iter().map(|&card| card as u32).sum()
}

fn draw_card(deck: &[u8], rng: &mut impl DuelRng) -> u8 {
    deck[rng.next_int(deck.len())]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetJack {
    pub player_hand: Vec<u8>,
    pub dealer_hand: Vec<u8>,
    pub stage: PetJackStage,
    pub outcome: Option<PetJackOutcome>,
}

impl PetJack {
    /// Deal player, player, dealer, dealer. `deck` must be non-empty.
    pub fn deal(deck: &[u8], rng: &mut impl DuelRng) -> Self {
        let p1 = draw_card(deck, rng);
        let p2 = draw_card(deck, rng);
        let d1 = draw_card(deck, rng);
        let d2 = draw_card(deck, rng);
        Self {
            player_hand: vec![p1, p2],
            dealer_hand: vec![d1, d2],
            stage: PetJackStage::PlayerTurn,
            outcome: None,
        }
    }

    pub fn player_total(&self) -> u32 {
        hand_total(&self.player_hand)
    }

    pub fn dealer_total(&self) -> u32 {
        hand_total(&self.dealer_hand)
    }

    fn expect_stage(&self, stage: PetJackStage) -> DuelResult<()> {
        if self.stage != stage {
            return Err(DuelError::WrongPetJackStage { stage: self.stage });
        }
        Ok(())
    }

    /// Take one card. Reaching 21 or more stands automatically and plays the
    /// dealer, in which case the outcome is returned.
    pub fn hit(&mut self, deck: &[u8], rng: &mut impl DuelRng) -> DuelResult<Option<PetJackOutcome>> {
        self.expect_stage(PetJackStage::PlayerTurn)?;
        if self.player_hand.len() >= PLAYER_HAND_CAP {
            return Err(DuelError::PetJackHandFull {
                cards: self.player_hand.len() as u8,
            });
        }
        self.player_hand.push(draw_card(deck, rng));
        if self.player_total() >= BUST_LIMIT {
            self.stage = PetJackStage::DealerTurn;
            return self.play_dealer(deck, rng).map(Some);
        }
        Ok(None)
    }

    /// End the player's turn and play the dealer out
    pub fn stand(&mut self, deck: &[u8], rng: &mut impl DuelRng) -> DuelResult<PetJackOutcome> {
        self.expect_stage(PetJackStage::PlayerTurn)?;
        self.stage = PetJackStage::DealerTurn;
        self.play_dealer(deck, rng)
    }

    /// Dealer draws while under the threshold, then the hand is scored
    pub fn play_dealer(&mut self, deck: &[u8], rng: &mut impl DuelRng) -> DuelResult<PetJackOutcome> {
        self.expect_stage(PetJackStage::DealerTurn)?;
        Ok(self.finish_dealer(deck, rng))
    }

    fn finish_dealer(&mut self, deck: &[u8], rng: &mut impl DuelRng) -> PetJackOutcome {
        self.stage = PetJackStage::DealerTurn;
        while self.dealer_total() < STAND_THRESHOLD {
            self.dealer_hand.push(draw_card(deck, rng));
        }

        let player = self.player_total();
        let dealer = self.dealer_total();
        let outcome = if player > BUST_LIMIT {
            PetJackOutcome::Dealer
        } else if dealer > BUST_LIMIT || player > dealer {
            PetJackOutcome::Player
        } else if player < dealer {
            PetJackOutcome::Dealer
        } else {
            PetJackOutcome::Push
        };

        self.outcome = Some(outcome);
        self.stage = match outcome {
            PetJackOutcome::Player => PetJackStage::BuffChoice,
            _ => PetJackStage::Result,
        };
        outcome
    }

    /// Non-interactive hand for the automated side: the player hand draws to
    /// the stand threshold, then the dealer plays.
    pub fn autoplay(deck: &[u8], rng: &mut impl DuelRng) -> Self {
        let mut game = Self::deal(deck, rng);
        while game.player_total() < STAND_THRESHOLD {
            game.player_hand.push(draw_card(deck, rng));
        }
        game.finish_dealer(deck, rng);
        game
    }
}
