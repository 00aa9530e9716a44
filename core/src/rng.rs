//! Deterministic RNG for duel resolution
//!
//! Every draw in the engine goes through [`DuelRng`]. The production source is
//! [`LcgRng`], a 32-bit linear congruential generator whose whole state is a
//! single `u32`, so a match can be serialized and resumed without losing its
//! place in the sequence.

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// 2^32 as a float, used to map a `u32` draw into `[0, 1)`.
const U32_RANGE: f64 = 4_294_967_296.0;

/// Trait for random number generation in duels
pub trait DuelRng {
    /// Advance the generator and return the new raw state
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)`
    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / U32_RANGE
    }

    /// Uniform integer in `[0, max)`; `max == 0` yields 0
    fn next_int(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        ((self.next_unit() * max as f64).floor() as usize).min(max - 1)
    }

    /// Percentage roll in `[0, 100)`, compared against clamped chances
    fn roll_percent(&mut self) -> f64 {
        self.next_unit() * 100.0
    }
}

/// Numerical Recipes LCG - one multiply, one add, wrapping at 2^32.
///
/// The same seed will always produce the same sequence. Every seed value is
/// valid, including 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct LcgRng {
    state: u32,
}

impl LcgRng {
    pub const MULTIPLIER: u32 = 1_664_525;
    pub const INCREMENT: u32 = 1_013_904_223;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Overwrite the state unconditionally
    pub fn set_seed(&mut self, seed: u32) {
        self.state = seed;
    }

    /// Current raw state (the seed the next draw advances from)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl DuelRng for LcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }
}

/// Convert an arbitrary float seed: truncate
/// toward zero, then wrap modulo 2^32. Callers must reject non-finite values.
pub fn seed_from_f64(value: f64) -> u32 {
    value.trunc().rem_euclid(U32_RANGE) as u32
}
