//! Weighted choice over labeled options
//!
//! Weights need not sum to anything in particular; they are normalized at
//! draw time. Used for the three reels.

use crate::error::ConfigError;
use crate::rng::DuelRng;
use crate::types::ReelOption;

/// A non-empty table of labels with non-negative weights
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    options: Vec<ReelOption<T>>,
}

impl<T: Copy + PartialEq> WeightedTable<T> {
    /// Build a table, rejecting empty tables and negative or non-finite weights.
    ///
    /// `name` only labels the error.
    pub fn new(name: &'static str, options: Vec<ReelOption<T>>) -> Result<Self, ConfigError> {
        if options.is_empty() {
            return Err(ConfigError::EmptyTable { table: name });
        }
        if let Some(bad) = options
            .iter()
            .find(|o| !o.weight.is_finite() || o.weight < 0.0)
        {
            return Err(ConfigError::InvalidWeight {
                table: name,
                weight: bad.weight,
            });
        }
        let table = Self { options };
        if table.total_weight() <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight { table: name });
        }
        Ok(table)
    }

    pub fn total_weight(&self) -> f64 {
        self.options.iter().map(|o| o.weight).sum()
    }

    /// Copy of this table with the weight of every label in `subset`
    /// multiplied by `factor`
    pub fn boosted(&self, subset: &[T], factor: f64) -> Self {
        let options = self
            .options
            .iter()
            .map(|o| {
                if subset.contains(&o.label) {
                    ReelOption::new(o.label, o.weight * factor)
                } else {
                    *o
                }
            })
            .collect();
        Self { options }
    }

    /// Draw one label. Consumes exactly one value from `rng`.
    pub fn pick(&self, rng: &mut impl DuelRng) -> T {
        let mut roll = rng.next_unit() * self.total_weight();
        for option in &self.options {
            roll -= option.weight;
            if roll <= 0.0 {
                return option.label;
            }
        }
        // Float drift left a sliver of roll unspent
        self.options[self.options.len() - 1].label
    }

    /// Probability of `label` under this table
    pub fn probability(&self, label: T) -> f64 {
        let weight: f64 = self
            .options
            .iter()
            .filter(|o| o.label == label)
            .map(|o| o.weight)
            .sum();
        weight / self.total_weight()
    }
}
