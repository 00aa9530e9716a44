//! Elemental advantage cycle
//!
//! Elements form a closed cycle: every chain element beats the next one and
//! is beaten by the previous one. `Void` and `Wild` sit outside the chain and
//! always resolve neutral.

use crate::config::DuelConfig;
use crate::types::Element;

#[derive(Debug, Clone, PartialEq)]
pub struct ElementChain {
    order: Vec<Element>,
    advantage: f64,
    disadvantage: f64,
    neutral: f64,
}

impl ElementChain {
    pub fn from_config(config: &DuelConfig) -> Self {
        Self {
            order: config.element_chain.clone(),
            advantage: config.advantage_multiplier,
            disadvantage: config.disadvantage_multiplier,
            neutral: config.neutral_multiplier,
        }
    }

    pub fn order(&self) -> &[Element] {
        &self.order
    }

    pub fn advantage_multiplier(&self) -> f64 {
        self.advantage
    }

    pub fn neutral_multiplier(&self) -> f64 {
        self.neutral
    }

    fn position(&self, element: Element) -> Option<usize> {
        self.order.iter().position(|&e| e == element)
    }

    /// The element `element` beats
    pub fn advantage_target(&self, element: Element) -> Option<Element> {
        let i = self.position(element)?;
        Some(self.order[(i + 1) % self.order.len()])
    }

    /// The element that beats `element`
    pub fn disadvantage_target(&self, element: Element) -> Option<Element> {
        let len = self.order.len();
        let i = self.position(element)?;
        Some(self.order[(i + len - 1) % len])
    }

    /// Damage multiplier for `attacker` hitting a defender whose last used
    /// element was `defender`
    pub fn multiplier(&self, attacker: Element, defender: Option<Element>) -> f64 {
        let defender = match defender {
            Some(Element::Wild) | None => return self.neutral,
            Some(d) => d,
        };
        if attacker == Element::Wild {
            return self.neutral;
        }
        if self.advantage_target(attacker) == Some(defender) {
            return self.advantage;
        }
        if self.disadvantage_target(attacker) == Some(defender) {
            return self.disadvantage;
        }
        self.neutral
    }

    /// Element a Wild action takes so that it holds the advantage over
    /// `defender`. Falls back to `Void` when there is nothing to exploit.
    pub fn choose_wild_element(&self, defender: Option<Element>) -> Element {
        defender
            .and_then(|d| self.disadvantage_target(d))
            .unwrap_or(Element::Void)
    }
}
