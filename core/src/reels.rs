//! Reel engine: the 3x3 action/element/modifier grid
//!
//! A grid carries two single-use privileges, a lock and a respin. They are
//! mutually exclusive: once a lock is held no column can be respun, and once
//! a column has been respun no cell can be locked.

use serde::{Deserialize, Serialize};

use crate::config::ReelTables;
use crate::error::{ConfigError, DuelError, DuelResult};
use crate::rng::DuelRng;
use crate::types::{Action, Column, ComboRow, Element, Modifier, GRID_SIZE};
use crate::weighted::WeightedTable;

/// A pinned (row, column) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRef {
    pub row: usize,
    pub column: Column,
}

/// Effect of a lock toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockChange {
    Locked(CellRef),
    Cleared(CellRef),
}

/// One side's grid for the current round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGrid {
    pub actions: [Action; GRID_SIZE],
    pub elements: [Element; GRID_SIZE],
    pub modifiers: [Modifier; GRID_SIZE],
    pub locked_cell: Option<CellRef>,
    pub lock_used: bool,
    pub respin_used: bool,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            actions: [Action::Strike; GRID_SIZE],
            elements: [Element::Flame, Element::Aqua, Element::Terra],
            modifiers: [Modifier::Times1; GRID_SIZE],
            locked_cell: None,
            lock_used: false,
            respin_used: false,
        }
    }
}

impl SlotGrid {
    /// The three rows as combos. Always derived, never stored.
    pub fn combos(&self) -> [ComboRow; GRID_SIZE] {
        core::array::from_fn(|row| self.combo(row))
    }

    /// Combo at `row`; callers guarantee `row < GRID_SIZE`
    pub fn combo(&self, row: usize) -> ComboRow {
        ComboRow {
            action: self.actions[row],
            element: self.elements[row],
            modifier: self.modifiers[row],
        }
    }

    fn is_locked(&self, row: usize, column: Column) -> bool {
        self.locked_cell == Some(CellRef { row, column })
    }

    /// Whether the respin privilege is still available
    pub fn can_respin(&self) -> bool {
        !self.lock_used && !self.respin_used
    }

    /// Pin a cell, or release it when the same cell is toggled again.
    ///
    /// Releasing restores the lock budget.
    pub fn toggle_lock(&mut self, row: usize, column: usize) -> DuelResult<LockChange> {
        let column_kind = match Column::from_index(column) {
            Some(c) if row < GRID_SIZE => c,
            _ => {
                return Err(DuelError::InvalidCell {
                    row: row.min(u8::MAX as usize) as u8,
                    column: column.min(u8::MAX as usize) as u8,
                })
            }
        };
        if self.respin_used {
            return Err(DuelError::LockAfterRespin);
        }
        let cell = CellRef {
            row,
            column: column_kind,
        };
        if self.lock_used {
            if self.locked_cell == Some(cell) {
                self.locked_cell = None;
                self.lock_used = false;
                return Ok(LockChange::Cleared(cell));
            }
            return Err(DuelError::LockAlreadyUsed);
        }
        self.locked_cell = Some(cell);
        self.lock_used = true;
        Ok(LockChange::Locked(cell))
    }
}

/// Compiled reel tables
#[derive(Debug, Clone, PartialEq)]
pub struct ReelSet {
    actions: WeightedTable<Action>,
    elements: WeightedTable<Element>,
    modifiers: WeightedTable<Modifier>,
    boosted_modifiers: WeightedTable<Modifier>,
    boost_threshold: u32,
}

impl ReelSet {
    pub fn from_tables(tables: &ReelTables) -> Result<Self, ConfigError> {
        let actions = WeightedTable::new("action", tables.actions.clone())?;
        let elements = WeightedTable::new("element", tables.elements.clone())?;
        let modifiers = WeightedTable::new("modifier", tables.modifiers.clone())?;
        let boosted_modifiers = modifiers.boosted(&tables.boosted_modifiers, 2.0);
        Ok(Self {
            actions,
            elements,
            modifiers,
            boosted_modifiers,
            boost_threshold: tables.boost_threshold,
        })
    }

    pub fn actions(&self) -> &WeightedTable<Action> {
        &self.actions
    }

    pub fn elements(&self) -> &WeightedTable<Element> {
        &self.elements
    }

    /// Modifier table in effect for `bet`
    pub fn modifiers_for_bet(&self, bet: u32) -> &WeightedTable<Modifier> {
        if bet >= self.boost_threshold {
            &self.boosted_modifiers
        } else {
            &self.modifiers
        }
    }

    fn spin_column<T: Copy + PartialEq>(
        table: &WeightedTable<T>,
        rng: &mut impl DuelRng,
    ) -> [T; GRID_SIZE] {
        let first = table.pick(rng);
        let second = table.pick(rng);
        let third = table.pick(rng);
        [first, second, third]
    }

    /// Full spin. Draws all nine cells (actions, then elements, then
    /// modifiers) and keeps the locked cell of `previous` untouched.
    pub fn spin(&self, rng: &mut impl DuelRng, bet: u32, previous: Option<&SlotGrid>) -> SlotGrid {
        let mut grid = previous.cloned().unwrap_or_default();

        let actions = Self::spin_column(&self.actions, rng);
        let elements = Self::spin_column(&self.elements, rng);
        let modifiers = Self::spin_column(self.modifiers_for_bet(bet), rng);

        for row in 0..GRID_SIZE {
            if !grid.is_locked(row, Column::Action) {
                grid.actions[row] = actions[row];
            }
            if !grid.is_locked(row, Column::Element) {
                grid.elements[row] = elements[row];
            }
            if !grid.is_locked(row, Column::Modifier) {
                grid.modifiers[row] = modifiers[row];
            }
        }
        grid
    }

    /// Redraw one column of `current` without checking privileges. The
    /// result is marked as respun. Used directly for opponent trials.
    pub fn respin_unchecked(
        &self,
        rng: &mut impl DuelRng,
        bet: u32,
        column: Column,
        current: &SlotGrid,
    ) -> SlotGrid {
        let mut grid = current.clone();
        grid.respin_used = true;

        match column {
            Column::Action => {
                let drawn = Self::spin_column(&self.actions, rng);
                for (row, value) in drawn.into_iter().enumerate() {
                    if !grid.is_locked(row, column) {
                        grid.actions[row] = value;
                    }
                }
            }
            Column::Element => {
                let drawn = Self::spin_column(&self.elements, rng);
                for (row, value) in drawn.into_iter().enumerate() {
                    if !grid.is_locked(row, column) {
                        grid.elements[row] = value;
                    }
                }
            }
            Column::Modifier => {
                let drawn = Self::spin_column(self.modifiers_for_bet(bet), rng);
                for (row, value) in drawn.into_iter().enumerate() {
                    if !grid.is_locked(row, column) {
                        grid.modifiers[row] = value;
                    }
                }
            }
        }
        grid
    }

    /// Player-facing respin: refuses once the lock or respin privilege is spent
    pub fn respin(
        &self,
        rng: &mut impl DuelRng,
        bet: u32,
        column: Column,
        current: &SlotGrid,
    ) -> DuelResult<SlotGrid> {
        if !current.can_respin() {
            return Err(DuelError::RespinUnavailable { column });
        }
        Ok(self.respin_unchecked(rng, bet, column, current))
    }
}
