// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compact location in a game tree

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A location in the tree: the number of nodes advanced from the root
/// plus the child index chosen at every point where a non-default
/// (non-zero) child was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    #[serde(rename = "m")]
    move_number: usize,
    #[serde(rename = "v", default, skip_serializing_if = "BTreeMap::is_empty")]
    variations: BTreeMap<usize, usize>,
}

impl Path {
    /// Path pointing at the root
    pub fn new() -> Self {
        Self::default()
    }

    /// Path following the default branch to `move_number`
    pub fn at(move_number: usize) -> Self {
        Self {
            move_number,
            variations: BTreeMap::new(),
        }
    }

    pub fn move_number(&self) -> usize {
        self.move_number
    }

    /// Count of recorded non-default branch choices
    pub fn branches(&self) -> usize {
        self.variations.len()
    }

    /// Recorded choices as `(move number, child index)` pairs
    pub fn variations(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.variations.iter().map(|(m, i)| (*m, *i))
    }

    /// Step into child `child_index`
    pub fn advance(&mut self, child_index: usize) {
        self.move_number += 1;
        if child_index > 0 {
            self.variations.insert(self.move_number, child_index);
        }
    }

    /// Step back to the parent, forgetting the choice made at this move
    pub fn retreat(&mut self) {
        self.variations.remove(&self.move_number);
        self.move_number = self.move_number.saturating_sub(1);
    }

    /// Retarget to `move_number`. Moving backwards drops the choices
    /// recorded beyond the target.
    pub fn set_move(&mut self, move_number: usize) {
        if move_number < self.move_number {
            self.variations.retain(|m, _| *m <= move_number);
        }
        self.move_number = move_number;
    }

    /// Child index chosen at `move_number`, 0 when none was recorded
    pub fn node_at(&self, move_number: usize) -> usize {
        self.variations.get(&move_number).copied().unwrap_or(0)
    }

    /// Equal move number, branch count and recorded choices
    pub fn compare(&self, other: &Path) -> bool {
        self.move_number == other.move_number
            && self.branches() == other.branches()
            && self.variations == other.variations
    }
}
