// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board position: stones, turn and the stones captured reaching it

use crate::grid::{Grid, GridDiff, GridEntry};
use crate::{Color, Coord};

/// Stones removed from the board, by the color of the removed stone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    black: Vec<Coord>,
    white: Vec<Coord>,
}

impl Captures {
    /// Coordinates of captured stones of `color`
    pub fn of(&self, color: Color) -> &[Coord] {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn push(&mut self, color: Color, coord: Coord) {
        match color {
            Color::Black => self.black.push(coord),
            Color::White => self.white.push(coord),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }
}

/// One snapshot of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    stones: Grid<Option<Color>>,
    /// Color to move
    pub turn: Color,
    captures: Captures,
}

impl Position {
    /// Empty board with Black to move
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            stones: Grid::new(width, height, None),
            turn: Color::Black,
            captures: Captures::default(),
        }
    }

    pub fn width(&self) -> u8 {
        self.stones.width()
    }

    pub fn height(&self) -> u8 {
        self.stones.height()
    }

    pub fn stones(&self) -> &Grid<Option<Color>> {
        &self.stones
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.stones.contains(coord)
    }

    pub fn get(&self, coord: Coord) -> Option<Color> {
        *self.stones.get(coord)
    }

    /// Place or erase a stone without any rule checks
    pub fn set(&mut self, coord: Coord, stone: Option<Color>) -> bool {
        self.stones.set(coord, stone)
    }

    pub fn has_stone(&self, coord: Coord) -> bool {
        self.stones.has(coord)
    }

    /// Stones of `color` captured while reaching this position
    pub fn captures(&self, color: Color) -> &[Coord] {
        self.captures.of(color)
    }

    pub fn all_captures(&self) -> &Captures {
        &self.captures
    }

    /// Copy of the board and turn with empty capture lists.
    ///
    /// Captures belong to a single transition, so a successor position
    /// starts without any.
    pub fn clone_board(&self) -> Position {
        Position {
            stones: self.stones.clone(),
            turn: self.turn,
            captures: Captures::default(),
        }
    }

    /// Board equality, ignoring turn and captures
    pub fn is_same_as(&self, other: &Position) -> bool {
        self.stones.is_same_as(&other.stones)
    }

    /// Stones to add and remove to turn this position into `other`
    pub fn compare(&self, other: &Position) -> GridDiff<Color> {
        let diff = self.stones.compare(&other.stones);
        let keep = |entries: Vec<GridEntry<Option<Color>>>| {
            entries
                .into_iter()
                .filter_map(|e| {
                    e.value.map(|value| GridEntry {
                        x: e.x,
                        y: e.y,
                        value,
                    })
                })
                .collect()
        };
        GridDiff {
            add: keep(diff.add),
            remove: keep(diff.remove),
        }
    }

    /// Check whether the group of `group_color` containing `coord` touches
    /// an empty point.
    ///
    /// `group_color` defaults to the stone at `coord`; an empty point with
    /// no color given counts as having liberties.
    pub fn has_liberties(&self, coord: Coord, group_color: Option<Color>) -> bool {
        let color = match group_color.or_else(|| self.get(coord)) {
            Some(color) => color,
            None => return true,
        };
        if !self.contains(coord) {
            return false;
        }

        let mut visited = Grid::new(self.width(), self.height(), false);
        let mut stack = vec![coord];
        visited.set(coord, true);

        while let Some(current) = stack.pop() {
            for neighbor in self.stones.neighbors(current) {
                match self.get(neighbor) {
                    None => return true,
                    Some(c) if c == color && !*visited.get(neighbor) => {
                        visited.set(neighbor, true);
                        stack.push(neighbor);
                    }
                    _ => {}
                }
            }
        }

        false
    }

    /// Capture every neighboring enemy group left without liberties.
    ///
    /// `friendly_color` defaults to the stone at `coord`. Returns whether
    /// anything was captured.
    pub fn capture_adjacent(&mut self, coord: Coord, friendly_color: Option<Color>) -> bool {
        let friendly = match friendly_color.or_else(|| self.get(coord)) {
            Some(color) => color,
            None => return false,
        };
        let enemy = friendly.opposite();
        let mut captured = false;

        for neighbor in self.stones.neighbors(coord) {
            if self.can_capture(neighbor, Some(enemy), true) {
                captured = true;
            }
        }

        captured
    }

    /// Check whether the group at `coord` has no liberties, capturing it
    /// when `do_capture` is set.
    pub fn can_capture(&mut self, coord: Coord, enemy_color: Option<Color>, do_capture: bool) -> bool {
        let enemy = match enemy_color.or_else(|| self.get(coord)) {
            Some(color) => color,
            None => return false,
        };
        if self.get(coord) != Some(enemy) || self.has_liberties(coord, Some(enemy)) {
            return false;
        }
        if do_capture {
            self.capture_group(coord, enemy);
        }
        true
    }

    /// Remove every connected stone of `color` starting at `coord`
    pub fn capture_group(&mut self, coord: Coord, color: Color) -> usize {
        let mut removed = 0;
        let mut stack = vec![coord];

        while let Some(current) = stack.pop() {
            if self.get(current) != Some(color) {
                continue;
            }
            self.capture_stone(current);
            removed += 1;

            for neighbor in self.stones.neighbors(current) {
                if self.get(neighbor) == Some(color) {
                    stack.push(neighbor);
                }
            }
        }

        removed
    }

    /// Remove a single stone and record it as captured
    pub fn capture_stone(&mut self, coord: Coord) {
        if let Some(color) = self.get(coord) {
            self.stones.unset(coord);
            self.captures.push(color, coord);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_board_drops_captures() {
        let mut position = Position::new(5, 5);
        position.set(Coord::new(0, 0), Some(Color::White));
        position.capture_stone(Coord::new(0, 0));
        assert_eq!(position.captures(Color::White).len(), 1);

        let next = position.clone_board();
        assert!(next.all_captures().is_empty());
        assert!(next.is_same_as(&position));
    }

    #[test]
    fn corner_stone_liberties() {
        let mut position = Position::new(3, 3);
        position.set(Coord::new(0, 0), Some(Color::White));
        position.set(Coord::new(1, 0), Some(Color::Black));
        assert!(position.has_liberties(Coord::new(0, 0), None));
        position.set(Coord::new(0, 1), Some(Color::Black));
        assert!(!position.has_liberties(Coord::new(0, 0), None));
    }

    #[test]
    fn can_capture_without_removing() {
        let mut position = Position::new(3, 3);
        position.set(Coord::new(0, 0), Some(Color::White));
        position.set(Coord::new(1, 0), Some(Color::Black));
        position.set(Coord::new(0, 1), Some(Color::Black));
        assert!(position.can_capture(Coord::new(0, 0), None, false));
        assert_eq!(position.get(Coord::new(0, 0)), Some(Color::White));
        assert!(position.can_capture(Coord::new(0, 0), Some(Color::White), true));
        assert_eq!(position.get(Coord::new(0, 0)), None);
        assert_eq!(position.captures(Color::White), &[Coord::new(0, 0)]);
    }
}
