// SPDX-License-Identifier: MIT OR Apache-2.0

//! End of game counting with manual dead stone marking

use crate::game::Game;
use crate::grid::Grid;
use crate::position::Position;
use crate::{Color, Coord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counting method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringMethod {
    /// Territory plus captures (Japanese style)
    #[default]
    Territory,
    /// Stones on the board plus territory (Chinese style)
    Area,
}

/// Classification of one point after region growing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCell {
    /// A living stone
    Stone(Color),
    /// Not reached by either color
    Empty,
    /// Territory of a color
    Candidate(Color),
    /// Reached by both colors
    Neutral,
}

/// Points of one color
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub stones: usize,
    pub territory: usize,
    pub captures: usize,
    pub komi: f64,
    pub total: f64,
}

/// Result of a count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub black: ScoreBreakdown,
    pub white: ScoreBreakdown,
    pub method: ScoringMethod,
}

impl Score {
    /// Black's total minus White's
    pub fn margin(&self) -> f64 {
        self.black.total - self.white.total
    }

    pub fn winner(&self) -> Option<Color> {
        let margin = self.margin();
        if margin > 0.0 {
            Some(Color::Black)
        } else if margin < 0.0 {
            Some(Color::White)
        } else {
            None
        }
    }

    /// Result in record notation, e.g. `B+3.5`
    pub fn result(&self) -> String {
        match self.winner() {
            Some(color) => format!("{}+{}", color.code(), self.margin().abs()),
            None => "0".to_string(),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result())
    }
}

/// Territory counter over a working copy of a position
#[derive(Debug, Clone)]
pub struct Scorer {
    stones: Grid<Option<Color>>,
    dead: Grid<bool>,
    komi: f64,
    method: ScoringMethod,
    black_captures: usize,
    white_captures: usize,
    cells: Grid<ScoreCell>,
}

impl Scorer {
    pub fn new(position: &Position, komi: f64, method: ScoringMethod) -> Self {
        let (width, height) = (position.width(), position.height());
        Self {
            stones: position.stones().clone(),
            dead: Grid::new(width, height, false),
            komi,
            method,
            black_captures: 0,
            white_captures: 0,
            cells: Grid::new(width, height, ScoreCell::Empty),
        }
    }

    /// Prisoners taken during play by each color
    pub fn with_captures(mut self, black: usize, white: usize) -> Self {
        self.black_captures = black;
        self.white_captures = white;
        self
    }

    /// Scorer for the current position of `game`
    pub fn from_game(game: &Game) -> Self {
        Self::new(game.position(), game.get_komi(), game.config().scoring).with_captures(
            game.get_capture_count(Color::Black),
            game.get_capture_count(Color::White),
        )
    }

    /// Toggle the connected group at `coord` between dead and alive.
    /// Returns false for an empty point.
    pub fn mark(&mut self, coord: Coord) -> bool {
        let color = match *self.stones.get(coord) {
            Some(color) => color,
            None => return false,
        };
        let dead = !*self.dead.get(coord);

        let mut visited = Grid::new(self.stones.width(), self.stones.height(), false);
        let mut stack = vec![coord];
        visited.set(coord, true);
        while let Some(current) = stack.pop() {
            self.dead.set(current, dead);
            for neighbor in self.stones.neighbors(current) {
                if *self.stones.get(neighbor) == Some(color) && !*visited.get(neighbor) {
                    visited.set(neighbor, true);
                    stack.push(neighbor);
                }
            }
        }

        tracing::debug!(
            "Marked {} group at {} as {}",
            color,
            coord,
            if dead { "dead" } else { "alive" }
        );
        true
    }

    pub fn is_dead(&self, coord: Coord) -> bool {
        *self.dead.get(coord)
    }

    /// Classification from the last `calculate`
    pub fn cells(&self) -> &Grid<ScoreCell> {
        &self.cells
    }

    /// Grow territory from the living stones until nothing changes
    fn grow(&self) -> Grid<ScoreCell> {
        let (width, height) = (self.stones.width(), self.stones.height());
        let mut cells = Grid::new(width, height, ScoreCell::Empty);
        for x in 0..width {
            for y in 0..height {
                let coord = Coord::new(x, y);
                if let Some(color) = *self.stones.get(coord) {
                    if !*self.dead.get(coord) {
                        cells.set(coord, ScoreCell::Stone(color));
                    }
                }
            }
        }

        loop {
            let mut changed = false;
            for x in 0..width {
                for y in 0..height {
                    let coord = Coord::new(x, y);
                    let cell = *cells.get(coord);
                    let next = Self::step(&cells, coord, cell);
                    if next != cell {
                        cells.set(coord, next);
                        changed = true;
                    }
                }
            }
            if !changed {
                return cells;
            }
        }
    }

    /// Next state of one cell. States only move forward
    /// (empty, then candidate, then neutral), so growth reaches a fixed point.
    fn step(cells: &Grid<ScoreCell>, coord: Coord, cell: ScoreCell) -> ScoreCell {
        let mut black = false;
        let mut white = false;
        let mut neutral = false;
        for neighbor in cells.neighbors(coord) {
            match *cells.get(neighbor) {
                ScoreCell::Stone(Color::Black) | ScoreCell::Candidate(Color::Black) => black = true,
                ScoreCell::Stone(Color::White) | ScoreCell::Candidate(Color::White) => white = true,
                ScoreCell::Neutral => neutral = true,
                ScoreCell::Empty => {}
            }
        }

        match cell {
            ScoreCell::Stone(_) | ScoreCell::Neutral => cell,
            ScoreCell::Empty => {
                if neutral || (black && white) {
                    ScoreCell::Neutral
                } else if black {
                    ScoreCell::Candidate(Color::Black)
                } else if white {
                    ScoreCell::Candidate(Color::White)
                } else {
                    ScoreCell::Empty
                }
            }
            ScoreCell::Candidate(color) => {
                let opposed = match color {
                    Color::Black => white,
                    Color::White => black,
                };
                if neutral || opposed {
                    ScoreCell::Neutral
                } else {
                    cell
                }
            }
        }
    }

    /// Count the position
    pub fn calculate(&mut self) -> Score {
        self.cells = self.grow();

        let mut black = ScoreBreakdown {
            captures: self.black_captures,
            ..ScoreBreakdown::default()
        };
        let mut white = ScoreBreakdown {
            captures: self.white_captures,
            ..ScoreBreakdown::default()
        };

        for x in 0..self.cells.width() {
            for y in 0..self.cells.height() {
                let coord = Coord::new(x, y);
                match *self.cells.get(coord) {
                    ScoreCell::Stone(Color::Black) => black.stones += 1,
                    ScoreCell::Stone(Color::White) => white.stones += 1,
                    ScoreCell::Candidate(owner) => {
                        let side = match owner {
                            Color::Black => &mut black,
                            Color::White => &mut white,
                        };
                        side.territory += 1;
                        // Dead stones of the opponent inside territory are prisoners
                        if *self.stones.get(coord) == Some(owner.opposite()) {
                            side.captures += 1;
                        }
                    }
                    ScoreCell::Empty | ScoreCell::Neutral => {}
                }
            }
        }

        if self.komi < 0.0 {
            black.komi = -self.komi;
        } else {
            white.komi = self.komi;
        }

        for side in [&mut black, &mut white] {
            side.total = match self.method {
                ScoringMethod::Territory => side.territory as f64 + side.captures as f64 + side.komi,
                ScoringMethod::Area => side.stones as f64 + side.territory as f64 + side.komi,
            };
        }

        Score {
            black,
            white,
            method: self.method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(size: u8, x: u8, color: Color) -> Position {
        let mut position = Position::new(size, size);
        for y in 0..size {
            position.set(Coord::new(x, y), Some(color));
        }
        position
    }

    #[test]
    fn single_wall_owns_the_board() {
        let position = wall(5, 2, Color::Black);
        let score = Scorer::new(&position, 0.0, ScoringMethod::Territory).calculate();
        assert_eq!(score.black.territory, 20);
        assert_eq!(score.white.territory, 0);
        assert_eq!(score.winner(), Some(Color::Black));
    }

    #[test]
    fn empty_board_has_no_territory() {
        let position = Position::new(9, 9);
        let mut scorer = Scorer::new(&position, 6.5, ScoringMethod::Territory);
        let score = scorer.calculate();
        assert_eq!(score.black.territory + score.white.territory, 0);
        assert_eq!(*scorer.cells().get(Coord::new(4, 4)), ScoreCell::Empty);
        assert_eq!(score.result(), "W+6.5");
    }

    #[test]
    fn negative_komi_goes_to_black() {
        let position = Position::new(5, 5);
        let score = Scorer::new(&position, -2.0, ScoringMethod::Area).calculate();
        assert_eq!(score.black.komi, 2.0);
        assert_eq!(score.white.komi, 0.0);
    }
}
