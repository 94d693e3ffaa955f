// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game rules and validation logic

use crate::config::{GameConfig, RepeatCheck};
use crate::position::Position;
use crate::{Color, Coord, PositionError};

/// Validates moves against a game history
pub struct RuleValidator<'a> {
    /// Positions reached so far, the last one being the current position
    history: &'a [Position],
    config: &'a GameConfig,
}

impl<'a> RuleValidator<'a> {
    /// Create a new rules validator.
    ///
    /// `history` must hold at least the current position as its last entry.
    pub fn new(history: &'a [Position], config: &'a GameConfig) -> Self {
        Self { history, config }
    }

    /// Check if a move is valid
    pub fn check_move(&self, coord: Coord, color: Color) -> Result<(), PositionError> {
        self.play(coord, color).map(|_| ())
    }

    /// Play a stone and return the resulting position.
    ///
    /// The current position is never modified.
    pub fn play(&self, coord: Coord, color: Color) -> Result<Position, PositionError> {
        let current = match self.history.last() {
            Some(position) => position,
            None => return Err(PositionError::OutOfBounds { coord, color }),
        };

        // Basic validation
        if !current.contains(coord) {
            return Err(PositionError::OutOfBounds { coord, color });
        }

        if current.has_stone(coord) {
            return Err(PositionError::AlreadyHasStone { coord, color });
        }

        // Create a new position with the move applied
        let mut next = current.clone_board();
        next.set(coord, Some(color));

        let captured = next.capture_adjacent(coord, Some(color));
        if !captured && !next.has_liberties(coord, Some(color)) {
            if !self.config.allow_suicide {
                tracing::debug!("Suicide rejected at {} for {}", coord, color);
                return Err(PositionError::Suicide { coord, color });
            }
            next.capture_group(coord, color);
        }

        if self.repeats(&next) {
            tracing::debug!("Repeating position rejected at {} for {}", coord, color);
            return Err(PositionError::Repeating { coord, color });
        }

        next.turn = color.opposite();
        Ok(next)
    }

    /// Position after `color` passes
    pub fn pass(&self, color: Color) -> Option<Position> {
        let mut next = self.history.last()?.clone_board();
        next.turn = color.opposite();
        Some(next)
    }

    /// Whether `candidate` recreates a forbidden earlier board
    fn repeats(&self, candidate: &Position) -> bool {
        match self.config.repeat_check {
            RepeatCheck::Off => false,
            RepeatCheck::Ko => {
                let len = self.history.len();
                len >= 2 && self.history[len - 2].is_same_as(candidate)
            }
            RepeatCheck::All => self.history.iter().any(|p| p.is_same_as(candidate)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_does_not_touch_current() {
        let history = vec![Position::new(9, 9)];
        let config = GameConfig::default();
        let validator = RuleValidator::new(&history, &config);
        let next = validator.play(Coord::new(4, 4), Color::Black).unwrap();
        assert_eq!(next.get(Coord::new(4, 4)), Some(Color::Black));
        assert_eq!(next.turn, Color::White);
        assert!(!history[0].has_stone(Coord::new(4, 4)));
    }

    #[test]
    fn pass_flips_turn() {
        let history = vec![Position::new(9, 9)];
        let config = GameConfig::default();
        let next = RuleValidator::new(&history, &config)
            .pass(Color::Black)
            .unwrap();
        assert_eq!(next.turn, Color::White);
    }
}
