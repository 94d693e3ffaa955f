// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kifu Core - Go rules, game records and record formats
//!
//! This crate provides the core functionality of a Go record editor:
//! - a generic board grid and the position/rules engine
//! - the variation tree of a game record and compact paths into it
//! - a game controller that replays, navigates and edits records
//! - territory scoring with manual dead stone marking
//! - SGF, JGF (JSON tree) and GIB conversion

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod format;
pub mod game;
pub mod grid;
pub mod info;
pub mod path;
pub mod position;
pub mod rules;
pub mod scoring;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use config::{GameConfig, RepeatCheck};
pub use error::{DataError, Error, PositionError, PositionErrorKind};
pub use game::{Game, GameSnapshot, GotoTarget};
pub use grid::{Grid, GridDiff, GridEntry};
pub use info::Info;
pub use path::Path;
pub use position::Position;
pub use scoring::{Score, Scorer, ScoringMethod};
pub use tree::{GameTree, Markup, MarkupKind, Node, NodeId, SetupStone};

/// Player color in a Go game (Black or White)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Black player (traditionally goes first)
    #[serde(rename = "B")]
    Black,
    /// White player
    #[serde(rename = "W")]
    White,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single letter code used by the record formats
    pub fn code(&self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "B" | "b" => Some(Color::Black),
            "W" | "w" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Board coordinate representing a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column)
    pub x: u8,
    /// Y coordinate (row)
    pub y: u8,
}

impl Coord {
    /// Create a new coordinate
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Check if coordinate is valid for a board of given dimensions
    pub fn is_valid(&self, width: u8, height: u8) -> bool {
        self.x < width && self.y < height
    }

    /// Get adjacent (neighboring) coordinates in the four cardinal directions.
    ///
    /// Only the lower edge is clipped here; callers check the upper bound
    /// against their board dimensions.
    pub fn adjacent_coords(&self) -> Vec<Coord> {
        let mut neighbors = Vec::with_capacity(4);

        // Check north
        if self.y > 0 {
            neighbors.push(Coord::new(self.x, self.y - 1));
        }

        // Check east
        if self.x < u8::MAX {
            neighbors.push(Coord::new(self.x + 1, self.y));
        }

        // Check south
        if self.y < u8::MAX {
            neighbors.push(Coord::new(self.x, self.y + 1));
        }

        // Check west
        if self.x > 0 {
            neighbors.push(Coord::new(self.x - 1, self.y));
        }

        neighbors
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents a move stored in a game record node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Place a stone at the specified coordinate
    Place { x: u8, y: u8, color: Color },
    /// Pass the turn
    Pass { color: Color },
}

impl Move {
    /// The color making the move
    pub fn color(&self) -> Color {
        match self {
            Move::Place { color, .. } | Move::Pass { color } => *color,
        }
    }

    /// The coordinate of a placement, `None` for a pass
    pub fn coord(&self) -> Option<Coord> {
        match self {
            Move::Place { x, y, .. } => Some(Coord::new(*x, *y)),
            Move::Pass { .. } => None,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_coords_clip_at_origin() {
        let corner = Coord::new(0, 0).adjacent_coords();
        assert_eq!(corner, vec![Coord::new(1, 0), Coord::new(0, 1)]);
        assert_eq!(Coord::new(3, 3).adjacent_coords().len(), 4);
    }

    #[test]
    fn color_codes() {
        assert_eq!(Color::from_code("B"), Some(Color::Black));
        assert_eq!(Color::from_code(" w "), Some(Color::White));
        assert_eq!(Color::from_code("x"), None);
        assert_eq!(Color::White.opposite().code(), "B");
    }
}
