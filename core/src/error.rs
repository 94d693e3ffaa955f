// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for rule violations and record loading

use crate::{Color, Coord};
use thiserror::Error;

/// Rule violations raised while validating or replaying a move.
///
/// These are recoverable: the game controller leaves its tree pointer,
/// path and history untouched before returning one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    /// The coordinate is outside the board
    #[error("{color} move at {coord} is outside the board")]
    OutOfBounds { coord: Coord, color: Color },

    /// The position is already occupied
    #[error("{color} move at {coord}: point already has a stone")]
    AlreadyHasStone { coord: Coord, color: Color },

    /// The move would leave the mover's group without liberties
    #[error("{color} move at {coord} would be suicide")]
    Suicide { coord: Coord, color: Color },

    /// The move recreates an earlier board position
    #[error("{color} move at {coord} repeats a previous position")]
    Repeating { coord: Coord, color: Color },
}

/// Reason code of a [`PositionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionErrorKind {
    OutOfBounds,
    AlreadyHasStone,
    Suicide,
    Repeating,
}

impl PositionErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            PositionErrorKind::OutOfBounds => "OUT_OF_BOUNDS",
            PositionErrorKind::AlreadyHasStone => "ALREADY_HAS_STONE",
            PositionErrorKind::Suicide => "SUICIDE",
            PositionErrorKind::Repeating => "REPEATING",
        }
    }
}

impl PositionError {
    pub fn kind(&self) -> PositionErrorKind {
        match self {
            PositionError::OutOfBounds { .. } => PositionErrorKind::OutOfBounds,
            PositionError::AlreadyHasStone { .. } => PositionErrorKind::AlreadyHasStone,
            PositionError::Suicide { .. } => PositionErrorKind::Suicide,
            PositionError::Repeating { .. } => PositionErrorKind::Repeating,
        }
    }

    /// The attempted coordinate
    pub fn coord(&self) -> Coord {
        match self {
            PositionError::OutOfBounds { coord, .. }
            | PositionError::AlreadyHasStone { coord, .. }
            | PositionError::Suicide { coord, .. }
            | PositionError::Repeating { coord, .. } => *coord,
        }
    }

    /// The color that attempted the move
    pub fn color(&self) -> Color {
        match self {
            PositionError::OutOfBounds { color, .. }
            | PositionError::AlreadyHasStone { color, .. }
            | PositionError::Suicide { color, .. }
            | PositionError::Repeating { color, .. } => *color,
        }
    }
}

/// Errors raised while loading a game record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Nothing to load
    #[error("no record data supplied")]
    NoData,

    /// The data does not look like any supported record format
    #[error("unrecognized record format")]
    UnknownFormat,

    /// The JSON tree could not be decoded
    #[error("malformed JGF record: {0}")]
    MalformedJgf(String),

    /// The SGF text could not be tokenized or is structurally invalid
    #[error("malformed SGF record: {0}")]
    MalformedSgf(String),

    /// The GIB text is missing its sections or contains invalid move lines
    #[error("malformed GIB record: {0}")]
    MalformedGib(String),
}

impl DataError {
    pub fn code(&self) -> &'static str {
        match self {
            DataError::NoData => "NO_DATA",
            DataError::UnknownFormat => "UNKNOWN_FORMAT",
            DataError::MalformedJgf(_) => "JGF_ERROR",
            DataError::MalformedSgf(_) => "SGF_ERROR",
            DataError::MalformedGib(_) => "GIB_ERROR",
        }
    }
}

/// Any error raised by the game controller
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Data(#[from] DataError),
}
