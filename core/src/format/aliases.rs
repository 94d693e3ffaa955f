// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property code aliases shared by both conversion directions
//!
//! Every SGF property with a JGF counterpart is listed here with the
//! dotted path of the field it maps to. Properties whose values need
//! structural conversion (moves, point lists, numbers) are handled by the
//! converters; the remaining ones are free-text [`InfoField`]s.

use crate::info::InfoField;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `(property code, dotted JGF path)` pairs, in emission order
pub const PROPERTY_ALIASES: &[(&str, &str)] = &[
    ("FF", "record.version"),
    ("GM", "game.type"),
    ("CA", "record.charset"),
    ("AP", "record.application"),
    ("SZ", "board.size"),
    ("ST", "board.variations"),
    ("KM", "game.komi"),
    ("HA", "game.handicap"),
    ("PB", "game.players.B.name"),
    ("BR", "game.players.B.rank"),
    ("BT", "game.players.B.team"),
    ("PW", "game.players.W.name"),
    ("WR", "game.players.W.rank"),
    ("WT", "game.players.W.team"),
    ("DT", "game.dates"),
    ("GN", "game.name"),
    ("RE", "game.result"),
    ("EV", "game.event"),
    ("RO", "game.round"),
    ("PC", "game.place"),
    ("RU", "game.rules"),
    ("TM", "game.timeLimit"),
    ("OT", "game.overtime"),
    ("ON", "game.opening"),
    ("GC", "game.comment"),
    ("AN", "game.annotator"),
    ("SO", "record.source"),
    ("CP", "record.copyright"),
    ("US", "record.transcriber"),
    ("N", "name"),
    ("C", "comments"),
    ("PL", "turn"),
    ("B", "move.B"),
    ("W", "move.W"),
    ("AB", "setup.B"),
    ("AW", "setup.W"),
    ("AE", "setup.E"),
    ("TB", "territory.B"),
    ("TW", "territory.W"),
    ("CR", "markup.circle"),
    ("SQ", "markup.square"),
    ("TR", "markup.triangle"),
    ("MA", "markup.cross"),
    ("SL", "markup.selected"),
    ("LB", "markup.label"),
];

static BY_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| PROPERTY_ALIASES.iter().copied().collect());

static BY_PATH: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    PROPERTY_ALIASES
        .iter()
        .map(|(code, path)| (*path, *code))
        .collect()
});

/// Dotted JGF path for a property code
pub fn path_for(code: &str) -> Option<&'static str> {
    BY_CODE.get(code).copied()
}

/// Property code for a dotted JGF path
pub fn code_for(path: &str) -> Option<&'static str> {
    BY_PATH.get(path).copied()
}

/// Free-text info field aliased by `code`
pub fn info_field_for(code: &str) -> Option<InfoField> {
    path_for(code).and_then(InfoField::from_path)
}

/// True for well-formed property identifiers (`[A-Z]+`)
pub fn is_property_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_uppercase())
}
