// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record, game and board metadata

use crate::Color;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Metadata of a game record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub record: RecordInfo,
    #[serde(default)]
    pub game: GameInfo,
    #[serde(default)]
    pub board: BoardInfo,
}

/// Information about the record file itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// Text format version (FF)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcriber: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A player of one color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl Player {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            name: None,
            rank: None,
            team: None,
        }
    }
}

/// Information about the game played
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub komi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handicap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub players: Vec<Player>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotator: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl GameInfo {
    pub fn player(&self, color: Color) -> Option<&Player> {
        self.players.iter().find(|p| p.color == color)
    }

    /// Player entry for `color`, created on first use
    pub fn player_mut(&mut self, color: Color) -> &mut Player {
        let index = match self.players.iter().position(|p| p.color == color) {
            Some(index) => index,
            None => {
                self.players.push(Player::new(color));
                self.players.len() - 1
            }
        };
        &mut self.players[index]
    }
}

/// How variations are shown by a viewer (ST)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationStyle {
    /// Show siblings of the current node rather than its children
    pub siblings: bool,
    /// Mark variations on the board
    pub markup: bool,
}

impl VariationStyle {
    pub fn from_flags(flags: u8) -> Self {
        Self {
            siblings: flags & 1 != 0,
            markup: flags & 2 == 0,
        }
    }

    pub fn flags(&self) -> u8 {
        (self.siblings as u8) | ((!self.markup as u8) << 1)
    }
}

/// Board dimensions and display flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardInfo {
    pub width: u8,
    pub height: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variations: Option<VariationStyle>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for BoardInfo {
    fn default() -> Self {
        Self {
            width: 19,
            height: 19,
            variations: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Free-text metadata fields addressable by their dotted path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoField {
    Application,
    Charset,
    Source,
    Copyright,
    Transcriber,
    GameName,
    Result,
    Event,
    Round,
    Place,
    Rules,
    TimeLimit,
    Overtime,
    Opening,
    GameComment,
    Annotator,
}

impl InfoField {
    pub const ALL: [InfoField; 16] = [
        InfoField::Application,
        InfoField::Charset,
        InfoField::Source,
        InfoField::Copyright,
        InfoField::Transcriber,
        InfoField::GameName,
        InfoField::Result,
        InfoField::Event,
        InfoField::Round,
        InfoField::Place,
        InfoField::Rules,
        InfoField::TimeLimit,
        InfoField::Overtime,
        InfoField::Opening,
        InfoField::GameComment,
        InfoField::Annotator,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            InfoField::Application => "record.application",
            InfoField::Charset => "record.charset",
            InfoField::Source => "record.source",
            InfoField::Copyright => "record.copyright",
            InfoField::Transcriber => "record.transcriber",
            InfoField::GameName => "game.name",
            InfoField::Result => "game.result",
            InfoField::Event => "game.event",
            InfoField::Round => "game.round",
            InfoField::Place => "game.place",
            InfoField::Rules => "game.rules",
            InfoField::TimeLimit => "game.timeLimit",
            InfoField::Overtime => "game.overtime",
            InfoField::Opening => "game.opening",
            InfoField::GameComment => "game.comment",
            InfoField::Annotator => "game.annotator",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.path() == path)
    }
}

impl Info {
    fn slot(&self, field: InfoField) -> &Option<String> {
        match field {
            InfoField::Application => &self.record.application,
            InfoField::Charset => &self.record.charset,
            InfoField::Source => &self.record.source,
            InfoField::Copyright => &self.record.copyright,
            InfoField::Transcriber => &self.record.transcriber,
            InfoField::GameName => &self.game.name,
            InfoField::Result => &self.game.result,
            InfoField::Event => &self.game.event,
            InfoField::Round => &self.game.round,
            InfoField::Place => &self.game.place,
            InfoField::Rules => &self.game.rules,
            InfoField::TimeLimit => &self.game.time_limit,
            InfoField::Overtime => &self.game.overtime,
            InfoField::Opening => &self.game.opening,
            InfoField::GameComment => &self.game.comment,
            InfoField::Annotator => &self.game.annotator,
        }
    }

    fn slot_mut(&mut self, field: InfoField) -> &mut Option<String> {
        match field {
            InfoField::Application => &mut self.record.application,
            InfoField::Charset => &mut self.record.charset,
            InfoField::Source => &mut self.record.source,
            InfoField::Copyright => &mut self.record.copyright,
            InfoField::Transcriber => &mut self.record.transcriber,
            InfoField::GameName => &mut self.game.name,
            InfoField::Result => &mut self.game.result,
            InfoField::Event => &mut self.game.event,
            InfoField::Round => &mut self.game.round,
            InfoField::Place => &mut self.game.place,
            InfoField::Rules => &mut self.game.rules,
            InfoField::TimeLimit => &mut self.game.time_limit,
            InfoField::Overtime => &mut self.game.overtime,
            InfoField::Opening => &mut self.game.opening,
            InfoField::GameComment => &mut self.game.comment,
            InfoField::Annotator => &mut self.game.annotator,
        }
    }

    pub fn text(&self, field: InfoField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set_text(&mut self, field: InfoField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Look up a free-text field by dotted path.
    ///
    /// Unknown paths are logged and yield `None`.
    pub fn get_path(&self, path: &str) -> Option<&str> {
        match InfoField::from_path(path) {
            Some(field) => self.text(field),
            None => {
                tracing::warn!("Unknown info property '{}'", path);
                None
            }
        }
    }

    /// Set a free-text field by dotted path, returning false for unknown paths
    pub fn set_path(&mut self, path: &str, value: impl Into<String>) -> bool {
        match InfoField::from_path(path) {
            Some(field) => {
                self.set_text(field, value);
                true
            }
            None => {
                tracing::warn!("Unknown info property '{}'", path);
                false
            }
        }
    }
}
