// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule configuration for a game

use crate::scoring::ScoringMethod;
use serde::{Deserialize, Serialize};

/// Which earlier positions a move may not recreate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RepeatCheck {
    /// No repetition checking
    #[serde(rename = "NONE")]
    Off,
    /// Only the position two plies back (simple ko)
    #[default]
    #[serde(rename = "KO")]
    Ko,
    /// Every position in the history (positional superko)
    #[serde(rename = "ALL")]
    All,
}

/// Rules applied by the game controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Allow moves that leave the mover's own group without liberties.
    /// When allowed, the suicided group is captured.
    pub allow_suicide: bool,

    /// Repetition rule
    pub repeat_check: RepeatCheck,

    /// Size of the blank board used when no record is loaded
    pub board_size: u8,

    /// Counting method used by the scorer
    pub scoring: ScoringMethod,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            allow_suicide: false,
            repeat_check: RepeatCheck::Ko,
            board_size: 19,
            scoring: ScoringMethod::Territory,
        }
    }
}

impl GameConfig {
    /// Suicide allowed and no repetition check, useful for problem editing
    pub fn relaxed() -> Self {
        Self {
            allow_suicide: true,
            repeat_check: RepeatCheck::Off,
            ..Self::default()
        }
    }

    /// Positional superko
    pub fn superko() -> Self {
        Self {
            repeat_check: RepeatCheck::All,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"repeat_check":"ALL"}"#).unwrap();
        assert_eq!(config.repeat_check, RepeatCheck::All);
        assert!(!config.allow_suicide);
        assert_eq!(config.board_size, 19);
    }

    #[test]
    fn repeat_check_names() {
        let json = serde_json::to_string(&GameConfig::relaxed()).unwrap();
        assert!(json.contains("\"repeat_check\":\"NONE\""));
        assert!(json.contains("\"allow_suicide\":true"));
    }
}
