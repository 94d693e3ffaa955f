// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kifu CLI - command implementations behind the `kifu` binary
//!
//! Every command returns its output as a string so it can be tested
//! without a terminal; `main` only prints.

#![deny(unsafe_code)]

pub mod render;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use kifu_core::format::sgf::MAX_BOARD_SIZE;
use kifu_core::format::template;
use kifu_core::{Color, Coord, Game, GameConfig, Scorer};
use std::fs;
use std::path::Path;

/// Output record format
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Smart Game Format text
    Sgf,
    /// JSON game tree
    Jgf,
}

/// Rules configuration from a JSON file, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    tracing::debug!("Loaded config {:?}", config);
    Ok(config)
}

/// Load a record file of any supported format
pub fn load_game(config: GameConfig, input: &Path) -> Result<Game> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read record {}", input.display()))?;
    let game = Game::from_data(config, &text)
        .with_context(|| format!("Failed to load record {}", input.display()))?;
    tracing::info!(
        "Loaded {} ({}x{}, {} nodes)",
        input.display(),
        game.info().board.width,
        game.info().board.height,
        game.tree().len()
    );
    Ok(game)
}

/// Parse a point given as `x,y` (0-indexed)
pub fn parse_point(value: &str) -> std::result::Result<Coord, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{}'", value))?;
    let x = x.trim().parse().map_err(|_| format!("invalid x in '{}'", value))?;
    let y = y.trim().parse().map_err(|_| format!("invalid y in '{}'", value))?;
    Ok(Coord::new(x, y))
}

/// Re-encode a loaded record
pub fn convert(game: &Game, to: OutputFormat) -> Result<String> {
    match to {
        OutputFormat::Sgf => Ok(game.to_sgf()),
        OutputFormat::Jgf => Ok(game.to_jgf().to_json_pretty()?),
    }
}

/// Board diagram at move `move_number`, or at the end of the line
pub fn show(game: &mut Game, move_number: Option<usize>) -> Result<String> {
    match move_number {
        Some(n) => {
            if !game.goto(n)? {
                bail!("Record has no move {}", n);
            }
        }
        None => game.last()?,
    }

    let position = game.position();
    let mut out = render::render_board(position);
    out.push_str(&format!(
        "Move {}, {} to play\nCaptures: black {}, white {}\n",
        game.path().move_number(),
        position.turn,
        game.get_capture_count(Color::Black),
        game.get_capture_count(Color::White),
    ));
    if let Some(comments) = &game.node().comments {
        out.push_str(comments);
        out.push('\n');
    }
    Ok(out)
}

/// Count the final position of the main line with `dead` groups removed
pub fn score(game: &mut Game, dead: &[Coord]) -> Result<String> {
    game.last()?;
    let mut scorer = Scorer::from_game(game);
    for coord in dead {
        if !scorer.mark(*coord) {
            return Err(anyhow!("No stone at {} to mark dead", coord));
        }
    }
    let score = scorer.calculate();

    let mut out = String::new();
    for (name, side) in [("Black", &score.black), ("White", &score.white)] {
        out.push_str(&format!(
            "{}: stones {}, territory {}, captures {}, komi {}, total {}\n",
            name, side.stones, side.territory, side.captures, side.komi, side.total
        ));
    }
    out.push_str(&format!("Result: {}\n", score));
    Ok(out)
}

/// Blank record of `size` stamped with `date`
pub fn new_record(
    config: GameConfig,
    size: u8,
    format: OutputFormat,
    date: NaiveDate,
) -> Result<String> {
    if size == 0 || size > MAX_BOARD_SIZE {
        bail!(
            "Invalid board size {}. Must be between 1 and {}.",
            size,
            MAX_BOARD_SIZE
        );
    }
    let mut game = Game::new(config);
    game.load_record(template::blank_record_dated(size, size, date))?;
    convert(&game, format)
}
