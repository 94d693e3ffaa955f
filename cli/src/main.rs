// SPDX-License-Identifier: MIT OR Apache-2.0

//! Kifu CLI - convert, inspect and score Go game records

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kifu_cli::OutputFormat;
use kifu_core::Coord;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "kifu", about = "Go game record tool", version)]
struct Args {
    /// JSON rules configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a record to another format
    Convert {
        input: PathBuf,
        /// Target format
        #[arg(long, value_enum)]
        to: OutputFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the board at a move
    Show {
        input: PathBuf,
        /// Move number (default: end of the main line)
        #[arg(long = "move")]
        move_number: Option<usize>,
    },
    /// Score the final position
    Score {
        input: PathBuf,
        /// Dead stone as x,y (0-indexed); marks its whole group
        #[arg(long, value_parser = kifu_cli::parse_point)]
        dead: Vec<Coord>,
    },
    /// Print a blank record dated today
    New {
        #[arg(long, default_value = "19")]
        size: u8,
        #[arg(long, value_enum, default_value = "sgf")]
        format: OutputFormat,
    },
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = kifu_cli::load_config(args.config.as_deref())?;

    match args.command {
        Command::Convert { input, to, output } => {
            let game = kifu_cli::load_game(config, &input)?;
            let text = kifu_cli::convert(&game, to)?;
            match output {
                Some(path) => {
                    fs::write(&path, text)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => println!("{}", text),
            }
        }
        Command::Show { input, move_number } => {
            let mut game = kifu_cli::load_game(config, &input)?;
            print!("{}", kifu_cli::show(&mut game, move_number)?);
        }
        Command::Score { input, dead } => {
            let mut game = kifu_cli::load_game(config, &input)?;
            print!("{}", kifu_cli::score(&mut game, &dead)?);
        }
        Command::New { size, format } => {
            let today = chrono::Local::now().date_naive();
            println!("{}", kifu_cli::new_record(config, size, format, today)?);
        }
    }

    Ok(())
}
