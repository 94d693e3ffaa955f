// SPDX-License-Identifier: MIT OR Apache-2.0

//! GIB records, the legacy text format of some online Go servers
//!
//! A GIB file has a header section (`\HS` .. `\HE`) of `\[KEY=value\]`
//! lines and a game section (`\GS` .. `\GE`) whose `INI` line carries the
//! handicap and whose `STO` lines are the moves. Boards are always 19x19.

use super::jgf::{JgfEntry, JgfMove, JgfNode, JgfRecord, JgfStones};
use crate::info::Info;
use crate::{Color, DataError};
use chrono::NaiveDate;

const BOARD_SIZE: u8 = 19;

/// Handicap stone points for 19x19, in placement order.
/// Each handicap count takes a fixed selection of them.
const STAR_POINTS: [[u8; 2]; 9] = [
    [15, 3],
    [3, 15],
    [15, 15],
    [3, 3],
    [9, 9],
    [3, 9],
    [15, 9],
    [9, 3],
    [9, 15],
];

fn handicap_points(handicap: u32) -> Vec<[u8; 2]> {
    let picks: &[usize] = match handicap {
        2 => &[0, 1],
        3 => &[0, 1, 2],
        4 => &[0, 1, 2, 3],
        5 => &[0, 1, 2, 3, 4],
        6 => &[0, 1, 2, 3, 5, 6],
        7 => &[0, 1, 2, 3, 4, 5, 6],
        8 => &[0, 1, 2, 3, 5, 6, 7, 8],
        9 => &[0, 1, 2, 3, 4, 5, 6, 7, 8],
        _ => &[],
    };
    picks.iter().map(|i| STAR_POINTS[*i]).collect()
}

/// Split `"Name (5D)"` into the name and the rank
fn split_player(value: &str) -> (String, Option<String>) {
    let value = value.trim();
    if let Some(open) = value.rfind('(') {
        if value.ends_with(')') {
            let name = value[..open].trim().to_string();
            let rank = value[open + 1..value.len() - 1].trim().to_string();
            if !rank.is_empty() {
                return (name, Some(rank));
            }
        }
    }
    (value.to_string(), None)
}

/// Normalize a `2015- 3-28-..` style stamp to an ISO date
fn parse_date(value: &str) -> Option<String> {
    let mut parts = value.split('-').map(str::trim);
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}

fn apply_header(info: &mut Info, key: &str, value: &str) {
    match key {
        "GAMEBLACKNAME" | "GAMEWHITENAME" => {
            let color = if key == "GAMEBLACKNAME" {
                Color::Black
            } else {
                Color::White
            };
            let (name, rank) = split_player(value);
            let player = info.game.player_mut(color);
            player.name = Some(name);
            player.rank = rank;
        }
        "GAMEDATE" => match parse_date(value) {
            Some(date) => info.game.dates = vec![date],
            None => tracing::debug!("Unrecognized GIB date '{}'", value),
        },
        "GAMERESULT" => info.game.result = Some(value.trim().to_string()),
        "GAMEGONGJE" => match value.trim().parse::<i32>() {
            Ok(komi) => info.game.komi = Some(f64::from(komi) / 10.0),
            Err(_) => tracing::debug!("Unrecognized GIB komi '{}'", value),
        },
        "GAMENAME" => info.game.name = Some(value.trim().to_string()),
        "GAMEPLACE" => info.game.place = Some(value.trim().to_string()),
        _ => {}
    }
}

fn field<'a>(fields: &[&'a str], index: usize, line: &str) -> Result<&'a str, DataError> {
    fields
        .get(index)
        .copied()
        .ok_or_else(|| DataError::MalformedGib(format!("truncated line '{}'", line)))
}

fn parse_number<T: std::str::FromStr>(value: &str, line: &str) -> Result<T, DataError> {
    value
        .parse()
        .map_err(|_| DataError::MalformedGib(format!("invalid number '{}' in '{}'", value, line)))
}

/// Parse a GIB record into a JGF record
pub fn parse_gib(text: &str) -> Result<JgfRecord, DataError> {
    let mut info = Info::default();
    info.game.kind = Some("go".to_string());
    info.board.width = BOARD_SIZE;
    info.board.height = BOARD_SIZE;

    let mut saw_header = false;
    let mut saw_game = false;
    let mut handicap = 0u32;
    let mut moves = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "\\HS" => {
                saw_header = true;
                continue;
            }
            "\\GS" => {
                saw_game = true;
                continue;
            }
            "\\HE" | "\\GE" => continue,
            _ => {}
        }

        if let Some(entry) = line
            .strip_prefix("\\[")
            .and_then(|rest| rest.strip_suffix("\\]"))
        {
            if let Some((key, value)) = entry.split_once('=') {
                apply_header(&mut info, key.trim(), value);
            }
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.first().copied() {
            Some("INI") => {
                handicap = parse_number(field(&fields, 3, line)?, line)?;
            }
            Some("STO") => {
                let color = match field(&fields, 3, line)? {
                    "1" => Color::Black,
                    "2" => Color::White,
                    other => {
                        return Err(DataError::MalformedGib(format!(
                            "invalid stone color '{}' in '{}'",
                            other, line
                        )))
                    }
                };
                let x: u8 = parse_number(field(&fields, 4, line)?, line)?;
                let y: u8 = parse_number(field(&fields, 5, line)?, line)?;
                if x >= BOARD_SIZE || y >= BOARD_SIZE {
                    return Err(DataError::MalformedGib(format!(
                        "move off the board in '{}'",
                        line
                    )));
                }
                moves.push(JgfMove::Place { color, x, y });
            }
            _ => {}
        }
    }

    if !saw_header && !saw_game {
        return Err(DataError::MalformedGib(
            "missing header and game sections".to_string(),
        ));
    }

    let mut root = JgfNode::default();
    if handicap >= 2 {
        info.game.handicap = Some(handicap);
        let stones = handicap_points(handicap);
        if !stones.is_empty() {
            root.setup = Some(JgfStones {
                black: stones,
                ..JgfStones::default()
            });
        }
    }

    let mut tree = vec![JgfEntry::Node(root)];
    tree.extend(moves.into_iter().map(|mv| {
        JgfEntry::Node(JgfNode {
            mv: Some(mv),
            ..JgfNode::default()
        })
    }));

    tracing::debug!("Parsed GIB record with {} moves", tree.len() - 1);
    Ok(JgfRecord { info, tree })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_rank_is_split() {
        assert_eq!(
            split_player("Lee Sedol (9D)"),
            ("Lee Sedol".to_string(), Some("9D".to_string()))
        );
        assert_eq!(split_player("anon"), ("anon".to_string(), None));
    }

    #[test]
    fn dates_are_normalized() {
        assert_eq!(parse_date("2016- 3-9-13-00-00").as_deref(), Some("2016-03-09"));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn handicap_counts_match() {
        for handicap in 2..=9 {
            assert_eq!(handicap_points(handicap).len(), handicap as usize);
        }
        assert!(handicap_points(1).is_empty());
    }
}
