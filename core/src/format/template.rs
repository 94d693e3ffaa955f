// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blank records used for new games and as the load fallback

use super::jgf::{JgfEntry, JgfNode, JgfRecord};
use super::sgf;
use crate::info::Info;
use chrono::NaiveDate;

pub const APPLICATION: &str = "kifu";

/// An empty record with a single blank root node
pub fn blank_record(width: u8, height: u8) -> JgfRecord {
    let mut info = Info::default();
    info.record.application = Some(format!("{}:{}", APPLICATION, env!("CARGO_PKG_VERSION")));
    info.record.charset = Some("UTF-8".to_string());
    info.record.version = Some(4);
    info.game.kind = Some("go".to_string());
    info.board.width = width;
    info.board.height = height;

    JgfRecord {
        info,
        tree: vec![JgfEntry::Node(JgfNode::default())],
    }
}

/// Blank record stamped with the date it was created
pub fn blank_record_dated(width: u8, height: u8, date: NaiveDate) -> JgfRecord {
    let mut record = blank_record(width, height);
    record.info.game.dates = vec![date.format("%Y-%m-%d").to_string()];
    record
}

/// Text form of a blank square board
pub fn blank_sgf(size: u8) -> String {
    sgf::to_sgf(&blank_record(size, size))
}
