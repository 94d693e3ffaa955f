// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record formats: JGF (JSON tree), SGF text and legacy GIB
//!
//! Every format is converted to a [`JgfRecord`] first; the game builds its
//! node tree from that single normalized shape.

pub mod aliases;
pub mod gib;
pub mod jgf;
pub mod sgf;
pub mod template;

pub use jgf::{JgfEntry, JgfMove, JgfNode, JgfRecord};

use crate::DataError;

/// Supported record formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Jgf,
    Sgf,
    Gib,
}

impl RecordFormat {
    pub fn name(&self) -> &'static str {
        match self {
            RecordFormat::Jgf => "jgf",
            RecordFormat::Sgf => "sgf",
            RecordFormat::Gib => "gib",
        }
    }
}

/// Guess the format from the first meaningful character
pub fn detect(data: &str) -> Result<RecordFormat, DataError> {
    let trimmed = data.trim_start_matches('\u{feff}').trim_start();
    match trimmed.chars().next() {
        None => Err(DataError::NoData),
        Some('{') | Some('[') => Ok(RecordFormat::Jgf),
        Some('(') => Ok(RecordFormat::Sgf),
        Some('\\') => Ok(RecordFormat::Gib),
        Some(_) => Err(DataError::UnknownFormat),
    }
}

/// Parse any supported record
pub fn parse_record(data: &str) -> Result<JgfRecord, DataError> {
    let format = detect(data)?;
    tracing::debug!("Parsing {} record ({} bytes)", format.name(), data.len());
    let data = data.trim_start_matches('\u{feff}');
    match format {
        RecordFormat::Jgf => parse_jgf(data),
        RecordFormat::Sgf => sgf::parse_sgf(data),
        RecordFormat::Gib => gib::parse_gib(data),
    }
}

/// JGF documents may be a full record or just a bare tree list
fn parse_jgf(data: &str) -> Result<JgfRecord, DataError> {
    if data.trim_start().starts_with('[') {
        let tree: Vec<JgfEntry> = jgf::from_json(data)?;
        return Ok(JgfRecord {
            tree,
            ..JgfRecord::default()
        });
    }
    JgfRecord::parse(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_by_leading_character() {
        assert_eq!(detect("  {\"tree\":[]}").unwrap(), RecordFormat::Jgf);
        assert_eq!(detect("[{}]").unwrap(), RecordFormat::Jgf);
        assert_eq!(detect("\u{feff}(;GM[1])").unwrap(), RecordFormat::Sgf);
        assert_eq!(detect("\\HS").unwrap(), RecordFormat::Gib);
        assert_eq!(detect("   "), Err(DataError::NoData));
        assert_eq!(detect("hello"), Err(DataError::UnknownFormat));
    }

    #[test]
    fn bare_tree_list_gets_default_info() {
        let record = parse_record(r#"[{"move":{"B":[3,3]}}]"#).unwrap();
        assert_eq!(record.info.board.width, 19);
        assert_eq!(record.tree.len(), 1);
    }
}
