// SPDX-License-Identifier: MIT OR Apache-2.0

//! SGF (Smart Game Format) parsing and generation
//!
//! Parsing runs in two passes: a tokenizer splits the text into `(`, `)`
//! and node tokens (each node already broken into properties), then the
//! converter walks the tokens with an explicit variation stack and maps
//! every property onto the JGF model. Generation walks a JGF tree the
//! same way in reverse. Neither direction recurses, so deeply nested
//! variations cannot exhaust the call stack.

use super::aliases;
use super::jgf::{JgfEntry, JgfMarkup, JgfMove, JgfNode, JgfRecord, JgfStones};
use crate::info::{BoardInfo, Info, InfoField, VariationStyle};
use crate::{Color, DataError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;

/// Represents an SGF property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SgfProperty {
    /// Property identifier
    pub id: String,
    /// Property values, unescaped
    pub values: Vec<String>,
}

/// Lexical unit of an SGF game tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `(` opening a game tree or variation
    Open,
    /// `)` closing it
    Close,
    /// `;` followed by the node's properties
    Node(Vec<SgfProperty>),
}

struct Tokenizer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(usize::MAX)
    }

    /// Tokens of the first game tree in the text
    fn tokenize(mut self) -> Result<Vec<Token>, DataError> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;

        loop {
            self.skip_whitespace();
            let offset = self.offset();
            match self.peek() {
                Some('(') => {
                    self.chars.next();
                    depth += 1;
                    tokens.push(Token::Open);
                }
                Some(')') => {
                    self.chars.next();
                    if depth == 0 {
                        return Err(DataError::MalformedSgf(format!(
                            "unbalanced ')' at offset {}",
                            offset
                        )));
                    }
                    depth -= 1;
                    tokens.push(Token::Close);
                    if depth == 0 {
                        // Further game trees of a collection are ignored
                        break;
                    }
                }
                Some(';') if depth > 0 => {
                    let node = self.parse_node()?;
                    tokens.push(Token::Node(node));
                }
                Some(c) => {
                    return Err(DataError::MalformedSgf(format!(
                        "unexpected '{}' at offset {}",
                        c, offset
                    )));
                }
                None => {
                    if depth > 0 {
                        return Err(DataError::MalformedSgf(
                            "missing ')' at end of game tree".to_string(),
                        ));
                    }
                    break;
                }
            }
        }

        Ok(tokens)
    }

    /// Parse a node
    fn parse_node(&mut self) -> Result<Vec<SgfProperty>, DataError> {
        // Consume ';'
        self.chars.next();

        let mut properties = Vec::new();
        self.skip_whitespace();

        // Parse properties
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                properties.push(self.parse_property()?);
                self.skip_whitespace();
            } else {
                break;
            }
        }

        Ok(properties)
    }

    /// Parse a property
    fn parse_property(&mut self) -> Result<SgfProperty, DataError> {
        let offset = self.offset();

        // Lowercase letters of old-style identifiers are dropped
        let mut id = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_uppercase() {
                id.push(c);
                self.chars.next();
            } else if c.is_ascii_lowercase() {
                self.chars.next();
            } else {
                break;
            }
        }

        if id.is_empty() {
            return Err(DataError::MalformedSgf(format!(
                "property without identifier at offset {}",
                offset
            )));
        }

        self.skip_whitespace();

        // Parse property values
        let mut values = Vec::new();
        while self.peek() == Some('[') {
            values.push(self.parse_property_value()?);
            self.skip_whitespace();
        }

        if values.is_empty() {
            return Err(DataError::MalformedSgf(format!(
                "property {} at offset {} has no value",
                id, offset
            )));
        }

        Ok(SgfProperty { id, values })
    }

    /// Parse a bracketed property value
    fn parse_property_value(&mut self) -> Result<String, DataError> {
        let offset = self.offset();
        // Consume '['
        self.chars.next();

        let mut value = String::new();
        let mut escaped = false;

        while let Some((_, c)) = self.chars.next() {
            if escaped {
                // Escaped newline is a soft line break
                if c == '\r' {
                    self.chars.next_if(|&(_, next)| next == '\n');
                } else if c != '\n' {
                    value.push(c);
                }
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == ']' {
                return Ok(value);
            } else {
                value.push(c);
            }
        }

        Err(DataError::MalformedSgf(format!(
            "unterminated value starting at offset {}",
            offset
        )))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}

/// Split SGF text into tokens
pub fn tokenize(text: &str) -> Result<Vec<Token>, DataError> {
    Tokenizer::new(text).tokenize()
}

#[derive(Default)]
struct ParseFrame {
    entries: Vec<JgfEntry>,
    branches: Vec<Vec<JgfEntry>>,
}

impl ParseFrame {
    fn finish(mut self) -> Vec<JgfEntry> {
        match self.branches.len() {
            0 => {}
            1 => {
                if let Some(only) = self.branches.pop() {
                    self.entries.extend(only);
                }
            }
            _ => self.entries.push(JgfEntry::Variations(self.branches)),
        }
        self.entries
    }
}

/// Parse SGF text into a JGF record
pub fn parse_sgf(text: &str) -> Result<JgfRecord, DataError> {
    let tokens = tokenize(text)?;
    let mut info = Info::default();
    let mut stack: Vec<ParseFrame> = Vec::new();
    let mut tree = None;

    for token in tokens {
        match token {
            Token::Open => stack.push(ParseFrame::default()),
            Token::Node(properties) => {
                let frame = stack.last_mut().ok_or_else(|| {
                    DataError::MalformedSgf("node outside of a game tree".to_string())
                })?;
                if !frame.branches.is_empty() {
                    return Err(DataError::MalformedSgf(
                        "node after a variation".to_string(),
                    ));
                }
                let node = convert_node(&properties, &mut info)?;
                frame.entries.push(JgfEntry::Node(node));
            }
            Token::Close => {
                let frame = stack.pop().ok_or_else(|| {
                    DataError::MalformedSgf("unbalanced ')'".to_string())
                })?;
                let entries = frame.finish();
                match stack.last_mut() {
                    Some(parent) => parent.branches.push(entries),
                    None => {
                        tree = Some(entries);
                        break;
                    }
                }
            }
        }
    }

    let tree = tree.ok_or_else(|| DataError::MalformedSgf("no game tree found".to_string()))?;
    Ok(JgfRecord { info, tree })
}

/// Decode a single SGF letter into a board offset
fn decode_axis(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a'),
        'A'..='Z' => Some(c as u8 - b'A' + 26),
        _ => None,
    }
}

fn encode_axis(offset: u8) -> char {
    if offset < 26 {
        (b'a' + offset) as char
    } else {
        if offset >= MAX_BOARD_SIZE {
            tracing::warn!("Offset {} cannot be written as an SGF point", offset);
        }
        (b'A' + (offset - 26).min(25)) as char
    }
}

/// Parse an SGF coordinate like "ab"
pub fn decode_point(value: &str) -> Result<[u8; 2], DataError> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => match (decode_axis(a), decode_axis(b)) {
            (Some(x), Some(y)) => Ok([x, y]),
            _ => Err(DataError::MalformedSgf(format!("invalid point '{}'", value))),
        },
        _ => Err(DataError::MalformedSgf(format!("invalid point '{}'", value))),
    }
}

pub fn encode_point(x: u8, y: u8) -> String {
    let mut point = String::with_capacity(2);
    point.push(encode_axis(x));
    point.push(encode_axis(y));
    point
}

/// Expand a point list, including compressed `aa:cc` rectangles
fn decode_point_list(values: &[String]) -> Result<Vec<[u8; 2]>, DataError> {
    let mut points = Vec::new();
    for value in values {
        match value.split_once(':') {
            Some((from, to)) => {
                let [x1, y1] = decode_point(from)?;
                let [x2, y2] = decode_point(to)?;
                for x in x1.min(x2)..=x1.max(x2) {
                    for y in y1.min(y2)..=y1.max(y2) {
                        points.push([x, y]);
                    }
                }
            }
            None => points.push(decode_point(value)?),
        }
    }
    Ok(points)
}

fn is_pass(value: &str, board: &BoardInfo) -> bool {
    let value = value.trim();
    value.is_empty() || (value == "tt" && board.width <= 19 && board.height <= 19)
}

/// Largest side the two-letter point encoding can address
pub const MAX_BOARD_SIZE: u8 = 52;

fn parse_size(value: &str) -> Option<(u8, u8)> {
    let (width, height) = match value.split_once(':') {
        Some((w, h)) => (w.trim().parse().ok()?, h.trim().parse().ok()?),
        None => {
            let size = value.trim().parse().ok()?;
            (size, size)
        }
    };
    let valid = 1..=MAX_BOARD_SIZE;
    if valid.contains(&width) && valid.contains(&height) {
        Some((width, height))
    } else {
        None
    }
}

fn raw_value(values: &[String]) -> Value {
    match values {
        [single] => Value::from(single.as_str()),
        many => Value::from(many.to_vec()),
    }
}

/// Map the properties of one node onto a JGF node and the record info
fn convert_node(properties: &[SgfProperty], info: &mut Info) -> Result<JgfNode, DataError> {
    let mut node = JgfNode::default();

    for prop in properties {
        let code = prop.id.as_str();
        let values = prop.values.as_slice();
        let first = values.first().map(String::as_str).unwrap_or("");

        let mut keep_verbatim = false;
        match code {
            "B" | "W" => {
                let color = if code == "B" { Color::Black } else { Color::White };
                node.mv = Some(if is_pass(first, &info.board) {
                    JgfMove::Pass { color: Some(color) }
                } else {
                    let [x, y] = decode_point(first)?;
                    JgfMove::Place { color, x, y }
                });
            }
            "AB" | "AW" | "AE" => {
                let points = decode_point_list(values)?;
                let setup = node.setup.get_or_insert_with(JgfStones::default);
                match code {
                    "AB" => setup.black.extend(points),
                    "AW" => setup.white.extend(points),
                    _ => setup.empty.extend(points),
                }
            }
            "TB" | "TW" => {
                let points = decode_point_list(values)?;
                let territory = node.territory.get_or_insert_with(JgfStones::default);
                if code == "TB" {
                    territory.black.extend(points);
                } else {
                    territory.white.extend(points);
                }
            }
            "CR" | "SQ" | "TR" | "MA" | "SL" => {
                let points = decode_point_list(values)?;
                let markup = node.markup.get_or_insert_with(JgfMarkup::default);
                let target = match code {
                    "CR" => &mut markup.circle,
                    "SQ" => &mut markup.square,
                    "TR" => &mut markup.triangle,
                    "MA" => &mut markup.cross,
                    _ => &mut markup.selected,
                };
                target.extend(points);
            }
            "LB" => {
                let markup = node.markup.get_or_insert_with(JgfMarkup::default);
                for value in values {
                    let (point, text) = value.split_once(':').ok_or_else(|| {
                        DataError::MalformedSgf(format!("invalid label '{}'", value))
                    })?;
                    let [x, y] = decode_point(point)?;
                    markup.label.push((x, y, text.to_string()));
                }
            }
            "PL" => match Color::from_code(first) {
                Some(color) => node.turn = Some(color),
                None => keep_verbatim = true,
            },
            "KM" => match first.trim().parse::<f64>() {
                Ok(komi) => info.game.komi = Some(komi),
                Err(_) => keep_verbatim = true,
            },
            "HA" => match first.trim().parse::<u32>() {
                Ok(handicap) => info.game.handicap = Some(handicap),
                Err(_) => keep_verbatim = true,
            },
            "SZ" => match parse_size(first) {
                Some((width, height)) => {
                    info.board.width = width;
                    info.board.height = height;
                }
                None => {
                    return Err(DataError::MalformedSgf(format!(
                        "invalid board size '{}'",
                        first
                    )))
                }
            },
            "FF" => match first.trim().parse::<u32>() {
                Ok(version) => info.record.version = Some(version),
                Err(_) => keep_verbatim = true,
            },
            "GM" => {
                info.game.kind = Some(match first.trim() {
                    "1" => "go".to_string(),
                    other => other.to_string(),
                });
            }
            "DT" => {
                info.game.dates = first
                    .split(',')
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect();
            }
            "ST" => match first.trim().parse::<u8>() {
                Ok(flags) => info.board.variations = Some(VariationStyle::from_flags(flags)),
                Err(_) => keep_verbatim = true,
            },
            "PB" | "PW" | "BR" | "WR" | "BT" | "WT" => {
                let color = if matches!(code, "PB" | "BR" | "BT") {
                    Color::Black
                } else {
                    Color::White
                };
                let player = info.game.player_mut(color);
                let value = Some(first.to_string());
                match code {
                    "PB" | "PW" => player.name = value,
                    "BR" | "WR" => player.rank = value,
                    _ => player.team = value,
                }
            }
            "N" => node.name = Some(first.to_string()),
            "C" => node.comments = Some(first.to_string()),
            _ => match aliases::info_field_for(code) {
                Some(field) => info.set_text(field, first),
                None => keep_verbatim = true,
            },
        }

        if keep_verbatim {
            node.extra.insert(code.to_string(), raw_value(values));
        }
    }

    Ok(node)
}

/// Escape `\` and `]` inside a property value
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == ']' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn write_property<S: AsRef<str>>(out: &mut String, code: &str, values: &[S]) {
    if values.is_empty() {
        return;
    }
    out.push_str(code);
    for value in values {
        out.push('[');
        out.push_str(&escape(value.as_ref()));
        out.push(']');
    }
}

fn write_points(out: &mut String, code: &str, points: &[[u8; 2]]) {
    let values: Vec<String> = points.iter().map(|[x, y]| encode_point(*x, *y)).collect();
    write_property(out, code, &values);
}

fn write_extra(out: &mut String, extra: &BTreeMap<String, Value>) {
    for (key, value) in extra {
        if !aliases::is_property_code(key) {
            continue;
        }
        let values: Vec<String> = match value {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Value::Number(_) | Value::Bool(_) => vec![value.to_string()],
            _ => {
                tracing::debug!("Skipping structured property {} on export", key);
                continue;
            }
        };
        write_property(out, key, &values);
    }
}

/// Root-level metadata as one flat property block
fn write_info(out: &mut String, info: &Info) {
    let version = info.record.version.unwrap_or(4);
    write_property(out, "FF", &[version.to_string()]);

    let game_type = match info.game.kind.as_deref() {
        None | Some("go") => "1",
        Some(other) => other,
    };
    write_property(out, "GM", &[game_type]);

    let board = &info.board;
    let size = if board.width == board.height {
        board.width.to_string()
    } else {
        format!("{}:{}", board.width, board.height)
    };
    write_property(out, "SZ", &[size]);

    if let Some(style) = board.variations {
        write_property(out, "ST", &[style.flags().to_string()]);
    }
    if let Some(komi) = info.game.komi {
        write_property(out, "KM", &[komi.to_string()]);
    }
    if let Some(handicap) = info.game.handicap {
        write_property(out, "HA", &[handicap.to_string()]);
    }

    for color in [Color::Black, Color::White] {
        if let Some(player) = info.game.player(color) {
            let (name, rank, team) = match color {
                Color::Black => ("PB", "BR", "BT"),
                Color::White => ("PW", "WR", "WT"),
            };
            for (code, value) in [(name, &player.name), (rank, &player.rank), (team, &player.team)] {
                if let Some(value) = value {
                    write_property(out, code, &[value]);
                }
            }
        }
    }

    if !info.game.dates.is_empty() {
        write_property(out, "DT", &[info.game.dates.join(",")]);
    }

    for field in InfoField::ALL {
        if let (Some(value), Some(code)) = (info.text(field), aliases::code_for(field.path())) {
            write_property(out, code, &[value]);
        }
    }

    write_extra(out, &info.record.extra);
    write_extra(out, &info.game.extra);
    write_extra(out, &info.board.extra);
}

/// Properties of one node. Returns the color expected to move next.
fn write_node(out: &mut String, node: &JgfNode, turn: Color) -> Color {
    let mut next_turn = turn;

    match node.mv {
        Some(JgfMove::Place { color, x, y }) => {
            write_property(out, color.code(), &[encode_point(x, y)]);
            next_turn = color.opposite();
        }
        Some(JgfMove::Pass { color }) => {
            let color = color.unwrap_or(turn);
            write_property(out, color.code(), &[""]);
            next_turn = color.opposite();
        }
        None => {}
    }

    if let Some(setup) = &node.setup {
        write_points(out, "AB", &setup.black);
        write_points(out, "AW", &setup.white);
        write_points(out, "AE", &setup.empty);
    }

    if let Some(color) = node.turn {
        write_property(out, "PL", &[color.code()]);
        next_turn = color;
    }

    if let Some(territory) = &node.territory {
        write_points(out, "TB", &territory.black);
        write_points(out, "TW", &territory.white);
    }

    if let Some(markup) = &node.markup {
        write_points(out, "CR", &markup.circle);
        write_points(out, "SQ", &markup.square);
        write_points(out, "TR", &markup.triangle);
        write_points(out, "MA", &markup.cross);
        write_points(out, "SL", &markup.selected);
        let labels: Vec<String> = markup
            .label
            .iter()
            .map(|(x, y, text)| format!("{}:{}", encode_point(*x, *y), text))
            .collect();
        write_property(out, "LB", &labels);
    }

    if let Some(name) = &node.name {
        write_property(out, "N", &[name]);
    }
    if let Some(comments) = &node.comments {
        write_property(out, "C", &[comments]);
    }

    write_extra(out, &node.extra);
    next_turn
}

enum WriteFrame<'a> {
    Sequence {
        entries: &'a [JgfEntry],
        next: usize,
        turn: Color,
        branch: bool,
    },
    Branches {
        branches: &'a [Vec<JgfEntry>],
        next: usize,
        turn: Color,
    },
}

/// Generate SGF text from a JGF record
pub fn to_sgf(record: &JgfRecord) -> String {
    let mut out = String::from("(;");
    write_info(&mut out, &record.info);

    let mut start = 0;
    let mut turn = Color::Black;
    if let Some(JgfEntry::Node(root)) = record.tree.first() {
        turn = write_node(&mut out, root, turn);
        start = 1;
    }

    let mut stack = vec![WriteFrame::Sequence {
        entries: &record.tree,
        next: start,
        turn,
        branch: false,
    }];

    while let Some(frame) = stack.last_mut() {
        match frame {
            WriteFrame::Sequence {
                entries,
                next,
                turn,
                branch,
            } => {
                let slice = *entries;
                let Some(entry) = slice.get(*next) else {
                    if *branch {
                        out.push(')');
                    }
                    stack.pop();
                    continue;
                };
                *next += 1;
                match entry {
                    JgfEntry::Node(node) => {
                        out.push(';');
                        *turn = write_node(&mut out, node, *turn);
                    }
                    JgfEntry::Variations(branches) => {
                        let turn = *turn;
                        stack.push(WriteFrame::Branches {
                            branches: branches.as_slice(),
                            next: 0,
                            turn,
                        });
                    }
                }
            }
            WriteFrame::Branches {
                branches,
                next,
                turn,
            } => {
                let slice = *branches;
                let Some(branch) = slice.get(*next) else {
                    stack.pop();
                    continue;
                };
                *next += 1;
                let turn = *turn;
                out.push('(');
                stack.push(WriteFrame::Sequence {
                    entries: branch.as_slice(),
                    next: 0,
                    turn,
                    branch: true,
                });
            }
        }
    }

    out.push(')');
    out
}
