// SPDX-License-Identifier: MIT OR Apache-2.0

//! JGF: the JSON tree interchange format
//!
//! A record is `{record, game, board, tree}`. `tree` is a list whose
//! entries are either node objects, chained parent to child, or a list of
//! branches (each itself such a list) hanging off the preceding node.

use crate::info::Info;
use crate::tree::{GameTree, Markup, MarkupKind, Node, NodeId, SetupStone, TerritoryPoint};
use crate::{Color, DataError, Move};
use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A complete JGF record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JgfRecord {
    #[serde(flatten)]
    pub info: Info,
    #[serde(default)]
    pub tree: Vec<JgfEntry>,
}

impl JgfRecord {
    /// Decode a JGF document
    pub fn parse(text: &str) -> Result<Self, DataError> {
        from_json(text)
    }

    /// Record with the given metadata and tree
    pub fn from_tree(info: Info, tree: &GameTree) -> Self {
        Self {
            info,
            tree: tree_to_jgf(tree),
        }
    }

    pub fn to_json(&self) -> Result<String, DataError> {
        serde_json::to_string(self).map_err(|e| DataError::MalformedJgf(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, DataError> {
        serde_json::to_string_pretty(self).map_err(|e| DataError::MalformedJgf(e.to_string()))
    }
}

fn malformed(err: serde_json::Error) -> DataError {
    DataError::MalformedJgf(err.to_string())
}

/// Decode a JSON document without serde_json's nesting limit. Every level
/// of variations nests two arrays, so real records go past it quickly.
pub(crate) fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, DataError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(&mut deserializer).map_err(malformed)?;
    deserializer.end().map_err(malformed)?;
    Ok(value)
}

/// One entry of a JGF tree list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JgfEntry {
    /// Alternative continuations of the preceding node
    Variations(Vec<Vec<JgfEntry>>),
    Node(JgfNode),
}

impl<'de> Deserialize<'de> for JgfEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        entry_from_value(Value::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}

enum DecodeFrame {
    /// Entries of one branch
    Sequence {
        items: std::vec::IntoIter<Value>,
        entries: Vec<JgfEntry>,
    },
    /// Branches of one variation list
    Branches {
        items: std::vec::IntoIter<Value>,
        branches: Vec<Vec<JgfEntry>>,
    },
}

fn node_from_value(value: Value) -> Result<JgfNode, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Convert a decoded entry with an explicit stack of open lists
fn entry_from_value(value: Value) -> Result<JgfEntry, String> {
    let items = match value {
        Value::Array(items) => items,
        node => return node_from_value(node).map(JgfEntry::Node),
    };

    let mut stack = vec![DecodeFrame::Branches {
        items: items.into_iter(),
        branches: Vec::new(),
    }];
    while let Some(frame) = stack.last_mut() {
        match frame {
            DecodeFrame::Sequence { items, entries } => match items.next() {
                Some(Value::Array(branches)) => stack.push(DecodeFrame::Branches {
                    items: branches.into_iter(),
                    branches: Vec::new(),
                }),
                Some(node) => entries.push(JgfEntry::Node(node_from_value(node)?)),
                None => {
                    let finished = std::mem::take(entries);
                    stack.pop();
                    match stack.last_mut() {
                        Some(DecodeFrame::Branches { branches, .. }) => branches.push(finished),
                        _ => return Err("branch outside of a variation list".to_string()),
                    }
                }
            },
            DecodeFrame::Branches { items, branches } => match items.next() {
                Some(Value::Array(entries)) => stack.push(DecodeFrame::Sequence {
                    items: entries.into_iter(),
                    entries: Vec::new(),
                }),
                Some(_) => return Err("variation branch must be a list".to_string()),
                None => {
                    let finished = std::mem::take(branches);
                    stack.pop();
                    match stack.last_mut() {
                        Some(DecodeFrame::Sequence { entries, .. }) => {
                            entries.push(JgfEntry::Variations(finished))
                        }
                        Some(DecodeFrame::Branches { .. }) => {
                            return Err("variation list directly inside another".to_string())
                        }
                        None => return Ok(JgfEntry::Variations(finished)),
                    }
                }
            },
        }
    }
    Err("unterminated variation list".to_string())
}

/// Move of a JGF node: `{"B": [x, y]}`, `{"W": "pass"}` or `"pass"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JgfMove {
    Place { color: Color, x: u8, y: u8 },
    /// A pass; the color may be left for the reader to infer
    Pass { color: Option<Color> },
}

impl JgfMove {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) if s == "pass" => Ok(JgfMove::Pass { color: None }),
            Value::Object(map) if map.len() == 1 => {
                let (key, point) = match map.iter().next() {
                    Some(entry) => entry,
                    None => return Err("empty move".to_string()),
                };
                let color = Color::from_code(key)
                    .ok_or_else(|| format!("invalid move color '{}'", key))?;
                match point {
                    Value::String(s) if s == "pass" => Ok(JgfMove::Pass { color: Some(color) }),
                    Value::Null => Ok(JgfMove::Pass { color: Some(color) }),
                    Value::Array(xy) if xy.len() == 2 => {
                        let coord = |v: &Value| {
                            v.as_u64()
                                .and_then(|n| u8::try_from(n).ok())
                                .ok_or_else(|| format!("invalid move coordinate {}", v))
                        };
                        Ok(JgfMove::Place {
                            color,
                            x: coord(&xy[0])?,
                            y: coord(&xy[1])?,
                        })
                    }
                    other => Err(format!("invalid move point {}", other)),
                }
            }
            other => Err(format!("invalid move {}", other)),
        }
    }
}

impl Serialize for JgfMove {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JgfMove::Place { color, x, y } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(color.code(), &[*x, *y])?;
                map.end()
            }
            JgfMove::Pass { color: Some(color) } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(color.code(), "pass")?;
                map.end()
            }
            JgfMove::Pass { color: None } => serializer.serialize_str("pass"),
        }
    }
}

impl<'de> Deserialize<'de> for JgfMove {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        JgfMove::from_value(&value).map_err(D::Error::custom)
    }
}

/// Point lists keyed by color: `{"B": [[x, y], ..], "W": [..], "E": [..]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JgfStones {
    #[serde(rename = "B", default, skip_serializing_if = "Vec::is_empty")]
    pub black: Vec<[u8; 2]>,
    #[serde(rename = "W", default, skip_serializing_if = "Vec::is_empty")]
    pub white: Vec<[u8; 2]>,
    #[serde(rename = "E", default, skip_serializing_if = "Vec::is_empty")]
    pub empty: Vec<[u8; 2]>,
}

impl JgfStones {
    pub fn is_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty() && self.empty.is_empty()
    }
}

/// Markup keyed by type; labels carry `[x, y, text]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JgfMarkup {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub circle: Vec<[u8; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub square: Vec<[u8; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triangle: Vec<[u8; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross: Vec<[u8; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected: Vec<[u8; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label: Vec<(u8, u8, String)>,
}

impl JgfMarkup {
    pub fn is_empty(&self) -> bool {
        self.circle.is_empty()
            && self.square.is_empty()
            && self.triangle.is_empty()
            && self.cross.is_empty()
            && self.selected.is_empty()
            && self.label.is_empty()
    }

    /// Point list for a shape, `None` for labels
    pub fn points_mut(&mut self, kind: &MarkupKind) -> Option<&mut Vec<[u8; 2]>> {
        match kind {
            MarkupKind::Circle => Some(&mut self.circle),
            MarkupKind::Square => Some(&mut self.square),
            MarkupKind::Triangle => Some(&mut self.triangle),
            MarkupKind::Cross => Some(&mut self.cross),
            MarkupKind::Selected => Some(&mut self.selected),
            MarkupKind::Label(_) => None,
        }
    }
}

/// A node object of the JGF tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JgfNode {
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub mv: Option<JgfMove>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<JgfStones>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<JgfMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<JgfStones>,
    /// Properties kept verbatim, keyed by their text format code
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl JgfNode {
    /// Convert into a tree node. `implied_turn` colors a bare pass.
    pub fn to_node(&self, implied_turn: Color) -> Node {
        let mut node = Node::new();
        node.mv = self.mv.map(|mv| match mv {
            JgfMove::Place { color, x, y } => Move::Place { x, y, color },
            JgfMove::Pass { color } => Move::Pass {
                color: color.unwrap_or(implied_turn),
            },
        });

        if let Some(setup) = &self.setup {
            let groups = [
                (&setup.black, Some(Color::Black)),
                (&setup.white, Some(Color::White)),
                (&setup.empty, None),
            ];
            for (points, color) in groups {
                node.setup
                    .extend(points.iter().map(|[x, y]| SetupStone { x: *x, y: *y, color }));
            }
        }

        if let Some(markup) = &self.markup {
            let shapes = [
                (&markup.circle, MarkupKind::Circle),
                (&markup.square, MarkupKind::Square),
                (&markup.triangle, MarkupKind::Triangle),
                (&markup.cross, MarkupKind::Cross),
                (&markup.selected, MarkupKind::Selected),
            ];
            for (points, kind) in shapes {
                node.markup.extend(points.iter().map(|[x, y]| Markup {
                    x: *x,
                    y: *y,
                    kind: kind.clone(),
                }));
            }
            node.markup.extend(markup.label.iter().map(|(x, y, text)| Markup {
                x: *x,
                y: *y,
                kind: MarkupKind::Label(text.clone()),
            }));
        }

        if let Some(territory) = &self.territory {
            let groups = [(&territory.black, Color::Black), (&territory.white, Color::White)];
            for (points, color) in groups {
                node.territory
                    .extend(points.iter().map(|[x, y]| TerritoryPoint { x: *x, y: *y, color }));
            }
        }

        node.turn = self.turn;
        node.name = self.name.clone();
        node.comments = self.comments.clone();
        node.extra = self.extra.clone();
        node
    }

    pub fn from_node(node: &Node) -> Self {
        let mv = node.mv.map(|mv| match mv {
            Move::Place { x, y, color } => JgfMove::Place { color, x, y },
            Move::Pass { color } => JgfMove::Pass { color: Some(color) },
        });

        let mut setup = JgfStones::default();
        for stone in &node.setup {
            let point = [stone.x, stone.y];
            match stone.color {
                Some(Color::Black) => setup.black.push(point),
                Some(Color::White) => setup.white.push(point),
                None => setup.empty.push(point),
            }
        }

        let mut markup = JgfMarkup::default();
        for mark in &node.markup {
            match &mark.kind {
                MarkupKind::Label(text) => markup.label.push((mark.x, mark.y, text.clone())),
                kind => {
                    if let Some(points) = markup.points_mut(kind) {
                        points.push([mark.x, mark.y]);
                    }
                }
            }
        }

        let mut territory = JgfStones::default();
        for point in &node.territory {
            match point.color {
                Color::Black => territory.black.push([point.x, point.y]),
                Color::White => territory.white.push([point.x, point.y]),
            }
        }

        Self {
            mv,
            setup: (!setup.is_empty()).then_some(setup),
            markup: (!markup.is_empty()).then_some(markup),
            turn: node.turn,
            name: node.name.clone(),
            comments: node.comments.clone(),
            territory: (!territory.is_empty()).then_some(territory),
            extra: node.extra.clone(),
        }
    }
}

enum BuildFrame<'a> {
    Sequence {
        entries: &'a [JgfEntry],
        next: usize,
        cursor: Option<NodeId>,
    },
    Branches {
        branches: &'a [Vec<JgfEntry>],
        next: usize,
        parent: Option<NodeId>,
    },
}

/// Build a node tree from a JGF tree list.
///
/// The first node object becomes the root; a list that starts with
/// branches gets an empty root.
pub fn build_tree(entries: &[JgfEntry]) -> GameTree {
    let mut tree = GameTree::new();
    let mut root_filled = false;
    let mut stack = vec![BuildFrame::Sequence {
        entries,
        next: 0,
        cursor: None,
    }];

    while let Some(frame) = stack.last_mut() {
        match frame {
            BuildFrame::Sequence {
                entries,
                next,
                cursor,
            } => {
                let slice = *entries;
                let Some(entry) = slice.get(*next) else {
                    stack.pop();
                    continue;
                };
                *next += 1;
                match entry {
                    JgfEntry::Node(jgf) => {
                        let id = match *cursor {
                            None if !root_filled => {
                                root_filled = true;
                                let root = tree.root();
                                *tree.node_mut(root) = jgf.to_node(Color::Black);
                                root
                            }
                            parent => {
                                let parent = parent.unwrap_or_else(|| tree.root());
                                root_filled = true;
                                let node = jgf.to_node(tree.implied_turn(parent));
                                tree.add_child(parent, node)
                            }
                        };
                        *cursor = Some(id);
                    }
                    JgfEntry::Variations(branches) => {
                        root_filled = true;
                        let parent = *cursor;
                        stack.push(BuildFrame::Branches {
                            branches,
                            next: 0,
                            parent,
                        });
                    }
                }
            }
            BuildFrame::Branches {
                branches,
                next,
                parent,
            } => {
                let slice = *branches;
                let Some(branch) = slice.get(*next) else {
                    stack.pop();
                    continue;
                };
                *next += 1;
                let cursor = Some(parent.unwrap_or_else(|| tree.root()));
                stack.push(BuildFrame::Sequence {
                    entries: branch.as_slice(),
                    next: 0,
                    cursor,
                });
            }
        }
    }

    tree
}

struct ExportFrame {
    entries: Vec<JgfEntry>,
    pending: Vec<NodeId>,
    next: usize,
    branches: Vec<Vec<JgfEntry>>,
}

impl ExportFrame {
    /// Emit the single-child chain starting at `start`
    fn new(tree: &GameTree, start: NodeId) -> Self {
        let mut entries = Vec::new();
        let mut pending = Vec::new();
        let mut current = start;
        loop {
            entries.push(JgfEntry::Node(JgfNode::from_node(tree.node(current))));
            match tree.children(current) {
                [] => break,
                [only] => current = *only,
                many => {
                    pending = many.to_vec();
                    break;
                }
            }
        }
        Self {
            entries,
            pending,
            next: 0,
            branches: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<JgfEntry> {
        if !self.branches.is_empty() {
            self.entries.push(JgfEntry::Variations(self.branches));
        }
        self.entries
    }
}

/// Serialize a node tree into a JGF tree list.
///
/// Single-child chains stay flat; a node with several children is
/// followed by one branch list per child.
pub fn tree_to_jgf(tree: &GameTree) -> Vec<JgfEntry> {
    let mut stack = vec![ExportFrame::new(tree, tree.root())];

    loop {
        let Some(frame) = stack.last_mut() else {
            return Vec::new();
        };
        if let Some(child) = frame.pending.get(frame.next).copied() {
            frame.next += 1;
            stack.push(ExportFrame::new(tree, child));
            continue;
        }

        let Some(done) = stack.pop() else {
            return Vec::new();
        };
        let entries = done.finish();
        match stack.last_mut() {
            Some(parent) => parent.branches.push(entries),
            None => return entries,
        }
    }
}
