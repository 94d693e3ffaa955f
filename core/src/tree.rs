// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game record tree: one node per move, setup or markup edit

use crate::path::Path;
use crate::{Color, Coord, Move};
use serde_json::Value;
use std::collections::BTreeMap;

/// Unique identifier for a node in the tree
pub type NodeId = usize;

/// A pre-placed stone. `color: None` erases the point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStone {
    pub x: u8,
    pub y: u8,
    pub color: Option<Color>,
}

impl SetupStone {
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// A point marked as territory of `color`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryPoint {
    pub x: u8,
    pub y: u8,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    Circle,
    Square,
    Triangle,
    Cross,
    Selected,
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub x: u8,
    pub y: u8,
    pub kind: MarkupKind,
}

impl Markup {
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// A node in the game tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub mv: Option<Move>,
    pub setup: Vec<SetupStone>,
    pub markup: Vec<Markup>,
    /// Forced color to move after this node
    pub turn: Option<Color>,
    pub name: Option<String>,
    pub comments: Option<String>,
    pub territory: Vec<TerritoryPoint>,
    /// Properties without a structured meaning, kept verbatim
    pub extra: BTreeMap<String, Value>,
    /// Child taken by forward navigation when no index is given
    pub remembered_path: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_move(mv: Move) -> Self {
        Self {
            mv: Some(mv),
            ..Self::default()
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_move(&self) -> bool {
        self.mv.is_some()
    }
}

/// Arena holding every node of a record.
///
/// Children are owned through their parent's child list; the parent link
/// is a plain index. Removed subtrees stay in the arena, detached.
#[derive(Debug, Clone, PartialEq)]
pub struct GameTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for GameTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTree {
    /// Tree with a single empty root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            root: 0,
        }
    }

    /// Tree rooted at `root`
    pub fn with_root(mut root: Node) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            nodes: vec![root],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Add a detached node to the arena
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// previous parent first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    pub fn append_to(&mut self, child: NodeId, parent: NodeId) {
        self.append_child(parent, child);
    }

    /// Convenience for `insert` followed by `append_child`
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.insert(node);
        self.append_child(parent, id);
        id
    }

    /// Detach `id` from its parent. The subtree itself is untouched.
    pub fn remove(&mut self, id: NodeId) {
        let parent = match self.nodes[id].parent.take() {
            Some(parent) => parent,
            None => return,
        };
        let siblings = &mut self.nodes[parent].children;
        if let Some(index) = siblings.iter().position(|c| *c == id) {
            siblings.remove(index);
            let remembered = &mut self.nodes[parent].remembered_path;
            if *remembered > index {
                *remembered -= 1;
            } else if *remembered == index {
                *remembered = 0;
            }
        }
    }

    /// Index of the child playing a stone at `coord`
    pub fn get_move_variation(&self, id: NodeId, coord: Coord) -> Option<usize> {
        self.children(id).iter().position(|child| {
            matches!(self.nodes[*child].mv, Some(mv) if mv.coord() == Some(coord))
        })
    }

    pub fn is_move_variation(&self, id: NodeId, coord: Coord) -> bool {
        self.get_move_variation(id, coord).is_some()
    }

    /// Children that carry a move, when there is more than one of them
    pub fn get_move_variations(&self, id: NodeId) -> Vec<NodeId> {
        let moves: Vec<NodeId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|child| self.nodes[*child].is_move())
            .collect();
        if moves.len() > 1 {
            moves
        } else {
            Vec::new()
        }
    }

    pub fn has_move_variations(&self, id: NodeId) -> bool {
        !self.get_move_variations(id).is_empty()
    }

    /// Number of move nodes from the root down to `id`, inclusive
    pub fn move_number(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            if node.is_move() {
                count += 1;
            }
            current = node.parent;
        }
        count
    }

    /// Depth of `id` below the root
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent].parent;
        }
        depth
    }

    /// Path from the root to `id`
    pub fn path_to(&self, id: NodeId) -> Path {
        let mut indexes = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            let index = self.nodes[parent]
                .children
                .iter()
                .position(|c| *c == current)
                .unwrap_or(0);
            indexes.push(index);
            current = parent;
        }

        let mut path = Path::new();
        for index in indexes.into_iter().rev() {
            path.advance(index);
        }
        path
    }

    /// First node named `name`, searching depth first from the root
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Color expected to move after `id`, derived from the nearest move or
    /// turn override on the way up to the root
    pub fn implied_turn(&self, id: NodeId) -> Color {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            if let Some(turn) = node.turn {
                return turn;
            }
            if let Some(mv) = node.mv {
                return mv.color().opposite();
            }
            current = node.parent;
        }
        Color::Black
    }

    /// Number of nodes reachable from the root
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend(self.nodes[id].children.iter().copied());
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root].children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(x: u8, y: u8, color: Color) -> Node {
        Node::with_move(Move::Place { x, y, color })
    }

    #[test]
    fn append_to_moves_between_parents() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let a = tree.add_child(root, place(0, 0, Color::Black));
        let b = tree.add_child(root, place(1, 1, Color::Black));
        let c = tree.add_child(a, place(2, 2, Color::White));

        tree.append_to(c, b);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[c]);
        assert_eq!(tree.parent(c), Some(b));
    }

    #[test]
    fn setup_children_are_not_variations() {
        let mut tree = GameTree::new();
        let root = tree.root();
        tree.add_child(root, place(0, 0, Color::Black));
        tree.add_child(root, Node::new());
        assert!(!tree.has_move_variations(root));
        tree.add_child(root, place(3, 3, Color::Black));
        assert_eq!(tree.get_move_variations(root).len(), 2);
        assert_eq!(tree.get_move_variation(root, Coord::new(3, 3)), Some(2));
    }

    #[test]
    fn move_number_skips_setup_nodes() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let a = tree.add_child(root, place(0, 0, Color::Black));
        let setup = tree.add_child(a, Node::new());
        let b = tree.add_child(setup, place(1, 0, Color::White));
        assert_eq!(tree.move_number(root), 0);
        assert_eq!(tree.move_number(setup), 1);
        assert_eq!(tree.move_number(b), 2);
        assert_eq!(tree.depth(b), 3);
    }

    #[test]
    fn remove_adjusts_remembered_path() {
        let mut tree = GameTree::new();
        let root = tree.root();
        let first = tree.add_child(root, place(0, 0, Color::Black));
        tree.add_child(root, place(1, 0, Color::Black));
        tree.node_mut(root).remembered_path = 1;
        tree.remove(first);
        assert_eq!(tree.node(root).remembered_path, 0);
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.parent(first), None);
    }
}
