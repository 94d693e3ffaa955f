// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game controller: replays a record tree into a stack of positions
//!
//! A [`Game`] owns the node tree, a [`Path`] to the current node and the
//! history of positions reached along that path. Every navigation step
//! computes the next position before committing anything, so a rules
//! violation leaves the node, path and history exactly as they were.

use crate::config::GameConfig;
use crate::format::jgf::{self, build_tree, JgfRecord};
use crate::format::{self, sgf, template};
use crate::grid::Grid;
use crate::info::Info;
use crate::path::Path;
use crate::position::Position;
use crate::rules::RuleValidator;
use crate::tree::{GameTree, Markup, MarkupKind, Node, NodeId, SetupStone};
use crate::{Color, Coord, DataError, Error, Move, PositionError};
use serde::{Deserialize, Serialize};

/// Navigation target for [`Game::goto`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GotoTarget {
    /// Move number along the remembered branches
    Move(usize),
    /// First node with this name
    Name(String),
    /// Exact location in the tree
    Path(Path),
}

impl From<usize> for GotoTarget {
    fn from(n: usize) -> Self {
        GotoTarget::Move(n)
    }
}

impl From<&str> for GotoTarget {
    fn from(name: &str) -> Self {
        GotoTarget::Name(name.to_string())
    }
}

impl From<Path> for GotoTarget {
    fn from(path: Path) -> Self {
        GotoTarget::Path(path)
    }
}

/// Serializable game state for undo stacks or session persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub jgf: JgfRecord,
    pub path: Path,
}

impl GameSnapshot {
    pub fn to_json(&self) -> Result<String, DataError> {
        serde_json::to_string(self).map_err(|e| DataError::MalformedJgf(e.to_string()))
    }

    /// Decode a snapshot, however deeply its variations nest
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        jgf::from_json(text)
    }
}

struct Checkpoint {
    node: NodeId,
    path: Path,
    history: Vec<Position>,
}

/// A game record being replayed and edited
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    info: Info,
    tree: GameTree,
    node: NodeId,
    path: Path,
    /// Positions along the path; the last one is the current position
    history: Vec<Position>,
    /// Markup of the current node
    markup: Grid<Option<MarkupKind>>,
    /// Record as it was last loaded
    source: JgfRecord,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    /// Game on a blank board of `config.board_size`
    pub fn new(config: GameConfig) -> Self {
        let record = template::blank_record(config.board_size, config.board_size);
        let mut game = Self {
            config,
            info: record.info.clone(),
            tree: GameTree::new(),
            node: 0,
            path: Path::new(),
            history: Vec::new(),
            markup: Grid::new(0, 0, None),
            source: record,
        };
        game.reset_to_root();
        game
    }

    /// Game loaded from any supported record format
    pub fn from_data(config: GameConfig, data: &str) -> Result<Self, DataError> {
        let mut game = Self::new(config);
        game.load(data)?;
        Ok(game)
    }

    /// Replace the current record with `data`.
    ///
    /// On failure the game falls back to a blank board of the configured
    /// size and the error is returned.
    pub fn load(&mut self, data: &str) -> Result<(), DataError> {
        let result = format::parse_record(data).and_then(|record| self.load_record(record));
        if let Err(err) = &result {
            tracing::error!("Failed to load record ({}): {}", err.code(), err);
            self.load_blank();
        }
        result
    }

    /// Replace the current record with an already parsed one
    pub fn load_record(&mut self, record: JgfRecord) -> Result<(), DataError> {
        self.tree = build_tree(&record.tree);
        self.info = record.info.clone();
        self.source = record;

        if let Err(err) = self.first() {
            self.load_blank();
            return Err(DataError::MalformedJgf(format!(
                "root node cannot be replayed: {}",
                err
            )));
        }

        tracing::debug!(
            "Loaded {}x{} record with {} nodes",
            self.info.board.width,
            self.info.board.height,
            self.tree.len()
        );
        Ok(())
    }

    /// Reload the record last passed to `load`
    pub fn reload(&mut self) -> Result<(), DataError> {
        let record = self.source.clone();
        self.load_record(record)
    }

    fn load_blank(&mut self) {
        let size = self.config.board_size;
        let record = template::blank_record(size, size);
        self.tree = build_tree(&record.tree);
        self.info = record.info.clone();
        self.source = record;
        self.reset_to_root();
    }

    /// Point at the root with its setup applied, without validation
    fn reset_to_root(&mut self) {
        if self.first().is_ok() {
            return;
        }
        let blank = self.blank_position();
        self.markup = Grid::new(blank.width(), blank.height(), None);
        self.history = vec![blank];
        self.node = self.tree.root();
        self.path = Path::new();
    }

    /// Empty board for the record's size. Handicap games start with
    /// White to move.
    fn blank_position(&self) -> Position {
        let mut position = Position::new(self.info.board.width, self.info.board.height);
        if self.info.game.handicap.unwrap_or(0) >= 2 {
            position.turn = Color::White;
        }
        position
    }

    /// Position reached by applying node `id` on top of `history`
    fn execute(&self, id: NodeId, history: &[Position]) -> Result<Position, PositionError> {
        let node = self.tree.node(id);
        let current = match history.last() {
            Some(position) => position,
            None => return Ok(self.blank_position()),
        };

        let mut next = match node.mv {
            Some(Move::Place { x, y, color }) => {
                RuleValidator::new(history, &self.config).play(Coord::new(x, y), color)?
            }
            Some(Move::Pass { color }) => {
                let mut next = current.clone_board();
                next.turn = color.opposite();
                next
            }
            None => current.clone_board(),
        };

        for stone in &node.setup {
            next.set(stone.coord(), stone.color);
        }
        if let Some(turn) = node.turn {
            next.turn = turn;
        }

        Ok(next)
    }

    fn refresh_markup(&mut self) {
        let position = self.position();
        let mut markup = Grid::new(position.width(), position.height(), None);
        for mark in &self.tree.node(self.node).markup {
            markup.set(mark.coord(), Some(mark.kind.clone()));
        }
        self.markup = markup;
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            node: self.node,
            path: self.path.clone(),
            history: self.history.clone(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.node = checkpoint.node;
        self.path = checkpoint.path;
        self.history = checkpoint.history;
        self.refresh_markup();
    }

    /// Commit a step into child `index` of the current node
    fn enter(&mut self, index: usize, child: NodeId, position: Position) {
        self.tree.node_mut(self.node).remembered_path = index;
        self.history.push(position);
        self.path.advance(index);
        self.node = child;
        self.refresh_markup();
    }

    // ----- navigation -----

    /// Go to the root, replaying its setup on a blank board
    pub fn first(&mut self) -> Result<(), PositionError> {
        let root = self.tree.root();
        let base = vec![self.blank_position()];
        let position = self.execute(root, &base)?;
        self.history = vec![position];
        self.node = root;
        self.path = Path::new();
        self.refresh_markup();
        Ok(())
    }

    /// Step into a child: `child` when given, else the remembered branch.
    ///
    /// Returns `Ok(false)` when there is no such child. A rules violation
    /// is returned with the game unchanged.
    pub fn next(&mut self, child: Option<usize>) -> Result<bool, PositionError> {
        let children = self.tree.children(self.node);
        if children.is_empty() {
            return Ok(false);
        }

        let index = match child {
            Some(index) if index < children.len() => index,
            Some(index) => {
                tracing::debug!("No child {} to step into", index);
                return Ok(false);
            }
            None => {
                let remembered = self.tree.node(self.node).remembered_path;
                if remembered < children.len() {
                    remembered
                } else {
                    0
                }
            }
        };

        let target = children[index];
        let position = self.execute(target, &self.history)?;
        self.enter(index, target, position);
        tracing::debug!("Advanced to move {}", self.path.move_number());
        Ok(true)
    }

    /// Step back to the parent. Returns false at the root.
    pub fn previous(&mut self) -> bool {
        let parent = match self.tree.parent(self.node) {
            Some(parent) => parent,
            None => return false,
        };
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.path.retreat();
        self.node = parent;
        self.refresh_markup();
        true
    }

    /// Follow remembered branches to the end of the line.
    ///
    /// On a rules violation the game returns to where it started.
    pub fn last(&mut self) -> Result<(), PositionError> {
        let checkpoint = self.checkpoint();
        loop {
            match self.next(None) {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(err) => {
                    self.rollback(checkpoint);
                    return Err(err);
                }
            }
        }
    }

    /// Jump to a move number, a named node or a path.
    ///
    /// Returns whether the target was reached; a missing branch stops the
    /// walk early. On a rules violation nothing changes.
    pub fn goto(&mut self, target: impl Into<GotoTarget>) -> Result<bool, PositionError> {
        let checkpoint = self.checkpoint();
        let result = match target.into() {
            GotoTarget::Move(n) => self.goto_move(n),
            GotoTarget::Path(path) => self.goto_path(&path),
            GotoTarget::Name(name) => match self.tree.find_by_name(&name) {
                Some(id) => {
                    let path = self.tree.path_to(id);
                    self.goto_path(&path)
                }
                None => {
                    tracing::debug!("No node named '{}'", name);
                    Ok(false)
                }
            },
        };

        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    /// Keeps the branch choices recorded up to `target` and takes the
    /// default child beyond them
    fn goto_move(&mut self, target: usize) -> Result<bool, PositionError> {
        let mut path = self.path.clone();
        path.set_move(target);
        self.goto_path(&path)
    }

    fn goto_path(&mut self, path: &Path) -> Result<bool, PositionError> {
        self.first()?;
        for step in 1..=path.move_number() {
            if !self.next(Some(path.node_at(step)))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Advance to the next node with several children, or to the end.
    /// Returns whether the game moved.
    pub fn next_fork(&mut self) -> Result<bool, PositionError> {
        let checkpoint = self.checkpoint();
        let mut moved = false;
        loop {
            match self.next(None) {
                Ok(true) => moved = true,
                Ok(false) => break,
                Err(err) => {
                    self.rollback(checkpoint);
                    return Err(err);
                }
            }
            if self.tree.children(self.node).len() != 1 {
                break;
            }
        }
        Ok(moved)
    }

    /// Step back to the previous node with several children, or to the
    /// root. Returns whether the game moved.
    pub fn previous_fork(&mut self) -> bool {
        let mut moved = false;
        while self.previous() {
            moved = true;
            if self.tree.children(self.node).len() > 1 {
                break;
            }
        }
        moved
    }

    /// Remove the current node when it is a leaf, stepping to its parent.
    pub fn undo(&mut self) -> bool {
        let id = self.node;
        if !self.tree.children(id).is_empty() || !self.previous() {
            return false;
        }
        self.tree.remove(id);
        tracing::debug!("Removed node at move {}", self.path.move_number() + 1);
        true
    }

    // ----- moves -----

    fn find_child(&self, mv: Move) -> Option<usize> {
        self.tree
            .children(self.node)
            .iter()
            .position(|child| self.tree.node(*child).mv == Some(mv))
    }

    /// Play a stone for `color`, or for the side to move.
    ///
    /// An existing child with the same move is entered instead of adding a
    /// duplicate branch. Returns whether the move was made.
    pub fn play(&mut self, x: u8, y: u8, color: Option<Color>) -> Result<bool, PositionError> {
        let color = color.unwrap_or(self.position().turn);
        let mv = Move::Place { x, y, color };

        if let Some(index) = self.find_child(mv) {
            return self.next(Some(index));
        }

        let position =
            RuleValidator::new(&self.history, &self.config).play(Coord::new(x, y), color)?;
        let child = self.tree.add_child(self.node, Node::with_move(mv));
        let index = self.tree.children(self.node).len() - 1;
        self.enter(index, child, position);
        tracing::debug!("Played {} at ({}, {})", color, x, y);
        Ok(true)
    }

    /// Pass for `color`, or for the side to move, entering an existing
    /// pass child when there is one. Returns whether the pass was made.
    pub fn pass(&mut self, color: Option<Color>) -> bool {
        let color = color.unwrap_or(self.position().turn);
        let mv = Move::Pass { color };

        if let Some(index) = self.find_child(mv) {
            return match self.next(Some(index)) {
                Ok(entered) => entered,
                Err(err) => {
                    tracing::warn!("Existing pass could not be replayed: {}", err);
                    false
                }
            };
        }

        let mut position = self.position().clone_board();
        position.turn = color.opposite();
        let child = self.tree.add_child(self.node, Node::with_move(mv));
        let index = self.tree.children(self.node).len() - 1;
        self.enter(index, child, position);
        true
    }

    /// Whether `color` (or the side to move) may play at `(x, y)`
    pub fn is_valid_move(&self, x: u8, y: u8, color: Option<Color>) -> bool {
        let color = color.unwrap_or(self.position().turn);
        RuleValidator::new(&self.history, &self.config)
            .check_move(Coord::new(x, y), color)
            .is_ok()
    }

    // ----- board queries -----

    pub fn has_stone(&self, x: u8, y: u8) -> bool {
        self.position().has_stone(Coord::new(x, y))
    }

    pub fn get_stone(&self, x: u8, y: u8) -> Option<Color> {
        self.position().get(Coord::new(x, y))
    }

    pub fn has_markup(&self, x: u8, y: u8) -> bool {
        self.markup.has(Coord::new(x, y))
    }

    pub fn get_markup(&self, x: u8, y: u8) -> Option<&MarkupKind> {
        self.markup.get(Coord::new(x, y)).as_ref()
    }

    // ----- board editing -----

    /// Make sure setup edits land on a move-less node
    fn ensure_edit_node(&mut self) {
        if !self.tree.node(self.node).is_move() {
            return;
        }
        let position = self.position().clone_board();
        let child = self.tree.add_child(self.node, Node::new());
        let index = self.tree.children(self.node).len() - 1;
        self.enter(index, child, position);
    }

    fn position_mut(&mut self) -> &mut Position {
        let last = self.history.len() - 1;
        &mut self.history[last]
    }

    /// Place a setup stone. Returns `Ok(false)` when the same stone is
    /// already there.
    pub fn add_stone(&mut self, x: u8, y: u8, color: Color) -> Result<bool, PositionError> {
        let coord = Coord::new(x, y);
        if !self.position().contains(coord) {
            return Err(PositionError::OutOfBounds { coord, color });
        }
        if self.position().get(coord) == Some(color) {
            return Ok(false);
        }

        self.ensure_edit_node();
        let node = self.tree.node_mut(self.node);
        node.setup.retain(|stone| stone.coord() != coord);
        node.setup.push(SetupStone {
            x,
            y,
            color: Some(color),
        });
        self.position_mut().set(coord, Some(color));
        Ok(true)
    }

    /// Remove a stone from the board. Returns false when the point is empty.
    pub fn remove_stone(&mut self, x: u8, y: u8) -> bool {
        let coord = Coord::new(x, y);
        if !self.position().has_stone(coord) {
            return false;
        }

        self.ensure_edit_node();
        let len = self.history.len();
        let existed_before = len >= 2 && self.history[len - 2].has_stone(coord);

        let node = self.tree.node_mut(self.node);
        node.setup.retain(|stone| stone.coord() != coord);
        if existed_before {
            node.setup.push(SetupStone { x, y, color: None });
        }
        self.position_mut().set(coord, None);
        true
    }

    /// Attach markup to the current node, replacing any markup at the point
    pub fn add_markup(&mut self, x: u8, y: u8, kind: MarkupKind) -> bool {
        let coord = Coord::new(x, y);
        if !self.markup.contains(coord) {
            return false;
        }
        let node = self.tree.node_mut(self.node);
        node.markup.retain(|mark| mark.coord() != coord);
        node.markup.push(Markup {
            x,
            y,
            kind: kind.clone(),
        });
        self.markup.set(coord, Some(kind));
        true
    }

    pub fn remove_markup(&mut self, x: u8, y: u8) -> bool {
        let coord = Coord::new(x, y);
        if !self.markup.has(coord) {
            return false;
        }
        self.tree
            .node_mut(self.node)
            .markup
            .retain(|mark| mark.coord() != coord);
        self.markup.unset(coord);
        true
    }

    // ----- accessors -----

    /// The current position
    pub fn position(&self) -> &Position {
        // History is never empty: every constructor and load path ends in
        // `first` or `reset_to_root`.
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[Position] {
        &self.history
    }

    pub fn node(&self) -> &Node {
        self.tree.node(self.node)
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut Info {
        &mut self.info
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn markup(&self) -> &Grid<Option<MarkupKind>> {
        &self.markup
    }

    pub fn source(&self) -> &JgfRecord {
        &self.source
    }

    // ----- state -----

    pub fn get_state(&self) -> GameSnapshot {
        GameSnapshot {
            jgf: self.to_jgf(),
            path: self.path.clone(),
        }
    }

    /// Load a snapshot and return to its path
    pub fn restore_state(&mut self, state: GameSnapshot) -> Result<(), Error> {
        self.load_record(state.jgf)?;
        self.goto(GotoTarget::Path(state.path))?;
        Ok(())
    }

    /// Stones captured by `color` along the current line
    pub fn get_capture_count(&self, color: Color) -> usize {
        self.history
            .iter()
            .map(|position| position.captures(color.opposite()).len())
            .sum()
    }

    pub fn get_komi(&self) -> f64 {
        self.info.game.komi.unwrap_or(0.0)
    }

    pub fn set_komi(&mut self, komi: f64) {
        self.info.game.komi = Some(komi);
    }

    // ----- export -----

    pub fn to_jgf(&self) -> JgfRecord {
        JgfRecord::from_tree(self.info.clone(), &self.tree)
    }

    pub fn to_sgf(&self) -> String {
        sgf::to_sgf(&self.to_jgf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_has_blank_board() {
        let game = Game::new(GameConfig {
            board_size: 9,
            ..GameConfig::default()
        });
        assert_eq!(game.position().width(), 9);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.path().move_number(), 0);
        assert_eq!(game.position().turn, Color::Black);
    }

    #[test]
    fn failed_load_falls_back_to_blank() {
        let mut game = Game::new(GameConfig {
            board_size: 13,
            ..GameConfig::default()
        });
        let err = game.load("(;B[aa]").unwrap_err();
        assert_eq!(err.code(), "SGF_ERROR");
        assert_eq!(game.position().width(), 13);
        assert!(game.tree().is_empty());
        assert_eq!(game.load(""), Err(DataError::NoData));
    }

    #[test]
    fn handicap_gives_white_the_first_move() {
        let game = Game::from_data(GameConfig::default(), "(;SZ[9]HA[2]AB[cc][gg])").unwrap();
        assert_eq!(game.position().turn, Color::White);
        assert!(game.has_stone(2, 2));
    }

    #[test]
    fn markup_follows_the_current_node() {
        let mut game = Game::default();
        game.play(3, 3, None).unwrap();
        assert!(game.add_markup(3, 3, MarkupKind::Triangle));
        assert_eq!(game.get_markup(3, 3), Some(&MarkupKind::Triangle));
        game.previous();
        assert!(!game.has_markup(3, 3));
        game.next(None).unwrap();
        assert!(game.has_markup(3, 3));
        assert!(game.remove_markup(3, 3));
        assert!(game.node().markup.is_empty());
    }
}
