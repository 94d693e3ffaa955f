// SPDX-License-Identifier: MIT OR Apache-2.0

use kifu_core::{
    Color, Coord, DataError, Error, Game, GameConfig, GameSnapshot, GotoTarget, MarkupKind, Move,
    Path, PositionErrorKind,
};

fn nine() -> Game {
    Game::new(GameConfig {
        board_size: 9,
        ..GameConfig::default()
    })
}

fn assert_history_matches_path(game: &Game) {
    assert_eq!(game.history().len(), game.path().move_number() + 1);
}

#[test]
fn center_move_scenario() {
    let mut game = nine();
    assert!(game.play(4, 4, Some(Color::Black)).unwrap());
    assert!(game.play(4, 5, Some(Color::White)).unwrap());
    assert!(game.position().has_liberties(Coord::new(4, 5), None));
    assert!(!game.is_valid_move(4, 4, Some(Color::Black)));
    assert!(game.is_valid_move(3, 3, None));
    assert_eq!(game.position().turn, Color::Black);
    assert_history_matches_path(&game);
}

#[test]
fn loading_text_record_scenario() {
    let mut game =
        Game::from_data(GameConfig::default(), "(;GM[1]SZ[9]KM[6.5];B[ee];W[ff])").unwrap();
    assert_eq!(game.info().board.width, 9);
    assert_eq!(game.info().board.height, 9);
    assert_eq!(game.get_komi(), 6.5);

    assert!(game.next(None).unwrap());
    assert_eq!(
        game.node().mv,
        Some(Move::Place {
            x: 4,
            y: 4,
            color: Color::Black
        })
    );
    assert!(game.next(None).unwrap());
    assert!(!game.next(None).unwrap());
    assert_eq!(game.tree().move_number(game.node_id()), 2);
    assert_history_matches_path(&game);
}

#[test]
fn capture_counts_follow_the_line() {
    let mut game = nine();
    game.play(1, 0, Some(Color::Black)).unwrap();
    game.play(0, 0, Some(Color::White)).unwrap();
    game.play(0, 1, Some(Color::Black)).unwrap();
    assert!(!game.has_stone(0, 0));
    assert_eq!(game.get_capture_count(Color::Black), 1);
    assert_eq!(game.get_capture_count(Color::White), 0);

    game.previous();
    assert!(game.has_stone(0, 0));
    assert_eq!(game.get_capture_count(Color::Black), 0);
}

fn ko_game(config: GameConfig) -> Game {
    let mut game = Game::new(GameConfig {
        board_size: 9,
        ..config
    });
    for (x, y) in [(1, 0), (0, 1), (1, 2)] {
        game.add_stone(x, y, Color::Black).unwrap();
    }
    for (x, y) in [(1, 1), (2, 0), (3, 1), (2, 2)] {
        game.add_stone(x, y, Color::White).unwrap();
    }
    game.play(2, 1, Some(Color::Black)).unwrap();
    game
}

#[test]
fn ko_is_rejected_with_rollback() {
    let mut game = ko_game(GameConfig::default());
    let path = game.path().clone();
    let node = game.node_id();
    let history = game.history().len();

    let err = game.play(1, 1, Some(Color::White)).unwrap_err();
    assert_eq!(err.kind(), PositionErrorKind::Repeating);
    assert_eq!(game.path(), &path);
    assert_eq!(game.node_id(), node);
    assert_eq!(game.history().len(), history);
    assert!(game.tree().children(node).is_empty());
}

#[test]
fn ko_is_allowed_without_repeat_check() {
    let mut game = ko_game(GameConfig::relaxed());
    assert!(game.play(1, 1, Some(Color::White)).unwrap());
    assert!(!game.has_stone(2, 1));
}

#[test]
fn suicide_rejected_unless_allowed() {
    let mut strict = nine();
    strict.add_stone(1, 0, Color::White).unwrap();
    strict.add_stone(0, 1, Color::White).unwrap();
    let err = strict.play(0, 0, Some(Color::Black)).unwrap_err();
    assert_eq!(err.kind().code(), "SUICIDE");

    let mut relaxed = Game::new(GameConfig {
        board_size: 9,
        ..GameConfig::relaxed()
    });
    relaxed.add_stone(1, 0, Color::White).unwrap();
    relaxed.add_stone(0, 1, Color::White).unwrap();
    assert!(relaxed.play(0, 0, Some(Color::Black)).unwrap());
    assert!(!relaxed.has_stone(0, 0));
    assert_eq!(relaxed.get_capture_count(Color::White), 1);
}

#[test]
fn replaying_an_illegal_record_rolls_back() {
    let mut game = Game::from_data(GameConfig::default(), "(;SZ[9];B[aa];W[aa];B[bb])").unwrap();
    assert!(game.next(None).unwrap());
    let err = game.next(None).unwrap_err();
    assert_eq!(err.kind(), PositionErrorKind::AlreadyHasStone);
    assert_eq!(game.path().move_number(), 1);
    assert_history_matches_path(&game);

    game.first().unwrap();
    assert!(game.last().is_err());
    assert_eq!(game.path().move_number(), 0);
}

#[test]
fn playing_an_existing_move_reuses_the_branch() {
    let mut game = nine();
    game.play(2, 2, None).unwrap();
    game.previous();
    assert!(game.play(2, 2, None).unwrap());
    assert_eq!(game.tree().children(game.tree().root()).len(), 1);
    assert_eq!(game.get_stone(2, 2), Some(Color::Black));

    game.previous();
    assert!(game.play(6, 6, None).unwrap());
    assert_eq!(game.tree().children(game.tree().root()).len(), 2);
    assert_eq!(game.path().node_at(1), 1);
}

#[test]
fn pass_creates_a_node_once() {
    let mut game = nine();
    assert!(game.pass(None));
    assert_eq!(game.position().turn, Color::White);
    game.previous();
    assert!(game.pass(Some(Color::Black)));
    assert!(game.node().mv.map(|mv| mv.is_pass()).unwrap_or(false));
    assert_eq!(game.tree().children(game.tree().root()).len(), 1);
}

const BRANCHED: &str = "(;SZ[9];B[aa];W[ii](;B[bb];W[hh])(;B[cc]N[alt];W[gg]))";

#[test]
fn goto_targets() {
    let mut game = Game::from_data(GameConfig::default(), BRANCHED).unwrap();

    assert!(game.goto(4).unwrap());
    assert_eq!(game.get_stone(7, 7), Some(Color::White));
    assert!(game.goto(1).unwrap());
    assert_eq!(game.path().move_number(), 1);
    assert!(!game.goto(12).unwrap());
    assert_history_matches_path(&game);

    assert!(game.goto("alt").unwrap());
    assert_eq!(game.node().name.as_deref(), Some("alt"));
    assert_eq!(game.path().node_at(3), 1);
    assert!(!game.goto(GotoTarget::Name("missing".into())).unwrap());

    let mut path = Path::new();
    path.advance(0);
    path.advance(0);
    path.advance(1);
    path.advance(0);
    assert!(game.goto(path.clone()).unwrap());
    assert_eq!(game.get_stone(6, 6), Some(Color::White));
    assert_eq!(game.path(), &path);
}

#[test]
fn goto_move_number_takes_the_main_line_past_the_kept_choices() {
    let mut game = Game::from_data(GameConfig::default(), BRANCHED).unwrap();
    game.goto("alt").unwrap();
    assert!(game.goto(2).unwrap());
    assert_eq!(game.path().branches(), 0);

    assert!(game.goto(4).unwrap());
    assert_eq!(game.get_stone(1, 1), Some(Color::Black));
    assert!(!game.has_stone(2, 2));
    assert_eq!(game.path().branches(), 0);
    assert_eq!(game.path(), &Path::at(4));
    assert_history_matches_path(&game);

    // Choices at or before the target survive
    game.goto("alt").unwrap();
    game.next(None).unwrap();
    assert!(game.goto(3).unwrap());
    assert_eq!(game.path().node_at(3), 1);
    assert_eq!(game.node().name.as_deref(), Some("alt"));
}

#[test]
fn remembered_branch_is_followed() {
    let mut game = Game::from_data(GameConfig::default(), BRANCHED).unwrap();
    game.goto("alt").unwrap();
    game.first().unwrap();
    game.last().unwrap();
    assert_eq!(game.get_stone(6, 6), Some(Color::White));
    assert!(!game.has_stone(1, 1));
}

#[test]
fn fork_navigation() {
    let mut game = Game::from_data(GameConfig::default(), BRANCHED).unwrap();
    assert!(game.next_fork().unwrap());
    assert_eq!(game.path().move_number(), 2);
    assert_eq!(game.tree().children(game.node_id()).len(), 2);

    assert!(game.next_fork().unwrap());
    assert_eq!(game.path().move_number(), 4);

    assert!(game.previous_fork());
    assert_eq!(game.path().move_number(), 2);
    assert!(game.previous_fork());
    assert_eq!(game.path().move_number(), 0);
    assert!(!game.previous_fork());
}

#[test]
fn undo_removes_leaves_only() {
    let mut game = Game::from_data(GameConfig::default(), BRANCHED).unwrap();
    game.goto("alt").unwrap();
    assert!(!game.undo());
    game.next(None).unwrap();
    assert!(game.undo());
    assert!(game.undo());
    assert_eq!(game.path().move_number(), 2);
    assert_eq!(game.tree().children(game.node_id()).len(), 1);
    assert_history_matches_path(&game);

    game.first().unwrap();
    assert!(!game.undo());
}

#[test]
fn stone_edits_never_touch_move_nodes() {
    let mut game = nine();
    game.play(4, 4, Some(Color::Black)).unwrap();
    let move_node = game.node_id();

    assert!(game.add_stone(0, 0, Color::White).unwrap());
    assert_ne!(game.node_id(), move_node);
    assert!(game.node().mv.is_none());
    assert_eq!(game.tree().parent(game.node_id()), Some(move_node));
    assert_history_matches_path(&game);
    assert!(!game.add_stone(0, 0, Color::White).unwrap());

    assert!(game.remove_stone(4, 4));
    assert!(game.remove_stone(0, 0));
    assert!(!game.remove_stone(0, 0));
    let setup = &game.node().setup;
    assert_eq!(setup.len(), 1);
    assert_eq!((setup[0].x, setup[0].y, setup[0].color), (4, 4, None));
    assert!(game.position().stones().is_empty());

    let err = game.add_stone(9, 9, Color::Black).unwrap_err();
    assert_eq!(err.kind(), PositionErrorKind::OutOfBounds);

    // The edit replays from the tree
    game.first().unwrap();
    game.last().unwrap();
    assert!(!game.has_stone(4, 4));
}

#[test]
fn markup_edits() {
    let mut game = nine();
    assert!(game.add_markup(2, 3, MarkupKind::Label("A".into())));
    assert!(game.add_markup(2, 3, MarkupKind::Circle));
    assert_eq!(game.node().markup.len(), 1);
    assert_eq!(game.get_markup(2, 3), Some(&MarkupKind::Circle));
    assert!(!game.add_markup(20, 3, MarkupKind::Circle));
    assert!(game.remove_markup(2, 3));
    assert!(!game.remove_markup(2, 3));
}

#[test]
fn state_round_trips_through_json() {
    let mut game = Game::from_data(GameConfig::default(), BRANCHED).unwrap();
    game.goto("alt").unwrap();
    game.play(4, 4, None).unwrap();
    let state = game.get_state();
    let json = serde_json::to_string(&state).unwrap();

    let mut other = Game::default();
    let restored: GameSnapshot = serde_json::from_str(&json).unwrap();
    other.restore_state(restored).unwrap();
    assert_eq!(other.path(), game.path());
    assert!(other.position().is_same_as(game.position()));
    assert_eq!(other.to_sgf(), game.to_sgf());
}

#[test]
fn restore_reports_bad_snapshots() {
    let mut game = Game::default();
    let mut state = Game::from_data(GameConfig::default(), "(;SZ[9];B[aa];W[aa])")
        .unwrap()
        .get_state();
    state.path = Path::at(2);
    assert!(matches!(game.restore_state(state), Err(Error::Position(_))));
}

#[test]
fn komi_and_export() {
    let mut game = nine();
    assert_eq!(game.get_komi(), 0.0);
    game.set_komi(5.5);
    game.play(2, 2, None).unwrap();
    let text = game.to_sgf();
    assert!(text.contains("KM[5.5]"));
    assert!(text.contains(";B[cc]"));

    let reloaded = Game::from_data(GameConfig::default(), &text).unwrap();
    assert_eq!(reloaded.get_komi(), 5.5);
    assert_eq!(reloaded.info().board.width, 9);
}

#[test]
fn load_failures() {
    let mut game = nine();
    game.play(1, 1, None).unwrap();
    assert_eq!(game.load("plain text"), Err(DataError::UnknownFormat));
    assert_eq!(game.path().move_number(), 0);
    assert!(game.tree().is_empty());
    assert!(!game.has_stone(1, 1));
}
