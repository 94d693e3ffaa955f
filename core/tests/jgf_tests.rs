// SPDX-License-Identifier: MIT OR Apache-2.0

use kifu_core::format::jgf::{JgfEntry, JgfMove, JgfRecord};
use kifu_core::format::{parse_record, sgf};
use kifu_core::{Color, DataError, Game, GameConfig, GameSnapshot};

const RECORD: &str = r#"{
    "record": {"application": "test", "charset": "UTF-8"},
    "game": {
        "type": "go",
        "komi": 7.5,
        "players": [{"color": "B", "name": "Kuksu"}, {"color": "W", "name": "Meijin"}],
        "result": "W+R",
        "timeLimit": "3600"
    },
    "board": {"width": 9, "height": 9},
    "tree": [
        {"comments": "start"},
        {"move": {"B": [2, 2]}},
        [
            [{"move": {"W": [6, 6]}}, {"move": "pass"}],
            [{"move": {"W": [6, 2]}, "name": "other"}]
        ]
    ]
}"#;

#[test]
fn record_fields_decode() {
    let record = JgfRecord::parse(RECORD).unwrap();
    assert_eq!(record.info.record.application.as_deref(), Some("test"));
    assert_eq!(record.info.game.komi, Some(7.5));
    assert_eq!(record.info.game.time_limit.as_deref(), Some("3600"));
    assert_eq!(
        record.info.game.player(Color::White).unwrap().name.as_deref(),
        Some("Meijin")
    );
    assert_eq!(record.info.board.width, 9);
    assert_eq!(record.tree.len(), 3);
    assert!(matches!(record.tree[2], JgfEntry::Variations(ref b) if b.len() == 2));
}

#[test]
fn json_round_trip() {
    let record = JgfRecord::parse(RECORD).unwrap();
    let json = record.to_json().unwrap();
    assert_eq!(JgfRecord::parse(&json).unwrap(), record);
}

#[test]
fn game_export_matches_input_tree() {
    let game = Game::from_data(GameConfig::default(), RECORD).unwrap();
    let exported = game.to_jgf();
    let source = JgfRecord::parse(RECORD).unwrap();
    assert_eq!(exported.info, source.info);

    // The bare pass gains its implied color
    match &exported.tree[2] {
        JgfEntry::Variations(branches) => match &branches[0][1] {
            JgfEntry::Node(node) => {
                assert_eq!(node.mv, Some(JgfMove::Pass { color: Some(Color::Black) }))
            }
            other => panic!("expected node, got {:?}", other),
        },
        other => panic!("expected variations, got {:?}", other),
    }
}

#[test]
fn converts_to_text_format() {
    let record = JgfRecord::parse(RECORD).unwrap();
    let text = sgf::to_sgf(&record);
    assert!(text.starts_with("(;FF[4]GM[1]SZ[9]KM[7.5]PB[Kuksu]PW[Meijin]"));
    assert!(text.contains("TM[3600]"));
    assert!(text.contains(";B[cc]("));
    assert!(text.contains("(;W[gg];B[])"));
    assert!(text.contains("(;W[gc]N[other])"));

    let back = sgf::parse_sgf(&text).unwrap();
    assert_eq!(back.info.game.result.as_deref(), Some("W+R"));
}

#[test]
fn malformed_json_is_a_data_error() {
    let err = parse_record(r#"{"tree": [{"move": {"X": [1, 1]}}]}"#).unwrap_err();
    assert_eq!(err.code(), "JGF_ERROR");
    assert!(matches!(parse_record("{not json"), Err(DataError::MalformedJgf(_))));

    let loose_branch = r#"{"tree": [{}, [{"move": {"B": [0, 0]}}]]}"#;
    assert!(matches!(parse_record(loose_branch), Err(DataError::MalformedJgf(_))));
}

/// Every move but the last forks into a further line and a one-move side line
fn nested_branches(depth: usize) -> String {
    let mut text = String::from("(;SZ[19]");
    text.push_str(&"(;B[aa]".repeat(depth));
    text.push_str(&"(;W[cc]))".repeat(depth));
    text.push(')');
    text
}

#[test]
fn deeply_nested_variations_survive_json() {
    let depth = 300;
    let game = Game::from_data(GameConfig::default(), &nested_branches(depth)).unwrap();
    assert_eq!(game.tree().len(), 2 * depth + 1);
    let root = game.tree().root();
    assert_eq!(game.tree().children(game.tree().children(root)[0]).len(), 2);

    let json = game.to_jgf().to_json().unwrap();
    let reloaded = Game::from_data(GameConfig::default(), &json).unwrap();
    assert_eq!(reloaded.tree().len(), 2 * depth + 1);
    assert_eq!(reloaded.to_jgf(), game.to_jgf());

    let pretty = game.to_jgf().to_json_pretty().unwrap();
    assert_eq!(JgfRecord::parse(&pretty).unwrap(), game.to_jgf());

    let state = GameSnapshot::from_json(&game.get_state().to_json().unwrap()).unwrap();
    let mut restored = Game::default();
    restored.restore_state(state).unwrap();
    assert_eq!(restored.to_sgf(), game.to_sgf());
}
