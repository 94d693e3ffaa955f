// SPDX-License-Identifier: MIT OR Apache-2.0

use kifu_core::{Color, Coord, Grid, Position};

#[test]
fn compare_with_itself_is_empty() {
    let mut grid = Grid::new(9, 9, None);
    grid.set(Coord::new(2, 3), Some(Color::Black));
    let diff = grid.compare(&grid.clone());
    assert!(diff.add.is_empty());
    assert!(diff.remove.is_empty());
}

#[test]
fn compare_reports_one_new_stone() {
    let grid = Grid::new(9, 9, None);
    let mut other = grid.clone();
    other.set(Coord::new(4, 4), Some(Color::White));

    let diff = grid.compare(&other);
    assert_eq!(diff.add.len(), 1);
    assert!(diff.remove.is_empty());
    assert_eq!(diff.add[0].coord(), Coord::new(4, 4));
    assert_eq!(diff.add[0].value, Some(Color::White));
}

#[test]
fn replaced_value_is_both_added_and_removed() {
    let mut grid = Grid::new(3, 3, 0u8);
    grid.set(Coord::new(1, 1), 1);
    let mut other = grid.clone();
    other.set(Coord::new(1, 1), 2);

    let diff = grid.compare(&other);
    assert_eq!(diff.add.len(), 1);
    assert_eq!(diff.remove.len(), 1);
    assert_eq!(diff.remove[0].value, 1);
}

#[test]
fn size_mismatch_degrades_safely() {
    let small = Grid::new(5, 5, None::<Color>);
    let large = Grid::new(9, 9, None::<Color>);
    assert!(small.compare(&large).is_empty());
    assert!(!small.is_same_as(&large));
}

#[test]
fn out_of_bounds_access() {
    let mut grid = Grid::new(4, 2, '.');
    assert_eq!(*grid.get(Coord::new(4, 0)), '.');
    assert!(!grid.set(Coord::new(0, 2), 'x'));
    assert!(!grid.has(Coord::new(9, 9)));
    assert!(grid.is_empty());
}

#[test]
fn all_lists_cells_by_column() {
    let mut grid = Grid::new(3, 3, 0u8);
    grid.set(Coord::new(2, 0), 3);
    grid.set(Coord::new(0, 2), 1);
    grid.set(Coord::new(0, 1), 2);

    let coords: Vec<(u8, u8)> = grid.all().iter().map(|e| (e.x, e.y)).collect();
    assert_eq!(coords, vec![(0, 1), (0, 2), (2, 0)]);
}

#[test]
fn populate_and_resize() {
    let mut grid = Grid::new(3, 3, 0u8);
    grid.populate(7);
    assert!(grid.is(Coord::new(2, 2), &7));
    grid.set_size(2, 4);
    assert_eq!(grid.width(), 2);
    assert_eq!(grid.height(), 4);
    assert!(grid.is_empty());
}

#[test]
fn position_diff_is_keyed_by_color() {
    let before = Position::new(9, 9);
    let mut after = before.clone_board();
    after.set(Coord::new(1, 1), Some(Color::Black));
    let diff = before.compare(&after);
    assert_eq!(diff.add.len(), 1);
    assert_eq!(diff.add[0].value, Color::Black);
}
