// SPDX-License-Identifier: MIT OR Apache-2.0

use kifu_core::Path;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn retreat_undoes_advance() {
    let mut rng = StdRng::seed_from_u64(0x6b69_6675);
    let mut path = Path::new();
    let mut previous: Vec<Path> = Vec::new();

    for _ in 0..2000 {
        if previous.is_empty() || rng.gen_bool(0.6) {
            previous.push(path.clone());
            let child = if rng.gen_bool(0.5) { 0 } else { rng.gen_range(1..4) };
            path.advance(child);
        } else {
            path.retreat();
            let expected = previous.pop().unwrap();
            assert_eq!(path, expected);
            assert!(path.compare(&expected));
        }
    }
}

#[test]
fn set_move_drops_later_choices_only() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let mut path = Path::new();
        let length = rng.gen_range(1..40);
        for _ in 0..length {
            path.advance(rng.gen_range(0..3));
        }

        let before: Vec<(usize, usize)> = path.variations().collect();
        let target = rng.gen_range(0..length);
        path.set_move(target);

        let after: Vec<(usize, usize)> = path.variations().collect();
        let expected: Vec<(usize, usize)> =
            before.into_iter().filter(|(m, _)| *m <= target).collect();
        assert_eq!(after, expected);
        assert_eq!(path.move_number(), target);
        assert_eq!(path.branches(), after.len());
    }
}

#[test]
fn set_move_forward_keeps_choices() {
    let mut path = Path::new();
    path.advance(2);
    path.set_move(10);
    assert_eq!(path.move_number(), 10);
    assert_eq!(path.node_at(1), 2);
}

#[test]
fn compare_detects_branch_differences() {
    let mut a = Path::at(3);
    let mut b = Path::at(2);
    assert!(!a.compare(&b));
    b.advance(0);
    assert!(a.compare(&b));

    a.advance(1);
    b.advance(2);
    assert!(!a.compare(&b));
}

#[test]
fn retreat_at_root_stays_at_root() {
    let mut path = Path::new();
    path.retreat();
    assert_eq!(path, Path::new());
}
