// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use kifu_core::{Color, Coord, Position};

/// Render a position as ASCII art, row 1 at the top
pub fn render_board(position: &Position) -> String {
    let (width, height) = (position.width(), position.height());
    let mut output = String::new();

    let labels = column_labels(width);
    output.push_str(&labels);

    for row in 0..height {
        // Row number (1-indexed)
        output.push_str(&format!("{:2} ", row + 1));

        for col in 0..width {
            let coord = Coord::new(col, row);
            let symbol = match position.get(coord) {
                Some(Color::Black) => '●',
                Some(Color::White) => '○',
                None if is_star_point(coord, width, height) => '+',
                None => '·',
            };
            output.push(' ');
            output.push(symbol);
        }

        // Add row number again on the right
        output.push_str(&format!(" {}", row + 1));
        output.push('\n');
    }

    output.push_str(&labels);
    output
}

fn column_labels(width: u8) -> String {
    let mut line = String::from("   ");
    for col in 0..width {
        line.push(' ');
        line.push(coord_to_column_char(col));
    }
    line.push('\n');
    line
}

/// Convert a column index to a column character (A-T, skipping I)
pub fn coord_to_column_char(col: u8) -> char {
    match col {
        0..=7 => (b'A' + col) as char,
        8..=24 => (b'A' + col + 1) as char, // Skip 'I'
        _ => '?',
    }
}

/// Check if a coordinate is a star point on a square board
fn is_star_point(coord: Coord, width: u8, height: u8) -> bool {
    if width != height {
        return false;
    }
    let points: &[u8] = match width {
        9 => &[2, 4, 6],
        13 => &[3, 6, 9],
        19 => &[3, 9, 15],
        _ => return false,
    };
    if !points.contains(&coord.x) || !points.contains(&coord.y) {
        return false;
    }
    // 9x9 and 13x13 only mark the corners and the center
    width == 19 || coord.x == coord.y || coord.x + coord.y == width - 1
}
