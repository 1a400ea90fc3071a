//! Text rendering of the board
//!
//! Rows run along `r`, each shifted half a cell per step so neighbors line up
//! the way they do on a hex grid. `#` is wall, `.` is open floor, `R` and `B`
//! are miners.

use hexmine_core::{Cell, Color, HexBoard};
use std::collections::BTreeMap;

fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Wall => '#',
        Cell::Empty => '.',
        Cell::Owned(Color::Red) => 'R',
        Cell::Owned(Color::Blue) => 'B',
    }
}

/// Render every cell, one line per row
pub fn render_board(board: &HexBoard) -> String {
    let radius = i32::from(board.size()) - 1;

    let mut rows: BTreeMap<i8, Vec<(i8, Cell)>> = BTreeMap::new();
    for (hex, cell) in board.iter() {
        rows.entry(hex.r).or_default().push((hex.q, cell));
    }

    let mut out = String::new();
    for (r, mut cells) in rows {
        cells.sort_by_key(|&(q, _)| q);
        let mut line = String::new();
        for (q, cell) in cells {
            let column = 2 * i32::from(q) + i32::from(r) + 2 * radius;
            while (line.chars().count() as i32) < column {
                line.push(' ');
            }
            line.push(glyph(cell));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Status line under the board
pub fn render_winner(winner: Option<Color>) -> String {
    match winner {
        Some(color) => format!("winner: {}", color),
        None => "winner: none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmine_core::Hex;

    #[test]
    fn test_row_count_and_shape() {
        let board = HexBoard::new(true);
        let text = render_board(&board);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        // top and bottom rows hold five cells, the middle row nine
        assert_eq!(lines[0].trim().chars().filter(|c| !c.is_whitespace()).count(), 5);
        assert_eq!(lines[4].trim().chars().filter(|c| !c.is_whitespace()).count(), 9);
        assert_eq!(lines[8].trim().chars().filter(|c| !c.is_whitespace()).count(), 5);
        assert!(lines[0].starts_with("    #"));
        assert!(lines[4].starts_with('#'));
    }

    #[test]
    fn test_glyph_counts() {
        let board = HexBoard::new(true);
        let text = render_board(&board);
        assert_eq!(text.matches('R').count(), 3);
        assert_eq!(text.matches('B').count(), 3);
        assert_eq!(text.matches('#').count(), 61 - 6);
        assert_eq!(text.matches('.').count(), 0);
    }

    #[test]
    fn test_origin_sits_mid_board() {
        let mut board = HexBoard::walled(true);
        board.set(Hex::ORIGIN, Cell::Empty).unwrap();
        let text = render_board(&board);
        let middle = text.lines().nth(4).unwrap();
        assert_eq!(middle.find('.'), Some(8));
    }

    #[test]
    fn test_winner_line() {
        assert_eq!(render_winner(Some(Color::Red)), "winner: red");
        assert_eq!(render_winner(None), "winner: none");
    }
}
