//! Connectivity queries over a board
//!
//! Flood fills for reachability, the mining crowding rule, dead-miner
//! detection and the dead-miner sweep. Everything here is a pure function of
//! the board except [`clear_dead`].
//!
//! Off-board coordinates are never an error for the predicates: they simply
//! are not walkable, not mineable and not reachable.

use crate::board::{BoardError, Cell, Color, HexBoard};
use crate::hex::Hex;
use crate::provider::Move;

/// A wall with more open neighbors than this can't be mined
const MAX_OPEN_NEIGHBORS: usize = 3;
/// An open neighbor already touching this many open cells blocks mining
const CROWDED_NEIGHBOR: usize = 3;
/// Distinct enemy contacts that kill an unsupported miner
const DEADLY_CONTACTS: usize = 2;

// ============================================================================
// NEIGHBORS
// ============================================================================

/// On-board neighbors of `hex`, optionally restricted to one cell state
pub fn neighbors_of(board: &HexBoard, hex: Hex, filter: Option<Cell>) -> Vec<Hex> {
    hex.neighbors()
        .into_iter()
        .filter(|&n| match board.get(n) {
            Ok(cell) => filter.map_or(true, |f| f == cell),
            Err(_) => false,
        })
        .collect()
}

fn open_neighbor_count(board: &HexBoard, index: usize) -> usize {
    board
        .adjacent(index)
        .iter()
        .filter(|&&n| board.cell_at(n).is_open())
        .count()
}

// ============================================================================
// WALKABILITY
// ============================================================================

/// Mark every empty cell a piece at `start` could walk to.
/// The fill passes through `start`'s own state and empty cells only.
fn mark_walkable(board: &HexBoard, start: usize, reached: &mut [bool]) {
    let own = board.cell_at(start);
    if own == Cell::Wall {
        return;
    }

    let mut visited = vec![false; board.len()];
    visited[start] = true;
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        for &n in board.adjacent(current) {
            if visited[n] {
                continue;
            }
            visited[n] = true;
            let cell = board.cell_at(n);
            if cell == Cell::Empty {
                reached[n] = true;
                stack.push(n);
            } else if cell == own {
                // friends are transit only
                stack.push(n);
            }
        }
    }
}

fn collect_marked(board: &HexBoard, marked: &[bool]) -> Vec<Hex> {
    marked
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m)
        .map(|(i, _)| board.hex_at(i))
        .collect()
}

fn walkable_mask(board: &HexBoard, color: Color) -> Vec<bool> {
    let mut reached = vec![false; board.len()];
    for i in 0..board.len() {
        if board.cell_at(i) == Cell::Owned(color) {
            mark_walkable(board, i, &mut reached);
        }
    }
    reached
}

/// Empty cells a piece standing on `start` could walk to, passing through
/// friendly pieces but never ending on one. Empty for walls and off-board
/// coordinates; never contains `start` itself.
pub fn walkable_from(board: &HexBoard, start: Hex) -> Vec<Hex> {
    let Some(index) = board.index_of(start) else {
        return Vec::new();
    };
    let mut reached = vec![false; board.len()];
    mark_walkable(board, index, &mut reached);
    collect_marked(board, &reached)
}

/// Union of `walkable_from` over every miner of `color`
pub fn walkable_by(board: &HexBoard, color: Color) -> Vec<Hex> {
    collect_marked(board, &walkable_mask(board, color))
}

/// Every legal `(from, to)` walk for `color`, grouped by piece in board order
pub fn moves_for(board: &HexBoard, color: Color) -> Vec<Move> {
    board
        .positions_of(color)
        .into_iter()
        .flat_map(|from| {
            walkable_from(board, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

// ============================================================================
// MINING
// ============================================================================

fn mineable_at(board: &HexBoard, index: usize) -> bool {
    if board.cell_at(index) != Cell::Wall {
        return false;
    }
    let open: Vec<usize> = board
        .adjacent(index)
        .iter()
        .copied()
        .filter(|&n| board.cell_at(n).is_open())
        .collect();
    if open.len() > MAX_OPEN_NEIGHBORS {
        return false;
    }
    open.iter()
        .all(|&n| open_neighbor_count(board, n) < CROWDED_NEIGHBOR)
}

/// Local crowding rule: `hex` is a wall with at most three open neighbors,
/// none of which already touches three or more open cells.
/// Says nothing about whether any side can reach it.
pub fn is_mineable(board: &HexBoard, hex: Hex) -> bool {
    board.index_of(hex).is_some_and(|i| mineable_at(board, i))
}

/// Mineable walls adjacent to the footprint of `color`: its pieces plus
/// every cell they can walk to
pub fn mineable_by(board: &HexBoard, color: Color) -> Vec<Hex> {
    let mut footprint = walkable_mask(board, color);
    for (i, slot) in footprint.iter_mut().enumerate() {
        if board.cell_at(i) == Cell::Owned(color) {
            *slot = true;
        }
    }

    (0..board.len())
        .filter(|&i| board.cell_at(i) == Cell::Wall)
        .filter(|&i| board.adjacent(i).iter().any(|&n| footprint[n]))
        .filter(|&i| mineable_at(board, i))
        .map(|i| board.hex_at(i))
        .collect()
}

/// Whether `color` has at least one legal mining target
pub fn can_mine(board: &HexBoard, color: Color) -> bool {
    !mineable_by(board, color).is_empty()
}

// ============================================================================
// DEATH
// ============================================================================

fn dead_at(board: &HexBoard, start: usize, color: Color) -> bool {
    let own = Cell::Owned(color);
    let enemy = Cell::Owned(color.opponent());

    let mut visited = vec![false; board.len()];
    visited[start] = true;
    let mut stack = vec![start];
    let mut enemy_contacts = 0;

    while let Some(current) = stack.pop() {
        for &n in board.adjacent(current) {
            if visited[n] {
                continue;
            }
            visited[n] = true;
            match board.cell_at(n) {
                cell if cell == own => return false,
                cell if cell == enemy => enemy_contacts += 1,
                Cell::Empty => stack.push(n),
                _ => {}
            }
        }
    }

    enemy_contacts >= DEADLY_CONTACTS
}

/// A miner is dead when the open area around it holds no friend and touches
/// at least two distinct enemy miners.
pub fn is_miner_dead(board: &HexBoard, hex: Hex) -> Result<bool, BoardError> {
    let index = board
        .index_of(hex)
        .ok_or(BoardError::InvalidCoordinate(hex))?;
    match board.cell_at(index) {
        Cell::Owned(color) => Ok(dead_at(board, index, color)),
        _ => Err(BoardError::NotAMiner(hex)),
    }
}

/// Remove every dead miner of `color` in one batch and return where they stood.
/// Death is judged on the board as it was before any removal.
pub fn clear_dead(board: &mut HexBoard, color: Color) -> Vec<Hex> {
    let dead: Vec<usize> = (0..board.len())
        .filter(|&i| board.cell_at(i) == Cell::Owned(color) && dead_at(board, i, color))
        .collect();

    for &i in &dead {
        board.set_at(i, Cell::Empty);
    }

    dead.into_iter().map(|i| board.hex_at(i)).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    const RED: Cell = Cell::Owned(Color::Red);
    const BLUE: Cell = Cell::Owned(Color::Blue);

    fn board_with(cells: &[((i8, i8), Cell)]) -> HexBoard {
        let mut board = HexBoard::walled(true);
        for &((q, r), cell) in cells {
            board.set(Hex::new(q, r), cell).unwrap();
        }
        board
    }

    fn random_board(rng: &mut ChaCha8Rng) -> HexBoard {
        let mut board = HexBoard::walled(true);
        let coords: Vec<Hex> = board.iter().map(|(h, _)| h).collect();
        for hex in coords {
            let cell = match rng.gen_range(0..10) {
                0..=4 => Cell::Wall,
                5..=7 => Cell::Empty,
                8 => RED,
                _ => BLUE,
            };
            board.set(hex, cell).unwrap();
        }
        board
    }

    fn swap_colors(board: &HexBoard) -> HexBoard {
        let mut swapped = board.clone();
        for (hex, cell) in board.iter() {
            if let Cell::Owned(color) = cell {
                swapped.set(hex, Cell::Owned(color.opponent())).unwrap();
            }
        }
        swapped
    }

    #[test]
    fn test_neighbors_filtered() {
        let board = board_with(&[((1, 0), Cell::Empty), ((0, 1), RED)]);
        assert_eq!(neighbors_of(&board, Hex::ORIGIN, None).len(), 6);
        assert_eq!(neighbors_of(&board, Hex::ORIGIN, Some(Cell::Empty)), vec![Hex::new(1, 0)]);
        assert_eq!(neighbors_of(&board, Hex::ORIGIN, Some(RED)), vec![Hex::new(0, 1)]);
        // corner cell only has three on-board neighbors
        assert_eq!(neighbors_of(&board, Hex::new(4, -4), None).len(), 3);
    }

    #[test]
    fn test_walkable_through_friends() {
        // red at origin, friend at (1,0), empties beyond the friend
        let board = board_with(&[
            ((0, 0), RED),
            ((1, 0), RED),
            ((2, 0), Cell::Empty),
            ((3, 0), Cell::Empty),
            ((-1, 0), Cell::Empty),
            ((-2, 0), BLUE),
            ((-3, 0), Cell::Empty),
        ]);
        let walkable = walkable_from(&board, Hex::ORIGIN);
        assert!(walkable.contains(&Hex::new(2, 0)));
        assert!(walkable.contains(&Hex::new(3, 0)));
        assert!(walkable.contains(&Hex::new(-1, 0)));
        assert!(!walkable.contains(&Hex::new(1, 0)), "friends are not destinations");
        assert!(!walkable.contains(&Hex::new(-3, 0)), "enemies block the path");
        assert!(!walkable.contains(&Hex::ORIGIN));
        assert_eq!(walkable.len(), 3);
    }

    #[test]
    fn test_walkable_from_wall_or_enclosed() {
        let board = board_with(&[((0, 0), RED), ((2, 0), Cell::Empty)]);
        assert!(walkable_from(&board, Hex::new(2, 0)).is_empty());
        assert!(walkable_from(&board, Hex::new(1, 0)).is_empty());
        assert!(walkable_from(&board, Hex::ORIGIN).is_empty());
        assert!(walkable_from(&board, Hex::new(9, 0)).is_empty());
    }

    #[test]
    fn test_walkable_properties_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let board = random_board(&mut rng);
            for (hex, _) in board.iter() {
                let walkable = walkable_from(&board, hex);
                assert!(!walkable.contains(&hex));
                assert!(walkable.iter().all(|&w| board.get(w) == Ok(Cell::Empty)));
            }
        }
    }

    #[test]
    fn test_walkable_by_is_union() {
        let board = board_with(&[
            ((0, 0), RED),
            ((1, 0), Cell::Empty),
            ((-3, 1), RED),
            ((-3, 2), Cell::Empty),
        ]);
        let by = walkable_by(&board, Color::Red);
        assert_eq!(by.len(), 2);
        assert!(by.contains(&Hex::new(1, 0)));
        assert!(by.contains(&Hex::new(-3, 2)));
        assert!(walkable_by(&board, Color::Blue).is_empty());
    }

    #[test]
    fn test_moves_for() {
        let board = board_with(&[((0, 0), RED), ((1, 0), Cell::Empty), ((2, 0), Cell::Empty)]);
        let moves = moves_for(&board, Color::Red);
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&Move::new(Hex::ORIGIN, Hex::new(2, 0))));
    }

    #[test]
    fn test_mineable_open_neighbor_limit() {
        let three = board_with(&[
            ((1, 0), Cell::Empty),
            ((-1, 0), Cell::Empty),
            ((0, 1), Cell::Empty),
        ]);
        assert!(is_mineable(&three, Hex::ORIGIN));

        let mut four = three.clone();
        four.set(Hex::new(0, -1), RED).unwrap();
        assert!(!is_mineable(&four, Hex::ORIGIN));
    }

    #[test]
    fn test_mineable_crowded_neighbor() {
        let two = board_with(&[
            ((1, 0), Cell::Empty),
            ((2, -1), Cell::Empty),
            ((2, 0), Cell::Empty),
        ]);
        assert!(is_mineable(&two, Hex::ORIGIN));

        let mut crowded = two.clone();
        crowded.set(Hex::new(1, 1), BLUE).unwrap();
        assert!(!is_mineable(&crowded, Hex::ORIGIN));
    }

    #[test]
    fn test_mineable_requires_wall() {
        let board = board_with(&[((0, 0), Cell::Empty), ((1, 0), RED)]);
        assert!(!is_mineable(&board, Hex::ORIGIN));
        assert!(!is_mineable(&board, Hex::new(1, 0)));
        assert!(!is_mineable(&board, Hex::new(8, 8)));
    }

    #[test]
    fn test_mineable_color_symmetric() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let board = random_board(&mut rng);
            let swapped = swap_colors(&board);
            for (hex, _) in board.iter() {
                assert_eq!(is_mineable(&board, hex), is_mineable(&swapped, hex));
            }
        }
    }

    #[test]
    fn test_mineable_by_requires_reach() {
        let board = board_with(&[((0, 0), RED), ((3, 0), Cell::Empty)]);
        let far = Hex::new(4, 0);
        assert!(is_mineable(&board, far));

        let mineable = mineable_by(&board, Color::Red);
        assert!(!mineable.contains(&far));
        assert_eq!(mineable.len(), 6);
        for hex in Hex::ORIGIN.neighbors() {
            assert!(mineable.contains(&hex));
        }
        assert!(!can_mine(&board, Color::Blue));
    }

    #[test]
    fn test_mineable_by_within_footprint_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..30 {
            let board = random_board(&mut rng);
            for color in Color::ALL {
                let mut footprint = walkable_by(&board, color);
                footprint.extend(board.positions_of(color));
                for hex in mineable_by(&board, color) {
                    assert!(is_mineable(&board, hex));
                    assert!(hex.neighbors().iter().any(|n| footprint.contains(n)));
                }
            }
        }
    }

    #[test]
    fn test_kill() {
        let mut board = board_with(&[
            ((0, 0), Cell::Empty),
            ((0, -1), RED),
            ((1, 0), RED),
            ((-1, 1), BLUE),
        ]);
        assert_eq!(is_miner_dead(&board, Hex::new(-1, 1)), Ok(true));
        assert_eq!(is_miner_dead(&board, Hex::new(0, -1)), Ok(false));

        assert!(clear_dead(&mut board, Color::Red).is_empty());
        assert_eq!(board.get(Hex::new(0, 0)), Ok(Cell::Empty));
        assert_eq!(board.get(Hex::new(0, -1)), Ok(RED));
        assert_eq!(board.get(Hex::new(1, 0)), Ok(RED));
        assert_eq!(board.get(Hex::new(-1, 1)), Ok(BLUE));

        assert_eq!(clear_dead(&mut board, Color::Blue), vec![Hex::new(-1, 1)]);
        assert_eq!(board.get(Hex::new(0, 0)), Ok(Cell::Empty));
        assert_eq!(board.get(Hex::new(0, -1)), Ok(RED));
        assert_eq!(board.get(Hex::new(1, 0)), Ok(RED));
        assert_eq!(board.get(Hex::new(-1, 1)), Ok(Cell::Empty));
    }

    #[test]
    fn test_friend_saves_miner() {
        let board = board_with(&[
            ((0, 0), Cell::Empty),
            ((0, -1), RED),
            ((1, 0), RED),
            ((-1, 1), BLUE),
            ((-1, 0), Cell::Empty),
            ((-2, 0), BLUE),
        ]);
        assert_eq!(is_miner_dead(&board, Hex::new(-1, 1)), Ok(false));
    }

    #[test]
    fn test_single_contact_survives() {
        let board = board_with(&[((0, 0), Cell::Empty), ((0, -1), RED), ((-1, 1), BLUE)]);
        assert_eq!(is_miner_dead(&board, Hex::new(-1, 1)), Ok(false));
    }

    #[test]
    fn test_is_miner_dead_requires_miner() {
        let board = board_with(&[((0, 0), Cell::Empty)]);
        assert_eq!(is_miner_dead(&board, Hex::ORIGIN), Err(BoardError::NotAMiner(Hex::ORIGIN)));
        let outside = Hex::new(6, 0);
        assert_eq!(is_miner_dead(&board, outside), Err(BoardError::InvalidCoordinate(outside)));
    }

    #[test]
    fn test_clear_dead_idempotent_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let mut board = random_board(&mut rng);
            for color in Color::ALL {
                clear_dead(&mut board, color);
                let once = board.clone();
                assert!(clear_dead(&mut board, color).is_empty());
                assert_eq!(board, once);
            }
        }
    }

    #[test]
    fn test_clear_dead_batch() {
        // two blue miners in separate pockets, each pinned by two reds
        let mut board = board_with(&[
            ((-1, 1), BLUE),
            ((0, 0), Cell::Empty),
            ((0, -1), RED),
            ((1, 0), RED),
            ((2, 2), BLUE),
            ((3, 1), RED),
            ((2, 1), RED),
        ]);
        let mut removed = clear_dead(&mut board, Color::Blue);
        removed.sort();
        assert_eq!(removed, vec![Hex::new(-1, 1), Hex::new(2, 2)]);
        assert_eq!(board.count(BLUE), 0);
        assert_eq!(board.count(RED), 4);
    }
}
