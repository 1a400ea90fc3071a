//! Board storage: a bounded hexagonal region of cells
//!
//! Cells live in a dense array. The coordinate-to-index mapping and the
//! neighbor table are computed once per board size and shared between clones,
//! so cloning a board only copies the cell array.

use crate::hex::Hex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Board size (hexes from center to edge, counting the center) for the small board
pub const SMALL_SIZE: u8 = 5;
/// Board size for the large board
pub const LARGE_SIZE: u8 = 7;

pub const SMALL_MINER_COUNT: usize = 3;
pub const LARGE_MINER_COUNT: usize = 6;

/// Starting miners. Seeds outside the region of a given size are skipped.
const RED_SEEDS: [(i8, i8); 6] = [(1, -3), (2, 1), (-3, 2), (6, -4), (-4, -2), (-2, 6)];
const BLUE_SEEDS: [(i8, i8); 6] = [(-1, 3), (-2, -1), (3, -2), (-6, 4), (4, 2), (2, -6)];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Side color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red = 0,
    Blue = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Red, Color::Blue];

    pub fn opponent(self) -> Self {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Blue => write!(f, "blue"),
        }
    }
}

/// Contents of a single board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Empty,
    Owned(Color),
}

impl Cell {
    /// Empty or occupied by either color
    pub fn is_open(self) -> bool {
        !matches!(self, Cell::Wall)
    }

    pub fn owner(self) -> Option<Color> {
        match self {
            Cell::Owned(color) => Some(color),
            _ => None,
        }
    }
}

/// Errors raised by board access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{0} is not a valid coordinate on this board")]
    InvalidCoordinate(Hex),

    #[error("{0} does not hold a miner")]
    NotAMiner(Hex),
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Coordinate set and adjacency for one board size
#[derive(Debug)]
struct Layout {
    size: u8,
    coords: Vec<Hex>,
    index: FxHashMap<Hex, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl Layout {
    /// Ring expansion from the origin: each pass marks every unseen
    /// neighbor of the frontier and makes it the next frontier.
    fn build(size: u8) -> Self {
        let mut coords = vec![Hex::ORIGIN];
        let mut index = FxHashMap::default();
        index.insert(Hex::ORIGIN, 0);

        let mut frontier = vec![Hex::ORIGIN];
        for _ in 1..size {
            let mut next_frontier = Vec::new();
            for current in frontier {
                for neighbor in current.neighbors() {
                    if !index.contains_key(&neighbor) {
                        index.insert(neighbor, coords.len());
                        coords.push(neighbor);
                        next_frontier.push(neighbor);
                    }
                }
            }
            frontier = next_frontier;
        }

        let adjacency = coords
            .iter()
            .map(|hex| {
                hex.neighbors()
                    .iter()
                    .filter_map(|n| index.get(n).copied())
                    .collect()
            })
            .collect();

        Self {
            size,
            coords,
            index,
            adjacency,
        }
    }
}

// ============================================================================
// HEX BOARD
// ============================================================================

/// A specific board state
#[derive(Clone)]
pub struct HexBoard {
    layout: Arc<Layout>,
    cells: Vec<Cell>,
    miner_count: usize,
}

impl HexBoard {
    /// Create a board in the default starting state
    pub fn new(small: bool) -> Self {
        let mut board = Self::walled(small);
        for (seeds, color) in [(RED_SEEDS, Color::Red), (BLUE_SEEDS, Color::Blue)] {
            for (q, r) in seeds {
                if let Some(i) = board.index_of(Hex::new(q, r)) {
                    board.cells[i] = Cell::Owned(color);
                }
            }
        }
        board
    }

    /// Create a board of the given size with every cell a wall and no miners
    pub fn walled(small: bool) -> Self {
        let (size, miner_count) = if small {
            (SMALL_SIZE, SMALL_MINER_COUNT)
        } else {
            (LARGE_SIZE, LARGE_MINER_COUNT)
        };
        let layout = Arc::new(Layout::build(size));
        let cells = vec![Cell::Wall; layout.coords.len()];
        Self {
            layout,
            cells,
            miner_count,
        }
    }

    pub fn size(&self) -> u8 {
        self.layout.size
    }

    pub fn is_small(&self) -> bool {
        self.layout.size == SMALL_SIZE
    }

    /// Maximum live miners per side
    pub fn miner_count(&self) -> usize {
        self.miner_count
    }

    /// Number of cells on the board
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.layout.index.contains_key(&hex)
    }

    pub fn get(&self, hex: Hex) -> Result<Cell, BoardError> {
        self.index_of(hex)
            .map(|i| self.cells[i])
            .ok_or(BoardError::InvalidCoordinate(hex))
    }

    pub fn set(&mut self, hex: Hex, cell: Cell) -> Result<(), BoardError> {
        let i = self
            .index_of(hex)
            .ok_or(BoardError::InvalidCoordinate(hex))?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Number of cells holding exactly `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Coordinates of every miner of `color`, in board order
    pub fn positions_of(&self, color: Color) -> Vec<Hex> {
        self.iter()
            .filter(|&(_, cell)| cell == Cell::Owned(color))
            .map(|(hex, _)| hex)
            .collect()
    }

    /// Read-only iteration over `(coordinate, state)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (Hex, Cell)> + '_ {
        self.layout.coords.iter().copied().zip(self.cells.iter().copied())
    }

    /// Dig out a wall for `color`. The cell becomes a new miner unless the
    /// side already fields its full complement, in which case it becomes empty.
    /// Legality (`is_mineable`) is the caller's concern.
    pub fn dig(&mut self, hex: Hex, color: Color) -> Result<Cell, BoardError> {
        let cell = if self.count(Cell::Owned(color)) >= self.miner_count {
            Cell::Empty
        } else {
            Cell::Owned(color)
        };
        self.set(hex, cell)?;
        Ok(cell)
    }

    /// Walk a miner of `color` from `from` to `to`
    pub fn relocate(&mut self, from: Hex, to: Hex, color: Color) -> Result<(), BoardError> {
        let from_index = self.index_of(from).ok_or(BoardError::InvalidCoordinate(from))?;
        let to_index = self.index_of(to).ok_or(BoardError::InvalidCoordinate(to))?;
        self.cells[from_index] = Cell::Empty;
        self.cells[to_index] = Cell::Owned(color);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Dense-index access for the connectivity layer
    // ------------------------------------------------------------------------

    pub(crate) fn index_of(&self, hex: Hex) -> Option<usize> {
        self.layout.index.get(&hex).copied()
    }

    pub(crate) fn hex_at(&self, index: usize) -> Hex {
        self.layout.coords[index]
    }

    pub(crate) fn cell_at(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub(crate) fn set_at(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    pub(crate) fn adjacent(&self, index: usize) -> &[usize] {
        &self.layout.adjacency[index]
    }
}

impl PartialEq for HexBoard {
    fn eq(&self, other: &Self) -> bool {
        self.layout.size == other.layout.size && self.cells == other.cells
    }
}

impl Eq for HexBoard {}

impl Hash for HexBoard {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.layout.size.hash(state);
        self.cells.hash(state);
    }
}

impl fmt::Debug for HexBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HexBoard")
            .field("size", &self.layout.size)
            .field("red", &self.positions_of(Color::Red))
            .field("blue", &self.positions_of(Color::Blue))
            .field("empty", &self.count(Cell::Empty))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_cells(size: usize) -> usize {
        1 + 3 * size * (size - 1)
    }

    #[test]
    fn test_board_cell_counts() {
        let small = HexBoard::new(true);
        let large = HexBoard::new(false);
        assert_eq!(small.len(), expected_cells(5));
        assert_eq!(large.len(), expected_cells(7));
        assert_eq!(small.len(), 61);
        assert_eq!(large.len(), 127);
    }

    #[test]
    fn test_region_is_hex_ball() {
        let board = HexBoard::new(false);
        for (hex, _) in board.iter() {
            assert!(hex.distance_to_center() <= 6);
        }
        assert!(board.contains(Hex::new(6, -6)));
        assert!(!board.contains(Hex::new(7, 0)));
        assert!(!board.contains(Hex::new(4, 4)));
    }

    #[test]
    fn test_seed_placement() {
        let small = HexBoard::new(true);
        assert_eq!(small.count(Cell::Owned(Color::Red)), 3);
        assert_eq!(small.count(Cell::Owned(Color::Blue)), 3);
        assert_eq!(small.count(Cell::Empty), 0);
        assert_eq!(small.count(Cell::Wall), small.len() - 6);
        assert_eq!(small.get(Hex::new(1, -3)), Ok(Cell::Owned(Color::Red)));
        assert_eq!(small.get(Hex::new(-1, 3)), Ok(Cell::Owned(Color::Blue)));

        let large = HexBoard::new(false);
        assert_eq!(large.count(Cell::Owned(Color::Red)), 6);
        assert_eq!(large.count(Cell::Owned(Color::Blue)), 6);
        assert_eq!(large.miner_count(), 6);
        assert_eq!(large.get(Hex::new(-2, 6)), Ok(Cell::Owned(Color::Red)));
    }

    #[test]
    fn test_invalid_coordinate() {
        let mut board = HexBoard::new(true);
        let outside = Hex::new(5, 0);
        assert_eq!(board.get(outside), Err(BoardError::InvalidCoordinate(outside)));
        assert_eq!(
            board.set(outside, Cell::Empty),
            Err(BoardError::InvalidCoordinate(outside))
        );
        assert_eq!(board.len(), 61);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = HexBoard::new(true);
        let mut copy = original.clone();
        copy.set(Hex::ORIGIN, Cell::Empty).unwrap();
        assert_eq!(original.get(Hex::ORIGIN), Ok(Cell::Wall));
        assert_eq!(copy.get(Hex::ORIGIN), Ok(Cell::Empty));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_dig_respects_miner_count() {
        let mut board = HexBoard::new(true);
        assert_eq!(board.dig(Hex::ORIGIN, Color::Red), Ok(Cell::Empty));

        let mut board = HexBoard::walled(true);
        for q in 0..3 {
            assert_eq!(board.dig(Hex::new(q, 0), Color::Blue), Ok(Cell::Owned(Color::Blue)));
        }
        assert_eq!(board.dig(Hex::new(0, 1), Color::Blue), Ok(Cell::Empty));
    }

    #[test]
    fn test_relocate() {
        let mut board = HexBoard::walled(true);
        board.set(Hex::ORIGIN, Cell::Owned(Color::Red)).unwrap();
        board.relocate(Hex::ORIGIN, Hex::new(1, 0), Color::Red).unwrap();
        assert_eq!(board.get(Hex::ORIGIN), Ok(Cell::Empty));
        assert_eq!(board.get(Hex::new(1, 0)), Ok(Cell::Owned(Color::Red)));
    }
}
