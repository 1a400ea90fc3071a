//! HEXMINE Core - Board engine and search
//!
//! This crate provides the core game logic for HEXMINE:
//! - Hex geometry (cube coordinates)
//! - Board construction and cell storage
//! - Connectivity queries: walkability, mining rule, dead miners
//! - The decision provider contract
//! - Alpha-beta search with pluggable evaluation
//! - Reference agents

pub mod hex;
pub mod board;
pub mod connectivity;
pub mod provider;
pub mod eval;
pub mod search;
pub mod agents;

// Re-exports for convenient access
pub use hex::{Hex, CUBE_DIRECTIONS};
pub use board::{BoardError, Cell, Color, HexBoard};
pub use connectivity::{
    can_mine, clear_dead, is_mineable, is_miner_dead, mineable_by, moves_for, neighbors_of,
    walkable_by, walkable_from,
};
pub use provider::{DecisionProvider, Move};
pub use eval::{evaluate, Evaluator, Heuristics, WIN_VALUE};
pub use search::{AlphaBeta, SearchConfig, SearchOutcome};
pub use agents::{RandomPlayer, SearchPlayer};
