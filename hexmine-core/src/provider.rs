//! Decision provider contract
//!
//! Anything that can play a side implements [`DecisionProvider`]. Providers
//! only ever see a snapshot of the board; the turn engine validates whatever
//! they return.

use crate::board::{Color, HexBoard};
use crate::hex::Hex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A miner walking from `from` to `to`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Hex,
    pub to: Hex,
}

impl Move {
    pub const fn new(from: Hex, to: Hex) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A side's decision maker
///
/// Both calls receive an independent copy of the board. Returning an error
/// or panicking forfeits the game, as does returning an illegal action.
pub trait DecisionProvider: Send {
    /// Identity used in logs and forfeit reports
    fn name(&self) -> &str;

    /// Choose a wall to dig out
    fn mine(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Hex>;

    /// Choose a walk for one miner, or `None` to stay put
    fn move_miner(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Option<Move>>;
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mine(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Hex> {
        (**self).mine(board, color)
    }

    fn move_miner(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Option<Move>> {
        (**self).move_miner(board, color)
    }
}

static NEXT_AGENT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-wide sequence number for default agent names
pub fn next_agent_id() -> u64 {
    NEXT_AGENT_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_ids_unique() {
        let a = next_agent_id();
        let b = next_agent_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_move_display() {
        let mv = Move::new(Hex::new(0, 0), Hex::new(1, -1));
        assert_eq!(mv.to_string(), "(0, 0, 0) -> (1, -1, 0)");
    }
}
