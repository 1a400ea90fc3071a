//! Reference decision providers
//!
//! - [`RandomPlayer`]: uniform random legal actions from a seeded RNG
//! - [`SearchPlayer`]: alpha-beta search with an injected evaluator

use crate::board::{Color, HexBoard};
use crate::connectivity::{mineable_by, walkable_from};
use crate::eval::{Evaluator, Heuristics};
use crate::hex::Hex;
use crate::provider::{next_agent_id, DecisionProvider, Move};
use crate::search::{AlphaBeta, SearchConfig};
use anyhow::anyhow;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// ============================================================================
// RANDOM PLAYER
// ============================================================================

/// Picks a random mineable wall, then a random miner and a random destination
pub struct RandomPlayer {
    name: String,
    rng: ChaCha8Rng,
    delay: Duration,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            name: format!("random-{}", next_agent_id()),
            rng: ChaCha8Rng::seed_from_u64(seed),
            delay: Duration::ZERO,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sleep this long before every decision
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

impl DecisionProvider for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn mine(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Hex> {
        self.pause();
        mineable_by(board, color)
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("no mineable walls for {}", color))
    }

    fn move_miner(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Option<Move>> {
        self.pause();
        let Some(&from) = board.positions_of(color).choose(&mut self.rng) else {
            return Ok(None);
        };
        Ok(walkable_from(board, from)
            .choose(&mut self.rng)
            .map(|&to| Move::new(from, to)))
    }
}

// ============================================================================
// SEARCH PLAYER
// ============================================================================

/// Alpha-beta player; all of its judgement lives in the evaluator
pub struct SearchPlayer<E> {
    name: String,
    search: AlphaBeta<E>,
}

impl SearchPlayer<Heuristics> {
    /// Search player with the stock heuristics
    pub fn with_heuristics(config: SearchConfig, heuristics: Heuristics) -> Self {
        Self::new(config, heuristics)
    }
}

impl<E: Evaluator> SearchPlayer<E> {
    pub fn new(config: SearchConfig, evaluator: E) -> Self {
        Self {
            name: format!("search-{}", next_agent_id()),
            search: AlphaBeta::new(config, evaluator),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn search(&self) -> &AlphaBeta<E> {
        &self.search
    }
}

impl<E: Evaluator + Send> DecisionProvider for SearchPlayer<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn mine(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Hex> {
        self.search
            .best_mine(board, color)
            .action
            .ok_or_else(|| anyhow!("no mineable walls for {}", color))
    }

    fn move_miner(&mut self, board: &HexBoard, color: Color) -> anyhow::Result<Option<Move>> {
        Ok(self.search.best_move(board, color).action.flatten())
    }
}
