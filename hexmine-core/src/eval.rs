//! Position evaluation
//!
//! The search only needs an [`Evaluator`]: a deterministic score for a
//! candidate board, given the board it came from and the side being scored.
//! [`Heuristics`] is the stock weighting used by the search agent.

use crate::board::{Color, HexBoard};
use crate::connectivity::{mineable_by, walkable_from};
use serde::{Deserialize, Serialize};

/// Score sentinel for a side with nothing left to mine
pub const WIN_VALUE: f64 = 1.0e9;

/// Scores a candidate board for `color`. Higher is better for `color`.
pub trait Evaluator {
    fn score(&self, previous: &HexBoard, candidate: &HexBoard, color: Color) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(&HexBoard, &HexBoard, Color) -> f64,
{
    fn score(&self, previous: &HexBoard, candidate: &HexBoard, color: Color) -> f64 {
        self(previous, candidate, color)
    }
}

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Per wall we can mine
    pub own_mineable_weight: f64,
    /// Per wall the opponent can mine (usually negative)
    pub enemy_mineable_weight: f64,
    /// Per enemy miner removed since the previous board
    pub capture_weight: f64,
    /// Per (our miner, adjacent enemy miner) pair
    pub contact_weight: f64,
    /// Per empty cell adjacent to one of our miners and walkable by it
    pub mobility_weight: f64,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            own_mineable_weight: 40.0,
            enemy_mineable_weight: -120.0,
            capture_weight: 1000.0,
            contact_weight: 150.0,
            mobility_weight: 15.0,
        }
    }
}

impl Evaluator for Heuristics {
    fn score(&self, previous: &HexBoard, candidate: &HexBoard, color: Color) -> f64 {
        evaluate(previous, candidate, color, self)
    }
}

/// Evaluate `board` from `color`'s perspective
pub fn evaluate(previous: &HexBoard, board: &HexBoard, color: Color, heuristics: &Heuristics) -> f64 {
    let enemy = color.opponent();
    let own_mineable = mineable_by(board, color).len();
    let enemy_mineable = mineable_by(board, enemy).len();

    let mut score = heuristics.own_mineable_weight * own_mineable as f64
        + heuristics.enemy_mineable_weight * enemy_mineable as f64;

    // Terminal positions dominate everything else
    if own_mineable == 0 {
        score -= WIN_VALUE;
    }
    if enemy_mineable == 0 {
        score += WIN_VALUE;
    }

    let ours = board.positions_of(color);
    let theirs = board.positions_of(enemy);

    let captured = previous.positions_of(enemy).len() as f64 - theirs.len() as f64;
    score += heuristics.capture_weight * captured;

    for &us in &ours {
        let contacts = theirs.iter().filter(|&&them| us.distance_to(them) == 1).count();
        score += heuristics.contact_weight * contacts as f64;

        let steps = walkable_from(board, us)
            .into_iter()
            .filter(|&w| us.distance_to(w) == 1)
            .count();
        score += heuristics.mobility_weight * steps as f64;
    }

    score
}
