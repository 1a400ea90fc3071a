//! Game records: per-turn history, loss reasons and final outcome

use hexmine_core::{Color, Hex, HexBoard, Move};

use crate::sandbox::ProviderError;

/// Why a side lost
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LossReason {
    #[error("no mineable walls left")]
    NoMineableWalls,

    #[error("timed out")]
    Timeout,

    #[error("crashed: {0}")]
    Fault(String),

    #[error("tried to mine {0}")]
    IllegalMine(Hex),

    #[error("tried to move {0}")]
    IllegalMove(Move),
}

impl From<ProviderError> for LossReason {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout { .. } => LossReason::Timeout,
            ProviderError::Fault(msg) => LossReason::Fault(msg),
        }
    }
}

impl LossReason {
    /// Provider misbehaved, as opposed to losing over the board
    pub fn is_forfeit(&self) -> bool {
        !matches!(self, LossReason::NoMineableWalls)
    }
}

/// The side that lost, who was playing it, and why
#[derive(Debug, Clone, PartialEq)]
pub struct Loss {
    pub loser: Color,
    pub provider: String,
    pub reason: LossReason,
}

/// One completed turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub turn: u32,
    pub color: Color,
    pub mine: Hex,
    pub walk: Option<Move>,
    /// Opponent miners cleared at the end of the turn
    pub removed: Vec<Hex>,
}

/// Outcome of a single game
#[derive(Debug, Clone)]
pub struct GameOutcome {
    /// `None` when the turn cap stopped the game
    pub winner: Option<Color>,
    pub loss: Option<Loss>,
    /// Completed turns
    pub turns: u32,
    pub history: Vec<TurnRecord>,
    pub final_board: HexBoard,
}

impl GameOutcome {
    pub fn red_wins(&self) -> bool {
        self.winner == Some(Color::Red)
    }

    pub fn blue_wins(&self) -> bool {
        self.winner == Some(Color::Blue)
    }

    /// Game stopped at the turn cap
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}
