//! HEXMINE Arena - Refereed game play
//!
//! This crate runs games between decision providers:
//! - Turn engine state machine (mine, move, resolve)
//! - Chess clock with per-move allowance and reserve
//! - Sandboxed provider calls with hard deadlines
//! - Game configuration and outcome records
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: play_game (orchestration)
//! - Level 2: TurnEngine::step, TurnEngine::advance (phases)
//! - Level 3: mine/move/resolve steps
//! - Level 4: clock, sandbox, configuration

mod clock;
mod config;
mod engine;
mod outcome;
mod sandbox;

pub use clock::ChessClock;
pub use config::GameConfig;
pub use engine::{play_game, BoxedProvider, GameState, TurnEngine, TurnPhase};
pub use outcome::{GameOutcome, Loss, LossReason, TurnRecord};
pub use sandbox::{run_sandboxed, Answer, ProviderError};
