//! Turn engine - the authoritative game state machine
//!
//! Level 2 - Phase-level implementation
//!
//! A turn runs `AwaitingMine -> AwaitingMove -> Resolving` for the active
//! side and hands over to the other side. Any provider failure or illegal
//! action finishes the game in the opponent's favor on the spot; nothing the
//! offending call asked for is applied.

use hexmine_core::{
    can_mine, clear_dead, is_mineable, walkable_from, BoardError, Cell, Color, DecisionProvider,
    Hex, HexBoard, Move,
};
use std::time::Duration;

use crate::clock::ChessClock;
use crate::config::GameConfig;
use crate::outcome::{GameOutcome, Loss, LossReason, TurnRecord};
use crate::sandbox::run_sandboxed;

pub type BoxedProvider = Box<dyn DecisionProvider>;

// ============================================================================
// STATE
// ============================================================================

/// Where the state machine stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingMine(Color),
    AwaitingMove(Color),
    Resolving(Color),
    Finished(Color),
    /// Turn cap reached with no winner
    Stalled,
}

impl TurnPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::Finished(_) | TurnPhase::Stalled)
    }
}

/// Board, side to act, winner and clocks
#[derive(Clone, Debug)]
pub struct GameState {
    board: HexBoard,
    active: Color,
    winner: Option<Color>,
    clock: ChessClock,
    turn: u32,
}

impl GameState {
    /// Fresh board with full reserves
    pub fn new(config: &GameConfig) -> Self {
        Self::with_board(HexBoard::new(config.small), config)
    }

    /// Start from an arbitrary position
    pub fn with_board(board: HexBoard, config: &GameConfig) -> Self {
        Self {
            board,
            active: config.first_player,
            winner: None,
            clock: ChessClock::new(config.time_per_move(), config.reserve_time()),
            turn: 0,
        }
    }

    pub fn board(&self) -> &HexBoard {
        &self.board
    }

    pub fn active(&self) -> Color {
        self.active
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn reserve(&self, color: Color) -> Duration {
        self.clock.reserve(color)
    }

    pub fn clock(&self) -> &ChessClock {
        &self.clock
    }

    /// Completed turns
    pub fn turn(&self) -> u32 {
        self.turn
    }
}

// ============================================================================
// TURN ENGINE
// ============================================================================

/// Drives a game between two providers
pub struct TurnEngine {
    config: GameConfig,
    state: GameState,
    phase: TurnPhase,
    providers: [Option<BoxedProvider>; 2],
    names: [String; 2],
    pending_mine: Option<Hex>,
    pending_walk: Option<Move>,
    history: Vec<TurnRecord>,
    loss: Option<Loss>,
}

impl TurnEngine {
    pub fn new(config: GameConfig, red: BoxedProvider, blue: BoxedProvider) -> Self {
        let state = GameState::new(&config);
        Self::with_state(config, state, red, blue)
    }

    pub fn with_state(config: GameConfig, state: GameState, red: BoxedProvider, blue: BoxedProvider) -> Self {
        let phase = match state.winner {
            Some(winner) => TurnPhase::Finished(winner),
            None => TurnPhase::AwaitingMine(state.active),
        };
        let names = [red.name().to_string(), blue.name().to_string()];
        Self {
            config,
            state,
            phase,
            providers: [Some(red), Some(blue)],
            names,
            pending_mine: None,
            pending_walk: None,
            history: Vec::new(),
            loss: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn winner(&self) -> Option<Color> {
        self.state.winner
    }

    pub fn loss(&self) -> Option<&Loss> {
        self.loss.as_ref()
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn provider_name(&self, color: Color) -> &str {
        &self.names[color.index()]
    }

    /// Play until someone wins or the turn cap is hit
    pub fn play_game(mut self) -> Result<GameOutcome, BoardError> {
        tracing::info!(
            "Starting game: {} (red) vs {} (blue), {} board, {} first",
            self.names[0],
            self.names[1],
            if self.state.board.is_small() { "small" } else { "large" },
            self.state.active
        );

        while !self.phase.is_terminal() {
            self.step()?;
        }

        Ok(self.into_outcome())
    }

    /// Run the rest of the current turn. A no-op once the game is over.
    pub fn step(&mut self) -> Result<TurnPhase, BoardError> {
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }
        loop {
            let phase = self.advance()?;
            if phase.is_terminal() || matches!(phase, TurnPhase::AwaitingMine(_)) {
                return Ok(phase);
            }
        }
    }

    /// Make a single state transition
    pub fn advance(&mut self) -> Result<TurnPhase, BoardError> {
        match self.phase {
            TurnPhase::Finished(_) | TurnPhase::Stalled => {}
            TurnPhase::AwaitingMine(color) => self.mine_phase(color)?,
            TurnPhase::AwaitingMove(color) => self.move_phase(color)?,
            TurnPhase::Resolving(color) => self.resolve(color),
        }
        Ok(self.phase)
    }

    pub fn into_outcome(self) -> GameOutcome {
        GameOutcome {
            winner: self.state.winner,
            loss: self.loss,
            turns: self.state.turn,
            history: self.history,
            final_board: self.state.board,
        }
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    fn mine_phase(&mut self, color: Color) -> Result<(), BoardError> {
        if let Some(max_turns) = self.config.max_turns {
            if self.state.turn >= max_turns {
                tracing::info!("Turn limit {} reached with no winner", max_turns);
                self.phase = TurnPhase::Stalled;
                return Ok(());
            }
        }

        if !can_mine(&self.state.board, color) {
            self.finish(color, LossReason::NoMineableWalls);
            return Ok(());
        }

        let target = match self.request(color, move |p, board| p.mine(board, color)) {
            Ok(target) => target,
            Err(reason) => {
                self.finish(color, reason);
                return Ok(());
            }
        };

        if !is_mineable(&self.state.board, target) {
            self.finish(color, LossReason::IllegalMine(target));
            return Ok(());
        }

        let cell = self.state.board.dig(target, color)?;
        tracing::debug!(
            "{} ({}) mined {} -> {:?}",
            self.names[color.index()],
            color,
            target,
            cell
        );
        self.pending_mine = Some(target);
        self.phase = TurnPhase::AwaitingMove(color);
        Ok(())
    }

    fn move_phase(&mut self, color: Color) -> Result<(), BoardError> {
        let walk = match self.request(color, move |p, board| p.move_miner(board, color)) {
            Ok(walk) => walk,
            Err(reason) => {
                self.finish(color, reason);
                return Ok(());
            }
        };

        if let Some(mv) = walk {
            if !self.is_legal_walk(mv, color) {
                self.finish(color, LossReason::IllegalMove(mv));
                return Ok(());
            }
            self.state.board.relocate(mv.from, mv.to, color)?;
            tracing::debug!("{} ({}) moved {}", self.names[color.index()], color, mv);
        }

        self.pending_walk = walk;
        self.phase = TurnPhase::Resolving(color);
        Ok(())
    }

    fn resolve(&mut self, color: Color) {
        let opponent = color.opponent();
        let removed = clear_dead(&mut self.state.board, opponent);
        if !removed.is_empty() {
            tracing::debug!("{} lost {} miner(s): {:?}", opponent, removed.len(), removed);
        }

        if let Some(mine) = self.pending_mine.take() {
            self.history.push(TurnRecord {
                turn: self.state.turn,
                color,
                mine,
                walk: self.pending_walk.take(),
                removed,
            });
        }

        self.state.turn += 1;
        self.state.active = opponent;
        self.phase = TurnPhase::AwaitingMine(opponent);
    }

    fn is_legal_walk(&self, mv: Move, color: Color) -> bool {
        self.state.board.get(mv.from) == Ok(Cell::Owned(color))
            && walkable_from(&self.state.board, mv.from).contains(&mv.to)
    }

    fn finish(&mut self, loser: Color, reason: LossReason) {
        let winner = loser.opponent();
        let provider = self.names[loser.index()].clone();

        if reason.is_forfeit() {
            tracing::warn!("{} ({}) forfeits: {}", provider, loser, reason);
        } else {
            tracing::info!("{} ({}) loses: {}", provider, loser, reason);
        }
        tracing::info!("{} ({}) wins", self.names[winner.index()], winner);

        self.state.winner = Some(winner);
        self.phase = TurnPhase::Finished(winner);
        self.pending_mine = None;
        self.pending_walk = None;
        self.loss = Some(Loss {
            loser,
            provider,
            reason,
        });
    }

    // ========================================================================
    // Level 4 - Provider calls
    // ========================================================================

    /// Ask `color`'s provider for a decision on a snapshot of the board,
    /// within its clock budget
    fn request<T, F>(&mut self, color: Color, call: F) -> Result<T, LossReason>
    where
        T: Send + 'static,
        F: FnOnce(&mut BoxedProvider, &HexBoard) -> anyhow::Result<T> + Send + 'static,
    {
        let provider = self.providers[color.index()]
            .take()
            .ok_or_else(|| LossReason::Fault("provider unavailable".to_string()))?;
        let snapshot = self.state.board.clone();
        let budget = self.state.clock.budget(color);

        let answer = run_sandboxed(provider, budget, move |p| call(p, &snapshot))?;
        self.providers[color.index()] = Some(answer.provider);

        self.state
            .clock
            .charge(color, answer.elapsed)
            .map_err(|_| LossReason::Timeout)?;
        self.pace(answer.elapsed);

        Ok(answer.value)
    }

    /// Hold the driver for the configured minimum decision time
    fn pace(&self, elapsed: Duration) {
        let min = self.config.min_decision_time();
        if elapsed < min {
            std::thread::sleep(min - elapsed);
        }
    }
}

/// Play a full game from the starting position
pub fn play_game(config: GameConfig, red: BoxedProvider, blue: BoxedProvider) -> Result<GameOutcome, BoardError> {
    TurnEngine::new(config, red, blue).play_game()
}

// ============================================================================
// TESTS
// ============================================================================
