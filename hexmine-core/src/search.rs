//! Fixed-depth minimax with alpha-beta pruning
//!
//! One ply is a full turn for one side: a mine node (which wall to dig)
//! followed by a move node (which miner walks where, or stay), after which the
//! opponent's dead miners are swept and the opponent's ply begins. The depth
//! counts plies. Every node is scored for the root color by the injected
//! [`Evaluator`]; the root color maximizes and the opponent minimizes.
//!
//! All speculative play happens on private clones. The caller's board is
//! never touched.

use crate::board::{Color, HexBoard};
use crate::connectivity::{clear_dead, mineable_by, moves_for};
use crate::eval::Evaluator;
use crate::hex::Hex;
use crate::provider::Move;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Full turns to look ahead
    pub depth: u32,
    /// Optional beam width. When set, larger child sets are ordered by static
    /// score and cut to this many, trading exactness for speed.
    #[serde(default)]
    pub max_branching: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            max_branching: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }
}

/// Result of a root search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome<A> {
    /// Chosen action; `None` when the root is terminal or depth is zero
    pub action: Option<A>,
    pub score: f64,
    /// Nodes visited
    pub nodes: u64,
}

// ============================================================================
// ALPHA-BETA
// ============================================================================

/// Alpha-beta search over mine and move decisions
#[derive(Clone, Debug)]
pub struct AlphaBeta<E> {
    config: SearchConfig,
    evaluator: E,
}

impl<E: Evaluator> AlphaBeta<E> {
    pub fn new(config: SearchConfig, evaluator: E) -> Self {
        Self { config, evaluator }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Best wall for `color` to dig on `board`
    pub fn best_mine(&self, board: &HexBoard, color: Color) -> SearchOutcome<Hex> {
        let mut searcher = Searcher::new(&self.evaluator, color, self.config.max_branching);
        let (action, score) = searcher.mine_node(
            board,
            board,
            color,
            self.config.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
        );
        tracing::debug!(
            "mine search for {}: {:?} score={:.1} nodes={}",
            color,
            action,
            score,
            searcher.nodes
        );
        SearchOutcome {
            action,
            score,
            nodes: searcher.nodes,
        }
    }

    /// Best walk for `color` on a board where it has already mined this turn.
    /// A chosen action of `None` means stay put.
    pub fn best_move(&self, board: &HexBoard, color: Color) -> SearchOutcome<Option<Move>> {
        let mut searcher = Searcher::new(&self.evaluator, color, self.config.max_branching);
        let (action, score) = searcher.move_node(
            board,
            board,
            color,
            self.config.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
        );
        tracing::debug!(
            "move search for {}: {:?} score={:.1} nodes={}",
            color,
            action,
            score,
            searcher.nodes
        );
        SearchOutcome {
            action,
            score,
            nodes: searcher.nodes,
        }
    }
}

// ============================================================================
// RECURSION
// ============================================================================

struct Searcher<'e, E: ?Sized> {
    evaluator: &'e E,
    root: Color,
    max_branching: Option<usize>,
    nodes: u64,
}

impl<'e, E: Evaluator + ?Sized> Searcher<'e, E> {
    fn new(evaluator: &'e E, root: Color, max_branching: Option<usize>) -> Self {
        Self {
            evaluator,
            root,
            max_branching: max_branching.map(|cap| cap.max(1)),
            nodes: 0,
        }
    }

    fn leaf(&self, previous: &HexBoard, board: &HexBoard) -> f64 {
        self.evaluator.score(previous, board, self.root)
    }

    /// Order children best-first for the side to act and cut to `max_branching`.
    /// Without a cap every child is kept.
    fn prune_children<A>(&self, board: &HexBoard, children: &mut Vec<(A, HexBoard)>, maximizing: bool) {
        let Some(cap) = self.max_branching else {
            return;
        };
        if children.len() <= cap {
            return;
        }
        let mut scored: Vec<(f64, (A, HexBoard))> = children
            .drain(..)
            .map(|child| (self.leaf(board, &child.1), child))
            .collect();
        scored.sort_by(|a, b| {
            let ord = a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal);
            if maximizing {
                ord.reverse()
            } else {
                ord
            }
        });
        scored.truncate(cap);
        children.extend(scored.into_iter().map(|(_, child)| child));
    }

    fn mine_node(
        &mut self,
        previous: &HexBoard,
        board: &HexBoard,
        color: Color,
        depth: u32,
        alpha: f64,
        beta: f64,
    ) -> (Option<Hex>, f64) {
        self.nodes += 1;
        if depth == 0 {
            return (None, self.leaf(previous, board));
        }

        let mut children: Vec<(Hex, HexBoard)> = mineable_by(board, color)
            .into_iter()
            .filter_map(|target| {
                let mut child = board.clone();
                child.dig(target, color).ok()?;
                Some((target, child))
            })
            .collect();
        if children.is_empty() {
            return (None, self.leaf(previous, board));
        }

        let maximizing = color == self.root;
        self.prune_children(board, &mut children, maximizing);

        self.select(children, maximizing, alpha, beta, |s, child, a, b| {
            s.move_node(board, child, color, depth, a, b).1
        })
    }

    fn move_node(
        &mut self,
        previous: &HexBoard,
        board: &HexBoard,
        color: Color,
        depth: u32,
        alpha: f64,
        beta: f64,
    ) -> (Option<Option<Move>>, f64) {
        self.nodes += 1;
        if depth == 0 {
            return (None, self.leaf(previous, board));
        }

        let opponent = color.opponent();
        let mut children: Vec<(Option<Move>, HexBoard)> = moves_for(board, color)
            .into_iter()
            .filter_map(|mv| {
                let mut child = board.clone();
                child.relocate(mv.from, mv.to, color).ok()?;
                Some((Some(mv), child))
            })
            .collect();
        children.push((None, board.clone()));
        for (_, child) in children.iter_mut() {
            clear_dead(child, opponent);
        }

        let maximizing = color == self.root;
        self.prune_children(board, &mut children, maximizing);

        self.select(children, maximizing, alpha, beta, |s, child, a, b| {
            s.mine_node(board, child, opponent, depth - 1, a, b).1
        })
    }

    /// Minimax selection over children with a symmetric alpha-beta cutoff
    fn select<A: Copy>(
        &mut self,
        children: Vec<(A, HexBoard)>,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
        mut recurse: impl FnMut(&mut Self, &HexBoard, f64, f64) -> f64,
    ) -> (Option<A>, f64) {
        let mut best_action = children.first().map(|(action, _)| *action);
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for (action, child) in &children {
            let value = recurse(self, child, alpha, beta);
            if maximizing {
                if value > best {
                    best = value;
                    best_action = Some(*action);
                }
                alpha = alpha.max(value);
            } else {
                if value < best {
                    best = value;
                    best_action = Some(*action);
                }
                beta = beta.min(value);
            }
            if beta <= alpha {
                break;
            }
        }

        (best_action, best)
    }
}

// ============================================================================
// TESTS
// ============================================================================
