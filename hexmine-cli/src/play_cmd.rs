//! Play command - referee games between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_one(), report_results()
//! - Level 3: build_agent(), watch_game()
//! - Level 4: argument parsing and formatting utilities

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hexmine_arena::{BoxedProvider, GameConfig, GameOutcome, TurnEngine};
use hexmine_core::{Color, Heuristics, RandomPlayer, SearchConfig, SearchPlayer};

use crate::render::{render_board, render_winner};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game config JSON file; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Red agent: "random", "search" or "search:<depth>"
    #[arg(long, default_value = "search:1")]
    pub red: AgentSpec,

    /// Blue agent: "random", "search" or "search:<depth>"
    #[arg(long, default_value = "random")]
    pub blue: AgentSpec,

    /// Play on the small board
    #[arg(long)]
    pub small: bool,

    /// Seconds allowed per decision
    #[arg(long)]
    pub time_per_move: Option<f64>,

    /// Starting reserve per side, in seconds
    #[arg(long)]
    pub reserve: Option<f64>,

    /// Side that acts first
    #[arg(long, value_enum)]
    pub first: Option<Side>,

    /// Minimum seconds per decision, for watching
    #[arg(long)]
    pub min_decision_time: Option<f64>,

    /// Stop with no winner after this many turns
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Heuristic weights JSON file for search agents
    #[arg(long, value_name = "FILE")]
    pub heuristics: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Print the board after every turn
    #[arg(long)]
    pub show: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Red,
    Blue,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Red => Color::Red,
            Side::Blue => Color::Blue,
        }
    }
}

/// Which agent plays a side
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentSpec {
    Random,
    Search { depth: u32 },
}

impl FromStr for AgentSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None if s == "random" => Ok(AgentSpec::Random),
            None if s == "search" => Ok(AgentSpec::Search {
                depth: SearchConfig::default().depth,
            }),
            Some(("search", depth)) => depth
                .parse()
                .map(|depth| AgentSpec::Search { depth })
                .map_err(|_| format!("invalid search depth: {}", depth)),
            _ => Err(format!("unknown agent: {}", s)),
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Assemble the game config
/// 2. Play the requested games
/// 3. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args)?;
    let heuristics = load_heuristics(&args)?;
    let base_seed = seed.unwrap_or(0);

    tracing::info!(
        "Starting play: {:?} (red) vs {:?} (blue), {} game(s), {} board",
        args.red,
        args.blue,
        args.games,
        if config.small { "small" } else { "large" }
    );

    let mut outcomes = Vec::with_capacity(args.games);
    for game in 0..args.games {
        let game_seed = base_seed.wrapping_add(2 * game as u64);
        let outcome = play_one(&config, &heuristics, &args, game_seed)
            .with_context(|| format!("Game {} aborted", game + 1))?;
        outcomes.push(outcome);
    }

    report_results(&outcomes, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file first, then flag overrides
fn build_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if args.small {
        config.small = true;
    }
    if let Some(time_per_move) = args.time_per_move {
        config.time_per_move = time_per_move;
    }
    if let Some(reserve) = args.reserve {
        config.reserve_time = reserve;
    }
    if let Some(first) = args.first {
        config.first_player = first.into();
    }
    if let Some(min) = args.min_decision_time {
        config.min_decision_time = min;
    }
    if args.max_turns.is_some() {
        config.max_turns = args.max_turns;
    }

    config.validate()?;
    Ok(config)
}

fn load_heuristics(args: &PlayArgs) -> Result<Heuristics> {
    let Some(path) = &args.heuristics else {
        return Ok(Heuristics::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read heuristics: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse heuristics: {}", path.display()))
}

fn play_one(config: &GameConfig, heuristics: &Heuristics, args: &PlayArgs, seed: u64) -> Result<GameOutcome> {
    let red = build_agent(&args.red, heuristics, seed);
    let blue = build_agent(&args.blue, heuristics, seed.wrapping_add(1));
    let engine = TurnEngine::new(config.clone(), red, blue);

    if args.show {
        watch_game(engine)
    } else {
        Ok(engine.play_game()?)
    }
}

fn report_results(outcomes: &[GameOutcome], args: &PlayArgs) -> Result<()> {
    if args.json {
        let games: Vec<serde_json::Value> = outcomes.iter().map(outcome_json).collect();
        println!("{}", serde_json::to_string_pretty(&games)?);
        return Ok(());
    }

    for (i, outcome) in outcomes.iter().enumerate() {
        if !args.show {
            print!("{}", render_board(&outcome.final_board));
        }
        println!("game {}: {} after {} turn(s)", i + 1, render_winner(outcome.winner), outcome.turns);
        if let Some(loss) = &outcome.loss {
            println!("  {} ({}) lost: {}", loss.provider, loss.loser, loss.reason);
        }
    }

    if outcomes.len() > 1 {
        let red = outcomes.iter().filter(|o| o.red_wins()).count();
        let blue = outcomes.iter().filter(|o| o.blue_wins()).count();
        let draws = outcomes.len() - red - blue;
        println!("red {} / blue {} / no result {}", red, blue, draws);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn build_agent(spec: &AgentSpec, heuristics: &Heuristics, seed: u64) -> BoxedProvider {
    match spec {
        AgentSpec::Random => Box::new(RandomPlayer::new(seed)),
        AgentSpec::Search { depth } => Box::new(SearchPlayer::with_heuristics(
            SearchConfig::with_depth(*depth),
            heuristics.clone(),
        )),
    }
}

/// Step turn by turn, printing the board as it goes
fn watch_game(mut engine: TurnEngine) -> Result<GameOutcome> {
    print!("{}", render_board(engine.state().board()));
    while !engine.phase().is_terminal() {
        engine.step()?;
        println!();
        print!("{}", render_board(engine.state().board()));
        let reserves = [Color::Red, Color::Blue].map(|c| format_secs(engine.state().reserve(c)));
        println!("turn {} | reserve red {} blue {}", engine.state().turn(), reserves[0], reserves[1]);
    }
    Ok(engine.into_outcome())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn outcome_json(outcome: &GameOutcome) -> serde_json::Value {
    serde_json::json!({
        "winner": outcome.winner,
        "turns": outcome.turns,
        "loser": outcome.loss.as_ref().map(|l| l.loser),
        "loser_provider": outcome.loss.as_ref().map(|l| l.provider.clone()),
        "reason": outcome.loss.as_ref().map(|l| l.reason.to_string()),
        "history": outcome.history.iter().map(|t| serde_json::json!({
            "color": t.color,
            "mine": t.mine,
            "walk": t.walk,
            "removed": t.removed,
        })).collect::<Vec<_>>(),
    })
}

fn format_secs(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_agent_spec() {
        assert_eq!("random".parse::<AgentSpec>(), Ok(AgentSpec::Random));
        assert_eq!("search".parse::<AgentSpec>(), Ok(AgentSpec::Search { depth: 2 }));
        assert_eq!("search:3".parse::<AgentSpec>(), Ok(AgentSpec::Search { depth: 3 }));
        assert!("search:x".parse::<AgentSpec>().is_err());
        assert!("minimax".parse::<AgentSpec>().is_err());
    }

    #[test]
    fn test_format_secs() {
        assert_eq!(format_secs(Duration::from_millis(1500)), "1.50s");
    }
}
