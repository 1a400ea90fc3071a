//! HEXMINE CLI - Command-line interface
//!
//! Commands:
//! - play: Referee games between two agents
//! - board: Print the starting position
//! - config: Write a default game config file

mod play_cmd;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexmine_arena::GameConfig;
use hexmine_core::HexBoard;

#[derive(Parser)]
#[command(name = "hexmine")]
#[command(about = "HEXMINE hex-board mining game referee")]
struct Cli {
    /// Base RNG seed for random agents
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play games between two agents
    Play(play_cmd::PlayArgs),
    /// Print the starting board
    Board {
        #[arg(long)]
        small: bool,
    },
    /// Write a default game config as JSON
    Config {
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        #[arg(long)]
        small: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Board { small } => {
            print!("{}", render::render_board(&HexBoard::new(small)));
            Ok(())
        }
        Commands::Config { output, small } => {
            let config = if small { GameConfig::small() } else { GameConfig::default() };
            config.save(&output)?;
            tracing::info!("Wrote game config to {}", output.display());
            Ok(())
        }
    }
}
