//! mi50 CLI - play, simulate and replay race-to-fifty games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use mi50::sim::SimulationConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// mi50 - race to square 50, answering math questions on the way
#[derive(Parser, Debug)]
#[command(name = "mi50")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace); `RUST_LOG` overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game in the terminal, one line per command
    Play {
        /// Number of players (2-4)
        #[arg(short = 'n', long, default_value = "2")]
        players: usize,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Save recording to file when the game stops
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Run bot games and aggregate statistics
    Simulate {
        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Players per game (2-4)
        #[arg(short = 'n', long, default_value = "2")]
        players: usize,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Dice rolls before a game is abandoned
        #[arg(short = 't', long, default_value = "500")]
        max_turns: u32,

        /// Chance that a bot answers trivia correctly (0.0-1.0)
        #[arg(short, long, default_value = "0.8")]
        accuracy: f64,

        /// Never spend stars on extra rolls
        #[arg(long)]
        no_stars: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Play { players, seed, save } => cli::play::execute(players, seed, save),

        Commands::Simulate {
            games,
            players,
            seed,
            threads,
            max_turns,
            accuracy,
            no_stars,
            format,
            progress,
        } => {
            let config = SimulationConfig {
                num_players: players,
                max_turns,
                answer_accuracy: accuracy,
                use_stars: !no_stars,
            };
            cli::simulate::execute(games, config, seed, threads, format, progress)
        }

        Commands::Replay { recording, format } => cli::replay::execute(&recording, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
