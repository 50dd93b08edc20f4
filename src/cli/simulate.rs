//! Simulate command implementation.

use super::output::{JsonSimulationResult, format_match_text, format_summary_text};
use super::{CliError, OutputFormat, seed_or_clock};
use indicatif::{ProgressBar, ProgressStyle};
use mi50::sim::{SimulationConfig, run_game, run_many};
use std::io::{self, Write};
use std::time::Instant;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a game breaks an
/// invariant.
pub(crate) fn execute(
    games: u64,
    config: SimulationConfig,
    seed: Option<u64>,
    threads: Option<usize>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    config.validate()?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);
    let mut out = io::stdout().lock();

    // A single game gets the detailed report.
    if games == 1 {
        let result = run_game(base_seed, &config)?;
        match format {
            OutputFormat::Text => write!(out, "{}", format_match_text(&result))?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?,
        }
        return Ok(());
    }

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let seeds: Vec<u64> = (0..games).map(|i| base_seed.wrapping_add(i)).collect();
    let summary = run_many(seeds, &config)?;
    let duration = start.elapsed();

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(summary.games_played);
        pb.finish_with_message("done");
    }

    match format {
        OutputFormat::Text => {
            writeln!(out)?;
            write!(out, "{}", format_summary_text(&summary, &config))?;
            writeln!(out)?;
            #[allow(clippy::cast_precision_loss)]
            let games_per_sec = if duration.as_secs_f64() > 0.0 {
                summary.games_played as f64 / duration.as_secs_f64()
            } else {
                0.0
            };
            writeln!(
                out,
                "Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                duration.as_secs_f64()
            )?;
        }
        OutputFormat::Json => {
            let json = JsonSimulationResult::from_summary(&summary, config, duration.as_secs_f64());
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
    }

    Ok(())
}
