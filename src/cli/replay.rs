//! Replay command implementation.

use super::output::format_replay_text;
use super::{CliError, OutputFormat};
use mi50::replay::Recording;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or a step fails to
/// replay.
pub(crate) fn execute(path: &Path, format: OutputFormat) -> Result<(), CliError> {
    let recording = Recording::load(path)?;
    info!(
        seed = recording.seed,
        players = recording.num_players,
        actions = recording.actions.len(),
        "replaying recording"
    );
    let outcome = recording.replay()?;

    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            writeln!(
                out,
                "Replay of {} (seed {}, {} players)\n",
                path.display(),
                recording.seed,
                recording.num_players
            )?;
            write!(out, "{}", format_replay_text(&outcome))?;
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?,
    }
    Ok(())
}
