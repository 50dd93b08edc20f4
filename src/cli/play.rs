//! Play command implementation: a line-driven game on stdin/stdout.

use super::output::{format_notifications, format_status};
use super::{CliError, seed_or_clock};
use mi50::game::{CHARACTER_COUNT, Phase};
use mi50::session::{SeededSession, Step};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const HELP: &str = "Commands: <enter> or r = roll, s = spend 3 stars for an extra roll, q = quit\n";

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the setup is invalid, stdin/stdout fail, or the
/// recording cannot be saved.
pub(crate) fn execute(players: usize, seed: Option<u64>, save: Option<PathBuf>) -> Result<(), CliError> {
    let seed = seed_or_clock(seed);
    let mut session = SeededSession::seeded(seed);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "mi50 - race to square 50 (seed {seed})")?;

    let step = session.start(players)?;
    write!(out, "{}", format_notifications(&step.notifications))?;
    play_loop(&mut session, &mut stdin.lock(), &mut out)?;

    if let Some(path) = save {
        if let Some(recording) = session.recording() {
            recording.save(&path)?;
            writeln!(out, "Recording saved to {}", path.display())?;
        }
    }
    Ok(())
}

/// Drive a started session from `input` until the game ends or input runs out.
fn play_loop<B: BufRead, W: Write>(session: &mut SeededSession, input: &mut B, out: &mut W) -> Result<(), CliError> {
    let mut line = String::new();
    loop {
        let state = session.state();
        let phase = state.phase;
        match phase {
            Phase::CharacterSelection => {
                let seat = state.players.len() + 1;
                write!(out, "Player {seat}, pick a monster (1-{CHARACTER_COUNT}): ")?;
            }
            Phase::Playing => {
                write!(out, "\n{}", format_status(state))?;
                write!(out, "roll> ")?;
            }
            Phase::Trivia => {
                if let Some(active) = &state.trivia {
                    write!(out, "{}\nanswer> ", active.question.question)?;
                }
            }
            Phase::Ended => {
                write!(out, "\n{}", format_status(state))?;
                return Ok(());
            }
            Phase::Setup => return Ok(()),
        }
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let text = line.trim();

        let result = match phase {
            Phase::CharacterSelection => match text.parse::<u8>() {
                Ok(n) if n >= 1 => session.select_character(n - 1),
                _ => {
                    writeln!(out, "Please type a number from 1 to {CHARACTER_COUNT}.")?;
                    continue;
                }
            },
            Phase::Playing => match text {
                "" | "r" | "roll" => session.roll(),
                "s" | "stars" => session.use_stars(),
                "q" | "quit" => return Ok(()),
                _ => {
                    write!(out, "{HELP}")?;
                    continue;
                }
            },
            Phase::Trivia => session.submit_answer(text),
            Phase::Setup | Phase::Ended => return Ok(()),
        };

        match result {
            Ok(Step { notifications, .. }) => write!(out, "{}", format_notifications(&notifications))?,
            Err(e) => writeln!(out, "Not now: {e}")?,
        }
    }
}
