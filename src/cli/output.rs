//! Output formatting utilities for CLI.

use mi50::game::{FINISH, GameState, Notification, Severity, special_square};
use mi50::replay::ReplayOutcome;
use mi50::sim::{MatchResult, SimulationConfig, SimulationSummary};
use serde::Serialize;

/// Prefix shown before a notification of the given tone.
fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "  ",
        Severity::Success => "+ ",
        Severity::Warning => "! ",
        Severity::Special => "* ",
        Severity::Trivia => "? ",
    }
}

/// Format notifications one per line.
pub(super) fn format_notifications(notifications: &[Notification]) -> String {
    let mut output = String::new();
    for n in notifications {
        output.push_str(severity_tag(n.severity));
        output.push_str(&n.message);
        output.push('\n');
    }
    output
}

/// Format every seat's position and power-ups.
pub(super) fn format_status(state: &GameState) -> String {
    let mut output = String::new();
    for player in &state.players {
        let square = state.position(player.id);
        let marker = if state.current_player().is_some_and(|p| p.id == player.id) {
            '>'
        } else {
            ' '
        };
        output.push_str(&format!(
            "{marker} {} (monster {}): square {square:>2}/{FINISH}",
            player.name,
            player.character + 1
        ));
        if let Some(special) = special_square(square) {
            output.push_str(&format!(" {} {}", special.icon, special.text));
        }
        let badges = state.power_ups_of(player.id).badges();
        if !badges.is_empty() {
            output.push_str(&format!("  [{}]", badges.join(", ")));
        }
        if player.skip_next_turn {
            output.push_str("  (skips next turn)");
        }
        output.push('\n');
    }
    output
}

/// JSON-serializable simulation summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulationResult {
    /// Configuration the games ran with.
    config: SimulationConfig,
    /// Games played.
    games_played: u64,
    /// Per-seat statistics.
    players: Vec<JsonSeat>,
    /// Games that hit the turn limit.
    unfinished: u64,
    /// Average game length in rolls.
    avg_turns: f64,
    /// Share of trivia answered correctly.
    trivia_accuracy: f64,
    /// Extra rolls bought.
    extra_rolls: u64,
    /// Wall-clock duration in seconds.
    duration_secs: f64,
}

/// JSON-serializable per-seat stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonSeat {
    /// Seat number (1-based).
    player: usize,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
}

impl JsonSimulationResult {
    /// Create from a summary.
    pub(super) fn from_summary(
        summary: &SimulationSummary,
        config: SimulationConfig,
        duration_secs: f64,
    ) -> Self {
        let players = (0..summary.wins.len())
            .map(|i| JsonSeat {
                player: i + 1,
                wins: summary.wins[i],
                win_rate: summary.win_rate(i),
            })
            .collect();

        Self {
            config,
            games_played: summary.games_played,
            players,
            unfinished: summary.unfinished,
            avg_turns: summary.average_turns(),
            trivia_accuracy: summary.trivia_accuracy(),
            extra_rolls: summary.extra_rolls,
            duration_secs,
        }
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_summary_text(summary: &SimulationSummary, config: &SimulationConfig) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Simulation Results ({} games, {} players)\n",
        summary.games_played, config.num_players
    ));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, wins) in summary.wins.iter().enumerate() {
        output.push_str(&format!(
            "  Player {}: {:.1}% ({wins} wins)\n",
            i + 1,
            summary.win_rate(i) * 100.0
        ));
    }
    output.push_str(&format!("  Unfinished: {}\n\n", summary.unfinished));

    output.push_str(&format!("Average Game Length: {:.1} rolls\n", summary.average_turns()));
    output.push_str(&format!(
        "Trivia: {} asked, {:.1}% correct\n",
        summary.trivia_asked,
        summary.trivia_accuracy() * 100.0
    ));
    output.push_str(&format!("Extra Rolls Bought: {}\n", summary.extra_rolls));

    output
}

/// Format a single game result as text.
pub(super) fn format_match_text(result: &MatchResult) -> String {
    let mut output = format!("Game (seed: {})\n", result.seed);
    match result.winner {
        Some(winner) => output.push_str(&format!("  Winner: Player {}\n", u16::from(winner) + 1)),
        None => output.push_str("  Winner: none (turn limit)\n"),
    }
    output.push_str(&format!("  Rolls: {}\n", result.turns_played));
    for (i, square) in result.final_positions.iter().enumerate() {
        output.push_str(&format!("  Player {}: square {square}\n", i + 1));
    }
    output
}

/// Format a replay transcript as text.
pub(super) fn format_replay_text(outcome: &ReplayOutcome) -> String {
    let mut output = String::new();
    for entry in &outcome.transcript {
        output.push_str(&format!("#{:<4} {:?}\n", entry.step, entry.command));
        output.push_str(&format_notifications(&entry.notifications));
    }
    output.push('\n');
    output.push_str(&format_status(&outcome.state));
    if let Some(winner) = outcome.state.winner.and_then(|id| outcome.state.player(id)) {
        output.push_str(&format!("\nWinner: {}\n", winner.name));
    }
    output
}
