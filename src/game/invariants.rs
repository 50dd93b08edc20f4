//! Game invariants - sanity checks that detect bugs.
//!
//! These should NEVER trigger in a game driven only through the reducers.
//! If they do, a reducer has a bug. Simulation, replay and fuzzing call
//! them after every transition.

use crate::game::{FINISH, GameState, MAX_PLAYERS, Phase, PlayerId};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if state.num_players > MAX_PLAYERS {
        violations.push(InvariantViolation::new(format!(
            "{} seats exceeds max {MAX_PLAYERS}",
            state.num_players
        )));
    }
    if state.players.len() > state.num_players {
        violations.push(InvariantViolation::new(format!(
            "{} players for {} seats",
            state.players.len(),
            state.num_players
        )));
    }

    // Players are seated in order and characters are unique.
    for (seat, player) in state.players.iter().enumerate() {
        if usize::from(player.id) != seat {
            violations.push(InvariantViolation::new(format!(
                "Player {} sits in seat {seat}",
                player.id
            )));
        }
        if state.players[..seat].iter().any(|p| p.character == player.character) {
            violations.push(InvariantViolation::new(format!(
                "Character {} picked twice",
                player.character
            )));
        }
    }

    let in_play = matches!(state.phase, Phase::Playing | Phase::Trivia | Phase::Ended);
    if in_play {
        let seats = state.players.len();
        if seats != state.num_players {
            violations.push(InvariantViolation::new(format!(
                "{seats} players seated in a {}-seat game",
                state.num_players
            )));
        }
        for (what, len) in [
            ("positions", state.positions.len()),
            ("power-ups", state.power_ups.len()),
            ("difficulties", state.difficulty.len()),
        ] {
            if len != seats {
                violations.push(InvariantViolation::new(format!(
                    "{len} {what} for {seats} players"
                )));
            }
        }
        if state.current_player_index >= seats {
            violations.push(InvariantViolation::new(format!(
                "Current player index {} out of {seats} seats",
                state.current_player_index
            )));
        }
    } else if !state.positions.is_empty() || !state.power_ups.is_empty() {
        violations.push(InvariantViolation::new(format!(
            "Board state present during {}",
            state.phase
        )));
    }

    for (seat, &position) in state.positions.iter().enumerate() {
        if position > FINISH {
            violations.push(InvariantViolation::new(format!(
                "Player {seat} at square {position} past finish {FINISH}"
            )));
        }
    }

    let seated = |id: PlayerId| usize::from(id) < state.players.len();

    match (state.phase, state.winner) {
        (Phase::Ended, Some(winner)) => {
            if !seated(winner) {
                violations.push(InvariantViolation::new(format!("Winner {winner} not seated")));
            } else if state.position(winner) != FINISH {
                violations.push(InvariantViolation::new(format!(
                    "Winner {winner} stands on square {}",
                    state.position(winner)
                )));
            }
        }
        (Phase::Ended, None) => {
            violations.push(InvariantViolation::new("Game ended without a winner"));
        }
        (phase, Some(winner)) => {
            violations.push(InvariantViolation::new(format!(
                "Winner {winner} set during {phase}"
            )));
        }
        (_, None) => {}
    }

    match (&state.trivia, state.phase) {
        (Some(active), Phase::Trivia) => {
            if !seated(active.player) {
                violations.push(InvariantViolation::new(format!(
                    "Trivia player {} not seated",
                    active.player
                )));
            }
        }
        (None, Phase::Trivia) => {
            violations.push(InvariantViolation::new("Trivia phase without a question"));
        }
        (Some(_), phase) => {
            violations.push(InvariantViolation::new(format!(
                "Trivia question pending during {phase}"
            )));
        }
        (None, _) => {}
    }

    if let Some(waiting) = state.waiting {
        if !seated(waiting.player) {
            violations.push(InvariantViolation::new(format!(
                "Waiting player {} not seated",
                waiting.player
            )));
        }
        if state.phase == Phase::Ended {
            violations.push(InvariantViolation::new("Deferred roll pending after the game ended"));
        }
    }

    if state.extra_roll && state.phase != Phase::Playing && state.phase != Phase::Trivia {
        violations.push(InvariantViolation::new(format!(
            "Extra roll pending during {}",
            state.phase
        )));
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
