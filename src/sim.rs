//! Bot self-play for balance testing.
//!
//! Provides a pure function interface: `(seed, config) -> MatchResult`
//!
//! The simulator handles:
//! - A seeded session per game, so every match can be replayed
//! - Simple bots that answer trivia with a fixed accuracy and buy extra
//!   rolls whenever they can
//! - Parallel batches with rayon, folded into a [`SimulationSummary`]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::GameError;
use crate::game::{InvariantViolation, MAX_PLAYERS, MIN_PLAYERS, Phase, PlayerId, Square, check_invariants};
use crate::replay::Recording;
use crate::session::SeededSession;

/// Mixed into the game seed to derive the bots' own random source.
const BOT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configuration for simulated games.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Players per game.
    pub num_players: usize,
    /// Dice rolls before a game is abandoned.
    pub max_turns: u32,
    /// Chance that a bot answers trivia correctly.
    pub answer_accuracy: f64,
    /// Whether bots spend stars on extra rolls.
    pub use_stars: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            max_turns: 500,
            answer_accuracy: 0.8,
            use_stars: true,
        }
    }
}

impl SimulationConfig {
    /// Check the configuration before any game runs.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported player count or an accuracy
    /// outside `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(SimError::Game(GameError::InvalidPlayerCount(self.num_players)));
        }
        if !(0.0..=1.0).contains(&self.answer_accuracy) {
            return Err(SimError::InvalidAccuracy(self.answer_accuracy));
        }
        Ok(())
    }
}

/// Final result of a simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The seed used for this game.
    pub seed: u64,
    /// The winning seat (None if the turn limit was hit).
    pub winner: Option<PlayerId>,
    /// Dice rolls made.
    pub turns_played: u32,
    /// Track position of every seat at the end.
    pub final_positions: Vec<Square>,
    /// Trivia questions asked.
    pub trivia_asked: u32,
    /// Trivia questions answered correctly.
    pub trivia_correct: u32,
    /// Extra rolls bought with stars.
    pub extra_rolls: u32,
}

/// Error type for simulation.
#[derive(Debug)]
pub enum SimError {
    /// A game input was rejected.
    Game(GameError),
    /// Answer accuracy outside `0.0..=1.0`.
    InvalidAccuracy(f64),
    /// A game reached a state that breaks an invariant.
    Invariant {
        /// Seed of the broken game.
        seed: u64,
        /// First violation found.
        violation: InvariantViolation,
    },
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Game(e) => write!(f, "Game rejected input: {e}"),
            Self::InvalidAccuracy(a) => write!(f, "Answer accuracy {a} outside 0.0..=1.0"),
            Self::Invariant { seed, violation } => write!(f, "Seed {seed}: {violation}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<GameError> for SimError {
    fn from(e: GameError) -> Self {
        Self::Game(e)
    }
}

/// Run a complete bot game with the given seed.
///
/// # Determinism
///
/// Given the same seed and config, this function always produces the same
/// `MatchResult`.
///
/// # Errors
///
/// Returns an error for an invalid config or if the game breaks an invariant.
pub fn run_game(seed: u64, config: &SimulationConfig) -> Result<MatchResult, SimError> {
    play(seed, config).map(|(result, _)| result)
}

/// Run a bot game and also return its recording.
///
/// # Errors
///
/// Same as [`run_game`].
pub fn record_game(seed: u64, config: &SimulationConfig) -> Result<(MatchResult, Recording), SimError> {
    play(seed, config)
}

fn play(seed: u64, config: &SimulationConfig) -> Result<(MatchResult, Recording), SimError> {
    config.validate()?;

    let mut session = SeededSession::seeded(seed);
    let mut bots = SmallRng::seed_from_u64(seed ^ BOT_SEED_SALT);
    session.start(config.num_players)?;
    for seat in 0..config.num_players {
        let character = u8::try_from(seat).map_err(|_| GameError::InvalidPlayerCount(seat))?;
        session.select_character(character)?;
    }

    let mut turns_played = 0;
    let mut trivia_asked = 0;
    let mut trivia_correct = 0;
    let mut extra_rolls = 0;

    while turns_played < config.max_turns {
        let state = session.state();
        match state.phase {
            Phase::Playing => {
                let seat = state.current_player_index;
                let stars_ready = state.power_ups[seat].has_enough_stars() && !state.extra_roll;
                if config.use_stars && stars_ready {
                    session.use_stars()?;
                    extra_rolls += 1;
                }
                session.roll()?;
                turns_played += 1;
            }
            Phase::Trivia => {
                let answer = state.trivia.as_ref().map_or(0, |t| t.question.answer);
                trivia_asked += 1;
                let text = if bots.gen_bool(config.answer_accuracy) {
                    trivia_correct += 1;
                    answer.to_string()
                } else {
                    (answer + 1).to_string()
                };
                session.submit_answer(&text)?;
            }
            Phase::Setup | Phase::CharacterSelection | Phase::Ended => break,
        }

        if let Some(violation) = check_invariants(session.state()).into_iter().next() {
            return Err(SimError::Invariant { seed, violation });
        }
    }

    let state = session.state();
    trace!(seed, turns_played, winner = ?state.winner, "game finished");
    let result = MatchResult {
        seed,
        winner: state.winner,
        turns_played,
        final_positions: state.positions.clone(),
        trivia_asked,
        trivia_correct,
        extra_rolls,
    };
    let recording = session
        .recording()
        .unwrap_or_else(|| Recording::new(seed, config.num_players, session.actions().to_vec()));
    Ok((result, recording))
}

/// Aggregated statistics over many games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    /// Games completed (won or abandoned).
    pub games_played: u64,
    /// Wins per seat.
    pub wins: Vec<u64>,
    /// Games that hit the turn limit.
    pub unfinished: u64,
    /// Dice rolls over all games.
    pub total_turns: u64,
    /// Trivia questions asked over all games.
    pub trivia_asked: u64,
    /// Correct trivia answers over all games.
    pub trivia_correct: u64,
    /// Extra rolls bought over all games.
    pub extra_rolls: u64,
}

impl SimulationSummary {
    /// Create empty stats for `num_players` seats.
    #[must_use]
    pub fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            ..Self::default()
        }
    }

    /// Fold one game into the stats.
    pub fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        match result.winner {
            Some(winner) => {
                if let Some(count) = self.wins.get_mut(usize::from(winner)) {
                    *count += 1;
                }
            }
            None => self.unfinished += 1,
        }
        self.total_turns += u64::from(result.turns_played);
        self.trivia_asked += u64::from(result.trivia_asked);
        self.trivia_correct += u64::from(result.trivia_correct);
        self.extra_rolls += u64::from(result.extra_rolls);
    }

    /// Merge stats gathered on another thread.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        if self.wins.len() < other.wins.len() {
            self.wins.resize(other.wins.len(), 0);
        }
        for (mine, theirs) in self.wins.iter_mut().zip(&other.wins) {
            *mine += theirs;
        }
        self.unfinished += other.unfinished;
        self.total_turns += other.total_turns;
        self.trivia_asked += other.trivia_asked;
        self.trivia_correct += other.trivia_correct;
        self.extra_rolls += other.extra_rolls;
    }

    /// Mean dice rolls per game.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }

    /// Share of trivia questions answered correctly.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn trivia_accuracy(&self) -> f64 {
        if self.trivia_asked == 0 {
            return 0.0;
        }
        self.trivia_correct as f64 / self.trivia_asked as f64
    }

    /// Share of games won by `seat`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, seat: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(seat).copied().unwrap_or(0) as f64 / self.games_played as f64
    }
}

/// Run many games in parallel and aggregate their stats.
///
/// Uses a lock-free fold/reduce: each worker accumulates its own summary.
///
/// # Errors
///
/// Returns an error for an invalid config, or the first game to break an
/// invariant.
pub fn run_many<I>(seeds: I, config: &SimulationConfig) -> Result<SimulationSummary, SimError>
where
    I: IntoParallelIterator<Item = u64>,
{
    config.validate()?;
    let num_players = config.num_players;

    let summary = seeds
        .into_par_iter()
        .map(|seed| run_game(seed, config))
        .try_fold(
            || SimulationSummary::new(num_players),
            |mut local, result| {
                local.add_result(&result?);
                Ok::<_, SimError>(local)
            },
        )
        .try_reduce(
            || SimulationSummary::new(num_players),
            |mut a, b| {
                a.merge(&b);
                Ok(a)
            },
        )?;

    debug!(games = summary.games_played, "batch finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.num_players, 2);
        assert_eq!(config.max_turns, 500);
        assert!(config.use_stars);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            num_players: 5,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            run_game(1, &config),
            Err(SimError::Game(GameError::InvalidPlayerCount(5)))
        ));

        let config = SimulationConfig {
            answer_accuracy: 1.5,
            ..SimulationConfig::default()
        };
        assert!(matches!(run_game(1, &config), Err(SimError::InvalidAccuracy(_))));
    }

    #[test]
    fn test_run_game_deterministic() {
        let config = SimulationConfig::default();
        let a = run_game(12345, &config).unwrap();
        let b = run_game(12345, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, 12345);
        assert_eq!(a.final_positions.len(), 2);
    }

    #[test]
    fn test_games_usually_finish() {
        let config = SimulationConfig {
            num_players: 4,
            ..SimulationConfig::default()
        };
        let finished = (0..20)
            .filter_map(|seed| run_game(seed, &config).ok())
            .filter(|r| r.winner.is_some())
            .count();
        assert!(finished > 10, "only {finished} of 20 games finished");
    }

    #[test]
    fn test_winner_is_on_finish() {
        let config = SimulationConfig::default();
        for seed in 0..10 {
            let result = run_game(seed, &config).unwrap();
            if let Some(winner) = result.winner {
                assert_eq!(result.final_positions[usize::from(winner)], 50);
            }
        }
    }

    #[test]
    fn test_perfect_accuracy() {
        let config = SimulationConfig {
            answer_accuracy: 1.0,
            ..SimulationConfig::default()
        };
        let summary = run_many(0..10u64, &config).unwrap();
        assert_eq!(summary.trivia_asked, summary.trivia_correct);
    }

    #[test]
    fn test_recorded_game_replays() {
        let config = SimulationConfig::default();
        let (result, recording) = record_game(77, &config).unwrap();
        let outcome = recording.replay().unwrap();
        assert_eq!(outcome.state.winner, result.winner);
        assert_eq!(outcome.state.positions, result.final_positions);
    }

    #[test]
    fn test_run_many_matches_sequential() {
        let config = SimulationConfig::default();
        let parallel = run_many(0..16u64, &config).unwrap();

        let mut sequential = SimulationSummary::new(2);
        for seed in 0..16 {
            sequential.add_result(&run_game(seed, &config).unwrap());
        }
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.games_played, 16);
        assert_eq!(parallel.wins.iter().sum::<u64>() + parallel.unfinished, 16);
    }

    #[test]
    fn test_summary_rates() {
        let mut summary = SimulationSummary::new(2);
        assert!(summary.average_turns().abs() < f64::EPSILON);
        summary.add_result(&MatchResult {
            seed: 0,
            winner: Some(1),
            turns_played: 30,
            final_positions: vec![20, 50],
            trivia_asked: 4,
            trivia_correct: 3,
            extra_rolls: 1,
        });
        assert!((summary.average_turns() - 30.0).abs() < f64::EPSILON);
        assert!((summary.trivia_accuracy() - 0.75).abs() < f64::EPSILON);
        assert!((summary.win_rate(1) - 1.0).abs() < f64::EPSILON);
        assert!(summary.win_rate(0).abs() < f64::EPSILON);
    }
}
