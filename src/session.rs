//! Game session: the canonical owner of a running game.
//!
//! A session holds the current [`GameState`] snapshot, the question oracle
//! and the random source. Inputs go through the pure reducers; accepted
//! ones replace the snapshot and are appended to the command log, rejected
//! ones leave everything untouched and are logged.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::GameResult;
use crate::game::{GameState, Notification, SoundCue, Transition, roll_dice};
use crate::replay::Recording;
use crate::trivia::{MathQuestionGenerator, QuestionOracle};

/// A player input accepted by a session, as recorded for replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Pick a character for the next seat.
    SelectCharacter(u8),
    /// Throw the die using the session's random source.
    Roll,
    /// Apply a given die value.
    RollValue(u8),
    /// Answer the pending trivia question.
    Answer(String),
    /// Spend stars for an extra roll.
    UseStars,
}

/// Side-channel output of an accepted input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    /// Messages, in order.
    pub notifications: Vec<Notification>,
    /// Suggested sounds, in order.
    pub cues: Vec<SoundCue>,
}

/// Session with the stock question generator, fully determined by a seed.
pub type SeededSession = GameSession<MathQuestionGenerator<SmallRng>, SmallRng>;

/// Owns a game and applies inputs to it.
#[derive(Debug, Clone)]
pub struct GameSession<O, R> {
    state: GameState,
    oracle: O,
    rng: R,
    seed: Option<u64>,
    commands: Vec<Command>,
}

impl SeededSession {
    /// Create a session whose dice, trivia draws and questions all derive
    /// from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let oracle = MathQuestionGenerator::new(SmallRng::seed_from_u64(rng.next_u64()));
        let mut session = Self::new(oracle, rng);
        session.seed = Some(seed);
        session
    }
}

impl<O: QuestionOracle, R: Rng> GameSession<O, R> {
    /// Create a session in the setup phase.
    #[must_use]
    pub fn new(oracle: O, rng: R) -> Self {
        Self {
            state: GameState::new(),
            oracle,
            rng,
            seed: None,
            commands: Vec::new(),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Commands accepted since the game was started.
    #[must_use]
    pub fn actions(&self) -> &[Command] {
        &self.commands
    }

    /// Recording of this game, if the session is seeded and has been started.
    #[must_use]
    pub fn recording(&self) -> Option<Recording> {
        let seed = self.seed?;
        if self.state.num_players == 0 {
            return None;
        }
        Some(Recording::new(seed, self.state.num_players, self.commands.clone()))
    }

    /// Choose the number of players.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the session is left unchanged.
    pub fn start(&mut self, num_players: usize) -> GameResult<Step> {
        let result = self.state.setup(num_players);
        let step = self.commit(result, None)?;
        info!(num_players, seed = ?self.seed, "game started");
        Ok(step)
    }

    /// Pick a character for the next seat.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the session is left unchanged.
    pub fn select_character(&mut self, character: u8) -> GameResult<Step> {
        let result = self.state.select_character(character);
        self.commit(result, Some(Command::SelectCharacter(character)))
    }

    /// Throw the die and apply the result.
    ///
    /// Nothing is drawn from the random source when rolling is not allowed.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the session is left unchanged.
    pub fn roll(&mut self) -> GameResult<Step> {
        if let Err(err) = self.state.ensure_can_roll() {
            warn!(%err, phase = %self.state.phase, "input rejected");
            return Err(err);
        }
        let value = roll_dice(&mut self.rng);
        let result = self.state.apply_roll(value, &mut self.oracle, &mut self.rng);
        self.commit(result, Some(Command::Roll))
    }

    /// Apply a die value chosen by the caller.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the session is left unchanged.
    pub fn roll_with(&mut self, value: u8) -> GameResult<Step> {
        let result = self.state.apply_roll(value, &mut self.oracle, &mut self.rng);
        self.commit(result, Some(Command::RollValue(value)))
    }

    /// Answer the pending trivia question.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the session is left unchanged.
    pub fn submit_answer(&mut self, answer: &str) -> GameResult<Step> {
        let result = self.state.apply_answer(answer, &mut self.rng);
        self.commit(result, Some(Command::Answer(answer.to_string())))
    }

    /// Spend stars for an extra roll.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the session is left unchanged.
    pub fn use_stars(&mut self) -> GameResult<Step> {
        let result = self.state.use_stars();
        self.commit(result, Some(Command::UseStars))
    }

    /// Apply a recorded command.
    ///
    /// # Errors
    ///
    /// Returns the rejection; the session is left unchanged.
    pub fn apply(&mut self, command: &Command) -> GameResult<Step> {
        match command {
            Command::SelectCharacter(character) => self.select_character(*character),
            Command::Roll => self.roll(),
            Command::RollValue(value) => self.roll_with(*value),
            Command::Answer(answer) => self.submit_answer(answer),
            Command::UseStars => self.use_stars(),
        }
    }

    /// Discard the game and return to setup.
    ///
    /// The command log is cleared. The random source is not rewound, so a
    /// reset session no longer produces recordings.
    pub fn reset(&mut self) -> Step {
        let t = self.state.reset();
        self.commands.clear();
        self.seed = None;
        debug!("session reset");
        self.replace(t)
    }

    fn commit(&mut self, result: GameResult<Transition>, command: Option<Command>) -> GameResult<Step> {
        match result {
            Ok(t) => {
                match command {
                    Some(command) => self.commands.push(command),
                    None => self.commands.clear(),
                }
                Ok(self.replace(t))
            }
            Err(err) => {
                warn!(%err, ?command, phase = %self.state.phase, "input rejected");
                Err(err)
            }
        }
    }

    fn replace(&mut self, t: Transition) -> Step {
        self.state = t.state;
        Step {
            notifications: t.notifications,
            cues: t.cues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::game::Phase;

    fn started(seed: u64, players: usize) -> SeededSession {
        let mut session = GameSession::seeded(seed);
        session.start(players).unwrap();
        for character in 0..players {
            session.select_character(u8::try_from(character).unwrap()).unwrap();
        }
        session
    }

    #[test]
    fn test_rejected_input_is_noop() {
        let mut session = GameSession::seeded(1);
        assert!(session.roll().is_err());
        assert!(session.submit_answer("3").is_err());
        assert_eq!(session.state(), &GameState::new());
        assert!(session.actions().is_empty());
        assert!(session.recording().is_none());
    }

    #[test]
    fn test_commands_are_recorded() {
        let mut session = started(9, 2);
        session.roll_with(1).unwrap();
        assert_eq!(session.use_stars(), Err(GameError::NotEnoughStars { have: 0 }));
        assert_eq!(
            session.actions(),
            &[
                Command::SelectCharacter(0),
                Command::SelectCharacter(1),
                Command::RollValue(1),
            ]
        );
        let recording = session.recording().unwrap();
        assert_eq!(recording.seed, 9);
        assert_eq!(recording.num_players, 2);
    }

    #[test]
    fn test_roll_moves_current_player() {
        let mut session = started(3, 2);
        let step = session.roll().unwrap();
        let roll = session.state().last_roll.unwrap();
        assert!((1..=6).contains(&roll));
        assert_eq!(step.cues[0], SoundCue::DiceRoll);
        assert_ne!(session.state().phase, Phase::Setup);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = started(77, 3);
        let mut b = started(77, 3);
        for _ in 0..40 {
            if a.state().phase == Phase::Trivia {
                a.submit_answer("0").unwrap();
                b.submit_answer("0").unwrap();
            } else if a.state().phase == Phase::Playing {
                a.roll().unwrap();
                b.roll().unwrap();
            }
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_reset_returns_to_setup() {
        let mut session = started(5, 2);
        session.roll_with(1).unwrap();
        session.reset();
        assert_eq!(session.state().phase, Phase::Setup);
        assert!(session.actions().is_empty());
        session.start(2).unwrap();
        assert!(session.recording().is_none());
    }
}
