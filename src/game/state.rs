//! Game state and the phase state machine.
//!
//! Every reducer borrows the current snapshot and returns a [`Transition`]
//! holding a fresh one. Rejected input returns an error and leaves the
//! caller's snapshot as it was.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Action, GameError, GameResult};
use crate::game::{
    BlockReason, CHARACTER_COUNT, FINISH, MAX_PLAYERS, MIN_PLAYERS, MoveOutcome, Notification,
    Player, PlayerId, PowerUps, REQUIRED_EXACT_ROLL, START, STAR_COST, Severity, SoundCue, Square,
    TurnFlow, is_safe_square, landing_effect, resolve_effect, resolve_roll,
};
use crate::trivia::{Difficulty, QuestionOracle, TriviaQuestion, adjust_difficulty, is_correct};

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Choosing the number of players.
    #[default]
    Setup,
    /// Players pick characters one at a time.
    CharacterSelection,
    /// Waiting for the current player to roll.
    Playing,
    /// Waiting for a trivia answer.
    Trivia,
    /// Someone reached square 50.
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Setup => "setup",
            Phase::CharacterSelection => "character selection",
            Phase::Playing => "playing",
            Phase::Trivia => "trivia",
            Phase::Ended => "ended",
        })
    }
}

/// Kind of deferred roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingKind {
    /// The next roll moves the waiting player instead of the roller.
    Steal,
    /// The next roll is copied to the waiting player.
    ///
    /// Resolved exactly like [`WaitingKind::Steal`]: the roller does not
    /// move. A copy that also moves the roller would be a rules change.
    Mirror,
}

/// A deferred effect claiming the next roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waiting {
    /// Steal or mirror.
    pub kind: WaitingKind,
    /// Player who will be moved by the next roll.
    pub player: PlayerId,
}

/// A trivia question awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTrivia {
    /// The question.
    pub question: TriviaQuestion,
    /// Who must answer.
    pub player: PlayerId,
}

/// Complete game state.
///
/// Per-player vectors are indexed by [`PlayerId`], which is also the seat
/// in turn order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase.
    pub phase: Phase,
    /// Seats chosen at setup.
    pub num_players: usize,
    /// Players who have picked a character.
    pub players: Vec<Player>,
    /// Seat whose turn it is.
    pub current_player_index: usize,
    /// Track position per player.
    pub positions: Vec<Square>,
    /// Power-ups per player.
    pub power_ups: Vec<PowerUps>,
    /// Trivia difficulty per player.
    pub difficulty: Vec<Difficulty>,
    /// Most recent die value.
    pub last_roll: Option<u8>,
    /// Deferred steal/mirror claim on the next roll.
    pub waiting: Option<Waiting>,
    /// Question awaiting an answer.
    pub trivia: Option<ActiveTrivia>,
    /// The current player bought an extra roll with stars.
    pub extra_roll: bool,
    /// Winner, once the game has ended.
    pub winner: Option<PlayerId>,
    /// Headline of the last transition: its first non-info message, else its first.
    pub notification: Option<Notification>,
}

/// Result of a successful reducer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The new snapshot.
    pub state: GameState,
    /// Messages produced, in order. The headline is also stored on the state.
    pub notifications: Vec<Notification>,
    /// Suggested sounds, in order.
    pub cues: Vec<SoundCue>,
}

impl Transition {
    fn begin(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            notifications: Vec::new(),
            cues: Vec::new(),
        }
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notifications.push(Notification::new(message, severity));
    }

    pub(crate) fn cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    pub(crate) fn name_of(&self, player: PlayerId) -> String {
        self.state.players[usize::from(player)].name.clone()
    }

    /// End the game with `player` as winner.
    pub(crate) fn declare_winner(&mut self, player: PlayerId) {
        let name = self.name_of(player);
        self.state.phase = Phase::Ended;
        self.state.winner = Some(player);
        self.state.waiting = None;
        self.state.trivia = None;
        self.state.extra_roll = false;
        self.notify(
            format!("🏆 {name} reached square {FINISH} and wins! 🎉"),
            Severity::Success,
        );
        self.cue(SoundCue::Victory);
        debug!(player, "game won");
    }

    /// Close the current turn: keep it for a bought extra roll, otherwise
    /// pass it on, forwarding past anyone who must skip.
    fn end_turn(&mut self) {
        if self.state.extra_roll {
            self.state.extra_roll = false;
            let name = self.name_of(self.state.current_seat());
            // A penalty earned this turn forfeits the bought roll.
            if !self.state.players[self.state.current_player_index].skip_next_turn {
                self.notify(format!("⭐ {name} takes the extra roll!"), Severity::Success);
                return;
            }
            self.notify(format!("💫 {name} loses the extra roll!"), Severity::Warning);
        }

        let seats = self.state.players.len();
        loop {
            self.state.current_player_index = (self.state.current_player_index + 1) % seats;
            let seat = self.state.current_player_index;
            if !self.state.players[seat].skip_next_turn {
                break;
            }
            self.state.players[seat] = self.state.players[seat].with_skip(false);
            let name = self.state.players[seat].name.clone();
            self.notify(format!("😔 {name} skipped their turn!"), Severity::Info);
            debug!(seat, "turn forwarded");
        }

        let name = self.name_of(self.state.current_seat());
        self.notify(
            format!("🎮 {name}'s turn! Roll the dice to move."),
            Severity::Info,
        );
    }

    /// Store the headline: the first message with a tone other than
    /// [`Severity::Info`], or the first message when all are plain.
    fn finish(mut self) -> Self {
        let headline = self
            .notifications
            .iter()
            .find(|n| n.severity != Severity::Info)
            .or_else(|| self.notifications.first());
        if let Some(headline) = headline {
            self.state.notification = Some(headline.clone());
        }
        self
    }
}

impl GameState {
    /// Create a fresh game waiting for setup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The player whose turn it is, once play has started.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        match self.phase {
            Phase::Playing | Phase::Trivia | Phase::Ended => {
                self.players.get(self.current_player_index)
            }
            Phase::Setup | Phase::CharacterSelection => None,
        }
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    /// Track position of a player (start square if unknown).
    #[must_use]
    pub fn position(&self, id: PlayerId) -> Square {
        self.positions.get(usize::from(id)).copied().unwrap_or(START)
    }

    /// Power-ups of a player (empty if unknown).
    #[must_use]
    pub fn power_ups_of(&self, id: PlayerId) -> PowerUps {
        self.power_ups.get(usize::from(id)).copied().unwrap_or_default()
    }

    /// Trivia difficulty of a player.
    #[must_use]
    pub fn difficulty_of(&self, id: PlayerId) -> Difficulty {
        self.difficulty.get(usize::from(id)).copied().unwrap_or_default()
    }

    /// Check if the game is over.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    fn current_seat(&self) -> PlayerId {
        // Seats never exceed MAX_PLAYERS.
        PlayerId::try_from(self.current_player_index).unwrap_or(PlayerId::MAX)
    }

    fn expect_phase(&self, action: Action, expected: Phase) -> GameResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                action,
                expected,
                actual: self.phase,
            })
        }
    }

    /// Check that a die roll would be accepted now.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Playing`].
    pub fn ensure_can_roll(&self) -> GameResult<()> {
        self.expect_phase(Action::Roll, Phase::Playing)
    }

    /// Choose the number of players and move on to character selection.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Setup`] or for fewer than 2 or more than 4 players.
    pub fn setup(&self, num_players: usize) -> GameResult<Transition> {
        self.expect_phase(Action::Setup, Phase::Setup)?;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::InvalidPlayerCount(num_players));
        }

        let mut t = Transition::begin(&Self::new());
        t.state.phase = Phase::CharacterSelection;
        t.state.num_players = num_players;
        t.notify(
            "🎮 Time to choose your characters! Player 1, pick your monster! 👾",
            Severity::Info,
        );
        t.cue(SoundCue::ButtonClick);
        debug!(num_players, "setup");
        Ok(t.finish())
    }

    /// Assign `character` to the next seat. Starts play once every seat is filled.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::CharacterSelection`], for an unknown
    /// character, or for one already taken.
    pub fn select_character(&self, character: u8) -> GameResult<Transition> {
        self.expect_phase(Action::SelectCharacter, Phase::CharacterSelection)?;
        if character >= CHARACTER_COUNT {
            return Err(GameError::UnknownCharacter(character));
        }
        if self.players.iter().any(|p| p.character == character) {
            return Err(GameError::CharacterTaken(character));
        }

        let mut t = Transition::begin(self);
        let id = PlayerId::try_from(self.players.len()).unwrap_or(PlayerId::MAX);
        t.state.players.push(Player::new(id, character));
        t.cue(SoundCue::ButtonClick);
        debug!(player = id, character, "character selected");

        if t.state.players.len() == t.state.num_players {
            let seats = t.state.num_players;
            t.state.phase = Phase::Playing;
            t.state.current_player_index = 0;
            t.state.positions = vec![START; seats];
            t.state.power_ups = vec![PowerUps::default(); seats];
            t.state.difficulty = vec![Difficulty::default(); seats];
            let first = t.name_of(0);
            t.notify(
                format!("🎮 {first} goes first! Click the big dice to play! 🎲"),
                Severity::Info,
            );
        } else {
            let next = crate::game::default_name(id + 1);
            t.notify(format!("🎮 {next}, choose your monster! 👾"), Severity::Info);
        }
        Ok(t.finish())
    }

    /// Apply a die roll for the current turn.
    ///
    /// A pending steal/mirror claim redirects the roll to the waiting
    /// player. Otherwise the current player moves, and the square they land
    /// on may fire an effect; a trivia square draws a question from `oracle`.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Playing`] or for a die value outside `1..=6`.
    pub fn apply_roll<O, R>(&self, roll: u8, oracle: &mut O, rng: &mut R) -> GameResult<Transition>
    where
        O: QuestionOracle + ?Sized,
        R: Rng + ?Sized,
    {
        self.expect_phase(Action::Roll, Phase::Playing)?;
        if !(1..=6).contains(&roll) {
            return Err(GameError::InvalidRoll(roll));
        }

        let mut t = Transition::begin(self);
        t.state.last_roll = Some(roll);
        t.cue(SoundCue::DiceRoll);

        let flow = match t.state.waiting.take() {
            Some(waiting) => redirect_roll(&mut t, waiting, roll),
            None => move_current_player(&mut t, roll, oracle, rng),
        };
        trace!(?flow, roll, "roll resolved");

        if flow == TurnFlow::EndTurn {
            t.end_turn();
        }
        Ok(t.finish())
    }

    /// Judge the pending trivia answer and hand the turn on.
    ///
    /// Anything that does not parse as the expected number is wrong. A wrong
    /// answer costs the player their next turn.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Trivia`].
    pub fn apply_answer<R: Rng + ?Sized>(&self, answer: &str, rng: &mut R) -> GameResult<Transition> {
        self.expect_phase(Action::Answer, Phase::Trivia)?;
        let Some(active) = &self.trivia else {
            return Err(GameError::InvalidPhase {
                action: Action::Answer,
                expected: Phase::Trivia,
                actual: self.phase,
            });
        };

        let mut t = Transition::begin(self);
        t.state.phase = Phase::Playing;
        t.state.trivia = None;

        let seat = usize::from(active.player);
        let name = t.name_of(active.player);
        let correct = is_correct(&active.question, answer);
        let before = t.state.difficulty[seat];
        let after = adjust_difficulty(before, correct, rng);
        t.state.difficulty[seat] = after;

        if correct {
            t.notify(
                format!(
                    "🎉 Correct! Great job, {name}! The answer is {}! 🌟",
                    active.question.answer
                ),
                Severity::Success,
            );
            t.cue(SoundCue::CorrectAnswer);
        } else {
            t.state.players[seat] = t.state.players[seat].with_skip(true);
            t.notify(
                format!(
                    "❌ Not quite, {name}! The answer was {}. You'll skip your next turn.",
                    active.question.answer
                ),
                Severity::Warning,
            );
            t.cue(SoundCue::WrongAnswer);
        }
        debug!(player = active.player, correct, %before, %after, "trivia answered");

        t.end_turn();
        Ok(t.finish())
    }

    /// Spend stars so the current player keeps the turn once it would end.
    ///
    /// # Errors
    ///
    /// Fails outside [`Phase::Playing`], with fewer than 3 stars, or when an
    /// extra roll is already pending.
    pub fn use_stars(&self) -> GameResult<Transition> {
        self.expect_phase(Action::UseStars, Phase::Playing)?;
        let seat = self.current_player_index;
        let power = self.power_ups[seat];
        if !power.has_enough_stars() {
            return Err(GameError::NotEnoughStars { have: power.stars });
        }
        if self.extra_roll {
            return Err(GameError::ExtraRollPending);
        }

        let mut t = Transition::begin(self);
        t.state.power_ups[seat] = power.spend_stars_for_extra_roll();
        t.state.extra_roll = true;
        let name = t.name_of(self.current_seat());
        t.notify(
            format!("⭐ {name} used {STAR_COST} stars for an extra roll!"),
            Severity::Success,
        );
        t.cue(SoundCue::ButtonClick);
        debug!(seat, "extra roll bought");
        Ok(t.finish())
    }

    /// Discard everything and return to setup. Always allowed.
    #[must_use]
    pub fn reset(&self) -> Transition {
        let mut t = Transition::begin(&Self::new());
        t.cue(SoundCue::ButtonClick);
        t.finish()
    }
}

/// Move the waiting player by the literal die value.
fn redirect_roll(t: &mut Transition, waiting: Waiting, roll: u8) -> TurnFlow {
    let seat = usize::from(waiting.player);
    let from = t.state.positions[seat];
    let outcome = resolve_roll(from, roll, roll);
    let to = outcome.destination();
    t.state.positions[seat] = to;

    let name = t.name_of(waiting.player);
    let mut message = match waiting.kind {
        WaitingKind::Steal => format!("🏴‍☠️ {name} stole the roll of {roll}! ({from} → {to})"),
        WaitingKind::Mirror => format!("🪞 {name} copied the roll of {roll}! ({from} → {to})"),
    };
    match outcome {
        MoveOutcome::Blocked {
            reason: BlockReason::NeedsExactRoll,
            ..
        } => message.push_str(&format!(" {name} needs a {REQUIRED_EXACT_ROLL} to move!")),
        MoveOutcome::Blocked { .. } => message.push_str(" Too far to move!"),
        MoveOutcome::Legal(_) | MoveOutcome::Win => {}
    }
    t.notify(message, Severity::Special);
    t.cue(SoundCue::PlayerMove);
    debug!(player = waiting.player, ?waiting.kind, from, to, "roll redirected");

    if outcome == MoveOutcome::Win {
        t.declare_winner(waiting.player);
        return TurnFlow::GameOver;
    }
    TurnFlow::EndTurn
}

/// Move the current player, committing the speed boost only on a real move.
fn move_current_player<O, R>(t: &mut Transition, roll: u8, oracle: &mut O, rng: &mut R) -> TurnFlow
where
    O: QuestionOracle + ?Sized,
    R: Rng + ?Sized,
{
    let seat = t.state.current_player_index;
    let id = t.state.current_seat();
    let name = t.name_of(id);
    let from = t.state.positions[seat];
    let power = t.state.power_ups[seat];
    let boosted = power.apply_speed_boost(roll);

    let outcome = resolve_roll(from, roll, boosted.delta);
    debug!(player = id, roll, delta = boosted.delta, from, ?outcome, "move resolved");

    let to = match outcome {
        MoveOutcome::Blocked {
            reason: BlockReason::NeedsExactRoll,
            ..
        } => {
            t.notify(
                format!(
                    "🎯 {name} rolled {roll} but needs a {REQUIRED_EXACT_ROLL}! Try again next turn! 🎲"
                ),
                Severity::Warning,
            );
            return TurnFlow::EndTurn;
        }
        MoveOutcome::Blocked {
            reason: BlockReason::Overshoot,
            ..
        } => {
            let move_text = if boosted.used {
                format!("{roll}+2 (speed boost)")
            } else {
                roll.to_string()
            };
            t.notify(
                format!("🚫 Oops! {name} rolled {move_text} but that's too far! Stay at {from}! 🎯"),
                Severity::Warning,
            );
            return TurnFlow::EndTurn;
        }
        MoveOutcome::Legal(to) => to,
        MoveOutcome::Win => FINISH,
    };

    t.state.positions[seat] = to;
    if boosted.used {
        t.state.power_ups[seat] = power.clear_speed_boost();
    }
    let (move_text, boost_text) = if boosted.used {
        (format!("{roll}+2 💨"), " (Speed Boost used!)")
    } else {
        (roll.to_string(), "")
    };
    t.notify(
        format!("🎲 {name} rolled a {move_text}! Moving to square {to}!{boost_text} 🎯"),
        Severity::Info,
    );
    t.cue(SoundCue::PlayerMove);

    if to == FINISH {
        t.declare_winner(id);
        return TurnFlow::GameOver;
    }
    let Some(square) = landing_effect(to) else {
        if is_safe_square(to) {
            t.notify(
                format!("🛡️ Safe spot! {name} is protected here! 🏆"),
                Severity::Success,
            );
        }
        return TurnFlow::EndTurn;
    };
    resolve_effect(t, id, square, roll, oracle, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trivia::{Operation, Theme};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Oracle that always asks "2 + 3".
    struct FixedOracle;

    impl QuestionOracle for FixedOracle {
        fn generate_question(&mut self, difficulty: Difficulty) -> TriviaQuestion {
            TriviaQuestion {
                question: "What is 2 + 3?".to_string(),
                answer: 5,
                num1: 2,
                num2: 3,
                operation: Operation::Add,
                difficulty,
            }
        }

        fn generate_themed_question(&mut self, _theme: Theme, difficulty: Difficulty) -> TriviaQuestion {
            self.generate_question(difficulty)
        }
    }

    fn playing(num_players: usize) -> GameState {
        let mut state = GameState::new().setup(num_players).unwrap().state;
        for character in 0..num_players {
            state = state.select_character(u8::try_from(character).unwrap()).unwrap().state;
        }
        state
    }

    fn roll(state: &GameState, value: u8) -> Transition {
        let mut rng = SmallRng::seed_from_u64(0);
        state.apply_roll(value, &mut FixedOracle, &mut rng).unwrap()
    }

    fn mentions(t: &Transition, text: &str) -> bool {
        t.notifications.iter().any(|n| n.message.contains(text))
    }

    #[test]
    fn test_setup_and_selection() {
        let state = GameState::new();
        assert_eq!(state.phase, Phase::Setup);

        let state = state.setup(3).unwrap().state;
        assert_eq!(state.phase, Phase::CharacterSelection);
        assert!(state.current_player().is_none());

        let state = state.select_character(2).unwrap().state;
        assert_eq!(state.phase, Phase::CharacterSelection);
        assert_eq!(state.select_character(2), Err(GameError::CharacterTaken(2)));
        assert_eq!(state.select_character(4), Err(GameError::UnknownCharacter(4)));

        let state = state.select_character(0).unwrap().state;
        let state = state.select_character(3).unwrap().state;
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.positions, vec![0, 0, 0]);
        assert_eq!(state.power_ups, vec![PowerUps::default(); 3]);
        assert_eq!(state.players[1].character, 0);
        assert_eq!(state.current_player().map(|p| p.id), Some(0));
    }

    #[test]
    fn test_setup_rejects_bad_counts() {
        assert_eq!(GameState::new().setup(1), Err(GameError::InvalidPlayerCount(1)));
        assert_eq!(GameState::new().setup(5), Err(GameError::InvalidPlayerCount(5)));
    }

    #[test]
    fn test_roll_rejected_outside_playing() {
        let state = GameState::new();
        let mut rng = SmallRng::seed_from_u64(0);
        let err = state.apply_roll(3, &mut FixedOracle, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InvalidPhase { action: Action::Roll, .. }));
    }

    #[test]
    fn test_invalid_die_value() {
        let state = playing(2);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            state.apply_roll(7, &mut FixedOracle, &mut rng),
            Err(GameError::InvalidRoll(7))
        );
        assert_eq!(
            state.apply_roll(0, &mut FixedOracle, &mut rng),
            Err(GameError::InvalidRoll(0))
        );
    }

    #[test]
    fn test_plain_move_advances_turn() {
        let state = playing(2);
        let t = roll(&state, 1);
        assert_eq!(t.state.positions[0], 1);
        assert_eq!(t.state.current_player_index, 1);
        assert_eq!(t.state.last_roll, Some(1));
        assert_eq!(t.cues[..2], [SoundCue::DiceRoll, SoundCue::PlayerMove]);
        assert!(t.state.notification.as_ref().is_some_and(|n| n.message.contains("rolled a 1")));
    }

    #[test]
    fn test_speed_boost_consumed_on_move() {
        let mut state = playing(2);
        state.power_ups[0] = state.power_ups[0].grant_speed_boost();
        let t = roll(&state, 1);
        assert_eq!(t.state.positions[0], 3);
        assert!(!t.state.power_ups[0].speed_boost);
    }

    #[test]
    fn test_speed_boost_kept_when_blocked() {
        let mut state = playing(2);
        state.positions[0] = 45;
        state.power_ups[0] = state.power_ups[0].grant_speed_boost();
        let t = roll(&state, 4);
        assert_eq!(t.state.positions[0], 45);
        assert!(t.state.power_ups[0].speed_boost);
        assert!(mentions(&t, "too far"));
        assert_eq!(t.state.current_player_index, 1);
    }

    #[test]
    fn test_skip_forwarding() {
        let mut state = playing(3);
        state.players[1] = state.players[1].with_skip(true);
        let t = roll(&state, 1);
        assert_eq!(t.state.current_player_index, 2);
        assert!(!t.state.players[1].skip_next_turn);
        assert!(mentions(&t, "Player 2 skipped their turn"));
    }

    #[test]
    fn test_extra_roll_keeps_turn_once() {
        let mut state = playing(2);
        state.power_ups[0].stars = 3;
        let state = state.use_stars().unwrap().state;
        assert_eq!(state.power_ups[0].stars, 0);
        assert!(state.extra_roll);
        assert_eq!(state.use_stars(), Err(GameError::NotEnoughStars { have: 0 }));

        let t = roll(&state, 1);
        assert_eq!(t.state.current_player_index, 0);
        assert!(!t.state.extra_roll);
        assert!(mentions(&t, "takes the extra roll"));

        // Square 11 is plain; the turn passes this time.
        let mut next = t.state;
        next.positions[0] = 9;
        let t = roll(&next, 2);
        assert_eq!(t.state.positions[0], 11);
        assert_eq!(t.state.current_player_index, 1);
    }

    #[test]
    fn test_extra_roll_only_once_pending() {
        let mut state = playing(2);
        state.power_ups[0].stars = 6;
        let state = state.use_stars().unwrap().state;
        assert_eq!(state.use_stars(), Err(GameError::ExtraRollPending));
    }

    #[test]
    fn test_wrong_answer_forfeits_extra_roll() {
        let mut state = playing(2);
        state.positions[0] = 3;
        state.power_ups[0].stars = 3;
        let state = state.use_stars().unwrap().state;
        let t = roll(&state, 2);
        assert_eq!(t.state.phase, Phase::Trivia);
        assert!(t.state.extra_roll);

        let mut rng = SmallRng::seed_from_u64(0);
        let answered = t.state.apply_answer("9", &mut rng).unwrap();
        assert!(!answered.state.extra_roll);
        assert!(answered.state.players[0].skip_next_turn);
        assert_eq!(answered.state.current_player_index, 1);
        assert!(mentions(&answered, "loses the extra roll"));
        assert!(!mentions(&answered, "takes the extra roll"));

        // The penalised player's next turn is forwarded.
        let t = roll(&answered.state, 1);
        assert_eq!(t.state.current_player_index, 1);
        assert!(!t.state.players[0].skip_next_turn);
    }

    #[test]
    fn test_right_answer_keeps_extra_roll() {
        let mut state = playing(2);
        state.positions[0] = 3;
        state.power_ups[0].stars = 3;
        let state = state.use_stars().unwrap().state;
        let t = roll(&state, 2);
        let mut rng = SmallRng::seed_from_u64(0);
        let answered = t.state.apply_answer("5", &mut rng).unwrap();
        assert_eq!(answered.state.current_player_index, 0);
        assert!(!answered.state.extra_roll);
        assert!(mentions(&answered, "takes the extra roll"));
    }

    #[test]
    fn test_skip_squares_forfeit_extra_roll() {
        // Square 3 skips a turn, square 7 loses one.
        for (from, value) in [(0, 3), (4, 3)] {
            let mut state = playing(2);
            state.positions[0] = from;
            state.power_ups[0].stars = 3;
            let state = state.use_stars().unwrap().state;
            let t = roll(&state, value);
            assert!(t.state.players[0].skip_next_turn);
            assert!(!t.state.extra_roll);
            assert_eq!(t.state.current_player_index, 1);
            assert!(mentions(&t, "loses the extra roll"));
        }
    }

    #[test]
    fn test_headline_is_effect_message() {
        let t = roll(&playing(2), 2);
        let headline = t.state.notification.as_ref().unwrap();
        assert_eq!(headline.severity, Severity::Success);
        assert!(headline.message.contains("roll again"));
    }

    #[test]
    fn test_trivia_round_trip() {
        let mut state = playing(2);
        state.positions[0] = 3;
        let t = roll(&state, 2);
        assert_eq!(t.state.phase, Phase::Trivia);
        assert_eq!(t.state.current_player_index, 0);
        let active = t.state.trivia.clone().unwrap();
        assert_eq!(active.player, 0);

        // Rolling during trivia is refused.
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(t.state.apply_roll(3, &mut FixedOracle, &mut rng).is_err());

        let answered = t.state.apply_answer("5", &mut rng).unwrap();
        assert_eq!(answered.state.phase, Phase::Playing);
        assert!(answered.state.trivia.is_none());
        assert!(!answered.state.players[0].skip_next_turn);
        assert_eq!(answered.state.current_player_index, 1);
        assert_eq!(answered.cues, vec![SoundCue::CorrectAnswer]);
    }

    #[test]
    fn test_wrong_answer_skips_next_turn() {
        let mut state = playing(2);
        state.positions[0] = 3;
        state.difficulty[0] = Difficulty::Hard;
        let t = roll(&state, 2);
        let mut rng = SmallRng::seed_from_u64(0);
        let answered = t.state.apply_answer("banana", &mut rng).unwrap();
        assert!(answered.state.players[0].skip_next_turn);
        assert_eq!(answered.state.difficulty[0], Difficulty::Medium);
        assert_eq!(answered.state.current_player_index, 1);

        // Player 2 rolls; player 1 is forwarded without rolling.
        let t = roll(&answered.state, 1);
        assert_eq!(t.state.current_player_index, 1);
        assert!(!t.state.players[0].skip_next_turn);
    }

    #[test]
    fn test_answer_rejected_outside_trivia() {
        let state = playing(2);
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            state.apply_answer("5", &mut rng),
            Err(GameError::InvalidPhase { action: Action::Answer, .. })
        ));
    }

    #[test]
    fn test_win_ends_game() {
        let mut state = playing(2);
        state.positions[0] = 45;
        let t = roll(&state, 5);
        assert_eq!(t.state.phase, Phase::Ended);
        assert_eq!(t.state.winner, Some(0));
        assert!(t.cues.contains(&SoundCue::Victory));
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(t.state.apply_roll(1, &mut FixedOracle, &mut rng).is_err());
    }

    #[test]
    fn test_reset() {
        let state = playing(2);
        let t = state.reset();
        assert_eq!(t.state, GameState::new());
    }
}
