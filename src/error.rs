//! Error types for the rules engine.

use std::fmt;

use crate::game::Phase;

/// Player input that a reducer can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Choosing the number of players.
    Setup,
    /// Picking a character sprite.
    SelectCharacter,
    /// Rolling the die.
    Roll,
    /// Answering a trivia question.
    Answer,
    /// Spending stars for an extra roll.
    UseStars,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Setup => "setup",
            Action::SelectCharacter => "character selection",
            Action::Roll => "roll",
            Action::Answer => "answer",
            Action::UseStars => "use stars",
        };
        f.write_str(name)
    }
}

/// Reasons a transition is rejected.
///
/// A rejected transition never touches the caller's snapshot: reducers
/// borrow the current state and only build a new one on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The action is not accepted in the current phase.
    InvalidPhase {
        /// What was attempted.
        action: Action,
        /// The phase that accepts this action.
        expected: Phase,
        /// The phase the game was actually in.
        actual: Phase,
    },
    /// A die value outside `1..=6`.
    InvalidRoll(u8),
    /// Setup with an unsupported number of players.
    InvalidPlayerCount(usize),
    /// Character index outside the roster.
    UnknownCharacter(u8),
    /// Character already picked by an earlier player.
    CharacterTaken(u8),
    /// Extra roll requested without enough stars.
    NotEnoughStars {
        /// Stars the player currently holds.
        have: u32,
    },
    /// An extra roll was already bought this turn.
    ExtraRollPending,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidPhase {
                action,
                expected,
                actual,
            } => write!(f, "cannot {action} during {actual} (expected {expected})"),
            GameError::InvalidRoll(value) => write!(f, "invalid die value: {value}"),
            GameError::InvalidPlayerCount(n) => {
                write!(f, "invalid player count: {n} (must be 2 to 4)")
            }
            GameError::UnknownCharacter(c) => write!(f, "unknown character: {c}"),
            GameError::CharacterTaken(c) => write!(f, "character {c} is already taken"),
            GameError::NotEnoughStars { have } => {
                write!(f, "not enough stars for an extra roll: {have} (need 3)")
            }
            GameError::ExtraRollPending => write!(f, "an extra roll is already pending"),
        }
    }
}

impl std::error::Error for GameError {}

/// Result type for state transitions.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_phase_display() {
        let err = GameError::InvalidPhase {
            action: Action::Roll,
            expected: Phase::Playing,
            actual: Phase::Trivia,
        };
        assert_eq!(err.to_string(), "cannot roll during trivia (expected playing)");
    }

    #[test]
    fn test_not_enough_stars_display() {
        let err = GameError::NotEnoughStars { have: 2 };
        assert!(err.to_string().contains("need 3"));
    }
}
