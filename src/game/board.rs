//! Board layout: the track, special squares, and safe squares.

use serde::{Deserialize, Serialize};

/// A position on the track. 0 is the start, [`FINISH`] wins.
pub type Square = u8;

/// Starting square, off the numbered track.
pub const START: Square = 0;

/// The only winning square.
pub const FINISH: Square = 50;

/// Square that can only be left with an exact die roll.
pub const EXACT_ROLL_SQUARE: Square = 32;

/// The die value required to leave [`EXACT_ROLL_SQUARE`].
pub const REQUIRED_EXACT_ROLL: u8 = 4;

/// Squares where no special effect ever fires.
pub const SAFE_SQUARES: [Square; 6] = [41, 43, 44, 46, 48, 49];

/// Effect attached to a special square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Current player rolls again.
    RollAgain,
    /// Current player sits out their next turn.
    SkipTurn,
    /// Same as [`Effect::SkipTurn`], different label.
    LoseTurn,
    /// Back to square 0.
    GoToStart,
    /// Answer a math question.
    Trivia,
    /// Forward 4 squares.
    MoveFront4,
    /// Forward 5 squares.
    MoveFront5,
    /// Back 4 squares.
    MoveBack4,
    /// Back 5 squares.
    MoveBack5,
    /// Move the die value once more.
    MoveDouble,
    /// Move the die value twice more.
    MoveTriple,
    /// Move back by the die value.
    MoveBackward,
    /// Teleport to square 13.
    GoTo13,
    /// Teleport to square 27.
    GoTo27,
    /// Leaving this square requires a roll of exactly 4.
    Roll4ToMove,
    /// The next roll moves this player instead of the roller.
    StealMove,
    /// The next roll is copied to this player.
    MirrorMove,
    /// Collect a star.
    PowerUpStar,
    /// Gain +2 on the next move.
    PowerUpSpeed,
    /// Gain protection from the next negative effect.
    PowerUpShield,
}

impl Effect {
    /// Whether a shield can absorb this effect.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(
            self,
            Effect::SkipTurn
                | Effect::LoseTurn
                | Effect::GoToStart
                | Effect::MoveBack4
                | Effect::MoveBack5
                | Effect::MoveBackward
        )
    }
}

/// A board square with a non-default effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialSquare {
    /// Position on the track.
    pub square: Square,
    /// What happens on landing.
    pub effect: Effect,
    /// Short label shown on the board.
    pub text: &'static str,
    /// Glyph shown on the board.
    pub icon: &'static str,
}

impl SpecialSquare {
    const fn new(square: Square, effect: Effect, text: &'static str, icon: &'static str) -> Self {
        Self {
            square,
            effect,
            text,
            icon,
        }
    }
}

/// The special-square table, sorted by square.
pub const SPECIAL_SQUARES: [SpecialSquare; 31] = [
    SpecialSquare::new(2, Effect::RollAgain, "Roll Again!", "🎲"),
    SpecialSquare::new(3, Effect::SkipTurn, "Skip Turn", "⏭️"),
    SpecialSquare::new(4, Effect::GoToStart, "Go to Start", "↩️"),
    SpecialSquare::new(5, Effect::Trivia, "Trivia", "🧠"),
    SpecialSquare::new(6, Effect::PowerUpStar, "⭐ Star!", "⭐"),
    SpecialSquare::new(7, Effect::LoseTurn, "Lose Turn", "⏭️"),
    SpecialSquare::new(8, Effect::MoveFront4, "Move +4", "➡️"),
    SpecialSquare::new(9, Effect::RollAgain, "Lucky!", "⚡"),
    SpecialSquare::new(10, Effect::MoveBack4, "Move -4", "⬅️"),
    SpecialSquare::new(12, Effect::PowerUpSpeed, "💨 Speed!", "💨"),
    SpecialSquare::new(14, Effect::RollAgain, "Free Turn", "🎲"),
    SpecialSquare::new(16, Effect::MoveFront4, "Move +4", "➡️"),
    SpecialSquare::new(18, Effect::PowerUpShield, "🛡️ Shield!", "🛡️"),
    SpecialSquare::new(19, Effect::StealMove, "Steal Move", "⚡"),
    SpecialSquare::new(21, Effect::MoveDouble, "Move x2", "⚡"),
    SpecialSquare::new(22, Effect::MoveTriple, "Move x3", "⚡"),
    SpecialSquare::new(23, Effect::MoveBackward, "Move Back", "⬅️"),
    SpecialSquare::new(25, Effect::Trivia, "Trivia", "🧠"),
    SpecialSquare::new(26, Effect::PowerUpStar, "⭐ Star!", "⭐"),
    SpecialSquare::new(28, Effect::MirrorMove, "Mirror Move", "⚡"),
    SpecialSquare::new(30, Effect::PowerUpSpeed, "💨 Speed!", "💨"),
    SpecialSquare::new(32, Effect::Roll4ToMove, "Roll 4 to Move", "🎯"),
    SpecialSquare::new(34, Effect::MoveBack5, "Move -5", "⬅️"),
    SpecialSquare::new(35, Effect::MoveFront5, "Move +5", "➡️"),
    SpecialSquare::new(37, Effect::PowerUpShield, "🛡️ Shield!", "🛡️"),
    SpecialSquare::new(38, Effect::RollAgain, "Roll Again", "🎲"),
    SpecialSquare::new(39, Effect::PowerUpStar, "⭐ Star!", "⭐"),
    SpecialSquare::new(40, Effect::GoTo13, "Go to 13", "↩️"),
    SpecialSquare::new(42, Effect::LoseTurn, "Lose Turn", "⏭️"),
    SpecialSquare::new(45, Effect::Trivia, "Trivia", "🧠"),
    SpecialSquare::new(47, Effect::GoTo27, "Go to 27", "↩️"),
];

/// Look up the special square at `square`, if any.
#[must_use]
pub fn special_square(square: Square) -> Option<&'static SpecialSquare> {
    SPECIAL_SQUARES
        .binary_search_by_key(&square, |s| s.square)
        .ok()
        .map(|idx| &SPECIAL_SQUARES[idx])
}

/// Check whether `square` suppresses special effects.
#[must_use]
pub fn is_safe_square(square: Square) -> bool {
    SAFE_SQUARES.contains(&square)
}

/// The effect that fires when a player lands on `square`.
///
/// Safe squares never fire, whatever the table says.
#[must_use]
pub fn landing_effect(square: Square) -> Option<&'static SpecialSquare> {
    if is_safe_square(square) {
        return None;
    }
    special_square(square)
}
