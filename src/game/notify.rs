//! Side channels attached to transitions: display messages and sound cues.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Routine turn information.
    Info,
    /// Something good happened.
    Success,
    /// The move was refused or something bad happened.
    Warning,
    /// Steal, mirror, and other surprises.
    Special,
    /// A math question is waiting.
    Trivia,
}

/// A message for the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Text to show.
    pub message: String,
    /// Tone.
    pub severity: Severity,
}

impl Notification {
    /// Create a notification.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// Create an [`Severity::Info`] notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Suggested sound for the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// The die was thrown.
    DiceRoll,
    /// A token moved.
    PlayerMove,
    /// A special square fired.
    SpecialSquare,
    /// Someone won.
    Victory,
    /// Trivia answered correctly.
    CorrectAnswer,
    /// Trivia answered incorrectly.
    WrongAnswer,
    /// A menu action was accepted.
    ButtonClick,
}

impl SoundCue {
    /// Identifier understood by the audio layer.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            SoundCue::DiceRoll => "dice_roll",
            SoundCue::PlayerMove => "player_move",
            SoundCue::SpecialSquare => "special_square",
            SoundCue::Victory => "victory",
            SoundCue::CorrectAnswer => "correct_answer",
            SoundCue::WrongAnswer => "wrong_answer",
            SoundCue::ButtonClick => "button_click",
        }
    }
}
