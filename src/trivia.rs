//! Adaptive arithmetic trivia.
//!
//! The engine treats question generation as an oracle behind
//! [`QuestionOracle`]. This module also owns the rules that sit around the
//! oracle: picking a themed or plain question, judging answers, and moving a
//! player's difficulty up or down.

mod generator;

pub use generator::{Concept, MathQuestionGenerator, QuestionStats};

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Questions remembered to avoid immediate repeats.
pub const RECENT_QUESTION_MEMORY: usize = 20;

/// Attempts made to find a question outside the recent memory.
pub const MAX_GENERATION_ATTEMPTS: usize = 50;

/// Chance that a trivia square asks a themed question.
pub const THEMED_PROBABILITY: f64 = 0.7;

/// Chance that a correct answer moves easy to medium.
pub const EASY_TO_MEDIUM_PROBABILITY: f64 = 0.3;

/// Chance that a correct answer moves medium to hard.
pub const MEDIUM_TO_HARD_PROBABILITY: f64 = 0.2;

/// Question difficulty, tracked per player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Small numbers, results up to 15.
    #[default]
    Easy,
    /// Results up to 20.
    Medium,
    /// Results up to 25.
    Hard,
}

impl Difficulty {
    /// One step harder, saturating at [`Difficulty::Hard`].
    #[must_use]
    pub const fn harder(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// One step easier, saturating at [`Difficulty::Easy`].
    #[must_use]
    pub const fn easier(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

/// Arithmetic operation of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Addition.
    #[serde(rename = "+")]
    Add,
    /// Subtraction.
    #[serde(rename = "-")]
    Subtract,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
        })
    }
}

/// Story theme for word problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dogs, cats, rabbits...
    Animals,
    /// Balls, teddy bears, toy cars...
    Toys,
    /// Apples, cookies, carrots...
    Food,
    /// Flowers, leaves, butterflies...
    Nature,
}

impl Theme {
    /// Every theme, in selection order.
    pub const ALL: [Theme; 4] = [Theme::Animals, Theme::Toys, Theme::Food, Theme::Nature];
}

/// A generated question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    /// Text shown to the player.
    pub question: String,
    /// Expected answer.
    pub answer: u32,
    /// Left operand.
    pub num1: u32,
    /// Right operand.
    pub num2: u32,
    /// Operation.
    pub operation: Operation,
    /// Difficulty the question was generated at.
    pub difficulty: Difficulty,
}

/// Source of trivia questions.
///
/// Implementations choose the numbers; the engine only asks for a shape.
pub trait QuestionOracle {
    /// Generate a plain question at `difficulty`.
    fn generate_question(&mut self, difficulty: Difficulty) -> TriviaQuestion;

    /// Generate a word problem in `theme` at `difficulty`.
    fn generate_themed_question(&mut self, theme: Theme, difficulty: Difficulty) -> TriviaQuestion;
}

/// Ask the oracle for the question a trivia square presents.
///
/// A theme is drawn uniformly, then a themed question is asked for with
/// probability [`THEMED_PROBABILITY`], a plain one otherwise.
pub fn draw_question<O, R>(oracle: &mut O, difficulty: Difficulty, rng: &mut R) -> TriviaQuestion
where
    O: QuestionOracle + ?Sized,
    R: Rng + ?Sized,
{
    let theme = Theme::ALL[rng.gen_range(0..Theme::ALL.len())];
    if rng.gen_bool(THEMED_PROBABILITY) {
        oracle.generate_themed_question(theme, difficulty)
    } else {
        oracle.generate_question(difficulty)
    }
}

/// Parse a submitted answer the lenient way: leading whitespace, an optional
/// sign, then as many decimal digits as are present.
///
/// Returns `None` when no digits lead the input.
#[must_use]
pub fn parse_answer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Check a submitted answer. Malformed input is simply wrong.
#[must_use]
pub fn is_correct(question: &TriviaQuestion, input: &str) -> bool {
    parse_answer(input) == Some(i64::from(question.answer))
}

/// New difficulty after an answer.
///
/// Correct answers may step up at random; wrong answers always step down.
pub fn adjust_difficulty<R: Rng + ?Sized>(
    current: Difficulty,
    correct: bool,
    rng: &mut R,
) -> Difficulty {
    if !correct {
        return current.easier();
    }
    let chance = match current {
        Difficulty::Easy => EASY_TO_MEDIUM_PROBABILITY,
        Difficulty::Medium => MEDIUM_TO_HARD_PROBABILITY,
        Difficulty::Hard => return current,
    };
    if rng.gen_bool(chance) {
        current.harder()
    } else {
        current
    }
}
