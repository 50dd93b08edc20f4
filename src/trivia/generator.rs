//! Random addition and subtraction questions for young players.

use std::collections::VecDeque;

use rand::Rng;

use crate::trivia::{
    Difficulty, MAX_GENERATION_ATTEMPTS, Operation, QuestionOracle, RECENT_QUESTION_MEMORY, Theme,
    TriviaQuestion,
};

/// Chance of an addition question; subtraction otherwise.
const ADDITION_PROBABILITY: f64 = 0.6;

/// Operand ranges for one difficulty.
struct Ranges {
    /// Left operand of an addition.
    add_first: (u32, u32),
    /// Lower bound of the right operand of an addition.
    add_second_min: u32,
    /// Upper bound of the right operand of an addition.
    add_second_max: u32,
    /// Largest sum.
    add_total_max: u32,
    /// Answer of a subtraction.
    sub_answer: (u32, u32),
    /// Lower bound of the subtrahend.
    sub_second_min: u32,
    /// Upper bound of the subtrahend.
    sub_second_max: u32,
}

const EASY: Ranges = Ranges {
    add_first: (1, 8),
    add_second_min: 1,
    add_second_max: 7,
    add_total_max: 15,
    sub_answer: (1, 10),
    sub_second_min: 1,
    sub_second_max: 5,
};

const MEDIUM: Ranges = Ranges {
    add_first: (3, 12),
    add_second_min: 2,
    add_second_max: 8,
    add_total_max: 20,
    sub_answer: (2, 15),
    sub_second_min: 2,
    sub_second_max: 8,
};

const HARD: Ranges = Ranges {
    add_first: (5, 18),
    add_second_min: 3,
    add_second_max: 10,
    add_total_max: 25,
    sub_answer: (3, 20),
    sub_second_min: 3,
    sub_second_max: 12,
};

const fn ranges(difficulty: Difficulty) -> &'static Ranges {
    match difficulty {
        Difficulty::Easy => &EASY,
        Difficulty::Medium => &MEDIUM,
        Difficulty::Hard => &HARD,
    }
}

/// Word lists for a theme.
struct ThemeWords {
    items: &'static [&'static str],
    add_verbs: &'static [&'static str],
    subtract_verbs: &'static [&'static str],
}

const fn theme_words(theme: Theme) -> ThemeWords {
    match theme {
        Theme::Animals => ThemeWords {
            items: &["🐶 dogs", "🐱 cats", "🐰 rabbits", "🐦 birds", "🐸 frogs", "🦆 ducks"],
            add_verbs: &["join", "come to play", "arrive at the park"],
            subtract_verbs: &["go home", "run away", "go to sleep"],
        },
        Theme::Toys => ThemeWords {
            items: &["🎾 balls", "🧸 teddy bears", "🚗 toy cars", "🎲 dice", "🪀 yo-yos", "🎯 darts"],
            add_verbs: &["are added", "join the pile", "are brought out"],
            subtract_verbs: &["are put away", "get lost", "are given away"],
        },
        Theme::Food => ThemeWords {
            items: &["🍎 apples", "🍌 bananas", "🍪 cookies", "🧁 cupcakes", "🍓 strawberries", "🥕 carrots"],
            add_verbs: &["are added", "are picked", "are baked"],
            subtract_verbs: &["are eaten", "are shared", "fall down"],
        },
        Theme::Nature => ThemeWords {
            items: &["🌸 flowers", "🌟 stars", "🍀 leaves", "🌰 acorns", "🦋 butterflies", "🐝 bees"],
            add_verbs: &["bloom", "appear", "come out"],
            subtract_verbs: &["fall down", "fly away", "hide"],
        },
    }
}

/// Number-sense drills outside the regular difficulty ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    /// `n + n`.
    Doubles,
    /// Count up a few from a start number.
    Counting,
    /// A number plus a multiple of itself.
    Patterns,
}

/// Generator statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionStats {
    /// Question texts currently remembered.
    pub remembered: usize,
}

/// Question generator with a short memory to avoid repeats.
#[derive(Debug, Clone)]
pub struct MathQuestionGenerator<R> {
    rng: R,
    recent: VecDeque<String>,
}

impl<R: Rng> MathQuestionGenerator<R> {
    /// Create a generator drawing from `rng`.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            recent: VecDeque::with_capacity(RECENT_QUESTION_MEMORY + 1),
        }
    }

    /// Generate a concept drill.
    pub fn generate_concept_question(&mut self, concept: Concept) -> TriviaQuestion {
        match concept {
            Concept::Doubles => {
                let n = self.rng.gen_range(1..=10);
                TriviaQuestion {
                    question: format!("What is {n} + {n}? (Double {n})"),
                    answer: n * 2,
                    num1: n,
                    num2: n,
                    operation: Operation::Add,
                    difficulty: Difficulty::Easy,
                }
            }
            Concept::Counting => {
                let start = self.rng.gen_range(1..=8);
                let count = self.rng.gen_range(1..=5);
                TriviaQuestion {
                    question: format!("Count up {count} from {start}. What number do you get?"),
                    answer: start + count,
                    num1: start,
                    num2: count,
                    operation: Operation::Add,
                    difficulty: Difficulty::Easy,
                }
            }
            Concept::Patterns => {
                let base = self.rng.gen_range(2..=6);
                let multiplier = self.rng.gen_range(2..=4);
                let num2 = base * multiplier;
                TriviaQuestion {
                    question: format!("What is {base} + {num2}?"),
                    answer: base + num2,
                    num1: base,
                    num2,
                    operation: Operation::Add,
                    difficulty: Difficulty::Medium,
                }
            }
        }
    }

    /// Forget every remembered question.
    pub fn reset(&mut self) {
        self.recent.clear();
    }

    /// Report how many questions are remembered.
    #[must_use]
    pub fn stats(&self) -> QuestionStats {
        QuestionStats {
            remembered: self.recent.len(),
        }
    }

    fn create_question(&mut self, difficulty: Difficulty) -> TriviaQuestion {
        let r = ranges(difficulty);
        if self.rng.gen_bool(ADDITION_PROBABILITY) {
            let num1 = self.rng.gen_range(r.add_first.0..=r.add_first.1);
            let max_second = r.add_second_max.min(r.add_total_max - num1);
            let num2 = self.rng.gen_range(r.add_second_min..=max_second);
            TriviaQuestion {
                question: format!("What is {num1} + {num2}?"),
                answer: num1 + num2,
                num1,
                num2,
                operation: Operation::Add,
                difficulty,
            }
        } else {
            let answer = self.rng.gen_range(r.sub_answer.0..=r.sub_answer.1);
            let num2 = self.rng.gen_range(r.sub_second_min..=r.sub_second_max.min(answer));
            let num1 = answer + num2;
            TriviaQuestion {
                question: format!("What is {num1} - {num2}?"),
                answer,
                num1,
                num2,
                operation: Operation::Subtract,
                difficulty,
            }
        }
    }

    fn remember(&mut self, text: &str) {
        if self.recent.iter().any(|q| q == text) {
            return;
        }
        self.recent.push_back(text.to_string());
        if self.recent.len() > RECENT_QUESTION_MEMORY {
            self.recent.pop_front();
        }
    }

    fn pick<'a>(&mut self, words: &[&'a str]) -> &'a str {
        words[self.rng.gen_range(0..words.len())]
    }
}

impl<R: Rng> QuestionOracle for MathQuestionGenerator<R> {
    fn generate_question(&mut self, difficulty: Difficulty) -> TriviaQuestion {
        let mut question = self.create_question(difficulty);
        let mut attempts = 1;
        while attempts < MAX_GENERATION_ATTEMPTS && self.recent.contains(&question.question) {
            question = self.create_question(difficulty);
            attempts += 1;
        }
        self.remember(&question.question);
        question
    }

    fn generate_themed_question(&mut self, theme: Theme, difficulty: Difficulty) -> TriviaQuestion {
        let base = self.generate_question(difficulty);
        let words = theme_words(theme);
        let item = self.pick(words.items);
        let question = match base.operation {
            Operation::Add => {
                let verb = self.pick(words.add_verbs);
                format!(
                    "There are {} {item}. Then {} more {verb}. How many are there now?",
                    base.num1, base.num2
                )
            }
            Operation::Subtract => {
                let verb = self.pick(words.subtract_verbs);
                format!(
                    "There are {} {item}. Then {} {verb}. How many are left?",
                    base.num1, base.num2
                )
            }
        };
        TriviaQuestion { question, ..base }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn generator(seed: u64) -> MathQuestionGenerator<SmallRng> {
        MathQuestionGenerator::new(SmallRng::seed_from_u64(seed))
    }

    fn check_bounds(q: &TriviaQuestion) {
        let (max_total, max_answer) = match q.difficulty {
            Difficulty::Easy => (15, 10),
            Difficulty::Medium => (20, 15),
            Difficulty::Hard => (25, 20),
        };
        match q.operation {
            Operation::Add => {
                assert_eq!(q.answer, q.num1 + q.num2);
                assert!(q.answer <= max_total, "{q:?}");
            }
            Operation::Subtract => {
                assert_eq!(q.answer, q.num1 - q.num2);
                assert!(q.answer >= 1 && q.answer <= max_answer, "{q:?}");
                assert!(q.num2 <= q.answer, "{q:?}");
            }
        }
    }

    #[test]
    fn test_questions_within_bounds() {
        let mut generator = generator(7);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            for _ in 0..500 {
                let q = generator.generate_question(difficulty);
                assert_eq!(q.difficulty, difficulty);
                check_bounds(&q);
            }
        }
    }

    #[test]
    fn test_memory_is_bounded() {
        let mut generator = generator(1);
        for _ in 0..100 {
            let _ = generator.generate_question(Difficulty::Hard);
        }
        assert!(generator.stats().remembered <= RECENT_QUESTION_MEMORY);
        generator.reset();
        assert_eq!(generator.stats().remembered, 0);
    }

    #[test]
    fn test_no_immediate_repeat() {
        let mut generator = generator(99);
        let mut last = generator.generate_question(Difficulty::Medium).question;
        for _ in 0..200 {
            let next = generator.generate_question(Difficulty::Medium).question;
            assert_ne!(next, last);
            last = next;
        }
    }

    #[test]
    fn test_themed_question_keeps_numbers() {
        let mut generator = generator(3);
        for theme in Theme::ALL {
            let q = generator.generate_themed_question(theme, Difficulty::Easy);
            check_bounds(&q);
            assert!(q.question.starts_with(&format!("There are {} ", q.num1)));
            assert!(q.question.ends_with('?'));
        }
    }

    #[test]
    fn test_concept_questions() {
        let mut generator = generator(11);
        let doubles = generator.generate_concept_question(Concept::Doubles);
        assert_eq!(doubles.num1, doubles.num2);
        assert_eq!(doubles.answer, doubles.num1 * 2);

        let counting = generator.generate_concept_question(Concept::Counting);
        assert_eq!(counting.answer, counting.num1 + counting.num2);

        let pattern = generator.generate_concept_question(Concept::Patterns);
        assert_eq!(pattern.num2 % pattern.num1, 0);
        assert_eq!(pattern.difficulty, Difficulty::Medium);
    }
}
