// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! mi50: rules engine for a race-to-fifty math board game.
//!
//! Two to four players race along a 0..=50 track. Special squares move
//! players, grant power-ups, defer the next roll, or ask an arithmetic
//! question whose difficulty adapts to the player.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (play / simulate / replay)    │
//! ├─────────────────────────────────────┤
//! │   Session, Replay, Simulation       │
//! ├─────────────────────────────────────┤
//! │   Game state machine (reducers)     │
//! ├──────────────────┬──────────────────┤
//! │  Board / Moves / │  Trivia oracle   │
//! │  Power-ups       │                  │
//! └──────────────────┴──────────────────┘
//! ```
//!
//! Every transition is a pure function from the current [`GameState`] to a
//! new one. Randomness is injected through [`rand::Rng`], so a seed
//! determines a whole game.

pub mod error;
pub mod game;
pub mod replay;
pub mod session;
pub mod sim;
pub mod trivia;

pub use error::{GameError, GameResult};

// Re-export key game types at crate root for convenience
pub use game::{GameState, Notification, Phase, Player, PlayerId, PowerUps, SoundCue, Transition};
pub use replay::Recording;
pub use session::{Command, GameSession, SeededSession};
pub use sim::{MatchResult, SimulationConfig, SimulationSummary};
pub use trivia::{Difficulty, MathQuestionGenerator, QuestionOracle, TriviaQuestion};
