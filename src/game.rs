//! Game layer for mi50.
//!
//! Implements the rules of the race to square 50:
//! - Board with special and safe squares
//! - Move resolution (overshoot, exact-roll gate)
//! - Per-player power-ups
//! - Special-square effects, including deferred steal/mirror rolls
//! - The phase state machine that composes them

mod board;
mod effects;
mod invariants;
mod movement;
mod notify;
mod player;
mod powerups;
mod state;

pub use board::{
    EXACT_ROLL_SQUARE, Effect, FINISH, REQUIRED_EXACT_ROLL, SAFE_SQUARES, SPECIAL_SQUARES, START,
    SpecialSquare, Square, is_safe_square, landing_effect, special_square,
};
pub use effects::{TurnFlow, resolve_effect};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use movement::{BlockReason, MoveOutcome, resolve_move, resolve_roll, roll_dice};
pub use notify::{Notification, Severity, SoundCue};
pub use player::{CHARACTER_COUNT, MAX_PLAYERS, MIN_PLAYERS, Player, PlayerId, default_name};
pub use powerups::{BoostedRoll, PowerUps, SPEED_BOOST_BONUS, STAR_COST};
pub use state::{ActiveTrivia, GameState, Phase, Transition, Waiting, WaitingKind};
