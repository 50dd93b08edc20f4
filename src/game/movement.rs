//! Move resolution: boundary checks and the exact-roll gate.
//!
//! Moves are pure. Overshooting [`FINISH`] never clamps: the player stays
//! put. Moving below [`START`] clamps to the start square.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{EXACT_ROLL_SQUARE, FINISH, REQUIRED_EXACT_ROLL, START, Square};

/// Throw a six-sided die.
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

/// Why a move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// The move would pass the finish square.
    Overshoot,
    /// The player is on the exact-roll square and did not roll a 4.
    NeedsExactRoll,
}

/// Outcome of a prospective move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player may move to this square.
    Legal(Square),
    /// The player reaches [`FINISH`] exactly.
    Win,
    /// The player stays where they are.
    Blocked {
        /// The unchanged position.
        at: Square,
        /// Why the move was refused.
        reason: BlockReason,
    },
}

impl MoveOutcome {
    /// The square the player ends up on.
    #[must_use]
    pub const fn destination(self) -> Square {
        match self {
            MoveOutcome::Legal(square) => square,
            MoveOutcome::Win => FINISH,
            MoveOutcome::Blocked { at, .. } => at,
        }
    }

    /// Check if the move was refused.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, MoveOutcome::Blocked { .. })
    }
}

/// Resolve a move of `delta` squares from `from`.
///
/// Negative targets clamp to [`START`]; targets past [`FINISH`] are blocked.
#[must_use]
pub fn resolve_move(from: Square, delta: i16) -> MoveOutcome {
    let target = (i16::from(from) + delta).max(i16::from(START));
    match u8::try_from(target) {
        Ok(FINISH) => MoveOutcome::Win,
        Ok(square) if square < FINISH => MoveOutcome::Legal(square),
        _ => MoveOutcome::Blocked {
            at: from,
            reason: BlockReason::Overshoot,
        },
    }
}

/// Resolve a die roll, moving `delta` squares (the roll plus any bonus).
///
/// A player on [`EXACT_ROLL_SQUARE`] only moves when the die itself shows
/// [`REQUIRED_EXACT_ROLL`]; the bonus does not count toward the gate.
#[must_use]
pub fn resolve_roll(from: Square, roll: u8, delta: u8) -> MoveOutcome {
    if from == EXACT_ROLL_SQUARE && roll != REQUIRED_EXACT_ROLL {
        return MoveOutcome::Blocked {
            at: from,
            reason: BlockReason::NeedsExactRoll,
        };
    }
    resolve_move(from, i16::from(delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_dice_range() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(5);
        let mut seen = [false; 6];
        for _ in 0..600 {
            let roll = roll_dice(&mut rng);
            assert!((1..=6).contains(&roll));
            seen[usize::from(roll - 1)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_legal_move() {
        assert_eq!(resolve_move(0, 4), MoveOutcome::Legal(4));
        assert_eq!(resolve_move(45, 4), MoveOutcome::Legal(49));
    }

    #[test]
    fn test_exact_finish_wins() {
        assert_eq!(resolve_move(44, 6), MoveOutcome::Win);
        assert_eq!(resolve_move(44, 6).destination(), FINISH);
    }

    #[test]
    fn test_overshoot_blocks() {
        let outcome = resolve_move(47, 4);
        assert_eq!(
            outcome,
            MoveOutcome::Blocked {
                at: 47,
                reason: BlockReason::Overshoot
            }
        );
        assert_eq!(outcome.destination(), 47);
    }

    #[test]
    fn test_negative_clamps_to_start() {
        assert_eq!(resolve_move(3, -5), MoveOutcome::Legal(START));
    }

    #[test]
    fn test_exact_roll_gate() {
        for roll in [1, 2, 3, 5, 6] {
            let outcome = resolve_roll(EXACT_ROLL_SQUARE, roll, roll);
            assert_eq!(
                outcome,
                MoveOutcome::Blocked {
                    at: EXACT_ROLL_SQUARE,
                    reason: BlockReason::NeedsExactRoll
                }
            );
        }
        assert_eq!(resolve_roll(EXACT_ROLL_SQUARE, 4, 4), MoveOutcome::Legal(36));
    }

    #[test]
    fn test_exact_roll_gate_ignores_bonus() {
        // A boosted 2 covers four squares but is still not a 4.
        assert!(resolve_roll(EXACT_ROLL_SQUARE, 2, 4).is_blocked());
        assert_eq!(resolve_roll(EXACT_ROLL_SQUARE, 4, 6), MoveOutcome::Legal(38));
    }
}
