//! Property-based tests for the movement, power-up and session rules.
//!
//! Run with: cargo test --release prop_rules

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use mi50::game::{
    BlockReason, EXACT_ROLL_SQUARE, FINISH, MoveOutcome, Phase, PowerUps, SAFE_SQUARES, SPECIAL_SQUARES, STAR_COST,
    check_invariants, landing_effect, resolve_move, resolve_roll,
};
use mi50::session::{Command, SeededSession};

/// Map a fuzzed pair onto a command a player could send.
fn command(kind: u8, value: u8) -> Command {
    match kind % 5 {
        0 => Command::SelectCharacter(value % 6),
        1 => Command::Roll,
        2 => Command::RollValue(value % 8),
        3 => Command::Answer((value % 25).to_string()),
        _ => Command::UseStars,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Moves never leave the track, and blocked moves stay put.
    #[test]
    fn prop_resolve_move_stays_on_track(from in 0u8..=50, delta in -12i16..=18) {
        let outcome = resolve_move(from, delta);
        prop_assert!(outcome.destination() <= FINISH);
        match outcome {
            MoveOutcome::Legal(to) => {
                prop_assert!(to < FINISH);
                prop_assert_eq!(i16::from(to), (i16::from(from) + delta).max(0));
            }
            MoveOutcome::Win => prop_assert_eq!(i16::from(from) + delta, i16::from(FINISH)),
            MoveOutcome::Blocked { at, reason } => {
                prop_assert_eq!(at, from);
                prop_assert_eq!(reason, BlockReason::Overshoot);
                prop_assert!(i16::from(from) + delta > i16::from(FINISH));
            }
        }
    }

    /// Only a literal 4 leaves the exact-roll square, whatever the bonus.
    #[test]
    fn prop_exact_roll_gate(roll in 1u8..=6, bonus in 0u8..=2) {
        let outcome = resolve_roll(EXACT_ROLL_SQUARE, roll, roll + bonus);
        if roll == 4 {
            prop_assert_eq!(outcome.destination(), EXACT_ROLL_SQUARE + 4 + bonus);
        } else {
            prop_assert_eq!(
                outcome,
                MoveOutcome::Blocked { at: EXACT_ROLL_SQUARE, reason: BlockReason::NeedsExactRoll }
            );
        }
    }

    /// A shield absorbs at most one effect and only a negative one.
    #[test]
    fn prop_shield_absorbs_once(index in 0usize..SPECIAL_SQUARES.len(), stars in 0u32..10, speed in any::<bool>()) {
        let effect = SPECIAL_SQUARES[index].effect;
        let power = PowerUps { stars, speed_boost: speed, shield: true };

        let (after, absorbed) = power.consume_shield_if_negative(effect);
        prop_assert_eq!(absorbed, effect.is_negative());
        prop_assert_eq!(after.shield, !absorbed);
        prop_assert_eq!(after.stars, stars);
        prop_assert_eq!(after.speed_boost, speed);

        let (again, absorbed_again) = after.consume_shield_if_negative(effect);
        prop_assert!(!(absorbed && absorbed_again));
        prop_assert_eq!(again.shield, after.shield && !effect.is_negative());
    }

    /// Stars are only ever spent in whole extra rolls.
    #[test]
    fn prop_star_ledger(collected in 0u32..40, attempts in 0u32..20) {
        let mut power = PowerUps::default();
        for _ in 0..collected {
            power = power.grant_star();
        }
        let mut bought = 0;
        for _ in 0..attempts {
            if power.has_enough_stars() {
                bought += 1;
            }
            power = power.spend_stars_for_extra_roll();
        }
        prop_assert_eq!(power.stars + bought * STAR_COST, collected);
        prop_assert_eq!(bought, attempts.min(collected / STAR_COST));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Arbitrary input sequences never break an invariant, and rejected
    /// inputs leave the session untouched.
    #[test]
    fn prop_session_keeps_invariants(
        seed in any::<u64>(),
        players in 2usize..=4,
        inputs in prop::collection::vec((any::<u8>(), any::<u8>()), 0..200),
    ) {
        let mut session = SeededSession::seeded(seed);
        session.start(players).unwrap();

        for (kind, value) in inputs {
            let before = session.state().clone();
            let accepted = session.actions().len();
            if session.apply(&command(kind, value)).is_err() {
                prop_assert_eq!(session.state(), &before);
                prop_assert_eq!(session.actions().len(), accepted);
            }
            let violations = check_invariants(session.state());
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }

        let state = session.state();
        if state.phase == Phase::Ended {
            let winner = state.winner.unwrap();
            prop_assert_eq!(state.position(winner), FINISH);
        }
    }
}

#[test]
fn test_safe_squares_are_not_special() {
    for square in SAFE_SQUARES {
        assert!(landing_effect(square).is_none());
    }
}
