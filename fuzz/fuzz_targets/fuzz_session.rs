#![no_main]

//! Session fuzzer.
//!
//! Feeds arbitrary player inputs to a seeded session:
//! 1. Set up a game with a fuzzed player count
//! 2. Apply fuzzed commands, accepted or not
//! 3. Check every invariant after each input
//! 4. Replay the accepted commands and compare the final state

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mi50::game::check_invariants;
use mi50::session::{Command, SeededSession};

/// A fuzzer-generated player input.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzCommand {
    Select(u8),
    Roll,
    RollValue(u8),
    Answer(String),
    UseStars,
    Reset,
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    seed: u64,
    players: u8,
    commands: Vec<FuzzCommand>,
}

fuzz_target!(|input: SessionInput| {
    let mut session = SeededSession::seeded(input.seed);
    if session.start(usize::from(input.players)).is_err() {
        return;
    }

    let mut reset = false;
    for command in input.commands.iter().take(500) {
        let _ = match command {
            FuzzCommand::Select(c) => session.apply(&Command::SelectCharacter(*c)),
            FuzzCommand::Roll => session.apply(&Command::Roll),
            FuzzCommand::RollValue(v) => session.apply(&Command::RollValue(*v)),
            FuzzCommand::Answer(a) => session.apply(&Command::Answer(a.clone())),
            FuzzCommand::UseStars => session.apply(&Command::UseStars),
            FuzzCommand::Reset => {
                reset = true;
                Ok(session.reset())
            }
        };

        let violations = check_invariants(session.state());
        assert!(violations.is_empty(), "invariants broken: {violations:?}");
    }

    if !reset {
        let recording = session.recording().expect("seeded session records");
        let outcome = recording.replay().expect("accepted commands replay");
        assert_eq!(&outcome.state, session.state());
    }
});
