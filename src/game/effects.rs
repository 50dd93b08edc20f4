//! Special-square effect interpreter.
//!
//! Runs once per landing. Effects never chain: a move effect that ends on
//! another special square does not fire that square.

use rand::Rng;
use tracing::debug;

use crate::game::{
    ActiveTrivia, Effect, FINISH, MoveOutcome, Phase, PlayerId, START, Severity, SoundCue, SpecialSquare,
    Square, Transition, Waiting, WaitingKind, resolve_move,
};
use crate::trivia::{QuestionOracle, draw_question};

/// What the turn does after an effect resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnFlow {
    /// Pass the turn on.
    EndTurn,
    /// The same player rolls again.
    RollAgain,
    /// Wait for a trivia answer.
    AwaitAnswer,
    /// Someone won.
    GameOver,
}

/// Apply the effect of `square` to `player`, who just landed there with `roll`.
pub fn resolve_effect<O, R>(
    t: &mut Transition,
    player: PlayerId,
    square: &SpecialSquare,
    roll: u8,
    oracle: &mut O,
    rng: &mut R,
) -> TurnFlow
where
    O: QuestionOracle + ?Sized,
    R: Rng + ?Sized,
{
    let seat = usize::from(player);
    let name = t.name_of(player);
    let effect = square.effect;

    let (power, shielded) = t.state.power_ups[seat].consume_shield_if_negative(effect);
    t.state.power_ups[seat] = power;
    if shielded {
        t.notify(
            format!("🛡️ {name}'s shield blocked {}! 🎉", square.text),
            Severity::Success,
        );
        debug!(player, ?effect, "shield absorbed effect");
        return TurnFlow::EndTurn;
    }

    t.cue(SoundCue::SpecialSquare);
    debug!(player, square = square.square, ?effect, "effect fired");

    match effect {
        Effect::RollAgain => {
            t.notify(
                format!("🎲 {name} gets to roll again! 🎉"),
                Severity::Success,
            );
            TurnFlow::RollAgain
        }
        Effect::SkipTurn | Effect::LoseTurn => {
            t.state.players[seat] = t.state.players[seat].with_skip(true);
            t.notify(
                format!("⏭️ {name} will skip their next turn! 😅"),
                Severity::Warning,
            );
            TurnFlow::EndTurn
        }
        Effect::GoToStart => teleport(t, player, START, format!("↩️ Oh no! {name} goes back to start! 😱")),
        Effect::GoTo13 => teleport(t, player, 13, format!("🌀 {name} teleports to square 13! ✨")),
        Effect::GoTo27 => teleport(t, player, 27, format!("🌀 {name} teleports to square 27! ✨")),
        Effect::Trivia => {
            let difficulty = t.state.difficulty[seat];
            let question = draw_question(oracle, difficulty, rng);
            debug!(player, %difficulty, "trivia drawn");
            t.state.phase = Phase::Trivia;
            t.state.trivia = Some(ActiveTrivia { question, player });
            t.notify(
                format!("🧠 Math time! {name}, can you solve this? 🤔"),
                Severity::Trivia,
            );
            TurnFlow::AwaitAnswer
        }
        Effect::MoveFront4 => shift(t, player, 4, &format!("➡️ {name} zooms ahead 4 squares")),
        Effect::MoveFront5 => shift(t, player, 5, &format!("➡️ {name} zooms ahead 5 squares")),
        Effect::MoveBack4 => shift(t, player, -4, &format!("⬅️ {name} slides back 4 squares")),
        Effect::MoveBack5 => shift(t, player, -5, &format!("⬅️ {name} slides back 5 squares")),
        Effect::MoveDouble => {
            let extra = i16::from(roll);
            shift(t, player, extra, &format!("⚡ Double move! {name} moves {extra} more"))
        }
        Effect::MoveTriple => {
            let extra = 2 * i16::from(roll);
            shift(t, player, extra, &format!("⚡ Triple move! {name} moves {extra} more"))
        }
        Effect::MoveBackward => {
            let back = i16::from(roll);
            shift(t, player, -back, &format!("⬅️ {name} moves back {back} squares"))
        }
        Effect::Roll4ToMove => {
            t.notify(
                format!("🎯 {name} must roll exactly a 4 to leave this square!"),
                Severity::Info,
            );
            TurnFlow::EndTurn
        }
        Effect::StealMove => {
            t.state.waiting = Some(Waiting {
                kind: WaitingKind::Steal,
                player,
            });
            t.notify(
                format!("🏴‍☠️ {name} will steal the next roll! ⚡"),
                Severity::Special,
            );
            TurnFlow::EndTurn
        }
        Effect::MirrorMove => {
            t.state.waiting = Some(Waiting {
                kind: WaitingKind::Mirror,
                player,
            });
            t.notify(
                format!("🪞 {name} will copy the next roll! ⚡"),
                Severity::Special,
            );
            TurnFlow::EndTurn
        }
        Effect::PowerUpStar => {
            let power = t.state.power_ups[seat].grant_star();
            t.state.power_ups[seat] = power;
            t.notify(
                format!("⭐ {name} collected a star! ({} stars)", power.stars),
                Severity::Success,
            );
            TurnFlow::EndTurn
        }
        Effect::PowerUpSpeed => {
            t.state.power_ups[seat] = t.state.power_ups[seat].grant_speed_boost();
            t.notify(
                format!("💨 {name} got a Speed Boost! +2 on the next move!"),
                Severity::Success,
            );
            TurnFlow::EndTurn
        }
        Effect::PowerUpShield => {
            t.state.power_ups[seat] = t.state.power_ups[seat].grant_shield();
            t.notify(
                format!("🛡️ {name} got a Shield! Protected from the next bad square!"),
                Severity::Success,
            );
            TurnFlow::EndTurn
        }
    }
}

fn teleport(t: &mut Transition, player: PlayerId, to: Square, message: String) -> TurnFlow {
    t.state.positions[usize::from(player)] = to;
    t.notify(message, Severity::Special);
    TurnFlow::EndTurn
}

/// Relative move from an effect. Overshooting the finish leaves the player in place.
fn shift(t: &mut Transition, player: PlayerId, delta: i16, lead: &str) -> TurnFlow {
    let seat = usize::from(player);
    let from = t.state.positions[seat];
    let severity = if delta < 0 {
        Severity::Warning
    } else {
        Severity::Success
    };

    match resolve_move(from, delta) {
        MoveOutcome::Blocked { .. } => {
            t.notify(
                format!("{lead}... but that's past square {FINISH}! Staying at {from}."),
                Severity::Warning,
            );
            TurnFlow::EndTurn
        }
        MoveOutcome::Win => {
            t.state.positions[seat] = FINISH;
            t.notify(format!("{lead} to square {FINISH}!"), severity);
            t.cue(SoundCue::PlayerMove);
            t.declare_winner(player);
            TurnFlow::GameOver
        }
        MoveOutcome::Legal(to) => {
            t.state.positions[seat] = to;
            t.notify(format!("{lead} to square {to}!"), severity);
            t.cue(SoundCue::PlayerMove);
            TurnFlow::EndTurn
        }
    }
}
