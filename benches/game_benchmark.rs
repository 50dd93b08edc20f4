//! Benchmarks for the game loop.
//!
//! `run_game` is the hot path of `mi50 simulate`.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mi50::game::GameState;
use mi50::sim::{SimulationConfig, run_game, run_many};
use mi50::trivia::MathQuestionGenerator;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn bench_single_game(c: &mut Criterion) {
    let config = SimulationConfig::default();

    c.bench_function("single_game_2p", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_single_game_4p(c: &mut Criterion) {
    let config = SimulationConfig {
        num_players: 4,
        ..Default::default()
    };

    c.bench_function("single_game_4p", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_game_batch(c: &mut Criterion) {
    // 100 games through the rayon fold/reduce
    let config = SimulationConfig::default();

    c.bench_function("100_games_parallel", |b| {
        b.iter(|| {
            let summary = run_many(black_box(0..100u64), black_box(&config));
            black_box(summary)
        });
    });
}

fn bench_apply_roll(c: &mut Criterion) {
    let mut state = GameState::new().setup(4).unwrap().state;
    for character in 0..4 {
        state = state.select_character(character).unwrap().state;
    }
    state.positions = vec![11, 20, 29, 36];
    let mut oracle = MathQuestionGenerator::new(SmallRng::seed_from_u64(1));
    let mut rng = SmallRng::seed_from_u64(2);

    c.bench_function("apply_roll", |b| {
        b.iter(|| {
            let t = state.apply_roll(black_box(3), &mut oracle, &mut rng);
            black_box(t)
        });
    });
}

criterion_group!(benches, bench_single_game, bench_single_game_4p, bench_game_batch, bench_apply_roll);
criterion_main!(benches);
