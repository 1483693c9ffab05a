use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use league_engine::{
    fixture::{SeededShuffler, generate_cup_fixture, generate_league_fixture},
    models::{Match, Player},
    standings::{LEAGUE_CRITERIA, compute_standings, rank},
};
use std::hint::black_box;
use uuid::Uuid;

fn roster(n: usize) -> Vec<Player> {
    (0..n).map(|i| Player::new(format!("player{}", i))).collect()
}

/// Round robin with every match played, home side winning
fn played_season(players: &[Player]) -> Vec<Match> {
    let mut matches =
        generate_league_fixture(Uuid::nil(), players, &mut SeededShuffler::from_seed(1));
    for (i, m) in matches.iter_mut().enumerate() {
        m.score1 = Some((i % 5) as u32);
        m.score2 = Some((i % 3) as u32);
        m.is_overtime = i % 7 == 0;
        m.played = true;
    }
    matches
}

/// Benchmark round-robin generation for growing rosters
fn bench_league_fixture(c: &mut Criterion) {
    let mut group = c.benchmark_group("league_fixture");

    for n in [8, 20, 64] {
        let players = roster(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &players, |b, players| {
            let mut shuffler = SeededShuffler::from_seed(42);
            b.iter(|| generate_league_fixture(Uuid::nil(), black_box(players), &mut shuffler));
        });
    }

    group.finish();
}

/// Benchmark bracket generation, including rosters that need byes
fn bench_cup_fixture(c: &mut Criterion) {
    let mut group = c.benchmark_group("cup_fixture");

    for n in [8, 37, 128] {
        let players = roster(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &players, |b, players| {
            let mut shuffler = SeededShuffler::from_seed(42);
            b.iter(|| generate_cup_fixture(Uuid::nil(), black_box(players), true, &mut shuffler));
        });
    }

    group.finish();
}

/// Benchmark a full standings recompute over a played season
fn bench_compute_standings(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_standings");

    for n in [8, 20, 64] {
        let players = roster(n);
        let matches = played_season(&players);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(players, matches),
            |b, (players, matches)| {
                b.iter(|| compute_standings(black_box(players), black_box(matches)));
            },
        );
    }

    group.finish();
}

/// Benchmark ranking a computed table
fn bench_rank(c: &mut Criterion) {
    let players = roster(64);
    let table = compute_standings(&players, &played_season(&players));

    c.bench_function("rank_64_players", |b| {
        b.iter(|| rank(black_box(&table), &LEAGUE_CRITERIA));
    });
}

criterion_group!(
    benches,
    bench_league_fixture,
    bench_cup_fixture,
    bench_compute_standings,
    bench_rank
);
criterion_main!(benches);
