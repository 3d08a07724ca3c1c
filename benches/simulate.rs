use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use gridiron_core::{
    playoff_seeding, Game, GameLog, LeagueSnapshot, RatingModel, SimulationOptions, Simulator,
    Team,
};

/// Full two-conference league with an intra-conference round robin, the
/// last ten games left unplayed.
fn build_league() -> (LeagueSnapshot, RatingModel) {
    let mut teams = Vec::new();
    for conference in ["AFC", "NFC"] {
        for division in ["East", "North", "South", "West"] {
            for slot in 1..=2 {
                teams.push(Team::new(
                    format!("{conference} {division} {slot}"),
                    conference,
                    format!("{conference} {division}"),
                ));
            }
        }
    }

    let mut games = Vec::new();
    for conference in ["AFC", "NFC"] {
        let members: Vec<&str> = teams
            .iter()
            .filter(|t| t.conference == conference)
            .map(|t| t.name.as_str())
            .collect();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let week = (games.len() / 8 + 1) as u16;
                let (home_pts, away_pts) = if (i + j) % 2 == 0 { (24, 17) } else { (13, 20) };
                games.push(Game::played(week, members[i], members[j], home_pts, away_pts));
            }
        }
    }
    let cut = games.len() - 10;
    for game in &mut games[cut..] {
        game.score = None;
    }

    let ratings = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.clone(), i as f64 * 0.4 - 3.0))
        .collect();

    (
        LeagueSnapshot::new(2023, teams, games).unwrap(),
        RatingModel::new(ratings),
    )
}

fn bench_playoff_seeding(c: &mut Criterion) {
    let (snapshot, _) = build_league();
    let log = GameLog::build(&snapshot.games, &snapshot).unwrap();

    c.bench_function("playoff_seeding", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            playoff_seeding(black_box(&log), black_box(&snapshot), &mut rng).unwrap()
        })
    });
}

fn bench_game_log_build(c: &mut Criterion) {
    let (snapshot, _) = build_league();

    c.bench_function("game_log_build", |b| {
        b.iter(|| GameLog::build(black_box(&snapshot.games), black_box(&snapshot)).unwrap())
    });
}

fn bench_simulation_run(c: &mut Criterion) {
    let (snapshot, model) = build_league();
    let simulator = Simulator::new(&snapshot, &model);
    let options = SimulationOptions {
        trials: 200,
        seed: Some(42),
        ..Default::default()
    };

    c.bench_function("simulate_200_trials", |b| {
        b.iter(|| simulator.run(black_box(&options)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_playoff_seeding,
    bench_game_log_build,
    bench_simulation_run,
);
criterion_main!(benches);
