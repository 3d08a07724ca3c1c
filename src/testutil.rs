//! Shared league fixtures for tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::schedule::{Game, LeagueSnapshot};
use crate::team::Team;
use crate::win_prob::RatingModel;

/// Two conferences of four two-team divisions with a completed
/// intra-conference round robin. Results are deterministic (fixed seed),
/// scores never tie.
pub(crate) fn league_16(season: u16) -> LeagueSnapshot {
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

    let mut rng = ChaCha8Rng::seed_from_u64(42);
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
                let (home_pts, away_pts) = if rng.gen_bool(0.5) { (24, 17) } else { (13, 20) };
                games.push(Game::played(week, members[i], members[j], home_pts, away_pts));
            }
        }
    }

    LeagueSnapshot::new(season, teams, games).unwrap()
}

/// A spread of distinct ratings covering every team in the snapshot.
pub(crate) fn ratings_for(snapshot: &LeagueSnapshot) -> RatingModel {
    let ratings = snapshot
        .teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.clone(), i as f64 * 0.4 - 3.0))
        .collect();
    RatingModel::new(ratings)
}
