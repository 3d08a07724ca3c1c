use std::collections::{BTreeMap, HashMap, HashSet};

use rand::Rng;

use crate::constants::wildcard_slots;
use crate::error::Result;
use crate::schedule::LeagueSnapshot;
use crate::standings::GameLog;
use crate::tiebreak::{break_divisional_tie, break_wildcard_tie, TiedTeam};

/// One conference's completed seed list, best seed first.
#[derive(Clone, Debug)]
pub struct ConferenceSeeding {
    pub seeds: Vec<String>,
    /// How many of the top seeds are division winners.
    pub division_slots: usize,
}

impl ConferenceSeeding {
    pub fn division_winners(&self) -> &[String] {
        &self.seeds[..self.division_slots]
    }
}

/// Complete seed assignment for one realized season.
#[derive(Clone, Debug)]
pub struct Seeding {
    pub conferences: BTreeMap<String, ConferenceSeeding>,
}

impl Seeding {
    /// 1-based seed for a team, if it made the playoffs.
    pub fn seed_of(&self, team: &str) -> Option<(&str, usize)> {
        for (conference, seeding) in &self.conferences {
            if let Some(pos) = seeding.seeds.iter().position(|t| t == team) {
                return Some((conference.as_str(), pos + 1));
            }
        }
        None
    }

    pub fn seeded_teams(&self) -> impl Iterator<Item = &String> {
        self.conferences.values().flat_map(|c| c.seeds.iter())
    }

    /// Seeding must be a bijection: no seed unfilled, no team in two seats.
    /// Violations are programming errors, not runtime conditions.
    pub fn assert_valid(&self) {
        let mut seen = HashSet::new();
        for (conference, seeding) in &self.conferences {
            assert!(!seeding.seeds.is_empty(), "conference {conference} has no seeds");
            assert!(seeding.division_slots <= seeding.seeds.len());
            for team in &seeding.seeds {
                assert!(seen.insert(team.as_str()), "team {team} holds two seeds");
            }
        }
    }
}

/// Assign playoff seeds for one realized season.
///
/// Division winners are resolved first (divisional ladder per division,
/// then positional ranking across divisions), wild cards fill the remaining
/// seeds. Returns the seeding and whether any tie anywhere needed a random
/// break.
pub fn playoff_seeding<R: Rng>(
    log: &GameLog,
    snapshot: &LeagueSnapshot,
    rng: &mut R,
) -> Result<(Seeding, bool)> {
    // BTreeMaps keep conference/division iteration order stable so seeded
    // runs consume randomness identically.
    let mut structure: BTreeMap<&str, BTreeMap<&str, Vec<&str>>> = BTreeMap::new();
    for team in &snapshot.teams {
        structure
            .entry(team.conference.as_str())
            .or_default()
            .entry(team.division.as_str())
            .or_default()
            .push(team.name.as_str());
    }
    let division_of: HashMap<&str, &str> = snapshot
        .teams
        .iter()
        .map(|t| (t.name.as_str(), t.division.as_str()))
        .collect();

    let mut bad_tie = false;

    // Division winners: teams tied for the most wins (ties worth half),
    // reduced to one by the divisional ladder.
    let mut division_winners: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (conference, divisions) in &structure {
        for (division, members) in divisions {
            let best = members
                .iter()
                .map(|t| log.record(t).weighted_wins())
                .fold(f64::NEG_INFINITY, f64::max);
            let contenders: Vec<TiedTeam> = members
                .iter()
                .filter(|t| log.record(t).weighted_wins() == best)
                .map(|t| TiedTeam::new(*t, *division))
                .collect();
            let (winner, bad) = break_divisional_tie(log, &contenders, rng);
            bad_tie |= bad;
            division_winners.entry(conference).or_default().push(winner);
        }
    }

    let mut conferences = BTreeMap::new();
    for (conference, divisions) in &structure {
        let winners = &division_winners[conference];
        let winner_set: HashSet<&str> = winners.iter().map(String::as_str).collect();
        let rest: Vec<String> = divisions
            .values()
            .flatten()
            .filter(|t| !winner_set.contains(**t))
            .map(|t| t.to_string())
            .collect();

        let wildcards = wildcard_slots(snapshot.season).min(rest.len());
        let mut seeds: Vec<String> = Vec::with_capacity(winners.len() + wildcards);

        for (group, slots) in [(winners, winners.len()), (&rest, wildcards)] {
            fill_group_seeds(log, &division_of, group, slots, &mut seeds, &mut bad_tie, rng);
        }

        conferences.insert(
            conference.to_string(),
            ConferenceSeeding {
                seeds,
                division_slots: winners.len(),
            },
        );
    }

    let seeding = Seeding { conferences };
    seeding.assert_valid();
    Ok((seeding, bad_tie))
}

/// Fill `slots` seeds from one group (division winners or wild-card pool),
/// best win total first. Rank-tied subsets are resolved positionally with
/// the wild-card ladder, which itself defers to the divisional ladder when
/// the candidates share a division.
fn fill_group_seeds<R: Rng>(
    log: &GameLog,
    division_of: &HashMap<&str, &str>,
    group: &[String],
    slots: usize,
    seeds: &mut Vec<String>,
    bad_tie: &mut bool,
    rng: &mut R,
) {
    // Minimum-style rank over the whole group: 1 + number of strictly
    // better win totals.
    let rank = |team: &str| -> usize {
        let wins = log.record(team).wins;
        1 + group.iter().filter(|u| log.record(u.as_str()).wins > wins).count()
    };

    for slot in 0..slots {
        let candidates: Vec<TiedTeam> = group
            .iter()
            .filter(|t| rank(t.as_str()) <= slot + 1 && !seeds.contains(*t))
            .map(|t| TiedTeam::new(t.as_str(), division_of[t.as_str()]))
            .collect();
        assert!(!candidates.is_empty(), "seed slot has no candidates");

        let (winner, bad) = break_wildcard_tie(log, &candidates, rng);
        *bad_tie |= bad;
        seeds.push(winner);
    }
}
