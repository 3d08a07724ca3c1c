use std::collections::HashMap;

use rand::Rng;

use crate::error::Result;
use crate::seeding::Seeding;
use crate::win_prob::GameProbabilityModel;

/// Round-1 value for every playoff team; winners of a round move one past
/// it, so the map doubles as "furthest round reached".
const ENTRY_ROUND: u32 = 1;

/// Pairings for one bracket round over `count` remaining teams, ordered by
/// seed. Entry `(i, None)` is a bye for the team at index `i`; entry
/// `(i, Some(j))` pits index `i` (home field, higher seed) against `j`.
///
/// Seed `i` meets seed `2k - 1 - i` where `2k` is the smallest power of two
/// at or above the remaining count; opponents past the end of the list do
/// not exist, which is what grants the top seeds their byes.
fn round_pairings(count: usize) -> Vec<(usize, Option<usize>)> {
    let half = count.next_power_of_two() / 2;
    (0..half)
        .map(|i| {
            let opponent = 2 * half - 1 - i;
            if opponent >= count {
                (i, None)
            } else {
                (i, Some(opponent))
            }
        })
        .collect()
}

/// Simulate the playoffs for one trial's seeding to a league champion.
///
/// Each conference plays single-elimination rounds with re-seeding: after
/// every round the winners are re-ordered by original seed, not by the
/// order they were paired. The two conference champions then meet once on a
/// neutral site. Returns each playoff team's furthest round reached; the
/// final's loser records the final's round and the champion one past it.
pub fn simulate_bracket<R: Rng>(
    seeding: &Seeding,
    model: &dyn GameProbabilityModel,
    rng: &mut R,
) -> Result<HashMap<String, u32>> {
    seeding.assert_valid();
    assert_eq!(seeding.conferences.len(), 2, "bracket needs exactly two conferences");

    let mut rounds: HashMap<String, u32> = seeding
        .seeded_teams()
        .map(|t| (t.clone(), ENTRY_ROUND))
        .collect();

    let mut champions: Vec<String> = Vec::with_capacity(2);
    for conference in seeding.conferences.values() {
        let original_seed: HashMap<&str, usize> = conference
            .seeds
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let mut remaining: Vec<String> = conference.seeds.clone();
        let mut round = ENTRY_ROUND;
        while remaining.len() > 1 {
            let mut winners: Vec<String> = Vec::with_capacity(remaining.len() / 2 + 1);
            for (i, opponent) in round_pairings(remaining.len()) {
                match opponent {
                    None => winners.push(remaining[i].clone()),
                    Some(j) => {
                        let home = &remaining[i];
                        let away = &remaining[j];
                        let p = model.win_probability(home, away, false)?;
                        let winner = if rng.gen::<f64>() < p { home } else { away };
                        winners.push(winner.clone());
                    }
                }
            }

            round += 1;
            for winner in &winners {
                rounds.insert(winner.clone(), round);
            }
            // Reseed: next round's bracket is ordered by original seed.
            winners.sort_by_key(|t| original_seed[t.as_str()]);
            remaining = winners;
        }
        champions.push(remaining.remove(0));
    }

    // League final, neutral site. The nominal home side is arbitrary.
    let p = model.win_probability(&champions[0], &champions[1], true)?;
    let (winner, loser) = if rng.gen::<f64>() < p {
        (&champions[0], &champions[1])
    } else {
        (&champions[1], &champions[0])
    };
    let final_round = champions.iter().map(|c| rounds[c.as_str()]).max().unwrap_or(ENTRY_ROUND);
    // The loser is the runner-up even when its conference ran fewer rounds.
    rounds.insert(loser.clone(), final_round);
    rounds.insert(winner.clone(), final_round + 1);

    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeding::ConferenceSeeding;
    use crate::win_prob::{MatchupOverrides, RatingModel};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Forwards to an inner model while recording every matchup asked for.
    struct RecordingModel<M> {
        inner: M,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl<M: GameProbabilityModel> GameProbabilityModel for RecordingModel<M> {
        fn win_probability(&self, home: &str, away: &str, neutral_site: bool) -> Result<f64> {
            self.calls.lock().unwrap().push((home.to_string(), away.to_string()));
            self.inner.win_probability(home, away, neutral_site)
        }
    }

    fn seeding_of(afc: &[&str], nfc: &[&str]) -> Seeding {
        let mut conferences = BTreeMap::new();
        conferences.insert(
            "AFC".to_string(),
            ConferenceSeeding {
                seeds: afc.iter().map(|s| s.to_string()).collect(),
                division_slots: afc.len().min(4),
            },
        );
        conferences.insert(
            "NFC".to_string(),
            ConferenceSeeding {
                seeds: nfc.iter().map(|s| s.to_string()).collect(),
                division_slots: nfc.len().min(4),
            },
        );
        Seeding { conferences }
    }

    /// Model forcing specific winners through probability overrides; every
    /// unspecified matchup is a coin flip between zero-rated teams.
    fn forced(outcomes: &[(&str, &str)]) -> RatingModel {
        let mut ratings = std::collections::HashMap::new();
        for (winner, loser) in outcomes {
            ratings.insert(winner.to_string(), 0.0);
            ratings.insert(loser.to_string(), 0.0);
        }
        let mut overrides = MatchupOverrides::new();
        for (winner, loser) in outcomes {
            overrides.set(winner, loser, 1.0);
        }
        RatingModel::new(ratings).with_overrides(overrides)
    }

    #[test]
    fn test_seven_team_round_has_one_bye() {
        let pairings = round_pairings(7);
        // Seed 1 sits out; 2v7, 3v6, 4v5 (zero-based indices).
        assert_eq!(pairings, vec![(0, None), (1, Some(6)), (2, Some(5)), (3, Some(4))]);
    }

    #[test]
    fn test_power_of_two_round_has_no_byes() {
        let pairings = round_pairings(4);
        assert_eq!(pairings, vec![(0, Some(3)), (1, Some(2))]);
    }

    #[test]
    fn test_bye_team_advances_without_a_game() {
        let seeding = seeding_of(&["A1", "A2", "A3", "A4", "A5", "A6", "A7"], &["N1"]);
        // Higher seed wins every game.
        let model = forced(&[
            ("A2", "A7"), ("A3", "A6"), ("A4", "A5"),
            ("A1", "A4"), ("A2", "A3"),
            ("A1", "A2"),
            ("A1", "N1"),
        ]);
        let recording = RecordingModel { inner: model, calls: Mutex::new(Vec::new()) };

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rounds = simulate_bracket(&seeding, &recording, &mut rng).unwrap();

        let calls = recording.calls.lock().unwrap();
        assert!(
            calls[..3].iter().all(|(h, a)| h != "A1" && a != "A1"),
            "seed 1 must not play in round 1"
        );
        // Round 1 is exactly three games.
        assert_eq!(&calls[..3], &[
            ("A2".to_string(), "A7".to_string()),
            ("A3".to_string(), "A6".to_string()),
            ("A4".to_string(), "A5".to_string()),
        ]);
        // A1 advanced through the bye and won it all.
        assert_eq!(rounds["A1"], 5);
        assert_eq!(rounds["A7"], 1);
    }

    #[test]
    fn test_reseeding_orders_winners_by_original_seed() {
        let seeding = seeding_of(&["A1", "A2", "A3", "A4", "A5", "A6", "A7"], &["N1"]);
        // Seed 7 upsets seed 2 in round 1; seeds 3 and 4 hold.
        let model = forced(&[
            ("A7", "A2"), ("A3", "A6"), ("A4", "A5"),
            ("A1", "A7"), ("A3", "A4"),
            ("A1", "A3"),
            ("A1", "N1"),
        ]);
        let recording = RecordingModel { inner: model, calls: Mutex::new(Vec::new()) };

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rounds = simulate_bracket(&seeding, &recording, &mut rng).unwrap();

        // After reseeding the survivors are 1, 3, 4, 7 in that order, so
        // round 2 pairs 1v7 and 3v4 -- the upset winner does not inherit
        // seed 2's slot.
        let calls = recording.calls.lock().unwrap();
        assert_eq!(&calls[3..5], &[
            ("A1".to_string(), "A7".to_string()),
            ("A3".to_string(), "A4".to_string()),
        ]);
        assert_eq!(rounds["A7"], 2);
        assert_eq!(rounds["A2"], 1);
    }

    #[test]
    fn test_furthest_round_bookkeeping() {
        let seeding = seeding_of(&["A1", "A2"], &["N1", "N2"]);
        let model = forced(&[("A1", "A2"), ("N1", "N2"), ("A1", "N1")]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let rounds = simulate_bracket(&seeding, &model, &mut rng).unwrap();
        assert_eq!(rounds["A2"], 1);
        assert_eq!(rounds["N2"], 1);
        assert_eq!(rounds["N1"], 2); // runner-up
        assert_eq!(rounds["A1"], 3); // champion
    }

    #[test]
    fn test_uneven_final_loser_records_runner_up_round() {
        let seeding = seeding_of(&["A1", "A2"], &["N1"]);
        let model = forced(&[("A1", "A2"), ("A1", "N1")]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let rounds = simulate_bracket(&seeding, &model, &mut rng).unwrap();
        // N1 never played a conference round; losing the final still
        // leaves it exactly one round shy of the champion.
        assert_eq!(rounds["A1"], 3);
        assert_eq!(rounds["N1"], 2);
        assert_eq!(rounds["A2"], 1);
    }

    #[test]
    #[should_panic(expected = "holds two seeds")]
    fn test_malformed_seeding_fails_fast() {
        let seeding = seeding_of(&["A1", "A1"], &["N1"]);
        let model = forced(&[("A1", "N1")]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let _ = simulate_bracket(&seeding, &model, &mut rng);
    }
}
