use std::collections::{BTreeMap, HashMap};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::bracket::simulate_bracket;
use crate::error::{Result, SimError};
use crate::outcome::{OutcomeTable, PlayoffOutcome, TeamDistribution};
use crate::schedule::{Game, LeagueSnapshot, Score};
use crate::seeding::{playoff_seeding, Seeding};
use crate::standings::GameLog;
use crate::team::Team;
use crate::win_prob::GameProbabilityModel;

/// Knobs for one simulation run.
#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub trials: usize,
    /// Master seed; `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Replaces the snapshot's game list for this run, e.g. to force a
    /// hypothetical result by marking a game played.
    pub override_schedule: Option<Vec<Game>>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            trials: 1000,
            seed: None,
            override_schedule: None,
        }
    }
}

/// One realized trial: furthest playoff round per team, the seeding that
/// produced it, and whether any tie needed a coin flip.
struct TrialResult {
    rounds: HashMap<String, u32>,
    seeding: Seeding,
    bad_tie: bool,
}

/// Per-worker outcome tally; workers fold trials into private tallies that
/// are merged associatively at the end of the run.
#[derive(Default)]
struct Tally {
    trials: u64,
    bad_ties: u64,
    outcome_counts: HashMap<String, [u64; 6]>,
    division_counts: HashMap<String, u64>,
}

impl Tally {
    fn record(&mut self, trial: &TrialResult, teams: &[Team]) {
        self.trials += 1;
        self.bad_ties += trial.bad_tie as u64;
        let championship = trial.rounds.values().copied().max().unwrap_or(0);
        for team in teams {
            let round = trial.rounds.get(&team.name).copied().unwrap_or(0);
            let outcome = PlayoffOutcome::from_round(round, championship);
            self.outcome_counts.entry(team.name.clone()).or_default()[outcome.index()] += 1;
        }
        for conference in trial.seeding.conferences.values() {
            for winner in conference.division_winners() {
                *self.division_counts.entry(winner.clone()).or_default() += 1;
            }
        }
    }

    fn merge(&mut self, other: Tally) {
        self.trials += other.trials;
        self.bad_ties += other.bad_ties;
        for (team, counts) in other.outcome_counts {
            let entry = self.outcome_counts.entry(team).or_default();
            for (slot, count) in entry.iter_mut().zip(counts) {
                *slot += count;
            }
        }
        for (team, count) in other.division_counts {
            *self.division_counts.entry(team).or_default() += count;
        }
    }

    fn into_table(self, teams: &[Team]) -> OutcomeTable {
        let n = self.trials.max(1) as f64;
        let mut table = BTreeMap::new();
        for team in teams {
            let counts = self.outcome_counts.get(&team.name).copied().unwrap_or_default();
            let mut outcomes = [0.0; 6];
            for (p, count) in outcomes.iter_mut().zip(counts) {
                *p = count as f64 / n;
            }
            let division_winner =
                self.division_counts.get(&team.name).copied().unwrap_or(0) as f64 / n;
            table.insert(team.name.clone(), TeamDistribution { outcomes, division_winner });
        }
        OutcomeTable {
            trials: self.trials as usize,
            bad_tie_rate: self.bad_ties as f64 / n,
            teams: table,
        }
    }
}

/// Monte Carlo driver: completes the remaining schedule `trials` times and
/// plays out seeding and playoffs for every completion.
///
/// Trials are embarrassingly parallel; each gets its own `ChaCha8Rng`
/// seeded from a master stream so results are reproducible for a fixed
/// seed regardless of worker scheduling.
pub struct Simulator<'a, M> {
    snapshot: &'a LeagueSnapshot,
    model: &'a M,
}

impl<'a, M: GameProbabilityModel> Simulator<'a, M> {
    pub fn new(snapshot: &'a LeagueSnapshot, model: &'a M) -> Self {
        Simulator { snapshot, model }
    }

    pub fn run(&self, options: &SimulationOptions) -> Result<OutcomeTable> {
        let conferences = self.snapshot.conferences();
        if conferences.len() != 2 {
            return Err(SimError::MalformedLeague(conferences.len()));
        }

        let games: &[Game] = options
            .override_schedule
            .as_deref()
            .unwrap_or(&self.snapshot.games);
        let index = self.snapshot.team_index();
        for game in games {
            for name in [&game.home, &game.away] {
                if !index.contains_key(name.as_str()) {
                    return Err(SimError::UnknownTeam {
                        team: name.clone(),
                        context: "override schedule",
                    });
                }
            }
        }

        // One model query per unplayed game, up front: validates ratings
        // before any trial starts and keeps the trial loop free of lookups.
        let unplayed = games
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.is_played())
            .map(|(i, g)| Ok((i, self.model.win_probability(&g.home, &g.away, false)?)))
            .collect::<Result<Vec<(usize, f64)>>>()?;

        let mut master = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let trial_seeds: Vec<u64> = (0..options.trials).map(|_| master.gen()).collect();

        log::info!(
            "simulating {} trials of season {} ({} games to play)",
            options.trials,
            self.snapshot.season,
            unplayed.len()
        );

        let tally = trial_seeds
            .par_iter()
            .map(|&seed| self.run_trial(games, &unplayed, seed))
            .try_fold(Tally::default, |mut tally, trial| {
                tally.record(&trial?, &self.snapshot.teams);
                Ok::<_, SimError>(tally)
            })
            .try_reduce(Tally::default, |mut a, b| {
                a.merge(b);
                Ok::<_, SimError>(a)
            })?;

        log::info!(
            "random tie-break needed in {} of {} trials",
            tally.bad_ties,
            tally.trials
        );
        Ok(tally.into_table(&self.snapshot.teams))
    }

    /// One independent season completion, seeding, and bracket run.
    fn run_trial(&self, games: &[Game], unplayed: &[(usize, f64)], seed: u64) -> Result<TrialResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut completed = games.to_vec();
        for &(index, p) in unplayed {
            completed[index].score = Some(if rng.gen::<f64>() < p {
                Score { home: 1, away: 0 }
            } else {
                Score { home: 0, away: 1 }
            });
        }

        let log = GameLog::build(&completed, self.snapshot)?;
        let (seeding, bad_tie) = playoff_seeding(&log, self.snapshot, &mut rng)?;
        let rounds = simulate_bracket(&seeding, self.model, &mut rng)?;
        Ok(TrialResult { rounds, seeding, bad_tie })
    }
}
