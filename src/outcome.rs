use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How far a team's postseason went, labelled for the NFL bracket shape
/// (three conference rounds plus the league final).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayoffOutcome {
    MissedPlayoffs,
    WildCardExit,
    DivisionalExit,
    ConferenceExit,
    RunnerUp,
    Champion,
}

pub const ALL_OUTCOMES: [PlayoffOutcome; 6] = [
    PlayoffOutcome::MissedPlayoffs,
    PlayoffOutcome::WildCardExit,
    PlayoffOutcome::DivisionalExit,
    PlayoffOutcome::ConferenceExit,
    PlayoffOutcome::RunnerUp,
    PlayoffOutcome::Champion,
];

impl PlayoffOutcome {
    /// Map a furthest-round value (0 = missed the field) to an outcome.
    ///
    /// Labels are measured backwards from the championship round, so they
    /// stay correct for brackets shallower than the league's seven-team
    /// conferences.
    pub fn from_round(round: u32, championship_round: u32) -> Self {
        if round == 0 {
            return PlayoffOutcome::MissedPlayoffs;
        }
        match championship_round.saturating_sub(round) {
            0 => PlayoffOutcome::Champion,
            1 => PlayoffOutcome::RunnerUp,
            2 => PlayoffOutcome::ConferenceExit,
            3 => PlayoffOutcome::DivisionalExit,
            _ => PlayoffOutcome::WildCardExit,
        }
    }

    pub fn index(self) -> usize {
        ALL_OUTCOMES.iter().position(|&o| o == self).unwrap()
    }
}

/// Per-team outcome distribution across all trials.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TeamDistribution {
    /// Probability per [`ALL_OUTCOMES`] entry; sums to 1.
    pub outcomes: [f64; 6],
    /// Probability of winning the division (holding a division seed).
    pub division_winner: f64,
}

impl TeamDistribution {
    pub fn probability(&self, outcome: PlayoffOutcome) -> f64 {
        self.outcomes[outcome.index()]
    }

    /// Probability of reaching the playoffs at all.
    pub fn playoff_probability(&self) -> f64 {
        1.0 - self.probability(PlayoffOutcome::MissedPlayoffs)
    }
}

/// Aggregated result of a simulation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutcomeTable {
    pub trials: usize,
    /// Fraction of trials where at least one tie needed a coin flip.
    pub bad_tie_rate: f64,
    pub teams: BTreeMap<String, TeamDistribution>,
}

impl OutcomeTable {
    pub fn team(&self, name: &str) -> Option<&TeamDistribution> {
        self.teams.get(name)
    }
}
