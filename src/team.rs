use serde::{Deserialize, Serialize};

/// League membership for one team. Immutable for the duration of a season.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// One of the league's two conferences (e.g. "AFC").
    pub conference: String,
    /// Division within the conference (e.g. "AFC East").
    pub division: String,
}

impl Team {
    pub fn new(name: impl Into<String>, conference: impl Into<String>, division: impl Into<String>) -> Self {
        Team {
            name: name.into(),
            conference: conference.into(),
            division: division.into(),
        }
    }
}

/// Win/loss/tie tally. Ties count as half a win in percentage terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    pub fn add(&mut self, other: Record) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.ties += other.ties;
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win percentage with ties worth half a win; 0.0 with no games played.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / games as f64
    }

    /// Wins with ties counted as half, used for ranking teams.
    pub fn weighted_wins(&self) -> f64 {
        self.wins as f64 + 0.5 * self.ties as f64
    }
}
