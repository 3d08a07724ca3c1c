use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::team::Team;

/// Final score of a played game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// One scheduled contest. Unplayed games carry no score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    pub week: u16,
    pub home: String,
    pub away: String,
    pub score: Option<Score>,
}

impl Game {
    pub fn played(week: u16, home: impl Into<String>, away: impl Into<String>, home_pts: u32, away_pts: u32) -> Self {
        Game {
            week,
            home: home.into(),
            away: away.into(),
            score: Some(Score { home: home_pts, away: away_pts }),
        }
    }

    pub fn unplayed(week: u16, home: impl Into<String>, away: impl Into<String>) -> Self {
        Game {
            week,
            home: home.into(),
            away: away.into(),
            score: None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }
}

/// Source of schedules and league membership for a season.
///
/// Implemented outside the core by the data-acquisition layer; the core
/// only ever sees the immutable [`LeagueSnapshot`] built from its output.
pub trait ScheduleProvider {
    fn schedule(&self, season: u16) -> Result<Vec<Game>>;
    fn teams(&self, season: u16) -> Result<Vec<Team>>;
}

/// Immutable snapshot of one season's reference data: every team with its
/// conference/division membership, plus the full game list (played and
/// unplayed). Built once per run, validated once, and shared by reference
/// across all trials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub season: u16,
    pub teams: Vec<Team>,
    pub games: Vec<Game>,
}

impl LeagueSnapshot {
    pub fn new(season: u16, teams: Vec<Team>, games: Vec<Game>) -> Result<Self> {
        let snapshot = LeagueSnapshot { season, teams, games };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Build a snapshot by querying a provider for one season.
    pub fn from_provider(provider: &dyn ScheduleProvider, season: u16) -> Result<Self> {
        Self::new(season, provider.teams(season)?, provider.schedule(season)?)
    }

    /// Deserialize a snapshot captured earlier (e.g. by the reporting layer).
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: LeagueSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Team lookup keyed by name.
    pub fn team_index(&self) -> HashMap<&str, &Team> {
        self.teams.iter().map(|t| (t.name.as_str(), t)).collect()
    }

    /// Conference names present in the snapshot, sorted.
    pub fn conferences(&self) -> Vec<&str> {
        let mut conferences: Vec<&str> = self.teams.iter().map(|t| t.conference.as_str()).collect();
        conferences.sort_unstable();
        conferences.dedup();
        conferences
    }

    /// Every team in a game must have a membership entry.
    fn validate(&self) -> Result<()> {
        let index = self.team_index();
        for game in &self.games {
            for name in [&game.home, &game.away] {
                if !index.contains_key(name.as_str()) {
                    return Err(SimError::UnknownTeam {
                        team: name.clone(),
                        context: "schedule",
                    });
                }
            }
        }
        Ok(())
    }
}
