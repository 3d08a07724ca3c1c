use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::schedule::{Game, LeagueSnapshot};
use crate::team::Record;

/// One team's view of one played game.
///
/// Every played game yields two rows, one per perspective, with mirrored
/// scores. Rows carry the membership of both sides plus the opponent's
/// season-aggregate record so that tie-break filters can select by
/// division/conference and strength-of-schedule resolutions need no
/// further joins.
#[derive(Clone, Debug)]
pub struct GameLogRow {
    pub team: String,
    pub opponent: String,
    pub points: u32,
    pub opp_points: u32,
    pub is_home: bool,
    pub team_conference: String,
    pub team_division: String,
    pub opp_conference: String,
    pub opp_division: String,
    /// Opponent's aggregate record over the whole season.
    pub opp_record: Record,
}

impl GameLogRow {
    pub fn is_win(&self) -> bool {
        self.points > self.opp_points
    }

    pub fn is_loss(&self) -> bool {
        self.points < self.opp_points
    }

    pub fn is_tie(&self) -> bool {
        self.points == self.opp_points
    }

    /// Exactly one of wins/losses/ties is 1.
    pub fn outcome(&self) -> Record {
        Record {
            wins: self.is_win() as u32,
            losses: self.is_loss() as u32,
            ties: self.is_tie() as u32,
        }
    }
}

/// Symmetric game log for one realized season, with per-team aggregates.
///
/// Pure function of its inputs; built fresh for every trial and discarded
/// with it.
#[derive(Clone, Debug)]
pub struct GameLog {
    pub rows: Vec<GameLogRow>,
    records: HashMap<String, Record>,
}

impl GameLog {
    /// Aggregate a set of games into the symmetric log. Unplayed games are
    /// skipped; a trial's game set is expected to be fully resolved.
    pub fn build(games: &[Game], snapshot: &LeagueSnapshot) -> Result<GameLog> {
        let index = snapshot.team_index();

        // First pass: season-aggregate record per team.
        let mut records: HashMap<String, Record> = HashMap::new();
        for game in games.iter().filter(|g| g.is_played()) {
            let score = game.score.unwrap();
            let home = records.entry(game.home.clone()).or_default();
            home.wins += (score.home > score.away) as u32;
            home.losses += (score.home < score.away) as u32;
            home.ties += (score.home == score.away) as u32;
            let away = records.entry(game.away.clone()).or_default();
            away.wins += (score.away > score.home) as u32;
            away.losses += (score.away < score.home) as u32;
            away.ties += (score.away == score.home) as u32;
        }

        // Second pass: two perspective rows per game.
        let mut rows = Vec::with_capacity(games.len() * 2);
        for game in games.iter().filter(|g| g.is_played()) {
            let score = game.score.unwrap();
            for (team, opponent, points, opp_points, is_home) in [
                (&game.home, &game.away, score.home, score.away, true),
                (&game.away, &game.home, score.away, score.home, false),
            ] {
                let missing = |name: &String| SimError::UnknownTeam {
                    team: name.clone(),
                    context: "game log",
                };
                let team_info = index.get(team.as_str()).ok_or_else(|| missing(team))?;
                let opp_info = index.get(opponent.as_str()).ok_or_else(|| missing(opponent))?;
                rows.push(GameLogRow {
                    team: team.clone(),
                    opponent: opponent.clone(),
                    points,
                    opp_points,
                    is_home,
                    team_conference: team_info.conference.clone(),
                    team_division: team_info.division.clone(),
                    opp_conference: opp_info.conference.clone(),
                    opp_division: opp_info.division.clone(),
                    opp_record: records.get(opponent).copied().unwrap_or_default(),
                });
            }
        }

        Ok(GameLog { rows, records })
    }

    /// Season record for a team; teams yet to play resolve to 0-0-0.
    pub fn record(&self, team: &str) -> Record {
        self.records.get(team).copied().unwrap_or_default()
    }

    /// Opponents a team has faced, over the whole log.
    pub fn opponents_of(&self, team: &str) -> std::collections::HashSet<&str> {
        self.rows
            .iter()
            .filter(|r| r.team == team)
            .map(|r| r.opponent.as_str())
            .collect()
    }
}
