use std::collections::HashMap;

use statrs::function::logistic::logistic;

use crate::constants::{HOME_FIELD_EDGE, LOGISTIC_SCALE};
use crate::error::{Result, SimError};

/// Single-game win probability model.
///
/// `Send + Sync` so trials can query it from a worker pool; implementations
/// are pure functions of pre-loaded ratings.
pub trait GameProbabilityModel: Send + Sync {
    /// Probability the home team wins. Home-field advantage applies unless
    /// the game is on a neutral site.
    fn win_probability(&self, home: &str, away: &str, neutral_site: bool) -> Result<f64>;
}

/// Manual probability overrides for specific matchups.
///
/// Keys are stored with team names in lexicographic order; retrieval with
/// the teams reversed flips the probability automatically.
#[derive(Clone, Debug, Default)]
pub struct MatchupOverrides {
    overrides: HashMap<(String, String), f64>,
}

impl MatchupOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update an override: `prob` is the probability of `name1`
    /// beating `name2`.
    pub fn set(&mut self, name1: &str, name2: &str, prob: f64) {
        let (key, value) = if name1 < name2 {
            ((name1.to_string(), name2.to_string()), prob)
        } else {
            ((name2.to_string(), name1.to_string()), 1.0 - prob)
        };
        self.overrides.insert(key, value);
    }

    pub fn remove(&mut self, name1: &str, name2: &str) {
        let key = if name1 < name2 {
            (name1.to_string(), name2.to_string())
        } else {
            (name2.to_string(), name1.to_string())
        };
        self.overrides.remove(&key);
    }

    /// Probability of `name1` beating `name2`, if an override exists.
    pub fn get(&self, name1: &str, name2: &str) -> Option<f64> {
        let (key, flip) = if name1 < name2 {
            ((name1.to_string(), name2.to_string()), false)
        } else {
            ((name2.to_string(), name1.to_string()), true)
        };
        self.overrides.get(&key).map(|&p| if flip { 1.0 - p } else { p })
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Default model: logistic regression over scalar strength ratings, with a
/// fixed rating bonus for the home side on non-neutral fields.
#[derive(Clone, Debug, Default)]
pub struct RatingModel {
    ratings: HashMap<String, f64>,
    overrides: MatchupOverrides,
}

impl RatingModel {
    pub fn new(ratings: HashMap<String, f64>) -> Self {
        RatingModel {
            ratings,
            overrides: MatchupOverrides::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: MatchupOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn rating(&self, team: &str) -> Result<f64> {
        self.ratings
            .get(team)
            .copied()
            .ok_or_else(|| SimError::MissingRating(team.to_string()))
    }
}

impl GameProbabilityModel for RatingModel {
    fn win_probability(&self, home: &str, away: &str, neutral_site: bool) -> Result<f64> {
        if let Some(prob) = self.overrides.get(home, away) {
            return Ok(prob);
        }

        let edge = if neutral_site { 0.0 } else { HOME_FIELD_EDGE };
        let diff = self.rating(home)? - self.rating(away)? + edge;
        Ok(logistic(LOGISTIC_SCALE * diff))
    }
}
