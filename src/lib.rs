//! Gridiron Core - Monte Carlo NFL playoff simulation library.
//!
//! Given a partially-completed season schedule and per-team strength
//! ratings, this library completes the remaining games many times over,
//! resolves the league's tie-break rules and playoff seeding for each
//! completed season, and plays out the postseason bracket, producing a
//! per-team probability distribution over playoff outcomes.
//!
//! Schedule acquisition and result reporting live outside this crate; the
//! seams are the [`ScheduleProvider`] and [`GameProbabilityModel`] traits
//! plus the immutable [`LeagueSnapshot`] handed to the [`Simulator`].

pub mod bracket;
pub mod constants;
pub mod error;
pub mod outcome;
pub mod schedule;
pub mod season;
pub mod seeding;
pub mod standings;
pub mod team;
pub mod tiebreak;
pub mod win_prob;

#[cfg(test)]
pub(crate) mod testutil;

pub use bracket::simulate_bracket;
pub use error::{Result, SimError};
pub use outcome::{OutcomeTable, PlayoffOutcome, TeamDistribution, ALL_OUTCOMES};
pub use schedule::{Game, LeagueSnapshot, ScheduleProvider, Score};
pub use season::{SimulationOptions, Simulator};
pub use seeding::{playoff_seeding, ConferenceSeeding, Seeding};
pub use standings::{GameLog, GameLogRow};
pub use team::{Record, Team};
pub use tiebreak::{break_divisional_tie, break_wildcard_tie, TiedTeam};
pub use win_prob::{GameProbabilityModel, MatchupOverrides, RatingModel};
