use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// All of these indicate a data-integrity problem in the inputs (a team
/// referenced without a membership entry or rating) and abort the whole
/// simulation run. Unresolvable ties are not errors; they are broken at
/// random and counted as diagnostics.
#[derive(Debug, Error)]
pub enum SimError {
    /// A game or rating references a team missing from the league table.
    #[error("unknown team '{team}' referenced by {context}")]
    UnknownTeam { team: String, context: &'static str },

    /// The probability model has no rating for a team.
    #[error("no rating for team '{0}'")]
    MissingRating(String),

    /// The snapshot does not describe a two-conference league.
    #[error("league must have exactly two conferences, found {0}")]
    MalformedLeague(usize),

    /// Snapshot deserialization failed.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
