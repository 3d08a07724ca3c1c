/// Home-field advantage in rating points.
pub const HOME_FIELD_EDGE: f64 = 1.4;

/// Logistic scale converting a rating differential to a win probability.
pub const LOGISTIC_SCALE: f64 = 0.145;

/// First season with the expanded three-wild-card playoff format.
pub const EXPANDED_WILDCARD_SEASON: u16 = 2020;

/// Wild-card seeds per conference for seasons since 2020.
pub const WILDCARDS_MODERN: usize = 3;

/// Wild-card seeds per conference before 2020.
pub const WILDCARDS_CLASSIC: usize = 2;

/// Upper bound on tie-break recursion depth. The restart rule strictly
/// shrinks the tied group, so hitting this indicates a logic error.
pub const MAX_TIEBREAK_DEPTH: usize = 16;

/// Number of wild-card slots per conference for a given season.
pub fn wildcard_slots(season: u16) -> usize {
    if season >= EXPANDED_WILDCARD_SEASON {
        WILDCARDS_MODERN
    } else {
        WILDCARDS_CLASSIC
    }
}
