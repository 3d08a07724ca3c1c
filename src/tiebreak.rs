use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::MAX_TIEBREAK_DEPTH;
use crate::standings::GameLog;
use crate::team::Record;

/// Member of a tie group. Carries its division so wild-card resolution can
/// split the group into per-division sub-ties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TiedTeam {
    pub team: String,
    pub division: String,
}

impl TiedTeam {
    pub fn new(team: impl Into<String>, division: impl Into<String>) -> Self {
        TiedTeam {
            team: team.into(),
            division: division.into(),
        }
    }
}

/// Row filter: selects the game-log rows relevant to one rule step, given
/// the current candidate pool.
type FilterFn = fn(&GameLog, &[String]) -> Vec<usize>;

/// Resolution: computes the decisive metric over the filtered rows and
/// returns every team tied for the best value, sorted by name.
type ResolveFn = fn(&GameLog, &[usize]) -> Vec<String>;

/// One rung of a tie-break ladder.
struct Step {
    name: &'static str,
    filter: FilterFn,
    resolve: ResolveFn,
}

/// Divisional ladder, in league precedence order.
static DIVISION_STEPS: [Step; 6] = [
    Step { name: "head-to-head", filter: head_to_head, resolve: best_win_pct },
    Step { name: "division record", filter: division_games, resolve: best_win_pct },
    Step { name: "common games", filter: common_games_min1, resolve: best_win_pct },
    Step { name: "conference record", filter: conference_games, resolve: best_win_pct },
    Step { name: "strength of victory", filter: victories, resolve: best_opponent_pct },
    Step { name: "strength of schedule", filter: all_games, resolve: best_opponent_pct },
];

/// Wild-card ladder, in league precedence order.
static WILDCARD_STEPS: [Step; 5] = [
    Step { name: "head-to-head sweep", filter: sweep_games, resolve: sweep_survivors },
    Step { name: "conference record", filter: conference_games, resolve: best_win_pct },
    Step { name: "common games", filter: common_games_min4, resolve: best_win_pct },
    Step { name: "strength of victory", filter: victories, resolve: best_opponent_pct },
    Step { name: "strength of schedule", filter: all_games, resolve: best_opponent_pct },
];

/// Which ladder a shrunk-to-two group restarts on.
#[derive(Clone, Copy)]
enum Ladder {
    Divisional,
    WildCard,
}

/// Resolve a tie among teams of a single division.
///
/// Returns the winning team and whether any step of the resolution had to
/// fall back to a random choice (a "bad tie").
pub fn break_divisional_tie<R: Rng>(log: &GameLog, tied: &[TiedTeam], rng: &mut R) -> (String, bool) {
    divisional_tie(log, tied, rng, 0)
}

/// Resolve a tie among teams that may span divisions.
///
/// Per league rule this is two-phase: each division's sub-group is first
/// reduced to one representative with the divisional ladder, then the
/// representatives are resolved with the wild-card ladder.
pub fn break_wildcard_tie<R: Rng>(log: &GameLog, tied: &[TiedTeam], rng: &mut R) -> (String, bool) {
    wildcard_tie(log, tied, rng, 0)
}

fn divisional_tie<R: Rng>(log: &GameLog, tied: &[TiedTeam], rng: &mut R, depth: usize) -> (String, bool) {
    assert!(depth < MAX_TIEBREAK_DEPTH, "tie-break recursion depth exceeded");
    assert!(!tied.is_empty(), "tie group must not be empty");
    if tied.len() == 1 {
        return (tied[0].team.clone(), false);
    }
    run_ladder(log, &DIVISION_STEPS, tied, Ladder::Divisional, rng, depth)
}

fn wildcard_tie<R: Rng>(log: &GameLog, tied: &[TiedTeam], rng: &mut R, depth: usize) -> (String, bool) {
    assert!(depth < MAX_TIEBREAK_DEPTH, "tie-break recursion depth exceeded");
    assert!(!tied.is_empty(), "tie group must not be empty");

    let mut divisions: Vec<&str> = tied.iter().map(|t| t.division.as_str()).collect();
    divisions.sort_unstable();
    divisions.dedup();
    if divisions.len() == 1 {
        return divisional_tie(log, tied, rng, depth);
    }

    // Phase one: one representative per division.
    let mut bad_tie = false;
    let mut representatives: HashSet<String> = HashSet::new();
    for division in divisions {
        let sub: Vec<TiedTeam> = tied.iter().filter(|t| t.division == division).cloned().collect();
        let (winner, bad) = divisional_tie(log, &sub, rng, depth + 1);
        bad_tie |= bad;
        representatives.insert(winner);
    }

    // Phase two: wild-card ladder over the representatives.
    let finalists: Vec<TiedTeam> = tied
        .iter()
        .filter(|t| representatives.contains(&t.team))
        .cloned()
        .collect();
    let (winner, bad) = run_ladder(log, &WILDCARD_STEPS, &finalists, Ladder::WildCard, rng, depth);
    (winner, bad_tie | bad)
}

/// Apply a ladder's steps in order until one team remains.
///
/// A step whose filtered row set is empty leaves the pool untouched. A pool
/// shrunk to exactly two teams from a larger group restarts resolution from
/// the top of the appropriate ladder, because a two-team subgroup can have
/// different head-to-head and common-opponent results than the full group.
/// An exhausted ladder falls back to a uniform random pick.
fn run_ladder<R: Rng>(
    log: &GameLog,
    steps: &[Step],
    tied: &[TiedTeam],
    ladder: Ladder,
    rng: &mut R,
    depth: usize,
) -> (String, bool) {
    let mut remainder: Vec<String> = tied.iter().map(|t| t.team.clone()).collect();
    remainder.sort_unstable();

    for step in steps {
        let rows = (step.filter)(log, &remainder);
        if !rows.is_empty() {
            remainder = (step.resolve)(log, &rows);
        }
        if remainder.len() == 1 {
            return (remainder.remove(0), false);
        }
        if remainder.len() == 2 && tied.len() != 2 {
            log::trace!("{} narrowed tie to {:?}; restarting ladder", step.name, remainder);
            let subset: Vec<TiedTeam> = tied
                .iter()
                .filter(|t| remainder.contains(&t.team))
                .cloned()
                .collect();
            return match ladder {
                Ladder::Divisional => divisional_tie(log, &subset, rng, depth + 1),
                Ladder::WildCard => wildcard_tie(log, &subset, rng, depth + 1),
            };
        }
    }

    log::debug!("tie among {:?} survived every rule; breaking at random", remainder);
    let winner = remainder
        .choose(rng)
        .cloned()
        .expect("exhausted ladder still has candidates");
    (winner, true)
}

// Row filters. Each returns indices into the log's row table.

fn rows_where(log: &GameLog, predicate: impl Fn(&crate::standings::GameLogRow) -> bool) -> Vec<usize> {
    log.rows
        .iter()
        .enumerate()
        .filter(|(_, row)| predicate(row))
        .map(|(i, _)| i)
        .collect()
}

fn in_pool(pool: &[String], name: &str) -> bool {
    pool.iter().any(|t| t == name)
}

/// Every game involving a pool team.
fn all_games(log: &GameLog, pool: &[String]) -> Vec<usize> {
    rows_where(log, |r| in_pool(pool, &r.team))
}

/// Games played between pool teams.
fn head_to_head(log: &GameLog, pool: &[String]) -> Vec<usize> {
    rows_where(log, |r| in_pool(pool, &r.team) && in_pool(pool, &r.opponent))
}

/// Head-to-head games, but only when every pool team appears in one;
/// otherwise the sweep rule does not apply.
fn sweep_games(log: &GameLog, pool: &[String]) -> Vec<usize> {
    let rows = head_to_head(log, pool);
    let mut covered: HashSet<&str> = HashSet::new();
    for &i in &rows {
        covered.insert(log.rows[i].team.as_str());
        covered.insert(log.rows[i].opponent.as_str());
    }
    if covered.len() == pool.len() {
        rows
    } else {
        Vec::new()
    }
}

/// Pool teams' games inside their own division.
fn division_games(log: &GameLog, pool: &[String]) -> Vec<usize> {
    rows_where(log, |r| in_pool(pool, &r.team) && r.team_division == r.opp_division)
}

/// Pool teams' games inside their own conference.
fn conference_games(log: &GameLog, pool: &[String]) -> Vec<usize> {
    rows_where(log, |r| in_pool(pool, &r.team) && r.team_conference == r.opp_conference)
}

/// Games a pool team won (strength-of-victory input).
fn victories(log: &GameLog, pool: &[String]) -> Vec<usize> {
    rows_where(log, |r| in_pool(pool, &r.team) && r.is_win())
}

/// Games against opponents common to every pool team, applicable only when
/// at least `min_common` common opponents exist.
fn common_games(log: &GameLog, pool: &[String], min_common: usize) -> Vec<usize> {
    let mut common: Option<HashSet<&str>> = None;
    for team in pool {
        let opponents = log.opponents_of(team);
        common = Some(match common {
            None => opponents,
            Some(prior) => prior.intersection(&opponents).copied().collect(),
        });
    }
    let common = common.unwrap_or_default();
    if common.len() < min_common {
        return Vec::new();
    }
    rows_where(log, |r| in_pool(pool, &r.team) && common.contains(r.opponent.as_str()))
}

fn common_games_min1(log: &GameLog, pool: &[String]) -> Vec<usize> {
    common_games(log, pool, 1)
}

fn common_games_min4(log: &GameLog, pool: &[String]) -> Vec<usize> {
    common_games(log, pool, 4)
}

// Resolutions.

fn totals_by_team(log: &GameLog, rows: &[usize], value: impl Fn(&crate::standings::GameLogRow) -> Record) -> HashMap<String, Record> {
    let mut totals: HashMap<String, Record> = HashMap::new();
    for &i in rows {
        let row = &log.rows[i];
        totals.entry(row.team.clone()).or_default().add(value(row));
    }
    totals
}

fn best_by_pct(totals: HashMap<String, Record>) -> Vec<String> {
    let best = totals
        .values()
        .map(Record::win_pct)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut winners: Vec<String> = totals
        .into_iter()
        .filter(|(_, record)| record.win_pct() == best)
        .map(|(team, _)| team)
        .collect();
    winners.sort_unstable();
    winners
}

/// Teams tied for the best win percentage over the filtered rows.
fn best_win_pct(log: &GameLog, rows: &[usize]) -> Vec<String> {
    best_by_pct(totals_by_team(log, rows, |r| r.outcome()))
}

/// Teams tied for the best aggregate opponent win percentage.
fn best_opponent_pct(log: &GameLog, rows: &[usize]) -> Vec<String> {
    best_by_pct(totals_by_team(log, rows, |r| r.opp_record))
}

/// Sweep rule: a team that beat every other tied team wins outright; a team
/// beaten by every other is eliminated. Two-team groups reduce to plain
/// head-to-head percentage.
fn sweep_survivors(log: &GameLog, rows: &[usize]) -> Vec<String> {
    let totals = totals_by_team(log, rows, |r| r.outcome());
    if totals.len() == 2 {
        return best_by_pct(totals);
    }

    let others = totals.len() as u32 - 1;
    let mut undefeated: Vec<String> = totals
        .iter()
        .filter(|(_, r)| r.wins == others)
        .map(|(t, _)| t.clone())
        .collect();
    if !undefeated.is_empty() {
        undefeated.sort_unstable();
        return undefeated;
    }

    // Teams swept by the group drop out; with no sweep either way the
    // whole group survives to the next step.
    let mut survivors: Vec<String> = totals
        .iter()
        .filter(|(_, r)| r.losses != others)
        .map(|(t, _)| t.clone())
        .collect();
    survivors.sort_unstable();
    survivors
}
