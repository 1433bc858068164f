//! Scoring engine.
//!
//! Scores are looked up by team name: every recorded winner earns the points
//! the entry assigned to that team, once per game won. Winners missing from
//! an entry's rankings contribute nothing.

use std::collections::BTreeSet;
use tracing::trace;

use crate::entry::Rankings;
use crate::resolver::resolve_bracket;
use crate::results::Results;
use crate::team::Teams;

/// Every recorded winner across all rounds, in round order.
///
/// A team appears once per game it has won.
pub fn all_winners(results: &Results) -> Vec<String> {
    results
        .recorded_winners()
        .into_iter()
        .map(|w| w.winner)
        .collect()
}

/// Realized score of an entry.
pub fn score(rankings: &Rankings, results: &Results) -> u32 {
    score_winners(rankings, &all_winners(results))
}

/// Sum of the points attached to each listed winner.
///
/// Saturates at `u32::MAX` so imported rankings with absurd values still score.
pub fn score_winners<S: AsRef<str>>(rankings: &Rankings, winners: &[S]) -> u32 {
    winners
        .iter()
        .map(|w| rankings.get(w.as_ref()).copied().unwrap_or(0))
        .fold(0, u32::saturating_add)
}

/// Points still attached to teams that are alive.
///
/// This is raw exposure: each live team counts once no matter how many more
/// games it could win, so it is a tie-break signal rather than an upper bound
/// on the final score. [`crate::projection::max_achievable`] gives the exact
/// bound. Elimination is derived from `results`, never from the cached flag.
pub fn potential(rankings: &Rankings, teams: &Teams, results: &Results) -> u32 {
    let eliminated = resolve_bracket(teams, results).eliminated();
    potential_with(rankings, teams, &eliminated)
}

/// [`potential`] against an already derived elimination set.
pub fn potential_with(rankings: &Rankings, teams: &Teams, eliminated: &BTreeSet<String>) -> u32 {
    let total: u32 = teams
        .iter()
        .filter(|(_, team)| !eliminated.contains(&team.name))
        .map(|(_, team)| rankings.get(&team.name).copied().unwrap_or(0))
        .fold(0, u32::saturating_add);
    trace!(total, eliminated = eliminated.len(), "potential");
    total
}

/// Score plus potential, the leaderboard's "max possible" column.
pub fn max_possible(rankings: &Rankings, teams: &Teams, results: &Results) -> u32 {
    score(rankings, results).saturating_add(potential(rankings, teams, results))
}
