use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::entry::Entry;
use crate::resolver::{resolve_bracket, Anomaly};
use crate::results::Results;
use crate::scoring::{all_winners, potential_with, score_winners};
use crate::team::Teams;

/// One leaderboard line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub name: String,
    pub score: u32,
    pub potential: u32,
    /// `score + potential`
    pub max_possible: u32,
    pub rank: usize,
}

/// Ranked rows plus the data problems found while resolving the bracket
/// they were scored against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub rows: Vec<LeaderboardRow>,
    pub anomalies: Vec<Anomaly>,
}

impl Leaderboard {
    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// Order rows and assign competition ranks.
///
/// Rows sort by score, then potential (both descending), then name. Rank is
/// a function of score alone: a row tied on score with the row above shares
/// its rank, otherwise its rank is its 1-based position. Scores [50, 50, 40]
/// rank [1, 1, 3].
pub fn rank_rows(mut rows: Vec<LeaderboardRow>) -> Vec<LeaderboardRow> {
    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.potential.cmp(&a.potential))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut previous: Option<(u32, usize)> = None;
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = match previous {
            Some((score, rank)) if score == row.score => rank,
            _ => index + 1,
        };
        previous = Some((row.score, row.rank));
    }
    rows
}

/// Score every entry against one snapshot and rank the results.
pub fn build_leaderboard(
    entries: &BTreeMap<String, Entry>,
    teams: &Teams,
    results: &Results,
    parallel: bool,
) -> Leaderboard {
    let winners = all_winners(results);
    let bracket = resolve_bracket(teams, results);
    let eliminated = bracket.eliminated();

    let row = |(name, entry): (&String, &Entry)| {
        let score = score_winners(&entry.rankings, &winners);
        let potential = potential_with(&entry.rankings, teams, &eliminated);
        LeaderboardRow {
            name: name.clone(),
            score,
            potential,
            max_possible: score.saturating_add(potential),
            rank: 0,
        }
    };

    let rows: Vec<LeaderboardRow> = if parallel {
        entries.par_iter().map(row).collect()
    } else {
        entries.iter().map(row).collect()
    };

    debug!(
        entries = rows.len(),
        winners = winners.len(),
        anomalies = bracket.anomalies.len(),
        "built leaderboard"
    );
    Leaderboard {
        rows: rank_rows(rows),
        anomalies: bracket.anomalies,
    }
}
