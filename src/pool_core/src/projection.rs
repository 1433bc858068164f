//! Projections over every way the undecided games can still finish.
//!
//! The bracket is small enough (13 games, at most 8192 completions) to
//! enumerate exhaustively, reseeding included, so the bounds here are exact.
//! Every completion decides the same set of remaining games, which makes the
//! completions equally likely when each game is a coin flip.
//!
//! A game whose recorded winner is anomalous is replayed here, but the
//! recorded win stays banked, as it does on the leaderboard.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::entry::{Entry, Rankings};
use crate::resolver::resolve;
use crate::results::Results;
use crate::scoring::{all_winners, score_winners};
use crate::team::{Conference, Teams};
use crate::topology::Round;

/// Winner lists for every way the bracket can be completed from `results`.
///
/// Each list is every recorded winner ([`all_winners`]) followed by the
/// winners chosen for the undecided games, so a completion never scores
/// below the realized score. Returns a single completion, the current
/// winners, when nothing is left to decide. Games that can never be
/// scheduled (incomplete rosters) stay undecided in every completion.
pub fn completions(teams: &Teams, results: &Results) -> Vec<Vec<String>> {
    let banked = all_winners(results);
    let mut out = Vec::new();
    walk(teams, results.clone(), &banked, &mut Vec::new(), &mut out);
    debug!(completions = out.len(), "enumerated bracket completions");
    out
}

fn walk(
    teams: &Teams,
    results: Results,
    banked: &[String],
    decided: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    let bracket = resolve(teams, &results, false);

    let next = bracket.pending_games().into_iter().next().map(|(round, game)| {
        let conference = game
            .matchup
            .team1
            .as_ref()
            .map_or(Conference::Afc, |t| t.conference);
        let sides: Vec<String> = game.matchup.participants().map(|t| t.name.clone()).collect();
        (round, conference, game.matchup.id.clone(), sides)
    });

    let Some((round, conference, id, sides)) = next else {
        out.push(banked.iter().chain(decided.iter()).cloned().collect());
        return;
    };

    for side in sides {
        let mut branch = results.clone();
        branch.record_winner(round, conference, &id, side.clone(), None);
        decided.push(side);
        walk(teams, branch, banked, decided, out);
        decided.pop();
    }
}

/// Highest final score an entry can still reach.
pub fn max_achievable(rankings: &Rankings, teams: &Teams, results: &Results) -> u32 {
    completions(teams, results)
        .iter()
        .map(|winners| score_winners(rankings, winners))
        .max()
        .unwrap_or(0)
}

/// Where an entry can still finish.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub name: String,
    /// Lowest final score over all completions
    pub worst_case: u32,
    /// Highest final score over all completions
    pub best_case: u32,
    /// Mean final score with every remaining game a coin flip
    pub expected_score: f64,
    /// Share of completions in which the entry finishes first; ties for
    /// first split the completion evenly
    pub win_chance: f64,
}

/// Project every entry over all completions of the bracket.
///
/// Returned in descending order of win chance, then best case, then name.
pub fn project_pool(
    entries: &BTreeMap<String, Entry>,
    teams: &Teams,
    results: &Results,
    parallel: bool,
) -> Vec<Projection> {
    let outcomes = completions(teams, results);
    let names: Vec<&String> = entries.keys().collect();

    let score_all = |entry: &Entry| -> Vec<u32> {
        outcomes
            .iter()
            .map(|winners| score_winners(&entry.rankings, winners))
            .collect()
    };

    // scores[e][o]: final score of entry e in outcome o
    let scores: Vec<Vec<u32>> = if parallel {
        entries.par_iter().map(|(_, entry)| score_all(entry)).collect()
    } else {
        entries.values().map(score_all).collect()
    };

    let mut wins = vec![0.0_f64; names.len()];
    for outcome in 0..outcomes.len() {
        let Some(top) = scores.iter().map(|s| s[outcome]).max() else {
            break;
        };
        let leaders: Vec<usize> = (0..names.len()).filter(|&e| scores[e][outcome] == top).collect();
        let share = 1.0 / leaders.len() as f64;
        for e in leaders {
            wins[e] += share;
        }
    }

    let total = outcomes.len().max(1) as f64;
    let mut projections: Vec<Projection> = names
        .iter()
        .zip(scores.iter().zip(wins))
        .map(|(name, (entry_scores, won))| Projection {
            name: (*name).clone(),
            worst_case: entry_scores.iter().copied().min().unwrap_or(0),
            best_case: entry_scores.iter().copied().max().unwrap_or(0),
            expected_score: entry_scores.iter().map(|&s| s as f64).sum::<f64>() / total,
            win_chance: won / total,
        })
        .collect();

    projections.sort_by(|a, b| {
        b.win_chance
            .total_cmp(&a.win_chance)
            .then_with(|| b.best_case.cmp(&a.best_case))
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!(
        entries = projections.len(),
        outcomes = outcomes.len(),
        "projected pool"
    );
    projections
}

/// Best case for every entry, keyed by participant name.
pub fn best_case_scores(
    entries: &BTreeMap<String, Entry>,
    teams: &Teams,
    results: &Results,
    parallel: bool,
) -> BTreeMap<String, u32> {
    project_pool(entries, teams, results, parallel)
        .into_iter()
        .map(|p| (p.name, p.best_case))
        .collect()
}

/// Games still to be played before the bracket is complete.
pub fn remaining_games(teams: &Teams, results: &Results) -> usize {
    let bracket = resolve(teams, results, false);
    Round::ALL
        .iter()
        .flat_map(|&round| bracket.games(round))
        .filter(|g| g.winner.is_none())
        .count()
}
