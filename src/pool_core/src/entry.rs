use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::RankingsError;
use crate::resolver::resolve_bracket;
use crate::results::Results;
use crate::scoring::all_winners;
use crate::team::{Conference, Teams};

/// Points an entry assigned to each team, by team name.
pub type Rankings = BTreeMap<String, u32>;

/// A participant's submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_rankings")]
    pub rankings: Rankings,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    /// Score last written back by the host
    #[serde(default)]
    pub score: u32,
}

impl Entry {
    pub fn new(rankings: Rankings) -> Self {
        Entry {
            rankings,
            ..Default::default()
        }
    }
}

/// Keep only positive integer point values.
///
/// Imported and half-edited entries can hold blanks or strings; those picks
/// are dropped so the entry still scores.
fn lenient_rankings<'de, D>(deserializer: D) -> Result<Rankings, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(team, value)| {
            let points = value.as_u64().and_then(|p| u32::try_from(p).ok())?;
            (points > 0).then_some((team, points))
        })
        .collect())
}

/// Check a submission: every bracket team gets a distinct value in 1..=N,
/// N being the number of teams.
pub fn validate_rankings(rankings: &Rankings, teams: &Teams) -> Result<(), RankingsError> {
    let max = teams.len() as u32;

    if let Some(unknown) = rankings.keys().find(|name| teams.find(name).is_none()) {
        return Err(RankingsError::UnknownTeam(unknown.clone()));
    }

    for (_, team) in teams.iter() {
        let Some(&points) = rankings.get(&team.name) else {
            return Err(RankingsError::MissingTeam(team.name.clone()));
        };
        if points == 0 || points > max {
            return Err(RankingsError::OutOfRange {
                team: team.name.clone(),
                points,
                max,
            });
        }
    }

    let mut seen = BTreeSet::new();
    for (_, team) in teams.iter() {
        let points = rankings[&team.name];
        if !seen.insert(points) {
            return Err(RankingsError::DuplicatePoints(points));
        }
    }

    Ok(())
}

/// One pick in an entry's breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    pub team: String,
    pub points: u32,
    /// `None` when the team is not on either roster
    pub conference: Option<Conference>,
    pub seed: Option<u8>,
    /// Games won so far
    pub wins: usize,
    /// Points earned from this team so far
    pub earned: u32,
    pub eliminated: bool,
}

/// An entry's picks, highest points first.
pub fn pick_breakdown(rankings: &Rankings, teams: &Teams, results: &Results) -> Vec<Pick> {
    let eliminated = resolve_bracket(teams, results).eliminated();
    let winners = all_winners(results);

    let mut picks: Vec<Pick> = rankings
        .iter()
        .map(|(name, &points)| {
            let found = teams.find(name);
            let wins = winners.iter().filter(|w| *w == name).count();
            Pick {
                team: name.clone(),
                points,
                conference: found.map(|(conf, _)| conf),
                seed: found.map(|(_, team)| team.seed),
                wins,
                earned: points.saturating_mul(wins as u32),
                eliminated: eliminated.contains(name),
            }
        })
        .collect();

    picks.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.team.cmp(&b.team)));
    picks
}
