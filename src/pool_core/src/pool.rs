//! A read-only snapshot of one pool and the derived views hosts publish.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::entry::{pick_breakdown, validate_rankings, Entry, Pick};
use crate::error::{RankingsError, Result};
use crate::projection::{project_pool, Projection};
use crate::ranking::{build_leaderboard, Leaderboard};
use crate::resolver::{resolve_bracket, Anomaly, Bracket};
use crate::results::Results;
use crate::scoring::{all_winners, score_winners};
use crate::team::Teams;

/// Rosters, results and entries as the host last saw them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pool {
    pub teams: Teams,
    pub results: Results,
    pub entries: BTreeMap<String, Entry>,
}

/// A stored score that no longer matches the results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub name: String,
    pub stored: u32,
    pub computed: u32,
}

impl Pool {
    pub fn new(teams: Teams, results: Results, entries: BTreeMap<String, Entry>) -> Self {
        Pool {
            teams,
            results,
            entries,
        }
    }

    /// Decode a `{teams, results, entries}` snapshot.
    pub fn from_json(contents: &str) -> Result<Self> {
        let pool: Pool = serde_json::from_str(contents)?;
        debug!(
            teams = pool.teams.len(),
            entries = pool.entries.len(),
            "loaded pool snapshot"
        );
        Ok(pool)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn bracket(&self) -> Bracket {
        resolve_bracket(&self.teams, &self.results)
    }

    pub fn anomalies(&self) -> Vec<Anomaly> {
        self.bracket().anomalies
    }

    pub fn leaderboard(&self, config: &EngineConfig) -> Leaderboard {
        config.install(|| build_leaderboard(&self.entries, &self.teams, &self.results, config.parallel))
    }

    pub fn projections(&self, config: &EngineConfig) -> Vec<Projection> {
        config.install(|| project_pool(&self.entries, &self.teams, &self.results, config.parallel))
    }

    /// Current score of one participant.
    pub fn score(&self, name: &str) -> Option<u32> {
        let entry = self.entries.get(name)?;
        Some(score_winners(&entry.rankings, &all_winners(&self.results)))
    }

    /// Entries whose stored score differs from the recomputed one.
    ///
    /// Hosts write these back; applying the list twice is harmless.
    pub fn score_updates(&self) -> Vec<ScoreUpdate> {
        let winners = all_winners(&self.results);
        let updates: Vec<ScoreUpdate> = self
            .entries
            .iter()
            .filter_map(|(name, entry)| {
                let computed = score_winners(&entry.rankings, &winners);
                (computed != entry.score).then(|| ScoreUpdate {
                    name: name.clone(),
                    stored: entry.score,
                    computed,
                })
            })
            .collect();
        if !updates.is_empty() {
            info!(stale = updates.len(), "stored scores out of date");
        }
        updates
    }

    /// Picks of one participant, highest points first.
    pub fn picks(&self, name: &str) -> Option<Vec<Pick>> {
        let entry = self.entries.get(name)?;
        Some(pick_breakdown(&entry.rankings, &self.teams, &self.results))
    }

    /// Run submission checks against an entry already in the pool.
    pub fn validate_entry(&self, name: &str) -> Option<std::result::Result<(), RankingsError>> {
        let entry = self.entries.get(name)?;
        Some(validate_rankings(&entry.rankings, &self.teams))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::AnomalyKind;

    const SNAPSHOT: &str = r#"{
        "teams": {
            "afc": [
                { "seed": 1, "name": "Denver Broncos", "record": "14-3", "eliminated": false },
                { "seed": 2, "name": "New England Patriots", "record": "14-3", "eliminated": false },
                { "seed": 3, "name": "Jacksonville Jaguars", "record": "13-4", "eliminated": false },
                { "seed": 4, "name": "Pittsburgh Steelers", "record": "10-7", "eliminated": false },
                { "seed": 5, "name": "Houston Texans", "record": "12-5", "eliminated": false },
                { "seed": 6, "name": "Buffalo Bills", "record": "12-5", "eliminated": false },
                { "seed": 7, "name": "Los Angeles Chargers", "record": "11-6", "eliminated": true }
            ],
            "nfc": [
                { "seed": 1, "name": "Seattle Seahawks", "record": "14-3", "eliminated": false },
                { "seed": 2, "name": "Chicago Bears", "record": "11-6", "eliminated": false },
                { "seed": 3, "name": "Philadelphia Eagles", "record": "11-6", "eliminated": false },
                { "seed": 4, "name": "Carolina Panthers", "record": "8-9", "eliminated": false },
                { "seed": 5, "name": "Los Angeles Rams", "record": "12-5", "eliminated": false },
                { "seed": 6, "name": "San Francisco 49ers", "record": "12-5", "eliminated": false },
                { "seed": 7, "name": "Green Bay Packers", "record": "9-7-1", "eliminated": false }
            ]
        },
        "results": {
            "wildCard": {
                "afc": { "wc_2v7": { "winner": "New England Patriots", "completedAt": "2026-01-10T21:30:00.000Z" } },
                "nfc": { "wc_3v6": { "winner": "Green Bay Packers", "completedAt": null } }
            }
        },
        "entries": {
            "jordan": {
                "rankings": {
                    "New England Patriots": 14, "Denver Broncos": 13, "Seattle Seahawks": 12,
                    "Chicago Bears": 11, "Philadelphia Eagles": 10, "Jacksonville Jaguars": 9,
                    "Los Angeles Rams": 8, "Buffalo Bills": 7, "Houston Texans": 6,
                    "Pittsburgh Steelers": 5, "San Francisco 49ers": 4, "Carolina Panthers": 3,
                    "Green Bay Packers": 2, "Los Angeles Chargers": 1
                },
                "submittedAt": "2026-01-09T12:00:00.000Z",
                "fingerprint": "a1b2c3d4e5",
                "score": 14
            },
            "sam": {
                "rankings": { "Los Angeles Chargers": 14, "Denver Broncos": 13 },
                "score": 0
            }
        }
    }"#;

    #[test]
    fn test_load_snapshot() {
        let pool = Pool::from_json(SNAPSHOT).unwrap();
        assert_eq!(pool.teams.len(), 14);
        assert_eq!(pool.entries.len(), 2);
        assert_eq!(pool.results.recorded_winners().len(), 2);
    }

    #[test]
    fn test_bad_snapshot() {
        assert!(Pool::from_json("{ \"teams\": 5 }").is_err());
    }

    #[test]
    fn test_snapshot_anomalies() {
        let pool = Pool::from_json(SNAPSHOT).unwrap();
        let anomalies = pool.anomalies();
        // Green Bay is the 7 seed; it cannot have won the 3 v 6 game
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::NotAParticipant);
        assert_eq!(anomalies[0].team, "Green Bay Packers");
        // The Chargers flag agrees with results, so it is not reported
        assert!(pool.bracket().is_eliminated("Los Angeles Chargers"));
    }

    #[test]
    fn test_snapshot_leaderboard() {
        let pool = Pool::from_json(SNAPSHOT).unwrap();
        let leaderboard = pool.leaderboard(&EngineConfig::default());
        assert_eq!(leaderboard.anomalies, pool.anomalies());
        let board = &leaderboard.rows;

        assert_eq!(board[0].name, "jordan");
        // Patriots 14 plus the anomalous Packers win, still scored by name
        assert_eq!(board[0].score, 16);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].name, "sam");
        assert_eq!(board[1].score, 0);
        assert_eq!(board[1].potential, 13);
        assert_eq!(board[1].rank, 2);

        assert_eq!(leaderboard, pool.leaderboard(&EngineConfig::sequential()));
    }

    #[test]
    fn test_oversized_points_do_not_break_leaderboard() {
        let json = r#"{
            "teams": { "afc": [
                { "seed": 1, "name": "T1" }, { "seed": 2, "name": "T2" }, { "seed": 3, "name": "T3" },
                { "seed": 4, "name": "T4" }, { "seed": 5, "name": "T5" }, { "seed": 6, "name": "T6" },
                { "seed": 7, "name": "T7" }
            ] },
            "results": {
                "wildCard": { "afc": {
                    "wc_2v7": { "winner": "T2" }, "wc_3v6": { "winner": "T3" }, "wc_4v5": { "winner": "T4" }
                } },
                "divisional": { "afc": { "div_middle": { "winner": "T2" } } }
            },
            "entries": { "importer": { "rankings": { "T2": 4000000000 } } }
        }"#;
        let pool = Pool::from_json(json).unwrap();
        let board = pool.leaderboard(&EngineConfig::sequential());
        assert_eq!(board.rows[0].score, u32::MAX);
        assert_eq!(board.rows[0].max_possible, u32::MAX);
        assert_eq!(pool.score_updates()[0].computed, u32::MAX);
    }

    #[test]
    fn test_score_updates() {
        let pool = Pool::from_json(SNAPSHOT).unwrap();
        let updates = pool.score_updates();
        assert_eq!(
            updates,
            vec![ScoreUpdate {
                name: "jordan".into(),
                stored: 14,
                computed: 16,
            }]
        );

        let mut written = pool.clone();
        for update in &updates {
            written.entries.get_mut(&update.name).unwrap().score = update.computed;
        }
        assert!(written.score_updates().is_empty());
        assert_eq!(written.score("jordan"), Some(16));
        assert_eq!(written.score("nobody"), None);
    }

    #[test]
    fn test_picks_and_validation() {
        let pool = Pool::from_json(SNAPSHOT).unwrap();

        let picks = pool.picks("jordan").unwrap();
        assert_eq!(picks[0].team, "New England Patriots");
        assert_eq!(picks[0].wins, 1);
        assert!(picks.last().unwrap().eliminated);

        assert_eq!(pool.validate_entry("jordan"), Some(Ok(())));
        assert!(matches!(
            pool.validate_entry("sam"),
            Some(Err(RankingsError::MissingTeam(_)))
        ));
        assert!(pool.validate_entry("nobody").is_none());
    }

    #[test]
    fn test_json_round_trip_preserves_scores() {
        let pool = Pool::from_json(SNAPSHOT).unwrap();
        let again = Pool::from_json(&pool.to_json().unwrap()).unwrap();
        assert_eq!(again, pool);
        assert_eq!(
            again.leaderboard(&EngineConfig::default()),
            pool.leaderboard(&EngineConfig::default())
        );
    }

    #[test]
    fn test_projections_from_snapshot() {
        let pool = Pool::from_json(SNAPSHOT).unwrap();
        let projections = pool.projections(&EngineConfig::default());
        assert_eq!(projections.len(), 2);
        let total: f64 = projections.iter().map(|p| p.win_chance).sum();
        assert!((total - 1.0).abs() < 1e-9);
        // sam's Chargers are out; Denver can win three games at most
        let sam = projections.iter().find(|p| p.name == "sam").unwrap();
        assert_eq!(sam.best_case, 39);
    }
}
