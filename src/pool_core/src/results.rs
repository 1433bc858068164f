//! Recorded game outcomes, keyed round -> conference -> matchup id.
//!
//! Absence of an entry means the game is undecided. Results are only ever
//! read by the engine; hosts use [`Results::record_winner`] and
//! [`Results::clear_winner`] to apply admin edits, both of which are safe to
//! repeat.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{CONFERENCE_CHAMPIONSHIP, SUPER_BOWL};
use crate::team::Conference;
use crate::topology::Round;

/// Outcome of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

impl GameResult {
    pub fn won_by(winner: impl Into<String>) -> Self {
        GameResult {
            winner: Some(winner.into()),
            completed_at: None,
        }
    }

    /// Winner name, treating blank strings as undecided.
    pub fn decided_winner(&self) -> Option<&str> {
        self.winner.as_deref().map(str::trim).filter(|w| !w.is_empty())
    }
}

/// Games of one round in one conference, by matchup id.
pub type Games = BTreeMap<String, GameResult>;

/// A value held separately for each conference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerConference<T> {
    pub afc: T,
    pub nfc: T,
}

impl<T> PerConference<T> {
    pub fn get(&self, conference: Conference) -> &T {
        match conference {
            Conference::Afc => &self.afc,
            Conference::Nfc => &self.nfc,
        }
    }

    pub fn get_mut(&mut self, conference: Conference) -> &mut T {
        match conference {
            Conference::Afc => &mut self.afc,
            Conference::Nfc => &mut self.nfc,
        }
    }
}

/// A decided game, flattened out of the results tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedWinner {
    pub round: Round,
    pub conference: Option<Conference>,
    pub matchup_id: String,
    pub winner: String,
}

/// Every recorded result in the pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawResults")]
pub struct Results {
    pub wild_card: PerConference<Games>,
    pub divisional: PerConference<Games>,
    pub conference: PerConference<Games>,
    pub super_bowl: Option<GameResult>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    fn round_games(&self, round: Round, conference: Conference) -> Option<&Games> {
        match round {
            Round::WildCard => Some(self.wild_card.get(conference)),
            Round::Divisional => Some(self.divisional.get(conference)),
            Round::ConferenceChampionship => Some(self.conference.get(conference)),
            Round::Championship => None,
        }
    }

    fn round_games_mut(&mut self, round: Round, conference: Conference) -> Option<&mut Games> {
        match round {
            Round::WildCard => Some(self.wild_card.get_mut(conference)),
            Round::Divisional => Some(self.divisional.get_mut(conference)),
            Round::ConferenceChampionship => Some(self.conference.get_mut(conference)),
            Round::Championship => None,
        }
    }

    /// Look up a game. The conference is ignored for the Championship round.
    pub fn game(&self, round: Round, conference: Conference, matchup_id: &str) -> Option<&GameResult> {
        match round {
            Round::Championship => self.super_bowl.as_ref(),
            _ => self.round_games(round, conference)?.get(matchup_id),
        }
    }

    /// Decided winner of a game, if any.
    pub fn winner(&self, round: Round, conference: Conference, matchup_id: &str) -> Option<&str> {
        self.game(round, conference, matchup_id)?.decided_winner()
    }

    /// Winner of the final
    pub fn champion(&self) -> Option<&str> {
        self.super_bowl.as_ref()?.decided_winner()
    }

    /// Record (or overwrite) the winner of a game.
    pub fn record_winner(
        &mut self,
        round: Round,
        conference: Conference,
        matchup_id: &str,
        winner: impl Into<String>,
        completed_at: Option<String>,
    ) {
        let result = GameResult {
            winner: Some(winner.into()),
            completed_at,
        };
        match self.round_games_mut(round, conference) {
            Some(games) => {
                games.insert(matchup_id.to_string(), result);
            }
            None => self.super_bowl = Some(result),
        }
    }

    /// Remove a recorded result. Removing an absent result is a no-op.
    pub fn clear_winner(&mut self, round: Round, conference: Conference, matchup_id: &str) {
        match self.round_games_mut(round, conference) {
            Some(games) => {
                games.remove(matchup_id);
            }
            None => self.super_bowl = None,
        }
    }

    /// Decided games in round order. Within a round AFC precedes NFC and
    /// scheduled matchup ids precede unrecognised ones.
    pub fn recorded_winners(&self) -> Vec<RecordedWinner> {
        let mut winners = Vec::new();

        for round in Round::ALL {
            if !round.is_conference_round() {
                if let Some(winner) = self.champion() {
                    winners.push(RecordedWinner {
                        round,
                        conference: None,
                        matchup_id: SUPER_BOWL.to_string(),
                        winner: winner.to_string(),
                    });
                }
                continue;
            }

            for conference in Conference::ALL {
                let Some(games) = self.round_games(round, conference) else {
                    continue;
                };
                for (id, game) in scheduled_first(round, games) {
                    if let Some(winner) = game.decided_winner() {
                        winners.push(RecordedWinner {
                            round,
                            conference: Some(conference),
                            matchup_id: id.to_string(),
                            winner: winner.to_string(),
                        });
                    }
                }
            }
        }

        winners
    }

    pub fn is_empty(&self) -> bool {
        self.recorded_winners().is_empty()
    }
}

fn scheduled_first<'a>(round: Round, games: &'a Games) -> Vec<(&'a str, &'a GameResult)> {
    let scheduled = round.matchup_ids();
    let mut ordered: Vec<(&str, &GameResult)> = scheduled
        .iter()
        .filter_map(|id| games.get_key_value(*id))
        .map(|(id, game)| (id.as_str(), game))
        .collect();
    ordered.extend(
        games
            .iter()
            .filter(|(id, _)| !scheduled.iter().any(|s| *s == id.as_str()))
            .map(|(id, game)| (id.as_str(), game)),
    );
    ordered
}

// ---------------------------------------------------------------------------
// Wire shape accepted on input
// ---------------------------------------------------------------------------

/// Games as stored by the host; null entries are treated as undecided.
type RawGames = BTreeMap<String, Option<GameResult>>;

/// Conference round results come in two shapes: a bare result written
/// directly under the conference key, or keyed by the `championship` id.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawConferenceGames {
    Bare(BareResult),
    Keyed(RawGames),
}

impl Default for RawConferenceGames {
    fn default() -> Self {
        RawConferenceGames::Keyed(RawGames::new())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BareResult {
    #[serde(default)]
    winner: Option<String>,
    #[serde(default)]
    completed_at: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawResults {
    wild_card: Option<PerConference<Option<RawGames>>>,
    divisional: Option<PerConference<Option<RawGames>>>,
    conference: Option<PerConference<Option<RawConferenceGames>>>,
    super_bowl: Option<GameResult>,
}

fn drop_nulls(raw: Option<RawGames>) -> Games {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|(id, game)| game.map(|g| (id, g)))
        .collect()
}

fn normalize_round(raw: Option<PerConference<Option<RawGames>>>) -> PerConference<Games> {
    let raw = raw.unwrap_or_default();
    PerConference {
        afc: drop_nulls(raw.afc),
        nfc: drop_nulls(raw.nfc),
    }
}

fn normalize_conference(raw: Option<RawConferenceGames>) -> Games {
    match raw.unwrap_or_default() {
        RawConferenceGames::Keyed(games) => drop_nulls(Some(games)),
        RawConferenceGames::Bare(bare) => {
            let mut games = Games::new();
            if bare.winner.is_some() || bare.completed_at.is_some() {
                games.insert(
                    CONFERENCE_CHAMPIONSHIP.to_string(),
                    GameResult {
                        winner: bare.winner,
                        completed_at: bare.completed_at,
                    },
                );
            }
            games
        }
    }
}

impl From<RawResults> for Results {
    fn from(raw: RawResults) -> Self {
        let conference = raw.conference.unwrap_or_default();
        Results {
            wild_card: normalize_round(raw.wild_card),
            divisional: normalize_round(raw.divisional),
            conference: PerConference {
                afc: normalize_conference(conference.afc),
                nfc: normalize_conference(conference.nfc),
            },
            super_bowl: raw.super_bowl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyed_document() {
        let json = r#"{
            "wildCard": {
                "afc": { "wc_2v7": { "winner": "T2", "completedAt": "2026-01-10T21:00:00Z" } },
                "nfc": { "wc_4v5": { "winner": "N5" }, "wc_3v6": null }
            },
            "conference": { "nfc": { "championship": { "winner": "N1" } } },
            "superBowl": { "winner": "N1" }
        }"#;
        let results: Results = serde_json::from_str(json).unwrap();

        assert_eq!(results.winner(Round::WildCard, Conference::Afc, "wc_2v7"), Some("T2"));
        assert_eq!(results.winner(Round::WildCard, Conference::Nfc, "wc_4v5"), Some("N5"));
        assert!(results.game(Round::WildCard, Conference::Nfc, "wc_3v6").is_none());
        assert_eq!(
            results.winner(Round::ConferenceChampionship, Conference::Nfc, "championship"),
            Some("N1")
        );
        assert_eq!(results.champion(), Some("N1"));
    }

    #[test]
    fn test_parse_bare_conference_result() {
        let json = r#"{ "conference": { "afc": { "winner": "T1", "completedAt": null } } }"#;
        let results: Results = serde_json::from_str(json).unwrap();
        assert_eq!(
            results.winner(Round::ConferenceChampionship, Conference::Afc, "championship"),
            Some("T1")
        );
        assert!(results.conference.nfc.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let results: Results = serde_json::from_str("{}").unwrap();
        assert!(results.is_empty());
        assert_eq!(results, Results::default());
    }

    #[test]
    fn test_blank_winner_is_undecided() {
        let mut results = Results::new();
        results.record_winner(Round::WildCard, Conference::Afc, "wc_2v7", "  ", None);
        assert!(results.winner(Round::WildCard, Conference::Afc, "wc_2v7").is_none());
        assert!(results.recorded_winners().is_empty());
    }

    #[test]
    fn test_record_winner_is_idempotent() {
        let mut once = Results::new();
        once.record_winner(Round::Divisional, Conference::Nfc, "div_middle", "N2", None);

        let mut twice = once.clone();
        twice.record_winner(Round::Divisional, Conference::Nfc, "div_middle", "N2", None);
        assert_eq!(once, twice);

        twice.record_winner(Round::Divisional, Conference::Nfc, "div_middle", "N3", None);
        assert_eq!(twice.winner(Round::Divisional, Conference::Nfc, "div_middle"), Some("N3"));
        assert_eq!(twice.recorded_winners().len(), 1);
    }

    #[test]
    fn test_clear_winner() {
        let mut results = Results::new();
        results.record_winner(Round::Championship, Conference::Afc, SUPER_BOWL, "T1", None);
        assert_eq!(results.champion(), Some("T1"));
        results.clear_winner(Round::Championship, Conference::Nfc, SUPER_BOWL);
        assert!(results.champion().is_none());
        results.clear_winner(Round::Championship, Conference::Nfc, SUPER_BOWL);
        assert!(results.is_empty());
    }

    #[test]
    fn test_recorded_winners_round_order() {
        let mut results = Results::new();
        results.record_winner(Round::Championship, Conference::Afc, SUPER_BOWL, "T1", None);
        results.record_winner(Round::Divisional, Conference::Afc, "div_middle", "T2", None);
        results.record_winner(Round::WildCard, Conference::Nfc, "wc_4v5", "N4", None);
        results.record_winner(Round::WildCard, Conference::Afc, "wc_4v5", "T4", None);
        results.record_winner(Round::WildCard, Conference::Afc, "wc_2v7", "T2", None);

        let order: Vec<(Round, String)> = results
            .recorded_winners()
            .into_iter()
            .map(|w| (w.round, w.winner))
            .collect();
        assert_eq!(
            order,
            vec![
                (Round::WildCard, "T2".to_string()),
                (Round::WildCard, "T4".to_string()),
                (Round::WildCard, "N4".to_string()),
                (Round::Divisional, "T2".to_string()),
                (Round::Championship, "T1".to_string()),
            ]
        );
    }

    #[test]
    fn test_serializes_canonical_shape() {
        let mut results = Results::new();
        results.record_winner(Round::ConferenceChampionship, Conference::Afc, "championship", "T1", None);
        let value = serde_json::to_value(&results).unwrap();
        assert_eq!(value["conference"]["afc"]["championship"]["winner"], "T1");

        let back: Results = serde_json::from_value(value).unwrap();
        assert_eq!(back, results);
    }
}
