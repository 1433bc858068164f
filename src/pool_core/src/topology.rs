//! Static bracket structure: the round order and the Wild Card seeding rule.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    BYE_SEED, CONFERENCE_CHAMPIONSHIP, DIV_1V_LOWEST, DIV_MIDDLE, SUPER_BOWL,
    TEAMS_PER_CONFERENCE, WC_2V7, WC_3V6, WC_4V5, WILD_CARD_PAIRINGS,
};
use crate::team::{Conference, Team};

/// Playoff stages in the order they are played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Round {
    WildCard,
    Divisional,
    #[serde(rename = "conference")]
    ConferenceChampionship,
    #[serde(rename = "superBowl")]
    Championship,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::WildCard,
        Round::Divisional,
        Round::ConferenceChampionship,
        Round::Championship,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Round::WildCard => "Wild Card",
            Round::Divisional => "Divisional",
            Round::ConferenceChampionship => "Conference Championship",
            Round::Championship => "Championship",
        }
    }

    /// Key used in the results document
    pub fn key(&self) -> &'static str {
        match self {
            Round::WildCard => "wildCard",
            Round::Divisional => "divisional",
            Round::ConferenceChampionship => "conference",
            Round::Championship => "superBowl",
        }
    }

    pub fn from_key(key: &str) -> Option<Round> {
        Round::ALL.into_iter().find(|r| r.key() == key)
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            Round::WildCard => None,
            Round::Divisional => Some(Round::WildCard),
            Round::ConferenceChampionship => Some(Round::Divisional),
            Round::Championship => Some(Round::ConferenceChampionship),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Round::WildCard => Some(Round::Divisional),
            Round::Divisional => Some(Round::ConferenceChampionship),
            Round::ConferenceChampionship => Some(Round::Championship),
            Round::Championship => None,
        }
    }

    /// Whether results for this round are keyed by conference.
    pub fn is_conference_round(&self) -> bool {
        !matches!(self, Round::Championship)
    }

    /// Stable matchup ids scheduled in this round, in display order.
    pub fn matchup_ids(&self) -> &'static [&'static str] {
        match self {
            Round::WildCard => &[WC_2V7, WC_3V6, WC_4V5],
            Round::Divisional => &[DIV_1V_LOWEST, DIV_MIDDLE],
            Round::ConferenceChampionship => &[CONFERENCE_CHAMPIONSHIP],
            Round::Championship => &[SUPER_BOWL],
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference to a bracket participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub name: String,
    pub seed: u8,
    pub conference: Conference,
}

impl TeamRef {
    pub fn new(conference: Conference, team: &Team) -> Self {
        TeamRef {
            name: team.name.clone(),
            seed: team.seed,
            conference,
        }
    }
}

/// A scheduled game. `None` slots are still to be determined.
///
/// In conference rounds `team1` is the host (better seed). In the final
/// `team1` is the AFC champion and `team2` the NFC champion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: String,
    pub team1: Option<TeamRef>,
    pub team2: Option<TeamRef>,
}

impl Matchup {
    pub fn new(id: &str, team1: Option<TeamRef>, team2: Option<TeamRef>) -> Self {
        Matchup {
            id: id.to_string(),
            team1,
            team2,
        }
    }

    /// A matchup with both slots open
    pub fn tbd(id: &str) -> Self {
        Matchup::new(id, None, None)
    }

    /// Both participants are known
    pub fn is_resolved(&self) -> bool {
        self.team1.is_some() && self.team2.is_some()
    }

    /// Whether `name` fills one of the two slots.
    pub fn involves(&self, name: &str) -> bool {
        self.participants().any(|t| t.name == name)
    }

    /// The known participant that is not `name`.
    pub fn opponent_of(&self, name: &str) -> Option<&TeamRef> {
        if !self.involves(name) {
            return None;
        }
        self.participants().find(|t| t.name != name)
    }

    pub fn participants(&self) -> impl Iterator<Item = &TeamRef> {
        self.team1.iter().chain(self.team2.iter())
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = |t: &Option<TeamRef>| t.as_ref().map_or("TBD".to_string(), |t| t.name.clone());
        write!(f, "{}: {} vs {}", self.id, slot(&self.team1), slot(&self.team2))
    }
}

/// The team that skips the Wild Card round.
pub fn bye_team(conference: Conference, teams: &[Team]) -> Option<TeamRef> {
    seed_lookup(teams, BYE_SEED).map(|t| TeamRef::new(conference, t))
}

/// Wild Card pairings for one conference: 2 v 7, 3 v 6, 4 v 5.
///
/// Returns an empty list when fewer than seven teams are supplied. A seed
/// missing from an otherwise full roster leaves its slot open.
pub fn wild_card_matchups(conference: Conference, teams: &[Team]) -> Vec<Matchup> {
    if teams.len() < TEAMS_PER_CONFERENCE {
        return Vec::new();
    }

    WILD_CARD_PAIRINGS
        .iter()
        .map(|&(id, home, away)| {
            Matchup::new(
                id,
                seed_lookup(teams, home).map(|t| TeamRef::new(conference, t)),
                seed_lookup(teams, away).map(|t| TeamRef::new(conference, t)),
            )
        })
        .collect()
}

fn seed_lookup(teams: &[Team], seed: u8) -> Option<&Team> {
    // Lowest name wins a duplicated seed so the pick never depends on input order
    teams
        .iter()
        .filter(|t| t.seed == seed)
        .min_by(|a, b| a.name.cmp(&b.name))
}
