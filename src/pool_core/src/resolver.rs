//! Progression resolver: derives every round's matchups from recorded winners.
//!
//! Advancement is computed purely from winner entries. The cached
//! `Team::eliminated` flag is never consulted; it is only compared against
//! the derived state so drift can be reported.
//!
//! Resolution never fails. Missing winners leave later slots open (`None`),
//! and winners that cannot be reconciled with the bracket are reported as
//! [`Anomaly`] values while the rest of the bracket resolves normally. An
//! anomalous winner does not advance, but it still counts for scoring, which
//! goes by name (see [`crate::scoring`]).

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

use crate::constants::{CONFERENCE_CHAMPIONSHIP, DIV_1V_LOWEST, DIV_MIDDLE, SUPER_BOWL};
use crate::results::Results;
use crate::team::{Conference, Teams};
use crate::topology::{bye_team, wild_card_matchups, Matchup, Round, TeamRef};

/// Category of inconsistency found while resolving the bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnomalyKind {
    /// Winner is not on the roster the game belongs to
    UnknownTeam,
    /// Winner is on the roster but is neither participant of the game
    NotAParticipant,
    /// Winner recorded before both participants of the game were known
    UndeterminedMatchup,
    /// Result keyed by a matchup id the bracket never schedules
    UnknownMatchup,
    /// Team flagged eliminated although the recorded results keep it alive
    StaleEliminationFlag,
}

/// An inconsistency to surface to an operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub round: Option<Round>,
    pub conference: Option<Conference>,
    pub matchup_id: Option<String>,
    pub team: String,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match (self.round, self.conference, &self.matchup_id) {
            (Some(round), Some(conf), Some(id)) => format!("{} {} {}", conf, round, id),
            (Some(round), None, Some(id)) => format!("{} {}", round, id),
            _ => String::from("roster"),
        };
        match self.kind {
            AnomalyKind::UnknownTeam => {
                write!(f, "{}: winner {:?} is not on the roster", location, self.team)
            }
            AnomalyKind::NotAParticipant => {
                write!(f, "{}: winner {:?} did not play in this game", location, self.team)
            }
            AnomalyKind::UndeterminedMatchup => write!(
                f,
                "{}: winner {:?} recorded before the matchup was set",
                location, self.team
            ),
            AnomalyKind::UnknownMatchup => {
                write!(f, "{}: result naming {:?} has no scheduled game", location, self.team)
            }
            AnomalyKind::StaleEliminationFlag => write!(
                f,
                "{}: eliminated flag for {:?} disagrees with results",
                location, self.team
            ),
        }
    }
}

/// A matchup together with its accepted winner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Game {
    #[serde(flatten)]
    pub matchup: Matchup,
    pub winner: Option<TeamRef>,
}

impl Game {
    fn open(matchup: Matchup) -> Self {
        Game {
            matchup,
            winner: None,
        }
    }

    /// Participant that lost, once a winner is accepted.
    pub fn loser(&self) -> Option<&TeamRef> {
        let winner = self.winner.as_ref()?;
        self.matchup.opponent_of(&winner.name)
    }
}

/// Resolved bracket for one conference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceBracket {
    pub conference: Conference,
    pub bye: Option<TeamRef>,
    pub wild_card: Vec<Game>,
    pub divisional: Vec<Game>,
    pub championship: Game,
}

impl ConferenceBracket {
    pub fn games(&self, round: Round) -> Vec<&Game> {
        match round {
            Round::WildCard => self.wild_card.iter().collect(),
            Round::Divisional => self.divisional.iter().collect(),
            Round::ConferenceChampionship => vec![&self.championship],
            Round::Championship => Vec::new(),
        }
    }

    /// Conference champion, once decided
    pub fn champion(&self) -> Option<&TeamRef> {
        self.championship.winner.as_ref()
    }
}

/// Every round's matchups for both conferences plus the final.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub afc: ConferenceBracket,
    pub nfc: ConferenceBracket,
    pub super_bowl: Game,
    pub anomalies: Vec<Anomaly>,
}

impl Bracket {
    pub fn conference(&self, conference: Conference) -> &ConferenceBracket {
        match conference {
            Conference::Afc => &self.afc,
            Conference::Nfc => &self.nfc,
        }
    }

    /// Games of a round, AFC before NFC.
    pub fn games(&self, round: Round) -> Vec<&Game> {
        match round {
            Round::Championship => vec![&self.super_bowl],
            _ => Conference::ALL
                .iter()
                .flat_map(|&conf| self.conference(conf).games(round))
                .collect(),
        }
    }

    /// Matchups of a round; `conference` is ignored for the final.
    pub fn matchups(&self, round: Round, conference: Conference) -> Vec<&Matchup> {
        match round {
            Round::Championship => vec![&self.super_bowl.matchup],
            _ => self
                .conference(conference)
                .games(round)
                .into_iter()
                .map(|g| &g.matchup)
                .collect(),
        }
    }

    /// Accepted winners of a round, in game order.
    pub fn stage_winners(&self, round: Round) -> Vec<&TeamRef> {
        self.games(round)
            .into_iter()
            .filter_map(|g| g.winner.as_ref())
            .collect()
    }

    /// A round is complete once every one of its games has an accepted winner.
    pub fn is_round_complete(&self, round: Round) -> bool {
        self.games(round).iter().all(|g| g.winner.is_some())
    }

    pub fn champion(&self) -> Option<&TeamRef> {
        self.super_bowl.winner.as_ref()
    }

    /// Teams knocked out according to the recorded results.
    pub fn eliminated(&self) -> BTreeSet<String> {
        Round::ALL
            .iter()
            .flat_map(|&round| self.games(round))
            .filter_map(|g| g.loser())
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn is_eliminated(&self, name: &str) -> bool {
        self.eliminated().contains(name)
    }

    /// Games whose participants are both known but that have no winner yet.
    pub fn pending_games(&self) -> Vec<(Round, &Game)> {
        Round::ALL
            .iter()
            .flat_map(|&round| self.games(round).into_iter().map(move |g| (round, g)))
            .filter(|(_, g)| g.matchup.is_resolved() && g.winner.is_none())
            .collect()
    }
}

/// Resolve the whole bracket from a snapshot of rosters and results.
pub fn resolve_bracket(teams: &Teams, results: &Results) -> Bracket {
    resolve(teams, results, true)
}

/// Shared resolution; `report` controls anomaly logging so projections can
/// resolve hypothetical brackets without repeating warnings.
pub(crate) fn resolve(teams: &Teams, results: &Results, report: bool) -> Bracket {
    let mut anomalies = Vec::new();

    let afc = resolve_conference(Conference::Afc, teams, results, &mut anomalies);
    let nfc = resolve_conference(Conference::Nfc, teams, results, &mut anomalies);

    let super_bowl = settle(
        Round::Championship,
        None,
        match (afc.champion(), nfc.champion()) {
            (Some(a), Some(n)) => Matchup::new(SUPER_BOWL, Some(a.clone()), Some(n.clone())),
            _ => Matchup::tbd(SUPER_BOWL),
        },
        results.champion(),
        |name| teams.find(name).is_some(),
        &mut anomalies,
    );

    let mut bracket = Bracket {
        afc,
        nfc,
        super_bowl,
        anomalies: Vec::new(),
    };

    // Hosts may leave the flag unset; only a flag contradicting live results is drift
    let eliminated = bracket.eliminated();
    for (conference, team) in teams.iter() {
        if team.eliminated && !eliminated.contains(&team.name) {
            anomalies.push(Anomaly {
                kind: AnomalyKind::StaleEliminationFlag,
                round: None,
                conference: Some(conference),
                matchup_id: None,
                team: team.name.clone(),
            });
        }
    }

    if report {
        for anomaly in &anomalies {
            warn!(kind = ?anomaly.kind, "{}", anomaly);
        }
        debug!(
            anomalies = anomalies.len(),
            eliminated = eliminated.len(),
            champion = ?bracket.champion().map(|t| t.name.as_str()),
            "resolved bracket"
        );
    }

    bracket.anomalies = anomalies;
    bracket
}

/// Divisional matchups for one conference after Wild Card reseeding.
pub fn divisional_matchups(conference: Conference, teams: &Teams, results: &Results) -> Vec<Matchup> {
    let mut anomalies = Vec::new();
    resolve_conference(conference, teams, results, &mut anomalies)
        .divisional
        .into_iter()
        .map(|g| g.matchup)
        .collect()
}

/// Conference Championship matchup for one conference.
pub fn conference_matchup(conference: Conference, teams: &Teams, results: &Results) -> Matchup {
    let mut anomalies = Vec::new();
    resolve_conference(conference, teams, results, &mut anomalies)
        .championship
        .matchup
}

/// The final: AFC champion in `team1`, NFC champion in `team2`.
pub fn championship_matchup(teams: &Teams, results: &Results) -> Matchup {
    resolve_bracket(teams, results).super_bowl.matchup
}

fn resolve_conference(
    conference: Conference,
    teams: &Teams,
    results: &Results,
    anomalies: &mut Vec<Anomaly>,
) -> ConferenceBracket {
    let roster = teams.conference(conference);
    let on_roster = |name: &str| teams.by_name(conference, name).is_some();
    let bye = bye_team(conference, roster);

    let mut wc_matchups = wild_card_matchups(conference, roster);
    if wc_matchups.is_empty() {
        wc_matchups = Round::WildCard.matchup_ids().iter().map(|id| Matchup::tbd(id)).collect();
    }

    let wild_card: Vec<Game> = wc_matchups
        .into_iter()
        .map(|m| {
            let recorded = results.winner(Round::WildCard, conference, &m.id);
            settle(Round::WildCard, Some(conference), m, recorded, on_roster, anomalies)
        })
        .collect();

    // Reseed: bye team meets the lowest surviving seed, the other two meet each other
    let mut survivors: Vec<&TeamRef> = wild_card.iter().filter_map(|g| g.winner.as_ref()).collect();
    let div_matchups = if survivors.len() == wild_card.len() {
        survivors.sort_by(|a, b| a.seed.cmp(&b.seed).then_with(|| a.name.cmp(&b.name)));
        vec![
            Matchup::new(DIV_1V_LOWEST, bye.clone(), Some(survivors[2].clone())),
            Matchup::new(DIV_MIDDLE, Some(survivors[0].clone()), Some(survivors[1].clone())),
        ]
    } else {
        vec![Matchup::tbd(DIV_1V_LOWEST), Matchup::tbd(DIV_MIDDLE)]
    };

    let divisional: Vec<Game> = div_matchups
        .into_iter()
        .map(|m| {
            let recorded = results.winner(Round::Divisional, conference, &m.id);
            settle(Round::Divisional, Some(conference), m, recorded, on_roster, anomalies)
        })
        .collect();

    // Better seed hosts; both Divisional winners are needed before the game is set
    let mut finalists: Vec<TeamRef> = divisional.iter().filter_map(|g| g.winner.clone()).collect();
    let conference_game = if finalists.len() == divisional.len() {
        finalists.sort_by(|a, b| a.seed.cmp(&b.seed).then_with(|| a.name.cmp(&b.name)));
        let mut finalists = finalists.into_iter();
        Matchup::new(CONFERENCE_CHAMPIONSHIP, finalists.next(), finalists.next())
    } else {
        Matchup::tbd(CONFERENCE_CHAMPIONSHIP)
    };
    let championship = settle(
        Round::ConferenceChampionship,
        Some(conference),
        conference_game,
        results.winner(Round::ConferenceChampionship, conference, CONFERENCE_CHAMPIONSHIP),
        on_roster,
        anomalies,
    );

    for round in [Round::WildCard, Round::Divisional, Round::ConferenceChampionship] {
        report_unscheduled(round, conference, results, anomalies);
    }

    ConferenceBracket {
        conference,
        bye,
        wild_card,
        divisional,
        championship,
    }
}

/// Accept a recorded winner only if it is one of the game's two participants.
fn settle(
    round: Round,
    conference: Option<Conference>,
    matchup: Matchup,
    recorded: Option<&str>,
    on_roster: impl Fn(&str) -> bool,
    anomalies: &mut Vec<Anomaly>,
) -> Game {
    let Some(name) = recorded else {
        return Game::open(matchup);
    };

    let kind = if !on_roster(name) {
        AnomalyKind::UnknownTeam
    } else if !matchup.is_resolved() {
        AnomalyKind::UndeterminedMatchup
    } else if !matchup.involves(name) {
        AnomalyKind::NotAParticipant
    } else {
        let winner = matchup.participants().find(|t| t.name == name).cloned();
        return Game { matchup, winner };
    };

    anomalies.push(Anomaly {
        kind,
        round: Some(round),
        conference,
        matchup_id: Some(matchup.id.clone()),
        team: name.to_string(),
    });
    Game::open(matchup)
}

fn report_unscheduled(
    round: Round,
    conference: Conference,
    results: &Results,
    anomalies: &mut Vec<Anomaly>,
) {
    let scheduled = round.matchup_ids();
    let games = match round {
        Round::WildCard => results.wild_card.get(conference),
        Round::Divisional => results.divisional.get(conference),
        _ => results.conference.get(conference),
    };
    for (id, game) in games {
        if scheduled.iter().any(|s| *s == id.as_str()) {
            continue;
        }
        if let Some(name) = game.decided_winner() {
            anomalies.push(Anomaly {
                kind: AnomalyKind::UnknownMatchup,
                round: Some(round),
                conference: Some(conference),
                matchup_id: Some(id.clone()),
                team: name.to_string(),
            });
        }
    }
}
