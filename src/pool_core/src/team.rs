use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two symmetric brackets that meet in the final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conference {
    Afc,
    Nfc,
}

impl Conference {
    /// Both conferences in their canonical order
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];

    pub fn label(&self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }

    /// Key used in the results and teams documents
    pub fn key(&self) -> &'static str {
        match self {
            Conference::Afc => "afc",
            Conference::Nfc => "nfc",
        }
    }

    pub fn from_key(key: &str) -> Option<Conference> {
        Conference::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A seeded playoff team.
///
/// `eliminated` is a cached flag maintained by admins. Engine logic never
/// reads it; elimination is always derived from recorded results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub seed: u8,
    pub name: String,
    #[serde(default)]
    pub record: String,
    #[serde(default)]
    pub eliminated: bool,
}

impl Team {
    pub fn new(seed: u8, name: impl Into<String>) -> Self {
        Team {
            seed,
            name: name.into(),
            record: String::new(),
            eliminated: false,
        }
    }

    pub fn with_record(mut self, record: impl Into<String>) -> Self {
        self.record = record.into();
        self
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seed, self.name)
    }
}

/// Rosters for both conferences, in whatever order the host stored them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teams {
    #[serde(default)]
    pub afc: Vec<Team>,
    #[serde(default)]
    pub nfc: Vec<Team>,
}

impl Teams {
    pub fn new(afc: Vec<Team>, nfc: Vec<Team>) -> Self {
        Teams { afc, nfc }
    }

    pub fn conference(&self, conference: Conference) -> &[Team] {
        match conference {
            Conference::Afc => &self.afc,
            Conference::Nfc => &self.nfc,
        }
    }

    /// Roster of one conference sorted by seed, then name.
    ///
    /// Every pairing decision goes through this so that the order the host
    /// stored teams in never leaks into the bracket.
    pub fn seeded(&self, conference: Conference) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.conference(conference).iter().collect();
        teams.sort_by(|a, b| a.seed.cmp(&b.seed).then_with(|| a.name.cmp(&b.name)));
        teams
    }

    /// First team (in seed order) holding `seed` in `conference`.
    pub fn by_seed(&self, conference: Conference, seed: u8) -> Option<&Team> {
        self.seeded(conference).into_iter().find(|t| t.seed == seed)
    }

    /// Look a team up by name within one conference.
    pub fn by_name(&self, conference: Conference, name: &str) -> Option<&Team> {
        self.conference(conference).iter().find(|t| t.name == name)
    }

    /// Find a team by name in either conference.
    pub fn find(&self, name: &str) -> Option<(Conference, &Team)> {
        Conference::ALL
            .into_iter()
            .find_map(|conf| self.by_name(conf, name).map(|team| (conf, team)))
    }

    /// All teams, AFC first, each conference in seed order.
    pub fn iter(&self) -> impl Iterator<Item = (Conference, &Team)> + '_ {
        Conference::ALL
            .into_iter()
            .flat_map(move |conf| self.seeded(conf).into_iter().map(move |team| (conf, team)))
    }

    pub fn len(&self) -> usize {
        self.afc.len() + self.nfc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.afc.is_empty() && self.nfc.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_ignores_storage_order() {
        let teams = Teams::new(
            vec![Team::new(3, "C"), Team::new(1, "A"), Team::new(2, "B")],
            vec![],
        );
        let names: Vec<&str> = teams
            .seeded(Conference::Afc)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_find_across_conferences() {
        let teams = Teams::new(vec![Team::new(1, "A")], vec![Team::new(1, "N")]);
        let (conf, team) = teams.find("N").unwrap();
        assert_eq!(conf, Conference::Nfc);
        assert_eq!(team.seed, 1);
        assert!(teams.find("missing").is_none());
    }

    #[test]
    fn test_team_deserializes_without_optional_fields() {
        let team: Team = serde_json::from_str(r#"{"seed": 4, "name": "Pittsburgh Steelers"}"#).unwrap();
        assert_eq!(team.record, "");
        assert!(!team.eliminated);
    }
}
