use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

pub const KICKOFF_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Leagues,
    Clubs,
    Matches,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Leagues, EntityKind::Clubs, EntityKind::Matches];
}

impl FromStr for EntityKind {
    type Err = WidgetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "league" | "leagues" => Ok(EntityKind::Leagues),
            "club" | "clubs" => Ok(EntityKind::Clubs),
            "match" | "matches" => Ok(EntityKind::Matches),
            _ => Err(WidgetError::InvalidEntityKind(raw.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(kind_label(*self))
    }
}

pub fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Leagues => "Leagues",
        EntityKind::Clubs => "Clubs",
        EntityKind::Matches => "Matches",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub key: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(with = "kickoff_text")]
    pub kickoff: NaiveDateTime,
    pub league_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    League(League),
    Club(Club),
    Match(Match),
}

impl Entity {
    pub fn key(&self) -> &str {
        match self {
            Entity::League(l) => &l.key,
            Entity::Club(c) => &c.key,
            Entity::Match(m) => &m.key,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::League(_) => EntityKind::Leagues,
            Entity::Club(_) => EntityKind::Clubs,
            Entity::Match(_) => EntityKind::Matches,
        }
    }

    /// Text used for both filtering and suggestions: the name, or "home vs away" for matches.
    pub fn display_text(&self) -> String {
        match self {
            Entity::League(l) => l.name.clone(),
            Entity::Club(c) => c.name.clone(),
            Entity::Match(m) => format!("{} vs {}", m.home_team, m.away_team),
        }
    }

    pub fn as_match(&self) -> Option<&Match> {
        match self {
            Entity::Match(m) => Some(m),
            _ => None,
        }
    }
}

/// Ordered entities of a single kind. Insertion order is the display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    kind: EntityKind,
    entities: Vec<Entity>,
}

impl Catalog {
    pub fn empty(kind: EntityKind) -> Self {
        Self {
            kind,
            entities: Vec::new(),
        }
    }

    pub fn leagues(rows: impl IntoIterator<Item = League>) -> Self {
        Self::build(EntityKind::Leagues, rows.into_iter().map(Entity::League))
    }

    pub fn clubs(rows: impl IntoIterator<Item = Club>) -> Self {
        Self::build(EntityKind::Clubs, rows.into_iter().map(Entity::Club))
    }

    pub fn matches(rows: impl IntoIterator<Item = Match>) -> Self {
        Self::build(EntityKind::Matches, rows.into_iter().map(Entity::Match))
    }

    // Keys are identities; a repeated key keeps its first row.
    fn build(kind: EntityKind, rows: impl Iterator<Item = Entity>) -> Self {
        let mut seen = HashSet::new();
        let entities = rows
            .filter(|entity| seen.insert(entity.key().to_string()))
            .collect();
        Self { kind, entities }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.key() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Read-only reference data for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStore {
    pub leagues: Catalog,
    pub clubs: Catalog,
    pub matches: Catalog,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self {
            leagues: Catalog::empty(EntityKind::Leagues),
            clubs: Catalog::empty(EntityKind::Clubs),
            matches: Catalog::empty(EntityKind::Matches),
        }
    }
}

impl CatalogStore {
    pub fn new(leagues: Vec<League>, clubs: Vec<Club>, matches: Vec<Match>) -> Self {
        Self {
            leagues: Catalog::leagues(leagues),
            clubs: Catalog::clubs(clubs),
            matches: Catalog::matches(matches),
        }
    }

    pub fn get(&self, kind: EntityKind) -> &Catalog {
        match kind {
            EntityKind::Leagues => &self.leagues,
            EntityKind::Clubs => &self.clubs,
            EntityKind::Matches => &self.matches,
        }
    }

    pub fn league_name(&self, key: &str) -> Option<&str> {
        match self.leagues.get(key) {
            Some(Entity::League(l)) => Some(l.name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    leagues: Vec<League>,
    #[serde(default)]
    clubs: Vec<Club>,
    #[serde(default)]
    matches: Vec<Match>,
}

pub fn parse_catalog_json(raw: &str) -> Result<CatalogStore> {
    let file = serde_json::from_str::<Option<CatalogFile>>(raw)
        .context("decode catalog json")?
        .unwrap_or_default();
    Ok(CatalogStore::new(file.leagues, file.clubs, file.matches))
}

pub fn load_catalog_file(path: &std::path::Path) -> Result<CatalogStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog {}", path.display()))?;
    parse_catalog_json(&raw).with_context(|| format!("parse catalog {}", path.display()))
}

/// Built-in reference data used when the host has no catalog file.
pub fn seed_catalog() -> CatalogStore {
    let league = |key: &str, name: &str| League {
        key: key.to_string(),
        name: name.to_string(),
    };
    let club = |key: &str, name: &str| Club {
        key: key.to_string(),
        name: name.to_string(),
    };
    let fixture = |key: &str, home: &str, away: &str, kickoff: &str, league_ref: &str| {
        NaiveDateTime::parse_from_str(kickoff, KICKOFF_FORMAT)
            .ok()
            .map(|kickoff| Match {
                key: key.to_string(),
                home_team: home.to_string(),
                away_team: away.to_string(),
                kickoff,
                league_ref: league_ref.to_string(),
            })
    };

    let leagues = vec![
        league("1", "English Premier League"),
        league("2", "La Liga"),
        league("3", "Bundesliga"),
        league("4", "Serie A"),
        league("5", "Ligue 1"),
    ];
    let clubs = vec![
        club("1", "Manchester United"),
        club("2", "Real Madrid"),
        club("3", "Bayern Munich"),
        club("4", "Juventus"),
        club("5", "Paris Saint-Germain"),
        club("6", "Barcelona"),
    ];
    let matches = [
        fixture("1", "Manchester United", "Liverpool", "2023-11-01 18:00", "1"),
        fixture("2", "Barcelona", "Real Madrid", "2023-11-02 20:00", "2"),
        fixture("3", "Borussia Dortmund", "Bayern Munich", "2023-11-03 19:00", "3"),
    ]
    .into_iter()
    .flatten()
    .collect();

    CatalogStore::new(leagues, clubs, matches)
}

mod kickoff_text {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::KICKOFF_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&value.format(KICKOFF_FORMAT).to_string())
    }

    // Accepts "2023-11-01 18:00" as well as the ISO "2023-11-01T18:00:00" form.
    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(de)?;
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, KICKOFF_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .map_err(serde::de::Error::custom)
    }
}
