use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, strum_macros::Display)]
#[strum(ascii_case_insensitive)]
pub enum Zone {
    #[strum(serialize = "main")]
    Main,
    #[strum(serialize = "side")]
    Side,
}

/// Raw decklist text of one placed competitor, persisted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDeck {
    pub main: String,
    pub side: String,
}

impl RawDeck {
    pub fn new(main: &str, side: &str) -> Self {
        RawDeck {
            main: main.to_string(),
            side: side.to_string(),
        }
    }

    pub fn text(&self, zone: Zone) -> &str {
        match zone {
            Zone::Main => &self.main,
            Zone::Side => &self.side,
        }
    }
}

/// Decks of a tournament keyed by deck label (placement ordinal).
pub type TournamentDecks = BTreeMap<String, RawDeck>;

/// Tournament identifier: the last path segment of its results URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TournamentId(String);

impl TournamentId {
    /// Extracts the identifier from a results URL or path, dropping any
    /// query string or fragment. Returns `None` when no usable segment exists.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .last()
            .filter(|segment| *segment != "." && *segment != ".." && !segment.contains(':'))
            .map(|segment| TournamentId(segment.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TournamentId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tournament as listed by the discovery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub title: String,
    pub date: NaiveDate,
    pub url: String,
}

impl TournamentInfo {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.date, self.title)
    }
}

/// A fetched tournament with its raw decklists. Never mutated once built.
#[derive(Debug, Clone)]
pub struct TournamentResult {
    pub id: TournamentId,
    pub name: String,
    pub date: NaiveDate,
    pub decks: TournamentDecks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLine {
    pub name: String,
    pub quantity: u32,
    pub zone: Zone,
}

impl CardLine {
    pub fn new(name: &str, quantity: u32, zone: Zone) -> Self {
        CardLine {
            name: name.to_string(),
            quantity,
            zone,
        }
    }
}
