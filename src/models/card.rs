use std::fmt::{self, Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref MANA_SYMBOL: Regex = Regex::new(r"\{([^}]*)\}").unwrap();
}

/// Variant order is WUBRG, so the derived `Ord` sorts canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match *self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Renders a color sequence as its letters, e.g. `"UB"`.
pub fn color_letters(colors: &[Color]) -> String {
    colors.iter().map(Color::letter).collect()
}

/// Colors named by the symbols of a mana cost, in order of appearance.
/// Duplicates are kept; callers dedupe.
pub fn mana_cost_colors(mana_cost: &str) -> Vec<Color> {
    MANA_SYMBOL
        .captures_iter(mana_cost)
        .flat_map(|cap| {
            cap[1]
                .chars()
                .filter_map(Color::from_char)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Mana value of a cost string such as `{2}{U}{U}`.
///
/// `{X}` counts as zero, hybrid and Phyrexian symbols as one, and
/// twobrid symbols like `{2/W}` as two.
pub fn mana_value(mana_cost: &str) -> f64 {
    MANA_SYMBOL
        .captures_iter(mana_cost)
        .map(|cap| symbol_value(&cap[1]))
        .sum()
}

fn symbol_value(symbol: &str) -> f64 {
    if let Ok(generic) = symbol.parse::<u32>() {
        return generic as f64;
    }
    match symbol {
        "X" | "Y" | "Z" => 0.0,
        "½" | "H" => 0.5,
        _ => match symbol.split_once('/') {
            Some((left, _)) => left.parse::<u32>().map(|n| n as f64).unwrap_or(1.0),
            None => 1.0,
        },
    }
}

/// One face of a multi-face catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFace {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
}

/// A record of the bulk oracle-card dataset, as published.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub layout: String,
    pub set_type: String,
    pub color_identity: Vec<Color>,
    #[serde(default)]
    pub colors: Option<Vec<Color>>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub card_faces: Option<Vec<CatalogFace>>,
}

/// Back face fields. Power and toughness are only kept for creature faces.
#[derive(Debug, Clone, PartialEq)]
pub struct BackFace {
    pub name: String,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
}

/// Flattened card metadata used by the enricher.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCard {
    /// Canonical join key, see [`crate::card_matcher::canonical_name`].
    pub name: String,
    pub full_name: String,
    pub colors: Vec<Color>,
    pub color_identity: Vec<Color>,
    pub mana_cost: Option<String>,
    pub mana_value: Option<f64>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub back: Option<BackFace>,
}

impl ReferenceCard {
    pub fn from_record(record: CatalogRecord) -> Self {
        let CatalogRecord {
            name: full_name,
            color_identity,
            colors,
            mana_cost,
            cmc,
            type_line,
            oracle_text,
            card_faces,
            ..
        } = record;

        let mut faces = card_faces.unwrap_or_default().into_iter();
        let front = faces.next();
        let back = faces.next().map(|face| {
            let is_creature = face
                .type_line
                .as_deref()
                .map_or(false, |t| t.contains("Creature"));
            BackFace {
                name: face.name,
                type_line: face.type_line,
                oracle_text: face.oracle_text,
                power: face.power.filter(|_| is_creature),
                toughness: face.toughness.filter(|_| is_creature),
            }
        });

        let (mana_cost, type_line, oracle_text) = match front {
            Some(face) => (
                face.mana_cost.or(mana_cost),
                face.type_line.or(type_line),
                face.oracle_text.or(oracle_text),
            ),
            None => (mana_cost, type_line, oracle_text),
        };

        let mana_value = match (&back, mana_cost.as_deref()) {
            // Multi-face cmc sums both halves of split cards; use the front face.
            (Some(_), Some(cost)) => Some(mana_value(cost)),
            _ => cmc.or_else(|| mana_cost.as_deref().map(mana_value)),
        };

        ReferenceCard {
            name: crate::card_matcher::canonical_name(&full_name),
            full_name,
            colors: colors.unwrap_or_else(|| color_identity.clone()),
            color_identity,
            mana_cost,
            mana_value,
            type_line,
            oracle_text,
            back,
        }
    }

    pub fn is_land(&self) -> bool {
        self.type_line
            .as_deref()
            .map_or(false, |t| t.contains("Land"))
    }
}
