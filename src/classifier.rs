//! Color identity and archetype labelling.
//!
//! The archetype comes from the first format key card found in the main
//! deck. Decks without one fall back to a land-count heuristic, which only
//! approximates deck shape and says nothing about the actual strategy.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::card_matcher::canonical_name;
use crate::format_config::{FormatConfig, COLOR_NAMES};
use crate::models::card::{color_letters, mana_cost_colors, Color};
use crate::models::deck::EnrichedCardLine;
use crate::models::decklist::Zone;

/// Decks with fewer lands than this read as aggro.
pub const AGGRO_MAX_LANDS: u32 = 22;
/// Decks with more lands than this read as control.
pub const CONTROL_MIN_LANDS: u32 = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archetype {
    KeyCard(String),
    Aggro,
    Control,
    /// No key card and a land count inside the midrange band.
    Unclassified,
}

impl Display for Archetype {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Archetype::KeyCard(name) => write!(f, "{}", name),
            Archetype::Aggro => write!(f, "Aggro"),
            Archetype::Control => write!(f, "Control"),
            Archetype::Unclassified => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub color_identity: Vec<Color>,
    pub key_cards: Vec<String>,
    pub land_count: u32,
    pub average_mana_value: Option<f64>,
    pub archetype: Archetype,
}

pub fn classify(cards: &[EnrichedCardLine], config: &FormatConfig) -> Classification {
    let color_identity = color_identity(cards);
    let key_cards = key_cards(cards, config);
    let land_count = land_count(cards);
    let average_mana_value = average_mana_value(cards);

    let archetype = match key_cards.first() {
        Some(first) => config
            .key_cards
            .iter()
            .find(|key_card| key_card.card == first.as_str())
            .map(|key_card| Archetype::KeyCard(key_card.archetype.to_string()))
            .unwrap_or_else(|| Archetype::KeyCard(first.clone())),
        None => land_fallback(land_count),
    };

    Classification {
        color_identity,
        key_cards,
        land_count,
        average_mana_value,
        archetype,
    }
}

/// Colors drawn from main and side mana costs, falling back to the card's
/// colors when its cost names none, in WUBRG order without repeats.
pub fn color_identity(cards: &[EnrichedCardLine]) -> Vec<Color> {
    cards
        .iter()
        .filter_map(|line| line.card.as_ref())
        .flat_map(|card| {
            let from_cost = card
                .mana_cost
                .as_deref()
                .map(mana_cost_colors)
                .unwrap_or_default();
            if from_cost.is_empty() {
                card.colors.clone()
            } else {
                from_cost
            }
        })
        .unique()
        .sorted()
        .collect()
}

/// Key cards present in the main deck, in the format's priority order.
pub fn key_cards(cards: &[EnrichedCardLine], config: &FormatConfig) -> Vec<String> {
    let main_names: HashSet<String> = cards
        .iter()
        .filter(|line| line.zone() == Zone::Main)
        .map(|line| canonical_name(line.name()))
        .collect();

    config
        .canonical_key_cards()
        .filter(|(name, _)| main_names.contains(name))
        .map(|(_, key_card)| key_card.card.to_string())
        .collect()
}

/// Main-deck lands among rows whose type line resolved.
pub fn land_count(cards: &[EnrichedCardLine]) -> u32 {
    cards
        .iter()
        .filter(|line| line.zone() == Zone::Main)
        .filter(|line| line.card.as_ref().map_or(false, |card| card.is_land()))
        .fold(0u32, |total, line| total.saturating_add(line.quantity()))
}

/// Quantity-weighted mana value of resolved main-deck nonland cards.
pub fn average_mana_value(cards: &[EnrichedCardLine]) -> Option<f64> {
    let (total, count) = cards
        .iter()
        .filter(|line| line.zone() == Zone::Main)
        .filter_map(|line| {
            let card = line.card.as_ref()?;
            if card.type_line.is_none() || card.is_land() {
                return None;
            }
            Some((card.mana_value?, line.quantity()))
        })
        .fold((0.0, 0u64), |(total, count), (value, quantity)| {
            (total + value * quantity as f64, count + quantity as u64)
        });

    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

fn land_fallback(land_count: u32) -> Archetype {
    if land_count < AGGRO_MAX_LANDS {
        Archetype::Aggro
    } else if land_count > CONTROL_MIN_LANDS {
        Archetype::Control
    } else {
        Archetype::Unclassified
    }
}

pub fn color_label(colors: &[Color]) -> &'static str {
    COLOR_NAMES
        .get(color_letters(colors).as_str())
        .copied()
        .unwrap_or("Unknown")
}

pub fn deck_name(colors: &[Color], archetype: &Archetype) -> String {
    format!("{} {}", color_label(colors), archetype)
        .trim_end()
        .to_string()
}
