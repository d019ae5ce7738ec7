use std::sync::Arc;

use crate::classifier::{self, Archetype};
use crate::format_config::FormatConfig;
use crate::models::card::{Color, ReferenceCard};
use crate::models::decklist::{CardLine, Zone};

/// A decklist row joined with its catalog entry. `card` is `None` when the
/// name did not resolve; such rows are kept and skipped by numeric aggregates.
#[derive(Debug, Clone)]
pub struct EnrichedCardLine {
    pub line: CardLine,
    pub card: Option<Arc<ReferenceCard>>,
}

impl EnrichedCardLine {
    pub fn name(&self) -> &str {
        &self.line.name
    }

    pub fn quantity(&self) -> u32 {
        self.line.quantity
    }

    pub fn zone(&self) -> Zone {
        self.line.zone
    }

    pub fn is_resolved(&self) -> bool {
        self.card.is_some()
    }
}

/// A classified deck. Built once from its enriched rows and read-only after.
#[derive(Debug, Clone)]
pub struct Deck {
    id: String,
    cards: Vec<EnrichedCardLine>,
    color_identity: Vec<Color>,
    key_cards: Vec<String>,
    land_count: u32,
    average_mana_value: Option<f64>,
    archetype: Archetype,
    name: String,
}

impl Deck {
    pub fn new(id: &str, cards: Vec<EnrichedCardLine>, config: &FormatConfig) -> Self {
        let classification = classifier::classify(&cards, config);
        let name = classifier::deck_name(&classification.color_identity, &classification.archetype);

        Deck {
            id: id.to_string(),
            cards,
            color_identity: classification.color_identity,
            key_cards: classification.key_cards,
            land_count: classification.land_count,
            average_mana_value: classification.average_mana_value,
            archetype: classification.archetype,
            name,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cards(&self) -> &[EnrichedCardLine] {
        &self.cards
    }

    pub fn zone(&self, zone: Zone) -> impl Iterator<Item = &EnrichedCardLine> {
        self.cards.iter().filter(move |card| card.zone() == zone)
    }

    pub fn color_identity(&self) -> &[Color] {
        &self.color_identity
    }

    pub fn key_cards(&self) -> &[String] {
        &self.key_cards
    }

    pub fn land_count(&self) -> u32 {
        self.land_count
    }

    pub fn average_mana_value(&self) -> Option<f64> {
        self.average_mana_value
    }

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    /// `"<color label> <archetype>"`, e.g. `"Dimir Midrange"`.
    pub fn name(&self) -> &str {
        &self.name
    }
}
