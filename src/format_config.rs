use std::collections::HashMap;

use lazy_static::lazy_static;
use strum_macros::{EnumIter, EnumString};

use crate::card_matcher::canonical_name;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, strum_macros::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Format {
    Standard,
    Pioneer,
    Modern,
    Legacy,
}

impl Format {
    /// Lowercase slug as it appears in decklist URLs.
    pub fn slug(&self) -> String {
        self.to_string().to_lowercase()
    }
}

/// A card whose presence in the main deck names the archetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCard {
    pub card: &'static str,
    pub archetype: &'static str,
}

const fn key(card: &'static str, archetype: &'static str) -> KeyCard {
    KeyCard { card, archetype }
}

/// Ordered by priority: the first key card found in a deck wins.
const STANDARD_KEY_CARDS: &[KeyCard] = &[
    key("Cori-Steel Cutter", "Cutter"),
    key("Vivi Ornitier", "Vivi"),
    key("Zur, Eternal Schemer", "Zur"),
    key("Overlord of the Hauntwoods", "Domain"),
    key("Up the Beanstalk", "Beanstalk"),
    key("Heartfire Hero", "Heroic"),
    key("Monstrous Rage", "Prowess"),
    key("Enduring Curiosity", "Enduring"),
    key("Stormchaser's Talent", "Tempo"),
    key("Sheoldred, the Apocalypse", "Midrange"),
];

const PIONEER_KEY_CARDS: &[KeyCard] = &[
    key("Amalia Benavides Aguirre", "Amalia"),
    key("Arclight Phoenix", "Phoenix"),
    key("Indomitable Creativity", "Creativity"),
    key("Greasefang, Okiba Boss", "Greasefang"),
    key("Lotus Field", "Lotus"),
    key("Mausoleum Wanderer", "Spirits"),
    key("Hidden Strings", "Combo"),
    key("Vein Ripper", "Midrange"),
    key("Supreme Verdict", "Control"),
];

const MODERN_KEY_CARDS: &[KeyCard] = &[
    key("Living End", "Living End"),
    key("Amulet of Vigor", "Amulet Titan"),
    key("Goryo's Vengeance", "Goryo's"),
    key("Yawgmoth, Thran Physician", "Yawgmoth"),
    key("Hardened Scales", "Affinity"),
    key("Urza's Saga", "Saga"),
    key("Murktide Regent", "Murktide"),
    key("Grief", "Scam"),
    key("Goblin Guide", "Burn"),
    key("Ragavan, Nimble Pilferer", "Ragavan"),
];

const LEGACY_KEY_CARDS: &[KeyCard] = &[
    key("Doomsday", "Doomsday"),
    key("Show and Tell", "Sneak and Show"),
    key("Reanimate", "Reanimator"),
    key("Painter's Servant", "Painter"),
    key("Life from the Loam", "Lands"),
    key("Eldrazi Temple", "Eldrazi"),
    key("White Plume Adventurer", "Initiative"),
    key("Thalia, Guardian of Thraben", "Death and Taxes"),
    key("Delver of Secrets", "Delver"),
];

lazy_static! {
    /// Color letters in WUBRG order mapped to the combination's name.
    pub static ref COLOR_NAMES: HashMap<&'static str, &'static str> = HashMap::from([
        ("", "Colorless"),
        ("W", "Mono-White"),
        ("U", "Mono-Blue"),
        ("B", "Mono-Black"),
        ("R", "Mono-Red"),
        ("G", "Mono-Green"),
        ("WU", "Azorius"),
        ("WB", "Orzhov"),
        ("WR", "Boros"),
        ("WG", "Selesnya"),
        ("UB", "Dimir"),
        ("UR", "Izzet"),
        ("UG", "Simic"),
        ("BR", "Rakdos"),
        ("BG", "Golgari"),
        ("RG", "Gruul"),
        ("WUB", "Esper"),
        ("WUR", "Jeskai"),
        ("WUG", "Bant"),
        ("WBR", "Mardu"),
        ("WBG", "Abzan"),
        ("WRG", "Naya"),
        ("UBR", "Grixis"),
        ("UBG", "Sultai"),
        ("URG", "Temur"),
        ("BRG", "Jund"),
        ("WUBR", "Yore"),
        ("WUBG", "Witch"),
        ("WURG", "Ink"),
        ("WBRG", "Dune"),
        ("UBRG", "Glint"),
        ("WUBRG", "Five-Color"),
    ]);
}

/// Everything the classifier needs to know about a format.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    pub format: Format,
    pub key_cards: Vec<KeyCard>,
}

impl FormatConfig {
    pub fn for_format(format: Format) -> Self {
        let key_cards = match format {
            Format::Standard => STANDARD_KEY_CARDS,
            Format::Pioneer => PIONEER_KEY_CARDS,
            Format::Modern => MODERN_KEY_CARDS,
            Format::Legacy => LEGACY_KEY_CARDS,
        };
        FormatConfig {
            format,
            key_cards: key_cards.to_vec(),
        }
    }

    /// Key cards with their canonical join keys, in priority order.
    pub fn canonical_key_cards(&self) -> impl Iterator<Item = (String, &KeyCard)> {
        self.key_cards
            .iter()
            .map(|key_card| (canonical_name(key_card.card), key_card))
    }
}
