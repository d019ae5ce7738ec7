//! Turns raw decklist text into card rows.
//!
//! Each content line reads `"<quantity> <card name>"`. Category headers and
//! totals (`"Creatures (12)"`, `"17 Lands"`, `"60 Cards"`) are recognised by
//! their content and dropped, since which headers appear depends on the deck.
//! A card repeated within one block has its quantities summed and keeps the
//! position of its first occurrence.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::card_matcher::preprocess_name;
use crate::error::NormalizeError;
use crate::models::decklist::{CardLine, Zone};

lazy_static! {
    static ref SUMMARY_LINE: Regex = Regex::new(
        r"(?ix)^
        (?:\d+\s+)?
        (?:creatures?|lands?|instants?|sorcer(?:y|ies)|artifacts?|enchantments?
          |planeswalkers?|battles?|other|cards?|total|sideboard|main\s*deck|deck|companion)
        \s*(?:\(\s*\d+\s*\))?
        \s*:?\s*\d*
        $"
    )
    .unwrap();
    static ref TOTAL_LINE: Regex =
        Regex::new(r"(?i)^(?:(\d+)\s+cards?|total\s*(?:cards?)?\s*:?\s*(\d+))$").unwrap();
}

/// Whether the line is a category header or totals summary rather than a card.
pub fn is_summary_line(line: &str) -> bool {
    SUMMARY_LINE.is_match(line.trim())
}

/// The card total a block declares about itself, e.g. `"60 Cards"`.
pub fn declared_total(raw: &str) -> Option<u32> {
    raw.lines().find_map(|line| {
        let caps = TOTAL_LINE.captures(line.trim())?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().parse().ok())
    })
}

pub fn parse(raw: &str, zone: Zone) -> Result<Vec<CardLine>, NormalizeError> {
    let mut cards: Vec<CardLine> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_summary_line(trimmed) {
            continue;
        }

        let malformed = |reason: String| NormalizeError::MalformedLine {
            line_no: index + 1,
            line: trimmed.to_string(),
            reason,
        };
        let (quantity, name) = parse_line(trimmed).map_err(malformed)?;

        match positions.get(&name) {
            Some(&position) => {
                let card = &mut cards[position];
                card.quantity = card.quantity.checked_add(quantity).ok_or_else(|| {
                    malformed(format!("quantity overflow for {:?}", card.name))
                })?;
            }
            None => {
                positions.insert(name.clone(), cards.len());
                cards.push(CardLine {
                    name,
                    quantity,
                    zone,
                });
            }
        }
    }

    Ok(cards)
}

fn parse_line(line: &str) -> Result<(u32, String), String> {
    let (quantity, name) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| "expected \"<quantity> <card name>\"".to_string())?;

    let quantity = quantity
        .parse::<u32>()
        .map_err(|_| format!("quantity {quantity:?} is not a positive integer"))?;
    if quantity == 0 {
        return Err("quantity must be greater than zero".to_string());
    }

    let name = preprocess_name(name);
    if name.is_empty() {
        return Err("missing card name".to_string());
    }

    Ok((quantity, name))
}
