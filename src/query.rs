use std::collections::{HashMap, HashSet};

use crate::card_matcher::canonical_name;
use crate::models::deck::{Deck, EnrichedCardLine};
use crate::models::decklist::Zone;

/// Card rows in `zone` of every deck whose name or archetype equals `label`.
pub fn filter_by_archetype<'a>(
    decks: &'a [Deck],
    label: &str,
    zone: Zone,
) -> Vec<&'a EnrichedCardLine> {
    decks
        .iter()
        .filter(|deck| matches_label(deck, label))
        .flat_map(|deck| deck.zone(zone))
        .collect()
}

pub fn decks_with_archetype<'a>(decks: &'a [Deck], label: &str) -> Vec<&'a Deck> {
    decks.iter().filter(|deck| matches_label(deck, label)).collect()
}

pub fn matches_label(deck: &Deck, label: &str) -> bool {
    deck.name() == label || deck.archetype().to_string() == label
}

/// Decks that run every `must_include` card in `include_zone` and none of
/// the `must_exclude` cards in `exclude_zone`.
pub fn filter_by_card_presence<'a>(
    decks: &'a [Deck],
    must_include: &HashSet<String>,
    include_zone: Zone,
    must_exclude: &HashSet<String>,
    exclude_zone: Zone,
) -> Vec<&'a Deck> {
    let must_include: HashSet<String> = must_include.iter().map(|n| canonical_name(n)).collect();
    let must_exclude: HashSet<String> = must_exclude.iter().map(|n| canonical_name(n)).collect();

    decks
        .iter()
        .filter(|deck| {
            let included = zone_names(deck, include_zone);
            let excluded = zone_names(deck, exclude_zone);
            must_include.is_subset(&included) && must_exclude.is_disjoint(&excluded)
        })
        .collect()
}

fn zone_names(deck: &Deck, zone: Zone) -> HashSet<String> {
    deck.zone(zone).map(|line| canonical_name(line.name())).collect()
}

/// Total quantity per card, highest first. Ties keep first-seen order.
pub fn aggregate_quantity<'a>(
    lines: impl IntoIterator<Item = &'a EnrichedCardLine>,
) -> Vec<(String, u32)> {
    let mut totals: Vec<(String, u32)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let name = canonical_name(line.name());
        match positions.get(&name) {
            Some(&position) => {
                totals[position].1 = totals[position].1.saturating_add(line.quantity())
            }
            None => {
                positions.insert(name.clone(), totals.len());
                totals.push((name, line.quantity()));
            }
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// Aggregated quantities divided by `deck_count`. A zero count yields no rows.
pub fn average_quantity<'a>(
    lines: impl IntoIterator<Item = &'a EnrichedCardLine>,
    deck_count: usize,
) -> Vec<(String, f64)> {
    if deck_count == 0 {
        return Vec::new();
    }
    aggregate_quantity(lines)
        .into_iter()
        .map(|(name, total)| (name, total as f64 / deck_count as f64))
        .collect()
}

/// Deck count and share of the field per deck name, most played first.
pub fn metagame(decks: &[Deck]) -> Vec<(String, usize, f64)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for deck in decks {
        match counts.iter_mut().find(|(name, _)| name.as_str() == deck.name()) {
            Some((_, count)) => *count += 1,
            None => counts.push((deck.name().to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total = decks.len().max(1) as f64;
    counts
        .into_iter()
        .map(|(name, count)| (name, count, count as f64 / total))
        .collect()
}
