use std::collections::{HashMap, HashSet};

use crate::card_matcher::canonical_name;
use crate::models::deck::Deck;

pub type Profile = HashMap<String, u32>;

/// Main and side quantities summed per canonical card name.
pub fn profile(deck: &Deck) -> Profile {
    deck.cards().iter().fold(HashMap::new(), |mut acc, line| {
        let total = acc.entry(canonical_name(line.name())).or_insert(0);
        *total = total.saturating_add(line.quantity());
        acc
    })
}

/// Sum of per-card minimums over sum of per-card maximums.
///
/// Two empty profiles are identical and score 1.0.
pub fn jaccard_profiles(a: &Profile, b: &Profile) -> f64 {
    let names: HashSet<&String> = a.keys().chain(b.keys()).collect();

    let (intersection, union) = names.into_iter().fold((0u64, 0u64), |(inter, uni), name| {
        let qty_a = a.get(name).copied().unwrap_or(0) as u64;
        let qty_b = b.get(name).copied().unwrap_or(0) as u64;
        (inter + qty_a.min(qty_b), uni + qty_a.max(qty_b))
    });

    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

pub fn jaccard(a: &Deck, b: &Deck) -> f64 {
    jaccard_profiles(&profile(a), &profile(b))
}

/// All deck pairs `(i, j)` with `i < j`, most similar first, truncated to `top`.
pub fn most_similar_pairs(decks: &[Deck], top: usize) -> Vec<(usize, usize, f64)> {
    let profiles: Vec<Profile> = decks.iter().map(profile).collect();

    let mut pairs = Vec::new();
    for i in 0..profiles.len() {
        for j in (i + 1)..profiles.len() {
            pairs.push((i, j, jaccard_profiles(&profiles[i], &profiles[j])));
        }
    }
    pairs.sort_by(|a, b| b.2.total_cmp(&a.2));
    pairs.truncate(top);
    pairs
}
