use itertools::Itertools;

const SPLIT_SEPARATOR: &str = " // ";
const FACE_SEPARATOR: char = '/';

/// Minimum Jaro-Winkler score for a catalog name to count as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.9;

/// Cleans a card name as it appears in a decklist: commas are dropped and
/// runs of whitespace collapse to a single space.
pub fn preprocess_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ',')
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}

/// Join key shared by decklist rows and catalog entries.
///
/// Split and double-faced cards are keyed by their front face, so
/// `"Fire // Ice"`, `"Fire/Ice"` and `"Fire"` all map to `"Fire"`.
pub fn canonical_name(name: &str) -> String {
    let front = name.split(SPLIT_SEPARATOR).next().unwrap_or(name);
    let front = front.split(FACE_SEPARATOR).next().unwrap_or(front);
    preprocess_name(front)
}

/// Closest candidate to `name`, if any is similar enough to be worth
/// suggesting for an unresolved card.
///
/// Equal scores go to the smaller edit distance, then to the name that sorts
/// first, so the pick does not depend on candidate order.
pub fn closest_name<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let target = name.to_lowercase();
    candidates
        .filter_map(|candidate| {
            let lowered = candidate.to_lowercase();
            let score = strsim::jaro_winkler(&target, &lowered);
            (score >= SUGGESTION_THRESHOLD)
                .then(|| (candidate, score, strsim::levenshtein(&target, &lowered)))
        })
        .min_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then(a.2.cmp(&b.2))
                .then_with(|| a.0.cmp(b.0))
        })
        .map(|(candidate, _, _)| candidate)
}
