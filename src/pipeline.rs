use tracing::{info, warn};

use crate::cache::DecklistCache;
use crate::catalog::ReferenceCardCatalog;
use crate::enricher::enrich;
use crate::error::{DeckError, TournamentError};
use crate::format_config::FormatConfig;
use crate::models::deck::Deck;
use crate::models::decklist::{
    RawDeck, TournamentDecks, TournamentId, TournamentInfo, TournamentResult, Zone,
};
use crate::normalizer;
use crate::opt::RunConfig;
use crate::source::DecklistSource;

pub struct TournamentReport {
    pub tournament: TournamentResult,
    pub decks: Vec<Deck>,
    pub skipped: Vec<DeckError>,
}

/// Classifies every deck of a tournament, in placement order.
pub fn build_decks(
    tournament: &TournamentId,
    raw: &TournamentDecks,
    catalog: &ReferenceCardCatalog,
    config: &FormatConfig,
) -> (Vec<Deck>, Vec<DeckError>) {
    let mut labels: Vec<&String> = raw.keys().collect();
    labels.sort_by_key(|label| (label.parse::<u32>().unwrap_or(u32::MAX), label.to_string()));

    let mut decks = Vec::new();
    let mut skipped = Vec::new();
    for label in labels {
        match build_deck(tournament, label, &raw[label], catalog, config) {
            Ok(deck) => decks.push(deck),
            Err(e) => {
                warn!("Skipping deck: {}", e);
                skipped.push(e);
            }
        }
    }
    (decks, skipped)
}

fn build_deck(
    tournament: &TournamentId,
    label: &str,
    raw: &RawDeck,
    catalog: &ReferenceCardCatalog,
    config: &FormatConfig,
) -> Result<Deck, DeckError> {
    let mut lines = Vec::new();
    for zone in [Zone::Main, Zone::Side] {
        let parsed = normalizer::parse(raw.text(zone), zone).map_err(|source| DeckError {
            tournament: tournament.to_string(),
            deck: label.to_string(),
            zone,
            source,
        })?;

        if let Some(declared) = normalizer::declared_total(raw.text(zone)) {
            let counted: u64 = parsed.iter().map(|line| line.quantity as u64).sum();
            if counted != declared as u64 {
                warn!(
                    "Deck {} of {} ({}) lists {} cards but declares {}",
                    label, tournament, zone, counted, declared
                );
            }
        }
        lines.extend(parsed);
    }

    let id = format!("{}#{}", tournament, label);
    Ok(Deck::new(&id, enrich(lines, catalog), config))
}

pub async fn analyze_tournament(
    id: &TournamentId,
    info: &TournamentInfo,
    cache: &DecklistCache,
    source: &dyn DecklistSource,
    catalog: &ReferenceCardCatalog,
    run: &RunConfig,
) -> Result<TournamentReport, TournamentError> {
    let raw = cache.get(id, source, run.fetch_timeout).await?;
    let (decks, skipped) = build_decks(id, &raw, catalog, &run.format_config);

    Ok(TournamentReport {
        tournament: TournamentResult {
            id: id.clone(),
            name: info.display_name(),
            date: info.date,
            decks: raw,
        },
        decks,
        skipped,
    })
}

/// Analyzes tournaments sequentially, dropping the ones that fail.
pub async fn run_batch(
    tournaments: &[(TournamentId, TournamentInfo)],
    cache: &DecklistCache,
    source: &dyn DecklistSource,
    catalog: &ReferenceCardCatalog,
    run: &RunConfig,
) -> Vec<TournamentReport> {
    let mut reports = Vec::new();
    for (id, info) in tournaments {
        match analyze_tournament(id, info, cache, source, catalog, run).await {
            Ok(report) => {
                info!(
                    "{}: {} decks classified, {} skipped",
                    report.tournament.name,
                    report.decks.len(),
                    report.skipped.len()
                );
                reports.push(report);
            }
            Err(e) => warn!("Skipping tournament {}: {}", id, e),
        }
    }
    reports
}
