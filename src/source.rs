//! Interfaces to the external decklist collaborators.
//!
//! Live page scraping lives outside this crate. The binary ships with an
//! index-file discovery and an acquisition source that always fails, so a
//! run without a scraper works purely from the cache.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::error::AcquisitionError;
use crate::format_config::Format;
use crate::models::decklist::{TournamentDecks, TournamentId, TournamentInfo};

const DECKLIST_INDEX_URL: &str = "https://www.mtgo.com/decklists";

/// Pulls raw decklists for one tournament.
#[async_trait]
pub trait DecklistSource: Send + Sync {
    async fn fetch(&self, tournament: &TournamentId) -> Result<TournamentDecks, AcquisitionError>;
}

/// Lists the tournaments published for a format in a given month.
#[async_trait]
pub trait TournamentDiscovery: Send + Sync {
    async fn list(
        &self,
        format: Format,
        year: i32,
        month: u32,
    ) -> Result<Vec<TournamentInfo>, AcquisitionError>;
}

/// Index page listing a month of decklists for a format.
pub fn decklist_index_url(format: Format, year: i32, month: u32) -> String {
    format!("{}/{}/{:02}?filter={}", DECKLIST_INDEX_URL, year, month, format)
}

/// Runs the acquisition collaborator with an upper bound on its latency.
pub async fn fetch_with_timeout(
    source: &dyn DecklistSource,
    tournament: &TournamentId,
    timeout: Duration,
) -> Result<TournamentDecks, AcquisitionError> {
    match tokio::time::timeout(timeout, source.fetch(tournament)).await {
        Ok(result) => result,
        Err(_) => Err(AcquisitionError::Timeout {
            target: tournament.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

/// `(year, month)` pairs covering `start..=end`. Empty when `start > end`.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    while (year, month) <= (end.year(), end.month()) {
        months.push((year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    months
}

/// Narrows discovered tournaments to the run's format, date window and
/// skip list. Duplicates by id keep the first listing.
pub fn filter_tournaments(
    listed: Vec<TournamentInfo>,
    format: Format,
    start: NaiveDate,
    end: NaiveDate,
    skip: &HashSet<String>,
) -> Vec<(TournamentId, TournamentInfo)> {
    let slug = format.slug();
    let mut seen = HashSet::new();

    listed
        .into_iter()
        .filter(|info| info.url.to_lowercase().contains(&slug))
        .filter(|info| info.date >= start && info.date <= end)
        .filter_map(|info| TournamentId::from_url(&info.url).map(|id| (id, info)))
        .filter(|(id, _)| !skip.contains(id.as_str()))
        .filter(|(id, _)| seen.insert(id.clone()))
        .collect()
}

/// Queries discovery month by month and filters the combined listing.
pub async fn discover_tournaments(
    discovery: &dyn TournamentDiscovery,
    format: Format,
    start: NaiveDate,
    end: NaiveDate,
    skip: &HashSet<String>,
) -> Result<Vec<(TournamentId, TournamentInfo)>, AcquisitionError> {
    let mut listed = Vec::new();
    for (year, month) in months_in_range(start, end) {
        debug!("Listing {}", decklist_index_url(format, year, month));
        listed.extend(discovery.list(format, year, month).await?);
    }

    let tournaments = filter_tournaments(listed, format, start, end, skip);
    info!("Discovered {} {} tournaments", tournaments.len(), format);
    Ok(tournaments)
}

/// Discovery backed by a JSON file holding an array of
/// `{"title", "date", "url"}` entries.
pub struct IndexFileDiscovery {
    path: PathBuf,
}

impl IndexFileDiscovery {
    pub fn new(path: &Path) -> Self {
        IndexFileDiscovery {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl TournamentDiscovery for IndexFileDiscovery {
    async fn list(
        &self,
        format: Format,
        year: i32,
        month: u32,
    ) -> Result<Vec<TournamentInfo>, AcquisitionError> {
        let target = self.path.display().to_string();
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AcquisitionError::fetch_failed(&target, e.to_string()))?;
        let entries: Vec<TournamentInfo> = serde_json::from_str(&data)
            .map_err(|e| AcquisitionError::fetch_failed(&target, e.to_string()))?;

        debug!("Index {} lists {} entries", target, entries.len());
        let slug = format.slug();
        Ok(entries
            .into_iter()
            .filter(|info| info.date.year() == year && info.date.month() == month)
            .filter(|info| info.url.to_lowercase().contains(&slug))
            .collect())
    }
}

/// Acquisition stand-in for cache-only runs.
pub struct OfflineSource;

#[async_trait]
impl DecklistSource for OfflineSource {
    async fn fetch(&self, tournament: &TournamentId) -> Result<TournamentDecks, AcquisitionError> {
        Err(AcquisitionError::fetch_failed(
            tournament.as_str(),
            "live acquisition is not available, only cached tournaments can be analysed",
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::decklist::RawDeck;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    /// Serves fixed decks and counts calls.
    pub(crate) struct FixedSource {
        pub decks: TournamentDecks,
        pub calls: AtomicUsize,
    }

    impl FixedSource {
        pub(crate) fn new(decks: TournamentDecks) -> Self {
            FixedSource {
                decks,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DecklistSource for FixedSource {
        async fn fetch(&self, _: &TournamentId) -> Result<TournamentDecks, AcquisitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.decks.clone())
        }
    }

    struct StalledSource;

    #[async_trait]
    impl DecklistSource for StalledSource {
        async fn fetch(&self, _: &TournamentId) -> Result<TournamentDecks, AcquisitionError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(TournamentDecks::new())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn info(title: &str, date: NaiveDate, url: &str) -> TournamentInfo {
        TournamentInfo {
            title: title.to_string(),
            date,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_decklist_index_url() {
        assert_eq!(
            decklist_index_url(Format::Standard, 2025, 8),
            "https://www.mtgo.com/decklists/2025/08?filter=Standard"
        );
    }

    #[test]
    fn test_months_in_range() {
        assert_eq!(
            months_in_range(date(2024, 11, 20), date(2025, 2, 1)),
            vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]
        );
        assert_eq!(months_in_range(date(2025, 8, 1), date(2025, 8, 31)), vec![(2025, 8)]);
        assert!(months_in_range(date(2025, 9, 1), date(2025, 8, 1)).is_empty());
    }

    #[test]
    fn test_filter_tournaments() {
        let listed = vec![
            info("Standard Challenge 32", date(2025, 8, 1), "/decklist/standard-challenge-32-2025-08-0112801"),
            info("Standard League", date(2025, 7, 30), "/decklist/standard-league-2025-07-30"),
            info("Modern Challenge 32", date(2025, 8, 2), "/decklist/modern-challenge-32-2025-08-0212802"),
            info("Standard Showcase", date(2025, 8, 3), "/decklist/standard-showcase-2025-08-0312803"),
            info("Standard Challenge 32", date(2025, 8, 1), "/decklist/standard-challenge-32-2025-08-0112801"),
        ];
        let skip = HashSet::from(["standard-showcase-2025-08-0312803".to_string()]);

        let kept = filter_tournaments(listed, Format::Standard, date(2025, 8, 1), date(2025, 8, 31), &skip);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0.as_str(), "standard-challenge-32-2025-08-0112801");
        assert_eq!(kept[0].1.display_name(), "2025-08-01 Standard Challenge 32");
    }

    #[tokio::test]
    async fn test_index_file_discovery() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"title": "Standard Challenge 32", "date": "2025-08-01", "url": "/decklist/standard-challenge-32-2025-08-0112801"}},
                {{"title": "Standard Challenge 64", "date": "2025-09-06", "url": "/decklist/standard-challenge-64-2025-09-0612900"}},
                {{"title": "Pioneer League", "date": "2025-08-05", "url": "/decklist/pioneer-league-2025-08-05"}}
            ]"#
        )
        .unwrap();

        let discovery = IndexFileDiscovery::new(file.path());
        let august = discovery.list(Format::Standard, 2025, 8).await.unwrap();
        assert_eq!(august.len(), 1);

        let found = discover_tournaments(
            &discovery,
            Format::Standard,
            date(2025, 8, 1),
            date(2025, 9, 30),
            &HashSet::new(),
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_index_file_missing() {
        let discovery = IndexFileDiscovery::new(Path::new("/nonexistent/index.json"));
        let result = discovery.list(Format::Modern, 2025, 8).await;
        assert!(matches!(result, Err(AcquisitionError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn test_fetch_with_timeout() {
        let id = TournamentId::from_url("/decklist/standard-league-2025-08-14").unwrap();

        let decks = TournamentDecks::from([("1".to_string(), RawDeck::new("4 Island", ""))]);
        let source = FixedSource::new(decks.clone());
        let fetched = fetch_with_timeout(&source, &id, Duration::from_secs(1)).await.unwrap();
        assert_eq!(fetched, decks);

        let stalled = fetch_with_timeout(&StalledSource, &id, Duration::from_millis(10)).await;
        assert!(matches!(stalled, Err(AcquisitionError::Timeout { .. })));

        let offline = fetch_with_timeout(&OfflineSource, &id, Duration::from_secs(1)).await;
        assert!(matches!(offline, Err(AcquisitionError::FetchFailed { .. })));
    }
}
