use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{CacheError, TournamentError};
use crate::models::decklist::{TournamentDecks, TournamentId};
use crate::source::{fetch_with_timeout, DecklistSource};

const CACHE_FILE_EXTENSION: &str = "json";

#[derive(Debug, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(TournamentDecks),
    Miss,
}

pub struct DecklistCache {
    dir: PathBuf,
}

impl DecklistCache {
    pub fn new(dir: &Path) -> Self {
        DecklistCache {
            dir: dir.to_path_buf(),
        }
    }

    pub fn path_for(&self, tournament: &TournamentId) -> PathBuf {
        self.dir.join(format!("{}.{}", tournament, CACHE_FILE_EXTENSION))
    }

    /// Reads the persisted decks. An absent file is a miss; an unreadable
    /// or undecodable one is an error.
    pub fn load(&self, tournament: &TournamentId) -> Result<CacheLookup, CacheError> {
        let path = self.path_for(tournament);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheLookup::Miss),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(CacheError::corrupt(&path, e.to_string()))
            }
            Err(e) => return Err(CacheError::io(&path, e)),
        };

        let decks: TournamentDecks = serde_json::from_str(&contents)
            .map_err(|e| CacheError::corrupt(&path, e.to_string()))?;
        Ok(CacheLookup::Hit(decks))
    }

    /// Persists the decks through a sibling temp file so readers never see
    /// a half-written entry.
    pub fn store(
        &self,
        tournament: &TournamentId,
        decks: &TournamentDecks,
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;

        let path = self.path_for(tournament);
        let content =
            serde_json::to_string(decks).map_err(|e| CacheError::io(&path, io::Error::from(e)))?;

        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = write_then_rename(&tmp_path, &path, content.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        debug!("Cached {} decks at {}", decks.len(), path.display());
        Ok(())
    }

    /// Cached decks for the tournament, acquiring and persisting them on a
    /// miss. Empty acquisitions are returned but not written.
    pub async fn get(
        &self,
        tournament: &TournamentId,
        source: &dyn DecklistSource,
        timeout: Duration,
    ) -> Result<TournamentDecks, TournamentError> {
        if let CacheLookup::Hit(decks) = self.load(tournament)? {
            debug!("Cache hit for {}", tournament);
            return Ok(decks);
        }

        info!("Cache miss for {}, fetching", tournament);
        let decks = fetch_with_timeout(source, tournament, timeout).await?;
        if !decks.is_empty() {
            self.store(tournament, &decks)?;
        }
        Ok(decks)
    }
}

fn write_then_rename(tmp_path: &Path, path: &Path, content: &[u8]) -> Result<(), CacheError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(tmp_path)
        .map_err(|e| CacheError::io(tmp_path, e))?;
    file.write_all(content)
        .map_err(|e| CacheError::io(tmp_path, e))?;
    drop(file);
    fs::rename(tmp_path, path).map_err(|e| CacheError::io(path, e))
}
