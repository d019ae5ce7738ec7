use std::path::PathBuf;

use thiserror::Error;

use crate::models::decklist::Zone;

/// Errors raised while reading or writing the decklist cache.
///
/// A missing cache file is not an error; see [`crate::cache::CacheLookup::Miss`].
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache file exists but could not be decoded.
    #[error("cache entry {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the external acquisition and discovery collaborators.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to fetch {target}: {reason}")]
    FetchFailed { target: String, reason: String },

    #[error("fetching {target} timed out after {timeout_secs} seconds")]
    Timeout { target: String, timeout_secs: u64 },
}

impl AcquisitionError {
    pub fn fetch_failed(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// A decklist line that could not be turned into a card entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("malformed line {line_no} {line:?}: {reason}")]
    MalformedLine {
        line_no: usize,
        line: String,
        reason: String,
    },
}

/// Errors raised while loading the reference card catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read card catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse card catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record does not carry the columns the enricher relies on.
    #[error("card catalog record {index} violates schema: {reason}")]
    Schema { index: usize, reason: String },
}

/// Failure for a whole tournament. The batch logs it and moves on.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
}

/// Failure for a single deck. Sibling decks in the tournament are unaffected.
#[derive(Debug, Error)]
#[error("deck {deck} of {tournament} ({zone}): {source}")]
pub struct DeckError {
    pub tournament: String,
    pub deck: String,
    pub zone: Zone,
    #[source]
    pub source: NormalizeError,
}
