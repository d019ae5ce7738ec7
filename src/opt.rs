use std::collections::HashSet;
use std::env;
use std::time::Duration;

use chrono::NaiveDate;
use strum_macros::{Display, EnumString};

use crate::format_config::{Format, FormatConfig};

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

#[derive(Display, EnumString, Eq, PartialEq, Debug, Hash, Clone, Copy)]
pub enum EnvVar {
    #[strum(serialize = "DECK_CLAW_CACHE_DIR")]
    CacheDir,
    #[strum(serialize = "DECK_CLAW_CATALOG")]
    Catalog,
    #[strum(serialize = "DECK_CLAW_INDEX")]
    Index,
    #[strum(serialize = "DECK_CLAW_FETCH_TIMEOUT_SECS")]
    FetchTimeoutSecs,
}

impl EnvVar {
    pub fn read(&self) -> Option<String> {
        env::var(self.to_string()).ok().filter(|s| !s.trim().is_empty())
    }
}

/// Everything one analysis run depends on, passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub format: Format,
    pub format_config: FormatConfig,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub skip: HashSet<String>,
    pub fetch_timeout: Duration,
}

impl RunConfig {
    pub fn new(format: Format, start: NaiveDate, end: NaiveDate) -> Self {
        RunConfig {
            format,
            format_config: FormatConfig::for_format(format),
            start,
            end,
            skip: HashSet::new(),
            fetch_timeout: fetch_timeout_from_env(),
        }
    }

    pub fn with_skip(mut self, skip: impl IntoIterator<Item = String>) -> Self {
        self.skip.extend(skip);
        self
    }
}

fn fetch_timeout_from_env() -> Duration {
    let secs = EnvVar::FetchTimeoutSecs
        .read()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
