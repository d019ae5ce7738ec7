use std::io::{stdout, Write};

use anyhow::{Context as _, Result};
use dotenv::dotenv;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::DecklistCache;
use crate::catalog::ReferenceCardCatalog;
use crate::models::deck::Deck;
use crate::source::{discover_tournaments, IndexFileDiscovery, OfflineSource};

mod cache;
mod card_matcher;
mod catalog;
mod classifier;
mod cli;
mod context;
mod enricher;
mod error;
mod format_config;
mod models;
mod normalizer;
mod opt;
mod pipeline;
mod query;
mod report;
mod similarity;
mod source;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let invocation = cli::parse(&cli::cli().get_matches())?;
    let run = &invocation.run;

    let context = context::create_context().context("Failed to prepare data directories")?;
    let catalog_path = invocation.catalog.clone().unwrap_or(context.catalog_path);
    let index_path = invocation.index.clone().unwrap_or(context.index_path);
    let cache_dir = invocation.cache_dir.clone().unwrap_or(context.cache_dir);

    let catalog = ReferenceCardCatalog::load(&catalog_path)
        .with_context(|| format!("Failed to load card catalog from {:?}", catalog_path))?;
    if catalog.is_empty() {
        warn!("Card catalog {:?} holds no playable cards", catalog_path);
    }

    let discovery = IndexFileDiscovery::new(&index_path);
    let tournaments = discover_tournaments(&discovery, run.format, run.start, run.end, &run.skip)
        .await
        .with_context(|| format!("Failed to list tournaments from {:?}", index_path))?;

    let cache = DecklistCache::new(&cache_dir);
    let reports = pipeline::run_batch(&tournaments, &cache, &OfflineSource, &catalog, run).await;

    let mut out = stdout().lock();
    report::write_summary(&mut out, &reports)?;
    writeln!(out)?;

    let decks: Vec<Deck> = reports.into_iter().flat_map(|report| report.decks).collect();
    report::write_query(&mut out, &invocation.query, &decks)?;
    out.flush()?;
    Ok(())
}
