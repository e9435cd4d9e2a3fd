//! GSA Collector — Binary Entrypoint
//! One batch run: load reference data and feed lists, collect + normalize,
//! merge, publish `data.json` atomically, reporting progress to `status.json`.

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gsa_collector::airports::AirportRegistry;
use gsa_collector::collector::Collector;
use gsa_collector::geomatch::GeoMatcher;
use gsa_collector::ingest::config::FeedsConfig;
use gsa_collector::ingest::FeedClient;
use gsa_collector::normalize::Normalizer;
use gsa_collector::relevance::WatchTerms;
use gsa_collector::settings::Settings;
use gsa_collector::status::StatusWriter;
use gsa_collector::translate;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op where the variables come from the host.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env();

    let registry = AirportRegistry::load(&settings.airports_path);
    if registry.is_empty() {
        tracing::warn!("airport registry is empty; geo enrichment disabled");
    }
    let terms = WatchTerms::load(&settings.watch_terms_path);
    let feeds = FeedsConfig::load(&settings.feeds_path);
    let translator = translate::from_env();
    info!(
        feeds = feeds.total_feeds(),
        translator = translator.name(),
        "collector starting"
    );

    let normalizer = Normalizer::new(GeoMatcher::new(registry), terms, translator);
    let status = StatusWriter::new(settings.status_file.clone());
    let collector = Collector::new(FeedClient::new()?, feeds, normalizer, status);

    let published = collector.run(&settings.data_file).await?;
    info!(items = published, "run complete");
    Ok(())
}
