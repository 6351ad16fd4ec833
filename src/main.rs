use match_deck::config::Settings;
use match_deck::core::{DeckError, MatchDeck};
use match_deck::models::FilterSpec;
use match_deck::services::{HttpMatchDirectory, LogNavigator, SessionStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Filter toggles from the command line
fn filter_from_args() -> FilterSpec {
    let mut filter = FilterSpec::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--batch-end" => filter.by_batch_end = true,
            "--day-start" => filter.by_day_start = true,
            "--distance" => filter.by_distance = true,
            other => tracing::warn!("Ignoring unknown argument: {}", other),
        }
    }
    filter
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    match &settings {
        Ok(s) => init_logging(&s.logging.level, &s.logging.format),
        Err(_) => init_logging("info", "compact"),
    }
    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded, matching service at {}", settings.directory.base_url);

    let session = SessionStore::from_env();
    let directory = Arc::new(HttpMatchDirectory::new(
        settings.directory.base_url.clone(),
        session.token().map(str::to_string),
        settings.directory_options(),
    )?);

    let mut deck = MatchDeck::with_directory(
        directory,
        Arc::new(LogNavigator),
        settings.deck_options(),
        settings.retry_policy(),
    );

    match deck.populate(&session).await {
        Ok(report) => info!("Population finished: {:?}", report),
        Err(DeckError::SessionMissing) => {
            info!("No session available, set MATCH_DECK_SESSION_ID to log in");
            deck.shutdown().await?;
            return Ok(());
        }
        Err(e) => {
            error!("Population abandoned: {}", e);
            deck.shutdown().await?;
            return Err(e.into());
        }
    }

    let filter = filter_from_args();
    if !filter.is_empty() {
        match deck.refilter(&filter).await {
            Ok(report) => info!("Filter report: {:?}", report),
            Err(e) => error!("Keeping unfiltered deck: {}", e),
        }
    }

    println!("{}", serde_json::to_string_pretty(&deck.snapshot())?);

    let report = deck.shutdown().await?;
    info!("Outbox report: {:?}", report);
    Ok(())
}
