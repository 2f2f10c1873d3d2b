use std::sync::Arc;

use anyhow::{bail, Result};
use baby_tracker_backend::config::AppConfig;
use baby_tracker_backend::domain::{AnalyticsService, SystemClock};
use baby_tracker_backend::storage::{CsvConnection, CsvEventRepository};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(child_id) = std::env::args().nth(1) else {
        bail!("usage: baby-status <child-id>");
    };

    let timezone = config.time_zone()?;
    info!("Opening data directory {} (time zone {})", config.data_directory.display(), timezone);
    let repository = Arc::new(CsvEventRepository::new(CsvConnection::new(&config.data_directory)?));

    let service = AnalyticsService::new(
        repository.clone(),
        repository,
        Arc::new(SystemClock),
        timezone,
        config.analytics.clone(),
    );

    let snapshot = service.current_status(&child_id).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
