//! Flipbook reader entry point.

use std::error::Error;

use flipbook_reader::config::ReaderConfig;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber. Logs go to stderr; stdout carries the comic.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    // Read configuration from environment.
    let config = ReaderConfig::from_env()?;

    let session_id = Uuid::new_v4();
    tracing::info!(%session_id, "Starting Flipbook reader");

    flipbook_reader::run(config)
        .instrument(tracing::info_span!("reader_session", %session_id))
        .await?;

    Ok(())
}
