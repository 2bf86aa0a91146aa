//! Flipbook reader — host error types.

use flipbook_narrative::domain::manifest::ManifestError;
use thiserror::Error;

/// Startup and runtime errors for the terminal reader.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The comic manifest could not be loaded.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Reading the manifest or the console failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
