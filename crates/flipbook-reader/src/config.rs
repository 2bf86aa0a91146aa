//! Reader configuration, read from the environment at startup.

use std::io::Write;
use std::path::PathBuf;

use flipbook_core::rng::StdRandom;
use flipbook_narrative::domain::manifest::Comic;
use tracing::info;

use crate::console::ConsoleAudio;
use crate::error::AppError;

/// How effects are written to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable line per visible change.
    Text,
    /// One JSON object per effect.
    Json,
}

/// Startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Manifest to read; the bundled comic when unset.
    pub manifest: Option<PathBuf>,
    /// Seed for sound rolls; seeded from the OS when unset.
    pub seed: Option<u64>,
    /// Console output format.
    pub output: OutputFormat,
    /// Whether to open on the title-screen parade.
    pub intro: bool,
    /// Whether clips are announced; when off every play is refused.
    pub audio: bool,
}

impl ReaderConfig {
    /// Reads `FLIPBOOK_MANIFEST`, `FLIPBOOK_SEED`, `FLIPBOOK_OUTPUT`,
    /// `FLIPBOOK_INTRO` and `FLIPBOOK_AUDIO`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let manifest = lookup("FLIPBOOK_MANIFEST")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        let seed = lookup("FLIPBOOK_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .map_err(|e| AppError::Config(format!("FLIPBOOK_SEED must be a valid u64: {e}")))
            })
            .transpose()?;
        let output = match lookup("FLIPBOOK_OUTPUT").as_deref() {
            None | Some("text") => OutputFormat::Text,
            Some("json") => OutputFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "FLIPBOOK_OUTPUT must be text or json, got {other}"
                )));
            }
        };
        let intro = switch(&lookup, "FLIPBOOK_INTRO")?;
        let audio = switch(&lookup, "FLIPBOOK_AUDIO")?;

        Ok(Self {
            manifest,
            seed,
            output,
            intro,
            audio,
        })
    }

    /// Loads and validates the configured comic.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the manifest cannot be read and
    /// `AppError::Manifest` if it is invalid.
    pub fn load_comic(&self) -> Result<Comic, AppError> {
        let comic = match &self.manifest {
            Some(path) => {
                info!(path = %path.display(), "reading manifest");
                Comic::from_yaml(&std::fs::read_to_string(path)?)?
            }
            None => Comic::walrus()?,
        };
        Ok(comic)
    }

    /// The random source for sound rolls.
    #[must_use]
    pub fn rng(&self) -> StdRandom {
        self.seed.map_or_else(StdRandom::from_os, StdRandom::seeded)
    }

    /// The console audio player, muted when audio is off.
    pub fn audio_player<W: Write>(&self, out: W) -> ConsoleAudio<W> {
        let player = ConsoleAudio::new(out, self.output);
        if self.audio { player } else { player.muted() }
    }
}

/// An on/off variable, on when unset.
fn switch(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<bool, AppError> {
    match lookup(key).as_deref() {
        None | Some("on") => Ok(true),
        Some("off") => Ok(false),
        Some(other) => Err(AppError::Config(format!(
            "{key} must be on or off, got {other}"
        ))),
    }
}
