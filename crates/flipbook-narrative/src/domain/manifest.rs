//! Comic manifests.
//!
//! A manifest bundles the story graph with the data the reader needs around
//! it: endings, sounds, flip timing, and the title-screen parade. It is read
//! from YAML and validated against the graph once, at load.

use std::time::Duration;

use flipbook_core::id::NodeId;
use flipbook_story::definition::StoryDefinition;
use flipbook_story::{StoryError, StoryGraph};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::parade::ParadeSettings;
use super::resolver::EndingCatalog;
use super::sounds::SoundBoard;

/// The manifest of the comic that ships with the reader.
pub const WALRUS_COMIC: &str = include_str!("../../assets/walrus.yaml");

/// Reasons a manifest is rejected at load.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The story section is invalid.
    #[error(transparent)]
    Story(#[from] StoryError),

    /// The document could not be parsed.
    #[error("manifest parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An ending spread has no outcome.
    #[error("ending {0} has no outcome")]
    UnresolvableEnding(NodeId),

    /// An outcome is keyed to a spread that is not an ending.
    #[error("outcome keyed to {0}, which is not an ending")]
    UnknownEndingNode(NodeId),

    /// A chance is not a probability.
    #[error("{field} must be within [0, 1], got {value}")]
    InvalidChance {
        /// The offending field.
        field: &'static str,
        /// Its value.
        value: f64,
    },

    /// Ambient sounds are enabled with no clips to play.
    #[error("ambient_chance is positive but no ambient clips are listed")]
    NoAmbientClips,

    /// A flip or parade delay is zero.
    #[error("{0} must be greater than zero")]
    ZeroDelay(&'static str),
}

/// Page-flip delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FlipTiming {
    /// Forward flip animation.
    pub forward_ms: u64,
    /// Backward flip animation.
    pub backward_ms: u64,
    /// Flourish on a page revealed by a backward flip.
    pub settle_ms: u64,
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            forward_ms: 800,
            backward_ms: 50,
            settle_ms: 50,
        }
    }
}

impl FlipTiming {
    /// Forward flip delay.
    #[must_use]
    pub fn forward(&self) -> Duration {
        Duration::from_millis(self.forward_ms)
    }

    /// Backward flip delay.
    #[must_use]
    pub fn backward(&self) -> Duration {
        Duration::from_millis(self.backward_ms)
    }

    /// Settle delay after a backward flip.
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        if self.forward_ms == 0 {
            return Err(ManifestError::ZeroDelay("forward_ms"));
        }
        if self.backward_ms == 0 {
            return Err(ManifestError::ZeroDelay("backward_ms"));
        }
        Ok(())
    }
}

/// Serialized manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComicManifest {
    /// Title shown by the host.
    pub title: String,
    /// The story graph.
    pub story: StoryDefinition,
    /// Ending art and sounds.
    pub endings: EndingCatalog,
    /// Arrival sounds.
    pub sounds: SoundBoard,
    /// Flip delays.
    #[serde(default)]
    pub timing: FlipTiming,
    /// Title-screen parade.
    #[serde(default)]
    pub parade: ParadeSettings,
}

/// A validated comic, ready to read.
#[derive(Debug, Clone)]
pub struct Comic {
    /// Title shown by the host.
    pub title: String,
    /// The story graph.
    pub graph: StoryGraph,
    /// Ending art and sounds.
    pub endings: EndingCatalog,
    /// Arrival sounds.
    pub sounds: SoundBoard,
    /// Flip delays.
    pub timing: FlipTiming,
    /// Title-screen parade.
    pub parade: ParadeSettings,
}

impl Comic {
    /// Validates a manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` if the story is invalid, an ending does not
    /// resolve, a chance is out of range, or a flip or parade delay is zero.
    pub fn from_manifest(manifest: ComicManifest) -> Result<Self, ManifestError> {
        let graph = StoryGraph::from_definition(&manifest.story)?;
        manifest.endings.validate(&graph)?;
        manifest.sounds.validate()?;
        manifest.timing.validate()?;
        manifest.parade.validate()?;

        info!(
            title = %manifest.title,
            spreads = graph.spread_count(),
            endings = graph.endings().count(),
            "comic loaded"
        );

        Ok(Self {
            title: manifest.title,
            graph,
            endings: manifest.endings,
            sounds: manifest.sounds,
            timing: manifest.timing,
            parade: manifest.parade,
        })
    }

    /// Parses and validates a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` on parse or validation failure.
    pub fn from_yaml(source: &str) -> Result<Self, ManifestError> {
        Self::from_manifest(serde_yaml::from_str(source)?)
    }

    /// The comic that ships with the reader.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` if the bundled manifest is invalid.
    pub fn walrus() -> Result<Self, ManifestError> {
        Self::from_yaml(WALRUS_COMIC)
    }
}
