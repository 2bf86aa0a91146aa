//! Test audio players — mock `AudioPlayer` implementations for tests.

use flipbook_core::effect::SoundCategory;
use flipbook_core::error::AudioError;
use flipbook_core::id::ClipId;
use flipbook_core::ports::AudioPlayer;

/// A command received by a test audio player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    /// `play` was called.
    Play(ClipId, SoundCategory),
    /// `stop` was called.
    Stop(ClipId),
    /// `stop_category` was called.
    StopCategory(SoundCategory),
}

/// An audio player that records every command and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    commands: Vec<AudioCommand>,
}

impl RecordingAudio {
    /// Every command, in order.
    #[must_use]
    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    /// Clips played, in order.
    #[must_use]
    pub fn plays(&self) -> Vec<ClipId> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                AudioCommand::Play(clip, _) => Some(clip.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forgets recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, clip: &ClipId, category: SoundCategory) -> Result<(), AudioError> {
        self.commands
            .push(AudioCommand::Play(clip.clone(), category));
        Ok(())
    }

    fn stop(&mut self, clip: &ClipId) {
        self.commands.push(AudioCommand::Stop(clip.clone()));
    }

    fn stop_category(&mut self, category: SoundCategory) {
        self.commands.push(AudioCommand::StopCategory(category));
    }
}

/// An audio player that refuses every clip, as a browser does before the
/// first user gesture. Useful for testing that playback failures never block
/// navigation.
#[derive(Debug, Default)]
pub struct FailingAudio {
    attempts: usize,
}

impl FailingAudio {
    /// Number of `play` calls received.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl AudioPlayer for FailingAudio {
    fn play(&mut self, clip: &ClipId, _category: SoundCategory) -> Result<(), AudioError> {
        self.attempts += 1;
        Err(AudioError::PlaybackDenied(clip.clone()))
    }

    fn stop(&mut self, _clip: &ClipId) {}

    fn stop_category(&mut self, _category: SoundCategory) {}
}
