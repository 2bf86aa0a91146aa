//! Collaborator ports.
//!
//! The reader core never touches a document tree or a sound card. It calls
//! these capabilities, which a host implements for its platform.

use crate::effect::{Control, EndingOutcome, PageLabel, SoundCategory, VisualState};
use crate::error::AudioError;
use crate::id::{ClipId, NodeId};

/// Rendering capability.
pub trait Renderer {
    /// Set the visual state of a spread.
    fn set_visual_state(&mut self, node: &NodeId, state: VisualState);

    /// Enable or disable a navigation control.
    fn set_control_enabled(&mut self, control: Control, enabled: bool);

    /// Show or hide the navigation controls as a whole.
    fn set_controls_visible(&mut self, visible: bool);

    /// Show or hide the yes/no prompt.
    fn set_choice_prompt_visible(&mut self, visible: bool);

    /// Update the page indicator.
    fn set_page_label(&mut self, label: &PageLabel);

    /// Display ending art.
    fn show_ending(&mut self, outcome: &EndingOutcome);

    /// Remove ending art.
    fn hide_ending(&mut self);

    /// Show or hide a title-screen performer.
    fn set_performer_visible(&mut self, performer: usize, visible: bool);
}

/// Audio capability. Playback is fire-and-forget.
pub trait AudioPlayer {
    /// Start a clip.
    ///
    /// # Errors
    ///
    /// Returns `AudioError` if the platform refuses or does not know the clip.
    fn play(&mut self, clip: &ClipId, category: SoundCategory) -> Result<(), AudioError>;

    /// Stop a single clip if it is playing.
    fn stop(&mut self, clip: &ClipId);

    /// Stop every playing clip of a category.
    fn stop_category(&mut self, category: SoundCategory);
}
