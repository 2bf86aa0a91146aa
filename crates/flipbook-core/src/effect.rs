//! Side-effect commands emitted by the reader core.
//!
//! Every observable consequence of a transition is described as an
//! [`Effect`] value. The application layer applies them, in order, to the
//! renderer, audio, and scheduler collaborators.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::id::{ClipId, NodeId};
use crate::scheduler::TimerTicket;

/// Visual state of a spread element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualState {
    /// The spread is the one on display.
    Active,
    /// The spread is hidden.
    Inactive,
    /// The spread is turning.
    Flipping,
}

/// A navigation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// The "previous page" control.
    Prev,
    /// The "next page" control.
    Next,
}

/// Category of a clip, used to stop conflicting sounds in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCategory {
    /// The paper rustle played on ordinary flips.
    PageTurn,
    /// Looping or idle character sounds.
    Ambient,
    /// The sound tied to an ending.
    Ending,
}

/// Art and sound shown when the reader reaches an ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingOutcome {
    /// Path of the ending image asset.
    pub image_path: String,
    /// Caption displayed under the image.
    pub caption: String,
    /// Clip played on arrival.
    pub sound: ClipId,
}

/// "Pages X-Y of N" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLabel {
    /// First page number on the spread (1-based).
    pub first: u32,
    /// Last page number on the spread.
    pub last: u32,
    /// Total number of pages along the longest path.
    pub total: u32,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pages {}-{} of {}", self.first, self.last, self.total)
    }
}

/// A single command for an external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Change the visual state of a spread.
    SetVisualState {
        /// The spread.
        node: NodeId,
        /// Its new state.
        state: VisualState,
    },
    /// Enable or disable a navigation control.
    SetControlEnabled {
        /// The control.
        control: Control,
        /// Whether it accepts input.
        enabled: bool,
    },
    /// Show or hide the navigation controls as a whole.
    SetControlsVisible {
        /// Whether the controls are shown.
        visible: bool,
    },
    /// Show or hide the yes/no prompt of a branch spread.
    SetChoicePromptVisible {
        /// Whether the prompt is shown.
        visible: bool,
    },
    /// Update the page indicator.
    SetPageLabel {
        /// The new label.
        label: PageLabel,
    },
    /// Display ending art.
    ShowEnding {
        /// The resolved ending.
        outcome: EndingOutcome,
    },
    /// Remove ending art.
    HideEnding,
    /// Show or hide a title-screen performer.
    SetPerformerVisible {
        /// Index of the performer.
        performer: usize,
        /// Whether it is on screen.
        visible: bool,
    },
    /// Start a clip.
    PlayAudio {
        /// The clip.
        clip: ClipId,
        /// Its category.
        category: SoundCategory,
    },
    /// Stop a single clip.
    StopAudio {
        /// The clip.
        clip: ClipId,
    },
    /// Stop every clip of a category.
    StopCategory {
        /// The category.
        category: SoundCategory,
    },
    /// Request a deferred callback.
    ScheduleAfter {
        /// How long to wait.
        delay: Duration,
        /// Ticket handed back when the delay elapses.
        ticket: TimerTicket,
    },
}

impl Effect {
    /// Returns a short type name for logging.
    #[must_use]
    pub fn effect_type(&self) -> &'static str {
        match self {
            Self::SetVisualState { .. } => "set_visual_state",
            Self::SetControlEnabled { .. } => "set_control_enabled",
            Self::SetControlsVisible { .. } => "set_controls_visible",
            Self::SetChoicePromptVisible { .. } => "set_choice_prompt_visible",
            Self::SetPageLabel { .. } => "set_page_label",
            Self::ShowEnding { .. } => "show_ending",
            Self::HideEnding => "hide_ending",
            Self::SetPerformerVisible { .. } => "set_performer_visible",
            Self::PlayAudio { .. } => "play_audio",
            Self::StopAudio { .. } => "stop_audio",
            Self::StopCategory { .. } => "stop_category",
            Self::ScheduleAfter { .. } => "schedule_after",
        }
    }

    /// Serializes the effect to JSON.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(self).expect("Effect serialization is infallible")
    }
}
