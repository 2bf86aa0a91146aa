//! Effect application.
//!
//! Applies drained effects, in order, to the host's collaborators.

use flipbook_core::effect::Effect;
use flipbook_core::ports::{AudioPlayer, Renderer};
use flipbook_core::rng::DeterministicRng;
use flipbook_core::scheduler::Scheduler;
use tracing::warn;

/// The host capabilities the reader drives.
pub struct Collaborators<'a> {
    /// Rendering capability.
    pub renderer: &'a mut dyn Renderer,
    /// Audio capability.
    pub audio: &'a mut dyn AudioPlayer,
    /// Deferred callbacks.
    pub scheduler: &'a mut dyn Scheduler,
    /// Randomness for sound selection.
    pub rng: &'a mut dyn DeterministicRng,
}

/// Applies effects in order. Audio failures are logged and swallowed so a
/// refused clip never blocks navigation.
pub fn apply_effects(effects: Vec<Effect>, collaborators: &mut Collaborators<'_>) {
    for effect in effects {
        apply(effect, collaborators);
    }
}

fn apply(effect: Effect, c: &mut Collaborators<'_>) {
    match effect {
        Effect::SetVisualState { node, state } => c.renderer.set_visual_state(&node, state),
        Effect::SetControlEnabled { control, enabled } => {
            c.renderer.set_control_enabled(control, enabled);
        }
        Effect::SetControlsVisible { visible } => c.renderer.set_controls_visible(visible),
        Effect::SetChoicePromptVisible { visible } => {
            c.renderer.set_choice_prompt_visible(visible);
        }
        Effect::SetPageLabel { label } => c.renderer.set_page_label(&label),
        Effect::ShowEnding { outcome } => c.renderer.show_ending(&outcome),
        Effect::HideEnding => c.renderer.hide_ending(),
        Effect::SetPerformerVisible { performer, visible } => {
            c.renderer.set_performer_visible(performer, visible);
        }
        Effect::PlayAudio { clip, category } => {
            if let Err(e) = c.audio.play(&clip, category) {
                warn!(error = %e, %clip, ?category, "audio playback failed");
            }
        }
        Effect::StopAudio { clip } => c.audio.stop(&clip),
        Effect::StopCategory { category } => c.audio.stop_category(category),
        Effect::ScheduleAfter { delay, ticket } => c.scheduler.schedule_after(delay, ticket),
    }
}
