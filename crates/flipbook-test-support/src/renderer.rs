//! Recording renderer for tests.

use flipbook_core::effect::{Control, Effect, EndingOutcome, PageLabel, VisualState};
use flipbook_core::id::NodeId;
use flipbook_core::ports::Renderer;

/// A renderer that records all calls and answers questions about the
/// resulting screen.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<Effect>,
}

impl RecordingRenderer {
    /// Every call, in order.
    #[must_use]
    pub fn calls(&self) -> &[Effect] {
        &self.calls
    }

    /// Last visual state set for a spread.
    #[must_use]
    pub fn visual_state(&self, node: &NodeId) -> Option<VisualState> {
        self.calls.iter().rev().find_map(|call| match call {
            Effect::SetVisualState { node: n, state } if n == node => Some(*state),
            _ => None,
        })
    }

    /// Spreads whose last visual state is `Active`.
    #[must_use]
    pub fn active_spreads(&self) -> Vec<NodeId> {
        let mut active: Vec<NodeId> = Vec::new();
        for call in &self.calls {
            if let Effect::SetVisualState { node, .. } = call {
                if !active.contains(node) {
                    active.push(node.clone());
                }
            }
        }
        active.retain(|node| self.visual_state(node) == Some(VisualState::Active));
        active
    }

    /// Last enabled state set for a control.
    #[must_use]
    pub fn control_enabled(&self, control: Control) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            Effect::SetControlEnabled { control: c, enabled } if *c == control => Some(*enabled),
            _ => None,
        })
    }

    /// Last visibility set for the navigation controls.
    #[must_use]
    pub fn controls_visible(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            Effect::SetControlsVisible { visible } => Some(*visible),
            _ => None,
        })
    }

    /// Last visibility set for the choice prompt.
    #[must_use]
    pub fn choice_prompt_visible(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            Effect::SetChoicePromptVisible { visible } => Some(*visible),
            _ => None,
        })
    }

    /// Last visibility set for a performer.
    #[must_use]
    pub fn performer_visible(&self, performer: usize) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            Effect::SetPerformerVisible {
                performer: p,
                visible,
            } if *p == performer => Some(*visible),
            _ => None,
        })
    }

    /// Most recent page label.
    #[must_use]
    pub fn page_label(&self) -> Option<PageLabel> {
        self.calls.iter().rev().find_map(|call| match call {
            Effect::SetPageLabel { label } => Some(*label),
            _ => None,
        })
    }

    /// The ending on screen, if any.
    #[must_use]
    pub fn ending(&self) -> Option<&EndingOutcome> {
        self.calls.iter().rev().find_map(|call| match call {
            Effect::ShowEnding { outcome } => Some(Some(outcome)),
            Effect::HideEnding => Some(None),
            _ => None,
        })?
    }
}

impl Renderer for RecordingRenderer {
    fn set_visual_state(&mut self, node: &NodeId, state: VisualState) {
        self.calls.push(Effect::SetVisualState {
            node: node.clone(),
            state,
        });
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        self.calls.push(Effect::SetControlEnabled { control, enabled });
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.calls.push(Effect::SetControlsVisible { visible });
    }

    fn set_choice_prompt_visible(&mut self, visible: bool) {
        self.calls.push(Effect::SetChoicePromptVisible { visible });
    }

    fn set_page_label(&mut self, label: &PageLabel) {
        self.calls.push(Effect::SetPageLabel { label: *label });
    }

    fn show_ending(&mut self, outcome: &EndingOutcome) {
        self.calls.push(Effect::ShowEnding {
            outcome: outcome.clone(),
        });
    }

    fn hide_ending(&mut self) {
        self.calls.push(Effect::HideEnding);
    }

    fn set_performer_visible(&mut self, performer: usize, visible: bool) {
        self.calls
            .push(Effect::SetPerformerVisible { performer, visible });
    }
}
