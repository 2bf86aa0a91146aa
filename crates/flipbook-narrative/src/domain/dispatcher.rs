//! Side-effect dispatch.
//!
//! Turns a completed transition into the ordered commands the collaborators
//! apply: stops first, then at most one play, then visual updates.

use flipbook_core::effect::{Control, Effect, SoundCategory, VisualState};
use flipbook_core::id::NodeId;
use flipbook_core::rng::DeterministicRng;
use flipbook_story::{StoryGraph, StoryNode};
use serde::{Deserialize, Serialize};

use super::choices::ChoiceState;
use super::resolver::EndingCatalog;
use super::sounds::SoundBoard;

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// A forward flip along `next`.
    Advance,
    /// A backward flip along `prev`.
    Retreat,
    /// A forward flip onto a chosen branch.
    Choice,
    /// A reset to the start spread.
    Restart,
}

/// A transition between two spreads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The spread being left.
    pub from: NodeId,
    /// The spread arrived at.
    pub to: NodeId,
    /// What caused it.
    pub kind: TransitionKind,
}

/// Maps transitions to side effects using the book's sound and ending data.
#[derive(Debug, Clone, Copy)]
pub struct SideEffectDispatcher<'a> {
    graph: &'a StoryGraph,
    endings: &'a EndingCatalog,
    sounds: &'a SoundBoard,
}

impl<'a> SideEffectDispatcher<'a> {
    /// Creates a dispatcher over the book's data.
    #[must_use]
    pub fn new(graph: &'a StoryGraph, endings: &'a EndingCatalog, sounds: &'a SoundBoard) -> Self {
        Self {
            graph,
            endings,
            sounds,
        }
    }

    /// Effects for a completed transition.
    ///
    /// # Panics
    ///
    /// Panics if the target spread is not in the graph or an ending does not
    /// resolve. Both are ruled out when the book is loaded, so reaching them
    /// means the graph and the navigation logic disagree.
    pub fn dispatch(
        &self,
        transition: &Transition,
        choices: &ChoiceState,
        rng: &mut dyn DeterministicRng,
    ) -> Vec<Effect> {
        let node = self.graph.node(&transition.to).unwrap_or_else(|| {
            panic!(
                "unreachable state: transition targets unknown spread {}",
                transition.to
            )
        });

        if transition.kind == TransitionKind::Restart {
            return self.restart(transition, node);
        }
        if node.is_ending() {
            return self.ending(transition, choices);
        }

        let mut effects = vec![Effect::StopCategory {
            category: SoundCategory::Ending,
        }];
        if let Some((clip, category)) = self.sounds.arrival_cue(rng) {
            // A clip still sounding from an earlier arrival restarts.
            effects.push(Effect::StopAudio { clip: clip.clone() });
            effects.push(Effect::PlayAudio { clip, category });
        }
        self.show(&mut effects, transition);
        self.navigation(&mut effects, node);
        effects
    }

    fn ending(&self, transition: &Transition, choices: &ChoiceState) -> Vec<Effect> {
        let outcome = self
            .endings
            .outcome_for(&transition.to, choices)
            .unwrap_or_else(|| {
                panic!(
                    "unreachable state: ending {} has no outcome for {choices:?}",
                    transition.to
                )
            });

        let mut effects = vec![
            Effect::StopCategory {
                category: SoundCategory::Ambient,
            },
            Effect::StopCategory {
                category: SoundCategory::PageTurn,
            },
            Effect::PlayAudio {
                clip: outcome.sound.clone(),
                category: SoundCategory::Ending,
            },
        ];
        self.show(&mut effects, transition);
        effects.extend([
            Effect::SetChoicePromptVisible { visible: false },
            Effect::SetControlEnabled {
                control: Control::Prev,
                enabled: false,
            },
            Effect::SetControlEnabled {
                control: Control::Next,
                enabled: false,
            },
            Effect::SetControlsVisible { visible: false },
            Effect::ShowEnding {
                outcome: outcome.clone(),
            },
        ]);
        effects
    }

    fn restart(&self, transition: &Transition, start: &StoryNode) -> Vec<Effect> {
        let mut effects = vec![
            Effect::StopCategory {
                category: SoundCategory::PageTurn,
            },
            Effect::StopCategory {
                category: SoundCategory::Ambient,
            },
            Effect::StopCategory {
                category: SoundCategory::Ending,
            },
            Effect::HideEnding,
        ];
        self.show(&mut effects, transition);
        effects.push(Effect::SetControlsVisible { visible: true });
        self.navigation(&mut effects, start);
        effects
    }

    /// Clears the vacated spread and shows the target.
    fn show(&self, effects: &mut Vec<Effect>, transition: &Transition) {
        if transition.from != transition.to {
            effects.push(Effect::SetVisualState {
                node: transition.from.clone(),
                state: VisualState::Inactive,
            });
        }
        effects.push(Effect::SetVisualState {
            node: transition.to.clone(),
            state: VisualState::Active,
        });
        if let Some(label) = self.graph.page_label(&transition.to) {
            effects.push(Effect::SetPageLabel { label });
        }
    }

    fn navigation(&self, effects: &mut Vec<Effect>, node: &StoryNode) {
        effects.extend([
            Effect::SetChoicePromptVisible {
                visible: node.is_branch(),
            },
            Effect::SetControlEnabled {
                control: Control::Prev,
                enabled: node.prev().is_some(),
            },
            Effect::SetControlEnabled {
                control: Control::Next,
                enabled: node.next().is_some(),
            },
        ]);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use flipbook_core::effect::EndingOutcome;
    use flipbook_core::id::{Choice, ClipId};
    use flipbook_test_support::{MockRng, ScriptedRng};

    use super::*;
    use crate::domain::resolver::EndingTable;

    const STORY: &str = r#"
start: "1"
nodes:
  "1": { next: "2" }
  "2": { choices: { yes: "3", no: "3n" } }
  "3": { choices: { yes: "end-yy", no: "end-yn" } }
  "3n": { choices: { yes: "end-ny", no: "end-nn" } }
  "end-yy": { ending: true }
  "end-yn": { ending: true }
  "end-ny": { ending: true }
  "end-nn": { ending: true }
"#;

    fn outcome(tag: &str) -> EndingOutcome {
        EndingOutcome {
            image_path: format!("{tag}.png"),
            caption: tag.to_owned(),
            sound: ClipId::new(format!("ending-{tag}")),
        }
    }

    fn fixtures() -> (StoryGraph, EndingCatalog, SoundBoard) {
        let graph = StoryGraph::from_yaml(STORY).unwrap();
        let endings = EndingCatalog {
            by_choices: Some(EndingTable {
                yes_yes: outcome("yy"),
                yes_no: outcome("yn"),
                no_yes: outcome("ny"),
                no_no: outcome("nn"),
            }),
            by_node: BTreeMap::new(),
        };
        let sounds = SoundBoard::page_turn_only(ClipId::from("page-turn"));
        (graph, endings, sounds)
    }

    fn transition(from: &str, to: &str, kind: TransitionKind) -> Transition {
        Transition {
            from: NodeId::from(from),
            to: NodeId::from(to),
            kind,
        }
    }

    #[test]
    fn test_advance_orders_stops_play_then_visuals() {
        // Arrange
        let (graph, endings, sounds) = fixtures();
        let dispatcher = SideEffectDispatcher::new(&graph, &endings, &sounds);

        // Act
        let effects = dispatcher.dispatch(
            &transition("1", "2", TransitionKind::Advance),
            &ChoiceState::default(),
            &mut MockRng,
        );

        // Assert
        assert_eq!(
            effects[0],
            Effect::StopCategory {
                category: SoundCategory::Ending
            }
        );
        assert_eq!(
            effects[1],
            Effect::StopAudio {
                clip: ClipId::from("page-turn")
            }
        );
        assert_eq!(
            effects[2],
            Effect::PlayAudio {
                clip: ClipId::from("page-turn"),
                category: SoundCategory::PageTurn
            }
        );
        assert!(effects.contains(&Effect::SetVisualState {
            node: NodeId::from("1"),
            state: VisualState::Inactive
        }));
        assert!(effects.contains(&Effect::SetVisualState {
            node: NodeId::from("2"),
            state: VisualState::Active
        }));
        assert!(effects.contains(&Effect::SetChoicePromptVisible { visible: true }));
        assert!(effects.contains(&Effect::SetControlEnabled {
            control: Control::Next,
            enabled: false
        }));
        assert!(effects.contains(&Effect::SetControlEnabled {
            control: Control::Prev,
            enabled: true
        }));
    }

    #[test]
    fn test_missed_sound_roll_emits_no_play() {
        let (graph, endings, mut sounds) = fixtures();
        sounds.page_turn_chance = 0.3;
        let dispatcher = SideEffectDispatcher::new(&graph, &endings, &sounds);
        let mut rng = ScriptedRng::rolls(vec![0.3]);

        let effects = dispatcher.dispatch(
            &transition("1", "2", TransitionKind::Advance),
            &ChoiceState::default(),
            &mut rng,
        );

        assert!(
            !effects
                .iter()
                .any(|effect| matches!(effect, Effect::PlayAudio { .. }))
        );
    }

    #[test]
    fn test_ending_plays_exactly_one_resolved_sound_after_stops() {
        // Arrange
        let (graph, endings, sounds) = fixtures();
        let dispatcher = SideEffectDispatcher::new(&graph, &endings, &sounds);
        let choices = ChoiceState {
            first: Some(Choice::Yes),
            second: Some(Choice::No),
        };

        // Act
        let effects = dispatcher.dispatch(
            &transition("3", "end-yn", TransitionKind::Choice),
            &choices,
            &mut MockRng,
        );

        // Assert
        let plays: Vec<usize> = effects
            .iter()
            .enumerate()
            .filter(|(_, effect)| matches!(effect, Effect::PlayAudio { .. }))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(plays.len(), 1);
        let page_turn_stop = effects
            .iter()
            .position(|effect| {
                effect
                    == &Effect::StopCategory {
                        category: SoundCategory::PageTurn,
                    }
            })
            .unwrap();
        assert!(page_turn_stop < plays[0]);
        assert_eq!(
            effects[plays[0]],
            Effect::PlayAudio {
                clip: ClipId::from("ending-yn"),
                category: SoundCategory::Ending
            }
        );
        assert!(effects.contains(&Effect::SetControlsVisible { visible: false }));
        assert!(effects.contains(&Effect::ShowEnding {
            outcome: outcome("yn")
        }));
    }

    #[test]
    fn test_restart_stops_everything_and_shows_start() {
        let (graph, endings, sounds) = fixtures();
        let dispatcher = SideEffectDispatcher::new(&graph, &endings, &sounds);

        let effects = dispatcher.dispatch(
            &transition("end-nn", "1", TransitionKind::Restart),
            &ChoiceState::default(),
            &mut MockRng,
        );

        assert!(
            !effects
                .iter()
                .any(|effect| matches!(effect, Effect::PlayAudio { .. }))
        );
        assert!(effects.contains(&Effect::HideEnding));
        assert!(effects.contains(&Effect::SetControlsVisible { visible: true }));
        assert!(effects.contains(&Effect::SetVisualState {
            node: NodeId::from("end-nn"),
            state: VisualState::Inactive
        }));
        assert!(effects.contains(&Effect::SetControlEnabled {
            control: Control::Prev,
            enabled: false
        }));
    }

    #[test]
    #[should_panic(expected = "unreachable state")]
    fn test_unknown_target_is_a_fault() {
        let (graph, endings, sounds) = fixtures();
        let dispatcher = SideEffectDispatcher::new(&graph, &endings, &sounds);

        let _ = dispatcher.dispatch(
            &transition("1", "nowhere", TransitionKind::Advance),
            &ChoiceState::default(),
            &mut MockRng,
        );
    }
}
