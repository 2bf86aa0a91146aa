//! The page-navigation state machine.
//!
//! A [`ReaderSession`] owns where the reader is, what they have chosen, and
//! whether a flip is in progress. Every request either starts a flip (lock,
//! mark the vacated spread, schedule completion) or is rejected. Completion
//! arrives later as a [`TimerTicket`]; only the ticket of the flip currently
//! pending is honoured, so tickets issued before a restart are ignored.
//!
//! Effects are buffered and drained by the application layer, mirroring how
//! aggregates buffer uncommitted events.

use flipbook_core::effect::{Effect, VisualState};
use flipbook_core::error::NavigationError;
use flipbook_core::id::{Choice, NodeId};
use flipbook_core::rng::DeterministicRng;
use flipbook_core::scheduler::{TimerChannel, TimerTicket};
use flipbook_story::{Reach, StoryNode};
use serde::Serialize;
use tracing::{debug, info};

use super::choices::ChoiceState;
use super::dispatcher::{SideEffectDispatcher, Transition, TransitionKind};
use super::manifest::Comic;

/// Where the reader is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    /// The spread on display.
    pub current: NodeId,
    /// True while a flip has been dispatched and has not completed.
    pub is_animating: bool,
    /// Answers given so far.
    pub choices: ChoiceState,
}

impl NavigationState {
    fn initial(start: &NodeId) -> Self {
        Self {
            current: start.clone(),
            is_animating: false,
            choices: ChoiceState::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingFlip {
    ticket: TimerTicket,
    transition: Transition,
}

#[derive(Debug, Clone)]
struct PendingSettle {
    ticket: TimerTicket,
    node: NodeId,
}

/// The navigation state machine for one reader.
#[derive(Debug)]
pub struct ReaderSession {
    comic: Comic,
    state: NavigationState,
    generation: u64,
    pending_flip: Option<PendingFlip>,
    pending_settle: Option<PendingSettle>,
    uncommitted_effects: Vec<Effect>,
}

impl ReaderSession {
    /// Opens the comic on its start spread. The effects that present the
    /// start spread are buffered.
    #[must_use]
    pub fn new(comic: Comic) -> Self {
        let state = NavigationState::initial(comic.graph.start());
        let mut session = Self {
            comic,
            state,
            generation: 0,
            pending_flip: None,
            pending_settle: None,
            uncommitted_effects: Vec::new(),
        };
        session.present_start(session.state.current.clone());
        session
    }

    /// The comic being read.
    #[must_use]
    pub fn comic(&self) -> &Comic {
        &self.comic
    }

    /// Current navigation state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The spread on display.
    #[must_use]
    pub fn current(&self) -> &NodeId {
        &self.state.current
    }

    /// Whether a flip is in progress.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.is_animating
    }

    /// Effects produced since the last drain.
    #[must_use]
    pub fn uncommitted_effects(&self) -> &[Effect] {
        &self.uncommitted_effects
    }

    /// Takes the effects produced since the last drain.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.uncommitted_effects)
    }

    /// Flips forward along the current spread's `next` edge.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Locked` during a flip and
    /// `NavigationError::NoNextPage` when there is no forward edge.
    pub fn advance(&mut self) -> Result<(), NavigationError> {
        self.ensure_unlocked()?;
        let target = self
            .current_node()
            .next()
            .cloned()
            .ok_or_else(|| NavigationError::NoNextPage(self.state.current.clone()))?;
        self.begin_flip(target, TransitionKind::Advance);
        Ok(())
    }

    /// Flips back along the current spread's `prev` edge.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Locked` during a flip and
    /// `NavigationError::NoPreviousPage` when there is no backward edge.
    pub fn retreat(&mut self) -> Result<(), NavigationError> {
        self.ensure_unlocked()?;
        let target = self
            .current_node()
            .prev()
            .cloned()
            .ok_or_else(|| NavigationError::NoPreviousPage(self.state.current.clone()))?;
        self.begin_flip(target, TransitionKind::Retreat);
        Ok(())
    }

    /// Records an answer on a branch spread and flips to the chosen branch.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Locked` during a flip and
    /// `NavigationError::NotAChoice` off a branch spread.
    ///
    /// # Panics
    ///
    /// Panics if both choice slots are already filled, which graph
    /// validation rules out.
    pub fn choose(&mut self, choice: Choice) -> Result<(), NavigationError> {
        self.ensure_unlocked()?;
        let target = self
            .current_node()
            .branch_target(choice)
            .cloned()
            .ok_or_else(|| NavigationError::NotAChoice(self.state.current.clone()))?;
        let slot = self.state.choices.record(choice).unwrap_or_else(|| {
            panic!(
                "unreachable state: third decision recorded at {}",
                self.state.current
            )
        });
        info!(at = %self.state.current, %choice, ?slot, "choice recorded");
        self.begin_flip(target, TransitionKind::Choice);
        Ok(())
    }

    /// Flips straight to a spread on the current path.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Locked` during a flip,
    /// `NavigationError::AlreadyThere` for the spread on display, and
    /// `NavigationError::OffPath` for a spread not reachable along `next` or
    /// `prev` edges.
    pub fn flip_to(&mut self, target: &NodeId) -> Result<(), NavigationError> {
        self.ensure_unlocked()?;
        if *target == self.state.current {
            return Err(NavigationError::AlreadyThere(target.clone()));
        }
        let kind = match self.comic.graph.reach(&self.state.current, target) {
            Some(Reach::Forward) => TransitionKind::Advance,
            Some(Reach::Backward) => TransitionKind::Retreat,
            None => {
                return Err(NavigationError::OffPath {
                    from: self.state.current.clone(),
                    to: target.clone(),
                });
            }
        };
        self.begin_flip(target.clone(), kind);
        Ok(())
    }

    /// Returns to the start spread with no answers, whether or not a flip
    /// is in progress. Any pending completion becomes stale.
    pub fn restart(&mut self) {
        let from = self
            .pending_flip
            .take()
            .map_or_else(|| self.state.current.clone(), |flip| flip.transition.from);
        self.pending_settle = None;
        self.generation += 1;
        self.state = NavigationState::initial(self.comic.graph.start());
        info!(%from, "reader restarted");
        self.present_start(from);
    }

    /// Completes the deferred step a ticket was issued for. Returns `false`
    /// for a stale or foreign ticket, which changes nothing.
    pub fn complete(&mut self, ticket: TimerTicket, rng: &mut dyn DeterministicRng) -> bool {
        match ticket.channel {
            TimerChannel::Flip => self.complete_flip(ticket, rng),
            TimerChannel::Settle => self.complete_settle(ticket),
            TimerChannel::Parade => false,
        }
    }

    fn complete_flip(&mut self, ticket: TimerTicket, rng: &mut dyn DeterministicRng) -> bool {
        let Some(flip) = self
            .pending_flip
            .take_if(|pending| pending.ticket == ticket)
        else {
            debug!(%ticket, "ignoring stale flip ticket");
            return false;
        };
        let transition = flip.transition;

        if transition.kind == TransitionKind::Retreat {
            self.undo_choices_behind(&transition);
        }
        self.state.current = transition.to.clone();

        let dispatcher = SideEffectDispatcher::new(
            &self.comic.graph,
            &self.comic.endings,
            &self.comic.sounds,
        );
        let effects = dispatcher.dispatch(&transition, &self.state.choices, rng);
        self.uncommitted_effects.extend(effects);
        self.state.is_animating = false;

        let arrived_at_ending = self.current_node().is_ending();
        info!(
            from = %transition.from,
            to = %transition.to,
            kind = ?transition.kind,
            ending = arrived_at_ending,
            "flip completed"
        );

        if transition.kind == TransitionKind::Retreat {
            self.begin_settle(transition.to);
        }
        true
    }

    fn complete_settle(&mut self, ticket: TimerTicket) -> bool {
        let Some(settle) = self
            .pending_settle
            .take_if(|pending| pending.ticket == ticket)
        else {
            debug!(%ticket, "ignoring stale settle ticket");
            return false;
        };
        self.uncommitted_effects.push(Effect::SetVisualState {
            node: settle.node,
            state: VisualState::Active,
        });
        true
    }

    fn ensure_unlocked(&self) -> Result<(), NavigationError> {
        if self.state.is_animating {
            return Err(NavigationError::Locked);
        }
        Ok(())
    }

    fn current_node(&self) -> &StoryNode {
        self.comic
            .graph
            .node(&self.state.current)
            .unwrap_or_else(|| {
                panic!(
                    "unreachable state: current spread {} is not in the graph",
                    self.state.current
                )
            })
    }

    fn begin_flip(&mut self, to: NodeId, kind: TransitionKind) {
        let delay = match kind {
            TransitionKind::Retreat => self.comic.timing.backward(),
            TransitionKind::Advance | TransitionKind::Choice | TransitionKind::Restart => {
                self.comic.timing.forward()
            }
        };
        self.generation += 1;
        let ticket = TimerTicket::new(TimerChannel::Flip, self.generation);
        let from = self.state.current.clone();

        self.pending_settle = None;
        self.state.is_animating = true;
        self.uncommitted_effects.extend([
            Effect::SetVisualState {
                node: from.clone(),
                state: VisualState::Flipping,
            },
            Effect::ScheduleAfter { delay, ticket },
        ]);
        debug!(%from, %to, ?kind, %ticket, "flip started");
        self.pending_flip = Some(PendingFlip {
            ticket,
            transition: Transition { from, to, kind },
        });
    }

    fn begin_settle(&mut self, node: NodeId) {
        self.generation += 1;
        let ticket = TimerTicket::new(TimerChannel::Settle, self.generation);
        self.uncommitted_effects.extend([
            Effect::SetVisualState {
                node: node.clone(),
                state: VisualState::Flipping,
            },
            Effect::ScheduleAfter {
                delay: self.comic.timing.settle(),
                ticket,
            },
        ]);
        self.pending_settle = Some(PendingSettle { ticket, node });
    }

    /// Clears the answers given at branch spreads that a backward flip lands
    /// on or passes over.
    fn undo_choices_behind(&mut self, transition: &Transition) {
        let mut cursor = transition.from.clone();
        while cursor != transition.to {
            let prev = self
                .comic
                .graph
                .node(&cursor)
                .and_then(StoryNode::prev)
                .cloned()
                .unwrap_or_else(|| {
                    panic!(
                        "unreachable state: backward flip from {} cannot reach {}",
                        transition.from, transition.to
                    )
                });
            if self.comic.graph.node(&prev).is_some_and(StoryNode::is_branch) {
                self.state.choices.undo_last();
            }
            cursor = prev;
        }
    }

    fn present_start(&mut self, from: NodeId) {
        let transition = Transition {
            from,
            to: self.state.current.clone(),
            kind: TransitionKind::Restart,
        };
        let dispatcher = SideEffectDispatcher::new(
            &self.comic.graph,
            &self.comic.endings,
            &self.comic.sounds,
        );
        // Restart effects never roll for sounds.
        let effects = dispatcher.dispatch(&transition, &self.state.choices, &mut NoRandomness);
        self.uncommitted_effects.extend(effects);
    }
}

/// Stand-in for restart dispatch, which does not draw.
struct NoRandomness;

impl DeterministicRng for NoRandomness {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        1.0
    }
}
