//! Title-screen parade.
//!
//! Performers step on screen one after another, each staying for a while,
//! then the stage is cleared and the cycle starts over after a short rest.
//! Selecting a performer opens the book.

use std::time::Duration;

use flipbook_core::effect::Effect;
use flipbook_core::scheduler::{TimerChannel, TimerTicket};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::manifest::ManifestError;

/// Parade layout, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ParadeSettings {
    /// Number of performers; zero disables the parade.
    pub performers: usize,
    /// Gap between consecutive entrances.
    pub stagger_ms: u64,
    /// How long each performer stays.
    pub visible_ms: u64,
    /// Pause between clearing the stage and the next cycle.
    pub rest_ms: u64,
}

impl Default for ParadeSettings {
    fn default() -> Self {
        Self {
            performers: 0,
            stagger_ms: 3000,
            visible_ms: 2000,
            rest_ms: 1000,
        }
    }
}

impl ParadeSettings {
    /// Checks that every step of a running parade takes time.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::ZeroDelay` when performers are listed and a
    /// stagger, visible or rest period is zero.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.performers == 0 {
            return Ok(());
        }
        if self.stagger_ms == 0 {
            return Err(ManifestError::ZeroDelay("parade.stagger_ms"));
        }
        if self.visible_ms == 0 {
            return Err(ManifestError::ZeroDelay("parade.visible_ms"));
        }
        if self.rest_ms == 0 {
            return Err(ManifestError::ZeroDelay("parade.rest_ms"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CueAction {
    Show(usize),
    Hide(usize),
    ClearStage,
}

#[derive(Debug, Clone, Copy)]
struct Cue {
    at: Duration,
    action: CueAction,
}

/// The running parade.
#[derive(Debug)]
pub struct Parade {
    performers: usize,
    cues: Vec<Cue>,
    cycle: Duration,
    cursor: usize,
    elapsed: Duration,
    next_at: Duration,
    generation: u64,
    pending: Option<TimerTicket>,
    uncommitted_effects: Vec<Effect>,
}

impl Parade {
    /// Lays out one cycle of cues.
    #[must_use]
    pub fn new(settings: ParadeSettings) -> Self {
        let stagger = Duration::from_millis(settings.stagger_ms);
        let visible = Duration::from_millis(settings.visible_ms);
        let mut cues = Vec::with_capacity(settings.performers * 2 + 1);
        let mut entrance = Duration::ZERO;
        for performer in 0..settings.performers {
            cues.push(Cue {
                at: entrance,
                action: CueAction::Show(performer),
            });
            cues.push(Cue {
                at: entrance + visible,
                action: CueAction::Hide(performer),
            });
            entrance += stagger;
        }
        let clear_at = entrance + visible;
        cues.push(Cue {
            at: clear_at,
            action: CueAction::ClearStage,
        });
        cues.sort_by_key(|cue| cue.at);

        Self {
            performers: settings.performers,
            cues,
            cycle: clear_at + Duration::from_millis(settings.rest_ms),
            cursor: 0,
            elapsed: Duration::ZERO,
            next_at: Duration::ZERO,
            generation: 0,
            pending: None,
            uncommitted_effects: Vec::new(),
        }
    }

    /// Whether a cue is scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Hides everyone and starts the first cycle.
    pub fn start(&mut self) {
        if self.performers == 0 {
            return;
        }
        self.clear_stage();
        self.cursor = 0;
        self.elapsed = Duration::ZERO;
        self.run_due_cues();
    }

    /// Stops the parade and hides everyone. Pending cues become stale.
    pub fn stop(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
            self.clear_stage();
        }
    }

    /// Applies the cue a ticket was scheduled for. Returns `false` for a
    /// stale or foreign ticket.
    pub fn on_timer(&mut self, ticket: TimerTicket) -> bool {
        if self.pending != Some(ticket) {
            debug!(%ticket, "ignoring stale parade ticket");
            return false;
        }
        self.pending = None;
        self.elapsed = self.next_at;
        if self.elapsed >= self.cycle {
            self.cursor = 0;
            self.elapsed = Duration::ZERO;
        }
        self.run_due_cues();
        true
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

    fn run_due_cues(&mut self) {
        while let Some(cue) = self.cues.get(self.cursor).copied() {
            if cue.at > self.elapsed {
                break;
            }
            match cue.action {
                CueAction::Show(performer) => self.set_visible(performer, true),
                CueAction::Hide(performer) => self.set_visible(performer, false),
                CueAction::ClearStage => self.clear_stage(),
            }
            self.cursor += 1;
        }

        self.next_at = self
            .cues
            .get(self.cursor)
            .map_or(self.cycle, |cue| cue.at);
        self.generation += 1;
        let ticket = TimerTicket::new(TimerChannel::Parade, self.generation);
        self.pending = Some(ticket);
        self.uncommitted_effects.push(Effect::ScheduleAfter {
            delay: self.next_at - self.elapsed,
            ticket,
        });
    }

    fn clear_stage(&mut self) {
        for performer in 0..self.performers {
            self.set_visible(performer, false);
        }
    }

    fn set_visible(&mut self, performer: usize, visible: bool) {
        self.uncommitted_effects.push(Effect::SetPerformerVisible { performer, visible });
    }
}
