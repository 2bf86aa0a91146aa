//! Timer abstraction for determinism.
//!
//! The core never sleeps. It asks the scheduler to hand a [`TimerTicket`]
//! back after a delay, and the host feeds the ticket into the session when
//! it fires. Tests fast-forward a manual scheduler instead of waiting.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which deferred step a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerChannel {
    /// Completion of an in-flight page flip.
    Flip,
    /// End of the flourish played on a page revealed by a backward flip.
    Settle,
    /// Next cue of the title-screen parade.
    Parade,
}

/// Handle for one deferred callback.
///
/// The generation is issued by the owner of the channel and only the most
/// recently issued generation is honoured, so tickets from before a restart
/// are ignored when they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerTicket {
    /// The deferred step this ticket completes.
    pub channel: TimerChannel,
    /// Monotonic generation within the channel.
    pub generation: u64,
}

impl TimerTicket {
    /// Creates a ticket.
    #[must_use]
    pub fn new(channel: TimerChannel, generation: u64) -> Self {
        Self {
            channel,
            generation,
        }
    }
}

impl fmt::Display for TimerTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.channel, self.generation)
    }
}

/// Abstraction over deferred callbacks: the sole source of asynchrony.
pub trait Scheduler {
    /// Arrange for `ticket` to be delivered back after `delay`.
    fn schedule_after(&mut self, delay: Duration, ticket: TimerTicket);
}
