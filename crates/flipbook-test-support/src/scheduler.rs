//! Virtual-clock scheduler for tests.

use std::time::Duration;

use flipbook_core::scheduler::{Scheduler, TimerTicket};

/// A scheduler that never sleeps. Tickets are queued against a virtual clock
/// and delivered by the test, earliest first, in scheduling order on ties.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    sequence: u64,
    queue: Vec<(Duration, u64, TimerTicket)>,
}

impl ManualScheduler {
    /// Virtual time elapsed so far.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tickets waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Advances the clock to the earliest ticket and returns it along with
    /// the time it fired.
    pub fn fire_next(&mut self) -> Option<(Duration, TimerTicket)> {
        let (index, _) = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|(_, (due, seq, _))| (*due, *seq))?;
        let (due, _, ticket) = self.queue.remove(index);
        self.now = self.now.max(due);
        Some((self.now, ticket))
    }

    /// Returns the earliest ticket due within `deadline` of the current
    /// virtual time, advancing the clock to it. Returns `None` and advances
    /// the clock by `deadline` when nothing is due.
    pub fn fire_within(&mut self, deadline: Duration) -> Option<(Duration, TimerTicket)> {
        let horizon = self.now + deadline;
        let due = self
            .queue
            .iter()
            .map(|(due, _, _)| *due)
            .min()
            .filter(|due| *due <= horizon);
        if due.is_none() {
            self.now = horizon;
            return None;
        }
        self.fire_next()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay: Duration, ticket: TimerTicket) {
        self.sequence += 1;
        self.queue.push((self.now + delay, self.sequence, ticket));
    }
}

#[cfg(test)]
mod tests {
    use flipbook_core::scheduler::TimerChannel;

    use super::*;

    #[test]
    fn test_fires_in_due_order_and_advances_clock() {
        // Arrange
        let mut scheduler = ManualScheduler::default();
        let late = TimerTicket::new(TimerChannel::Flip, 1);
        let early = TimerTicket::new(TimerChannel::Settle, 2);
        scheduler.schedule_after(Duration::from_millis(800), late);
        scheduler.schedule_after(Duration::from_millis(50), early);

        // Act
        let first = scheduler.fire_next();
        let second = scheduler.fire_next();

        // Assert
        assert_eq!(first, Some((Duration::from_millis(50), early)));
        assert_eq!(second, Some((Duration::from_millis(800), late)));
        assert_eq!(scheduler.fire_next(), None);
    }

    #[test]
    fn test_fire_within_respects_deadline() {
        let mut scheduler = ManualScheduler::default();
        let ticket = TimerTicket::new(TimerChannel::Flip, 1);
        scheduler.schedule_after(Duration::from_millis(800), ticket);

        assert_eq!(scheduler.fire_within(Duration::from_millis(500)), None);
        assert_eq!(scheduler.now(), Duration::from_millis(500));
        assert_eq!(
            scheduler.fire_within(Duration::from_millis(500)),
            Some((Duration::from_millis(800), ticket))
        );
    }
}
