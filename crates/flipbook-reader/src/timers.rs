//! Wall-clock scheduler backed by the tokio runtime.

use std::time::Duration;

use flipbook_core::scheduler::{Scheduler, TimerTicket};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Sleeps on the runtime and sends each ticket back over a channel when its
/// delay elapses. Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: UnboundedSender<TimerTicket>,
}

impl TokioScheduler {
    /// Creates a scheduler delivering into `tx`.
    #[must_use]
    pub fn new(tx: UnboundedSender<TimerTicket>) -> Self {
        Self { tx }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&mut self, delay: Duration, ticket: TimerTicket) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(ticket).is_err() {
                debug!(%ticket, "reader closed before timer fired");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use flipbook_core::scheduler::TimerChannel;
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn test_tickets_arrive_in_delay_order() {
        // Arrange
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        let slow = TimerTicket::new(TimerChannel::Flip, 1);
        let fast = TimerTicket::new(TimerChannel::Settle, 2);

        // Act
        scheduler.schedule_after(Duration::from_millis(60), slow);
        scheduler.schedule_after(Duration::from_millis(5), fast);

        // Assert
        assert_eq!(rx.recv().await, Some(fast));
        assert_eq!(rx.recv().await, Some(slow));
    }
}
