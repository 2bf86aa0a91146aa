//! Reader choice slots.

use flipbook_core::id::Choice;
use serde::{Deserialize, Serialize};

/// Which slot a choice was recorded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSlot {
    /// The first decision point on the path.
    First,
    /// The second decision point on the path.
    Second,
}

/// The two binary decisions a reader makes, in traversal order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceState {
    /// Answer at the first decision point.
    pub first: Option<Choice>,
    /// Answer at the second decision point.
    pub second: Option<Choice>,
}

impl ChoiceState {
    /// Records into the first unset slot. Returns `None` if both are taken.
    pub fn record(&mut self, choice: Choice) -> Option<ChoiceSlot> {
        if self.first.is_none() {
            self.first = Some(choice);
            Some(ChoiceSlot::First)
        } else if self.second.is_none() {
            self.second = Some(choice);
            Some(ChoiceSlot::Second)
        } else {
            None
        }
    }

    /// Clears the most recently filled slot.
    pub fn undo_last(&mut self) -> Option<Choice> {
        self.second.take().or_else(|| self.first.take())
    }

    /// Both answers, once the reader has made them.
    #[must_use]
    pub fn pair(&self) -> Option<(Choice, Choice)> {
        self.first.zip(self.second)
    }

    /// Whether no decision has been made.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fills_slots_in_order() {
        let mut choices = ChoiceState::default();

        assert_eq!(choices.record(Choice::Yes), Some(ChoiceSlot::First));
        assert_eq!(choices.second, None);
        assert_eq!(choices.record(Choice::No), Some(ChoiceSlot::Second));
        assert_eq!(choices.pair(), Some((Choice::Yes, Choice::No)));
        assert_eq!(choices.record(Choice::Yes), None);
    }

    #[test]
    fn test_undo_last_clears_latest_slot_first() {
        let mut choices = ChoiceState {
            first: Some(Choice::No),
            second: Some(Choice::Yes),
        };

        assert_eq!(choices.undo_last(), Some(Choice::Yes));
        assert_eq!(choices.first, Some(Choice::No));
        assert_eq!(choices.undo_last(), Some(Choice::No));
        assert!(choices.is_empty());
        assert_eq!(choices.undo_last(), None);
    }
}
