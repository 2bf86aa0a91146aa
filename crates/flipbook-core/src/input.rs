//! Input events consumed by the reader.

use crate::id::{Choice, NodeId};

/// Something the reader did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderInput {
    /// Previous button or left arrow.
    PrevRequested,
    /// Next button or right arrow.
    NextRequested,
    /// A yes/no answer on a branch spread.
    ChoiceMade(Choice),
    /// Start over.
    RestartRequested,
    /// A click on a spread, flipping straight to it.
    SpreadSelected(NodeId),
    /// A click on a title-screen performer, opening the book.
    PerformerSelected(usize),
}

impl ReaderInput {
    /// Maps a key name to an input, if the key is bound.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::PrevRequested),
            "ArrowRight" => Some(Self::NextRequested),
            "y" | "Y" => Some(Self::ChoiceMade(Choice::Yes)),
            "n" | "N" => Some(Self::ChoiceMade(Choice::No)),
            "r" | "R" => Some(Self::RestartRequested),
            _ => None,
        }
    }

    /// Returns the input name for logging.
    #[must_use]
    pub fn input_type(&self) -> &'static str {
        match self {
            Self::PrevRequested => "prev_requested",
            Self::NextRequested => "next_requested",
            Self::ChoiceMade(_) => "choice_made",
            Self::RestartRequested => "restart_requested",
            Self::SpreadSelected(_) => "spread_selected",
            Self::PerformerSelected(_) => "performer_selected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_map_to_navigation() {
        assert_eq!(
            ReaderInput::from_key("ArrowLeft"),
            Some(ReaderInput::PrevRequested)
        );
        assert_eq!(
            ReaderInput::from_key("ArrowRight"),
            Some(ReaderInput::NextRequested)
        );
    }

    #[test]
    fn test_choice_and_restart_keys() {
        assert_eq!(
            ReaderInput::from_key("y"),
            Some(ReaderInput::ChoiceMade(Choice::Yes))
        );
        assert_eq!(
            ReaderInput::from_key("N"),
            Some(ReaderInput::ChoiceMade(Choice::No))
        );
        assert_eq!(
            ReaderInput::from_key("r"),
            Some(ReaderInput::RestartRequested)
        );
        assert_eq!(ReaderInput::from_key("Escape"), None);
    }
}
