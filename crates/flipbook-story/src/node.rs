//! Story nodes.

use flipbook_core::id::{Choice, NodeId};

/// A spread in the story graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryNode {
    /// An ordinary spread with exactly one way forward.
    Linear {
        /// The spread after this one.
        next: NodeId,
        /// The spread before this one, if the reader may flip back.
        prev: Option<NodeId>,
    },
    /// A decision point.
    Branch {
        /// Target when the reader answers yes.
        yes: NodeId,
        /// Target when the reader answers no.
        no: NodeId,
        /// The spread before this one, if the reader may flip back.
        prev: Option<NodeId>,
    },
    /// A terminal spread.
    Ending,
}

impl StoryNode {
    /// Forward edge of a linear spread.
    #[must_use]
    pub fn next(&self) -> Option<&NodeId> {
        match self {
            Self::Linear { next, .. } => Some(next),
            Self::Branch { .. } | Self::Ending => None,
        }
    }

    /// Backward edge.
    #[must_use]
    pub fn prev(&self) -> Option<&NodeId> {
        match self {
            Self::Linear { prev, .. } | Self::Branch { prev, .. } => prev.as_ref(),
            Self::Ending => None,
        }
    }

    /// Target of a choice on a branch spread.
    #[must_use]
    pub fn branch_target(&self, choice: Choice) -> Option<&NodeId> {
        match (self, choice) {
            (Self::Branch { yes, .. }, Choice::Yes) => Some(yes),
            (Self::Branch { no, .. }, Choice::No) => Some(no),
            _ => None,
        }
    }

    /// Whether this spread is a decision point.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }

    /// Whether this spread is terminal.
    #[must_use]
    pub fn is_ending(&self) -> bool {
        matches!(self, Self::Ending)
    }

    /// All forward edges.
    #[must_use]
    pub fn successors(&self) -> Vec<&NodeId> {
        match self {
            Self::Linear { next, .. } => vec![next],
            Self::Branch { yes, no, .. } => vec![yes, no],
            Self::Ending => Vec::new(),
        }
    }

    pub(crate) fn set_prev(&mut self, value: Option<NodeId>) {
        match self {
            Self::Linear { prev, .. } | Self::Branch { prev, .. } => *prev = value,
            Self::Ending => {}
        }
    }
}
