//! Story graph errors.

use flipbook_core::id::NodeId;
use thiserror::Error;

/// Reasons a story graph is rejected at load.
#[derive(Debug, Error)]
pub enum StoryError {
    /// The graph has no spreads.
    #[error("story has no spreads")]
    Empty,

    /// The start spread is not defined.
    #[error("start spread {0} is not defined")]
    MissingStart(NodeId),

    /// A spread must have exactly one of `next`, `choices`, or `ending`.
    #[error("spread {0} must have exactly one of next, choices, or ending")]
    MalformedNode(NodeId),

    /// An edge points at an undefined spread.
    #[error("spread {from} points at undefined spread {to}")]
    UnknownTarget {
        /// The spread holding the edge.
        from: NodeId,
        /// The missing target.
        to: NodeId,
    },

    /// A forward edge leads back to an earlier spread.
    #[error("forward edges form a cycle through {0}")]
    Cycle(NodeId),

    /// A spread cannot be reached from the start.
    #[error("spread {0} is unreachable from the start")]
    Unreachable(NodeId),

    /// A spread other than an ending has several parents, so a backward
    /// flip could land on a spread the reader never visited.
    #[error("spread {0} has several parents; only endings may merge paths")]
    AmbiguousPrev(NodeId),

    /// An explicit `prev` is not a parent of the spread.
    #[error("spread {node} declares prev {prev}, which does not lead to it")]
    InvalidPrev {
        /// The spread.
        node: NodeId,
        /// The declared previous spread.
        prev: NodeId,
    },

    /// A path crosses more decision points than there are choice slots.
    #[error("spread {0} is reached after more than two decisions")]
    TooManyDecisions(NodeId),

    /// The spread size is zero.
    #[error("pages_per_spread must be at least 1")]
    InvalidSpreadSize,

    /// The page total along the longest path does not fit in a page number.
    #[error("{spreads} spreads of {pages_per_spread} pages overflow the page count")]
    PageCountOverflow {
        /// Spreads on the longest path.
        spreads: u32,
        /// Pages per spread.
        pages_per_spread: u32,
    },

    /// The YAML document could not be parsed.
    #[error("story parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}
