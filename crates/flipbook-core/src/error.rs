//! Error types shared across the reader.

use thiserror::Error;

use crate::id::{ClipId, NodeId};

/// A navigation request that has no corresponding edge or arrives at the
/// wrong moment. The application layer drops these without telling the
/// reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A flip is still animating.
    #[error("transition rejected: a page flip is in progress")]
    Locked,

    /// The current spread has no forward edge.
    #[error("no next page after {0}")]
    NoNextPage(NodeId),

    /// The current spread has no backward edge.
    #[error("no previous page before {0}")]
    NoPreviousPage(NodeId),

    /// A choice was made somewhere other than a branch spread.
    #[error("{0} does not offer a choice")]
    NotAChoice(NodeId),

    /// The requested spread is the one on display.
    #[error("already on {0}")]
    AlreadyThere(NodeId),

    /// The requested spread is not reachable by flipping along the current path.
    #[error("{to} cannot be reached by flipping from {from}")]
    OffPath {
        /// The spread on display.
        from: NodeId,
        /// The requested spread.
        to: NodeId,
    },

    /// The book has not been opened yet.
    #[error("the book is closed")]
    BookClosed,
}

/// A failure reported by the audio collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The platform refused to play the clip (for example an autoplay policy).
    #[error("playback denied for clip {0}")]
    PlaybackDenied(ClipId),

    /// The clip is not known to the player.
    #[error("unknown clip {0}")]
    UnknownClip(ClipId),
}
