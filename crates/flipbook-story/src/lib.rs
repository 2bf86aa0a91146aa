//! Flipbook — Story Graph.
//!
//! A static directed acyclic graph of spreads. Linear spreads point to one
//! next spread, branch spreads offer a yes/no pair, and endings are terminal.
//! Graphs are validated once at construction and are read-only afterwards.

pub mod definition;
pub mod error;
pub mod graph;
pub mod node;

pub use error::StoryError;
pub use graph::{Reach, StoryGraph};
pub use node::StoryNode;
