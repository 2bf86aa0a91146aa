//! Serialized form of a story graph.
//!
//! Authors write spreads as maps with optional fields; [`StoryDefinition`]
//! mirrors that shape and [`StoryGraph::from_definition`] turns it into the
//! tagged [`StoryNode`] form, rejecting illegal field combinations.
//!
//! [`StoryGraph::from_definition`]: crate::graph::StoryGraph::from_definition
//! [`StoryNode`]: crate::node::StoryNode

use std::collections::BTreeMap;

use flipbook_core::id::NodeId;
use serde::{Deserialize, Serialize};

use crate::error::StoryError;
use crate::node::StoryNode;

fn default_pages_per_spread() -> u32 {
    2
}

/// Top-level story document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoryDefinition {
    /// The spread the reader opens on.
    pub start: NodeId,
    /// Printed pages per spread, used for the page indicator.
    #[serde(default = "default_pages_per_spread")]
    pub pages_per_spread: u32,
    /// All spreads keyed by id.
    pub nodes: BTreeMap<NodeId, NodeDefinition>,
}

/// The two targets of a decision point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoicesDefinition {
    /// Target for "yes".
    pub yes: NodeId,
    /// Target for "no".
    pub no: NodeId,
}

/// One spread as written by an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    /// Forward edge of a linear spread.
    #[serde(default)]
    pub next: Option<NodeId>,
    /// Decision targets of a branch spread.
    #[serde(default)]
    pub choices: Option<ChoicesDefinition>,
    /// Marks a terminal spread.
    #[serde(default)]
    pub ending: bool,
    /// Overrides the derived backward edge.
    #[serde(default)]
    pub prev: Option<NodeId>,
}

impl NodeDefinition {
    /// Converts to a [`StoryNode`]. The `prev` edge is filled in later by
    /// graph validation.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::MalformedNode` unless exactly one of `next`,
    /// `choices`, or `ending` is set, or if an ending declares `prev`.
    pub(crate) fn to_node(&self, id: &NodeId) -> Result<StoryNode, StoryError> {
        match (&self.next, &self.choices, self.ending) {
            (Some(next), None, false) => Ok(StoryNode::Linear {
                next: next.clone(),
                prev: None,
            }),
            (None, Some(choices), false) => Ok(StoryNode::Branch {
                yes: choices.yes.clone(),
                no: choices.no.clone(),
                prev: None,
            }),
            (None, None, true) if self.prev.is_none() => Ok(StoryNode::Ending),
            _ => Err(StoryError::MalformedNode(id.clone())),
        }
    }
}

/// Parses a story document from YAML.
///
/// # Errors
///
/// Returns `StoryError::Parse` if the document is not valid YAML for a story.
pub fn parse_yaml(source: &str) -> Result<StoryDefinition, StoryError> {
    Ok(serde_yaml::from_str(source)?)
}
