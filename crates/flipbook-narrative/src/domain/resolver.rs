//! Ending resolution.
//!
//! The ending a reader sees is a fixed lookup on the two answers, first
//! answer as the primary key. Individual ending spreads may also carry their
//! own outcome (used by books without decisions).

use std::collections::BTreeMap;

use flipbook_core::effect::EndingOutcome;
use flipbook_core::id::{Choice, NodeId};
use flipbook_story::{StoryGraph, StoryNode};
use serde::{Deserialize, Serialize};

use super::choices::ChoiceState;
use super::manifest::ManifestError;

/// The four endings of a two-decision story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndingTable {
    /// Yes, then yes.
    pub yes_yes: EndingOutcome,
    /// Yes, then no.
    pub yes_no: EndingOutcome,
    /// No, then yes.
    pub no_yes: EndingOutcome,
    /// No, then no.
    pub no_no: EndingOutcome,
}

impl EndingTable {
    /// Looks up the ending for a pair of answers.
    #[must_use]
    pub fn resolve(&self, first: Choice, second: Choice) -> &EndingOutcome {
        match (first, second) {
            (Choice::Yes, Choice::Yes) => &self.yes_yes,
            (Choice::Yes, Choice::No) => &self.yes_no,
            (Choice::No, Choice::Yes) => &self.no_yes,
            (Choice::No, Choice::No) => &self.no_no,
        }
    }
}

/// Every ending the book can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndingCatalog {
    /// Endings keyed by the reader's answers.
    #[serde(default)]
    pub by_choices: Option<EndingTable>,
    /// Endings keyed by spread; these take precedence.
    #[serde(default)]
    pub by_node: BTreeMap<NodeId, EndingOutcome>,
}

impl EndingCatalog {
    /// The outcome for arriving at `node` with `choices`.
    #[must_use]
    pub fn outcome_for(&self, node: &NodeId, choices: &ChoiceState) -> Option<&EndingOutcome> {
        if let Some(outcome) = self.by_node.get(node) {
            return Some(outcome);
        }
        let (first, second) = choices.pair()?;
        self.by_choices
            .as_ref()
            .map(|table| table.resolve(first, second))
    }

    /// Checks that every ending spread of `graph` resolves.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::UnknownEndingNode` for a keyed spread that is
    /// not an ending, and `ManifestError::UnresolvableEnding` for an ending
    /// that has no keyed outcome and can be reached without two decisions
    /// or without a pair table.
    pub fn validate(&self, graph: &StoryGraph) -> Result<(), ManifestError> {
        for node in self.by_node.keys() {
            if !graph.node(node).is_some_and(StoryNode::is_ending) {
                return Err(ManifestError::UnknownEndingNode(node.clone()));
            }
        }
        for ending in graph.endings() {
            if self.by_node.contains_key(ending) {
                continue;
            }
            let always_two = graph
                .decisions_before(ending)
                .is_some_and(|counts| counts.iter().all(|count| *count == 2));
            if !always_two || self.by_choices.is_none() {
                return Err(ManifestError::UnresolvableEnding(ending.clone()));
            }
        }
        Ok(())
    }
}
