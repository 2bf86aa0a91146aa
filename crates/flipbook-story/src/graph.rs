//! The validated story graph.

use std::collections::{BTreeMap, BTreeSet};

use flipbook_core::effect::PageLabel;
use flipbook_core::id::NodeId;
use tracing::debug;

use crate::definition::{NodeDefinition, StoryDefinition, parse_yaml};
use crate::error::StoryError;
use crate::node::StoryNode;

/// Number of choice slots a reader carries.
pub const MAX_DECISIONS: u8 = 2;

/// How a spread can be reached from the one on display by flipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// Along `next` edges.
    Forward,
    /// Along `prev` edges.
    Backward,
}

/// A validated, immutable story graph.
#[derive(Debug, Clone)]
pub struct StoryGraph {
    start: NodeId,
    pages_per_spread: u32,
    nodes: BTreeMap<NodeId, StoryNode>,
    /// Longest distance from the start, in spreads.
    spread_index: BTreeMap<NodeId, u32>,
    /// Distinct numbers of decision points crossed on paths reaching a spread.
    decisions: BTreeMap<NodeId, BTreeSet<u8>>,
    spread_count: u32,
}

impl StoryGraph {
    /// Builds a graph from a parsed definition.
    ///
    /// # Errors
    ///
    /// Returns `StoryError` if a spread is malformed, an edge dangles, the
    /// forward edges form a cycle, a spread is unreachable, paths merge
    /// before an ending, an explicit `prev` is wrong, a path crosses more
    /// than two decisions, or the page total overflows.
    pub fn from_definition(definition: &StoryDefinition) -> Result<Self, StoryError> {
        if definition.nodes.is_empty() {
            return Err(StoryError::Empty);
        }
        if definition.pages_per_spread == 0 {
            return Err(StoryError::InvalidSpreadSize);
        }
        if !definition.nodes.contains_key(&definition.start) {
            return Err(StoryError::MissingStart(definition.start.clone()));
        }

        let mut nodes = BTreeMap::new();
        for (id, node_definition) in &definition.nodes {
            let node = node_definition.to_node(id)?;
            for target in node.successors() {
                if !definition.nodes.contains_key(target) {
                    return Err(StoryError::UnknownTarget {
                        from: id.clone(),
                        to: target.clone(),
                    });
                }
            }
            nodes.insert(id.clone(), node);
        }

        let order = topological_order(&definition.start, &nodes)?;
        if let Some(orphan) = nodes.keys().find(|id| !order.contains(id)) {
            return Err(StoryError::Unreachable(orphan.clone()));
        }

        let parents = parents_of(&nodes);
        for (id, node_definition) in &definition.nodes {
            if nodes[id].is_ending() {
                continue;
            }
            let node_parents = parents.get(id).map(Vec::as_slice).unwrap_or_default();
            let prev = match node_parents {
                [] => None,
                [only] => Some(only.clone()),
                // Whichever parent `prev` named, readers arriving through the
                // others would flip back off their own path.
                _ => return Err(StoryError::AmbiguousPrev(id.clone())),
            };
            if let Some(declared) = node_definition
                .prev
                .as_ref()
                .filter(|declared| prev.as_ref() != Some(*declared))
            {
                return Err(StoryError::InvalidPrev {
                    node: id.clone(),
                    prev: declared.clone(),
                });
            }
            if let Some(node) = nodes.get_mut(id) {
                node.set_prev(prev);
            }
        }

        let mut spread_index: BTreeMap<NodeId, u32> = BTreeMap::new();
        let mut decisions: BTreeMap<NodeId, BTreeSet<u8>> = BTreeMap::new();
        spread_index.insert(definition.start.clone(), 0);
        decisions.insert(definition.start.clone(), BTreeSet::from([0]));
        for id in &order {
            let depth = spread_index[id];
            let crossed = decisions[id].clone();
            let node = &nodes[id];
            let step = u8::from(node.is_branch());
            for child in node.successors() {
                let child_depth = spread_index.entry(child.clone()).or_insert(0);
                *child_depth = (*child_depth).max(depth + 1);
                let child_decisions = decisions.entry(child.clone()).or_default();
                for count in &crossed {
                    let total = count + step;
                    if total > MAX_DECISIONS {
                        return Err(StoryError::TooManyDecisions(child.clone()));
                    }
                    child_decisions.insert(total);
                }
            }
        }

        let spread_count = spread_index.values().copied().max().unwrap_or(0) + 1;
        if spread_count.checked_mul(definition.pages_per_spread).is_none() {
            return Err(StoryError::PageCountOverflow {
                spreads: spread_count,
                pages_per_spread: definition.pages_per_spread,
            });
        }
        debug!(
            start = %definition.start,
            spreads = nodes.len(),
            spread_count,
            "story graph loaded"
        );

        Ok(Self {
            start: definition.start.clone(),
            pages_per_spread: definition.pages_per_spread,
            nodes,
            spread_index,
            decisions,
            spread_count,
        })
    }

    /// Parses and validates a YAML story document.
    ///
    /// # Errors
    ///
    /// Returns `StoryError` on parse or validation failure.
    pub fn from_yaml(source: &str) -> Result<Self, StoryError> {
        Self::from_definition(&parse_yaml(source)?)
    }

    /// Builds the plain page-counter book: spreads `"1"` to `"n"`, each
    /// pointing to the next, the last one an ending.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Empty` when `spreads` is zero.
    pub fn linear(spreads: u32, pages_per_spread: u32) -> Result<Self, StoryError> {
        let nodes = (1..=spreads)
            .map(|n| {
                let node = if n == spreads {
                    NodeDefinition {
                        ending: true,
                        ..Default::default()
                    }
                } else {
                    NodeDefinition {
                        next: Some(NodeId::new((n + 1).to_string())),
                        ..Default::default()
                    }
                };
                (NodeId::new(n.to_string()), node)
            })
            .collect();
        Self::from_definition(&StoryDefinition {
            start: NodeId::from("1"),
            pages_per_spread,
            nodes,
        })
    }

    /// The spread the reader opens on.
    #[must_use]
    pub fn start(&self) -> &NodeId {
        &self.start
    }

    /// Looks up a spread.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&StoryNode> {
        self.nodes.get(id)
    }

    /// All spreads, ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &StoryNode)> {
        self.nodes.iter()
    }

    /// All terminal spreads.
    pub fn endings(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_ending())
            .map(|(id, _)| id)
    }

    /// Numbers of decisions crossed on the paths that reach a spread.
    #[must_use]
    pub fn decisions_before(&self, id: &NodeId) -> Option<&BTreeSet<u8>> {
        self.decisions.get(id)
    }

    /// Number of spreads on the longest path.
    #[must_use]
    pub fn spread_count(&self) -> u32 {
        self.spread_count
    }

    /// "Pages X-Y of N" for a spread. The page total was checked to fit at
    /// load, and every spread index is below the spread count.
    #[must_use]
    pub fn page_label(&self, id: &NodeId) -> Option<PageLabel> {
        let index = *self.spread_index.get(id)?;
        let total = self.spread_count * self.pages_per_spread;
        Some(PageLabel {
            first: index * self.pages_per_spread + 1,
            last: ((index + 1) * self.pages_per_spread).min(total),
            total,
        })
    }

    /// Whether `to` can be reached from `from` by flipping straight along
    /// `next` or `prev` edges. Forward flips stop at decision points.
    #[must_use]
    pub fn reach(&self, from: &NodeId, to: &NodeId) -> Option<Reach> {
        if self.walk(from, to, StoryNode::next) {
            return Some(Reach::Forward);
        }
        if self.walk(from, to, StoryNode::prev) {
            return Some(Reach::Backward);
        }
        None
    }

    fn walk(&self, from: &NodeId, to: &NodeId, edge: fn(&StoryNode) -> Option<&NodeId>) -> bool {
        let mut cursor = from;
        // Acyclic, so the walk ends within one pass over the graph.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(cursor).and_then(edge) {
                Some(step) if step == to => return true,
                Some(step) => cursor = step,
                None => return false,
            }
        }
        false
    }
}

/// Reverse post-order over forward edges from `start`.
fn topological_order(
    start: &NodeId,
    nodes: &BTreeMap<NodeId, StoryNode>,
) -> Result<Vec<NodeId>, StoryError> {
    let mut done: BTreeSet<NodeId> = BTreeSet::new();
    let mut on_stack: BTreeSet<NodeId> = BTreeSet::new();
    let mut post_order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<(NodeId, usize)> = vec![(start.clone(), 0)];
    on_stack.insert(start.clone());

    while let Some((id, child_index)) = stack.pop() {
        let successors = nodes[&id].successors();
        if let Some(child) = successors.get(child_index) {
            let child = (*child).clone();
            stack.push((id, child_index + 1));
            if on_stack.contains(&child) {
                return Err(StoryError::Cycle(child));
            }
            if !done.contains(&child) {
                on_stack.insert(child.clone());
                stack.push((child, 0));
            }
        } else {
            on_stack.remove(&id);
            done.insert(id.clone());
            post_order.push(id);
        }
    }

    post_order.reverse();
    Ok(post_order)
}

fn parents_of(nodes: &BTreeMap<NodeId, StoryNode>) -> BTreeMap<NodeId, Vec<NodeId>> {
    let mut parents: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for (id, node) in nodes {
        for child in node.successors() {
            parents.entry(child.clone()).or_default().push(id.clone());
        }
    }
    parents
}

#[cfg(test)]
mod tests {
    use flipbook_core::id::Choice;

    use super::*;

    const BRANCHING: &str = r#"
start: "1"
nodes:
  "1": { next: "2" }
  "2": { next: "3" }
  "3": { next: "4" }
  "4": { choices: { yes: "a1", no: "b1" } }
  "a1": { next: "a2" }
  "a2": { choices: { yes: "a3a", no: "a3b" } }
  "a3a": { ending: true }
  "a3b": { ending: true }
  "b1": { next: "b2" }
  "b2": { choices: { yes: "b3a", no: "b3b" } }
  "b3a": { ending: true }
  "b3b": { ending: true }
"#;

    #[test]
    fn test_branching_graph_derives_prev_edges() {
        // Act
        let graph = StoryGraph::from_yaml(BRANCHING).unwrap();

        // Assert
        assert_eq!(graph.start(), &NodeId::from("1"));
        assert_eq!(graph.node(&NodeId::from("1")).unwrap().prev(), None);
        assert_eq!(
            graph.node(&NodeId::from("a1")).unwrap().prev(),
            Some(&NodeId::from("4"))
        );
        assert_eq!(
            graph
                .node(&NodeId::from("4"))
                .unwrap()
                .branch_target(Choice::No),
            Some(&NodeId::from("b1"))
        );
    }

    #[test]
    fn test_every_node_has_exactly_one_way_forward_unless_ending() {
        let graph = StoryGraph::from_yaml(BRANCHING).unwrap();

        for (_, node) in graph.nodes() {
            let has_next = node.next().is_some();
            let has_choices = node.is_branch();
            if node.is_ending() {
                assert!(!has_next && !has_choices);
            } else {
                assert!(has_next ^ has_choices);
            }
        }
    }

    #[test]
    fn test_endings_are_reached_after_two_decisions() {
        let graph = StoryGraph::from_yaml(BRANCHING).unwrap();

        let endings: Vec<&NodeId> = graph.endings().collect();

        assert_eq!(endings.len(), 4);
        for ending in endings {
            assert_eq!(
                graph.decisions_before(ending),
                Some(&BTreeSet::from([2]))
            );
        }
        assert_eq!(
            graph.decisions_before(&NodeId::from("a2")),
            Some(&BTreeSet::from([1]))
        );
    }

    #[test]
    fn test_page_labels_follow_spread_index() {
        let graph = StoryGraph::linear(3, 2).unwrap();

        let first = graph.page_label(&NodeId::from("1")).unwrap();
        let last = graph.page_label(&NodeId::from("3")).unwrap();

        assert_eq!(first.to_string(), "Pages 1-2 of 6");
        assert_eq!(last.to_string(), "Pages 5-6 of 6");
        assert_eq!(graph.spread_count(), 3);
    }

    #[test]
    fn test_linear_graph_ends_in_an_ending() {
        let graph = StoryGraph::linear(4, 2).unwrap();

        assert!(graph.node(&NodeId::from("4")).unwrap().is_ending());
        assert_eq!(
            graph.node(&NodeId::from("2")).unwrap().next(),
            Some(&NodeId::from("3"))
        );
        assert!(matches!(StoryGraph::linear(0, 2), Err(StoryError::Empty)));
    }

    #[test]
    fn test_reach_walks_straight_paths_only() {
        let graph = StoryGraph::from_yaml(BRANCHING).unwrap();

        assert_eq!(
            graph.reach(&NodeId::from("1"), &NodeId::from("4")),
            Some(Reach::Forward)
        );
        assert_eq!(
            graph.reach(&NodeId::from("a2"), &NodeId::from("2")),
            Some(Reach::Backward)
        );
        assert_eq!(graph.reach(&NodeId::from("1"), &NodeId::from("a1")), None);
        assert_eq!(graph.reach(&NodeId::from("a1"), &NodeId::from("b1")), None);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let source = r#"
start: "1"
nodes:
  "1": { next: "2" }
  "2": { next: "1", prev: "1" }
"#;

        assert!(matches!(
            StoryGraph::from_yaml(source),
            Err(StoryError::Cycle(_))
        ));
    }

    #[test]
    fn test_dangling_edge_is_rejected() {
        let source = r#"
start: "1"
nodes:
  "1": { next: "9" }
"#;

        assert!(matches!(
            StoryGraph::from_yaml(source),
            Err(StoryError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn test_orphan_is_rejected() {
        let source = r#"
start: "1"
nodes:
  "1": { ending: true }
  "2": { ending: true }
"#;

        assert!(matches!(
            StoryGraph::from_yaml(source),
            Err(StoryError::Unreachable(id)) if id == NodeId::from("2")
        ));
    }

    #[test]
    fn test_merge_before_an_ending_is_rejected() {
        // Arrange
        let implicit = r#"
start: "1"
nodes:
  "1": { choices: { yes: "2", no: "3" } }
  "2": { next: "4" }
  "3": { next: "4" }
  "4": { next: "5" }
  "5": { ending: true }
"#;
        let explicit = r#"
start: "1"
nodes:
  "1": { choices: { yes: "2", no: "3" } }
  "2": { next: "4" }
  "3": { next: "4" }
  "4": { next: "5", prev: "2" }
  "5": { ending: true }
"#;

        // Act / Assert
        for source in [implicit, explicit] {
            assert!(matches!(
                StoryGraph::from_yaml(source),
                Err(StoryError::AmbiguousPrev(id)) if id == NodeId::from("4")
            ));
        }
    }

    #[test]
    fn test_paths_may_merge_on_an_ending() {
        let source = r#"
start: "1"
nodes:
  "1": { choices: { yes: "2", no: "3" } }
  "2": { next: "end" }
  "3": { next: "end" }
  "end": { ending: true }
"#;

        let graph = StoryGraph::from_yaml(source).unwrap();

        assert_eq!(graph.node(&NodeId::from("end")).unwrap().prev(), None);
    }

    #[test]
    fn test_explicit_prev_must_name_the_parent() {
        let matching = r#"
start: "1"
nodes:
  "1": { next: "2" }
  "2": { next: "3", prev: "1" }
  "3": { ending: true }
"#;
        let wrong = r#"
start: "1"
nodes:
  "1": { next: "2" }
  "2": { next: "3", prev: "3" }
  "3": { ending: true }
"#;

        let graph = StoryGraph::from_yaml(matching).unwrap();
        assert_eq!(
            graph.node(&NodeId::from("2")).unwrap().prev(),
            Some(&NodeId::from("1"))
        );
        assert!(matches!(
            StoryGraph::from_yaml(wrong),
            Err(StoryError::InvalidPrev { node, .. }) if node == NodeId::from("2")
        ));
    }

    #[test]
    fn test_oversized_spreads_are_rejected() {
        // Arrange
        let source = r#"
start: "1"
pages_per_spread: 3000000000
nodes:
  "1": { next: "2" }
  "2": { ending: true }
"#;

        // Act
        let result = StoryGraph::from_yaml(source);

        // Assert
        assert!(matches!(
            result,
            Err(StoryError::PageCountOverflow {
                spreads: 2,
                pages_per_spread: 3_000_000_000
            })
        ));
        let largest = StoryGraph::linear(2, u32::MAX / 2).unwrap();
        let label = largest.page_label(&NodeId::from("2")).unwrap();
        assert_eq!(label.last, u32::MAX - 1);
        assert_eq!(label.total, u32::MAX - 1);
    }

    #[test]
    fn test_third_decision_is_rejected() {
        let source = r#"
start: "1"
nodes:
  "1": { choices: { yes: "2", no: "2b" } }
  "2": { choices: { yes: "3", no: "3b" } }
  "2b": { ending: true }
  "3": { choices: { yes: "4", no: "4b" } }
  "3b": { ending: true }
  "4": { ending: true }
  "4b": { ending: true }
"#;

        assert!(matches!(
            StoryGraph::from_yaml(source),
            Err(StoryError::TooManyDecisions(_))
        ));
    }
}
