//! Structural validation of extracted graphs.
//!
//! Extraction output is untrusted: models repeat entity names and invent edge
//! endpoints that never appear in the entity list. [`validate`] normalizes
//! the raw lists into a graph that satisfies the pipeline invariants:
//!
//! - entity names are unique (first occurrence wins, order preserved)
//! - every edge endpoint is one of the entities
//!
//! Dangling edges are dropped rather than failing the request, so a partially
//! malformed extraction still yields a graph. The number of dropped edges is
//! reported for logging only.

use indexmap::IndexSet;
use log::{debug, warn};

use textgraph_core::graph::{Edge, Graph};

/// A validated graph plus what was removed to produce it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    graph: Graph,
    dropped_edges: usize,
    duplicate_entities: usize,
}

impl Validation {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Number of edges removed because an endpoint was unknown
    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    /// Number of repeated entity names collapsed into their first occurrence
    pub fn duplicate_entities(&self) -> usize {
        self.duplicate_entities
    }
}

/// Normalizes raw extraction output into a closed graph.
///
/// # Examples
///
/// ```
/// # use textgraph_core::graph::Edge;
/// # use textgraph_extract::validate::validate;
/// let validation = validate(
///     vec!["A".to_string()],
///     vec![Edge::new("A", "B")],
/// );
/// assert_eq!(validation.graph().entity_count(), 1);
/// assert_eq!(validation.graph().edge_count(), 0);
/// assert_eq!(validation.dropped_edges(), 1);
/// ```
pub fn validate(entities: Vec<String>, edges: Vec<Edge>) -> Validation {
    let mut known: IndexSet<String> = IndexSet::with_capacity(entities.len());
    let mut duplicate_entities = 0;
    for entity in entities {
        if !known.insert(entity) {
            duplicate_entities += 1;
        }
    }

    let edge_total = edges.len();
    let edges: Vec<Edge> = edges
        .into_iter()
        .filter(|edge| {
            let keep = known.contains(edge.source()) && known.contains(edge.target());
            if !keep {
                debug!(source = edge.source(), target = edge.target(); "Dropping dangling edge");
            }
            keep
        })
        .collect();
    let dropped_edges = edge_total - edges.len();

    if dropped_edges > 0 {
        warn!(dropped_edges; "Dropped edges referencing unknown entities");
    }
    if duplicate_entities > 0 {
        debug!(duplicate_entities; "Collapsed repeated entity names");
    }

    Validation {
        graph: Graph::new(known.into_iter().collect(), edges),
        dropped_edges,
        duplicate_entities,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_keeps_valid_edges_in_order() {
        let validation = validate(
            names(&["A", "B", "C"]),
            vec![Edge::new("C", "A"), Edge::new("A", "B"), Edge::new("B", "C")],
        );
        assert_eq!(
            validation.graph().edges(),
            [Edge::new("C", "A"), Edge::new("A", "B"), Edge::new("B", "C")]
        );
        assert_eq!(validation.dropped_edges(), 0);
    }

    #[test]
    fn test_drops_edge_with_unknown_source_or_target() {
        let validation = validate(
            names(&["A", "B"]),
            vec![Edge::new("X", "A"), Edge::new("A", "B"), Edge::new("B", "Y")],
        );
        assert_eq!(validation.graph().edges(), [Edge::new("A", "B")]);
        assert_eq!(validation.dropped_edges(), 2);
    }

    #[test]
    fn test_keeps_self_loops() {
        let validation = validate(names(&["A"]), vec![Edge::new("A", "A")]);
        assert_eq!(validation.graph().edge_count(), 1);
    }

    #[test]
    fn test_collapses_duplicate_entities() {
        let validation = validate(names(&["A", "B", "A", "C", "B"]), Vec::new());
        assert_eq!(validation.graph().entities(), ["A", "B", "C"]);
        assert_eq!(validation.duplicate_entities(), 2);
    }

    #[test]
    fn test_entities_are_case_sensitive() {
        let validation = validate(names(&["alice", "Alice"]), vec![Edge::new("alice", "Alice")]);
        assert_eq!(validation.graph().entity_count(), 2);
        assert_eq!(validation.graph().edge_count(), 1);
    }

    #[test]
    fn test_empty_input() {
        let validation = validate(Vec::new(), Vec::new());
        assert!(validation.graph().is_empty());
        assert_eq!(validation.into_graph(), Graph::default());
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["A", "B", "C", "D", "E", "F"]).prop_map(String::from)
    }

    proptest! {
        #[test]
        fn validated_graph_is_closed(
            entities in prop::collection::vec(name_strategy(), 0..8),
            edges in prop::collection::vec((name_strategy(), name_strategy()), 0..16),
        ) {
            let edge_total = edges.len();
            let edges: Vec<Edge> = edges.into_iter().map(Edge::from).collect();
            let validation = validate(entities, edges);
            let graph = validation.graph();

            prop_assert!(graph.is_closed());
            prop_assert_eq!(graph.edge_count() + validation.dropped_edges(), edge_total);

            let mut unique = graph.entities().to_vec();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), graph.entity_count());
        }
    }
}
