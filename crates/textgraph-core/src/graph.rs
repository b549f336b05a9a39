//! Entity-relationship graph model.
//!
//! A [`Graph`] is an ordered list of entity names plus an ordered list of
//! directed [`Edge`]s between them. Entity order drives deterministic layout
//! seeding; edge order is preserved for reporting.
//!
//! Graphs come in two flavours that share this type: the raw graph returned
//! by extraction (which may reference unknown entities or repeat names) and
//! the validated graph produced by the validator, where every edge endpoint
//! is a member of the entity list. [`Graph::is_closed`] checks the latter.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A directed relationship between two entities.
///
/// Serializes as a two-element array `["source", "target"]`, which is the
/// shape both the model reply and the public result use.
///
/// # Examples
///
/// ```
/// # use textgraph_core::graph::Edge;
/// let edge = Edge::new("Alice", "Bob");
/// assert_eq!(edge.source(), "Alice");
/// assert_eq!(edge.target(), "Bob");
/// assert!(!edge.is_self_loop());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Edge {
    source: String,
    target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns the source entity name
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target entity name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns true if the edge starts and ends at the same entity
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl From<(String, String)> for Edge {
    fn from((source, target): (String, String)) -> Self {
        Self { source, target }
    }
}

impl From<Edge> for (String, String) {
    fn from(edge: Edge) -> Self {
        (edge.source, edge.target)
    }
}

/// Entities and the directed edges between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    entities: Vec<String>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(entities: Vec<String>, edges: Vec<Edge>) -> Self {
        Self { entities, edges }
    }

    /// Returns the entity names in their original order
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Returns the edges in their original order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.edges.is_empty()
    }

    /// Splits the graph into its entity and edge lists
    pub fn into_parts(self) -> (Vec<String>, Vec<Edge>) {
        (self.entities, self.edges)
    }

    /// Returns true if every edge endpoint is one of the graph's entities.
    ///
    /// # Examples
    ///
    /// ```
    /// # use textgraph_core::graph::{Edge, Graph};
    /// let closed = Graph::new(vec!["A".into(), "B".into()], vec![Edge::new("A", "B")]);
    /// assert!(closed.is_closed());
    ///
    /// let dangling = Graph::new(vec!["A".into()], vec![Edge::new("A", "B")]);
    /// assert!(!dangling.is_closed());
    /// ```
    pub fn is_closed(&self) -> bool {
        let known: HashSet<&str> = self.entities.iter().map(String::as_str).collect();
        self.edges
            .iter()
            .all(|edge| known.contains(edge.source()) && known.contains(edge.target()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_serializes_as_pair() {
        let edge = Edge::new("Alice", "Bob");
        let json = serde_json::to_string(&edge).unwrap();
        assert_eq!(json, r#"["Alice","Bob"]"#);

        let parsed: Edge = serde_json::from_str(r#"["Carol","Dave"]"#).unwrap();
        assert_eq!(parsed, Edge::new("Carol", "Dave"));
    }

    #[test]
    fn test_edge_rejects_wrong_arity() {
        assert!(serde_json::from_str::<Edge>(r#"["A"]"#).is_err());
        assert!(serde_json::from_str::<Edge>(r#"["A","B","C"]"#).is_err());
        assert!(serde_json::from_str::<Edge>(r#"["A",1]"#).is_err());
    }

    #[test]
    fn test_self_loop() {
        assert!(Edge::new("A", "A").is_self_loop());
    }

    #[test]
    fn test_graph_counts() {
        let graph = Graph::new(
            vec!["A".to_string(), "B".to_string()],
            vec![Edge::new("A", "B"), Edge::new("B", "A")],
        );
        assert_eq!(graph.entity_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert!(!graph.is_empty());
        assert!(Graph::default().is_empty());
    }

    #[test]
    fn test_empty_graph_is_closed() {
        assert!(Graph::default().is_closed());
    }
}
