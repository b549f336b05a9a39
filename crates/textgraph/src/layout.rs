//! Force-directed graph layout.
//!
//! [`ForceLayout`] assigns a canvas position to every entity of a [`Graph`].
//! The result is a [`Layout`]: one [`LayoutNode`] per kept entity and one
//! [`LayoutEdge`] (a pair of node indices) per kept edge.
//!
//! Layouts are short-lived. They are created for one pipeline run, handed to
//! the scene renderer and dropped.

mod force;
mod placement;

pub use force::ForceLayout;

use std::collections::HashMap;

use log::warn;

use textgraph_core::{
    geometry::{Point, Size},
    graph::{Edge, Graph},
};

/// A positioned entity
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    id: String,
    position: Point,
    velocity: Point,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
            velocity: Point::default(),
        }
    }

    /// Entity name
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Velocity after the last simulation tick
    pub fn velocity(&self) -> Point {
        self.velocity
    }
}

/// An edge between two nodes, by index into [`Layout::nodes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    source: usize,
    target: usize,
}

impl LayoutEdge {
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    pub fn source(self) -> usize {
        self.source
    }

    pub fn target(self) -> usize {
        self.target
    }

    pub fn is_self_loop(self) -> bool {
        self.source == self.target
    }
}

/// Result of a layout run.
#[derive(Debug, Clone)]
pub struct Layout {
    canvas: Size,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    ticks: usize,
    truncated: usize,
}

impl Layout {
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Number of simulation ticks actually run
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Number of entities dropped by the node cap
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// The graph that was laid out, after node-cap truncation.
    ///
    /// Entity and edge order match the input graph.
    pub fn to_graph(&self) -> Graph {
        let entities = self.nodes.iter().map(|node| node.id.clone()).collect();
        let edges = self
            .edges
            .iter()
            .map(|edge| Edge::new(self.nodes[edge.source].id(), self.nodes[edge.target].id()))
            .collect();
        Graph::new(entities, edges)
    }
}

/// Entities and index edges of a graph after applying the node cap.
struct IndexedGraph {
    ids: Vec<String>,
    edges: Vec<LayoutEdge>,
    truncated: usize,
}

impl IndexedGraph {
    /// Keeps the first `max_nodes` entities and the edges between them.
    fn new(graph: &Graph, max_nodes: usize) -> Self {
        let entity_count = graph.entity_count();
        let kept = entity_count.min(max_nodes);
        let truncated = entity_count - kept;

        let ids: Vec<String> = graph.entities()[..kept].to_vec();
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(kept);
        for (i, id) in ids.iter().enumerate() {
            index.entry(id.as_str()).or_insert(i);
        }

        let edges: Vec<LayoutEdge> = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = *index.get(edge.source())?;
                let target = *index.get(edge.target())?;
                Some(LayoutEdge::new(source, target))
            })
            .collect();

        if truncated > 0 {
            warn!(
                entity_count,
                max_nodes,
                truncated,
                dropped_edges = graph.edge_count() - edges.len();
                "Graph exceeds node cap, truncating"
            );
        }

        Self {
            ids,
            edges,
            truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(count: usize) -> Graph {
        let entities: Vec<String> = (0..count).map(|i| format!("n{i}")).collect();
        let edges = entities
            .windows(2)
            .map(|pair| Edge::new(pair[0].as_str(), pair[1].as_str()))
            .collect();
        Graph::new(entities, edges)
    }

    #[test]
    fn test_indexed_graph_keeps_everything_under_cap() {
        let indexed = IndexedGraph::new(&chain(4), 10);
        assert_eq!(indexed.ids.len(), 4);
        assert_eq!(indexed.edges.len(), 3);
        assert_eq!(indexed.edges[0], LayoutEdge::new(0, 1));
        assert_eq!(indexed.truncated, 0);
    }

    #[test]
    fn test_indexed_graph_truncates_and_drops_edges() {
        let indexed = IndexedGraph::new(&chain(5), 3);
        assert_eq!(indexed.ids, ["n0", "n1", "n2"]);
        assert_eq!(indexed.edges, [LayoutEdge::new(0, 1), LayoutEdge::new(1, 2)]);
        assert_eq!(indexed.truncated, 2);
    }

    #[test]
    fn test_indexed_graph_self_loop() {
        let graph = Graph::new(vec!["a".to_string()], vec![Edge::new("a", "a")]);
        let indexed = IndexedGraph::new(&graph, 10);
        assert!(indexed.edges[0].is_self_loop());
    }

    #[test]
    fn test_layout_to_graph_round_trips_names() {
        let layout = Layout {
            canvas: Size::new(100.0, 100.0),
            nodes: vec![
                LayoutNode::new("a", Point::new(1.0, 1.0)),
                LayoutNode::new("b", Point::new(2.0, 2.0)),
            ],
            edges: vec![LayoutEdge::new(1, 0)],
            ticks: 0,
            truncated: 0,
        };
        let graph = layout.to_graph();
        assert_eq!(graph.entities(), ["a", "b"]);
        assert_eq!(graph.edges(), [Edge::new("b", "a")]);
    }
}
