//! Force simulation
//!
//! Every tick accumulates three forces per node:
//!
//! - repulsion between every pair of nodes, `repulsion / d²`
//! - a spring along every edge, `link_strength · (d − link_distance)`
//! - gravity toward the canvas center, `gravity · (center − p)`
//!
//! Velocities are then updated as `v ← (v + F) · velocity_decay`, capped at
//! `max_velocity`, and positions are moved and clamped into the canvas. The
//! run stops after `ticks` steps or once the kinetic energy `Σ ½|v|²` drops
//! below `energy_epsilon`.

use log::{debug, trace};

use textgraph_core::{
    geometry::{Bounds, Point, Size},
    graph::Graph,
};

use super::{IndexedGraph, Layout, LayoutEdge, LayoutNode, placement};
use crate::{
    config::{CanvasConfig, LayoutConfig},
    error::LayoutError,
};

/// Squared distance below which two nodes count as coincident
const COINCIDENT_DISTANCE_SQUARED: f32 = 1e-6;

/// Force layout engine
///
/// Holds only parameters; each call to [`ForceLayout::layout`] runs an
/// independent simulation.
///
/// # Examples
///
/// ```
/// # use textgraph::layout::ForceLayout;
/// # use textgraph_core::{geometry::Size, graph::{Edge, Graph}};
/// let graph = Graph::new(
///     vec!["Alice".to_string(), "Bob".to_string()],
///     vec![Edge::new("Alice", "Bob")],
/// );
///
/// let mut engine = ForceLayout::new(Size::new(800.0, 600.0));
/// engine.set_seed(Some(42)).set_ticks(100);
///
/// let layout = engine.layout(&graph).unwrap();
/// assert_eq!(layout.nodes().len(), 2);
/// assert!(layout.ticks() <= 100);
/// ```
#[derive(Debug, Clone)]
pub struct ForceLayout {
    canvas: Size,
    max_nodes: usize,
    ticks: usize,
    seed: Option<u64>,
    repulsion: f32,
    link_distance: f32,
    link_strength: f32,
    gravity: f32,
    velocity_decay: f32,
    max_velocity: f32,
    energy_epsilon: f32,
    margin: f32,
}

impl ForceLayout {
    /// Create an engine for `canvas` with default parameters
    pub fn new(canvas: Size) -> Self {
        Self::from_config(canvas, &LayoutConfig::default())
    }

    /// Create an engine from the configuration sections
    pub fn from_configs(canvas: &CanvasConfig, layout: &LayoutConfig) -> Self {
        Self::from_config(canvas.size(), layout)
    }

    fn from_config(canvas: Size, config: &LayoutConfig) -> Self {
        Self {
            canvas,
            max_nodes: config.max_nodes(),
            ticks: config.ticks(),
            seed: config.seed(),
            repulsion: config.repulsion(),
            link_distance: config.link_distance(),
            link_strength: config.link_strength(),
            gravity: config.gravity(),
            velocity_decay: config.velocity_decay(),
            max_velocity: config.max_velocity(),
            energy_epsilon: config.energy_epsilon(),
            margin: config.margin(),
        }
    }

    /// Set the maximum number of simulation ticks
    pub fn set_ticks(&mut self, ticks: usize) -> &mut Self {
        self.ticks = ticks;
        self
    }

    /// Set the placement seed; `None` selects the spiral placement
    pub fn set_seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Set the node cap
    pub fn set_max_nodes(&mut self, max_nodes: usize) -> &mut Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Set the kinetic energy threshold for stopping early
    pub fn set_energy_epsilon(&mut self, energy_epsilon: f32) -> &mut Self {
        self.energy_epsilon = energy_epsilon;
        self
    }

    /// Lays out `graph`.
    ///
    /// Entities beyond the node cap are dropped together with their edges.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Diverged`] if a position or velocity becomes
    /// non-finite.
    pub fn layout(&self, graph: &Graph) -> Result<Layout, LayoutError> {
        let IndexedGraph {
            ids,
            edges,
            truncated,
        } = IndexedGraph::new(graph, self.max_nodes);

        let bounds = self.bounds();
        let center = self.canvas.center();

        let mut positions = placement::initial_positions(ids.len(), bounds, self.seed);
        let mut velocities = vec![Point::default(); ids.len()];
        let mut forces = vec![Point::default(); ids.len()];

        debug!(
            node_count = ids.len(),
            edge_count = edges.len(),
            seeded = self.seed.is_some();
            "Starting force simulation"
        );

        let mut ticks_run = 0;
        if !ids.is_empty() {
            for tick in 0..self.ticks {
                forces.fill(Point::default());
                self.apply_repulsion(&positions, &mut forces);
                self.apply_springs(&positions, &edges, &mut forces);
                self.apply_gravity(&positions, center, &mut forces);

                let energy = self.integrate(&mut positions, &mut velocities, &forces, bounds);
                ticks_run = tick + 1;

                if !energy.is_finite()
                    || positions.iter().chain(&velocities).any(|p| !p.is_finite())
                {
                    return Err(LayoutError::Diverged { tick });
                }

                trace!(tick, energy; "Simulation tick");
                if energy < self.energy_epsilon {
                    debug!(tick, energy; "Simulation settled");
                    break;
                }
            }
        }

        let nodes = ids
            .into_iter()
            .zip(positions)
            .zip(velocities)
            .map(|((id, position), velocity)| LayoutNode {
                id,
                position,
                velocity,
            })
            .collect();

        debug!(ticks = ticks_run; "Force simulation finished");

        Ok(Layout {
            canvas: self.canvas,
            nodes,
            edges,
            ticks: ticks_run,
            truncated,
        })
    }

    /// Region node centers are kept inside
    fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(Point::default(), self.canvas).shrink(self.margin)
    }

    fn apply_repulsion(&self, positions: &[Point], forces: &mut [Point]) {
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let delta = positions[i].sub_point(positions[j]);
                let distance_squared = delta.length_squared();

                let (direction, distance_squared) =
                    if distance_squared < COINCIDENT_DISTANCE_SQUARED {
                        (jitter_direction(i, j), 1.0)
                    } else {
                        (
                            delta.scale(1.0 / distance_squared.sqrt()),
                            distance_squared.max(1.0),
                        )
                    };

                let push = direction.scale(self.repulsion / distance_squared);
                forces[i] = forces[i].add_point(push);
                forces[j] = forces[j].sub_point(push);
            }
        }
    }

    fn apply_springs(&self, positions: &[Point], edges: &[LayoutEdge], forces: &mut [Point]) {
        for edge in edges.iter().filter(|edge| !edge.is_self_loop()) {
            let (source, target) = (edge.source(), edge.target());
            let delta = positions[target].sub_point(positions[source]);
            let distance = delta.hypot();
            if distance * distance < COINCIDENT_DISTANCE_SQUARED {
                continue;
            }

            // Positive when stretched, pulling the endpoints together
            let stretch = self.link_strength * (distance - self.link_distance);
            let pull = delta.scale(stretch / distance);
            forces[source] = forces[source].add_point(pull);
            forces[target] = forces[target].sub_point(pull);
        }
    }

    fn apply_gravity(&self, positions: &[Point], center: Point, forces: &mut [Point]) {
        for (force, position) in forces.iter_mut().zip(positions) {
            *force = force.add_point(center.sub_point(*position).scale(self.gravity));
        }
    }

    /// Advances one tick and returns the kinetic energy after it.
    fn integrate(
        &self,
        positions: &mut [Point],
        velocities: &mut [Point],
        forces: &[Point],
        bounds: Bounds,
    ) -> f32 {
        let mut energy = 0.0;
        for ((position, velocity), force) in positions.iter_mut().zip(velocities).zip(forces) {
            *velocity = velocity
                .add_point(*force)
                .scale(self.velocity_decay)
                .clamp_length(self.max_velocity);
            *position = position.add_point(*velocity).clamp_to(bounds);
            energy += 0.5 * velocity.length_squared();
        }
        energy
    }
}

/// Deterministic unit vector for separating the coincident pair `(i, j)`.
fn jitter_direction(i: usize, j: usize) -> Point {
    let degrees = (i.wrapping_mul(7919).wrapping_add(j.wrapping_mul(104_729))) % 360;
    let angle = (degrees as f32).to_radians();
    Point::new(angle.cos(), angle.sin())
}
