//! Scene construction from a layout.
//!
//! [`SceneRenderer`] maps positioned nodes and edges to drawing primitives:
//! one line per edge, one circle per node and one label per node. The mapping
//! is pure; the only environment it consults is the label font metrics.

use log::debug;

use textgraph_core::{
    color::Color,
    geometry::{Point, Size},
    scene::{Circle, Label, Line, Primitive, Scene, Stroke, TextAnchor},
    text::{self, TextStyle},
};

use crate::{
    config::StyleConfig,
    error::ConfigError,
    layout::{Layout, LayoutEdge, LayoutNode},
};

/// Converts layouts into [`Scene`]s using a fixed style
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    background: Color,
    node_fill: Color,
    node_radius: f32,
    edge_stroke: Stroke,
    label_style: TextStyle,
    label_offset: Point,
}

impl SceneRenderer {
    /// Builds a renderer from the style section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Color`] if a configured color does not parse.
    pub fn from_style(style: &StyleConfig) -> Result<Self, ConfigError> {
        let (offset_x, offset_y) = style.label_offset();
        Ok(Self {
            background: style.background()?,
            node_fill: style.node_color()?,
            node_radius: style.node_radius(),
            edge_stroke: Stroke::new(style.edge_color()?, style.edge_width()),
            label_style: TextStyle::new(style.font_family(), style.font_size())
                .with_color(Some(style.label_color()?)),
            label_offset: Point::new(offset_x, offset_y),
        })
    }

    /// Renders a complete layout
    pub fn render_layout(&self, layout: &Layout) -> Scene {
        self.render(layout.nodes(), layout.edges(), layout.canvas())
    }

    /// Renders `nodes` and `edges` onto a canvas of the given size.
    ///
    /// Primitives are ordered lines, then circles, then labels, so nodes are
    /// painted over edges and labels over both.
    pub fn render(&self, nodes: &[LayoutNode], edges: &[LayoutEdge], canvas: Size) -> Scene {
        let mut scene = Scene::new(canvas, self.background);

        for edge in edges {
            let from = nodes[edge.source()].position();
            let to = nodes[edge.target()].position();
            scene.push(Primitive::Line(Line::new(from, to, self.edge_stroke.clone())));
        }

        for node in nodes {
            scene.push(Primitive::Circle(Circle::new(
                node.position(),
                self.node_radius,
                self.node_fill,
            )));
        }

        let mut flipped = 0;
        for node in nodes {
            let label = self.label_for(node, canvas);
            if label.anchor() == TextAnchor::End {
                flipped += 1;
            }
            scene.push(Primitive::Label(label));
        }

        debug!(
            lines = edges.len(),
            circles = nodes.len(),
            flipped_labels = flipped;
            "Scene rendered"
        );
        scene
    }

    /// Places the label right of its node, or left when it would overflow
    /// the right edge of the canvas.
    fn label_for(&self, node: &LayoutNode, canvas: Size) -> Label {
        let center = node.position();
        let right = center.add_point(self.label_offset);
        let width = text::measure(node.id(), &self.label_style).width();

        if right.x() + width > canvas.width() {
            let left = Point::new(center.x() - self.label_offset.x(), right.y());
            Label::new(left, node.id(), self.label_style.clone()).with_anchor(TextAnchor::End)
        } else {
            Label::new(right, node.id(), self.label_style.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn renderer() -> SceneRenderer {
        SceneRenderer::from_style(&StyleConfig::default()).unwrap()
    }

    fn nodes() -> Vec<LayoutNode> {
        vec![
            LayoutNode::new("Alice", Point::new(100.0, 100.0)),
            LayoutNode::new("Bob", Point::new(200.0, 150.0)),
        ]
    }

    #[test]
    fn test_one_primitive_of_each_kind_per_element() {
        let scene = renderer().render(&nodes(), &[LayoutEdge::new(0, 1)], Size::new(800.0, 600.0));
        assert_eq!(scene.lines().count(), 1);
        assert_eq!(scene.circles().count(), 2);
        assert_eq!(scene.labels().count(), 2);
        assert_eq!(scene.size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_primitive_order() {
        let scene = renderer().render(&nodes(), &[LayoutEdge::new(0, 1)], Size::new(800.0, 600.0));
        let kinds: Vec<u8> = scene
            .primitives()
            .iter()
            .map(|primitive| match primitive {
                Primitive::Line(_) => 0,
                Primitive::Circle(_) => 1,
                Primitive::Label(_) => 2,
            })
            .collect();
        assert_eq!(kinds, [0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_default_styling() {
        let scene = renderer().render(&nodes(), &[LayoutEdge::new(0, 1)], Size::new(800.0, 600.0));

        let line = scene.lines().next().unwrap();
        assert_eq!(line.from(), Point::new(100.0, 100.0));
        assert_eq!(line.to(), Point::new(200.0, 150.0));
        assert_approx_eq!(f32, line.stroke().width(), 2.0);
        assert_approx_eq!(f32, line.stroke().color().alpha(), 0.6, epsilon = 1e-3);

        let circle = scene.circles().next().unwrap();
        assert_approx_eq!(f32, circle.radius(), 5.0);
        assert_eq!(circle.fill(), &Color::new("#69b3a2").unwrap());

        let label = scene.labels().next().unwrap();
        assert_eq!(label.text(), "Alice");
        assert_eq!(label.position(), Point::new(108.0, 103.0));
        assert_eq!(label.anchor(), TextAnchor::Start);
        assert_approx_eq!(f32, label.style().font_size(), 10.0);
    }

    #[test]
    fn test_label_flips_at_right_edge() {
        let nodes = vec![LayoutNode::new("A rather long entity name", Point::new(790.0, 50.0))];
        let scene = renderer().render(&nodes, &[], Size::new(800.0, 600.0));

        let label = scene.labels().next().unwrap();
        assert_eq!(label.anchor(), TextAnchor::End);
        assert_eq!(label.position(), Point::new(782.0, 53.0));
    }

    #[test]
    fn test_empty_layout_is_blank_scene() {
        let scene = renderer().render(&[], &[], Size::new(800.0, 600.0));
        assert!(scene.is_blank());
        assert_eq!(scene.background(), &Color::new("white").unwrap());
    }

    #[test]
    fn test_self_loop_renders_degenerate_line() {
        let nodes = vec![LayoutNode::new("Solo", Point::new(50.0, 60.0))];
        let scene = renderer().render(&nodes, &[LayoutEdge::new(0, 0)], Size::new(800.0, 600.0));
        let line = scene.lines().next().unwrap();
        assert_eq!(line.from(), line.to());
    }

    #[test]
    fn test_invalid_style_color() {
        let style: StyleConfig = serde_json::from_str(r#"{"background": "nope"}"#).unwrap();
        assert!(SceneRenderer::from_style(&style).is_err());
    }
}
