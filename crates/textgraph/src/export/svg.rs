//! SVG serialization of a [`Scene`].
//!
//! The document has exactly the scene's canvas size, a full-canvas background
//! rectangle and one element per primitive in paint order. Colors are written
//! as an opaque `#rrggbb` value plus an explicit `*-opacity` attribute.

use log::debug;
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use textgraph_core::scene::{Circle, Label, Line, Primitive, Scene};

/// Builds the SVG document for `scene`.
pub fn to_document(scene: &Scene) -> Document {
    let size = scene.size();
    let mut doc = Document::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
        .set("width", size.width())
        .set("height", size.height());

    doc = doc.add(
        svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", scene.background())
            .set("fill-opacity", scene.background().alpha()),
    );

    for primitive in scene.primitives() {
        doc = match primitive {
            Primitive::Line(line) => doc.add(line_element(line)),
            Primitive::Circle(circle) => doc.add(circle_element(circle)),
            Primitive::Label(label) => doc.add(label_element(label)),
        };
    }

    debug!(primitives = scene.primitives().len(); "SVG document built");
    doc
}

/// Serializes `scene` to an SVG string.
///
/// # Examples
///
/// ```
/// # use textgraph::export::svg::render_svg;
/// # use textgraph_core::{color::Color, geometry::Size, scene::Scene};
/// let scene = Scene::new(Size::new(80.0, 60.0), Color::new("white").unwrap());
/// let svg = render_svg(&scene);
/// assert!(svg.contains("<svg"));
/// assert!(svg.contains(r#"viewBox="0 0 80 60""#));
/// ```
pub fn render_svg(scene: &Scene) -> String {
    to_document(scene).to_string()
}

fn line_element(line: &Line) -> svg_element::Line {
    let stroke = line.stroke();
    svg_element::Line::new()
        .set("x1", line.from().x())
        .set("y1", line.from().y())
        .set("x2", line.to().x())
        .set("y2", line.to().y())
        .set("stroke", stroke.color())
        .set("stroke-opacity", stroke.color().alpha())
        .set("stroke-width", stroke.width())
}

fn circle_element(circle: &Circle) -> svg_element::Circle {
    let mut element = svg_element::Circle::new()
        .set("cx", circle.center().x())
        .set("cy", circle.center().y())
        .set("r", circle.radius())
        .set("fill", circle.fill())
        .set("fill-opacity", circle.fill().alpha());

    if let Some(stroke) = circle.stroke() {
        element = element
            .set("stroke", stroke.color())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width());
    }
    element
}

fn label_element(label: &Label) -> svg_element::Text {
    let style = label.style();
    let mut element = svg_element::Text::new("")
        .set("x", label.position().x())
        .set("y", label.position().y())
        .set("text-anchor", label.anchor().as_svg())
        .set("font-family", style.font_family())
        .set("font-size", style.font_size());

    if let Some(color) = style.color() {
        element = element
            .set("fill", color)
            .set("fill-opacity", color.alpha());
    }

    element.add(SvgText::new(label.text()))
}
