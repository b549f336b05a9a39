//! Declarative vector scene.
//!
//! A [`Scene`] is the backend-agnostic description of a rendered graph: the
//! canvas size, a background color and an ordered list of [`Primitive`]s.
//! It owns no external resources, so scenes can be built and inspected in
//! tests without any rendering backend.
//!
//! Primitives are painted in list order, so later primitives cover earlier
//! ones.
//!
//! # Example
//!
//! ```
//! # use textgraph_core::{color::Color, geometry::{Point, Size}};
//! # use textgraph_core::scene::{Circle, Primitive, Scene};
//! let mut scene = Scene::new(Size::new(800.0, 600.0), Color::new("white").unwrap());
//! scene.push(Primitive::Circle(Circle::new(
//!     Point::new(400.0, 300.0),
//!     5.0,
//!     Color::new("#69b3a2").unwrap(),
//! )));
//!
//! assert_eq!(scene.circles().count(), 1);
//! assert_eq!(scene.lines().count(), 0);
//! ```

use crate::{
    color::Color,
    geometry::{Point, Size},
    text::TextStyle,
};

/// Stroke settings shared by line-like primitives
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    color: Color,
    width: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

/// A straight segment between two positions
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    from: Point,
    to: Point,
    stroke: Stroke,
}

impl Line {
    pub fn new(from: Point, to: Point, stroke: Stroke) -> Self {
        Self { from, to, stroke }
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }

    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }
}

/// A filled circle centered on a position
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f32,
    fill: Color,
    stroke: Option<Stroke>,
}

impl Circle {
    pub fn new(center: Point, radius: f32, fill: Color) -> Self {
        Self {
            center,
            radius,
            fill,
            stroke: None,
        }
    }

    /// Adds an outline to the circle
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn fill(&self) -> &Color {
        &self.fill
    }

    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }
}

/// Which end of the text sits on the label position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text extends to the right of the position
    #[default]
    Start,
    /// Text extends to the left of the position
    End,
}

impl TextAnchor {
    /// Value of the SVG `text-anchor` attribute
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// A single-line text label whose baseline starts at `position`
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    position: Point,
    text: String,
    style: TextStyle,
    anchor: TextAnchor,
}

impl Label {
    pub fn new(position: Point, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            position,
            text: text.into(),
            style,
            anchor: TextAnchor::default(),
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }
}

/// A drawable element of a [`Scene`]
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Circle(Circle),
    Label(Label),
}

/// Canvas dimensions plus an ordered list of primitives
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    size: Size,
    background: Color,
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Creates an empty scene of the given canvas size
    pub fn new(size: Size, background: Color) -> Self {
        Self {
            size,
            background,
            primitives: Vec::new(),
        }
    }

    /// Appends a primitive on top of everything already in the scene
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn background(&self) -> &Color {
        &self.background
    }

    /// Returns all primitives in paint order
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_blank(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Circle(circle) => Some(circle),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Label(label) => Some(label),
            _ => None,
        })
    }
}
