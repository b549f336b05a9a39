//! Geometric primitives for graph layout and rendering.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or vector) in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Textgraph uses the same coordinate system as SVG and raster images:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left corner of the canvas and Y grows downward.

/// A 2D point in canvas coordinate space.
///
/// Points double as 2D vectors: the force simulation stores velocities and
/// accumulated forces as `Point`s and uses the same arithmetic helpers.
///
/// # Examples
///
/// ```
/// # use textgraph_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let delta = p1.sub_point(p2);
/// assert_eq!(delta.length_squared(), 250.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns true if neither coordinate is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Euclidean length of the vector from the origin
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Squared Euclidean length, avoiding the square root
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Returns this vector rescaled so its length does not exceed `max`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use textgraph_core::geometry::Point;
    /// let v = Point::new(30.0, 40.0).clamp_length(10.0);
    /// assert!((v.hypot() - 10.0).abs() < 1e-4);
    ///
    /// let short = Point::new(1.0, 1.0);
    /// assert_eq!(short.clamp_length(10.0), short);
    /// ```
    pub fn clamp_length(self, max: f32) -> Self {
        let length = self.hypot();
        if length > max && length > 0.0 {
            self.scale(max / length)
        } else {
            self
        }
    }

    /// Clamps the point into the given bounds
    pub fn clamp_to(self, bounds: Bounds) -> Self {
        Self {
            x: self.x.clamp(bounds.min_x, bounds.max_x.max(bounds.min_x)),
            y: self.y.clamp(bounds.min_y, bounds.max_y.max(bounds.min_y)),
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the center point of a canvas of this size
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Shrinks the bounds by `margin` on every side.
    ///
    /// A margin larger than half the extent collapses that axis onto its
    /// center line instead of inverting the bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use textgraph_core::geometry::{Bounds, Point, Size};
    /// let canvas = Bounds::new_from_top_left(Point::default(), Size::new(100.0, 50.0));
    /// let inner = canvas.shrink(10.0);
    /// assert_eq!(inner.min_x(), 10.0);
    /// assert_eq!(inner.max_y(), 40.0);
    ///
    /// let collapsed = canvas.shrink(40.0);
    /// assert_eq!(collapsed.min_y(), 25.0);
    /// assert_eq!(collapsed.max_y(), 25.0);
    /// ```
    pub fn shrink(self, margin: f32) -> Self {
        let margin_x = margin.min(self.width() / 2.0);
        let margin_y = margin.min(self.height() / 2.0);
        Self {
            min_x: self.min_x + margin_x,
            min_y: self.min_y + margin_y,
            max_x: self.max_x - margin_x,
            max_y: self.max_y - margin_y,
        }
    }

    /// Returns true if the point lies inside the bounds (edges inclusive)
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}
