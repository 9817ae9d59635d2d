// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives shared by layout and charts.

/// A coordinate pair, in data space or pixel space depending on context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// A width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self::new(width, height)
    }
}

impl From<[f64; 2]> for Size {
    fn from([width, height]: [f64; 2]) -> Self {
        Self::new(width, height)
    }
}

/// A canonical axis-aligned rectangle.
///
/// Built from an origin and a possibly negative extent; always stored with
/// `x <= x2`, `y <= y2` and non-negative `width`/`height`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// A zero-sized rectangle at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a rectangle from an origin and an extent; negative extents are flipped.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: x.min(x + width),
            y: y.min(y + height),
            width: width.abs(),
            height: height.abs(),
        }
    }

    /// Left edge.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Right edge.
    pub fn x2(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y2(&self) -> f64 {
        self.y + self.height
    }

    /// Width, never negative.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height, never negative.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns `true` if `p` lies inside or on the edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x2() && p.y >= self.y && p.y <= self.y2()
    }

    /// Converts into a `kurbo` rectangle.
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.x, self.y, self.x2(), self.y2())
    }
}

impl From<[f64; 4]> for Rect {
    fn from([x, y, w, h]: [f64; 4]) -> Self {
        Self::new(x, y, w, h)
    }
}

impl From<kurbo::Rect> for Rect {
    fn from(r: kurbo::Rect) -> Self {
        Self::new(r.x0, r.y0, r.x1 - r.x0, r.y1 - r.y0)
    }
}

impl From<Rect> for kurbo::Rect {
    fn from(r: Rect) -> Self {
        r.to_kurbo()
    }
}

/// Per-side distances, used for padding and range margins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    /// Top inset.
    pub top: f64,
    /// Right inset.
    pub right: f64,
    /// Bottom inset.
    pub bottom: f64,
    /// Left inset.
    pub left: f64,
}

impl Insets {
    /// All sides zero.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Creates insets in `top, right, bottom, left` order.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same inset on every side.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}
