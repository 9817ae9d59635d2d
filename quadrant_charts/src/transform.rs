// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-to-pixel mapping for a finalized plot rectangle.

use crate::axis::DataRange;
use crate::geometry::{Point, Rect};
use crate::layout::PlotLayout;

/// Maps data coordinates into the plot rectangle of one render pass.
///
/// Only obtainable from a [`PlotLayout`], so it always reflects finalized margins.
/// A zero-span range collapses onto the plot's left edge (x) or bottom edge (y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransform {
    plot: Rect,
    x: DataRange,
    y: DataRange,
}

impl CoordinateTransform {
    pub(crate) fn new(layout: &PlotLayout) -> Self {
        Self {
            plot: layout.plot(),
            x: layout.x_range(),
            y: layout.y_range(),
        }
    }

    /// The plot rectangle in pixels.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// The horizontal data range.
    pub fn x_range(&self) -> DataRange {
        self.x
    }

    /// The vertical data range.
    pub fn y_range(&self) -> DataRange {
        self.y
    }

    /// Maps a data x value to a pixel x.
    pub fn to_pixel_x(&self, x: f64) -> f64 {
        let span = self.x.span();
        if span == 0.0 {
            return self.plot.x();
        }
        self.plot.x() + self.plot.width() * (x - self.x.min) / span
    }

    /// Maps a data y value to a pixel y; larger values are higher up.
    pub fn to_pixel_y(&self, y: f64) -> f64 {
        let span = self.y.span();
        if span == 0.0 {
            return self.plot.y2();
        }
        self.plot.y2() - self.plot.height() * (y - self.y.min) / span
    }

    /// Maps a data point to pixels.
    pub fn to_pixel(&self, p: Point) -> Point {
        Point::new(self.to_pixel_x(p.x), self.to_pixel_y(p.y))
    }

    /// Pixels per data unit along x, or zero for a degenerate range.
    pub fn x_scale(&self) -> f64 {
        let span = self.x.span();
        if span == 0.0 {
            0.0
        } else {
            self.plot.width() / span
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Insets, Size};
    use crate::layout::Footprint;

    fn transform(x: (f64, f64), y: (f64, f64)) -> CoordinateTransform {
        PlotLayout::arrange(
            Size::new(200.0, 100.0),
            Insets::new(10.0, 20.0, 30.0, 40.0),
            [Footprint::default(); 4],
            x.into(),
            y.into(),
        )
        .transform()
    }

    #[test]
    fn endpoints_map_to_plot_edges() {
        let t = transform((0.0, 10.0), (-5.0, 5.0));
        let plot = t.plot();
        assert_eq!(t.to_pixel_x(0.0), plot.x());
        assert_eq!(t.to_pixel_x(10.0), plot.x2());
        assert_eq!(t.to_pixel_y(-5.0), plot.y2());
        assert_eq!(t.to_pixel_y(5.0), plot.y());

        let mut last_x = f64::NEG_INFINITY;
        let mut last_y = f64::INFINITY;
        for i in 0..=20 {
            let v = f64::from(i) * 0.5;
            let px = t.to_pixel_x(v);
            let py = t.to_pixel_y(v - 5.0);
            assert!(px > last_x, "x not increasing at {v}");
            assert!(py < last_y, "y not decreasing at {v}");
            last_x = px;
            last_y = py;
        }
    }

    #[test]
    fn degenerate_ranges_collapse_to_anchor_edges() {
        let t = transform((3.0, 3.0), (7.0, 7.0));
        let plot = t.plot();
        for v in [-1e9, 3.0, 42.0] {
            assert_eq!(t.to_pixel_x(v), plot.x());
            assert_eq!(t.to_pixel_y(v), plot.y2());
        }
        assert_eq!(t.x_scale(), 0.0);
    }
}
