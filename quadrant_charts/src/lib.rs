// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cartesian line and bar charts on a retained drawing surface.
//!
//! A [`Canvas`] owns a [`Surface`](quadrant_surface::Surface), four axes, and any number of
//! attached charts. Each [`Canvas::render`] pass:
//! - resolves the data ranges (fixed, or derived from the charts' data bounds),
//! - creates tick marks and labels and measures how much room each axis needs,
//! - derives the plot rectangle and the data-to-pixel [`CoordinateTransform`],
//! - draws the border, grid lines, axes, decorations and charts,
//! - composites every element group by z-index, so layers interleave across charts.
//!
//! Almost every visual decision is a [`Setting`]: either a literal value or a callback that
//! receives the data being drawn. Per-element hooks return a [`Customize`] that keeps, replaces
//! or skips the element.
//!
//! Shaping and glyph rendering are out of scope; labels are plain text elements whose extent
//! comes from the surface's text measurement.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod axis;
mod bar_chart;
mod canvas;
mod chart;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod geometry;
mod layout;
mod line_chart;
#[cfg(test)]
mod scenario_tests;
mod setting;
mod ticks;
mod transform;
mod z_order;

pub use axis::{
    Axis, AxisConfig, DataRange, Dimension, LABEL_FONT_SIZE, LABEL_GAP, LabelPlacement,
    RangeContext, TickContext, TickInfo, TickMark, default_label_attrs, default_x_tick_count,
    default_y_tick_count,
};
pub use bar_chart::{BarChart, BarContext, BarWidth};
pub use canvas::{
    Canvas, ChartId, DecorateFn, DecorationSink, GridLine, RenderReport, default_border_attrs,
    default_grid_attrs,
};
pub use chart::{
    DEFAULT_FADE, DataBounds, Datum, DrawFn, ElementSink, Glyph, RenderableSeries, SeriesState,
    TranslateFn, default_translate,
};
pub use error::RenderError;
pub use geometry::{Insets, Point, Rect, Size};
pub use layout::{Footprint, PlotLayout};
pub use line_chart::{DOT_RADIUS, DotContext, LineChart, PathContext, SplitFn};
pub use setting::{Customize, Setting};
pub use ticks::{evenly_spaced, format_tick, nice_scale, nice_ticks};
pub use transform::CoordinateTransform;
pub use z_order::*;
