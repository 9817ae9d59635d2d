// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measure and arrange passes for the plot rectangle.
//!
//! - **Measure**: create every tick mark and label at the origin, read back the label's
//!   bounding box, and keep the largest footprint each axis needs outside the plot.
//! - **Arrange**: derive the four margins from the footprints and the padding, yielding a
//!   [`PlotLayout`].
//! - **Place**: move the already-measured elements into position against the finalized
//!   transform. Nothing is measured twice.

use alloc::vec::Vec;

use kurbo::Affine;
use quadrant_surface::{ElementId, Surface, SurfaceError};

use crate::axis::{
    Axis, AxisConfig, DataRange, Dimension, LABEL_GAP, LabelPlacement, TickInfo, TickMark,
};
use crate::geometry::{Insets, Point, Rect, Size};
use crate::setting::Customize;
use crate::ticks::format_tick;
use crate::transform::CoordinateTransform;
use crate::z_order::{GroupSet, Layer};

/// Space an axis needs outside the plot rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Footprint {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Footprint {
    fn grow(&mut self, width: f64, height: f64) {
        self.width = self.width.max(width);
        self.height = self.height.max(height);
    }
}

/// A tick whose elements exist but are not positioned yet.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MeasuredTick {
    pub(crate) info: TickInfo,
    pub(crate) mark: Option<(ElementId, Rect)>,
    pub(crate) label: Option<ElementId>,
}

/// The measure-pass result for one axis.
#[derive(Clone, Debug)]
pub(crate) struct MeasuredAxis {
    pub(crate) axis: Axis,
    pub(crate) ticks: Vec<MeasuredTick>,
    pub(crate) footprint: Footprint,
}

/// Creates the tick marks and labels of `axis` and measures its footprint.
pub(crate) fn measure_axis(
    surface: &mut dyn Surface,
    axis: Axis,
    config: &AxisConfig,
    ticks: &[(usize, f64)],
) -> Result<MeasuredAxis, SurfaceError> {
    let mut footprint = Footprint::default();
    let mut measured = Vec::with_capacity(ticks.len());

    for &(index, value) in ticks {
        let info = TickInfo { axis, value, index };

        let mark = match config.tick.resolve(&info).or_default(TickMark::default()) {
            Some(mark) => {
                let id = surface.rect(kurbo::Rect::ZERO);
                surface.set_attrs(id, &mark.attrs)?;
                Some((id, mark.rect))
            }
            None => None,
        };
        let (outer_w, outer_h) = outer_tick_extent(axis, mark.map(|(_, r)| r));

        let label = create_label(surface, config, &info)?;
        if let Some(id) = label {
            let (w, h) = label_extent(axis, surface.bounding_box(id)?);
            footprint.grow(w + outer_w, h + outer_h);
        }

        measured.push(MeasuredTick { info, mark, label });
    }

    log::trace!(
        "{} axis: {} ticks, footprint {:?}",
        axis.name(),
        measured.len(),
        footprint
    );
    Ok(MeasuredAxis {
        axis,
        ticks: measured,
        footprint,
    })
}

/// The part of a tick mark outside the plot, plus the label gap.
fn outer_tick_extent(axis: Axis, mark: Option<Rect>) -> (f64, f64) {
    let (w, h) = match (axis, mark) {
        (_, None) => (0.0, 0.0),
        (Axis::X | Axis::X2, Some(r)) => (0.0, (-r.x()).max(0.0)),
        (Axis::Y, Some(r)) => ((-r.x()).max(0.0), 0.0),
        (Axis::Y2, Some(r)) => (r.x2().max(0.0), 0.0),
    };
    match axis.dimension() {
        Dimension::X => (w, h + LABEL_GAP),
        Dimension::Y => (w + LABEL_GAP, h),
    }
}

/// The part of a label box, measured at the origin, that falls outside the plot.
fn label_extent(axis: Axis, b: kurbo::Rect) -> (f64, f64) {
    match axis {
        Axis::X => (b.width(), b.y1.max(0.0)),
        Axis::X2 => (b.width(), (-b.y0).max(0.0)),
        Axis::Y => ((-b.x0).max(0.0), b.height()),
        Axis::Y2 => (b.x1.max(0.0), b.height()),
    }
}

fn create_label(
    surface: &mut dyn Surface,
    config: &AxisConfig,
    info: &TickInfo,
) -> Result<Option<ElementId>, SurfaceError> {
    let id = surface.text(kurbo::Point::ORIGIN, &format_tick(info.value));
    surface.set_attrs(id, &config.label_defaults)?;
    match config.label.resolve(info) {
        Customize::Skip => {
            surface.remove(id)?;
            return Ok(None);
        }
        Customize::Replace(attrs) => surface.set_attrs(id, &attrs)?,
        Customize::UseDefault => {}
    }
    if surface.attrs(id)?.text.as_deref().is_none_or(str::is_empty) {
        surface.remove(id)?;
        return Ok(None);
    }
    Ok(Some(id))
}

/// The finalized geometry of one render pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotLayout {
    surface: Size,
    plot: Rect,
    x_range: DataRange,
    y_range: DataRange,
    footprints: [Footprint; 4],
}

impl PlotLayout {
    /// Derives the plot rectangle from per-axis footprints (indexed by [`Axis::index`]).
    ///
    /// Each side's margin is its padding plus the larger of the two footprints that reach it.
    pub fn arrange(
        surface: Size,
        padding: Insets,
        footprints: [Footprint; 4],
        x_range: DataRange,
        y_range: DataRange,
    ) -> Self {
        let [x, x2, y, y2] = footprints;
        let left = padding.left + x.width.max(y.width);
        let right = padding.right + x.width.max(y2.width);
        let bottom = padding.bottom + x.height.max(y.height);
        let top = padding.top + x2.height.max(y.height);
        let plot = Rect::new(
            left,
            top,
            (surface.width - left - right).max(0.0),
            (surface.height - top - bottom).max(0.0),
        );
        Self {
            surface,
            plot,
            x_range,
            y_range,
            footprints,
        }
    }

    /// The surface size the layout was computed for.
    pub fn surface(&self) -> Size {
        self.surface
    }

    /// The plot rectangle in pixels.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// The resolved horizontal range.
    pub fn x_range(&self) -> DataRange {
        self.x_range
    }

    /// The resolved vertical range.
    pub fn y_range(&self) -> DataRange {
        self.y_range
    }

    /// The measured footprint of `axis`.
    pub fn footprint(&self, axis: Axis) -> Footprint {
        self.footprints[axis.index()]
    }

    /// The mapping from data space into [`PlotLayout::plot`].
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform::new(self)
    }
}

/// Positions measured tick marks and labels and files them into the canvas groups.
pub(crate) fn place_axis(
    surface: &mut dyn Surface,
    config: &AxisConfig,
    measured: &MeasuredAxis,
    transform: &CoordinateTransform,
    groups: &mut GroupSet,
) -> Result<(), SurfaceError> {
    let plot = transform.plot();
    let axis = measured.axis;

    for tick in &measured.ticks {
        let v = tick.info.value;
        let mut offset = 0.0;

        if let Some((id, t)) = tick.mark {
            offset = match axis {
                Axis::X => (-t.y()).max(0.0),
                Axis::X2 => t.y2().max(0.0),
                Axis::Y => (-t.x()).max(0.0),
                Axis::Y2 => t.x2().max(0.0),
            };
            // Horizontal-axis ticks are the local rect turned a quarter, hanging off the edge.
            let placed = match axis {
                Axis::X | Axis::X2 => {
                    let edge = if axis == Axis::X { plot.y2() } else { plot.y() };
                    Rect::new(
                        transform.to_pixel_x(v) + t.y() / 2.0,
                        edge - t.x() - t.width(),
                        t.height(),
                        t.width(),
                    )
                }
                Axis::Y | Axis::Y2 => {
                    let edge = if axis == Axis::Y { plot.x() } else { plot.x2() };
                    Rect::new(
                        edge + t.x(),
                        transform.to_pixel_y(v) + t.y(),
                        t.width(),
                        t.height(),
                    )
                }
            };
            surface.set_rect(id, placed.to_kurbo())?;
            groups.push(Layer::Border, id);
        }

        if let Some(id) = tick.label {
            let at = match axis {
                Axis::X => Point::new(transform.to_pixel_x(v), plot.y2() + LABEL_GAP + offset),
                Axis::X2 => Point::new(transform.to_pixel_x(v), plot.y() - LABEL_GAP - offset),
                Axis::Y => Point::new(plot.x() - LABEL_GAP - offset, transform.to_pixel_y(v)),
                Axis::Y2 => Point::new(plot.x2() + LABEL_GAP + offset, transform.to_pixel_y(v)),
            };
            let current = surface.attrs(id)?.transform.unwrap_or(Affine::IDENTITY);
            let attrs = config.label_placement.resolve(&LabelPlacement {
                tick: tick.info,
                at,
                transform: current,
            });
            surface.set_attrs(id, &attrs)?;
            groups.push(Layer::Labels, id);
        }
    }
    Ok(())
}
