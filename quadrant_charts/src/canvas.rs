// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas: axis configuration, attached charts and the render pass.

extern crate alloc;

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::BezPath;
use peniko::Color;
use peniko::color::palette::css;
use quadrant_surface::{Attrs, ElementId, Surface, SurfaceError};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::axis::{Axis, AxisConfig, DataRange, Dimension, RangeContext, TickContext};
use crate::chart::{DataBounds, RenderableSeries, apply_outcome};
use crate::error::RenderError;
use crate::geometry::{Insets, Point, Rect, Size};
use crate::layout::{self, PlotLayout};
use crate::setting::{Customize, Setting};
use crate::transform::CoordinateTransform;
use crate::z_order::{GroupOwner, GroupSet, Layer, LayerStack};

/// Handle to a chart attached to a [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(usize);

impl ChartId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position of the chart in attachment order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A grid line being drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    /// `X` for vertical lines, `Y` for horizontal ones.
    pub dimension: Dimension,
    /// The line's data value.
    pub value: f64,
    /// Index of the value in the configured list.
    pub index: usize,
}

/// A decoration hook.
pub type DecorateFn = Arc<dyn Fn(&mut DecorationSink<'_>) -> Result<(), SurfaceError>>;

/// Lets a decoration hook add elements above or below the chart.
pub struct DecorationSink<'a> {
    surface: &'a mut dyn Surface,
    transform: &'a CoordinateTransform,
    above: Vec<ElementId>,
    below: Vec<ElementId>,
}

impl core::fmt::Debug for DecorationSink<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecorationSink")
            .field("transform", self.transform)
            .field("above", &self.above)
            .field("below", &self.below)
            .finish_non_exhaustive()
    }
}

impl DecorationSink<'_> {
    /// The surface to draw on.
    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }

    /// The finalized transform of this pass.
    pub fn transform(&self) -> &CoordinateTransform {
        self.transform
    }

    /// Layers an element above the chart.
    pub fn add_above(&mut self, id: ElementId) {
        self.above.push(id);
    }

    /// Layers an element below the chart.
    pub fn add_below(&mut self, id: ElementId) {
        self.below.push(id);
    }
}

/// What a render pass produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    /// The finalized layout.
    pub layout: PlotLayout,
    /// The distinct z-indices composited, bottom to top.
    pub z_order: Vec<i32>,
}

/// Groups owned by the canvas itself, in enumeration order.
const CANVAS_LAYERS: [Layer; 5] = [
    Layer::Border,
    Layer::AxisLines,
    Layer::Labels,
    Layer::DecorationsAbove,
    Layer::DecorationsBelow,
];

/// Attributes of the plot border before customization.
pub fn default_border_attrs() -> Attrs {
    Attrs::new()
        .with_stroke(css::BLACK)
        .with_stroke_width(1.0)
        .without_fill()
}

/// Attributes of a grid line before customization: dotted 25% grey at 40% alpha.
pub fn default_grid_attrs() -> Attrs {
    Attrs::new()
        .with_stroke(Color::from_rgba8(64, 64, 64, 102))
        .with_stroke_width(1.0)
        .with_dash(&[1.0, 3.0])
        .without_fill()
}

/// Lays out axes and attached charts on a [`Surface`].
///
/// Every [`Canvas::render`] clears the surface and rebuilds everything from the current
/// configuration; nothing computed during a pass is kept on the canvas.
pub struct Canvas<S> {
    surface: S,
    x_range: Setting<DataRange, RangeContext>,
    y_range: Setting<DataRange, RangeContext>,
    range_margins: Insets,
    padding: Setting<Insets, Size>,
    axes: [AxisConfig; 4],
    border: Setting<Customize, Rect>,
    x_lines: Setting<Vec<f64>, DataRange>,
    y_lines: Setting<Vec<f64>, DataRange>,
    x_line: Setting<Customize, GridLine>,
    y_line: Setting<Customize, GridLine>,
    decorations: Option<DecorateFn>,
    charts: Vec<Box<dyn RenderableSeries>>,
    groups: GroupSet,
}

impl<S: core::fmt::Debug> core::fmt::Debug for Canvas<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("surface", &self.surface)
            .field("x_range", &self.x_range)
            .field("y_range", &self.y_range)
            .field("range_margins", &self.range_margins)
            .field("padding", &self.padding)
            .field("axes", &self.axes)
            .field("charts", &self.charts.len())
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Canvas<S> {
    /// Creates a canvas with default axes and no charts.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            x_range: Setting::computed(RangeContext::auto),
            y_range: Setting::computed(RangeContext::auto_from_zero),
            range_margins: Insets::ZERO,
            padding: Setting::Value(Insets::ZERO),
            axes: Axis::ALL.map(AxisConfig::new),
            border: Setting::Value(Customize::UseDefault),
            x_lines: Setting::Value(Vec::new()),
            y_lines: Setting::Value(Vec::new()),
            x_line: Setting::Value(Customize::UseDefault),
            y_line: Setting::Value(Customize::UseDefault),
            decorations: None,
            charts: Vec::new(),
            groups: GroupSet::new(&CANVAS_LAYERS),
        }
    }

    /// The surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Gives the surface back.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The surface size.
    pub fn size(&self) -> Size {
        Size::new(self.surface.width(), self.surface.height())
    }

    /// The configuration of `axis`.
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        &self.axes[axis.index()]
    }

    /// The configuration of `axis`, mutably.
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisConfig {
        &mut self.axes[axis.index()]
    }

    /// Replaces the configuration of `axis`.
    pub fn set_axis(&mut self, axis: Axis, config: AxisConfig) {
        self.axes[axis.index()] = config;
    }

    /// Fixes the range of `dimension`.
    pub fn set_range(&mut self, dimension: Dimension, range: impl Into<DataRange>) {
        *self.range_setting_mut(dimension) = Setting::Value(range.into());
    }

    /// Computes the range of `dimension` from the attached charts on every render.
    pub fn set_range_fn(
        &mut self,
        dimension: Dimension,
        f: impl Fn(&RangeContext) -> DataRange + 'static,
    ) {
        *self.range_setting_mut(dimension) = Setting::computed(f);
    }

    /// Resolves the range of `dimension` against the charts attached right now.
    pub fn range(&self, dimension: Dimension) -> DataRange {
        let ctx = self.range_context(dimension);
        match dimension {
            Dimension::X => self.x_range.resolve(&ctx),
            Dimension::Y => self.y_range.resolve(&ctx),
        }
    }

    /// Sets the data-unit margins added around automatic ranges.
    pub fn set_range_margins(&mut self, margins: Insets) {
        self.range_margins = margins;
    }

    /// The data-unit margins added around automatic ranges.
    pub fn range_margins(&self) -> Insets {
        self.range_margins
    }

    /// Sets the pixel padding around the axes.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = Setting::Value(padding);
    }

    /// Computes the padding from the surface size.
    pub fn set_padding_fn(&mut self, f: impl Fn(&Size) -> Insets + 'static) {
        self.padding = Setting::computed(f);
    }

    /// The resolved padding.
    pub fn padding(&self) -> Insets {
        self.padding.resolve(&self.size())
    }

    /// Customizes the plot border.
    pub fn set_border(&mut self, border: Customize) {
        self.border = Setting::Value(border);
    }

    /// Customizes the plot border from the plot rectangle.
    pub fn set_border_fn(&mut self, f: impl Fn(&Rect) -> Customize + 'static) {
        self.border = Setting::computed(f);
    }

    /// Resolves the border customization for `plot`.
    pub fn border(&self, plot: &Rect) -> Customize {
        self.border.resolve(plot)
    }

    /// Draws grid lines of `dimension` at these data values.
    pub fn set_grid_lines(&mut self, dimension: Dimension, values: Vec<f64>) {
        *self.lines_mut(dimension) = Setting::Value(values);
    }

    /// Computes grid line values of `dimension` from its resolved range.
    pub fn set_grid_lines_fn(
        &mut self,
        dimension: Dimension,
        f: impl Fn(&DataRange) -> Vec<f64> + 'static,
    ) {
        *self.lines_mut(dimension) = Setting::computed(f);
    }

    /// The grid line values of `dimension` for the current range.
    pub fn grid_lines(&self, dimension: Dimension) -> Vec<f64> {
        let range = self.range(dimension);
        match dimension {
            Dimension::X => self.x_lines.resolve(&range),
            Dimension::Y => self.y_lines.resolve(&range),
        }
    }

    /// Customizes every grid line of `dimension`.
    pub fn set_grid_style(&mut self, dimension: Dimension, style: Customize) {
        *self.line_style_mut(dimension) = Setting::Value(style);
    }

    /// Customizes grid lines of `dimension` one by one.
    pub fn set_grid_style_fn(
        &mut self,
        dimension: Dimension,
        f: impl Fn(&GridLine) -> Customize + 'static,
    ) {
        *self.line_style_mut(dimension) = Setting::computed(f);
    }

    /// Resolves the customization of one grid line.
    pub fn grid_style(&self, line: &GridLine) -> Customize {
        match line.dimension {
            Dimension::X => self.x_line.resolve(line),
            Dimension::Y => self.y_line.resolve(line),
        }
    }

    /// Installs a decoration hook, run after axes and before charts.
    pub fn set_decorations(
        &mut self,
        f: impl Fn(&mut DecorationSink<'_>) -> Result<(), SurfaceError> + 'static,
    ) {
        self.decorations = Some(Arc::new(f));
    }

    /// Removes the decoration hook.
    pub fn clear_decorations(&mut self) {
        self.decorations = None;
    }

    /// Attaches a chart; it is drawn on top of charts attached earlier within a layer.
    pub fn add_chart(&mut self, chart: impl RenderableSeries) -> ChartId {
        self.charts.push(Box::new(chart));
        ChartId(self.charts.len() - 1)
    }

    /// Number of attached charts.
    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    /// Returns an attached chart.
    pub fn chart(&self, id: ChartId) -> Option<&dyn RenderableSeries> {
        self.charts.get(id.0).map(|c| &**c)
    }

    /// Returns an attached chart, mutably.
    pub fn chart_mut(&mut self, id: ChartId) -> Option<&mut dyn RenderableSeries> {
        match self.charts.get_mut(id.0) {
            Some(c) => Some(&mut **c),
            None => None,
        }
    }

    /// Returns an attached chart as its concrete type.
    pub fn chart_as<T: RenderableSeries>(&self, id: ChartId) -> Option<&T> {
        self.chart(id)?.as_any().downcast_ref()
    }

    /// Returns an attached chart as its concrete type, mutably.
    pub fn chart_as_mut<T: RenderableSeries>(&mut self, id: ChartId) -> Option<&mut T> {
        self.chart_mut(id)?.as_any_mut().downcast_mut()
    }

    /// Detaches every chart. Their elements stay on the surface until the next render.
    pub fn clear_charts(&mut self) {
        self.charts.clear();
    }

    /// Hides a chart's elements.
    pub fn hide_chart(&mut self, id: ChartId) -> Result<(), RenderError> {
        let chart = self.charts.get_mut(id.0).ok_or(RenderError::UnknownChart(id))?;
        Ok(chart.hide(&mut self.surface)?)
    }

    /// Shows a hidden chart's elements.
    pub fn show_chart(&mut self, id: ChartId) -> Result<(), RenderError> {
        let chart = self.charts.get_mut(id.0).ok_or(RenderError::UnknownChart(id))?;
        Ok(chart.show(&mut self.surface)?)
    }

    /// Fades a chart out over `duration`.
    pub fn fade_out_chart(&mut self, id: ChartId, duration: Duration) -> Result<(), RenderError> {
        let chart = self.charts.get_mut(id.0).ok_or(RenderError::UnknownChart(id))?;
        Ok(chart.fade_out(&mut self.surface, duration)?)
    }

    /// Fades a chart in over `duration`.
    pub fn fade_in_chart(&mut self, id: ChartId, duration: Duration) -> Result<(), RenderError> {
        let chart = self.charts.get_mut(id.0).ok_or(RenderError::UnknownChart(id))?;
        Ok(chart.fade_in(&mut self.surface, duration)?)
    }

    /// Runs a full render pass with the default z-order.
    pub fn render(&mut self) -> Result<RenderReport, RenderError> {
        self.render_with(|_| {})
    }

    /// Runs a full render pass, letting `reorder` reassign group z-indices before compositing.
    pub fn render_with(
        &mut self,
        reorder: impl FnOnce(&mut LayerStack<'_>),
    ) -> Result<RenderReport, RenderError> {
        let size = self.size();
        self.surface.clear();
        self.groups.reset();

        let padding = self.padding.resolve(&size);
        let x_range = self.checked_range(Dimension::X)?;
        let y_range = self.checked_range(Dimension::Y)?;

        let mut measured = Vec::with_capacity(Axis::ALL.len());
        for axis in Axis::ALL {
            let range = match axis.dimension() {
                Dimension::X => x_range,
                Dimension::Y => y_range,
            };
            let config = &self.axes[axis.index()];
            let ticks = config.resolve_ticks(&TickContext {
                axis,
                range,
                surface: size,
            });
            measured.push(layout::measure_axis(
                &mut self.surface,
                axis,
                config,
                &ticks,
            )?);
        }

        let footprints = Axis::ALL.map(|axis| measured[axis.index()].footprint);
        let plot_layout = PlotLayout::arrange(size, padding, footprints, x_range, y_range);
        let transform = plot_layout.transform();
        log::debug!(
            "plot {:?} on {}x{}, x {:?}, y {:?}, ticks {:?}",
            plot_layout.plot(),
            size.width,
            size.height,
            x_range,
            y_range,
            measured.iter().map(|m| m.ticks.len()).collect::<Vec<_>>()
        );

        self.draw_border(&transform)?;
        self.draw_grid(&transform)?;
        for m in &measured {
            layout::place_axis(
                &mut self.surface,
                &self.axes[m.axis.index()],
                m,
                &transform,
                &mut self.groups,
            )?;
        }
        self.draw_decorations(&transform)?;

        for chart in &mut self.charts {
            chart.render(&transform, &mut self.surface)?;
        }

        let mut stack = LayerStack::new();
        stack.push(GroupOwner::Canvas, &mut self.groups);
        for (i, chart) in self.charts.iter_mut().enumerate() {
            stack.push(GroupOwner::Chart(ChartId(i)), chart.state_mut().groups_mut());
        }
        reorder(&mut stack);
        let z_order = stack.composite(&mut self.surface)?;

        Ok(RenderReport {
            layout: plot_layout,
            z_order,
        })
    }

    fn range_setting_mut(&mut self, dimension: Dimension) -> &mut Setting<DataRange, RangeContext> {
        match dimension {
            Dimension::X => &mut self.x_range,
            Dimension::Y => &mut self.y_range,
        }
    }

    fn lines_mut(&mut self, dimension: Dimension) -> &mut Setting<Vec<f64>, DataRange> {
        match dimension {
            Dimension::X => &mut self.x_lines,
            Dimension::Y => &mut self.y_lines,
        }
    }

    fn line_style_mut(&mut self, dimension: Dimension) -> &mut Setting<Customize, GridLine> {
        match dimension {
            Dimension::X => &mut self.x_line,
            Dimension::Y => &mut self.y_line,
        }
    }

    fn range_context(&self, dimension: Dimension) -> RangeContext {
        let data = self
            .charts
            .iter()
            .filter_map(|c| c.bounds())
            .reduce(|a, b| a.union(&b))
            .map(|b: DataBounds| match dimension {
                Dimension::X => b.x,
                Dimension::Y => b.y,
            });
        let m = self.range_margins;
        let (margin_below, margin_above) = match dimension {
            Dimension::X => (m.left, m.right),
            Dimension::Y => (m.bottom, m.top),
        };
        RangeContext {
            dimension,
            data,
            margin_below,
            margin_above,
        }
    }

    fn checked_range(&self, dimension: Dimension) -> Result<DataRange, RenderError> {
        let range = self.range(dimension);
        if !range.is_finite() {
            return Err(RenderError::NonFiniteRange {
                dimension,
                min: range.min,
                max: range.max,
            });
        }
        Ok(range)
    }

    fn draw_border(&mut self, transform: &CoordinateTransform) -> Result<(), SurfaceError> {
        let plot = transform.plot();
        let id = self.surface.rect(plot.to_kurbo());
        self.surface.set_attrs(id, &default_border_attrs())?;
        let outcome = self.border(&plot);
        if apply_outcome(&mut self.surface, id, outcome)? {
            self.groups.push(Layer::Border, id);
        }
        Ok(())
    }

    fn draw_grid(&mut self, transform: &CoordinateTransform) -> Result<(), SurfaceError> {
        let plot = transform.plot();
        let base = default_grid_attrs();

        for (index, value) in self.x_lines.resolve(&transform.x_range()).into_iter().enumerate() {
            let x = transform.to_pixel_x(value);
            if !x.is_finite() {
                continue;
            }
            let line = GridLine {
                dimension: Dimension::X,
                value,
                index,
            };
            let path = segment(Point::new(x, plot.y()), Point::new(x, plot.y2()));
            let outcome = self.grid_style(&line);
            self.draw_grid_line(path, &base, outcome)?;
        }

        for (index, value) in self.y_lines.resolve(&transform.y_range()).into_iter().enumerate() {
            // Centre horizontal lines on a pixel row.
            let y = transform.to_pixel_y(value).round() + 0.5;
            if !y.is_finite() {
                continue;
            }
            let line = GridLine {
                dimension: Dimension::Y,
                value,
                index,
            };
            let path = segment(Point::new(plot.x(), y), Point::new(plot.x2(), y));
            let outcome = self.grid_style(&line);
            self.draw_grid_line(path, &base, outcome)?;
        }
        Ok(())
    }

    fn draw_grid_line(
        &mut self,
        path: BezPath,
        base: &Attrs,
        outcome: Customize,
    ) -> Result<(), SurfaceError> {
        let id = self.surface.path(path);
        self.surface.set_attrs(id, base)?;
        if apply_outcome(&mut self.surface, id, outcome)? {
            self.groups.push(Layer::AxisLines, id);
        }
        Ok(())
    }

    fn draw_decorations(&mut self, transform: &CoordinateTransform) -> Result<(), SurfaceError> {
        let Some(decorate) = self.decorations.clone() else {
            return Ok(());
        };
        let mut sink = DecorationSink {
            surface: &mut self.surface,
            transform,
            above: Vec::new(),
            below: Vec::new(),
        };
        decorate(&mut sink)?;
        let DecorationSink { above, below, .. } = sink;
        self.groups.extend(Layer::DecorationsAbove, above);
        self.groups.extend(Layer::DecorationsBelow, below);
        Ok(())
    }
}

fn segment(a: Point, b: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(a);
    path.line_to(b);
    path
}
