// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar series: one box per point, hanging from the point down to the plot bottom.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use peniko::{Brush, Color};
use quadrant_surface::{Attrs, Surface, SurfaceError};

use crate::chart::{
    DataBounds, Datum, ElementSink, Glyph, RenderableSeries, SeriesState, TranslateFn,
    default_translate, translate_points,
};
use crate::geometry::{Point, Rect};
use crate::setting::Customize;
use crate::transform::CoordinateTransform;
use crate::z_order::Layer;

/// A bar being drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarContext {
    /// Position of the bar in left-to-right order.
    pub index: usize,
    /// Index of the datum the bar was built from.
    pub datum: usize,
    /// The point in data units.
    pub value: Point,
    /// Top centre of the bar in pixels, clamped to the plot top.
    pub top: Point,
    /// Bar width in pixels.
    pub width: f64,
    /// Bar height in pixels.
    pub height: f64,
}

impl BarContext {
    /// The full bar rectangle, centred on the point.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.top.x - self.width / 2.0,
            self.top.y,
            self.width,
            self.height,
        )
    }
}

/// The uniform width shared by every bar of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarWidth {
    /// Smallest gap between adjacent points in data units, if there are at least two.
    pub data: Option<f64>,
    /// The width in pixels.
    pub pixels: f64,
}

/// A bar chart.
#[derive(Clone)]
pub struct BarChart {
    points: Vec<Datum>,
    translate: TranslateFn,
    bar: Glyph<BarContext>,
    state: SeriesState,
}

impl core::fmt::Debug for BarChart {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BarChart")
            .field("points", &self.points)
            .field("bar", &self.bar)
            .finish_non_exhaustive()
    }
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new(Vec::<Datum>::new())
    }
}

impl BarChart {
    /// Creates a bar chart with green, unstroked bars.
    pub fn new<D: Into<Datum>>(points: impl IntoIterator<Item = D>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            translate: Arc::new(default_translate),
            bar: Glyph::Style(
                Attrs::new()
                    .with_fill(Color::from_rgb8(0x79, 0xc3, 0x6a))
                    .without_stroke(),
            ),
            state: SeriesState::new(&[Layer::Boxes]),
        }
    }

    /// The raw points.
    pub fn points(&self) -> &[Datum] {
        &self.points
    }

    /// Replaces the raw points; takes effect at the next render.
    pub fn set_points<D: Into<Datum>>(&mut self, points: impl IntoIterator<Item = D>) {
        self.points = points.into_iter().map(Into::into).collect();
    }

    /// Replaces the point translation.
    pub fn with_translate(mut self, f: impl Fn(&Datum, usize) -> Option<Point> + 'static) -> Self {
        self.translate = Arc::new(f);
        self
    }

    /// Fills the default bars with `fill`.
    pub fn with_fill(self, fill: impl Into<Brush>) -> Self {
        self.with_bar_attrs(Attrs::new().with_fill(fill).without_stroke())
    }

    /// Styles the default bars.
    pub fn with_bar_attrs(mut self, attrs: Attrs) -> Self {
        self.bar = Glyph::Style(attrs);
        self
    }

    /// Draws bars through a hook.
    pub fn with_bar_fn(
        mut self,
        f: impl Fn(&mut ElementSink<'_>, &BarContext) -> Result<Customize, SurfaceError> + 'static,
    ) -> Self {
        self.bar = Glyph::custom(f);
        self
    }

    /// Bars that land on the plot, left to right: `(datum index, value, top in pixels)`.
    fn visible(&self, transform: &CoordinateTransform) -> Vec<(usize, Point, Point)> {
        let plot = transform.plot();
        let mut bars: Vec<_> = translate_points(&self.points, &self.translate)
            .filter_map(|(i, p)| {
                let px = transform.to_pixel(p);
                // Bars taller than the plot are cut at its top edge.
                let top = Point::new(px.x, px.y.max(plot.y()));
                plot.contains(top).then_some((i, p, top))
            })
            .collect();
        bars.sort_by(|a, b| a.2.x.total_cmp(&b.2.x));
        bars
    }

    /// The width every bar gets under `transform`.
    ///
    /// The smallest gap between horizontally adjacent points; with fewer than two points,
    /// half the plot width divided by the number of bars.
    pub fn bar_width(&self, transform: &CoordinateTransform) -> BarWidth {
        width_of(&self.visible(transform), transform)
    }
}

fn width_of(bars: &[(usize, Point, Point)], transform: &CoordinateTransform) -> BarWidth {
    let data = bars
        .windows(2)
        .map(|w| (w[1].1.x - w[0].1.x).abs())
        .reduce(f64::min);
    let pixels = match data {
        Some(gap) => gap * transform.x_scale(),
        None if bars.is_empty() => 0.0,
        None => transform.plot().width() / bars.len() as f64 / 2.0,
    };
    BarWidth { data, pixels }
}

impl RenderableSeries for BarChart {
    fn bounds(&self) -> Option<DataBounds> {
        DataBounds::scan(translate_points(&self.points, &self.translate).map(|(_, p)| p))
    }

    fn render(
        &mut self,
        transform: &CoordinateTransform,
        surface: &mut dyn Surface,
    ) -> Result<(), SurfaceError> {
        self.state.begin_pass();
        let clip = transform.plot();
        let bars = self.visible(transform);
        let width = width_of(&bars, transform).pixels;

        for (index, &(datum, value, top)) in bars.iter().enumerate() {
            let ctx = BarContext {
                index,
                datum,
                value,
                top,
                width,
                height: clip.y2() - top.y,
            };
            if ctx.height <= 0.0 {
                continue;
            }
            let mut sink = ElementSink::new(&mut *surface, transform);
            let outcome = match &self.bar {
                Glyph::Style(attrs) => {
                    // Leave a one pixel gap between neighbouring bars.
                    let id = sink.rect(Rect::new(
                        top.x - width / 2.0 - 0.5,
                        top.y,
                        (width - 1.0).max(0.0),
                        ctx.height,
                    ));
                    sink.set_attrs(id, attrs)?;
                    Customize::UseDefault
                }
                Glyph::Custom(f) => f(&mut sink, &ctx)?,
            };
            let kept = sink.finish(outcome, clip)?;
            self.state.groups_mut().extend(Layer::Boxes, kept);
        }

        log::trace!("bar chart: {} bars, width {width}", bars.len());
        self.state.end_pass(surface)
    }

    fn state(&self) -> &SeriesState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SeriesState {
        &mut self.state
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Insets, Size};
    use crate::layout::{Footprint, PlotLayout};
    use quadrant_surface::Scene;

    fn transform(x: (f64, f64), y: (f64, f64)) -> CoordinateTransform {
        PlotLayout::arrange(
            Size::new(200.0, 100.0),
            Insets::uniform(10.0),
            [Footprint::default(); 4],
            x.into(),
            y.into(),
        )
        .transform()
    }

    #[test]
    fn width_is_the_smallest_adjacent_gap() {
        let t = transform((0.0, 10.0), (0.0, 1.0));
        let chart = BarChart::new([(4.0, 1.0), (0.0, 1.0), (1.0, 1.0), (10.0, 1.0)]);
        let w = chart.bar_width(&t);
        assert_eq!(w.data, Some(1.0));
        assert!((w.pixels - t.plot().width() / 10.0).abs() < 1e-9, "{w:?}");
    }

    #[test]
    fn single_bar_falls_back_to_half_the_plot() {
        let t = transform((0.0, 10.0), (0.0, 1.0));
        let w = BarChart::new([(5.0, 1.0)]).bar_width(&t);
        assert_eq!(w.data, None);
        assert!((w.pixels - t.plot().width() / 2.0).abs() < 1e-9, "{w:?}");
    }

    #[test]
    fn bars_outside_the_plot_are_dropped_and_tall_bars_clamped() {
        let t = transform((0.0, 10.0), (0.0, 1.0));
        let mut scene = Scene::new(200.0, 100.0);
        let mut chart = BarChart::new([(-1.0, 0.5), (2.0, 5.0), (4.0, -1.0), (6.0, 0.0), (8.0, 0.5)]);
        chart.render(&t, &mut scene).unwrap();

        let boxes = chart.groups().get(Layer::Boxes).unwrap().elements().to_vec();
        // (-1, _) is left of the plot, (4, -1) below it, (6, 0) has zero height.
        assert_eq!(boxes.len(), 2);
        let tall = scene.bounding_box(boxes[0]).unwrap();
        assert!((tall.y0 - t.plot().y()).abs() < 1e-9, "{tall:?}");
        assert!((tall.y1 - t.plot().y2()).abs() < 1e-9, "{tall:?}");
    }

    #[test]
    fn bar_hook_sees_the_centred_rect() {
        let t = transform((0.0, 2.0), (0.0, 2.0));
        let mut scene = Scene::new(200.0, 100.0);
        let mut chart = BarChart::new([(1.0, 1.0)]).with_bar_fn(|sink, ctx| {
            sink.rect(ctx.rect());
            Ok(Customize::UseDefault)
        });
        chart.render(&t, &mut scene).unwrap();
        let id = chart.groups().elements().next().unwrap();
        let b = scene.bounding_box(id).unwrap();
        let plot = t.plot();
        assert!(((b.x0 + b.x1) / 2.0 - (plot.x() + plot.x2()) / 2.0).abs() < 1e-9, "{b:?}");
        assert!((b.width() - plot.width() / 2.0).abs() < 1e-9, "{b:?}");
        assert!((b.y0 - (plot.y() + plot.height() / 2.0)).abs() < 1e-9, "{b:?}");
        assert!((b.y1 - plot.y2()).abs() < 1e-9, "{b:?}");
    }
}
