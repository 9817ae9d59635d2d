// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line series: paths, optional segments and area fills, and per-point dots.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use kurbo::BezPath;
use peniko::color::palette::css;
use quadrant_surface::{Attrs, Surface, SurfaceError};

use crate::chart::{
    DataBounds, Datum, ElementSink, Glyph, RenderableSeries, SeriesState, TranslateFn,
    apply_outcome, default_translate, translate_points,
};
use crate::geometry::Point;
use crate::setting::{Customize, Setting};
use crate::transform::CoordinateTransform;
use crate::z_order::Layer;

/// Radius of the default dot glyph.
pub const DOT_RADIUS: f64 = 4.0;

/// Splits translated points into the series drawn as separate paths.
pub type SplitFn = Arc<dyn Fn(&[Point]) -> Vec<Vec<Point>>>;

/// A whole path (line or fill) being drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct PathContext {
    /// Index of the series.
    pub series: usize,
    /// For segments, the index of the segment's first point; otherwise the series index.
    pub index: usize,
    /// The path's vertices in pixels.
    pub points: Vec<Point>,
}

/// A dot being drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotContext {
    /// Index of the series.
    pub series: usize,
    /// Index of the point within its series.
    pub index: usize,
    /// The point in data units.
    pub value: Point,
    /// The point in pixels.
    pub at: Point,
}

/// A line chart.
#[derive(Clone)]
pub struct LineChart {
    points: Vec<Datum>,
    translate: TranslateFn,
    split: SplitFn,
    line: Attrs,
    path: Setting<Customize, PathContext>,
    segment: Option<Setting<Customize, PathContext>>,
    dot: Glyph<DotContext>,
    fill_x: Option<Setting<Customize, PathContext>>,
    fill_y: Option<Setting<Customize, PathContext>>,
    state: SeriesState,
}

impl core::fmt::Debug for LineChart {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LineChart")
            .field("points", &self.points)
            .field("line", &self.line)
            .field("path", &self.path)
            .field("segment", &self.segment)
            .field("dot", &self.dot)
            .field("fill_x", &self.fill_x)
            .field("fill_y", &self.fill_y)
            .finish_non_exhaustive()
    }
}

impl Default for LineChart {
    fn default() -> Self {
        Self::new(Vec::<Datum>::new())
    }
}

impl LineChart {
    /// Creates a line chart with a 1px black line and black dots.
    pub fn new<D: Into<Datum>>(points: impl IntoIterator<Item = D>) -> Self {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            translate: Arc::new(default_translate),
            split: Arc::new(|points: &[Point]| alloc::vec![points.to_vec()]),
            line: Attrs::new()
                .with_stroke(css::BLACK)
                .with_stroke_width(1.0)
                .without_fill(),
            path: Setting::Value(Customize::UseDefault),
            segment: None,
            dot: Glyph::Style(Attrs::new().with_fill(css::BLACK).without_stroke()),
            fill_x: None,
            fill_y: None,
            state: SeriesState::new(&[Layer::Fills, Layer::Paths, Layer::Segments, Layer::Dots]),
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

    /// Splits translated points into several series.
    pub fn with_series_fn(mut self, f: impl Fn(&[Point]) -> Vec<Vec<Point>> + 'static) -> Self {
        self.split = Arc::new(f);
        self
    }

    /// Attributes every line path and segment starts from.
    pub fn with_line(mut self, attrs: Attrs) -> Self {
        self.line = attrs;
        self
    }

    /// Customizes each series path.
    pub fn with_path_fn(mut self, f: impl Fn(&PathContext) -> Customize + 'static) -> Self {
        self.path = Setting::computed(f);
        self
    }

    /// Draws one extra path per pair of consecutive points, styled by `f`.
    pub fn with_segment_fn(mut self, f: impl Fn(&PathContext) -> Customize + 'static) -> Self {
        self.segment = Some(Setting::computed(f));
        self
    }

    /// Styles the default dot glyph.
    pub fn with_dot_attrs(mut self, attrs: Attrs) -> Self {
        self.dot = Glyph::Style(attrs);
        self
    }

    /// Draws dots through a hook.
    pub fn with_dot_fn(
        mut self,
        f: impl Fn(&mut ElementSink<'_>, &DotContext) -> Result<Customize, SurfaceError> + 'static,
    ) -> Self {
        self.dot = Glyph::custom(f);
        self
    }

    /// Draws no dots.
    pub fn without_dots(self) -> Self {
        self.with_dot_fn(|_, _| Ok(Customize::Skip))
    }

    /// Fills the area between each series and the bottom of the y range.
    pub fn with_fill_x(mut self, attrs: Attrs) -> Self {
        self.fill_x = Some(Setting::Value(Customize::Replace(attrs)));
        self
    }

    /// Like [`LineChart::with_fill_x`], styled per series.
    pub fn with_fill_x_fn(mut self, f: impl Fn(&PathContext) -> Customize + 'static) -> Self {
        self.fill_x = Some(Setting::computed(f));
        self
    }

    /// Fills the area between each series and the left of the x range.
    pub fn with_fill_y(mut self, attrs: Attrs) -> Self {
        self.fill_y = Some(Setting::Value(Customize::Replace(attrs)));
        self
    }

    /// Like [`LineChart::with_fill_y`], styled per series.
    pub fn with_fill_y_fn(mut self, f: impl Fn(&PathContext) -> Customize + 'static) -> Self {
        self.fill_y = Some(Setting::computed(f));
        self
    }

    fn translated(&self) -> Vec<Point> {
        translate_points(&self.points, &self.translate)
            .map(|(_, p)| p)
            .collect()
    }

    fn draw_path(
        &mut self,
        surface: &mut dyn Surface,
        transform: &CoordinateTransform,
        layer: Layer,
        path: BezPath,
        base: &Attrs,
        outcome: Customize,
    ) -> Result<(), SurfaceError> {
        let id = surface.path(path);
        surface.set_attrs(id, base)?;
        if apply_outcome(surface, id, outcome)? {
            surface.set_clip(id, transform.plot().to_kurbo())?;
            self.state.groups_mut().push(layer, id);
        }
        Ok(())
    }
}

fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
    }
    path
}

/// Closes `points` against a baseline, dropping perpendiculars from the end points.
fn area(points: &[Point], baseline: Baseline) -> BezPath {
    let project = |p: Point| match baseline {
        Baseline::Horizontal(y) => Point::new(p.x, y),
        Baseline::Vertical(x) => Point::new(x, p.y),
    };
    let mut path = BezPath::new();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return path;
    };
    path.move_to(project(*first));
    for p in points {
        path.line_to(*p);
    }
    if points.len() > 1 {
        path.line_to(project(*last));
    }
    path.close_path();
    path
}

#[derive(Clone, Copy)]
enum Baseline {
    Horizontal(f64),
    Vertical(f64),
}

impl RenderableSeries for LineChart {
    fn bounds(&self) -> Option<DataBounds> {
        DataBounds::scan(self.translated())
    }

    fn render(
        &mut self,
        transform: &CoordinateTransform,
        surface: &mut dyn Surface,
    ) -> Result<(), SurfaceError> {
        self.state.begin_pass();
        let clip = transform.plot();
        let series = (self.split)(&self.translated());
        let line = self.line.clone();
        let fill_base = Attrs::new().without_stroke();

        for (s, values) in series.iter().enumerate() {
            if values.is_empty() {
                continue;
            }
            let pixels: Vec<Point> = values.iter().map(|p| transform.to_pixel(*p)).collect();
            let whole = PathContext {
                series: s,
                index: s,
                points: pixels.clone(),
            };

            if let Some(fill) = &self.fill_x {
                let outcome = fill.resolve(&whole);
                let baseline = Baseline::Horizontal(transform.to_pixel_y(transform.y_range().min));
                let shape = area(&pixels, baseline);
                self.draw_path(surface, transform, Layer::Fills, shape, &fill_base, outcome)?;
            }
            if let Some(fill) = &self.fill_y {
                let outcome = fill.resolve(&whole);
                let baseline = Baseline::Vertical(transform.to_pixel_x(transform.x_range().min));
                let shape = area(&pixels, baseline);
                self.draw_path(surface, transform, Layer::Fills, shape, &fill_base, outcome)?;
            }

            let outcome = self.path.resolve(&whole);
            self.draw_path(surface, transform, Layer::Paths, polyline(&pixels), &line, outcome)?;

            if let Some(segment) = self.segment.clone() {
                for (i, pair) in pixels.windows(2).enumerate() {
                    let ctx = PathContext {
                        series: s,
                        index: i,
                        points: pair.to_vec(),
                    };
                    let outcome = segment.resolve(&ctx);
                    self.draw_path(surface, transform, Layer::Segments, polyline(pair), &line, outcome)?;
                }
            }

            for (i, (value, at)) in values.iter().zip(&pixels).enumerate() {
                let ctx = DotContext {
                    series: s,
                    index: i,
                    value: *value,
                    at: *at,
                };
                let mut sink = ElementSink::new(&mut *surface, transform);
                let outcome = match &self.dot {
                    Glyph::Style(attrs) => {
                        let id = sink.circle(ctx.at, DOT_RADIUS);
                        sink.set_attrs(id, attrs)?;
                        Customize::UseDefault
                    }
                    Glyph::Custom(f) => f(&mut sink, &ctx)?,
                };
                let kept = sink.finish(outcome, clip)?;
                self.state.groups_mut().extend(Layer::Dots, kept);
            }
        }

        log::trace!(
            "line chart: {} series, {} elements",
            series.len(),
            self.state.groups().elements().count()
        );
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
    use crate::axis::DataRange;
    use crate::geometry::{Insets, Size};
    use crate::layout::{Footprint, PlotLayout};
    use kurbo::PathEl;
    use quadrant_surface::{ElementId, Scene, Shape};

    fn transform() -> CoordinateTransform {
        PlotLayout::arrange(
            Size::new(120.0, 120.0),
            Insets::uniform(10.0),
            [Footprint::default(); 4],
            DataRange::new(0.0, 2.0),
            DataRange::new(0.0, 5.0),
        )
        .transform()
    }

    fn group(chart: &LineChart, layer: Layer) -> Vec<ElementId> {
        chart.groups().get(layer).unwrap().elements().to_vec()
    }

    fn path_of(scene: &Scene, id: ElementId) -> BezPath {
        match scene.element(id).unwrap().shape() {
            Shape::Path(p) => p.clone(),
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn draws_one_path_and_a_dot_per_point() {
        let t = transform();
        let mut scene = Scene::new(120.0, 120.0);
        let mut chart = LineChart::new([(0.0, 0.0), (1.0, 5.0), (2.0, 2.0)]);
        chart.render(&t, &mut scene).unwrap();

        let paths = group(&chart, Layer::Paths);
        assert_eq!(paths.len(), 1);
        assert_eq!(path_of(&scene, paths[0]).elements().len(), 3);
        assert_eq!(group(&chart, Layer::Dots).len(), 3);
        assert!(group(&chart, Layer::Segments).is_empty());
        assert!(group(&chart, Layer::Fills).is_empty());
        for id in paths {
            assert_eq!(scene.element(id).unwrap().clip(), Some(t.plot().to_kurbo()));
        }
    }

    #[test]
    fn segments_are_indexed_by_their_first_point() {
        let t = transform();
        let mut scene = Scene::new(120.0, 120.0);
        let mut chart = LineChart::new([1.0, 2.0, 3.0, 4.0]).with_segment_fn(|ctx| {
            if ctx.index == 1 {
                Customize::Skip
            } else {
                Customize::UseDefault
            }
        });
        chart.render(&t, &mut scene).unwrap();
        assert_eq!(group(&chart, Layer::Segments).len(), 2);
    }

    #[test]
    fn series_fn_draws_one_path_and_one_fill_per_series() {
        let t = transform();
        let mut scene = Scene::new(120.0, 120.0);
        // Break the line wherever consecutive points are more than 0.75 apart in x.
        let mut chart = LineChart::new([(0.0, 1.0), (0.5, 2.0), (1.5, 3.0), (2.0, 4.0)])
            .with_series_fn(|points| {
                let mut out: Vec<Vec<Point>> = Vec::new();
                for p in points {
                    match out.last_mut() {
                        Some(run) if run.last().is_some_and(|q| p.x - q.x <= 0.75) => run.push(*p),
                        _ => out.push(alloc::vec![*p]),
                    }
                }
                out
            })
            .with_fill_x(Attrs::new().with_fill(css::BLUE));
        chart.render(&t, &mut scene).unwrap();

        let paths = group(&chart, Layer::Paths);
        let fills = group(&chart, Layer::Fills);
        assert_eq!(paths.len(), 2);
        assert_eq!(fills.len(), 2);
        assert_eq!(group(&chart, Layer::Dots).len(), 4);

        let starts = [t.to_pixel(Point::new(0.0, 1.0)), t.to_pixel(Point::new(1.5, 3.0))];
        let ends = [t.to_pixel(Point::new(0.5, 2.0)), t.to_pixel(Point::new(2.0, 4.0))];
        for (i, id) in paths.iter().enumerate() {
            let els = path_of(&scene, *id).elements().to_vec();
            assert_eq!(
                els,
                [PathEl::MoveTo(starts[i].into()), PathEl::LineTo(ends[i].into())]
            );
        }
        let base = t.plot().y2();
        for (i, id) in fills.iter().enumerate() {
            let els = path_of(&scene, *id).elements().to_vec();
            assert_eq!(els[0], PathEl::MoveTo(kurbo::Point::new(starts[i].x, base)));
            assert_eq!(els.last(), Some(&PathEl::ClosePath));
        }
    }

    #[test]
    fn fill_x_closes_to_the_bottom_of_the_range() {
        let t = transform();
        let mut scene = Scene::new(120.0, 120.0);
        let mut chart = LineChart::new([(0.0, 1.0), (2.0, 3.0)])
            .with_fill_x(Attrs::new().with_fill(css::BLUE));
        chart.render(&t, &mut scene).unwrap();

        let fills = group(&chart, Layer::Fills);
        assert_eq!(fills.len(), 1);
        let base = t.plot().y2();
        let els = path_of(&scene, fills[0]).elements().to_vec();
        assert_eq!(els.len(), 5);
        assert_eq!(els[0], PathEl::MoveTo(kurbo::Point::new(t.plot().x(), base)));
        assert_eq!(els[3], PathEl::LineTo(kurbo::Point::new(t.plot().x2(), base)));
        assert_eq!(els[4], PathEl::ClosePath);
    }

    #[test]
    fn dot_hook_can_veto_or_restyle() {
        let t = transform();
        let mut scene = Scene::new(120.0, 120.0);
        let mut chart = LineChart::new([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).with_dot_fn(|sink, ctx| {
            sink.rect(crate::geometry::Rect::new(ctx.at.x - 1.0, ctx.at.y - 1.0, 2.0, 2.0));
            Ok(match ctx.index {
                0 => Customize::Skip,
                _ => Customize::Replace(Attrs::new().with_fill(css::RED)),
            })
        });
        chart.render(&t, &mut scene).unwrap();
        let dots = group(&chart, Layer::Dots);
        assert_eq!(dots.len(), 2);
        for id in dots {
            assert_eq!(scene.attrs(id).unwrap().fill, Some(css::RED.into()));
        }
    }

    #[test]
    fn missing_points_are_skipped_and_bounds_ignore_them() {
        let chart = LineChart::new([Some(1.0), None, Some(4.0)]);
        let b = chart.bounds().unwrap();
        assert_eq!(b.x, DataRange::new(0.0, 2.0));
        assert_eq!(b.y, DataRange::new(1.0, 4.0));
        assert!(LineChart::default().bounds().is_none());
    }

    #[test]
    fn hidden_chart_stays_hidden_after_rerender() {
        let t = transform();
        let mut scene = Scene::new(120.0, 120.0);
        let mut chart = LineChart::new([(0.0, 0.0), (1.0, 1.0)]);
        chart.render(&t, &mut scene).unwrap();
        chart.hide(&mut scene).unwrap();
        scene.clear();
        chart.render(&t, &mut scene).unwrap();
        assert!(chart.is_hidden());
        for id in chart.groups().elements() {
            assert_eq!(scene.attrs(id).unwrap().opacity, Some(0.0));
        }
        chart.show(&mut scene).unwrap();
        for id in chart.groups().elements() {
            assert_eq!(scene.attrs(id).unwrap().opacity, Some(1.0));
        }
    }
}
