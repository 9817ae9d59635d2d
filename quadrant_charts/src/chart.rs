// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract every chart type implements, and the pieces charts share.

extern crate alloc;

use alloc::sync::Arc;
use core::any::Any;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::BezPath;
use quadrant_surface::{Attrs, ElementId, Surface, SurfaceError};
use smallvec::SmallVec;

use crate::axis::DataRange;
use crate::geometry::{Point, Rect};
use crate::setting::Customize;
use crate::transform::CoordinateTransform;
use crate::z_order::{GroupSet, Layer};

/// A raw data entry as supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Datum {
    /// An explicit `(x, y)` pair.
    Pair(f64, f64),
    /// A bare value, plotted against its index.
    Value(f64),
    /// A gap in the data.
    Missing,
}

impl From<(f64, f64)> for Datum {
    fn from((x, y): (f64, f64)) -> Self {
        Self::Pair(x, y)
    }
}

impl From<[f64; 2]> for Datum {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::Pair(x, y)
    }
}

impl From<f64> for Datum {
    fn from(y: f64) -> Self {
        Self::Value(y)
    }
}

impl From<Option<f64>> for Datum {
    fn from(y: Option<f64>) -> Self {
        y.map_or(Self::Missing, Self::Value)
    }
}

/// Maps a datum and its index to a data-space point; `None` drops it.
pub type TranslateFn = Arc<dyn Fn(&Datum, usize) -> Option<Point>>;

/// Pairs map to themselves, bare values to `(index, value)`.
pub fn default_translate(datum: &Datum, index: usize) -> Option<Point> {
    match *datum {
        Datum::Pair(x, y) => Some(Point::new(x, y)),
        Datum::Value(y) => Some(Point::new(index as f64, y)),
        Datum::Missing => None,
    }
}

/// The data-space extent of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataBounds {
    /// Horizontal extent.
    pub x: DataRange,
    /// Vertical extent.
    pub y: DataRange,
}

impl DataBounds {
    /// Scans points, ignoring any with a non-finite coordinate. `None` if nothing remains.
    pub fn scan(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<Self>, p| {
                Some(match acc {
                    None => Self {
                        x: DataRange::new(p.x, p.x),
                        y: DataRange::new(p.y, p.y),
                    },
                    Some(b) => Self {
                        x: b.x.including(p.x),
                        y: b.y.including(p.y),
                    },
                })
            })
    }

    /// The smallest bounds covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x: self.x.union(&other.x),
            y: self.y.union(&other.y),
        }
    }
}

/// Translates `points` and keeps the finite results with their original index.
pub(crate) fn translate_points(
    points: &[Datum],
    translate: &TranslateFn,
) -> impl Iterator<Item = (usize, Point)> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, d)| translate(d, i).map(|p| (i, p)))
        .filter(|(_, p)| p.is_finite())
}

/// A chart that can be attached to a [`Canvas`](crate::Canvas).
pub trait RenderableSeries: Any {
    /// The data-space extent of the chart's translated points.
    fn bounds(&self) -> Option<DataBounds>;

    /// Draws the chart against a finalized transform, replacing the previous pass' groups.
    fn render(
        &mut self,
        transform: &CoordinateTransform,
        surface: &mut dyn Surface,
    ) -> Result<(), SurfaceError>;

    /// Shared group and visibility state.
    fn state(&self) -> &SeriesState;

    /// Shared group and visibility state, mutably.
    fn state_mut(&mut self) -> &mut SeriesState;

    /// Upcast for downcasting to the concrete chart type.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for downcasting to the concrete chart type, mutably.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The chart's element groups from the last render.
    fn groups(&self) -> &GroupSet {
        &self.state().groups
    }

    /// Returns `true` while the chart is hidden.
    fn is_hidden(&self) -> bool {
        self.state().hidden
    }

    /// Hides every element, remembering its opacities.
    fn hide(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        self.state_mut().hide(surface, None)
    }

    /// Restores the opacities remembered by [`RenderableSeries::hide`].
    fn show(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        self.state_mut().show(surface, None)
    }

    /// Like [`RenderableSeries::hide`], animated over `duration`.
    fn fade_out(
        &mut self,
        surface: &mut dyn Surface,
        duration: Duration,
    ) -> Result<(), SurfaceError> {
        self.state_mut().hide(surface, Some(duration))
    }

    /// Like [`RenderableSeries::show`], animated over `duration`.
    fn fade_in(&mut self, surface: &mut dyn Surface, duration: Duration) -> Result<(), SurfaceError> {
        self.state_mut().show(surface, Some(duration))
    }

    /// [`RenderableSeries::fade_out`] over [`DEFAULT_FADE`].
    fn fade_out_default(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        self.fade_out(surface, DEFAULT_FADE)
    }

    /// [`RenderableSeries::fade_in`] over [`DEFAULT_FADE`].
    fn fade_in_default(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        self.fade_in(surface, DEFAULT_FADE)
    }
}

/// Duration used by [`RenderableSeries::fade_out_default`] and [`RenderableSeries::fade_in_default`].
pub const DEFAULT_FADE: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq)]
struct SavedOpacity {
    opacity: f64,
    fill: f64,
    stroke: f64,
}

/// Per-chart element groups plus visibility bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct SeriesState {
    groups: GroupSet,
    hidden: bool,
    saved: HashMap<ElementId, SavedOpacity>,
}

impl SeriesState {
    /// Creates state with one group per layer.
    pub fn new(layers: &[Layer]) -> Self {
        Self {
            groups: GroupSet::new(layers),
            hidden: false,
            saved: HashMap::new(),
        }
    }

    /// The chart's groups.
    pub fn groups(&self) -> &GroupSet {
        &self.groups
    }

    /// The chart's groups, mutably.
    pub fn groups_mut(&mut self) -> &mut GroupSet {
        &mut self.groups
    }

    /// Starts a render pass: forgets last pass' elements and saved opacities.
    pub fn begin_pass(&mut self) {
        self.groups.reset();
        self.saved.clear();
    }

    /// Ends a render pass: a hidden chart stays hidden.
    pub fn end_pass(&mut self, surface: &mut dyn Surface) -> Result<(), SurfaceError> {
        if self.hidden {
            self.hide(surface, None)?;
        }
        Ok(())
    }

    fn hide(
        &mut self,
        surface: &mut dyn Surface,
        duration: Option<Duration>,
    ) -> Result<(), SurfaceError> {
        let zero = Attrs::new().with_opacities(0.0, 0.0, 0.0);
        for id in self.groups.elements() {
            let current = surface.attrs(id)?;
            let stored = self.saved.get(&id).copied();
            // A zero current value means "already hidden": keep what was stored before.
            let pick = |now: Option<f64>, before: Option<f64>| {
                now.filter(|v| *v != 0.0)
                    .or(before.filter(|v| *v != 0.0))
                    .unwrap_or(1.0)
            };
            let saved = SavedOpacity {
                opacity: pick(current.opacity, stored.map(|s| s.opacity)),
                fill: pick(current.fill_opacity, stored.map(|s| s.fill)),
                stroke: pick(current.stroke_opacity, stored.map(|s| s.stroke)),
            };
            self.saved.insert(id, saved);
            match duration {
                Some(d) => surface.animate(id, &zero, d)?,
                None => surface.set_attrs(id, &zero)?,
            }
        }
        self.hidden = true;
        Ok(())
    }

    fn show(
        &mut self,
        surface: &mut dyn Surface,
        duration: Option<Duration>,
    ) -> Result<(), SurfaceError> {
        for id in self.groups.elements() {
            let target = match self.saved.get(&id) {
                Some(s) => Attrs::new().with_opacities(s.opacity, s.fill, s.stroke),
                None => {
                    let current = surface.attrs(id)?;
                    let or_one = |v: Option<f64>| v.filter(|v| *v != 0.0).unwrap_or(1.0);
                    Attrs::new().with_opacities(
                        or_one(current.opacity),
                        or_one(current.fill_opacity),
                        or_one(current.stroke_opacity),
                    )
                }
            };
            match duration {
                Some(d) => surface.animate(id, &target, d)?,
                None => surface.set_attrs(id, &target)?,
            }
        }
        self.hidden = false;
        Ok(())
    }
}

/// Collects the elements a drawing hook creates for one datum.
///
/// Everything created through the sink is attributed to the datum, so a `Skip` outcome
/// removes all of it and a `Replace` outcome restyles all of it.
pub struct ElementSink<'a> {
    surface: &'a mut dyn Surface,
    transform: &'a CoordinateTransform,
    created: SmallVec<[ElementId; 4]>,
}

impl core::fmt::Debug for ElementSink<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementSink")
            .field("transform", self.transform)
            .field("created", &self.created)
            .finish_non_exhaustive()
    }
}

impl<'a> ElementSink<'a> {
    pub(crate) fn new(surface: &'a mut dyn Surface, transform: &'a CoordinateTransform) -> Self {
        Self {
            surface,
            transform,
            created: SmallVec::new(),
        }
    }

    /// The transform of the current pass.
    pub fn transform(&self) -> &CoordinateTransform {
        self.transform
    }

    /// Direct access to the surface, e.g. for restyling a created element.
    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }

    /// Creates a rectangle.
    pub fn rect(&mut self, rect: Rect) -> ElementId {
        let id = self.surface.rect(rect.to_kurbo());
        self.created.push(id);
        id
    }

    /// Creates a circle.
    pub fn circle(&mut self, center: Point, radius: f64) -> ElementId {
        let id = self.surface.circle(center.into(), radius);
        self.created.push(id);
        id
    }

    /// Creates a path.
    pub fn path(&mut self, path: BezPath) -> ElementId {
        let id = self.surface.path(path);
        self.created.push(id);
        id
    }

    /// Creates a text element.
    pub fn text(&mut self, at: Point, text: &str) -> ElementId {
        let id = self.surface.text(at.into(), text);
        self.created.push(id);
        id
    }

    /// Merges attributes into an element.
    pub fn set_attrs(&mut self, id: ElementId, attrs: &Attrs) -> Result<(), SurfaceError> {
        self.surface.set_attrs(id, attrs)
    }

    /// Elements created so far.
    pub fn created(&self) -> &[ElementId] {
        &self.created
    }

    /// Applies the hook outcome and returns the surviving elements, clipped to `clip`.
    pub(crate) fn finish(
        self,
        outcome: Customize,
        clip: Rect,
    ) -> Result<SmallVec<[ElementId; 4]>, SurfaceError> {
        match outcome {
            Customize::Skip => {
                for &id in &self.created {
                    self.surface.remove(id)?;
                }
                return Ok(SmallVec::new());
            }
            Customize::Replace(attrs) => {
                for &id in &self.created {
                    self.surface.set_attrs(id, &attrs)?;
                }
            }
            Customize::UseDefault => {}
        }
        for &id in &self.created {
            self.surface.set_clip(id, clip.to_kurbo())?;
        }
        Ok(self.created)
    }
}

/// A drawing hook for per-datum glyphs (dots, bars).
///
/// The returned outcome applies to every element the hook created through the sink.
pub type DrawFn<C> = Arc<dyn Fn(&mut ElementSink<'_>, &C) -> Result<Customize, SurfaceError>>;

/// How a chart draws one glyph per datum.
pub enum Glyph<C> {
    /// Draw the chart's default glyph with these attributes.
    Style(Attrs),
    /// Draw through a hook; whatever it creates belongs to the datum.
    Custom(DrawFn<C>),
}

impl<C> Glyph<C> {
    /// Wraps a drawing hook.
    pub fn custom(
        f: impl Fn(&mut ElementSink<'_>, &C) -> Result<Customize, SurfaceError> + 'static,
    ) -> Self {
        Self::Custom(Arc::new(f))
    }
}

impl<C> Clone for Glyph<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Style(a) => Self::Style(a.clone()),
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl<C> core::fmt::Debug for Glyph<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Style(a) => f.debug_tuple("Style").field(a).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Applies a single-element hook outcome. Returns `false` if the element was removed.
pub(crate) fn apply_outcome(
    surface: &mut dyn Surface,
    id: ElementId,
    outcome: Customize,
) -> Result<bool, SurfaceError> {
    match outcome {
        Customize::Skip => {
            surface.remove(id)?;
            Ok(false)
        }
        Customize::Replace(attrs) => {
            surface.set_attrs(id, &attrs)?;
            Ok(true)
        }
        Customize::UseDefault => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use quadrant_surface::Scene;

    /// A scene that records every animation request before applying it.
    struct Animated {
        scene: Scene,
        calls: Vec<(ElementId, Attrs, Duration)>,
    }

    impl Surface for Animated {
        fn width(&self) -> f64 {
            self.scene.width()
        }
        fn height(&self) -> f64 {
            self.scene.height()
        }
        fn rect(&mut self, rect: kurbo::Rect) -> ElementId {
            self.scene.rect(rect)
        }
        fn circle(&mut self, center: kurbo::Point, radius: f64) -> ElementId {
            self.scene.circle(center, radius)
        }
        fn path(&mut self, path: BezPath) -> ElementId {
            self.scene.path(path)
        }
        fn text(&mut self, at: kurbo::Point, text: &str) -> ElementId {
            self.scene.text(at, text)
        }
        fn set_attrs(&mut self, id: ElementId, attrs: &Attrs) -> Result<(), SurfaceError> {
            self.scene.set_attrs(id, attrs)
        }
        fn attrs(&self, id: ElementId) -> Result<Attrs, SurfaceError> {
            self.scene.attrs(id)
        }
        fn set_rect(&mut self, id: ElementId, rect: kurbo::Rect) -> Result<(), SurfaceError> {
            self.scene.set_rect(id, rect)
        }
        fn bounding_box(&self, id: ElementId) -> Result<kurbo::Rect, SurfaceError> {
            self.scene.bounding_box(id)
        }
        fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError> {
            self.scene.remove(id)
        }
        fn move_to_front(&mut self, id: ElementId) -> Result<(), SurfaceError> {
            self.scene.move_to_front(id)
        }
        fn set_clip(&mut self, id: ElementId, clip: kurbo::Rect) -> Result<(), SurfaceError> {
            self.scene.set_clip(id, clip)
        }
        fn animate(
            &mut self,
            id: ElementId,
            target: &Attrs,
            duration: Duration,
        ) -> Result<(), SurfaceError> {
            self.calls.push((id, target.clone(), duration));
            self.scene.set_attrs(id, target)
        }
        fn clear(&mut self) {
            self.scene.clear();
        }
    }

    #[test]
    fn default_translate_handles_every_shape() {
        assert_eq!(
            default_translate(&Datum::Pair(2.0, 3.0), 7),
            Some(Point::new(2.0, 3.0))
        );
        assert_eq!(
            default_translate(&Datum::Value(3.0), 7),
            Some(Point::new(7.0, 3.0))
        );
        assert_eq!(default_translate(&Datum::Missing, 7), None);
        assert_eq!(Datum::from(None::<f64>), Datum::Missing);
    }

    #[test]
    fn bounds_skip_missing_and_non_finite_points() {
        let points = [
            Point::new(1.0, 5.0),
            Point::new(f64::NAN, 100.0),
            Point::new(-2.0, 3.0),
        ];
        let b = DataBounds::scan(points).unwrap();
        assert_eq!(b.x, DataRange::new(-2.0, 1.0));
        assert_eq!(b.y, DataRange::new(3.0, 5.0));
        assert!(DataBounds::scan([]).is_none());
    }

    #[test]
    fn hide_show_round_trips_opacity() {
        let mut scene = Scene::new(10.0, 10.0);
        let mut state = SeriesState::new(&[Layer::Dots]);
        let half = scene.rect(kurbo::Rect::ZERO);
        let plain = scene.rect(kurbo::Rect::ZERO);
        scene
            .set_attrs(half, &Attrs::new().with_opacities(0.5, 0.25, 0.75))
            .unwrap();
        state.groups_mut().extend(Layer::Dots, [half, plain]);

        for _ in 0..3 {
            state.hide(&mut scene, None).unwrap();
            state.hide(&mut scene, None).unwrap();
            let a = scene.attrs(half).unwrap();
            assert_eq!(
                (a.opacity, a.fill_opacity, a.stroke_opacity),
                (Some(0.0), Some(0.0), Some(0.0))
            );
            state.show(&mut scene, None).unwrap();
        }

        let a = scene.attrs(half).unwrap();
        assert_eq!(
            (a.opacity, a.fill_opacity, a.stroke_opacity),
            (Some(0.5), Some(0.25), Some(0.75))
        );
        let b = scene.attrs(plain).unwrap();
        assert_eq!(b.opacity, Some(1.0));
        assert!(!state.hidden);
    }

    #[test]
    fn fades_go_through_animate_and_restore_opacity() {
        let layout = crate::layout::PlotLayout::arrange(
            crate::geometry::Size::new(100.0, 100.0),
            crate::geometry::Insets::ZERO,
            [crate::layout::Footprint::default(); 4],
            DataRange::new(0.0, 2.0),
            DataRange::new(0.0, 2.0),
        );
        let transform = layout.transform();
        let mut surface = Animated {
            scene: Scene::new(100.0, 100.0),
            calls: Vec::new(),
        };
        let mut chart = crate::LineChart::new([(0.0, 1.0), (1.0, 2.0), (2.0, 0.5)]);
        chart.render(&transform, &mut surface).unwrap();
        let path = chart.groups().get(Layer::Paths).unwrap().elements()[0];
        surface
            .set_attrs(path, &Attrs::new().with_opacities(0.8, 0.6, 0.4))
            .unwrap();
        let ids: Vec<ElementId> = chart.groups().elements().collect();
        assert!(ids.len() > 1);

        chart.fade_out_default(&mut surface).unwrap();
        assert!(chart.is_hidden());
        assert_eq!(surface.calls.len(), ids.len());
        for (id, target, duration) in &surface.calls {
            assert!(ids.contains(id));
            assert_eq!(*duration, DEFAULT_FADE);
            assert_eq!(
                (target.opacity, target.fill_opacity, target.stroke_opacity),
                (Some(0.0), Some(0.0), Some(0.0))
            );
        }
        let a = surface.attrs(path).unwrap();
        assert_eq!(a.opacity, Some(0.0));

        surface.calls.clear();
        chart
            .fade_in(&mut surface, Duration::from_millis(50))
            .unwrap();
        assert!(!chart.is_hidden());
        assert_eq!(surface.calls.len(), ids.len());
        assert!(
            surface
                .calls
                .iter()
                .all(|(_, _, d)| *d == Duration::from_millis(50))
        );
        let a = surface.attrs(path).unwrap();
        assert_eq!(
            (a.opacity, a.fill_opacity, a.stroke_opacity),
            (Some(0.8), Some(0.6), Some(0.4))
        );
        for id in ids.iter().filter(|id| **id != path) {
            assert_eq!(surface.attrs(*id).unwrap().opacity, Some(1.0));
        }

        surface.calls.clear();
        chart.fade_out(&mut surface, Duration::ZERO).unwrap();
        chart.fade_in_default(&mut surface).unwrap();
        assert!(
            surface.calls[ids.len()..]
                .iter()
                .all(|(_, _, d)| *d == DEFAULT_FADE)
        );
        assert_eq!(surface.attrs(path).unwrap().opacity, Some(0.8));
    }

    #[test]
    fn skipped_sink_removes_everything_it_created() {
        let mut scene = Scene::new(100.0, 100.0);
        let layout = crate::layout::PlotLayout::arrange(
            crate::geometry::Size::new(100.0, 100.0),
            crate::geometry::Insets::ZERO,
            [crate::layout::Footprint::default(); 4],
            DataRange::new(0.0, 1.0),
            DataRange::new(0.0, 1.0),
        );
        let transform = layout.transform();
        let mut sink = ElementSink::new(&mut scene, &transform);
        sink.circle(Point::new(1.0, 1.0), 2.0);
        sink.rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let kept = sink.finish(Customize::Skip, transform.plot()).unwrap();
        assert!(kept.is_empty());
        assert!(scene.is_empty());
    }
}
