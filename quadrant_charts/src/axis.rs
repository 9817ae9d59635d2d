// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis identities, ranges and per-axis tick configuration.

use alloc::vec::Vec;

use kurbo::Affine;
use peniko::color::palette::css;
use quadrant_surface::{Attrs, TextAnchor};

use crate::geometry::{Point, Rect, Size};
use crate::setting::{Customize, Setting};
use crate::ticks::evenly_spaced;

/// Gap between a tick's outer edge and its label.
pub const LABEL_GAP: f64 = 3.0;

/// Default font size for tick labels.
pub const LABEL_FONT_SIZE: f64 = 20.0;

/// One of the four axes around the plot rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Primary horizontal axis, below the plot.
    X,
    /// Secondary horizontal axis, above the plot.
    X2,
    /// Primary vertical axis, left of the plot.
    Y,
    /// Secondary vertical axis, right of the plot.
    Y2,
}

impl Axis {
    /// All axes in measurement order.
    pub const ALL: [Self; 4] = [Self::X, Self::X2, Self::Y, Self::Y2];

    /// The data dimension this axis shows.
    pub fn dimension(self) -> Dimension {
        match self {
            Self::X | Self::X2 => Dimension::X,
            Self::Y | Self::Y2 => Dimension::Y,
        }
    }

    /// Returns `true` for `X2` and `Y2`.
    pub fn is_secondary(self) -> bool {
        matches!(self, Self::X2 | Self::Y2)
    }

    /// Position in [`Axis::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::X2 => 1,
            Self::Y => 2,
            Self::Y2 => 3,
        }
    }

    /// Short lowercase name, e.g. `"x2"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::X2 => "x2",
            Self::Y => "y",
            Self::Y2 => "y2",
        }
    }
}

/// A data dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

/// A closed interval of data values with `min <= max`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DataRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl DataRange {
    /// Creates a range, swapping the bounds if they are reversed.
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            Self { min: b, max: a }
        } else {
            Self { min: a, max: b }
        }
    }

    /// `max - min`.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns `true` when `min == max`.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Returns `true` if both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Returns `true` if `v` lies within the range, bounds included.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// The smallest range covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Widens the range to include `v`.
    #[must_use]
    pub fn including(&self, v: f64) -> Self {
        Self {
            min: self.min.min(v),
            max: self.max.max(v),
        }
    }

    /// Moves `min` down by `below` and `max` up by `above`.
    #[must_use]
    pub fn extended(&self, below: f64, above: f64) -> Self {
        Self::new(self.min - below, self.max + above)
    }
}

impl From<(f64, f64)> for DataRange {
    fn from((a, b): (f64, f64)) -> Self {
        Self::new(a, b)
    }
}

/// Inputs for resolving a dimension's range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeContext {
    /// The dimension being resolved.
    pub dimension: Dimension,
    /// Union of the attached charts' bounds, or `None` without data.
    pub data: Option<DataRange>,
    /// Margin added below `min`, in data units.
    pub margin_below: f64,
    /// Margin added above `max`, in data units.
    pub margin_above: f64,
}

impl RangeContext {
    /// The data bounds (or zero without data), extended by the margins.
    pub fn auto(&self) -> DataRange {
        self.data
            .unwrap_or_default()
            .extended(self.margin_below, self.margin_above)
    }

    /// Like [`RangeContext::auto`], but with zero always inside the data bounds.
    pub fn auto_from_zero(&self) -> DataRange {
        self.data
            .unwrap_or_default()
            .including(0.0)
            .extended(self.margin_below, self.margin_above)
    }
}

/// Inputs for resolving an axis' tick values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickContext {
    /// The axis being resolved.
    pub axis: Axis,
    /// The resolved range of the axis' dimension.
    pub range: DataRange,
    /// The surface size.
    pub surface: Size,
}

/// A tick being decorated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickInfo {
    /// The axis the tick belongs to.
    pub axis: Axis,
    /// The tick value in data units.
    pub value: f64,
    /// Index of the value in the axis' generated tick list.
    pub index: usize,
}

/// Where a tick label lands, passed to the label placement hook.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelPlacement {
    /// The tick the label belongs to.
    pub tick: TickInfo,
    /// The label anchor point in pixels.
    pub at: Point,
    /// The label's transform before placement.
    pub transform: Affine,
}

impl LabelPlacement {
    /// Translates the existing transform to the anchor point.
    pub fn translated(&self) -> Attrs {
        Attrs::new().with_transform(Affine::translate((self.at.x, self.at.y)) * self.transform)
    }
}

/// A tick mark rectangle and its paint.
///
/// The rectangle is expressed in the tick's local frame: `x`/`width` run across the plot edge
/// (negative `x` is outside the plot) and `y`/`height` run along it.
#[derive(Clone, Debug, PartialEq)]
pub struct TickMark {
    /// Local tick rectangle.
    pub rect: Rect,
    /// Tick paint.
    pub attrs: Attrs,
}

impl Default for TickMark {
    fn default() -> Self {
        Self {
            rect: Rect::new(-3.0, -0.5, 3.0, 1.0),
            attrs: Attrs::new().with_fill(css::BLACK).without_stroke(),
        }
    }
}

/// Tick and label configuration for one axis.
#[derive(Clone, Debug)]
pub struct AxisConfig {
    /// Explicit tick values; when `None`, `tick_count` evenly spaced values are used.
    pub ticks: Option<Setting<Vec<f64>, TickContext>>,
    /// Number of generated ticks.
    pub tick_count: Setting<usize, TickContext>,
    /// Per-tick mark customization.
    pub tick: Setting<Customize<TickMark>, TickInfo>,
    /// Per-tick label customization, applied over `label_defaults` and the formatted value.
    pub label: Setting<Customize, TickInfo>,
    /// Attributes every label starts from.
    pub label_defaults: Attrs,
    /// Attributes applied once a label's anchor point is known.
    pub label_placement: Setting<Attrs, LabelPlacement>,
}

impl AxisConfig {
    /// The default configuration for `axis`.
    pub fn new(axis: Axis) -> Self {
        let tick_count = match axis {
            Axis::X => Setting::computed(|ctx: &TickContext| default_x_tick_count(ctx.surface.width)),
            Axis::Y => {
                Setting::computed(|ctx: &TickContext| default_y_tick_count(ctx.surface.height))
            }
            Axis::X2 | Axis::Y2 => Setting::Value(0),
        };
        Self {
            ticks: None,
            tick_count,
            tick: Setting::Value(Customize::UseDefault),
            label: Setting::Value(Customize::UseDefault),
            label_defaults: default_label_attrs(axis),
            label_placement: Setting::computed(LabelPlacement::translated),
        }
    }

    /// Uses exactly these tick values.
    pub fn with_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.ticks = Some(Setting::Value(ticks));
        self
    }

    /// Computes tick values from the resolved range.
    pub fn with_ticks_fn(mut self, f: impl Fn(&TickContext) -> Vec<f64> + 'static) -> Self {
        self.ticks = Some(Setting::computed(f));
        self
    }

    /// Generates `count` evenly spaced ticks, discarding explicit tick values.
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.ticks = None;
        self.tick_count = Setting::Value(count);
        self
    }

    /// Customizes every tick mark.
    pub fn with_tick(mut self, tick: Customize<TickMark>) -> Self {
        self.tick = Setting::Value(tick);
        self
    }

    /// Customizes tick marks per tick.
    pub fn with_tick_fn(mut self, f: impl Fn(&TickInfo) -> Customize<TickMark> + 'static) -> Self {
        self.tick = Setting::computed(f);
        self
    }

    /// Customizes labels per tick.
    pub fn with_label_fn(mut self, f: impl Fn(&TickInfo) -> Customize + 'static) -> Self {
        self.label = Setting::computed(f);
        self
    }

    /// Hides every label.
    pub fn without_labels(mut self) -> Self {
        self.label = Setting::Value(Customize::Skip);
        self
    }

    /// Replaces the attributes every label starts from.
    pub fn with_label_defaults(mut self, attrs: Attrs) -> Self {
        self.label_defaults = attrs;
        self
    }

    /// Replaces the label placement hook.
    pub fn with_label_placement_fn(
        mut self,
        f: impl Fn(&LabelPlacement) -> Attrs + 'static,
    ) -> Self {
        self.label_placement = Setting::computed(f);
        self
    }

    /// Resolves tick values, dropping non-finite and out-of-range values.
    ///
    /// Each value keeps its index in the unfiltered list.
    pub fn resolve_ticks(&self, ctx: &TickContext) -> Vec<(usize, f64)> {
        let values = match &self.ticks {
            Some(ticks) => ticks.resolve(ctx),
            None => evenly_spaced(self.tick_count.resolve(ctx), ctx.range.min, ctx.range.max),
        };
        values
            .into_iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite() && ctx.range.contains(*v))
            .collect()
    }
}

/// Default number of `x` ticks for a surface `width`.
pub fn default_x_tick_count(width: f64) -> usize {
    if width > 500.0 {
        11
    } else if width > 60.0 {
        6
    } else {
        0
    }
}

/// Default number of `y` ticks for a surface `height`.
pub fn default_y_tick_count(height: f64) -> usize {
    if height > 400.0 {
        9
    } else if height > 50.0 {
        5
    } else {
        0
    }
}

/// Default label attributes: horizontal-axis labels are rotated a quarter turn and anchored
/// on the side facing the plot.
pub fn default_label_attrs(axis: Axis) -> Attrs {
    let base = Attrs::new().with_font_size(LABEL_FONT_SIZE);
    let quarter_turn = Affine::rotate(-core::f64::consts::FRAC_PI_2);
    match axis {
        Axis::X => base
            .with_anchor(TextAnchor::End)
            .with_transform(quarter_turn),
        Axis::X2 => base
            .with_anchor(TextAnchor::Start)
            .with_transform(quarter_turn),
        Axis::Y => base.with_anchor(TextAnchor::End),
        Axis::Y2 => base.with_anchor(TextAnchor::Start),
    }
}
