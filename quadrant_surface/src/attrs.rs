// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element attributes.

extern crate alloc;

use alloc::string::String;

use kurbo::Affine;
use peniko::Brush;
use peniko::color::palette::css;
use smallvec::SmallVec;

/// Stroke dash lengths, alternating on/off.
pub type DashPattern = SmallVec<[f64; 4]>;

/// A sparse bag of element attributes.
///
/// Every field is optional; [`Attrs::merge`] overwrites only the fields that are set on the
/// incoming value, so callers can layer overrides on top of defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    /// Fill paint. `Brush::Solid(TRANSPARENT)` means "no fill".
    pub fill: Option<Brush>,
    /// Stroke paint. `Brush::Solid(TRANSPARENT)` means "no stroke".
    pub stroke: Option<Brush>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Stroke dash pattern.
    pub dash: Option<DashPattern>,
    /// Whole-element opacity in `0..=1`.
    pub opacity: Option<f64>,
    /// Fill opacity in `0..=1`.
    pub fill_opacity: Option<f64>,
    /// Stroke opacity in `0..=1`.
    pub stroke_opacity: Option<f64>,
    /// Font size for text elements.
    pub font_size: Option<f64>,
    /// Text anchor for text elements.
    pub anchor: Option<crate::TextAnchor>,
    /// Text content for text elements.
    pub text: Option<String>,
    /// Element transform, applied about the surface origin.
    pub transform: Option<Affine>,
}

impl Attrs {
    /// Creates an empty attribute bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Sets a transparent fill.
    pub fn without_fill(self) -> Self {
        self.with_fill(css::TRANSPARENT)
    }

    /// Sets the stroke paint.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    /// Sets a transparent stroke.
    pub fn without_stroke(self) -> Self {
        self.with_stroke(css::TRANSPARENT)
    }

    /// Sets the stroke width.
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    /// Sets the dash pattern.
    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        self.dash = Some(dash.iter().copied().collect());
        self
    }

    /// Sets the whole-element opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Sets all three opacities at once.
    pub fn with_opacities(mut self, opacity: f64, fill_opacity: f64, stroke_opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self.fill_opacity = Some(fill_opacity);
        self.stroke_opacity = Some(stroke_opacity);
        self
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the text anchor.
    pub fn with_anchor(mut self, anchor: crate::TextAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Sets the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the element transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Overwrites every field that is set on `other`.
    pub fn merge(&mut self, other: &Self) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        take(&mut self.fill, &other.fill);
        take(&mut self.stroke, &other.stroke);
        take(&mut self.stroke_width, &other.stroke_width);
        take(&mut self.dash, &other.dash);
        take(&mut self.opacity, &other.opacity);
        take(&mut self.fill_opacity, &other.fill_opacity);
        take(&mut self.stroke_opacity, &other.stroke_opacity);
        take(&mut self.font_size, &other.font_size);
        take(&mut self.anchor, &other.anchor);
        take(&mut self.text, &other.text);
        take(&mut self.transform, &other.transform);
    }

    /// Returns `self` with `other` merged on top.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }
}
