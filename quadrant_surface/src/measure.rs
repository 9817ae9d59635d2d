// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement for element bounding boxes.
//!
//! Tick-label layout depends on how much room a label takes once drawn. Shaping and glyph
//! layout stay downstream, so a [`Scene`](crate::Scene) measures text through this small
//! trait and derives a box from the anchor and the font size.

use kurbo::{Point, Rect};

/// A minimal text measurement interface.
///
/// Implementations can be heuristic ([`HeuristicTextMeasurer`]) or backed by a real shaping
/// engine.
pub trait TextMeasurer {
    /// Measure a single line of text.
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics;
}

/// Text styling inputs relevant to measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in surface units (typically pixels).
    pub font_size: f64,
}

impl TextStyle {
    /// Creates a style with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self { font_size }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width.
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent
    }

    /// Returns the untransformed box of a line drawn at `at`.
    ///
    /// The line is vertically centred on `at.y`; `anchor` picks which horizontal edge (or the
    /// middle) sits on `at.x`.
    #[must_use]
    pub fn bounds_at(&self, at: Point, anchor: TextAnchor) -> Rect {
        let w = self.advance_width;
        let half_h = 0.5 * self.line_height();
        let x0 = match anchor {
            TextAnchor::Start => at.x,
            TextAnchor::Middle => at.x - 0.5 * w,
            TextAnchor::End => at.x - w,
        };
        Rect::new(x0, at.y - half_h, x0 + w, at.y + half_h)
    }
}

/// Horizontal text alignment relative to the text position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The text starts at the position.
    Start,
    /// The text is centred on the position.
    #[default]
    Middle,
    /// The text ends at the position.
    End,
}

/// A heuristic measurer: ~0.6em per glyph and a 1em line box.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        TextMetrics {
            advance_width: 0.6 * style.font_size * text.chars().count() as f64,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
        }
    }
}
