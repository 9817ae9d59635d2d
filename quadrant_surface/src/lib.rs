// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing-surface capabilities for Quadrant charts.
//!
//! Chart layout in `quadrant_charts` never talks to a renderer directly. It only needs a small
//! set of retained-mode operations:
//! - create rectangles, circles, paths and text,
//! - set (merge) attributes on an element,
//! - measure an element's transformed bounding box,
//! - remove an element, or move it to the front of the paint order.
//!
//! Those operations are the [`Surface`] trait. [`Scene`] is an in-memory implementation that
//! keeps elements in paint order and can be written out as SVG.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod attrs;
mod measure;
mod scene;
mod surface;
mod svg;

pub use attrs::{Attrs, DashPattern};
pub use measure::{HeuristicTextMeasurer, TextAnchor, TextMeasurer, TextMetrics, TextStyle};
pub use scene::{Element, Scene, Shape};
pub use surface::{ElementId, Surface, SurfaceError};
