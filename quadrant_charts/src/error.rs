// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by canvas operations.

use quadrant_surface::SurfaceError;

use crate::axis::Dimension;
use crate::canvas::ChartId;

/// Why a render pass or chart operation failed.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// A range setting resolved to a non-finite bound.
    #[error("{dimension:?} range [{min}, {max}] is not finite")]
    NonFiniteRange {
        /// The offending dimension.
        dimension: Dimension,
        /// Resolved lower bound.
        min: f64,
        /// Resolved upper bound.
        max: f64,
    },
    /// The chart id does not belong to this canvas.
    #[error("no chart with id {0:?}")]
    UnknownChart(ChartId),
    /// A surface operation failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
