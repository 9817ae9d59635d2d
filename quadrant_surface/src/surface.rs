// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The surface capability set consumed by chart layout.

use core::time::Duration;

use kurbo::{BezPath, Point, Rect};

use crate::Attrs;

/// Handle to an element created on a [`Surface`].
///
/// Ids are never reused by a surface, even across [`Surface::clear`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Errors reported by element operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The element does not exist (never created, removed, or cleared).
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),
    /// The operation does not apply to this kind of element.
    #[error("element {0:?} is not a rectangle")]
    NotARect(ElementId),
}

/// Retained-mode drawing operations.
///
/// New elements are appended to the front of the paint order (drawn last).
pub trait Surface {
    /// Surface width in surface units.
    fn width(&self) -> f64;

    /// Surface height in surface units.
    fn height(&self) -> f64;

    /// Creates a rectangle.
    fn rect(&mut self, rect: Rect) -> ElementId;

    /// Creates a circle.
    fn circle(&mut self, center: Point, radius: f64) -> ElementId;

    /// Creates a path.
    fn path(&mut self, path: BezPath) -> ElementId;

    /// Creates a single line of text positioned at `at`.
    fn text(&mut self, at: Point, text: &str) -> ElementId;

    /// Merges `attrs` into the element's attributes.
    fn set_attrs(&mut self, id: ElementId, attrs: &Attrs) -> Result<(), SurfaceError>;

    /// Returns the element's current attributes.
    fn attrs(&self, id: ElementId) -> Result<Attrs, SurfaceError>;

    /// Replaces the geometry of a rectangle element.
    fn set_rect(&mut self, id: ElementId, rect: Rect) -> Result<(), SurfaceError>;

    /// Returns the element's bounding box after its transform is applied.
    fn bounding_box(&self, id: ElementId) -> Result<Rect, SurfaceError>;

    /// Removes the element.
    fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError>;

    /// Moves the element to the front of the paint order.
    fn move_to_front(&mut self, id: ElementId) -> Result<(), SurfaceError>;

    /// Clips the element to `clip`.
    fn set_clip(&mut self, id: ElementId, clip: Rect) -> Result<(), SurfaceError>;

    /// Animates the element towards `target` over `duration`.
    ///
    /// Surfaces without animation support apply the target immediately.
    fn animate(
        &mut self,
        id: ElementId,
        target: &Attrs,
        duration: Duration,
    ) -> Result<(), SurfaceError> {
        let _ = duration;
        self.set_attrs(id, target)
    }

    /// Removes every element.
    fn clear(&mut self);
}
