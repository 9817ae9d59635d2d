// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory retained surface.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as _};

use crate::{
    Attrs, ElementId, HeuristicTextMeasurer, Surface, SurfaceError, TextAnchor, TextMeasurer,
    TextStyle,
};

/// Font size used for text elements without an explicit `font_size`.
const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Element geometry, in untransformed surface coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A circle.
    Circle(Circle),
    /// An arbitrary path.
    Path(BezPath),
    /// A text position; the content lives in [`Attrs::text`].
    Text(Point),
}

/// A retained element.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    shape: Shape,
    attrs: Attrs,
    clip: Option<Rect>,
}

impl Element {
    /// Returns the element geometry.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the element attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Returns the clip rectangle, if any.
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Returns the text content, or `""` for non-text elements.
    pub fn text(&self) -> &str {
        self.attrs.text.as_deref().unwrap_or("")
    }
}

/// An in-memory [`Surface`] that keeps elements in paint order.
///
/// The last element of [`Scene::paint_order`] is drawn on top.
#[derive(Debug)]
pub struct Scene<M = HeuristicTextMeasurer> {
    width: f64,
    height: f64,
    measurer: M,
    elements: HashMap<ElementId, Element>,
    order: Vec<ElementId>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene using [`HeuristicTextMeasurer`] for text bounds.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_measurer(width, height, HeuristicTextMeasurer)
    }
}

impl<M: TextMeasurer> Scene<M> {
    /// Creates an empty scene with a custom text measurer.
    pub fn with_measurer(width: f64, height: f64, measurer: M) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            measurer,
            elements: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
        }
    }

    /// Resizes the surface. Existing elements are kept.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Returns element ids from back to front.
    pub fn paint_order(&self) -> &[ElementId] {
        &self.order
    }

    /// Returns the element for `id`, if it is still alive.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Iterates over live elements from back to front.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.elements.get(id).map(|e| (*id, e)))
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the scene holds no elements.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, shape: Shape, attrs: Attrs) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            Element {
                shape,
                attrs,
                clip: None,
            },
        );
        self.order.push(id);
        id
    }

    fn get(&self, id: ElementId) -> Result<&Element, SurfaceError> {
        self.elements
            .get(&id)
            .ok_or(SurfaceError::UnknownElement(id))
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, SurfaceError> {
        self.elements
            .get_mut(&id)
            .ok_or(SurfaceError::UnknownElement(id))
    }

    fn local_bounds(&self, element: &Element) -> Rect {
        match &element.shape {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => c.bounding_box(),
            Shape::Path(p) => p.bounding_box(),
            Shape::Text(at) => {
                let text = element.text();
                if text.is_empty() {
                    return Rect::from_points(*at, *at);
                }
                let font_size = element.attrs.font_size.unwrap_or(DEFAULT_FONT_SIZE);
                let anchor = element.attrs.anchor.unwrap_or(TextAnchor::Middle);
                self.measurer
                    .measure(text, TextStyle::new(font_size))
                    .bounds_at(*at, anchor)
            }
        }
    }
}

impl<M: TextMeasurer> Surface for Scene<M> {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn rect(&mut self, rect: Rect) -> ElementId {
        self.insert(Shape::Rect(rect.abs()), Attrs::default())
    }

    fn circle(&mut self, center: Point, radius: f64) -> ElementId {
        self.insert(
            Shape::Circle(Circle::new(center, radius.abs())),
            Attrs::default(),
        )
    }

    fn path(&mut self, path: BezPath) -> ElementId {
        self.insert(Shape::Path(path), Attrs::default())
    }

    fn text(&mut self, at: Point, text: &str) -> ElementId {
        self.insert(Shape::Text(at), Attrs::new().with_text(text))
    }

    fn set_attrs(&mut self, id: ElementId, attrs: &Attrs) -> Result<(), SurfaceError> {
        self.get_mut(id)?.attrs.merge(attrs);
        Ok(())
    }

    fn attrs(&self, id: ElementId) -> Result<Attrs, SurfaceError> {
        Ok(self.get(id)?.attrs.clone())
    }

    fn set_rect(&mut self, id: ElementId, rect: Rect) -> Result<(), SurfaceError> {
        let element = self.get_mut(id)?;
        match &mut element.shape {
            Shape::Rect(r) => {
                *r = rect.abs();
                Ok(())
            }
            _ => Err(SurfaceError::NotARect(id)),
        }
    }

    fn bounding_box(&self, id: ElementId) -> Result<Rect, SurfaceError> {
        let element = self.get(id)?;
        let local = self.local_bounds(element);
        let transform = element.attrs.transform.unwrap_or(Affine::IDENTITY);
        Ok(transform.transform_rect_bbox(local))
    }

    fn remove(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        self.elements
            .remove(&id)
            .ok_or(SurfaceError::UnknownElement(id))?;
        self.order.retain(|e| *e != id);
        Ok(())
    }

    fn move_to_front(&mut self, id: ElementId) -> Result<(), SurfaceError> {
        let pos = self
            .order
            .iter()
            .position(|e| *e == id)
            .ok_or(SurfaceError::UnknownElement(id))?;
        let id = self.order.remove(pos);
        self.order.push(id);
        Ok(())
    }

    fn set_clip(&mut self, id: ElementId, clip: Rect) -> Result<(), SurfaceError> {
        self.get_mut(id)?.clip = Some(clip.abs());
        Ok(())
    }

    fn clear(&mut self) {
        log::trace!("clearing scene with {} elements", self.order.len());
        self.elements.clear();
        self.order.clear();
    }
}
