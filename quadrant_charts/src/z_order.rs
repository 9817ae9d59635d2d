// Copyright 2025 the Quadrant Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions and the compositor that applies them.
//!
//! Every render pass tags each element group with a z-index from the palette below. Once all
//! charts have drawn, the compositor walks the distinct indices in ascending order and moves
//! each matching group's elements to the front, so higher indices paint on top no matter which
//! chart produced them. Groups sharing an index keep their enumeration order: canvas groups
//! first, then each chart's in the order the charts were added.

use alloc::vec::Vec;

use quadrant_surface::{ElementId, Surface, SurfaceError};

use crate::canvas::ChartId;

/// Spacing between adjacent palette entries.
pub const LAYER_HEIGHT: i32 = 10;

/// Lowest palette entry.
pub const BOTTOM: i32 = 0;
/// Caller decorations drawn below everything else.
pub const DECORATIONS_BELOW: i32 = BOTTOM;
/// Plot border and tick marks.
pub const BORDER: i32 = BOTTOM + LAYER_HEIGHT;
/// Filled areas under line series.
pub const FILLS: i32 = BORDER + LAYER_HEIGHT;
/// Grid lines.
pub const AXIS_LINES: i32 = FILLS + LAYER_HEIGHT;
/// Bars.
pub const BOXES: i32 = AXIS_LINES + LAYER_HEIGHT;
/// Line series paths.
pub const PATHS: i32 = BOXES + LAYER_HEIGHT;
/// Per-segment line decorations.
pub const SEGMENTS: i32 = PATHS + LAYER_HEIGHT;
/// Point markers.
pub const DOTS: i32 = SEGMENTS + LAYER_HEIGHT;
/// Tick labels.
pub const LABELS: i32 = DOTS + LAYER_HEIGHT;
/// Caller decorations drawn above the chart.
pub const DECORATIONS_ABOVE: i32 = LABELS + LAYER_HEIGHT;
/// Highest palette entry.
pub const TOP: i32 = DECORATIONS_ABOVE + LAYER_HEIGHT;

/// Named element groups produced during a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Caller decorations under the chart.
    DecorationsBelow,
    /// Plot border and tick marks.
    Border,
    /// Line chart area fills.
    Fills,
    /// Grid lines.
    AxisLines,
    /// Bar chart boxes.
    Boxes,
    /// Line chart paths.
    Paths,
    /// Line chart segments.
    Segments,
    /// Line chart dots.
    Dots,
    /// Tick labels.
    Labels,
    /// Caller decorations over the chart.
    DecorationsAbove,
}

impl Layer {
    /// The palette index a freshly created group of this layer receives.
    pub const fn default_z_index(self) -> i32 {
        match self {
            Self::DecorationsBelow => DECORATIONS_BELOW,
            Self::Border => BORDER,
            Self::Fills => FILLS,
            Self::AxisLines => AXIS_LINES,
            Self::Boxes => BOXES,
            Self::Paths => PATHS,
            Self::Segments => SEGMENTS,
            Self::Dots => DOTS,
            Self::Labels => LABELS,
            Self::DecorationsAbove => DECORATIONS_ABOVE,
        }
    }
}

/// A group of elements composited as one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementGroup {
    layer: Layer,
    z_index: i32,
    elements: Vec<ElementId>,
}

impl ElementGroup {
    fn new(layer: Layer) -> Self {
        Self {
            layer,
            z_index: layer.default_z_index(),
            elements: Vec::new(),
        }
    }

    /// The group's name.
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// The group's current z-index.
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Reassigns the z-index; takes effect at the next composite.
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }
}

/// The ordered groups owned by the canvas or by one chart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSet {
    groups: Vec<ElementGroup>,
}

impl GroupSet {
    /// Creates a set with one empty group per layer, in the given order.
    pub fn new(layers: &[Layer]) -> Self {
        Self {
            groups: layers.iter().copied().map(ElementGroup::new).collect(),
        }
    }

    /// Drops every element and restores default z-indices.
    pub fn reset(&mut self) {
        for g in &mut self.groups {
            *g = ElementGroup::new(g.layer);
        }
    }

    /// Returns the group for `layer`.
    pub fn get(&self, layer: Layer) -> Option<&ElementGroup> {
        self.groups.iter().find(|g| g.layer == layer)
    }

    /// Returns the group for `layer` mutably.
    pub fn get_mut(&mut self, layer: Layer) -> Option<&mut ElementGroup> {
        self.groups.iter_mut().find(|g| g.layer == layer)
    }

    /// Appends elements to the group for `layer`; ignored if the set has no such group.
    pub fn extend(&mut self, layer: Layer, ids: impl IntoIterator<Item = ElementId>) {
        if let Some(g) = self.get_mut(layer) {
            g.elements.extend(ids);
        } else {
            log::warn!("no {layer:?} group in this set; dropping elements");
        }
    }

    /// Appends one element to the group for `layer`.
    pub fn push(&mut self, layer: Layer, id: ElementId) {
        self.extend(layer, [id]);
    }

    /// Groups in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &ElementGroup> {
        self.groups.iter()
    }

    /// Every element of every group.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.groups.iter().flat_map(|g| g.elements.iter().copied())
    }
}

/// Who owns a group set in a [`LayerStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupOwner {
    /// The canvas' own groups.
    Canvas,
    /// A chart's groups.
    Chart(ChartId),
}

/// All group sets of one render pass, in enumeration order.
///
/// Handed to the reorder hook after default indices are assigned and before compositing.
#[derive(Debug)]
pub struct LayerStack<'a> {
    sets: Vec<(GroupOwner, &'a mut GroupSet)>,
}

impl<'a> LayerStack<'a> {
    pub(crate) fn new() -> Self {
        Self { sets: Vec::new() }
    }

    pub(crate) fn push(&mut self, owner: GroupOwner, set: &'a mut GroupSet) {
        self.sets.push((owner, set));
    }

    /// Every group with its owner, in enumeration order.
    pub fn groups(&self) -> impl Iterator<Item = (GroupOwner, &ElementGroup)> {
        self.sets
            .iter()
            .flat_map(|(owner, set)| set.iter().map(move |g| (*owner, g)))
    }

    /// Returns a group by owner and layer.
    pub fn group(&self, owner: GroupOwner, layer: Layer) -> Option<&ElementGroup> {
        self.sets
            .iter()
            .find(|(o, _)| *o == owner)
            .and_then(|(_, set)| set.get(layer))
    }

    /// Returns a group by owner and layer, mutably.
    pub fn group_mut(&mut self, owner: GroupOwner, layer: Layer) -> Option<&mut ElementGroup> {
        self.sets
            .iter_mut()
            .find(|(o, _)| *o == owner)
            .and_then(|(_, set)| set.get_mut(layer))
    }

    /// Reassigns a group's z-index. Returns `false` if the group does not exist.
    pub fn set_z_index(&mut self, owner: GroupOwner, layer: Layer, z_index: i32) -> bool {
        match self.group_mut(owner, layer) {
            Some(g) => {
                g.set_z_index(z_index);
                true
            }
            None => false,
        }
    }

    /// Distinct z-indices in ascending order.
    pub fn z_indices(&self) -> Vec<i32> {
        let mut out: Vec<i32> = self.groups().map(|(_, g)| g.z_index).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Moves every element to the front, index by index. Returns the indices visited.
    pub(crate) fn composite(&self, surface: &mut dyn Surface) -> Result<Vec<i32>, SurfaceError> {
        let order = self.z_indices();
        for &z in &order {
            for (_, group) in self.groups().filter(|(_, g)| g.z_index == z) {
                for &id in &group.elements {
                    surface.move_to_front(id)?;
                }
            }
        }
        log::trace!("composited z-indices {order:?}");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use quadrant_surface::Scene;

    #[test]
    fn palette_is_strictly_ordered() {
        let layers = [
            Layer::DecorationsBelow,
            Layer::Border,
            Layer::Fills,
            Layer::AxisLines,
            Layer::Boxes,
            Layer::Paths,
            Layer::Segments,
            Layer::Dots,
            Layer::Labels,
            Layer::DecorationsAbove,
        ];
        for w in layers.windows(2) {
            assert!(
                w[0].default_z_index() < w[1].default_z_index(),
                "{:?} should sit below {:?}",
                w[0],
                w[1]
            );
        }
        assert!(Layer::DecorationsAbove.default_z_index() < TOP);
    }

    #[test]
    fn composite_sorts_groups_and_keeps_ties_in_enumeration_order() {
        let mut scene = Scene::new(10.0, 10.0);
        let mut canvas = GroupSet::new(&[Layer::Labels, Layer::Border]);
        let mut chart = GroupSet::new(&[Layer::Dots, Layer::Fills]);

        let label = scene.rect(Rect::ZERO);
        let dot = scene.rect(Rect::ZERO);
        let border = scene.rect(Rect::ZERO);
        let fill = scene.rect(Rect::ZERO);
        canvas.push(Layer::Labels, label);
        canvas.push(Layer::Border, border);
        chart.push(Layer::Dots, dot);
        chart.push(Layer::Fills, fill);

        let mut stack = LayerStack::new();
        stack.push(GroupOwner::Canvas, &mut canvas);
        stack.push(GroupOwner::Chart(ChartId::from_index(0)), &mut chart);
        // Fills share the border's index, so they follow it in enumeration order.
        assert!(stack.set_z_index(
            GroupOwner::Chart(ChartId::from_index(0)),
            Layer::Fills,
            BORDER
        ));
        let order = stack.composite(&mut scene).unwrap();

        assert_eq!(order, [BORDER, DOTS, LABELS]);
        assert_eq!(scene.paint_order(), &[border, fill, dot, label]);
    }

    #[test]
    fn reset_restores_default_indices() {
        let mut set = GroupSet::new(&[Layer::Paths]);
        set.push(Layer::Paths, ElementId(1));
        set.get_mut(Layer::Paths).unwrap().set_z_index(-7);
        set.reset();
        let g = set.get(Layer::Paths).unwrap();
        assert_eq!(g.z_index(), PATHS);
        assert!(g.elements().is_empty());
    }
}
