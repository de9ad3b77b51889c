//! Element tree
//!
//! Elements live in a generational arena. Each node owns its children by id
//! and knows its parent by id, so conditions can read the parent and siblings
//! of the element they mutate without shared ownership. Ids of removed
//! elements are detected as stale instead of aliasing a new element.

use std::fmt;

use tracing::trace;

use super::conditions::Condition;
use super::element::Element;
use super::error::LayoutError;
use super::frame::Frame;
use super::types::{Edges, Grid, Sides, Track};
use super::units::{Base, Length};

/// Generational handle to an element in a [`Tree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
    next_free: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    len: usize,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    // ========================================================================
    // Arena
    // ========================================================================

    fn allocate(&mut self, node: Node) -> ElementId {
        self.len += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            self.free_head = slot.next_free.take();
            slot.node = Some(node);
            ElementId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
                next_free: None,
            });
            ElementId {
                index,
                generation: 0,
            }
        }
    }

    fn deallocate(&mut self, id: ElementId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.next_free = self.free_head;
        self.free_head = Some(id.index);
        self.len -= 1;
        Some(node)
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    // ========================================================================
    // Structure
    // ========================================================================

    pub fn add_root(&mut self, element: Element) -> ElementId {
        self.allocate(Node {
            element,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Append `element` as the last child of `parent`
    pub fn add_child(&mut self, parent: ElementId, element: Element) -> Result<ElementId, LayoutError> {
        if !self.contains(parent) {
            return Err(LayoutError::unknown(parent));
        }
        let id = self.allocate(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        Ok(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.node(id).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    pub fn element(&self, id: ElementId) -> Result<&Element, LayoutError> {
        self.get(id).ok_or(LayoutError::unknown(id))
    }

    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut Element, LayoutError> {
        self.get_mut(id).ok_or(LayoutError::unknown(id))
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Siblings placed before `id` in its parent's child order
    pub fn prior_siblings(&self, id: ElementId) -> &[ElementId] {
        let Some(parent) = self.parent(id) else {
            return &[];
        };
        let siblings = self.children(parent);
        match siblings.iter().position(|&c| c == id) {
            Some(pos) => &siblings[..pos],
            None => &[],
        }
    }

    /// True if `ancestor` is `id` or lies on the path from `id` to its root
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Depth-first ids, parents before children, children in insertion order
    pub fn preorder(&self, root: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        if !self.contains(root) {
            return order;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// First element named `name` in preorder below (and including) `root`
    pub fn find(&self, root: ElementId, name: &str) -> Option<ElementId> {
        self.preorder(root)
            .into_iter()
            .find(|&id| self.get(id).and_then(|e| e.name.as_deref()) == Some(name))
    }

    /// Attach a condition after checking it can work on this element
    pub fn attach(&mut self, id: ElementId, condition: Condition) -> Result<(), LayoutError> {
        let has_parent = self.parent(id).is_some();
        let element = self.element_mut(id)?;
        check_condition(element, &condition, has_parent)?;
        element.conditions.push(condition);
        Ok(())
    }

    /// Remove an element together with its subtree
    pub fn remove(&mut self, id: ElementId) -> Result<Element, LayoutError> {
        let parent = self.node(id).ok_or(LayoutError::unknown(id))?.parent;
        if let Some(node) = parent.and_then(|p| self.node_mut(p)) {
            node.children.retain(|&c| c != id);
        }

        let mut removed = None;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.deallocate(current) {
                stack.extend(node.children.iter().copied());
                if current == id {
                    removed = Some(node.element);
                }
            }
        }
        removed.ok_or(LayoutError::unknown(id))
    }

    /// Re-parent `id` as the last child of `target`
    pub fn move_to(&mut self, id: ElementId, target: ElementId) -> Result<(), LayoutError> {
        if !self.contains(target) {
            return Err(LayoutError::unknown(target));
        }
        let name = self.element(id)?.display_name().to_string();
        if self.is_ancestor(id, target) {
            return Err(LayoutError::move_into_descendant(name));
        }

        if let Some(node) = self.parent(id).and_then(|p| self.node_mut(p)) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(target) {
            node.children.push(id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = Some(target);
        }
        trace!(element = %name, target = %target, "moved element");
        Ok(())
    }

    /// Check links and conditions of every element below `root`
    pub fn validate(&self, root: ElementId) -> Result<(), LayoutError> {
        if !self.contains(root) {
            return Err(LayoutError::unknown(root));
        }
        for id in self.preorder(root) {
            let node = self.node(id).ok_or(LayoutError::unknown(id))?;
            for &child in &node.children {
                let child_node = self.node(child).ok_or_else(|| {
                    LayoutError::malformed(node.element.display_name(), format!("dangling child {}", child))
                })?;
                if child_node.parent != Some(id) {
                    return Err(LayoutError::malformed(
                        child_node.element.display_name(),
                        "parent link disagrees with its container",
                    ));
                }
            }
            for condition in &node.element.conditions {
                check_condition(&node.element, condition, node.parent.is_some())?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Font size of the element or its nearest ancestor that has one
    pub fn font_size(&self, id: ElementId) -> Option<f64> {
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.node(c)?;
            if node.element.font_size.is_some() {
                return node.element.font_size;
            }
            current = node.parent;
        }
        None
    }

    /// Resolved (width, height), clamped at zero
    pub fn size(&self, id: ElementId) -> Option<(f64, f64)> {
        let node = self.node(id)?;
        let parent = node.parent.and_then(|p| self.size(p));
        let font = self.font_size(id);
        let w = node.element.w.resolve(Base::new(parent.map(|s| s.0), font));
        let h = node.element.h.resolve(Base::new(parent.map(|s| s.1), font));
        Some((w.max(0.0), h.max(0.0)))
    }

    /// Geometry of `id` resolved to points in its parent's space
    pub fn frame(&self, id: ElementId) -> Option<Frame> {
        let node = self.node(id)?;
        let e = &node.element;
        let parent = node.parent.and_then(|p| self.size(p));
        let font = self.font_size(id);
        let (w, h) = self.size(id)?;
        let horizontal = Base::new(parent.map(|s| s.0), font);
        let vertical = Base::new(parent.map(|s| s.1), font);

        Some(Frame {
            x: e.x.resolve(horizontal),
            y: e.y.resolve(vertical),
            z: e.z,
            w,
            h,
            padding: e.padding.resolve(w, h, font),
            margin: e.margin.resolve(w, h, font),
            bleed: e.bleed.resolve(w, h, font),
            x_align: e.x_align,
            y_align: e.y_align,
            origin_top: e.origin_top,
            baseline: e.baseline.resolve(Base::new(Some(h), font)),
        })
    }

    pub fn parent_frame(&self, id: ElementId) -> Option<Frame> {
        self.parent(id).and_then(|p| self.frame(p))
    }

    /// Write position and size back onto the element as points
    pub fn set_frame(&mut self, id: ElementId, frame: &Frame) {
        if let Some(e) = self.get_mut(id) {
            e.x = Length::Pt(frame.x);
            e.y = Length::Pt(frame.y);
            e.w = Length::Pt(frame.w);
            e.h = Length::Pt(frame.h);
        }
    }

    /// Rewrite every geometric attribute below `root` as absolute points
    pub fn settle(&mut self, root: ElementId) -> Result<(), LayoutError> {
        if !self.contains(root) {
            return Err(LayoutError::unknown(root));
        }
        // Resolve everything first so children see their parents' original values
        let resolved: Vec<_> = self
            .preorder(root)
            .into_iter()
            .filter_map(|id| Some((id, self.frame(id)?, self.font_size(id))))
            .collect();

        for (id, frame, font) in resolved {
            let Some(e) = self.get_mut(id) else {
                continue;
            };
            let horizontal = Base::new(Some(frame.padded_width()), font);
            let vertical = Base::new(Some(frame.padded_height()), font);
            let gutter_base = Base::new(Some(frame.w), font);

            e.x = Length::Pt(frame.x);
            e.y = Length::Pt(frame.y);
            e.w = Length::Pt(frame.w);
            e.h = Length::Pt(frame.h);
            e.padding = settle_sides(frame.padding, e.padding.depth, gutter_base);
            e.margin = settle_sides(frame.margin, e.margin.depth, gutter_base);
            e.bleed = settle_sides(frame.bleed, e.bleed.depth, gutter_base);
            e.baseline = Length::Pt(frame.baseline);
            e.gutter.x = Length::Pt(e.gutter.x.resolve(gutter_base));
            e.gutter.y = Length::Pt(e.gutter.y.resolve(Base::new(Some(frame.h), font)));
            e.gutter.z = Length::Pt(e.gutter.z.resolve(gutter_base));
            settle_grid(&mut e.columns, horizontal);
            settle_grid(&mut e.rows, vertical);
        }
        Ok(())
    }

    /// Raw geometry of every element below `root`, for change detection
    pub(crate) fn geometry(&self, root: ElementId) -> Vec<(ElementId, [Length; 4])> {
        self.preorder(root)
            .into_iter()
            .filter_map(|id| self.get(id).map(|e| (id, [e.x, e.y, e.w, e.h])))
            .collect()
    }
}

fn settle_sides(resolved: Edges, depth: Option<Length>, base: Base) -> Sides {
    Sides {
        depth: depth.map(|d| Length::Pt(d.resolve(base))),
        ..resolved.to_sides()
    }
}

fn settle_grid(grid: &mut Grid, base: Base) {
    if let Grid::Tracks(tracks) = grid {
        for track in tracks.iter_mut() {
            *track = Track::new(
                Length::Pt(track.size.resolve(base)),
                Length::Pt(track.gutter.resolve(base)),
            );
        }
    }
}

fn check_condition(element: &Element, condition: &Condition, has_parent: bool) -> Result<(), LayoutError> {
    condition
        .rule
        .check()
        .map_err(|reason| LayoutError::invalid_condition(element.display_name(), condition.to_string(), reason))?;
    if condition.rule.requires_parent() && !has_parent {
        return Err(LayoutError::root_condition(
            element.display_name(),
            condition.to_string(),
        ));
    }
    Ok(())
}
