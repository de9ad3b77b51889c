//! Anchor-to-line alignment

use super::Anchor;
use crate::layout::frame::Frame;
use crate::layout::tree::{ElementId, Tree};
use crate::layout::types::Reference;

pub(super) fn anchor_value(frame: &Frame, anchor: Anchor) -> f64 {
    match anchor {
        Anchor::Left => frame.left(),
        Anchor::Center => frame.center(),
        Anchor::Right => frame.right(),
        Anchor::OriginX => frame.x,
        Anchor::Top => frame.top(),
        Anchor::Middle => frame.middle(),
        Anchor::Bottom => frame.bottom(),
        Anchor::OriginY => frame.y,
    }
}

fn set_anchor(frame: &mut Frame, anchor: Anchor, value: f64) {
    match anchor {
        Anchor::Left => frame.set_left(value),
        Anchor::Center => frame.set_center(value),
        Anchor::Right => frame.set_right(value),
        Anchor::OriginX => frame.x = value,
        Anchor::Top => frame.set_top(value),
        Anchor::Middle => frame.set_middle(value),
        Anchor::Bottom => frame.set_bottom(value),
        Anchor::OriginY => frame.y = value,
    }
}

/// Position of a parent line in the child's convention
pub(super) fn target_line(parent: &Frame, target: Anchor, reference: Reference, origin_top: bool) -> f64 {
    let extent = parent.reference_extent(reference, target.axis(), origin_top);
    match target {
        Anchor::Left | Anchor::OriginX | Anchor::OriginY => extent.min,
        Anchor::Right => extent.max,
        Anchor::Center | Anchor::Middle => extent.mid(),
        Anchor::Top if origin_top => extent.min,
        Anchor::Top => extent.max,
        Anchor::Bottom if origin_top => extent.max,
        Anchor::Bottom => extent.min,
    }
}

pub(super) fn test(
    tree: &Tree,
    id: ElementId,
    anchor: Anchor,
    target: Anchor,
    reference: Reference,
    tolerance: f64,
) -> bool {
    let (Some(frame), Some(parent)) = (tree.frame(id), tree.parent_frame(id)) else {
        return false;
    };
    let line = target_line(&parent, target, reference, frame.origin_top);
    (anchor_value(&frame, anchor) - line).abs() <= tolerance
}

pub(super) fn apply(tree: &mut Tree, id: ElementId, anchor: Anchor, target: Anchor, reference: Reference) {
    let (Some(mut frame), Some(parent)) = (tree.frame(id), tree.parent_frame(id)) else {
        return;
    };
    let line = target_line(&parent, target, reference, frame.origin_top);
    set_anchor(&mut frame, anchor, line);
    tree.set_frame(id, &frame);
}
