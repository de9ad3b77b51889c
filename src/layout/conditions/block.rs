//! Size rules: fixed sizes and shrinking to the children's block

use crate::layout::frame::Frame;
use crate::layout::tree::{ElementId, Tree};
use crate::layout::types::Axis;
use crate::layout::units::{Base, Length};

fn size_of(frame: &Frame, axis: Axis) -> f64 {
    match axis {
        Axis::X => frame.w,
        Axis::Y => frame.h,
    }
}

fn target_size(tree: &Tree, id: ElementId, axis: Axis, length: Length) -> f64 {
    let parent = tree.parent(id).and_then(|p| tree.size(p));
    let reference = parent.map(|(w, h)| match axis {
        Axis::X => w,
        Axis::Y => h,
    });
    length.resolve(Base::new(reference, tree.font_size(id))).max(0.0)
}

pub(super) fn test_size(tree: &Tree, id: ElementId, axis: Axis, length: Length, tolerance: f64) -> bool {
    let Some(frame) = tree.frame(id) else {
        return false;
    };
    (size_of(&frame, axis) - target_size(tree, id, axis, length)).abs() <= tolerance
}

pub(super) fn apply_size(tree: &mut Tree, id: ElementId, axis: Axis, length: Length) {
    let Some(mut frame) = tree.frame(id) else {
        return;
    };
    let size = target_size(tree, id, axis, length);
    match axis {
        Axis::X => frame.set_width(size),
        Axis::Y => frame.set_height(size),
    }
    tree.set_frame(id, &frame);
}

/// Size that makes the far padding edge hug the children's margin boxes,
/// measured from the left edge (x) or the top edge (y)
fn block_size(tree: &Tree, id: ElementId, frame: &Frame, axis: Axis) -> Option<f64> {
    let children: Vec<Frame> = tree
        .children(id)
        .iter()
        .filter_map(|&c| tree.frame(c))
        .collect();
    if children.is_empty() {
        return None;
    }
    let extent = match axis {
        Axis::X => children
            .iter()
            .map(|c| c.margin_extent(Axis::X).max)
            .fold(f64::NEG_INFINITY, f64::max),
        Axis::Y => children
            .iter()
            .map(|c| {
                let m = c.margin_extent(Axis::Y);
                if c.origin_top {
                    m.max
                } else {
                    frame.h - m.min
                }
            })
            .fold(f64::NEG_INFINITY, f64::max),
    };
    let far_padding = match axis {
        Axis::X => frame.padding.right,
        Axis::Y => frame.padding.bottom,
    };
    Some((extent + far_padding).max(0.0))
}

pub(super) fn test_shrink(tree: &Tree, id: ElementId, axis: Axis, tolerance: f64) -> bool {
    let Some(frame) = tree.frame(id) else {
        return false;
    };
    match block_size(tree, id, &frame, axis) {
        Some(size) => (size_of(&frame, axis) - size).abs() <= tolerance,
        None => true,
    }
}

pub(super) fn apply_shrink(tree: &mut Tree, id: ElementId, axis: Axis) {
    let Some(mut frame) = tree.frame(id) else {
        return;
    };
    let Some(size) = block_size(tree, id, &frame, axis) else {
        return;
    };
    match axis {
        Axis::X => frame.set_width(size),
        Axis::Y => {
            let top = frame.top();
            frame.set_height(size);
            frame.set_top(top);
        }
    }
    tree.set_frame(id, &frame);
}
