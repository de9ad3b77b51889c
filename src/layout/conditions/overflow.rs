//! Overflow detection
//!
//! The rule only tests containment. Moving the element to its `next` target
//! is a structural change, so solving records a request in the score and the
//! solver applies it between passes.

use crate::layout::score::Score;
use crate::layout::tree::{ElementId, Tree};
use crate::layout::types::{Axis, Reference};

pub(super) fn test(tree: &Tree, id: ElementId, tolerance: f64) -> bool {
    let (Some(frame), Some(parent)) = (tree.frame(id), tree.parent_frame(id)) else {
        return false;
    };
    [Axis::X, Axis::Y].into_iter().all(|axis| {
        parent
            .reference_extent(Reference::Padding, axis, frame.origin_top)
            .contains(&frame.margin_extent(axis), tolerance)
    })
}

pub(super) fn apply(id: ElementId, score: &mut Score) {
    score.request_reroute(id);
}
