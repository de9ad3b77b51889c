//! Floating: slide toward a side until blocked
//!
//! Only siblings placed before the element, on the same `z` layer, can block
//! it, and only when their margin boxes overlap the element's margin box on
//! the cross axis. Boxes that merely touch do not block. When the element no
//! longer fits before the opposite parent line, it wraps past the blocking
//! siblings on the cross axis (down the page for horizontal floats, to the
//! next column for vertical floats) and floats again.

use tracing::trace;

use crate::layout::frame::Frame;
use crate::layout::tree::{ElementId, Tree};
use crate::layout::types::{Axis, Extent, Reference, Side};

fn along(extents: &[Extent; 2], axis: Axis) -> Extent {
    match axis {
        Axis::X => extents[0],
        Axis::Y => extents[1],
    }
}

/// Where the element ends up after floating toward `side`
fn target(tree: &Tree, id: ElementId, side: Side, reference: Reference, tolerance: f64) -> Option<Frame> {
    let mut frame = tree.frame(id)?;
    let parent = tree.parent_frame(id)?;

    let axis = side.axis();
    let cross = axis.cross();
    let toward_min = side.is_low(frame.origin_top);
    // Horizontal floats wrap downward in the element's own convention
    let wrap_forward = match axis {
        Axis::X => frame.origin_top,
        Axis::Y => true,
    };
    let bounds = parent.reference_extent(reference, axis, frame.origin_top);

    // Sibling margin boxes in the element's own y convention
    let siblings: Vec<[Extent; 2]> = tree
        .prior_siblings(id)
        .iter()
        .filter_map(|&s| tree.frame(s))
        .filter(|s| s.z == frame.z)
        .map(|s| {
            [
                s.margin_extent_as(Axis::X, frame.origin_top, parent.h),
                s.margin_extent_as(Axis::Y, frame.origin_top, parent.h),
            ]
        })
        .collect();

    for _ in 0..=siblings.len() {
        let lane = frame.margin_extent(cross);
        let blockers: Vec<&[Extent; 2]> = siblings
            .iter()
            .filter(|s| along(s, cross).overlaps(&lane))
            .collect();
        let length = frame.margin_extent(axis).len();

        let blocked_overflow = if toward_min {
            let edge = blockers
                .iter()
                .map(|s| along(s, axis).max)
                .fold(bounds.min, f64::max);
            frame.set_margin_min(axis, edge);
            edge > bounds.min && edge + length > bounds.max + tolerance
        } else {
            let edge = blockers
                .iter()
                .map(|s| along(s, axis).min)
                .fold(bounds.max, f64::min);
            frame.set_margin_max(axis, edge);
            edge < bounds.max && edge - length < bounds.min - tolerance
        };

        if !blocked_overflow || blockers.is_empty() {
            break;
        }

        let before = frame.margin_extent(cross);
        if wrap_forward {
            let next = blockers
                .iter()
                .map(|s| along(s, cross).max)
                .fold(f64::NEG_INFINITY, f64::max);
            frame.set_margin_min(cross, next);
        } else {
            let next = blockers
                .iter()
                .map(|s| along(s, cross).min)
                .fold(f64::INFINITY, f64::min);
            frame.set_margin_max(cross, next);
        }
        if frame.margin_extent(cross) == before {
            break;
        }
        // Start the new lane from the float side
        if toward_min {
            frame.set_margin_min(axis, bounds.min);
        } else {
            frame.set_margin_max(axis, bounds.max);
        }
    }
    Some(frame)
}

pub(super) fn test(tree: &Tree, id: ElementId, side: Side, reference: Reference, tolerance: f64) -> bool {
    let (Some(frame), Some(goal)) = (tree.frame(id), target(tree, id, side, reference, tolerance)) else {
        return false;
    };
    (frame.x - goal.x).abs() <= tolerance && (frame.y - goal.y).abs() <= tolerance
}

pub(super) fn apply(tree: &mut Tree, id: ElementId, side: Side, reference: Reference, tolerance: f64) {
    if let Some(goal) = target(tree, id, side, reference, tolerance) {
        trace!(element = %id, side = side.name(), x = goal.x, y = goal.y, "float");
        tree.set_frame(id, &goal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::conditions::Condition;
    use crate::layout::element::Element;
    use crate::layout::score::Score;
    use crate::layout::types::Sides;
    use crate::layout::units::Length;

    fn page(origin_top: bool) -> (Tree, ElementId) {
        let mut tree = Tree::new();
        let root = tree.add_root(
            Element::named("page")
                .with_size(300.0, 400.0)
                .with_origin_top(origin_top),
        );
        (tree, root)
    }

    fn block(tree: &mut Tree, root: ElementId, name: &str, conditions: Vec<Condition>) -> ElementId {
        tree.add_child(
            root,
            Element::named(name)
                .with_size(100.0, 50.0)
                .with_origin_top(true)
                .with_conditions(conditions),
        )
        .unwrap()
    }

    fn solve_once(tree: &mut Tree, id: ElementId) {
        let conditions = tree.get(id).unwrap().conditions.clone();
        let mut score = Score::new();
        for c in &conditions {
            c.solve(tree, id, &mut score);
        }
    }

    fn position(tree: &Tree, id: ElementId) -> (f64, f64) {
        let f = tree.frame(id).unwrap();
        (f.left(), f.top())
    }

    #[test]
    fn test_first_element_floats_to_padding_corner() {
        let (mut tree, root) = page(true);
        tree.get_mut(root).unwrap().padding = Sides::uniform(Length::pt(10.0));
        let a = block(&mut tree, root, "a", vec![Condition::float_left(), Condition::float_top()]);
        tree.get_mut(a).unwrap().x = Length::pt(150.0);
        tree.get_mut(a).unwrap().y = Length::pt(150.0);
        solve_once(&mut tree, a);
        assert_eq!(position(&tree, a), (10.0, 10.0));
    }

    #[test]
    fn test_horizontal_first_fills_rows() {
        let (mut tree, root) = page(true);
        let ids: Vec<_> = (0..4)
            .map(|i| {
                block(
                    &mut tree,
                    root,
                    &format!("b{}", i),
                    vec![Condition::float_left(), Condition::float_top()],
                )
            })
            .collect();
        for &id in &ids {
            solve_once(&mut tree, id);
        }
        let positions: Vec<_> = ids.iter().map(|&id| position(&tree, id)).collect();
        assert_eq!(
            positions,
            vec![(0.0, 0.0), (100.0, 0.0), (200.0, 0.0), (0.0, 50.0)]
        );
    }

    #[test]
    fn test_vertical_first_stacks_column() {
        let (mut tree, root) = page(true);
        let ids: Vec<_> = (0..3)
            .map(|i| {
                block(
                    &mut tree,
                    root,
                    &format!("b{}", i),
                    vec![Condition::float_top(), Condition::float_left()],
                )
            })
            .collect();
        for &id in &ids {
            solve_once(&mut tree, id);
        }
        let positions: Vec<_> = ids.iter().map(|&id| position(&tree, id)).collect();
        assert_eq!(positions, vec![(0.0, 0.0), (0.0, 50.0), (0.0, 100.0)]);
    }

    #[test]
    fn test_other_layer_does_not_block() {
        let (mut tree, root) = page(true);
        let a = block(&mut tree, root, "a", vec![Condition::float_left()]);
        let b = block(&mut tree, root, "b", vec![Condition::float_left()]);
        tree.get_mut(b).unwrap().z = 1.0;
        solve_once(&mut tree, a);
        solve_once(&mut tree, b);
        assert_eq!(position(&tree, b), (0.0, 0.0));
    }

    #[test]
    fn test_later_siblings_do_not_block() {
        let (mut tree, root) = page(true);
        let a = block(&mut tree, root, "a", vec![Condition::float_left()]);
        let _b = block(&mut tree, root, "b", vec![]);
        tree.get_mut(a).unwrap().x = Length::pt(150.0);
        solve_once(&mut tree, a);
        assert_eq!(position(&tree, a), (0.0, 0.0));
    }

    #[test]
    fn test_margins_keep_distance() {
        let (mut tree, root) = page(true);
        let a = block(&mut tree, root, "a", vec![Condition::float_left()]);
        let b = block(&mut tree, root, "b", vec![Condition::float_left()]);
        tree.get_mut(a).unwrap().margin = Sides::uniform(Length::pt(4.0));
        tree.get_mut(b).unwrap().margin = Sides::uniform(Length::pt(4.0));
        solve_once(&mut tree, a);
        solve_once(&mut tree, b);
        assert_eq!(position(&tree, a).0, 4.0);
        assert_eq!(position(&tree, b).0, 112.0);
    }

    #[test]
    fn test_float_right_and_bottom_origin_bottom_page() {
        let (mut tree, root) = page(false);
        let a = tree
            .add_child(
                root,
                Element::named("a")
                    .with_size(100.0, 50.0)
                    .with_conditions([Condition::float_right(), Condition::float_bottom()]),
            )
            .unwrap();
        tree.get_mut(a).unwrap().y = Length::pt(200.0);
        solve_once(&mut tree, a);
        let f = tree.frame(a).unwrap();
        assert_eq!(f.right(), 300.0);
        assert_eq!(f.bottom(), 0.0);
    }

    #[test]
    fn test_test_is_stable_after_solve() {
        let (mut tree, root) = page(true);
        let ids: Vec<_> = (0..5)
            .map(|i| block(&mut tree, root, &format!("b{}", i), vec![Condition::float_left_top()]))
            .collect();
        for &id in &ids {
            solve_once(&mut tree, id);
        }
        for &id in &ids {
            let c = &tree.get(id).unwrap().conditions[0];
            assert!(c.test(&tree, id), "{} fails after solving", id);
        }
    }

    #[test]
    fn test_blocked_by_sibling_in_other_convention() {
        let (mut tree, root) = page(true);
        tree.add_child(
            root,
            Element::named("banner")
                .with_size(300.0, 50.0)
                .with_position(0.0, 350.0)
                .with_origin_top(false),
        )
        .unwrap();
        let b = block(&mut tree, root, "b", vec![Condition::float_top()]);
        tree.get_mut(b).unwrap().y = Length::pt(200.0);
        solve_once(&mut tree, b);
        assert_eq!(position(&tree, b), (0.0, 50.0));
    }
}
