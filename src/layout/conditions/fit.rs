//! Edge fitting: move one edge onto a parent line and keep the other

use crate::layout::frame::Frame;
use crate::layout::tree::{ElementId, Tree};
use crate::layout::types::{Axis, Reference, Side};

fn edge_value(frame: &Frame, side: Side) -> f64 {
    match side {
        Side::Left => frame.left(),
        Side::Right => frame.right(),
        Side::Top => frame.top(),
        Side::Bottom => frame.bottom(),
    }
}

fn side_line(parent: &Frame, side: Side, reference: Reference, origin_top: bool) -> f64 {
    let extent = parent.reference_extent(reference, side.axis(), origin_top);
    if side.is_low(origin_top) {
        extent.min
    } else {
        extent.max
    }
}

pub(super) fn test(tree: &Tree, id: ElementId, side: Side, reference: Reference, tolerance: f64) -> bool {
    let (Some(frame), Some(parent)) = (tree.frame(id), tree.parent_frame(id)) else {
        return false;
    };
    (edge_value(&frame, side) - side_line(&parent, side, reference, frame.origin_top)).abs() <= tolerance
}

pub(super) fn apply(tree: &mut Tree, id: ElementId, side: Side, reference: Reference) {
    let (Some(mut frame), Some(parent)) = (tree.frame(id), tree.parent_frame(id)) else {
        return;
    };
    let line = side_line(&parent, side, reference, frame.origin_top);
    let extent = frame.extent(side.axis());
    let (min, max) = if side.is_low(frame.origin_top) {
        (line, extent.max)
    } else {
        (extent.min, line)
    };
    match side.axis() {
        Axis::X => frame.set_x_extent(min, max),
        Axis::Y => frame.set_y_extent(min, max),
    }
    tree.set_frame(id, &frame);
}

pub(super) fn test_scale(tree: &Tree, id: ElementId, reference: Reference, tolerance: f64) -> bool {
    test(tree, id, Side::Left, reference, tolerance) && test(tree, id, Side::Right, reference, tolerance)
}

pub(super) fn apply_scale(tree: &mut Tree, id: ElementId, reference: Reference) {
    let (Some(mut frame), Some(parent)) = (tree.frame(id), tree.parent_frame(id)) else {
        return;
    };
    let extent = parent.reference_extent(reference, Axis::X, frame.origin_top);
    let old_width = frame.w;
    frame.set_x_extent(extent.min, extent.max);
    if old_width > 0.0 {
        let height = frame.h * frame.w / old_width;
        let top = frame.top();
        frame.set_height(height);
        frame.set_top(top);
    }
    tree.set_frame(id, &frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::conditions::Condition;
    use crate::layout::element::Element;
    use crate::layout::score::Score;
    use crate::layout::types::Sides;
    use crate::layout::units::Length;

    fn setup(origin_top: bool) -> (Tree, ElementId) {
        let mut tree = Tree::new();
        let root = tree.add_root(
            Element::named("page")
                .with_size(300.0, 200.0)
                .with_padding(Sides::uniform(Length::pt(20.0)))
                .with_bleed(Sides::uniform(Length::pt(6.0))),
        );
        let id = tree
            .add_child(
                root,
                Element::new()
                    .with_position(100.0, 50.0)
                    .with_size(40.0, 30.0)
                    .with_origin_top(origin_top),
            )
            .unwrap();
        (tree, id)
    }

    fn solve(tree: &mut Tree, id: ElementId, condition: Condition) {
        let mut score = Score::new();
        condition.solve(tree, id, &mut score);
        assert!(condition.test(tree, id), "{} still fails", condition);
    }

    #[test]
    fn test_fit_left_keeps_right_edge() {
        let (mut tree, id) = setup(false);
        solve(&mut tree, id, Condition::fit_edge(Side::Left, Reference::Padding));
        let f = tree.frame(id).unwrap();
        assert_eq!(f.left(), 20.0);
        assert_eq!(f.right(), 140.0);
    }

    #[test]
    fn test_fit_top_origin_bottom_keeps_bottom() {
        let (mut tree, id) = setup(false);
        solve(&mut tree, id, Condition::fit_edge(Side::Top, Reference::Padding));
        let f = tree.frame(id).unwrap();
        assert_eq!(f.top(), 180.0);
        assert_eq!(f.bottom(), 50.0);
        assert_eq!(f.h, 130.0);
    }

    #[test]
    fn test_fit_bottom_origin_top() {
        let (mut tree, id) = setup(true);
        solve(&mut tree, id, Condition::fit_edge(Side::Bottom, Reference::Side));
        let f = tree.frame(id).unwrap();
        assert_eq!(f.top(), 50.0);
        assert_eq!(f.bottom(), 200.0);
    }

    #[test]
    fn test_fit_fills_padded_box() {
        let (mut tree, id) = setup(true);
        solve(&mut tree, id, Condition::fit());
        let f = tree.frame(id).unwrap();
        assert_eq!((f.left(), f.top(), f.w, f.h), (20.0, 20.0, 260.0, 160.0));
    }

    #[test]
    fn test_fit_to_bleed() {
        let (mut tree, id) = setup(false);
        solve(&mut tree, id, Condition::fit_to_bleed());
        let f = tree.frame(id).unwrap();
        assert_eq!((f.left(), f.bottom(), f.w, f.h), (-6.0, -6.0, 312.0, 212.0));
    }

    #[test]
    fn test_fit_clamps_when_edge_passes_opposite() {
        let (mut tree, id) = setup(false);
        let mut f = tree.frame(id).unwrap();
        f.set_left(290.0);
        tree.set_frame(id, &f);
        let mut score = Score::new();
        Condition::fit_edge(Side::Right, Reference::Padding).solve(&mut tree, id, &mut score);
        let f = tree.frame(id).unwrap();
        assert_eq!(f.w, 0.0);
        assert!(f.w >= 0.0);
    }

    #[test]
    fn test_scale_to_width_keeps_ratio() {
        let (mut tree, id) = setup(true);
        solve(&mut tree, id, Condition::scale_to_width());
        let f = tree.frame(id).unwrap();
        assert_eq!(f.w, 260.0);
        assert_eq!(f.h, 195.0);
        assert_eq!(f.top(), 50.0);
    }
}
