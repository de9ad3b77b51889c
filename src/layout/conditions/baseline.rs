//! Baseline grid snapping

use super::{BaselineAnchor, Rounding};
use crate::layout::frame::Frame;
use crate::layout::tree::{ElementId, Tree};

/// Round `value` onto `start + k * unit`
pub fn snap(value: f64, unit: f64, start: f64, rounding: Rounding) -> f64 {
    if unit <= 0.0 {
        return value;
    }
    let steps = (value - start) / unit;
    let k = match rounding {
        Rounding::Nearest => steps.round(),
        Rounding::Down => steps.floor(),
        Rounding::Up => steps.ceil(),
    };
    start + k * unit
}

fn anchor_value(frame: &Frame, anchor: BaselineAnchor) -> f64 {
    match anchor {
        BaselineAnchor::Origin => frame.y,
        BaselineAnchor::FirstBaseline => frame.first_baseline(),
    }
}

pub(super) fn test(tree: &Tree, id: ElementId, unit: f64, start: f64, anchor: BaselineAnchor, tolerance: f64) -> bool {
    let Some(frame) = tree.frame(id) else {
        return false;
    };
    let value = anchor_value(&frame, anchor);
    (value - snap(value, unit, start, Rounding::Nearest)).abs() <= tolerance
}

pub(super) fn apply(
    tree: &mut Tree,
    id: ElementId,
    unit: f64,
    start: f64,
    rounding: Rounding,
    anchor: BaselineAnchor,
) {
    let Some(mut frame) = tree.frame(id) else {
        return;
    };
    let value = anchor_value(&frame, anchor);
    frame.y += snap(value, unit, start, rounding) - value;
    tree.set_frame(id, &frame);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::conditions::Condition;
    use crate::layout::element::Element;
    use crate::layout::score::Score;

    #[test]
    fn test_snap_directions() {
        assert_eq!(snap(103.0, 24.0, 0.0, Rounding::Down), 96.0);
        assert_eq!(snap(103.0, 24.0, 0.0, Rounding::Up), 120.0);
        assert_eq!(snap(103.0, 24.0, 0.0, Rounding::Nearest), 96.0);
        assert_eq!(snap(110.0, 24.0, 0.0, Rounding::Nearest), 120.0);
        assert_eq!(snap(103.0, 24.0, 10.0, Rounding::Down), 82.0);
    }

    #[test]
    fn test_snap_origin_down() {
        let mut tree = Tree::new();
        let id = tree.add_root(Element::new().with_position(0.0, 103.0).with_size(50.0, 50.0));
        let c = Condition::baseline(24.0, 0.0, Rounding::Down, BaselineAnchor::Origin);
        assert!(!c.test(&tree, id));
        let mut score = Score::new();
        c.solve(&mut tree, id, &mut score);
        assert_eq!(tree.frame(id).unwrap().y, 96.0);
        assert!(c.test(&tree, id));
    }

    #[test]
    fn test_snap_first_baseline() {
        let mut tree = Tree::new();
        let id = tree.add_root(
            Element::new()
                .with_position(0.0, 50.0)
                .with_size(100.0, 40.0)
                .with_origin_top(true)
                .with_baseline(14.0),
        );
        let mut score = Score::new();
        Condition::baseline_to_grid(12.0).solve(&mut tree, id, &mut score);
        let f = tree.frame(id).unwrap();
        assert_eq!(f.first_baseline(), 60.0);
        assert_eq!(f.y, 46.0);
    }
}
