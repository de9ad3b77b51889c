//! Lint checks for solved layouts.
//!
//! Runs after solving to catch geometry the conditions did not forbid but a
//! designer almost certainly did not intend: negative sizes, padding that
//! eats the whole box, overlapping siblings and children escaping their
//! parent's bleed box.

use std::fmt;

use super::tree::{ElementId, Tree};
use super::types::{Axis, Reference};
use super::units::Base;

/// A lint warning about a layout defect
#[derive(Debug, Clone, PartialEq)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Size,
    Padding,
    Overlap,
    Containment,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Size => write!(f, "size"),
            LintCategory::Padding => write!(f, "padding"),
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Containment => write!(f, "containment"),
        }
    }
}

/// Slack before an escaping child is reported
const CONTAINMENT_SLACK: f64 = 0.5;

/// Run all lint checks on the subtree under `root`.
pub fn check(tree: &Tree, root: ElementId) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    for id in tree.preorder(root) {
        check_size(tree, id, &mut warnings);
        check_overlaps(tree, id, &mut warnings);
        check_containment(tree, id, &mut warnings);
    }
    warnings
}

/// Display name for an element: its name if set, or its position under the parent.
fn element_display_name(tree: &Tree, id: ElementId) -> String {
    if let Some(name) = tree.get(id).and_then(|e| e.name.as_deref()) {
        return format!("\"{}\"", name);
    }
    match tree.parent(id) {
        Some(parent) => {
            let index = tree.children(parent).iter().position(|&c| c == id).unwrap_or(0);
            format!("<child #{} of {}>", index + 1, element_display_name(tree, parent))
        }
        None => "<root>".to_string(),
    }
}

// ── Size and padding ──────────────────────────────────────────────

fn check_size(tree: &Tree, id: ElementId, warnings: &mut Vec<LintWarning>) {
    let Some(element) = tree.get(id) else {
        return;
    };
    let Some(frame) = tree.frame(id) else {
        return;
    };
    let parent = tree.parent(id).and_then(|p| tree.size(p));
    let font = tree.font_size(id);
    let raw_w = element.w.resolve(Base::new(parent.map(|s| s.0), font));
    let raw_h = element.h.resolve(Base::new(parent.map(|s| s.1), font));
    if raw_w < 0.0 || raw_h < 0.0 {
        warnings.push(LintWarning {
            category: LintCategory::Size,
            message: format!(
                "element {} has negative size {:.1}x{:.1}",
                element_display_name(tree, id),
                raw_w,
                raw_h
            ),
        });
    }
    if frame.padded_width() < 0.0 || frame.padded_height() < 0.0 {
        warnings.push(LintWarning {
            category: LintCategory::Padding,
            message: format!(
                "padding of {} exceeds its box ({:.1}x{:.1} left inside)",
                element_display_name(tree, id),
                frame.padded_width(),
                frame.padded_height()
            ),
        });
    }
}

// ── Overlap detection ─────────────────────────────────────────────

fn check_overlaps(tree: &Tree, parent: ElementId, warnings: &mut Vec<LintWarning>) {
    let Some(parent_h) = tree.frame(parent).map(|f| f.h) else {
        return;
    };
    let children: Vec<_> = tree
        .children(parent)
        .iter()
        .filter_map(|&c| tree.frame(c).map(|f| (c, f)))
        .collect();

    for (i, (a_id, a)) in children.iter().enumerate() {
        for (b_id, b) in &children[i + 1..] {
            if a.z != b.z {
                continue;
            }
            let (a_box, b_box) = (a.top_down_box(parent_h), b.top_down_box(parent_h));
            if a_box.intersects(&b_box) {
                let overlap_w = a_box.right().min(b_box.right()) - a_box.x.max(b_box.x);
                let overlap_h = a_box.bottom().min(b_box.bottom()) - a_box.y.max(b_box.y);
                warnings.push(LintWarning {
                    category: LintCategory::Overlap,
                    message: format!(
                        "elements {} and {} overlap by {:.0}x{:.0}pt",
                        element_display_name(tree, *a_id),
                        element_display_name(tree, *b_id),
                        overlap_w,
                        overlap_h
                    ),
                });
            }
        }
    }
}

// ── Containment ───────────────────────────────────────────────────

fn check_containment(tree: &Tree, id: ElementId, warnings: &mut Vec<LintWarning>) {
    let (Some(frame), Some(parent)) = (tree.frame(id), tree.parent_frame(id)) else {
        return;
    };
    let inside = [Axis::X, Axis::Y].into_iter().all(|axis| {
        parent
            .reference_extent(Reference::Bleed, axis, frame.origin_top)
            .contains(&frame.extent(axis), CONTAINMENT_SLACK)
    });
    if !inside {
        let parent_name = tree
            .parent(id)
            .map(|p| element_display_name(tree, p))
            .unwrap_or_default();
        warnings.push(LintWarning {
            category: LintCategory::Containment,
            message: format!(
                "element {} extends outside {}",
                element_display_name(tree, id),
                parent_name
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::Element;
    use crate::layout::types::Sides;
    use crate::layout::units::Length;

    fn page() -> (Tree, ElementId) {
        let mut tree = Tree::new();
        let root = tree.add_root(Element::named("page").with_size(200.0, 200.0));
        (tree, root)
    }

    #[test]
    fn test_overlap_detected() {
        let (mut tree, root) = page();
        tree.add_child(root, Element::named("a").with_size(50.0, 50.0)).unwrap();
        tree.add_child(root, Element::named("b").with_position(25.0, 25.0).with_size(50.0, 50.0))
            .unwrap();
        let warnings = check(&tree, root);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Overlap);
        assert!(warnings[0].message.contains("\"a\" and \"b\""));
        assert!(warnings[0].message.contains("25x25"));
    }

    #[test]
    fn test_overlap_skipped_across_layers() {
        let (mut tree, root) = page();
        tree.add_child(root, Element::named("a").with_size(50.0, 50.0)).unwrap();
        tree.add_child(root, Element::named("b").with_size(50.0, 50.0).with_z(1.0))
            .unwrap();
        assert!(check(&tree, root).is_empty());
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let (mut tree, root) = page();
        tree.add_child(root, Element::named("a").with_size(50.0, 50.0)).unwrap();
        tree.add_child(root, Element::named("b").with_position(50.0, 0.0).with_size(50.0, 50.0))
            .unwrap();
        assert!(check(&tree, root).is_empty());
    }

    #[test]
    fn test_overlap_across_conventions() {
        let (mut tree, root) = page();
        tree.add_child(root, Element::named("top").with_size(50.0, 50.0).with_origin_top(true))
            .unwrap();
        tree.add_child(root, Element::named("band").with_position(0.0, 150.0).with_size(50.0, 50.0))
            .unwrap();
        let warnings = check(&tree, root);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("\"top\" and \"band\""));

        // Same raw y, opposite ends of the page
        let (mut tree, root) = page();
        tree.add_child(root, Element::named("top").with_size(50.0, 50.0).with_origin_top(true))
            .unwrap();
        tree.add_child(root, Element::named("bottom").with_size(50.0, 50.0)).unwrap();
        assert!(check(&tree, root).is_empty());
    }

    #[test]
    fn test_containment_respects_bleed() {
        let (mut tree, root) = page();
        tree.get_mut(root).unwrap().bleed = Sides::uniform(Length::pt(10.0));
        tree.add_child(root, Element::named("in_bleed").with_position(-10.0, 0.0).with_size(20.0, 20.0))
            .unwrap();
        assert!(check(&tree, root).is_empty());

        tree.add_child(root, Element::named("out").with_position(195.0, 100.0).with_size(20.0, 20.0))
            .unwrap();
        let warnings = check(&tree, root);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Containment);
    }

    #[test]
    fn test_padding_larger_than_box() {
        let (mut tree, root) = page();
        tree.add_child(
            root,
            Element::named("tight")
                .with_size(20.0, 20.0)
                .with_padding(Sides::uniform(Length::pt(15.0))),
        )
        .unwrap();
        let warnings = check(&tree, root);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, LintCategory::Padding);
    }

    #[test]
    fn test_anonymous_element_display() {
        let (mut tree, root) = page();
        tree.add_child(root, Element::new()).unwrap();
        let anon = tree.add_child(root, Element::new()).unwrap();
        assert_eq!(element_display_name(&tree, anon), "<child #2 of \"page\">");
    }
}
