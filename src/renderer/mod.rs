//! Output back ends for solved element trees
//!
//! [`draw`] walks a tree in draw order and hands every element to a [`View`]
//! with its box in absolute, top-down page coordinates. Back ends only need
//! to implement the trait; the outline view in this module is the one the
//! CLI uses.

pub mod config;
pub mod outline;

pub use config::OutlineConfig;
pub use outline::{outline, OutlineView};

use crate::layout::{BoundingBox, Element, ElementId, LayoutError, Tree};

/// An element as it is handed to a view
#[derive(Debug, Clone, Copy)]
pub struct DrawNode<'a> {
    pub id: ElementId,
    pub element: &'a Element,
    /// Box in page coordinates, y growing downward from the root's top edge
    pub bounds: BoundingBox,
    /// Distance from the drawn root
    pub depth: usize,
}

/// A back end consuming elements in draw order
pub trait View {
    /// Called before any of the element's children
    fn draw_element(&mut self, node: &DrawNode<'_>);

    /// Called after all of the element's children
    fn finish_element(&mut self, _node: &DrawNode<'_>) {}
}

/// Walk the subtree under `root` in draw order
///
/// Parents come before their children. Siblings are drawn by ascending `z`,
/// ties in insertion order. The root's box sits at the origin.
pub fn draw(tree: &Tree, root: ElementId, view: &mut dyn View) -> Result<(), LayoutError> {
    let (w, h) = tree.size(root).ok_or_else(|| LayoutError::unknown(root))?;
    draw_node(tree, root, BoundingBox::new(0.0, 0.0, w, h), 0, view);
    Ok(())
}

fn draw_node(tree: &Tree, id: ElementId, bounds: BoundingBox, depth: usize, view: &mut dyn View) {
    let Some(element) = tree.get(id) else {
        return;
    };
    let node = DrawNode {
        id,
        element,
        bounds,
        depth,
    };
    view.draw_element(&node);

    let mut children: Vec<_> = tree
        .children(id)
        .iter()
        .filter_map(|&c| tree.frame(c).map(|f| (c, f)))
        .collect();
    // Stable sort keeps insertion order within a layer
    children.sort_by(|(_, a), (_, b)| a.z.total_cmp(&b.z));

    for (child, frame) in children {
        let local = frame.top_down_box(bounds.height);
        let child_bounds = BoundingBox::new(bounds.x + local.x, bounds.y + local.y, local.width, local.height);
        draw_node(tree, child, child_bounds, depth + 1, view);
    }

    view.finish_element(&node);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl View for Recorder {
        fn draw_element(&mut self, node: &DrawNode<'_>) {
            self.events.push(format!(
                "open {} {} {}",
                node.element.display_name(),
                node.bounds.x,
                node.bounds.y
            ));
        }

        fn finish_element(&mut self, node: &DrawNode<'_>) {
            self.events.push(format!("close {}", node.element.display_name()));
        }
    }

    #[test]
    fn test_draw_order_by_layer() {
        let mut tree = Tree::new();
        let root = tree.add_root(Element::named("page").with_size(100.0, 100.0));
        tree.add_child(root, Element::named("front").with_z(1.0)).unwrap();
        tree.add_child(root, Element::named("back")).unwrap();
        tree.add_child(root, Element::named("back2")).unwrap();

        let mut view = Recorder::default();
        draw(&tree, root, &mut view).unwrap();
        assert_eq!(
            view.events,
            vec![
                "open page 0 0",
                "open back 0 0",
                "close back",
                "open back2 0 0",
                "close back2",
                "open front 0 0",
                "close front",
                "close page",
            ]
        );
    }

    #[test]
    fn test_bottom_origin_converted_to_top_down() {
        let mut tree = Tree::new();
        let root = tree.add_root(Element::named("page").with_size(100.0, 200.0));
        let block = tree
            .add_child(root, Element::named("block").with_position(10.0, 20.0).with_size(50.0, 30.0))
            .unwrap();
        tree.add_child(
            block,
            Element::named("inner")
                .with_position(5.0, 5.0)
                .with_size(10.0, 10.0)
                .with_origin_top(true),
        )
        .unwrap();

        let mut view = Recorder::default();
        draw(&tree, root, &mut view).unwrap();
        // block top = 200 - (20 + 30); inner sits 5pt below the block's top edge
        assert_eq!(view.events[1], "open block 10 150");
        assert_eq!(view.events[2], "open inner 15 155");
    }

    #[test]
    fn test_unknown_root() {
        let mut tree = Tree::new();
        let root = tree.add_root(Element::new());
        tree.remove(root).unwrap();
        let mut view = Recorder::default();
        assert!(draw(&tree, root, &mut view).is_err());
    }
}
