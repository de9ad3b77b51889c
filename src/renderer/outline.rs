//! Plain-text outline of a solved tree

use crate::layout::{ElementId, LayoutError, Tree};

use super::{draw, DrawNode, OutlineConfig, View};

/// Collects one line per element: name, then absolute top-down box
pub struct OutlineView {
    config: OutlineConfig,
    lines: Vec<String>,
}

impl OutlineView {
    pub fn new(config: OutlineConfig) -> Self {
        Self {
            config,
            lines: vec![],
        }
    }

    /// The outline, one element per line, with a trailing newline
    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

impl View for OutlineView {
    fn draw_element(&mut self, node: &DrawNode<'_>) {
        let p = self.config.precision;
        let b = node.bounds;
        let mut line = format!(
            "{}[{}] x={:.p$} y={:.p$} w={:.p$} h={:.p$}",
            " ".repeat(node.depth * self.config.indent),
            node.element.display_name(),
            b.x,
            b.y,
            b.width,
            b.height,
        );
        if self.config.show_conditions && !node.element.conditions.is_empty() {
            let names: Vec<String> = node.element.conditions.iter().map(|c| c.to_string()).collect();
            line.push_str(" : ");
            line.push_str(&names.join(", "));
        }
        self.lines.push(line);
    }
}

/// Render the subtree under `root` as an outline
pub fn outline(tree: &Tree, root: ElementId, config: &OutlineConfig) -> Result<String, LayoutError> {
    let mut view = OutlineView::new(config.clone());
    draw(tree, root, &mut view)?;
    Ok(view.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Condition, Element};
    use pretty_assertions::assert_eq;

    fn sample() -> (Tree, ElementId) {
        let mut tree = Tree::new();
        let root = tree.add_root(Element::named("page").with_size(100.0, 80.0).with_origin_top(true));
        tree.add_child(
            root,
            Element::named("box")
                .with_position(10.0, 12.0)
                .with_size(20.0, 20.0)
                .with_origin_top(true)
                .with_conditions([Condition::left_to_left(), Condition::top_to_top()]),
        )
        .unwrap();
        (tree, root)
    }

    #[test]
    fn test_outline_lines() {
        let (tree, root) = sample();
        let text = outline(&tree, root, &OutlineConfig::default()).unwrap();
        assert_eq!(
            text,
            "[page] x=0.0 y=0.0 w=100.0 h=80.0\n  [box] x=10.0 y=12.0 w=20.0 h=20.0\n"
        );
    }

    #[test]
    fn test_outline_with_conditions() {
        let (tree, root) = sample();
        let config = OutlineConfig::new().with_precision(0).with_indent(4).with_conditions(true);
        let text = outline(&tree, root, &config).unwrap();
        assert_eq!(
            text,
            "[page] x=0 y=0 w=100 h=80\n    [box] x=10 y=12 w=20 h=20 : Left2Left, Top2Top\n"
        );
    }
}
