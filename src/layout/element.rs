//! Element nodes
//!
//! An [`Element`] carries unresolved geometry and the conditions that will
//! position it. Tree structure (parent and children) lives in the
//! [`Tree`](super::tree::Tree) arena, not on the element.

use super::conditions::Condition;
use super::types::{Align, Gutter, Grid, Sides};
use super::units::Length;

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: Option<String>,
    pub x: Length,
    pub y: Length,
    /// Draw layer; floats only see siblings on the same layer
    pub z: f64,
    pub w: Length,
    pub h: Length,
    pub padding: Sides,
    pub margin: Sides,
    pub bleed: Sides,
    pub gutter: Gutter,
    pub x_align: Align,
    pub y_align: Align,
    /// Whether y grows downward from the parent's top edge
    pub origin_top: bool,
    /// Base for em lengths
    pub font_size: Option<f64>,
    /// Offset of the first baseline below the top edge
    pub baseline: Length,
    pub columns: Grid,
    pub rows: Grid,
    /// Name of the element that receives this one on overflow
    pub next: Option<String>,
    pub conditions: Vec<Condition>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with_name(name)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, x: impl Into<Length>, y: impl Into<Length>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn with_size(mut self, w: impl Into<Length>, h: impl Into<Length>) -> Self {
        self.w = w.into();
        self.h = h.into();
        self
    }

    pub fn with_padding(mut self, padding: Sides) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_bleed(mut self, bleed: Sides) -> Self {
        self.bleed = bleed;
        self
    }

    pub fn with_gutter(mut self, gutter: Gutter) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn with_align(mut self, x_align: Align, y_align: Align) -> Self {
        self.x_align = x_align;
        self.y_align = y_align;
        self
    }

    pub fn with_origin_top(mut self, origin_top: bool) -> Self {
        self.origin_top = origin_top;
        self
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_baseline(mut self, baseline: impl Into<Length>) -> Self {
        self.baseline = baseline.into();
        self
    }

    pub fn with_columns(mut self, columns: Grid) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_rows(mut self, rows: Grid) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Name for messages: the element's own name or a placeholder
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anon>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_geometry() {
        let e = Element::named("box")
            .with_position(10.0, Length::mm(5.0))
            .with_size(Length::percent(50.0), 20.0)
            .with_origin_top(true);
        assert_eq!(e.name.as_deref(), Some("box"));
        assert_eq!(e.x, Length::pt(10.0));
        assert_eq!(e.y, Length::mm(5.0));
        assert_eq!(e.w, Length::percent(50.0));
        assert!(e.origin_top);
    }

    #[test]
    fn test_defaults() {
        let e = Element::new();
        assert_eq!(e.display_name(), "<anon>");
        assert_eq!(e.columns, Grid::Even(1));
        assert!(!e.origin_top);
        assert!(e.conditions.is_empty());
    }
}
