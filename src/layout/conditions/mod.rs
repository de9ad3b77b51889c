//! Layout conditions
//!
//! A [`Condition`] pairs a geometric [`Rule`] with its scoring policy. Rules
//! are tested against the element's current geometry and, when they fail,
//! solved by moving or resizing the element. Solving is best effort: a rule
//! that cannot be satisfied leaves the element in its closest position and
//! keeps failing its test, which the solver reports in the score.
//!
//! Parent lines are always expressed in the element's own y convention, so a
//! `Top2Top` rule means the same thing for origin-top and origin-bottom
//! elements.

mod align;
mod baseline;
mod block;
mod fit;
mod float;
mod grid;
mod names;
mod overflow;

use std::fmt;

pub use names::{ParseRuleError, KNOWN_RULES};

use super::config::{DEFAULT_ERROR_FACTOR, DEFAULT_TOLERANCE, DEFAULT_VALUE};
use super::score::Score;
use super::tree::{ElementId, Tree};
use super::types::{Axis, Reference, Side};
use super::units::Length;

/// A point on an element, or a parent line it can be aligned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Left,
    Center,
    Right,
    /// The element's x origin (its `x` value)
    OriginX,
    Top,
    Middle,
    Bottom,
    /// The element's y origin (its `y` value)
    OriginY,
}

impl Anchor {
    pub fn axis(self) -> Axis {
        match self {
            Anchor::Left | Anchor::Center | Anchor::Right | Anchor::OriginX => Axis::X,
            Anchor::Top | Anchor::Middle | Anchor::Bottom | Anchor::OriginY => Axis::Y,
        }
    }

    pub fn is_origin(self) -> bool {
        matches!(self, Anchor::OriginX | Anchor::OriginY)
    }

    pub fn name(self) -> &'static str {
        match self {
            Anchor::Left => "Left",
            Anchor::Center => "Center",
            Anchor::Right => "Right",
            Anchor::Top => "Top",
            Anchor::Middle => "Middle",
            Anchor::Bottom => "Bottom",
            Anchor::OriginX | Anchor::OriginY => "Origin",
        }
    }
}

/// How a baseline snap picks its grid line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    #[default]
    Nearest,
    Down,
    Up,
}

/// What a baseline snap moves onto the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaselineAnchor {
    /// The element's y value
    Origin,
    /// The element's first baseline, `baseline` below its top edge
    #[default]
    FirstBaseline,
}

/// One geometric relationship between an element and its surroundings
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Put an anchor of the element on a parent line
    Align {
        anchor: Anchor,
        target: Anchor,
        reference: Reference,
    },
    /// Move one edge onto the parent line, keeping the opposite edge
    Fit { side: Side, reference: Reference },
    /// Fit the width and scale the height by the same ratio
    ScaleToWidth { reference: Reference },
    /// Hard size override on one axis
    Size { axis: Axis, length: Length },
    /// Slide toward a side until touching an earlier sibling or the parent line
    Float { side: Side, reference: Reference },
    /// Put the left or right edge on a parent column's edge
    Column { edge: Side, col: usize },
    /// Span the element over `span` columns starting at `col`
    ColumnSpan { col: usize, span: usize },
    /// Put the top or bottom edge on a parent row's edge
    Row { edge: Side, row: usize },
    /// Span the element over `span` rows starting at `row`
    RowSpan { row: usize, span: usize },
    /// Round a vertical position onto `start + k * unit`
    Baseline {
        unit: f64,
        start: f64,
        rounding: Rounding,
        anchor: BaselineAnchor,
    },
    /// Size the element so its far padding edge hugs its children
    Shrink { axis: Axis },
    /// Leave the parent's padded box and the element moves to its `next` target
    OverflowToNext,
    /// Several rules tested and solved together, in order
    All(Vec<Rule>),
}

impl Rule {
    pub fn align(anchor: Anchor, target: Anchor, reference: Reference) -> Self {
        Rule::Align {
            anchor,
            target,
            reference,
        }
    }

    pub fn fit(side: Side, reference: Reference) -> Self {
        Rule::Fit { side, reference }
    }

    pub fn float(side: Side, reference: Reference) -> Self {
        Rule::Float { side, reference }
    }

    /// Left2Left + Fit2Right
    pub fn fit_to_width(reference: Reference) -> Self {
        Rule::All(vec![
            Rule::align(Anchor::Left, Anchor::Left, reference),
            Rule::fit(Side::Right, reference),
        ])
    }

    /// Top2Top + Fit2Bottom
    pub fn fit_to_height(reference: Reference) -> Self {
        Rule::All(vec![
            Rule::align(Anchor::Top, Anchor::Top, reference),
            Rule::fit(Side::Bottom, reference),
        ])
    }

    /// All four edges on the parent lines
    pub fn fit_all(reference: Reference) -> Self {
        Rule::All(vec![
            Rule::align(Anchor::Left, Anchor::Left, reference),
            Rule::align(Anchor::Top, Anchor::Top, reference),
            Rule::fit(Side::Right, reference),
            Rule::fit(Side::Bottom, reference),
        ])
    }

    /// Center2Center + Middle2Middle
    pub fn center(reference: Reference) -> Self {
        Rule::All(vec![
            Rule::align(Anchor::Center, Anchor::Center, reference),
            Rule::align(Anchor::Middle, Anchor::Middle, reference),
        ])
    }

    /// Whether the rule measures against the parent
    pub fn requires_parent(&self) -> bool {
        match self {
            Rule::Baseline { .. } | Rule::Shrink { .. } | Rule::Size { .. } => false,
            Rule::All(rules) => rules.iter().any(Rule::requires_parent),
            _ => true,
        }
    }

    /// Whether failing the rule asks for the element to be routed elsewhere
    pub fn is_overflow(&self) -> bool {
        match self {
            Rule::OverflowToNext => true,
            Rule::All(rules) => rules.iter().any(Rule::is_overflow),
            _ => false,
        }
    }

    /// Reject parameter combinations that have no meaning
    pub fn check(&self) -> Result<(), String> {
        match self {
            Rule::Align { anchor, target, .. } => {
                if anchor.axis() != target.axis() {
                    return Err("anchor and target lie on different axes".to_string());
                }
                if target.is_origin() {
                    return Err("a parent has no origin line to align to".to_string());
                }
                Ok(())
            }
            Rule::Column { edge, .. } if !matches!(edge, Side::Left | Side::Right) => {
                Err("column edges are left or right".to_string())
            }
            Rule::Row { edge, .. } if !matches!(edge, Side::Top | Side::Bottom) => {
                Err("row edges are top or bottom".to_string())
            }
            Rule::ColumnSpan { span: 0, .. } | Rule::RowSpan { span: 0, .. } => {
                Err("a span covers at least one track".to_string())
            }
            Rule::Baseline { unit, start, .. } => {
                if !(unit.is_finite() && *unit > 0.0) {
                    return Err(format!("grid unit must be positive, got {}", unit));
                }
                if !start.is_finite() {
                    return Err("grid start must be finite".to_string());
                }
                Ok(())
            }
            Rule::All(rules) => {
                if rules.is_empty() {
                    return Err("empty rule list".to_string());
                }
                rules.iter().try_for_each(Rule::check)
            }
            _ => Ok(()),
        }
    }

    /// True when the relation holds within `tolerance`
    pub fn test(&self, tree: &Tree, id: ElementId, tolerance: f64) -> bool {
        match self {
            Rule::Align {
                anchor,
                target,
                reference,
            } => align::test(tree, id, *anchor, *target, *reference, tolerance),
            Rule::Fit { side, reference } => fit::test(tree, id, *side, *reference, tolerance),
            Rule::ScaleToWidth { reference } => fit::test_scale(tree, id, *reference, tolerance),
            Rule::Size { axis, length } => block::test_size(tree, id, *axis, *length, tolerance),
            Rule::Float { side, reference } => float::test(tree, id, *side, *reference, tolerance),
            Rule::Column { edge, col } => grid::test_column(tree, id, *edge, *col, tolerance),
            Rule::ColumnSpan { col, span } => grid::test_column_span(tree, id, *col, *span, tolerance),
            Rule::Row { edge, row } => grid::test_row(tree, id, *edge, *row, tolerance),
            Rule::RowSpan { row, span } => grid::test_row_span(tree, id, *row, *span, tolerance),
            Rule::Baseline {
                unit, start, anchor, ..
            } => baseline::test(tree, id, *unit, *start, *anchor, tolerance),
            Rule::Shrink { axis } => block::test_shrink(tree, id, *axis, tolerance),
            Rule::OverflowToNext => overflow::test(tree, id, tolerance),
            Rule::All(rules) => rules.iter().all(|r| r.test(tree, id, tolerance)),
        }
    }

    /// Mutate the element toward satisfying the relation
    pub fn apply(&self, tree: &mut Tree, id: ElementId, tolerance: f64, score: &mut Score) {
        match self {
            Rule::Align {
                anchor,
                target,
                reference,
            } => align::apply(tree, id, *anchor, *target, *reference),
            Rule::Fit { side, reference } => fit::apply(tree, id, *side, *reference),
            Rule::ScaleToWidth { reference } => fit::apply_scale(tree, id, *reference),
            Rule::Size { axis, length } => block::apply_size(tree, id, *axis, *length),
            Rule::Float { side, reference } => float::apply(tree, id, *side, *reference, tolerance),
            Rule::Column { edge, col } => grid::apply_column(tree, id, *edge, *col),
            Rule::ColumnSpan { col, span } => grid::apply_column_span(tree, id, *col, *span),
            Rule::Row { edge, row } => grid::apply_row(tree, id, *edge, *row),
            Rule::RowSpan { row, span } => grid::apply_row_span(tree, id, *row, *span),
            Rule::Baseline {
                unit,
                start,
                rounding,
                anchor,
            } => baseline::apply(tree, id, *unit, *start, *rounding, *anchor),
            Rule::Shrink { axis } => block::apply_shrink(tree, id, *axis),
            Rule::OverflowToNext => overflow::apply(id, score),
            Rule::All(rules) => {
                for rule in rules {
                    if !rule.test(tree, id, tolerance) {
                        rule.apply(tree, id, tolerance, score);
                    }
                }
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Align {
                anchor,
                target,
                reference,
            } => write!(f, "{}2{}{}", anchor.name(), target.name(), reference.suffix()),
            Rule::Fit { side, reference } => write!(f, "Fit2{}{}", side.name(), reference.suffix()),
            Rule::ScaleToWidth { reference } => write!(f, "Scale2Width{}", reference.suffix()),
            Rule::Size { axis: Axis::X, length } => write!(f, "Width({})", length),
            Rule::Size { axis: Axis::Y, length } => write!(f, "Height({})", length),
            Rule::Float { side, reference } => write!(f, "Float2{}{}", side.name(), reference.suffix()),
            Rule::Column { edge, col } => write!(f, "{}2Col({})", edge.name(), col),
            Rule::ColumnSpan { col, span } => write!(f, "Fit2ColSpan({}, {})", col, span),
            Rule::Row { edge, row } => write!(f, "{}2Row({})", edge.name(), row),
            Rule::RowSpan { row, span } => write!(f, "Fit2RowSpan({}, {})", row, span),
            Rule::Baseline {
                unit,
                start,
                rounding,
                anchor,
            } => {
                let prefix = match anchor {
                    BaselineAnchor::Origin => "Origin",
                    BaselineAnchor::FirstBaseline => "Baseline",
                };
                let direction = match rounding {
                    Rounding::Nearest => "",
                    Rounding::Down => "Down",
                    Rounding::Up => "Up",
                };
                if *start == 0.0 {
                    write!(f, "{}{}2Grid({})", prefix, direction, unit)
                } else {
                    write!(f, "{}{}2Grid({}, {})", prefix, direction, unit, start)
                }
            }
            Rule::Shrink { axis: Axis::X } => write!(f, "Shrink2BlockWidth"),
            Rule::Shrink { axis: Axis::Y } => write!(f, "Shrink2BlockHeight"),
            Rule::OverflowToNext => write!(f, "Overflow2Next"),
            Rule::All(rules) => {
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                Ok(())
            }
        }
    }
}

/// A rule with its scoring policy
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub rule: Rule,
    /// Largest geometric error still counted as satisfied
    pub tolerance: f64,
    /// Score added when the condition holds
    pub value: f64,
    /// Multiplier of `value` added when it does not
    pub error_factor: f64,
}

impl Condition {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            tolerance: DEFAULT_TOLERANCE,
            value: DEFAULT_VALUE,
            error_factor: DEFAULT_ERROR_FACTOR,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_error_factor(mut self, error_factor: f64) -> Self {
        self.error_factor = error_factor;
        self
    }

    pub fn test(&self, tree: &Tree, id: ElementId) -> bool {
        self.rule.test(tree, id, self.tolerance)
    }

    /// Try to satisfy a failing condition and record the outcome
    pub fn solve(&self, tree: &mut Tree, id: ElementId, score: &mut Score) {
        if self.test(tree, id) {
            return;
        }
        self.rule.apply(tree, id, self.tolerance, score);
        if self.test(tree, id) {
            score.add(self.value);
        } else {
            score.add(self.value * self.error_factor);
        }
    }

    /// Score contribution for the current geometry
    pub fn weight(&self, passed: bool) -> f64 {
        if passed {
            self.value
        } else {
            self.value * self.error_factor
        }
    }

    // ========================================================================
    // Edge to padding
    // ========================================================================

    pub fn align(anchor: Anchor, target: Anchor, reference: Reference) -> Self {
        Self::new(Rule::align(anchor, target, reference))
    }

    pub fn left_to_left() -> Self {
        Self::align(Anchor::Left, Anchor::Left, Reference::Padding)
    }

    pub fn right_to_right() -> Self {
        Self::align(Anchor::Right, Anchor::Right, Reference::Padding)
    }

    pub fn center_to_center() -> Self {
        Self::align(Anchor::Center, Anchor::Center, Reference::Padding)
    }

    pub fn top_to_top() -> Self {
        Self::align(Anchor::Top, Anchor::Top, Reference::Padding)
    }

    pub fn bottom_to_bottom() -> Self {
        Self::align(Anchor::Bottom, Anchor::Bottom, Reference::Padding)
    }

    pub fn middle_to_middle() -> Self {
        Self::align(Anchor::Middle, Anchor::Middle, Reference::Padding)
    }

    /// Both centers on the padded box
    pub fn center() -> Self {
        Self::new(Rule::center(Reference::Padding))
    }

    // ========================================================================
    // Edge to side
    // ========================================================================

    pub fn left_to_left_side() -> Self {
        Self::align(Anchor::Left, Anchor::Left, Reference::Side)
    }

    pub fn right_to_right_side() -> Self {
        Self::align(Anchor::Right, Anchor::Right, Reference::Side)
    }

    pub fn top_to_top_side() -> Self {
        Self::align(Anchor::Top, Anchor::Top, Reference::Side)
    }

    pub fn bottom_to_bottom_side() -> Self {
        Self::align(Anchor::Bottom, Anchor::Bottom, Reference::Side)
    }

    // ========================================================================
    // Fit
    // ========================================================================

    pub fn fit_edge(side: Side, reference: Reference) -> Self {
        Self::new(Rule::fit(side, reference))
    }

    pub fn fit_to_width() -> Self {
        Self::new(Rule::fit_to_width(Reference::Padding))
    }

    pub fn fit_to_height() -> Self {
        Self::new(Rule::fit_to_height(Reference::Padding))
    }

    pub fn fit() -> Self {
        Self::new(Rule::fit_all(Reference::Padding))
    }

    pub fn fit_to_sides() -> Self {
        Self::new(Rule::fit_all(Reference::Side))
    }

    pub fn fit_to_bleed() -> Self {
        Self::new(Rule::fit_all(Reference::Bleed))
    }

    pub fn scale_to_width() -> Self {
        Self::new(Rule::ScaleToWidth {
            reference: Reference::Padding,
        })
    }

    pub fn width(length: impl Into<Length>) -> Self {
        Self::new(Rule::Size {
            axis: Axis::X,
            length: length.into(),
        })
    }

    pub fn height(length: impl Into<Length>) -> Self {
        Self::new(Rule::Size {
            axis: Axis::Y,
            length: length.into(),
        })
    }

    // ========================================================================
    // Float
    // ========================================================================

    pub fn float(side: Side, reference: Reference) -> Self {
        Self::new(Rule::float(side, reference))
    }

    pub fn float_left() -> Self {
        Self::float(Side::Left, Reference::Padding)
    }

    pub fn float_right() -> Self {
        Self::float(Side::Right, Reference::Padding)
    }

    pub fn float_top() -> Self {
        Self::float(Side::Top, Reference::Padding)
    }

    pub fn float_bottom() -> Self {
        Self::float(Side::Bottom, Reference::Padding)
    }

    /// Float left, then up: fills rows left to right, top to bottom
    pub fn float_left_top() -> Self {
        Self::new(Rule::All(vec![
            Rule::float(Side::Left, Reference::Padding),
            Rule::float(Side::Top, Reference::Padding),
        ]))
    }

    pub fn overflow_to_next() -> Self {
        Self::new(Rule::OverflowToNext)
    }

    // ========================================================================
    // Grid
    // ========================================================================

    pub fn left_to_col(col: usize) -> Self {
        Self::new(Rule::Column {
            edge: Side::Left,
            col,
        })
    }

    pub fn right_to_col(col: usize) -> Self {
        Self::new(Rule::Column {
            edge: Side::Right,
            col,
        })
    }

    pub fn fit_to_col_span(col: usize, span: usize) -> Self {
        Self::new(Rule::ColumnSpan { col, span })
    }

    pub fn top_to_row(row: usize) -> Self {
        Self::new(Rule::Row {
            edge: Side::Top,
            row,
        })
    }

    pub fn bottom_to_row(row: usize) -> Self {
        Self::new(Rule::Row {
            edge: Side::Bottom,
            row,
        })
    }

    pub fn fit_to_row_span(row: usize, span: usize) -> Self {
        Self::new(Rule::RowSpan { row, span })
    }

    pub fn baseline(unit: f64, start: f64, rounding: Rounding, anchor: BaselineAnchor) -> Self {
        Self::new(Rule::Baseline {
            unit,
            start,
            rounding,
            anchor,
        })
    }

    pub fn baseline_to_grid(unit: f64) -> Self {
        Self::baseline(unit, 0.0, Rounding::Nearest, BaselineAnchor::FirstBaseline)
    }

    pub fn baseline_down_to_grid(unit: f64) -> Self {
        Self::baseline(unit, 0.0, Rounding::Down, BaselineAnchor::FirstBaseline)
    }

    pub fn baseline_up_to_grid(unit: f64) -> Self {
        Self::baseline(unit, 0.0, Rounding::Up, BaselineAnchor::FirstBaseline)
    }

    // ========================================================================
    // Block
    // ========================================================================

    pub fn shrink_to_block_width() -> Self {
        Self::new(Rule::Shrink { axis: Axis::X })
    }

    pub fn shrink_to_block_height() -> Self {
        Self::new(Rule::Shrink { axis: Axis::Y })
    }
}

impl From<Rule> for Condition {
    fn from(rule: Rule) -> Self {
        Condition::new(rule)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rule)
    }
}

impl std::str::FromStr for Condition {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Rule>().map(Condition::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::Element;
    use crate::layout::types::Sides;

    fn parent_with_child(child: Element) -> (Tree, ElementId, ElementId) {
        let mut tree = Tree::new();
        let root = tree.add_root(
            Element::named("page")
                .with_size(300.0, 400.0)
                .with_padding(Sides::uniform(Length::pt(12.0))),
        );
        let id = tree.add_child(root, child).unwrap();
        (tree, root, id)
    }

    #[test]
    fn test_defaults() {
        let c = Condition::left_to_left();
        assert_eq!(c.tolerance, 1.0);
        assert_eq!(c.value, 1.0);
        assert_eq!(c.error_factor, -10.0);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Condition::left_to_left().to_string(), "Left2Left");
        assert_eq!(Condition::right_to_right_side().to_string(), "Right2RightSide");
        assert_eq!(Condition::fit_to_width().to_string(), "Left2Left + Fit2Right");
        assert_eq!(Condition::left_to_col(2).to_string(), "Left2Col(2)");
        assert_eq!(
            Condition::baseline_down_to_grid(24.0).to_string(),
            "BaselineDown2Grid(24)"
        );
        assert_eq!(Condition::overflow_to_next().to_string(), "Overflow2Next");
    }

    #[test]
    fn test_check_rejects_mixed_axes() {
        let rule = Rule::align(Anchor::Left, Anchor::Top, Reference::Padding);
        assert!(rule.check().is_err());
        let origin_target = Rule::align(Anchor::Left, Anchor::OriginX, Reference::Padding);
        assert!(origin_target.check().is_err());
        assert!(Rule::align(Anchor::OriginY, Anchor::Top, Reference::Side).check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_parameters() {
        assert!(Rule::ColumnSpan { col: 0, span: 0 }.check().is_err());
        assert!(Condition::baseline_to_grid(0.0).rule.check().is_err());
        assert!(Rule::All(vec![]).check().is_err());
    }

    #[test]
    fn test_solve_satisfied_condition_is_noop() {
        let (mut tree, _, id) = parent_with_child(Element::new().with_position(12.0, 0.0).with_size(50.0, 50.0));
        let mut score = Score::new();
        let before = tree.frame(id);
        Condition::left_to_left().solve(&mut tree, id, &mut score);
        assert_eq!(tree.frame(id), before);
        assert_eq!(score.result, 0.0);
    }

    #[test]
    fn test_solve_records_value_on_success() {
        let (mut tree, _, id) = parent_with_child(Element::new().with_position(80.0, 0.0).with_size(50.0, 50.0));
        let mut score = Score::new();
        Condition::left_to_left().solve(&mut tree, id, &mut score);
        assert_eq!(tree.frame(id).unwrap().left(), 12.0);
        assert_eq!(score.result, 1.0);
    }

    #[test]
    fn test_solve_records_penalty_on_failure() {
        // Out-of-range column can never be satisfied
        let (mut tree, _, id) = parent_with_child(Element::new().with_size(50.0, 50.0).with_position(80.0, 0.0));
        let mut score = Score::new();
        Condition::left_to_col(5).solve(&mut tree, id, &mut score);
        assert_eq!(score.result, -10.0);
        assert_eq!(tree.frame(id).unwrap().left(), 80.0);
    }

    #[test]
    fn test_composite_solves_in_order() {
        let (mut tree, _, id) = parent_with_child(Element::new().with_position(40.0, 0.0).with_size(50.0, 50.0));
        let mut score = Score::new();
        let c = Condition::fit_to_width();
        c.solve(&mut tree, id, &mut score);
        let f = tree.frame(id).unwrap();
        assert_eq!(f.left(), 12.0);
        assert_eq!(f.w, 276.0);
        assert!(c.test(&tree, id));
    }

    #[test]
    fn test_requires_parent() {
        assert!(Condition::left_to_left().rule.requires_parent());
        assert!(!Condition::baseline_to_grid(12.0).rule.requires_parent());
        assert!(!Condition::shrink_to_block_height().rule.requires_parent());
        assert!(Condition::overflow_to_next().rule.is_overflow());
    }
}
