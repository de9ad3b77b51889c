//! Core geometry types for the layout solver

use serde::Deserialize;

use super::units::{Base, Length};

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A bounding box in absolute, top-down coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this bounding box intersects another (touching edges do not count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Check if `other` lies within this box, allowing `slack` on every side
    pub fn encloses(&self, other: &BoundingBox, slack: f64) -> bool {
        other.x >= self.x - slack
            && other.right() <= self.right() + slack
            && other.y >= self.y - slack
            && other.bottom() <= self.bottom() + slack
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// A closed interval along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn len(&self) -> f64 {
        self.max - self.min
    }

    pub fn mid(&self) -> f64 {
        self.min + self.len() / 2.0
    }

    /// Strict overlap: extents that only touch do not overlap
    pub fn overlaps(&self, other: &Extent) -> bool {
        self.min < other.max && other.min < self.max
    }

    pub fn contains(&self, other: &Extent, tolerance: f64) -> bool {
        other.min >= self.min - tolerance && other.max <= self.max + tolerance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn cross(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Where the origin sits within the element's box along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Min,
    Center,
    Max,
}

impl Align {
    /// Fraction of the size between the low edge and the origin
    pub fn factor(self) -> f64 {
        match self {
            Align::Min => 0.0,
            Align::Center => 0.5,
            Align::Max => 1.0,
        }
    }
}

/// One of the four sides of a box, in the element's own y convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::X,
            Side::Top | Side::Bottom => Axis::Y,
        }
    }

    /// Whether the side lies at the numerically low end of its axis
    pub fn is_low(self, origin_top: bool) -> bool {
        match self {
            Side::Left => true,
            Side::Right => false,
            Side::Top => origin_top,
            Side::Bottom => !origin_top,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
            Side::Top => "Top",
            Side::Bottom => "Bottom",
        }
    }
}

/// Which set of parent lines a condition measures against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Reference {
    /// The parent's padded box
    #[default]
    Padding,
    /// The parent's physical edges
    Side,
    /// The parent's edges pushed outward by its bleed
    Bleed,
}

impl Reference {
    pub fn suffix(self) -> &'static str {
        match self {
            Reference::Padding => "",
            Reference::Side => "Side",
            Reference::Bleed => "Bleed",
        }
    }
}

/// Four-sided spacing (padding, margin, bleed) with an optional depth component
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
    pub depth: Option<Length>,
}

impl Sides {
    pub fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
            depth: None,
        }
    }

    pub fn uniform(value: Length) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn with_depth(mut self, depth: Length) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Resolve against the owner's width (left/right) and height (top/bottom)
    pub fn resolve(&self, width: f64, height: f64, font_size: Option<f64>) -> Edges {
        let horizontal = Base::new(Some(width), font_size);
        let vertical = Base::new(Some(height), font_size);
        Edges {
            top: self.top.resolve(vertical),
            right: self.right.resolve(horizontal),
            bottom: self.bottom.resolve(vertical),
            left: self.left.resolve(horizontal),
        }
    }
}

/// Resolved four-sided spacing in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn to_sides(self) -> Sides {
        Sides::new(
            Length::Pt(self.top),
            Length::Pt(self.right),
            Length::Pt(self.bottom),
            Length::Pt(self.left),
        )
    }
}

/// Spacing between grid tracks per axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Gutter {
    pub x: Length,
    pub y: Length,
    pub z: Length,
}

impl Gutter {
    pub fn uniform(value: Length) -> Self {
        Self {
            x: value,
            y: value,
            z: value,
        }
    }
}

/// A single grid track: its size and the gutter that follows it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub size: Length,
    pub gutter: Length,
}

impl Track {
    pub fn new(size: Length, gutter: Length) -> Self {
        Self { size, gutter }
    }
}

/// Most columns or rows a grid may declare
pub const MAX_TRACKS: usize = 1024;

/// Column or row layout of an element's padded box
#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    /// Explicit `(size, gutter)` tracks laid out from the padding start
    Tracks(Vec<Track>),
    /// An even split of the padded box, separated by the element's gutter
    Even(usize),
}

impl Default for Grid {
    fn default() -> Self {
        Grid::Even(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_intersection_is_strict() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let touching = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = BoundingBox::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
    }

    #[test]
    fn test_bounding_box_union_and_encloses() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 5.0, 5.0, 20.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(0.0, 0.0, 25.0, 25.0));
        assert!(u.encloses(&a, 0.0));
        assert!(!a.encloses(&b, 0.0));
    }

    #[test]
    fn test_extent_overlap_excludes_touching() {
        let a = Extent::new(0.0, 10.0);
        assert!(!a.overlaps(&Extent::new(10.0, 20.0)));
        assert!(a.overlaps(&Extent::new(9.5, 20.0)));
        assert_eq!(a.mid(), 5.0);
    }

    #[test]
    fn test_side_is_low_depends_on_origin() {
        assert!(Side::Top.is_low(true));
        assert!(!Side::Top.is_low(false));
        assert!(Side::Bottom.is_low(false));
        assert!(Side::Left.is_low(false));
    }

    #[test]
    fn test_sides_resolve_against_own_size() {
        let sides = Sides::new(
            Length::percent(10.0),
            Length::pt(5.0),
            Length::ZERO,
            Length::percent(10.0),
        );
        let edges = sides.resolve(200.0, 50.0, None);
        assert_eq!(edges.left, 20.0);
        assert_eq!(edges.top, 5.0);
        assert_eq!(edges.right, 5.0);
    }
}
