//! Resolved element geometry
//!
//! A [`Frame`] is an element's geometry resolved to points in its parent's
//! local space. Conditions read and write frames; the tree writes a mutated
//! frame back onto the element as absolute lengths.
//!
//! Horizontal coordinates grow to the right. Vertical coordinates are plain
//! numbers whose meaning depends on `origin_top`: with `origin_top` the top
//! edge sits at the low end of the y range, otherwise at the high end. Edge
//! helpers (`top`, `bottom`, `set_top`, ...) hide that difference.

use super::types::{Align, Axis, BoundingBox, Edges, Extent, Reference};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
    pub h: f64,
    pub padding: Edges,
    pub margin: Edges,
    pub bleed: Edges,
    pub x_align: Align,
    pub y_align: Align,
    pub origin_top: bool,
    /// Distance from the top edge to the first baseline
    pub baseline: f64,
}

impl Frame {
    // ========================================================================
    // Edges
    // ========================================================================

    pub fn left(&self) -> f64 {
        self.x - self.w * self.x_align.factor()
    }

    pub fn right(&self) -> f64 {
        self.left() + self.w
    }

    pub fn center(&self) -> f64 {
        self.left() + self.w / 2.0
    }

    /// Numerically lowest y of the box
    pub fn y_min(&self) -> f64 {
        self.y - self.h * self.y_align.factor()
    }

    pub fn y_max(&self) -> f64 {
        self.y_min() + self.h
    }

    pub fn middle(&self) -> f64 {
        self.y_min() + self.h / 2.0
    }

    pub fn top(&self) -> f64 {
        if self.origin_top {
            self.y_min()
        } else {
            self.y_max()
        }
    }

    pub fn bottom(&self) -> f64 {
        if self.origin_top {
            self.y_max()
        } else {
            self.y_min()
        }
    }

    /// Position of the first baseline, measured from the top edge inward
    pub fn first_baseline(&self) -> f64 {
        if self.origin_top {
            self.top() + self.baseline
        } else {
            self.top() - self.baseline
        }
    }

    pub fn set_left(&mut self, value: f64) {
        self.x = value + self.w * self.x_align.factor();
    }

    pub fn set_right(&mut self, value: f64) {
        self.set_left(value - self.w);
    }

    pub fn set_center(&mut self, value: f64) {
        self.set_left(value - self.w / 2.0);
    }

    pub fn set_y_min(&mut self, value: f64) {
        self.y = value + self.h * self.y_align.factor();
    }

    pub fn set_y_max(&mut self, value: f64) {
        self.set_y_min(value - self.h);
    }

    pub fn set_middle(&mut self, value: f64) {
        self.set_y_min(value - self.h / 2.0);
    }

    pub fn set_top(&mut self, value: f64) {
        if self.origin_top {
            self.set_y_min(value)
        } else {
            self.set_y_max(value)
        }
    }

    pub fn set_bottom(&mut self, value: f64) {
        if self.origin_top {
            self.set_y_max(value)
        } else {
            self.set_y_min(value)
        }
    }

    /// Change the width, keeping the left edge
    pub fn set_width(&mut self, w: f64) {
        let left = self.left();
        self.w = w.max(0.0);
        self.set_left(left);
    }

    /// Change the height, keeping the low y edge
    pub fn set_height(&mut self, h: f64) {
        let y_min = self.y_min();
        self.h = h.max(0.0);
        self.set_y_min(y_min);
    }

    /// Span the box between two x coordinates. Width clamps at zero.
    pub fn set_x_extent(&mut self, min: f64, max: f64) {
        self.w = (max - min).max(0.0);
        self.set_left(min);
    }

    /// Span the box between two y coordinates. Height clamps at zero.
    pub fn set_y_extent(&mut self, min: f64, max: f64) {
        self.h = (max - min).max(0.0);
        self.set_y_min(min);
    }

    pub fn extent(&self, axis: Axis) -> Extent {
        match axis {
            Axis::X => Extent::new(self.left(), self.right()),
            Axis::Y => Extent::new(self.y_min(), self.y_max()),
        }
    }

    // ========================================================================
    // Margin box
    // ========================================================================

    /// Margin on the numerically low side of the y range
    fn margin_y_low(&self) -> f64 {
        if self.origin_top {
            self.margin.top
        } else {
            self.margin.bottom
        }
    }

    fn margin_y_high(&self) -> f64 {
        if self.origin_top {
            self.margin.bottom
        } else {
            self.margin.top
        }
    }

    /// The box grown by the element's margin
    pub fn margin_extent(&self, axis: Axis) -> Extent {
        match axis {
            Axis::X => Extent::new(
                self.left() - self.margin.left,
                self.right() + self.margin.right,
            ),
            Axis::Y => Extent::new(
                self.y_min() - self.margin_y_low(),
                self.y_max() + self.margin_y_high(),
            ),
        }
    }

    /// Move the box so the low end of its margin box sits at `value`
    pub fn set_margin_min(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.set_left(value + self.margin.left),
            Axis::Y => self.set_y_min(value + self.margin_y_low()),
        }
    }

    /// Move the box so the high end of its margin box sits at `value`
    pub fn set_margin_max(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.set_right(value - self.margin.right),
            Axis::Y => self.set_y_max(value - self.margin_y_high()),
        }
    }

    // ========================================================================
    // Lines offered to children
    // ========================================================================

    pub fn padded_width(&self) -> f64 {
        self.w - self.padding.left - self.padding.right
    }

    pub fn padded_height(&self) -> f64 {
        self.h - self.padding.top - self.padding.bottom
    }

    /// Reference lines in this frame's local space, expressed in a child's
    /// y convention
    pub fn reference_extent(&self, reference: Reference, axis: Axis, child_origin_top: bool) -> Extent {
        match axis {
            Axis::X => match reference {
                Reference::Padding => Extent::new(self.padding.left, self.w - self.padding.right),
                Reference::Side => Extent::new(0.0, self.w),
                Reference::Bleed => Extent::new(-self.bleed.left, self.w + self.bleed.right),
            },
            Axis::Y => {
                let (low, high) = match reference {
                    Reference::Padding => (self.padding.top, self.padding.bottom),
                    Reference::Side => (0.0, 0.0),
                    Reference::Bleed => (-self.bleed.top, -self.bleed.bottom),
                };
                if child_origin_top {
                    Extent::new(low, self.h - high)
                } else {
                    Extent::new(high, self.h - low)
                }
            }
        }
    }

    /// Margin extent seen from a sibling using the `origin_top` convention,
    /// inside a parent `parent_h` tall
    pub fn margin_extent_as(&self, axis: Axis, origin_top: bool, parent_h: f64) -> Extent {
        let m = self.margin_extent(axis);
        if axis == Axis::X || self.origin_top == origin_top {
            m
        } else {
            Extent::new(parent_h - m.max, parent_h - m.min)
        }
    }

    /// The box in the parent's top-down local space
    pub fn top_down_box(&self, parent_h: f64) -> BoundingBox {
        let top = if self.origin_top {
            self.y_min()
        } else {
            parent_h - self.y_max()
        };
        BoundingBox::new(self.left(), top, self.w, self.h)
    }
}
