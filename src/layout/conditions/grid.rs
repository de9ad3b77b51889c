//! Column and row snapping against the parent's grid

use crate::layout::frame::Frame;
use crate::layout::tree::{ElementId, Tree};
use crate::layout::types::{Axis, Extent, Grid, Side};
use crate::layout::units::Base;

/// Track extents of `parent` along `axis`, as distances from its padding start
pub(crate) fn tracks(tree: &Tree, parent: ElementId, axis: Axis) -> Vec<Extent> {
    let (Some(element), Some(frame)) = (tree.get(parent), tree.frame(parent)) else {
        return Vec::new();
    };
    let font = tree.font_size(parent);
    let (grid, padded, gutter) = match axis {
        Axis::X => (
            &element.columns,
            frame.padded_width(),
            element.gutter.x.resolve(Base::new(Some(frame.w), font)),
        ),
        Axis::Y => (
            &element.rows,
            frame.padded_height(),
            element.gutter.y.resolve(Base::new(Some(frame.h), font)),
        ),
    };
    let base = Base::new(Some(padded), font);

    match grid {
        Grid::Tracks(tracks) => {
            let mut position = 0.0;
            tracks
                .iter()
                .map(|track| {
                    let size = track.size.resolve(base);
                    let extent = Extent::new(position, position + size);
                    position += size + track.gutter.resolve(base);
                    extent
                })
                .collect()
        }
        Grid::Even(count) => {
            let count = (*count).max(1);
            let size = ((padded - gutter * (count - 1) as f64) / count as f64).max(0.0);
            (0..count)
                .map(|i| {
                    let start = i as f64 * (size + gutter);
                    Extent::new(start, start + size)
                })
                .collect()
        }
    }
}

/// Column track `col` in the parent's x space
fn column(tree: &Tree, id: ElementId, col: usize) -> Option<(Frame, Extent)> {
    let parent = tree.parent(id)?;
    let parent_frame = tree.frame(parent)?;
    let track = *tracks(tree, parent, Axis::X).get(col)?;
    let offset = parent_frame.padding.left;
    Some((
        tree.frame(id)?,
        Extent::new(offset + track.min, offset + track.max),
    ))
}

/// Row track `row` as (top line, bottom line) in the element's convention
fn row(tree: &Tree, id: ElementId, row: usize) -> Option<(Frame, f64, f64)> {
    let parent = tree.parent(id)?;
    let parent_frame = tree.frame(parent)?;
    let frame = tree.frame(id)?;
    let track = *tracks(tree, parent, Axis::Y).get(row)?;
    let start = parent_frame.padding.top;
    let line = |d: f64| {
        if frame.origin_top {
            start + d
        } else {
            parent_frame.h - start - d
        }
    };
    Some((frame, line(track.min), line(track.max)))
}

pub(super) fn test_column(tree: &Tree, id: ElementId, edge: Side, col: usize, tolerance: f64) -> bool {
    let Some((frame, track)) = column(tree, id, col) else {
        return false;
    };
    match edge {
        Side::Right => (frame.right() - track.max).abs() <= tolerance,
        _ => (frame.left() - track.min).abs() <= tolerance,
    }
}

pub(super) fn apply_column(tree: &mut Tree, id: ElementId, edge: Side, col: usize) {
    let Some((mut frame, track)) = column(tree, id, col) else {
        return;
    };
    match edge {
        Side::Right => frame.set_right(track.max),
        _ => frame.set_left(track.min),
    }
    tree.set_frame(id, &frame);
}

fn column_span(tree: &Tree, id: ElementId, col: usize, span: usize) -> Option<(Frame, f64, f64)> {
    let (frame, first) = column(tree, id, col)?;
    let (_, last) = column(tree, id, col + span.max(1) - 1)?;
    Some((frame, first.min, last.max))
}

pub(super) fn test_column_span(tree: &Tree, id: ElementId, col: usize, span: usize, tolerance: f64) -> bool {
    let Some((frame, min, max)) = column_span(tree, id, col, span) else {
        return false;
    };
    (frame.left() - min).abs() <= tolerance && (frame.right() - max).abs() <= tolerance
}

pub(super) fn apply_column_span(tree: &mut Tree, id: ElementId, col: usize, span: usize) {
    if let Some((mut frame, min, max)) = column_span(tree, id, col, span) {
        frame.set_x_extent(min, max);
        tree.set_frame(id, &frame);
    }
}

pub(super) fn test_row(tree: &Tree, id: ElementId, edge: Side, index: usize, tolerance: f64) -> bool {
    let Some((frame, top, bottom)) = row(tree, id, index) else {
        return false;
    };
    match edge {
        Side::Bottom => (frame.bottom() - bottom).abs() <= tolerance,
        _ => (frame.top() - top).abs() <= tolerance,
    }
}

pub(super) fn apply_row(tree: &mut Tree, id: ElementId, edge: Side, index: usize) {
    let Some((mut frame, top, bottom)) = row(tree, id, index) else {
        return;
    };
    match edge {
        Side::Bottom => frame.set_bottom(bottom),
        _ => frame.set_top(top),
    }
    tree.set_frame(id, &frame);
}

fn row_span(tree: &Tree, id: ElementId, index: usize, span: usize) -> Option<(Frame, f64, f64)> {
    let (frame, top, _) = row(tree, id, index)?;
    let (_, _, bottom) = row(tree, id, index + span.max(1) - 1)?;
    Some((frame, top, bottom))
}

pub(super) fn test_row_span(tree: &Tree, id: ElementId, index: usize, span: usize, tolerance: f64) -> bool {
    let Some((frame, top, bottom)) = row_span(tree, id, index, span) else {
        return false;
    };
    (frame.top() - top).abs() <= tolerance && (frame.bottom() - bottom).abs() <= tolerance
}

pub(super) fn apply_row_span(tree: &mut Tree, id: ElementId, index: usize, span: usize) {
    let Some((mut frame, top, bottom)) = row_span(tree, id, index, span) else {
        return;
    };
    if frame.origin_top {
        frame.set_y_extent(top, bottom);
    } else {
        frame.set_y_extent(bottom, top);
    }
    tree.set_frame(id, &frame);
}
