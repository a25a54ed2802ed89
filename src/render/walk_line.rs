use std::ops::Range;

use crate::core::series_options::LineType;
use crate::render::Point;
use crate::render::surface::DrawingSurface;

/// Divisor applied to neighbour deltas when deriving curve control points.
const CURVE_TENSION: f64 = 6.0;

/// Device-space vertex the line walker can follow.
pub trait PathPoint {
    fn x(&self) -> f64;
    fn y(&self) -> f64;

    /// Stroke color override for the segment starting at this point.
    fn color(&self) -> Option<&str> {
        None
    }

    fn point(&self) -> Point {
        Point::new(self.x(), self.y())
    }
}

impl PathPoint for Point {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// Appends the path through `items[range]` to the current path.
///
/// Starts with a `move_to` on the first visible point. Does not begin or
/// stroke the path, so callers can close it into a fill polygon.
pub fn walk_line<P: PathPoint>(
    surface: &mut dyn DrawingSurface,
    items: &[P],
    line_type: LineType,
    range: Range<usize>,
) {
    let range = range.start..range.end.min(items.len());
    if range.is_empty() {
        return;
    }
    let first = &items[range.start];
    surface.move_to(first.x(), first.y());
    for index in range.start + 1..range.end {
        segment_to(surface, items, line_type, index);
    }
}

/// Same as [`walk_line`] but continues an existing path from the first
/// visible point with a `line_to` instead of a `move_to`.
pub fn continue_line<P: PathPoint>(
    surface: &mut dyn DrawingSurface,
    items: &[P],
    line_type: LineType,
    range: Range<usize>,
) {
    let range = range.start..range.end.min(items.len());
    if range.is_empty() {
        return;
    }
    let first = &items[range.start];
    surface.line_to(first.x(), first.y());
    for index in range.start + 1..range.end {
        segment_to(surface, items, line_type, index);
    }
}

/// Strokes `items[range]`, switching stroke color wherever a point's color
/// differs from the active one.
///
/// A color switch ends the current stroke at the switching coordinate and
/// starts the next one from that same coordinate. In stepped mode the switch
/// happens at the step corner, so the vertical riser takes the new color.
pub fn walk_colored_line<P: PathPoint>(
    surface: &mut dyn DrawingSurface,
    items: &[P],
    line_type: LineType,
    range: Range<usize>,
    default_color: &str,
) {
    let range = range.start..range.end.min(items.len());
    if range.is_empty() {
        return;
    }

    let first = &items[range.start];
    let mut active = first.color().unwrap_or(default_color);
    surface.set_stroke_style(active);
    surface.begin_path();
    surface.move_to(first.x(), first.y());

    for index in range.start + 1..range.end {
        let prev = &items[index - 1];
        let curr = &items[index];
        let color = curr.color().unwrap_or(default_color);

        if line_type == LineType::Stepped {
            surface.line_to(curr.x(), prev.y());
            if color != active {
                surface.stroke();
                surface.begin_path();
                surface.set_stroke_style(color);
                active = color;
                surface.move_to(curr.x(), prev.y());
            }
            surface.line_to(curr.x(), curr.y());
            continue;
        }

        segment_to(surface, items, line_type, index);
        if color != active {
            surface.stroke();
            surface.begin_path();
            surface.set_stroke_style(color);
            active = color;
            surface.move_to(curr.x(), curr.y());
        }
    }

    surface.stroke();
}

/// Emits the segment from `items[index - 1]` to `items[index]`.
fn segment_to<P: PathPoint>(
    surface: &mut dyn DrawingSurface,
    items: &[P],
    line_type: LineType,
    index: usize,
) {
    let prev = &items[index - 1];
    let curr = &items[index];
    match line_type {
        LineType::Straight => surface.line_to(curr.x(), curr.y()),
        LineType::Stepped => {
            surface.line_to(curr.x(), prev.y());
            surface.line_to(curr.x(), curr.y());
        }
        LineType::Curved => {
            let (cp1, cp2) = control_points(items, index - 1, index);
            surface.bezier_curve_to(cp1.x, cp1.y, cp2.x, cp2.y, curr.x(), curr.y());
        }
    }
}

/// Cubic control points for the segment `from -> to`.
///
/// Tangents come from the neighbours on either side; a neighbour past the
/// end of `items` is replaced by the nearest endpoint.
#[must_use]
pub fn control_points<P: PathPoint>(items: &[P], from: usize, to: usize) -> (Point, Point) {
    let last = items.len().saturating_sub(1);
    let before = items[from.saturating_sub(1)].point();
    let after = items[(to + 1).min(last)].point();
    let p_from = items[from].point();
    let p_to = items[to].point();

    let cp1 = p_from + (p_to - before) / CURVE_TENSION;
    let cp2 = p_to - (after - p_from) / CURVE_TENSION;
    (cp1, cp2)
}
