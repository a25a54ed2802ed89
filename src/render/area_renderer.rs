use std::ops::Range;

use crate::core::series_options::{LineStyle, LineType};
use crate::core::types::VisibleRange;
use crate::render::PaneRenderer;
use crate::render::draw_line::set_line_style;
use crate::render::geometry::{Point, segment_intersection};
use crate::render::line_renderer::{LineItem, draw_tick};
use crate::render::surface::{DrawingSurface, LineCap, LineJoin};
use crate::render::walk_line::{PathPoint, continue_line, walk_colored_line};

/// Line series with the region below the line filled down to `bottom`.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRenderer {
    pub items: Vec<LineItem>,
    pub visible_range: Option<VisibleRange>,
    pub line_type: LineType,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub line_color: String,
    pub fill_color: String,
    pub bar_width: f64,
    /// Pixel Y the fill closes to, usually the pane height.
    pub bottom: f64,
}

impl PaneRenderer for AreaRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(range) = self
            .visible_range
            .and_then(|range| range.clamp_to_len(self.items.len()))
        else {
            return;
        };

        surface.set_line_cap(LineCap::Butt);
        surface.set_line_join(LineJoin::Round);
        set_line_style(surface, self.line_style, self.line_width);

        if range.len() == 1 {
            draw_tick(
                surface,
                &self.items[range.start],
                self.bar_width,
                &self.line_color,
            );
            return;
        }

        let first = &self.items[range.start];
        let last = &self.items[range.end - 1];
        surface.begin_path();
        surface.move_to(first.x, self.bottom);
        continue_line(surface, &self.items, self.line_type, range.clone());
        surface.line_to(last.x, self.bottom);
        surface.close_path();
        surface.set_fill_style(&self.fill_color);
        surface.fill();

        walk_colored_line(surface, &self.items, self.line_type, range, &self.line_color);
    }
}

/// Vertex of a baseline stroke tinted by the side of the base it leads into.
struct TintedPoint<'a> {
    point: Point,
    color: &'a str,
}

impl PathPoint for TintedPoint<'_> {
    fn x(&self) -> f64 {
        self.point.x
    }

    fn y(&self) -> f64 {
        self.point.y
    }

    fn color(&self) -> Option<&str> {
        Some(self.color)
    }
}

/// Line series split into two colored regions around a base price.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineRenderer {
    pub items: Vec<LineItem>,
    pub visible_range: Option<VisibleRange>,
    /// Pixel Y of the base price.
    pub base_y: f64,
    pub line_type: LineType,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub top_line_color: String,
    pub bottom_line_color: String,
    pub top_fill_color: String,
    pub bottom_fill_color: String,
    pub bar_width: f64,
}

impl BaselineRenderer {
    /// Visible points with a vertex inserted wherever the line crosses the
    /// base.
    fn split_points(&self, range: Range<usize>) -> Vec<Point> {
        let mut points = Vec::with_capacity(range.len() * 2);
        for index in range.clone() {
            let curr = &self.items[index];
            if index > range.start {
                let prev = &self.items[index - 1];
                if let Some(crossing) = segment_intersection(
                    prev.point(),
                    curr.point(),
                    Point::new(prev.x, self.base_y),
                    Point::new(curr.x, self.base_y),
                ) {
                    points.push(crossing);
                }
            }
            points.push(curr.point());
        }
        points
    }

    fn side_color<'a>(&'a self, y: f64, top: &'a str, bottom: &'a str) -> &'a str {
        if y <= self.base_y { top } else { bottom }
    }

    fn fill_side(
        &self,
        surface: &mut dyn DrawingSurface,
        points: &[Point],
        clamp: fn(f64, f64) -> f64,
        style: &str,
    ) {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };
        surface.begin_path();
        surface.move_to(first.x, self.base_y);
        for point in points {
            surface.line_to(point.x, clamp(point.y, self.base_y));
        }
        surface.line_to(last.x, self.base_y);
        surface.close_path();
        surface.set_fill_style(style);
        surface.fill();
    }
}

impl PaneRenderer for BaselineRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(range) = self
            .visible_range
            .and_then(|range| range.clamp_to_len(self.items.len()))
        else {
            return;
        };

        surface.set_line_cap(LineCap::Butt);
        surface.set_line_join(LineJoin::Round);
        set_line_style(surface, self.line_style, self.line_width);

        if range.len() == 1 {
            let item = &self.items[range.start];
            let color = self.side_color(item.y, &self.top_line_color, &self.bottom_line_color);
            draw_tick(surface, item, self.bar_width, color);
            return;
        }

        let points = self.split_points(range);
        self.fill_side(surface, &points, f64::min, &self.top_fill_color);
        self.fill_side(surface, &points, f64::max, &self.bottom_fill_color);

        let tinted: Vec<TintedPoint<'_>> = points
            .iter()
            .enumerate()
            .map(|(position, point)| {
                let lead_y = points
                    .get(position + 1)
                    .map_or(point.y, |next| (point.y + next.y) / 2.0);
                TintedPoint {
                    point: *point,
                    color: self.side_color(lead_y, &self.top_line_color, &self.bottom_line_color),
                }
            })
            .collect();
        walk_colored_line(
            surface,
            &tinted,
            self.line_type,
            0..tinted.len(),
            &self.top_line_color,
        );
    }
}
