use std::ops::Range;

use crate::core::series_options::{LineStyle, LineType};
use crate::core::types::{TimePointIndex, VisibleRange};
use crate::render::PaneRenderer;
use crate::render::draw_line::set_line_style;
use crate::render::geometry::{Point, segment_intersection};
use crate::render::line_renderer::draw_tick;
use crate::render::surface::{DrawingSurface, LineCap, LineJoin};
use crate::render::walk_line::{PathPoint, walk_colored_line, walk_line};

/// One projected band sample.
///
/// `high_y` and `close_y` are the two tracks bounding the fills; `low_y`
/// carries the middle line. Only the row's `middle_color` override is drawn;
/// its top, bottom and background overrides stay in the plot-row store.
#[derive(Debug, Clone, PartialEq)]
pub struct DominatingItem {
    pub time: TimePointIndex,
    pub x: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub close_y: f64,
    pub middle_color: Option<String>,
}

impl DominatingItem {
    fn high(&self) -> Point {
        Point::new(self.x, self.high_y)
    }

    fn close(&self) -> Point {
        Point::new(self.x, self.close_y)
    }
}

/// Middle-line view of an item for the colored walker.
struct MiddlePoint<'a>(&'a DominatingItem);

impl PathPoint for MiddlePoint<'_> {
    fn x(&self) -> f64 {
        self.0.x
    }

    fn y(&self) -> f64 {
        self.0.low_y
    }

    fn color(&self) -> Option<&str> {
        self.0.middle_color.as_deref()
    }
}

/// Crossing-aware envelopes of the two band tracks over a visible window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BandTracks {
    /// Visually upper envelope (smaller y) of the two tracks.
    pub upper: Vec<Point>,
    /// Visually lower envelope (larger y) of the two tracks.
    pub lower: Vec<Point>,
    /// Inserted intersection vertices, in order.
    pub crossings: Vec<Point>,
}

/// Builds both envelopes for `items[range]`.
///
/// Between consecutive samples whose track order flips, the intersection of
/// the two connecting segments is inserted into both envelopes so neither
/// fill polygon self-intersects. The first visible sample never looks at its
/// predecessor.
#[must_use]
pub fn band_tracks(items: &[DominatingItem], range: Range<usize>) -> BandTracks {
    let range = range.start..range.end.min(items.len());
    let mut tracks = BandTracks {
        upper: Vec::with_capacity(range.len() + 4),
        lower: Vec::with_capacity(range.len() + 4),
        crossings: Vec::new(),
    };
    for index in range.clone() {
        let curr = &items[index];
        if index > range.start {
            let prev = &items[index - 1];
            if let Some(crossing) =
                segment_intersection(prev.high(), curr.high(), prev.close(), curr.close())
            {
                tracks.upper.push(crossing);
                tracks.lower.push(crossing);
                tracks.crossings.push(crossing);
            }
        }
        tracks
            .upper
            .push(Point::new(curr.x, curr.high_y.min(curr.close_y)));
        tracks
            .lower
            .push(Point::new(curr.x, curr.high_y.max(curr.close_y)));
    }
    tracks
}

#[derive(Debug, Clone, PartialEq)]
pub struct DominatingRenderer {
    pub items: Vec<DominatingItem>,
    /// Visible window as positions into `items`.
    pub visible_range: Option<VisibleRange>,
    pub bar_width: f64,
    pub top_line_color: String,
    pub top_line_style: LineStyle,
    pub top_line_type: LineType,
    pub top_line_width: f64,
    pub middle_line_color: String,
    pub middle_line_style: LineStyle,
    pub middle_line_type: LineType,
    pub middle_line_width: f64,
    pub bottom_line_color: String,
    pub bottom_line_style: LineStyle,
    pub bottom_line_type: LineType,
    pub bottom_line_width: f64,
    /// Resolved fill between the upper envelope and the close track.
    pub top_background: String,
    /// Resolved fill between the lower envelope and the close track.
    pub bottom_background: String,
}

impl DominatingRenderer {
    fn fill_band(
        &self,
        surface: &mut dyn DrawingSurface,
        envelope: &[Point],
        line_type: LineType,
        range: Range<usize>,
        style: &str,
    ) {
        surface.begin_path();
        walk_line(surface, envelope, line_type, 0..envelope.len());
        for index in range.rev() {
            let item = &self.items[index];
            surface.line_to(item.x, item.close_y);
        }
        surface.close_path();
        surface.set_fill_style(style);
        surface.fill();
    }

    fn stroke_envelope(
        surface: &mut dyn DrawingSurface,
        envelope: &[Point],
        line_type: LineType,
        style: LineStyle,
        width: f64,
        color: &str,
    ) {
        set_line_style(surface, style, width);
        surface.set_stroke_style(color);
        surface.begin_path();
        walk_line(surface, envelope, line_type, 0..envelope.len());
        surface.stroke();
    }
}

impl PaneRenderer for DominatingRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(range) = self
            .visible_range
            .and_then(|range| range.clamp_to_len(self.items.len()))
        else {
            return;
        };

        surface.set_line_cap(LineCap::Butt);
        set_line_style(surface, self.middle_line_style, self.middle_line_width);
        surface.set_stroke_style(&self.middle_line_color);
        surface.set_line_join(LineJoin::Round);

        if range.len() == 1 {
            draw_tick(
                surface,
                &MiddlePoint(&self.items[range.start]),
                self.bar_width,
                &self.middle_line_color,
            );
            return;
        }

        let tracks = band_tracks(&self.items, range.clone());

        self.fill_band(
            surface,
            &tracks.upper,
            self.top_line_type,
            range.clone(),
            &self.top_background,
        );
        self.fill_band(
            surface,
            &tracks.lower,
            self.bottom_line_type,
            range.clone(),
            &self.bottom_background,
        );

        Self::stroke_envelope(
            surface,
            &tracks.upper,
            self.top_line_type,
            self.top_line_style,
            self.top_line_width,
            &self.top_line_color,
        );
        Self::stroke_envelope(
            surface,
            &tracks.lower,
            self.bottom_line_type,
            self.bottom_line_style,
            self.bottom_line_width,
            &self.bottom_line_color,
        );

        let middle: Vec<MiddlePoint<'_>> = self.items.iter().map(MiddlePoint).collect();
        set_line_style(surface, self.middle_line_style, self.middle_line_width);
        walk_colored_line(
            surface,
            &middle,
            self.middle_line_type,
            range,
            &self.middle_line_color,
        );
    }
}
