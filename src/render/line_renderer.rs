use std::ops::Range;

use crate::core::series_options::{LineStyle, LineType};
use crate::core::types::{TimePointIndex, VisibleRange};
use crate::render::PaneRenderer;
use crate::render::draw_line::set_line_style;
use crate::render::surface::{DrawingSurface, LineCap, LineJoin};
use crate::render::walk_line::{PathPoint, walk_colored_line};

/// One projected row of a line-like series.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub time: TimePointIndex,
    pub price: f64,
    pub x: f64,
    pub y: f64,
    pub color: Option<String>,
    pub background: Option<String>,
}

impl PathPoint for LineItem {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRenderer {
    pub items: Vec<LineItem>,
    /// Visible window as positions into `items`.
    pub visible_range: Option<VisibleRange>,
    pub line_type: LineType,
    pub line_style: LineStyle,
    pub line_width: f64,
    pub line_color: String,
    pub bar_width: f64,
    /// Pane height; background rectangles span all of it.
    pub height: f64,
}

impl LineRenderer {
    fn visible_positions(&self) -> Option<Range<usize>> {
        self.visible_range?.clamp_to_len(self.items.len())
    }

    fn draw_backgrounds(&self, surface: &mut dyn DrawingSurface, range: Range<usize>) {
        for index in range {
            let item = &self.items[index];
            let (Some(background), Some(next)) = (&item.background, self.items.get(index + 1))
            else {
                continue;
            };
            surface.set_fill_style(background);
            surface.fill_rect(item.x, 0.0, (next.x - item.x).abs(), self.height);
        }
    }
}

impl PaneRenderer for LineRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(range) = self.visible_positions() else {
            return;
        };

        surface.set_line_cap(LineCap::Butt);
        set_line_style(surface, self.line_style, self.line_width);
        surface.set_stroke_style(&self.line_color);
        surface.set_line_join(LineJoin::Round);

        if range.len() == 1 {
            draw_tick(
                surface,
                &self.items[range.start],
                self.bar_width,
                &self.line_color,
            );
            return;
        }

        self.draw_backgrounds(surface, range.clone());
        walk_colored_line(surface, &self.items, self.line_type, range, &self.line_color);
    }
}

/// Short horizontal stroke centred on `point`, used when a single item is
/// visible.
pub(crate) fn draw_tick<P: PathPoint>(
    surface: &mut dyn DrawingSurface,
    point: &P,
    bar_width: f64,
    default_color: &str,
) {
    surface.begin_path();
    surface.move_to(point.x() - bar_width / 2.0, point.y());
    surface.line_to(point.x() + bar_width / 2.0, point.y());
    surface.set_stroke_style(point.color().unwrap_or(default_color));
    surface.stroke();
}
