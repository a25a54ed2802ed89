use crate::core::types::{TimePointIndex, VisibleRange};
use crate::render::PaneRenderer;
use crate::render::surface::DrawingSurface;

#[derive(Debug, Clone, PartialEq)]
pub struct CandlestickItem {
    pub time: TimePointIndex,
    pub x: f64,
    pub open_y: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub close_y: f64,
    pub color: String,
    pub border_color: String,
    pub wick_color: String,
}

/// Candles drawn in three passes: wicks, borders, bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct CandlesticksRenderer {
    pub items: Vec<CandlestickItem>,
    pub visible_range: Option<VisibleRange>,
    pub bar_spacing: f64,
    pub wick_visible: bool,
    pub border_visible: bool,
}

impl CandlesticksRenderer {
    #[must_use]
    pub fn body_width(&self) -> f64 {
        (self.bar_spacing * 0.8).floor().max(1.0)
    }

    fn draw_wicks(&self, surface: &mut dyn DrawingSurface, items: &[CandlestickItem]) {
        for item in items {
            let top = item.high_y.min(item.low_y);
            let bottom = item.high_y.max(item.low_y);
            surface.set_fill_style(&item.wick_color);
            surface.fill_rect(item.x, top, 1.0, (bottom - top).max(1.0));
        }
    }

    fn draw_bodies(&self, surface: &mut dyn DrawingSurface, items: &[CandlestickItem]) {
        let width = self.body_width();
        let half = (width / 2.0).floor();
        let inset = if self.border_visible && width > 2.0 {
            1.0
        } else {
            0.0
        };
        for item in items {
            let top = item.open_y.min(item.close_y);
            let bottom = item.open_y.max(item.close_y);
            let left = item.x - half;
            if self.border_visible {
                surface.set_fill_style(&item.border_color);
                surface.fill_rect(left, top, width, (bottom - top).max(1.0));
                if inset == 0.0 || bottom - top <= 2.0 * inset {
                    continue;
                }
            }
            surface.set_fill_style(&item.color);
            surface.fill_rect(
                left + inset,
                top + inset,
                width - 2.0 * inset,
                (bottom - top - 2.0 * inset).max(1.0),
            );
        }
    }
}

impl PaneRenderer for CandlesticksRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(range) = self
            .visible_range
            .and_then(|range| range.clamp_to_len(self.items.len()))
        else {
            return;
        };
        let visible = &self.items[range];
        if self.wick_visible {
            self.draw_wicks(surface, visible);
        }
        self.draw_bodies(surface, visible);
    }
}
