use crate::core::types::{TimePointIndex, VisibleRange};
use crate::render::PaneRenderer;
use crate::render::surface::DrawingSurface;

#[derive(Debug, Clone, PartialEq)]
pub struct BarItem {
    pub time: TimePointIndex,
    pub x: f64,
    pub open_y: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub close_y: f64,
    pub color: String,
}

/// OHLC bars: a high-low stem with an open tick on the left and a close
/// tick on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct BarsRenderer {
    pub items: Vec<BarItem>,
    pub visible_range: Option<VisibleRange>,
    pub bar_spacing: f64,
    pub open_visible: bool,
    pub thin_bars: bool,
}

impl BarsRenderer {
    #[must_use]
    pub fn stem_width(&self) -> f64 {
        if self.thin_bars {
            1.0
        } else {
            (self.bar_spacing * 0.3).floor().max(1.0)
        }
    }
}

impl PaneRenderer for BarsRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(range) = self
            .visible_range
            .and_then(|range| range.clamp_to_len(self.items.len()))
        else {
            return;
        };
        let width = self.stem_width();
        let half = (width / 2.0).floor();
        let tick = ((self.bar_spacing / 2.0).floor() - half).max(1.0);

        for item in &self.items[range] {
            let left = item.x - half;
            // high sits below low on an inverted scale
            let top = item.high_y.min(item.low_y);
            let bottom = item.high_y.max(item.low_y);
            surface.set_fill_style(&item.color);
            surface.fill_rect(left, top, width, (bottom - top).max(1.0));
            if self.open_visible {
                surface.fill_rect(left - tick, item.open_y - half, tick, width);
            }
            surface.fill_rect(left + width, item.close_y - half, tick, width);
        }
    }
}
