use crate::core::types::{TimePointIndex, VisibleRange};
use crate::render::PaneRenderer;
use crate::render::surface::DrawingSurface;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramItem {
    pub time: TimePointIndex,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

/// Columns from the base line to each value.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramRenderer {
    pub items: Vec<HistogramItem>,
    pub visible_range: Option<VisibleRange>,
    pub bar_spacing: f64,
    /// Pixel Y of the histogram base price.
    pub base_y: f64,
}

impl HistogramRenderer {
    #[must_use]
    pub fn column_width(&self) -> f64 {
        let gap = if self.bar_spacing.ceil() <= 1.0 { 0.0 } else { 1.0 };
        (self.bar_spacing.round() - gap).max(1.0)
    }
}

impl PaneRenderer for HistogramRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface) {
        let Some(range) = self
            .visible_range
            .and_then(|range| range.clamp_to_len(self.items.len()))
        else {
            return;
        };
        let width = self.column_width();
        let half = (width / 2.0).floor();
        for item in &self.items[range] {
            let top = item.y.min(self.base_y);
            let bottom = item.y.max(self.base_y);
            surface.set_fill_style(&item.color);
            surface.fill_rect(item.x - half, top, width, (bottom - top).max(1.0));
        }
    }
}
