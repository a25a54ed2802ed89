mod area_renderer;
mod bars_renderer;
mod candlesticks_renderer;
mod color;
mod dominating_renderer;
mod draw_line;
mod geometry;
mod histogram_renderer;
mod line_renderer;
mod surface;
mod walk_line;

pub use area_renderer::{AreaRenderer, BaselineRenderer};
pub use bars_renderer::{BarItem, BarsRenderer};
pub use candlesticks_renderer::{CandlestickItem, CandlesticksRenderer};
pub use color::Color;
pub use dominating_renderer::{BandTracks, DominatingItem, DominatingRenderer, band_tracks};
pub use draw_line::{line_dash_pattern, set_line_style};
pub use geometry::{Point, segment_intersection};
pub use histogram_renderer::{HistogramItem, HistogramRenderer};
pub use line_renderer::{LineItem, LineRenderer};
pub use surface::{
    DrawCommand, DrawingSurface, LineCap, LineJoin, PathOp, RecordedPath, RecordedRect,
    RecordingSurface,
};
pub use walk_line::{PathPoint, continue_line, control_points, walk_colored_line, walk_line};

/// Contract implemented by every series renderer.
///
/// Renderers receive fully projected items, so drawing stays isolated from
/// storage and scale state. `draw` is idempotent and may run every frame.
pub trait PaneRenderer {
    fn draw(&self, surface: &mut dyn DrawingSurface);
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::CairoSurface;
