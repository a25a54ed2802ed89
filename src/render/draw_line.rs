use smallvec::{SmallVec, smallvec};

use crate::core::series_options::LineStyle;
use crate::render::surface::DrawingSurface;

/// Dash segments for `style` at `width`; empty means solid.
#[must_use]
pub fn line_dash_pattern(style: LineStyle, width: f64) -> SmallVec<[f64; 2]> {
    match style {
        LineStyle::Solid => SmallVec::new(),
        LineStyle::Dotted => smallvec![width, width],
        LineStyle::Dashed => smallvec![2.0 * width, 2.0 * width],
        LineStyle::LargeDashed => smallvec![6.0 * width, 6.0 * width],
        LineStyle::SparseDotted => smallvec![width, 4.0 * width],
    }
}

/// Applies width and dash pattern for one stroke pass.
pub fn set_line_style(surface: &mut dyn DrawingSurface, style: LineStyle, width: f64) {
    surface.set_line_width(width);
    surface.set_line_dash(&line_dash_pattern(style, width));
}
