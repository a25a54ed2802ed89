use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use tracing::warn;

use crate::error::{ChartError, ChartResult};
use crate::render::Color;
use crate::render::surface::{DrawingSurface, LineCap, LineJoin};

/// [`DrawingSurface`] backed by a Cairo context.
///
/// Works either on an external context (for example a GTK `DrawingArea`
/// callback) or on an owned offscreen image surface.
#[derive(Debug)]
pub struct CairoSurface {
    context: Context,
    image: Option<ImageSurface>,
    stroke_color: Color,
    fill_color: Color,
}

impl CairoSurface {
    #[must_use]
    pub fn new(context: Context) -> Self {
        Self {
            context,
            image: None,
            stroke_color: Color::rgb(0.0, 0.0, 0.0),
            fill_color: Color::rgb(0.0, 0.0, 0.0),
        }
    }

    pub fn offscreen(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }
        let image = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&image)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        let mut surface = Self::new(context);
        surface.image = Some(image);
        Ok(surface)
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageSurface> {
        self.image.as_ref()
    }

    pub fn write_png<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        let image = self.image.as_ref().ok_or_else(|| {
            ChartError::InvalidData("cairo surface has no offscreen image".to_owned())
        })?;
        image
            .write_to_png(writer)
            .map_err(|err| ChartError::InvalidData(format!("failed to write png: {err}")))
    }

    fn apply_color(&self, color: Color) {
        self.context
            .set_source_rgba(color.red, color.green, color.blue, color.alpha);
    }
}

impl DrawingSurface for CairoSurface {
    fn begin_path(&mut self) {
        self.context.new_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.context.curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn stroke(&mut self) {
        self.apply_color(self.stroke_color);
        if let Err(err) = self.context.stroke_preserve() {
            warn!(error = %err, "cairo stroke failed");
        }
    }

    fn fill(&mut self) {
        self.apply_color(self.fill_color);
        if let Err(err) = self.context.fill_preserve() {
            warn!(error = %err, "cairo fill failed");
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        // Rectangles are immediate and must not disturb the current path.
        let path = self.context.copy_path();
        self.context.new_path();
        self.context.rectangle(x, y, width, height);
        self.apply_color(self.fill_color);
        if let Err(err) = self.context.fill() {
            warn!(error = %err, "cairo fill_rect failed");
        }
        match path {
            Ok(path) => self.context.append_path(&path),
            Err(err) => warn!(error = %err, "cairo path restore failed"),
        }
    }

    fn set_stroke_style(&mut self, style: &str) {
        match Color::parse(style) {
            Ok(color) => self.stroke_color = color,
            Err(err) => warn!(error = %err, "keeping previous stroke color"),
        }
    }

    fn set_fill_style(&mut self, style: &str) {
        match Color::parse(style) {
            Ok(color) => self.fill_color = color,
            Err(err) => warn!(error = %err, "keeping previous fill color"),
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.context.set_dash(pattern, 0.0);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.context.set_line_cap(match cap {
            LineCap::Butt => cairo::LineCap::Butt,
            LineCap::Round => cairo::LineCap::Round,
            LineCap::Square => cairo::LineCap::Square,
        });
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.context.set_line_join(match join {
            LineJoin::Miter => cairo::LineJoin::Miter,
            LineJoin::Round => cairo::LineJoin::Round,
            LineJoin::Bevel => cairo::LineJoin::Bevel,
        });
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
