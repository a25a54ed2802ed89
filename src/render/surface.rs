use crate::render::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Immediate-mode 2D drawing target with canvas-like path semantics.
///
/// Styles are opaque strings; a backend decides how to interpret them.
/// Calls never fail from the caller's perspective: backends log and drop
/// operations they cannot perform.
pub trait DrawingSurface {
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_stroke_style(&mut self, style: &str);
    fn set_fill_style(&mut self, style: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    BezierCurveTo { cp1: Point, cp2: Point, to: Point },
    ClosePath,
    Stroke,
    Fill,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    SetStrokeStyle(String),
    SetFillStyle(String),
    SetLineWidth(f64),
    SetLineDash(Vec<f64>),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    BezierTo { cp1: Point, cp2: Point, to: Point },
    Close,
}

impl PathOp {
    fn end_point(self) -> Option<Point> {
        match self {
            Self::MoveTo(point) | Self::LineTo(point) => Some(point),
            Self::BezierTo { to, .. } => Some(to),
            Self::Close => None,
        }
    }
}

/// Path as it was when a `stroke` or `fill` consumed it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPath {
    pub style: String,
    pub line_width: f64,
    pub line_dash: Vec<f64>,
    pub ops: Vec<PathOp>,
}

impl RecordedPath {
    /// End point of every path operation, in order.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point> {
        self.ops.iter().filter_map(|op| op.end_point()).collect()
    }

    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.vertices().first().copied()
    }

    #[must_use]
    pub fn end(&self) -> Option<Point> {
        self.vertices().last().copied()
    }

    #[must_use]
    pub fn move_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PathOp::MoveTo(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRect {
    pub style: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Surface that keeps every call as a [`DrawCommand`].
///
/// Useful for headless hosts and for asserting renderer output.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Stroke))
            .count()
    }

    /// Replays the log and returns the path consumed by each `stroke`.
    #[must_use]
    pub fn strokes(&self) -> Vec<RecordedPath> {
        self.replay().0
    }

    /// Replays the log and returns the path consumed by each `fill`.
    #[must_use]
    pub fn fills(&self) -> Vec<RecordedPath> {
        self.replay().1
    }

    #[must_use]
    pub fn fill_rects(&self) -> Vec<RecordedRect> {
        self.replay().2
    }

    fn replay(&self) -> (Vec<RecordedPath>, Vec<RecordedPath>, Vec<RecordedRect>) {
        let mut strokes = Vec::new();
        let mut fills = Vec::new();
        let mut rects = Vec::new();
        let mut ops: Vec<PathOp> = Vec::new();
        let mut stroke_style = String::from("#000000");
        let mut fill_style = String::from("#000000");
        let mut line_width = 1.0;
        let mut line_dash: Vec<f64> = Vec::new();

        for command in &self.commands {
            match command {
                DrawCommand::BeginPath => ops.clear(),
                DrawCommand::MoveTo(point) => ops.push(PathOp::MoveTo(*point)),
                DrawCommand::LineTo(point) => ops.push(PathOp::LineTo(*point)),
                DrawCommand::BezierCurveTo { cp1, cp2, to } => ops.push(PathOp::BezierTo {
                    cp1: *cp1,
                    cp2: *cp2,
                    to: *to,
                }),
                DrawCommand::ClosePath => ops.push(PathOp::Close),
                DrawCommand::Stroke => strokes.push(RecordedPath {
                    style: stroke_style.clone(),
                    line_width,
                    line_dash: line_dash.clone(),
                    ops: ops.clone(),
                }),
                DrawCommand::Fill => fills.push(RecordedPath {
                    style: fill_style.clone(),
                    line_width,
                    line_dash: line_dash.clone(),
                    ops: ops.clone(),
                }),
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                } => rects.push(RecordedRect {
                    style: fill_style.clone(),
                    x: *x,
                    y: *y,
                    width: *width,
                    height: *height,
                }),
                DrawCommand::SetStrokeStyle(style) => stroke_style.clone_from(style),
                DrawCommand::SetFillStyle(style) => fill_style.clone_from(style),
                DrawCommand::SetLineWidth(width) => line_width = *width,
                DrawCommand::SetLineDash(pattern) => line_dash.clone_from(pattern),
                DrawCommand::SetLineCap(_) | DrawCommand::SetLineJoin(_) => {}
            }
        }
        (strokes, fills, rects)
    }
}

impl DrawingSurface for RecordingSurface {
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(Point::new(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(Point::new(x, y)));
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.commands.push(DrawCommand::BezierCurveTo {
            cp1: Point::new(cp1x, cp1y),
            cp2: Point::new(cp2x, cp2y),
            to: Point::new(x, y),
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.commands
            .push(DrawCommand::SetStrokeStyle(style.to_owned()));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.commands.push(DrawCommand::SetFillStyle(style.to_owned()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.commands.push(DrawCommand::SetLineDash(pattern.to_vec()));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(DrawCommand::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.commands.push(DrawCommand::SetLineJoin(join));
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawingSurface, RecordingSurface};

    #[test]
    fn stroke_snapshots_current_path_and_style() {
        let mut surface = RecordingSurface::new();
        surface.set_stroke_style("#ff0000");
        surface.begin_path();
        surface.move_to(0.0, 0.0);
        surface.line_to(10.0, 5.0);
        surface.stroke();
        surface.begin_path();
        surface.set_stroke_style("#00ff00");
        surface.move_to(10.0, 5.0);
        surface.line_to(20.0, 5.0);
        surface.stroke();

        let strokes = surface.strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].style, "#ff0000");
        assert_eq!(strokes[1].style, "#00ff00");
        assert_eq!(strokes[0].end(), strokes[1].start());
    }
}
