use std::path::PathBuf;

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, StrokeStyle};
use crate::render::Renderer;

use super::{PathData, PathVerb};

/// Renderer-agnostic draw command.
///
/// Each variant mirrors one `Renderer` operation, so replaying a recording into
/// a backend issues exactly the calls that produced it. `FillPath` and
/// `StrokePath` are the retained form of a whole `begin_path` .. `fill`/`stroke`
/// sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),

    SetFill(Color),
    SetStroke(Color),
    SetStrokeWidth(f32),
    NoFill,
    NoStroke,
    SetStrokeStyle(StrokeStyle),
    SetFont { path: PathBuf, size: f32 },

    Line { from: Vec2, to: Vec2 },
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
    Ellipse { center: Vec2, size: Vec2 },
    Triangle([Vec2; 3]),
    Polygon(Vec<Vec2>),

    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    CurveTo { c1: Vec2, c2: Vec2, to: Vec2 },
    ClosePath,
    Fill(Color),
    Stroke { color: Color, width: f32 },
    FillPath { path: PathData, color: Color },
    StrokePath { path: PathData, color: Color, width: f32 },

    Text { text: String, origin: Vec2, color: Color },

    PushMatrix,
    PopMatrix,
    Translate(Vec2),
    Rotate(f32),
    Scale(Vec2),
    ResetMatrix,
}

impl DrawCmd {
    /// Issues this command against `r`.
    pub fn apply(&self, r: &mut dyn Renderer) {
        match self {
            DrawCmd::Clear(c) => r.clear(*c),

            DrawCmd::SetFill(c) => r.set_fill_color(*c),
            DrawCmd::SetStroke(c) => r.set_stroke_color(*c),
            DrawCmd::SetStrokeWidth(w) => r.set_stroke_width(*w),
            DrawCmd::NoFill => r.no_fill(),
            DrawCmd::NoStroke => r.no_stroke(),
            DrawCmd::SetStrokeStyle(s) => r.set_stroke_style(s.clone()),
            DrawCmd::SetFont { path, size } => {
                r.set_font(path, *size);
            }

            DrawCmd::Line { from, to } => r.draw_line(from.x, from.y, to.x, to.y),
            DrawCmd::Rect(rect) => r.draw_rect(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y),
            DrawCmd::Circle { center, radius } => r.draw_circle(center.x, center.y, *radius),
            DrawCmd::Ellipse { center, size } => r.draw_ellipse(center.x, center.y, size.x, size.y),
            DrawCmd::Triangle([a, b, c]) => r.draw_triangle(a.x, a.y, b.x, b.y, c.x, c.y),
            DrawCmd::Polygon(points) => r.draw_polygon(points),

            DrawCmd::BeginPath => r.begin_path(),
            DrawCmd::MoveTo(p) => r.move_to(p.x, p.y),
            DrawCmd::LineTo(p) => r.line_to(p.x, p.y),
            DrawCmd::CurveTo { c1, c2, to } => r.curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y),
            DrawCmd::ClosePath => r.close_path(),
            DrawCmd::Fill(c) => r.fill(*c),
            DrawCmd::Stroke { color, width } => r.stroke(*color, *width),
            DrawCmd::FillPath { path, color } => {
                issue_path(r, path);
                r.fill(*color);
            }
            DrawCmd::StrokePath { path, color, width } => {
                issue_path(r, path);
                r.stroke(*color, *width);
            }

            DrawCmd::Text { text, origin, color } => r.draw_text(text, origin.x, origin.y, *color),

            DrawCmd::PushMatrix => r.push_matrix(),
            DrawCmd::PopMatrix => r.pop_matrix(),
            DrawCmd::Translate(v) => r.translate(v.x, v.y),
            DrawCmd::Rotate(a) => r.rotate(*a),
            DrawCmd::Scale(v) => r.scale(v.x, v.y),
            DrawCmd::ResetMatrix => r.reset_matrix(),
        }
    }

    /// True for commands that change pixels (as opposed to state).
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            DrawCmd::Clear(_)
                | DrawCmd::Line { .. }
                | DrawCmd::Rect(_)
                | DrawCmd::Circle { .. }
                | DrawCmd::Ellipse { .. }
                | DrawCmd::Triangle(_)
                | DrawCmd::Polygon(_)
                | DrawCmd::Fill(_)
                | DrawCmd::Stroke { .. }
                | DrawCmd::FillPath { .. }
                | DrawCmd::StrokePath { .. }
                | DrawCmd::Text { .. }
        )
    }
}

fn issue_path(r: &mut dyn Renderer, path: &PathData) {
    r.begin_path();
    for verb in path.verbs() {
        match *verb {
            PathVerb::MoveTo(p) => r.move_to(p.x, p.y),
            PathVerb::LineTo(p) => r.line_to(p.x, p.y),
            PathVerb::CubicTo(a, b, c) => r.curve_to(a.x, a.y, b.x, b.y, c.x, c.y),
            PathVerb::Close => r.close_path(),
        }
    }
}
