//! Retained, per-entity drawing.
//!
//! `Graphics` is what sketch code draws into: a style plus a [`DrawList`]. The
//! list is replayed into a renderer whenever the owning canvas redraws, so the
//! same recording can be rendered many times.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::coords::{Rect, Vec2};
use crate::ecs::Transform;
use crate::paint::{Color, DrawStyle, StrokeStyle};
use crate::render::Renderer;
use crate::scene::{DrawCmd, DrawList, PathData};

/// Graphics handle shared between the rendering manager and sketch code.
pub type SharedGraphics = Rc<RefCell<Graphics>>;

#[derive(Debug, Clone, Default)]
pub struct Graphics {
    style: DrawStyle,
    list: DrawList,
    depth: usize,
}

impl Graphics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn shared(self) -> SharedGraphics {
        Rc::new(RefCell::new(self))
    }

    /// Style at the end of the recording.
    #[inline]
    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    #[inline]
    pub fn commands(&self) -> &DrawList {
        &self.list
    }

    /// Drops every recorded command and resets the style.
    pub fn clear_commands(&mut self) {
        self.list.clear();
        self.style = DrawStyle::default();
        self.depth = 0;
    }

    // ── style ─────────────────────────────────────────────────────────────

    pub fn set_fill(&mut self, color: Color) {
        self.style.set_fill(color);
        self.list.push(DrawCmd::SetFill(color));
    }

    pub fn set_stroke(&mut self, color: Color) {
        self.style.set_stroke(color);
        self.list.push(DrawCmd::SetStroke(color));
    }

    pub fn set_stroke_weight(&mut self, width: f32) {
        self.style.set_stroke_width(width);
        self.list.push(DrawCmd::SetStrokeWidth(self.style.stroke_width));
    }

    pub fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.style.stroke_style = style.clone();
        self.list.push(DrawCmd::SetStrokeStyle(style));
    }

    pub fn no_fill(&mut self) {
        self.style.has_fill = false;
        self.list.push(DrawCmd::NoFill);
    }

    pub fn no_stroke(&mut self) {
        self.style.has_stroke = false;
        self.list.push(DrawCmd::NoStroke);
    }

    pub fn set_font(&mut self, path: impl AsRef<Path>, size: f32) {
        self.list.push(DrawCmd::SetFont { path: path.as_ref().to_path_buf(), size });
    }

    // ── shapes ────────────────────────────────────────────────────────────

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.list.push(DrawCmd::Line { from: Vec2::new(x1, y1), to: Vec2::new(x2, y2) });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.list.push(DrawCmd::Rect(Rect::new(x, y, width, height)));
    }

    pub fn circle(&mut self, x: f32, y: f32, radius: f32) {
        self.list.push(DrawCmd::Circle { center: Vec2::new(x, y), radius });
    }

    pub fn ellipse(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.list.push(DrawCmd::Ellipse { center: Vec2::new(x, y), size: Vec2::new(width, height) });
    }

    pub fn triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.list
            .push(DrawCmd::Triangle([Vec2::new(x1, y1), Vec2::new(x2, y2), Vec2::new(x3, y3)]));
    }

    /// Fewer than three points records nothing.
    pub fn polygon(&mut self, points: &[Vec2]) {
        if points.len() >= 3 {
            self.list.push(DrawCmd::Polygon(points.to_vec()));
        }
    }

    /// Fills and/or strokes `path` with the current style.
    pub fn path(&mut self, path: &PathData) {
        if path.is_empty() {
            return;
        }
        if let Some(color) = self.style.active_fill() {
            self.list.push(DrawCmd::FillPath { path: path.clone(), color });
        }
        if let Some((color, width)) = self.style.active_stroke() {
            self.list.push(DrawCmd::StrokePath { path: path.clone(), color, width });
        }
    }

    /// Text in the current fill color; nothing while fill is off.
    pub fn text(&mut self, text: &str, x: f32, y: f32) {
        let Some(color) = self.style.active_fill() else { return };
        if !text.is_empty() {
            self.list.push(DrawCmd::Text { text: text.to_string(), origin: Vec2::new(x, y), color });
        }
    }

    // ── transform ─────────────────────────────────────────────────────────

    pub fn push(&mut self) {
        self.depth += 1;
        self.list.push(DrawCmd::PushMatrix);
    }

    /// Unbalanced pops are dropped.
    pub fn pop(&mut self) {
        if self.depth == 0 {
            log::debug!("graphics: pop without matching push dropped");
            return;
        }
        self.depth -= 1;
        self.list.push(DrawCmd::PopMatrix);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.list.push(DrawCmd::Translate(Vec2::new(x, y)));
    }

    pub fn rotate(&mut self, radians: f32) {
        self.list.push(DrawCmd::Rotate(radians));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.list.push(DrawCmd::Scale(Vec2::new(sx, sy)));
    }

    // ── output ────────────────────────────────────────────────────────────

    /// Replays the recording into `r`.
    ///
    /// The renderer's style is reset to the defaults first, and its matrix and
    /// stack depth are restored afterwards, including pushes the recording
    /// left open.
    pub fn render(&self, r: &mut dyn Renderer) {
        reset_style(r);
        r.push_matrix();
        self.list.replay(r);
        for _ in 0..self.depth {
            r.pop_matrix();
        }
        r.pop_matrix();
    }

    /// Like [`render`](Self::render), placed by `transform`.
    pub fn render_with_transform(&self, r: &mut dyn Renderer, transform: &Transform) {
        r.push_matrix();
        r.translate(transform.position.x, transform.position.y);
        r.rotate(transform.rotation);
        r.scale(transform.scale.x, transform.scale.y);
        self.render(r);
        r.pop_matrix();
    }
}

fn reset_style(r: &mut dyn Renderer) {
    let style = DrawStyle::default();
    r.set_fill_color(style.fill);
    r.set_stroke_color(style.stroke);
    r.set_stroke_width(style.stroke_width);
    r.set_stroke_style(style.stroke_style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Affine;
    use crate::render::{test_font_path, SoftwareRenderer};

    fn raster(w: u32, h: u32) -> SoftwareRenderer {
        let mut r = SoftwareRenderer::new();
        assert!(r.initialize(w, h));
        r
    }

    fn pixel(r: &SoftwareRenderer, x: u32, y: u32) -> [u8; 4] {
        let buf = r.pixel_buffer().unwrap();
        let i = ((y * r.width() + x) * 4) as usize;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    // ── recording ─────────────────────────────────────────────────────────

    #[test]
    fn records_in_call_order() {
        let mut g = Graphics::new();
        g.set_fill(Color::black());
        g.rect(0.0, 0.0, 2.0, 2.0);
        assert_eq!(
            g.commands().commands(),
            &[DrawCmd::SetFill(Color::black()), DrawCmd::Rect(Rect::new(0.0, 0.0, 2.0, 2.0))]
        );
    }

    #[test]
    fn unbalanced_pop_is_dropped() {
        let mut g = Graphics::new();
        g.pop();
        g.push();
        g.pop();
        g.pop();
        assert_eq!(g.commands().commands(), &[DrawCmd::PushMatrix, DrawCmd::PopMatrix]);
    }

    #[test]
    fn path_follows_style() {
        let mut path = PathData::new();
        path.line_to(Vec2::new(4.0, 0.0));
        path.line_to(Vec2::new(4.0, 4.0));

        let mut g = Graphics::new();
        g.path(&path);
        assert_eq!(g.commands().len(), 2);

        g.clear_commands();
        g.no_fill();
        g.path(&path);
        assert!(matches!(g.commands().last(), Some(DrawCmd::StrokePath { .. })));
        assert_eq!(g.commands().len(), 2);
    }

    #[test]
    fn text_without_fill_records_nothing() {
        let mut g = Graphics::new();
        g.no_fill();
        g.text("hi", 0.0, 0.0);
        assert_eq!(g.commands().len(), 1);
    }

    #[test]
    fn clear_commands_resets_style() {
        let mut g = Graphics::new();
        g.no_stroke();
        g.push();
        g.clear_commands();
        assert!(g.commands().is_empty());
        assert_eq!(g.style(), &DrawStyle::default());
    }

    // ── rendering ─────────────────────────────────────────────────────────

    #[test]
    fn render_restores_renderer_matrix() {
        let mut g = Graphics::new();
        g.push();
        g.translate(5.0, 5.0);
        g.push();
        g.rotate(1.0);

        let mut r = raster(8, 8);
        r.translate(1.0, 2.0);
        g.render(&mut r);
        assert_eq!(r.matrix(), Affine::from_translate(1.0, 2.0));
    }

    #[test]
    fn render_resets_renderer_style() {
        let mut g = Graphics::new();
        g.rect(2.0, 2.0, 4.0, 4.0);

        let mut r = raster(8, 8);
        r.no_fill();
        r.no_stroke();
        g.render(&mut r);
        assert_eq!(pixel(&r, 4, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn recorded_font_survives_repeated_renders() {
        let path = std::env::temp_dir().join(format!("blot-gfx-{}-font.ttf", std::process::id()));
        std::fs::copy(test_font_path(), &path).unwrap();

        let mut g = Graphics::new();
        g.set_font(&path, 20.0);
        g.set_fill(Color::black());
        g.text("A", 2.0, 2.0);

        let mut r = raster(32, 32);
        g.render(&mut r);
        let first = r.pixel_buffer().unwrap().to_vec();
        assert!(first.iter().any(|&b| b != 0));

        // The active font is reused rather than read again.
        std::fs::remove_file(&path).unwrap();
        r.clear(Color::transparent());
        g.render(&mut r);
        assert_eq!(r.pixel_buffer().unwrap(), &first[..]);
    }

    #[test]
    fn render_with_transform_moves_output() {
        let mut g = Graphics::new();
        g.no_stroke();
        g.set_fill(Color::black());
        g.rect(0.0, 0.0, 4.0, 4.0);

        let mut r = raster(20, 20);
        g.render_with_transform(&mut r, &Transform::from_position(Vec2::new(10.0, 10.0)));
        assert_eq!(pixel(&r, 12, 12), [0, 0, 0, 255]);
        assert_eq!(pixel(&r, 2, 2), [0, 0, 0, 0]);
        assert!(r.matrix().is_identity());
    }
}
