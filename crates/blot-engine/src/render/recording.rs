use std::path::Path;

use crate::coords::{Affine, Rect, Vec2};
use crate::paint::{Color, StrokeStyle};
use crate::scene::{DrawCmd, DrawList, PathData};

use super::{FontFace, RenderState, Renderer, RendererType, SoftwareRenderer};

/// Display-list backend.
///
/// Every op between `begin_frame` and `end_frame` is appended to a [`DrawList`]
/// instead of touching pixels. `end_frame` (or [`flush`](Self::flush)) replays
/// the pending tail of the list into an internal [`SoftwareRenderer`], so
/// `pixel_buffer` and capture show the raster as of the last flush. Ops issued
/// outside a frame go straight to the raster and are not kept.
///
/// A mirror of the drawing state answers `matrix()` and `is_path_open()` at
/// record time; ops the raster would ignore (path ops with no open path, a pop
/// on an empty stack) are not recorded.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    list: DrawList,
    replayed: usize,
    raster: SoftwareRenderer,
    state: RenderState,
    font: Option<FontFace>,
    in_frame: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last `begin_frame`.
    #[inline]
    pub fn recording(&self) -> &DrawList {
        &self.list
    }

    /// Commands recorded but not yet rasterized.
    #[inline]
    pub fn pending(&self) -> usize {
        self.list.len() - self.replayed
    }

    /// Rasterizes pending commands without closing the frame.
    pub fn flush(&mut self) {
        if self.pending() == 0 {
            return;
        }
        self.list.replay_from(self.replayed, &mut self.raster);
        self.replayed = self.list.len();
    }

    fn record(&mut self, cmd: DrawCmd) {
        if self.raster.is_initialized() {
            self.emit(cmd);
        }
    }

    fn emit(&mut self, cmd: DrawCmd) {
        if self.in_frame {
            self.list.push(cmd);
        } else {
            cmd.apply(&mut self.raster);
        }
    }

    /// Records a path op only while a path is open.
    fn record_path(&mut self, cmd: DrawCmd, edit: impl FnOnce(&mut PathData)) {
        if let Some(path) = self.state.path_mut() {
            edit(path);
            self.emit(cmd);
        }
    }

    fn reset(&mut self) {
        self.list.clear();
        self.replayed = 0;
        self.state = RenderState::default();
        self.in_frame = false;
    }
}

impl Renderer for RecordingRenderer {
    fn initialize(&mut self, width: u32, height: u32) -> bool {
        self.reset();
        self.raster.initialize(width, height)
    }

    fn shutdown(&mut self) {
        self.raster.shutdown();
        self.reset();
        self.font = None;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if !self.raster.is_initialized() || width == 0 || height == 0 {
            return;
        }
        self.raster.resize(width, height);
        self.list.clear();
        self.replayed = 0;
        self.state.discard_path();
    }

    fn begin_frame(&mut self) {
        if !self.raster.is_initialized() {
            return;
        }
        // A frame left open still reaches the raster.
        self.flush();
        self.list.clear();
        self.replayed = 0;
        self.in_frame = true;
        self.state.begin_frame();
        self.raster.begin_frame();
    }

    fn end_frame(&mut self) {
        if !self.raster.is_initialized() {
            return;
        }
        self.flush();
        self.in_frame = false;
        self.state.discard_path();
        self.raster.end_frame();
    }

    fn clear(&mut self, color: Color) {
        self.record(DrawCmd::Clear(color));
    }

    // ── primitives ────────────────────────────────────────────────────────

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.record(DrawCmd::Line { from: Vec2::new(x1, y1), to: Vec2::new(x2, y2) });
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(DrawCmd::Rect(Rect::new(x, y, width, height)));
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.record(DrawCmd::Circle { center: Vec2::new(x, y), radius });
    }

    fn draw_ellipse(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(DrawCmd::Ellipse { center: Vec2::new(x, y), size: Vec2::new(width, height) });
    }

    fn draw_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.record(DrawCmd::Triangle([Vec2::new(x1, y1), Vec2::new(x2, y2), Vec2::new(x3, y3)]));
    }

    fn draw_polygon(&mut self, points: &[Vec2]) {
        if points.len() >= 3 {
            self.record(DrawCmd::Polygon(points.to_vec()));
        }
    }

    // ── path ──────────────────────────────────────────────────────────────

    fn begin_path(&mut self) {
        if self.raster.is_initialized() {
            self.state.begin_path();
            self.emit(DrawCmd::BeginPath);
        }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        self.record_path(DrawCmd::MoveTo(p), |path| path.move_to(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        self.record_path(DrawCmd::LineTo(p), |path| path.line_to(p));
    }

    fn curve_to(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) {
        let (c1, c2, to) = (Vec2::new(cx1, cy1), Vec2::new(cx2, cy2), Vec2::new(x, y));
        self.record_path(DrawCmd::CurveTo { c1, c2, to }, |path| path.cubic_to(c1, c2, to));
    }

    fn close_path(&mut self) {
        self.record_path(DrawCmd::ClosePath, |path| path.close());
    }

    fn fill(&mut self, color: Color) {
        if self.state.take_path().is_some() {
            self.emit(DrawCmd::Fill(color));
        }
    }

    fn stroke(&mut self, color: Color, width: f32) {
        if self.state.take_path().is_some() {
            self.emit(DrawCmd::Stroke { color, width });
        }
    }

    fn is_path_open(&self) -> bool {
        self.state.is_path_open()
    }

    // ── style ─────────────────────────────────────────────────────────────

    fn set_fill_color(&mut self, color: Color) {
        self.state.style.set_fill(color);
        self.record(DrawCmd::SetFill(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.style.set_stroke(color);
        self.record(DrawCmd::SetStroke(color));
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.state.style.set_stroke_width(width);
        self.record(DrawCmd::SetStrokeWidth(width));
    }

    fn no_fill(&mut self) {
        self.state.style.has_fill = false;
        self.record(DrawCmd::NoFill);
    }

    fn no_stroke(&mut self) {
        self.state.style.has_stroke = false;
        self.record(DrawCmd::NoStroke);
    }

    fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.state.style.stroke_style = style.clone();
        self.record(DrawCmd::SetStrokeStyle(style));
    }

    // ── text ──────────────────────────────────────────────────────────────

    fn set_font(&mut self, path: &Path, size: f32) -> bool {
        if !self.raster.is_initialized() {
            return false;
        }
        if !self.font.as_ref().is_some_and(|f| f.is_loaded_from(path, size)) {
            match FontFace::load(path, size) {
                Ok(face) => self.font = Some(face),
                Err(err) => {
                    log::warn!("recording renderer: {err:#}");
                    return false;
                }
            }
        }
        self.emit(DrawCmd::SetFont { path: path.to_path_buf(), size });
        true
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        if !text.is_empty() {
            self.record(DrawCmd::Text { text: text.to_string(), origin: Vec2::new(x, y), color });
        }
    }

    fn text_bounds(&self, text: &str) -> Vec2 {
        self.font.as_ref().map_or(Vec2::zero(), |f| f.measure(text))
    }

    // ── transform stack ───────────────────────────────────────────────────

    fn push_matrix(&mut self) {
        self.state.push_matrix();
        self.record(DrawCmd::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        if self.state.pop_matrix() {
            self.record(DrawCmd::PopMatrix);
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.matrix = self.state.matrix.pre_translate(x, y);
        self.record(DrawCmd::Translate(Vec2::new(x, y)));
    }

    fn rotate(&mut self, radians: f32) {
        self.state.matrix = self.state.matrix.pre_rotate(radians);
        self.record(DrawCmd::Rotate(radians));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.matrix = self.state.matrix.pre_scale(sx, sy);
        self.record(DrawCmd::Scale(Vec2::new(sx, sy)));
    }

    fn reset_matrix(&mut self) {
        self.state.matrix = Affine::IDENTITY;
        self.record(DrawCmd::ResetMatrix);
    }

    fn matrix(&self) -> Affine {
        self.state.matrix
    }

    // ── capture ───────────────────────────────────────────────────────────

    fn save_to_file(&self, path: &Path) -> bool {
        self.raster.save_to_file(path)
    }

    fn save_to_memory(&self) -> Option<Vec<u8>> {
        self.raster.save_to_memory()
    }

    fn pixel_buffer(&self) -> Option<&[u8]> {
        self.raster.pixel_buffer()
    }

    // ── introspection ─────────────────────────────────────────────────────

    fn kind(&self) -> RendererType {
        RendererType::Recording
    }

    fn is_initialized(&self) -> bool {
        self.raster.is_initialized()
    }

    fn width(&self) -> u32 {
        self.raster.width()
    }

    fn height(&self) -> u32 {
        self.raster.height()
    }

    fn frame_index(&self) -> u64 {
        self.raster.frame_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_font_path;

    fn recorder(w: u32, h: u32) -> RecordingRenderer {
        let mut r = RecordingRenderer::new();
        assert!(r.initialize(w, h));
        r
    }

    fn draw_scene(r: &mut dyn Renderer) {
        r.begin_frame();
        r.clear(Color::white());
        r.set_fill_color(Color::rgba(0.0, 0.0, 1.0, 1.0));
        r.set_stroke_width(2.0);
        r.push_matrix();
        r.translate(8.0, 8.0);
        r.rotate(0.4);
        r.draw_rect(0.0, 0.0, 10.0, 6.0);
        r.pop_matrix();
        r.begin_path();
        r.move_to(2.0, 30.0);
        r.curve_to(10.0, 20.0, 20.0, 40.0, 30.0, 30.0);
        r.close_path();
        r.fill(Color::black());
        r.draw_line(0.0, 0.0, 31.0, 31.0);
        r.end_frame();
    }

    // ── recording ─────────────────────────────────────────────────────────

    #[test]
    fn records_ops_in_order() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.set_fill_color(Color::black());
        r.draw_circle(4.0, 4.0, 2.0);
        assert_eq!(
            r.recording().commands(),
            &[DrawCmd::SetFill(Color::black()), DrawCmd::Circle { center: Vec2::new(4.0, 4.0), radius: 2.0 }]
        );
        assert_eq!(r.pending(), 2);
    }

    #[test]
    fn uninitialized_records_nothing() {
        let mut r = RecordingRenderer::new();
        r.begin_frame();
        r.draw_rect(0.0, 0.0, 1.0, 1.0);
        r.begin_path();
        r.line_to(1.0, 1.0);
        r.end_frame();
        assert!(r.recording().is_empty());
        assert!(!r.is_path_open());
    }

    #[test]
    fn begin_frame_starts_a_fresh_recording() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.draw_rect(0.0, 0.0, 2.0, 2.0);
        r.end_frame();
        r.begin_frame();
        assert!(r.recording().is_empty());
    }

    #[test]
    fn path_ops_without_begin_are_not_recorded() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.move_to(1.0, 1.0);
        r.line_to(2.0, 2.0);
        r.fill(Color::black());
        assert!(r.recording().is_empty());
    }

    #[test]
    fn fill_consumes_the_recorded_path() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.begin_path();
        r.line_to(4.0, 4.0);
        r.fill(Color::black());
        r.stroke(Color::black(), 1.0);
        assert!(!r.is_path_open());
        assert_eq!(r.recording().len(), 3);
    }

    #[test]
    fn unbalanced_pop_is_not_recorded() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.pop_matrix();
        assert!(r.recording().is_empty());
    }

    #[test]
    fn matrix_mirrors_recorded_transforms() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.translate(3.0, 4.0);
        r.push_matrix();
        r.scale(2.0, 2.0);
        r.pop_matrix();
        assert_eq!(r.matrix(), Affine::from_translate(3.0, 4.0));
    }

    // ── rasterization ─────────────────────────────────────────────────────

    #[test]
    fn pixels_appear_only_after_flush() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.clear(Color::white());
        assert!(r.pixel_buffer().unwrap().iter().all(|&b| b == 0));

        r.flush();
        assert_eq!(r.pending(), 0);
        assert!(r.pixel_buffer().unwrap().iter().all(|&b| b == 255));
    }

    #[test]
    fn end_frame_matches_software_renderer() {
        let mut sw = SoftwareRenderer::new();
        assert!(sw.initialize(32, 32));
        draw_scene(&mut sw);

        let mut rec = recorder(32, 32);
        draw_scene(&mut rec);

        assert_eq!(rec.pixel_buffer(), sw.pixel_buffer());
        assert_eq!(rec.frame_index(), 1);
    }

    #[test]
    fn flush_does_not_replay_twice() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.set_fill_color(Color::rgba(0.0, 0.0, 0.0, 0.5));
        r.no_stroke();
        r.draw_rect(0.0, 0.0, 8.0, 8.0);
        r.flush();
        let once = r.pixel_buffer().unwrap().to_vec();
        r.end_frame();
        assert_eq!(r.pixel_buffer().unwrap(), &once[..]);
    }

    #[test]
    fn resize_drops_pending_commands() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        r.clear(Color::white());
        r.resize(4, 4);
        assert_eq!(r.pending(), 0);
        assert_eq!((r.width(), r.height()), (4, 4));
    }

    #[test]
    fn ops_outside_a_frame_draw_immediately() {
        let mut r = recorder(8, 8);
        for _ in 0..100 {
            r.clear(Color::white());
        }
        assert!(r.recording().is_empty());
        assert_eq!(r.pending(), 0);
        assert!(r.pixel_buffer().unwrap().iter().all(|&b| b == 255));
    }

    #[test]
    fn begin_frame_flushes_an_unclosed_frame() {
        let mut r = recorder(4, 4);
        r.begin_frame();
        r.clear(Color::black());
        r.begin_frame();
        assert!(r.recording().is_empty());
        assert_eq!(&r.pixel_buffer().unwrap()[..4], &[0, 0, 0, 255]);
    }

    // ── text ──────────────────────────────────────────────────────────────

    #[test]
    fn set_font_on_uninitialized_renderer_is_refused() {
        let mut r = RecordingRenderer::new();
        assert!(!r.set_font(&test_font_path(), 24.0));
        assert!(r.initialize(64, 32));
        assert_eq!(r.text_bounds("Hi"), Vec2::zero());

        r.begin_frame();
        r.draw_text("Hi", 2.0, 2.0, Color::black());
        r.end_frame();
        assert!(r.pixel_buffer().unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn text_matches_software_renderer() {
        fn draw_text(r: &mut dyn Renderer) {
            assert!(r.set_font(&test_font_path(), 18.0));
            r.begin_frame();
            r.clear(Color::white());
            r.translate(4.0, 6.0);
            r.rotate(0.2);
            r.draw_text("blot", 0.0, 0.0, Color::rgba(0.8, 0.1, 0.1, 1.0));
            r.end_frame();
        }

        let mut sw = SoftwareRenderer::new();
        assert!(sw.initialize(64, 40));
        draw_text(&mut sw);

        let mut rec = recorder(64, 40);
        draw_text(&mut rec);

        assert_eq!(rec.text_bounds("blot"), sw.text_bounds("blot"));
        assert!(rec.text_bounds("blot").x > 0.0);
        assert!(sw.pixel_buffer().unwrap().iter().any(|&b| b != 255));
        assert_eq!(rec.pixel_buffer(), sw.pixel_buffer());
    }

    #[test]
    fn font_set_inside_a_frame_is_recorded() {
        let mut r = recorder(8, 8);
        r.begin_frame();
        assert!(r.set_font(&test_font_path(), 12.0));
        assert!(matches!(r.recording().last(), Some(DrawCmd::SetFont { size, .. }) if *size == 12.0));
        assert!(r.text_bounds("a").x > 0.0);
    }

    #[test]
    fn shutdown_releases_raster() {
        let mut r = recorder(8, 8);
        r.shutdown();
        assert!(!r.is_initialized());
        assert!(r.pixel_buffer().is_none());
        assert!(!r.save_to_file(&std::env::temp_dir().join("blot-rec-never.png")));
    }
}
