use std::path::Path;

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Transform};

use crate::coords::{Affine, Rect, Vec2};
use crate::paint::{Color, DrawStyle, StrokeStyle};
use crate::scene::PathData;

use super::{capture, FontFace, RenderState, Renderer, RendererType};

/// CPU rasterizer backend.
///
/// Owns a premultiplied RGBA8 pixmap and draws into it with tiny-skia
/// (anti-aliased, non-zero winding fills). Text goes through fontdue: each glyph
/// coverage bitmap becomes a small tinted pixmap composited with the current
/// matrix, so rotated and scaled text follows the transform stack.
#[derive(Debug, Default)]
pub struct SoftwareRenderer {
    pixmap: Option<Pixmap>,
    state: RenderState,
    font: Option<FontFace>,
    frame_index: u64,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fill/stroke style.
    #[inline]
    pub fn style(&self) -> &DrawStyle {
        &self.state.style
    }

    /// Loaded font, if any.
    #[inline]
    pub fn font(&self) -> Option<&FontFace> {
        self.font.as_ref()
    }

    #[inline]
    fn transform(&self) -> Transform {
        self.state.matrix.into()
    }

    /// Fills then strokes `path` according to the current style.
    fn draw_shape(&mut self, path: Option<tiny_skia::Path>) {
        let Some(path) = path else { return };
        if let Some(fill) = self.state.style.active_fill() {
            self.fill_skia_path(&path, fill);
        }
        if let Some((color, width)) = self.state.style.active_stroke() {
            self.stroke_skia_path(&path, color, width);
        }
    }

    fn fill_skia_path(&mut self, path: &tiny_skia::Path, color: Color) {
        let transform = self.transform();
        let Some(pixmap) = self.pixmap.as_mut() else { return };
        pixmap.fill_path(path, &solid_paint(color), FillRule::Winding, transform, None);
    }

    fn stroke_skia_path(&mut self, path: &tiny_skia::Path, color: Color, width: f32) {
        if !(width.is_finite() && width > 0.0) {
            return;
        }
        let transform = self.transform();
        let stroke = self.state.style.stroke_style.to_skia(width);
        let Some(pixmap) = self.pixmap.as_mut() else { return };
        pixmap.stroke_path(path, &solid_paint(color), &stroke, transform, None);
    }
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn polygon_path(points: &[Vec2]) -> Option<tiny_skia::Path> {
    if points.len() < 3 {
        return None;
    }
    PathData::polygon(points).to_skia()
}

impl Renderer for SoftwareRenderer {
    fn initialize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::warn!("software renderer: refusing {width}x{height} raster");
            return false;
        }
        let Some(pixmap) = Pixmap::new(width, height) else {
            log::warn!("software renderer: could not allocate {width}x{height} raster");
            return false;
        };
        self.pixmap = Some(pixmap);
        self.state = RenderState::default();
        self.frame_index = 0;
        log::debug!("software renderer initialized at {width}x{height}");
        true
    }

    fn shutdown(&mut self) {
        if self.pixmap.take().is_some() {
            log::debug!("software renderer shut down");
        }
        self.state = RenderState::default();
        self.font = None;
        self.frame_index = 0;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.pixmap.is_none() || width == 0 || height == 0 {
            return;
        }
        if self.width() == width && self.height() == height {
            return;
        }
        match Pixmap::new(width, height) {
            Some(pixmap) => {
                self.pixmap = Some(pixmap);
                self.state.discard_path();
                log::debug!("software renderer resized to {width}x{height}");
            }
            None => log::warn!("software renderer: could not allocate {width}x{height} raster"),
        }
    }

    fn begin_frame(&mut self) {
        if self.pixmap.is_none() {
            return;
        }
        self.state.begin_frame();
    }

    fn end_frame(&mut self) {
        if self.pixmap.is_none() {
            return;
        }
        self.state.discard_path();
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    fn clear(&mut self, color: Color) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(color.to_skia());
        }
    }

    // ── primitives ────────────────────────────────────────────────────────

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        if self.pixmap.is_none() {
            return;
        }
        let Some((color, width)) = self.state.style.active_stroke() else { return };
        let mut pb = PathBuilder::new();
        pb.move_to(x1, y1);
        pb.line_to(x2, y2);
        if let Some(path) = pb.finish() {
            self.stroke_skia_path(&path, color, width);
        }
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if self.pixmap.is_none() {
            return;
        }
        let r = Rect::new(x, y, width, height).normalized();
        let path = tiny_skia::Rect::from_xywh(r.origin.x, r.origin.y, r.size.x, r.size.y)
            .map(PathBuilder::from_rect);
        self.draw_shape(path);
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32) {
        if self.pixmap.is_none() || !(radius > 0.0) {
            return;
        }
        self.draw_shape(PathBuilder::from_circle(x, y, radius));
    }

    fn draw_ellipse(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if self.pixmap.is_none() {
            return;
        }
        let r = Rect::from_center_size(Vec2::new(x, y), Vec2::new(width, height)).normalized();
        let path = tiny_skia::Rect::from_xywh(r.origin.x, r.origin.y, r.size.x, r.size.y)
            .and_then(PathBuilder::from_oval);
        self.draw_shape(path);
    }

    fn draw_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.draw_polygon(&[Vec2::new(x1, y1), Vec2::new(x2, y2), Vec2::new(x3, y3)]);
    }

    fn draw_polygon(&mut self, points: &[Vec2]) {
        if self.pixmap.is_none() {
            return;
        }
        self.draw_shape(polygon_path(points));
    }

    // ── path ──────────────────────────────────────────────────────────────

    fn begin_path(&mut self) {
        if self.pixmap.is_some() {
            self.state.begin_path();
        }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        if let Some(path) = self.state.path_mut() {
            path.move_to(Vec2::new(x, y));
        }
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if let Some(path) = self.state.path_mut() {
            path.line_to(Vec2::new(x, y));
        }
    }

    fn curve_to(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) {
        if let Some(path) = self.state.path_mut() {
            path.cubic_to(Vec2::new(cx1, cy1), Vec2::new(cx2, cy2), Vec2::new(x, y));
        }
    }

    fn close_path(&mut self) {
        if let Some(path) = self.state.path_mut() {
            path.close();
        }
    }

    fn fill(&mut self, color: Color) {
        let Some(path) = self.state.take_path() else { return };
        if let Some(path) = path.to_skia() {
            self.fill_skia_path(&path, color);
        }
    }

    fn stroke(&mut self, color: Color, width: f32) {
        let Some(path) = self.state.take_path() else { return };
        if let Some(path) = path.to_skia() {
            self.stroke_skia_path(&path, color, width);
        }
    }

    fn is_path_open(&self) -> bool {
        self.state.is_path_open()
    }

    // ── style ─────────────────────────────────────────────────────────────

    fn set_fill_color(&mut self, color: Color) {
        self.state.style.set_fill(color);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.style.set_stroke(color);
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.state.style.set_stroke_width(width);
    }

    fn no_fill(&mut self) {
        self.state.style.has_fill = false;
    }

    fn no_stroke(&mut self) {
        self.state.style.has_stroke = false;
    }

    fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.state.style.stroke_style = style;
    }

    // ── text ──────────────────────────────────────────────────────────────

    fn set_font(&mut self, path: &Path, size: f32) -> bool {
        if self.pixmap.is_none() {
            return false;
        }
        if self.font.as_ref().is_some_and(|f| f.is_loaded_from(path, size)) {
            return true;
        }
        match FontFace::load(path, size) {
            Ok(face) => {
                self.font = Some(face);
                true
            }
            Err(err) => {
                log::warn!("software renderer: {err:#}");
                false
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color) {
        if self.pixmap.is_none() || text.is_empty() {
            return;
        }
        let Some(font) = self.font.as_ref() else {
            log::debug!("draw_text without a font ignored");
            return;
        };

        let tint = color.to_premul_u8();
        let base = self.state.matrix.pre_translate(x, y);
        let glyphs = font.rasterize(text);
        let Some(pixmap) = self.pixmap.as_mut() else { return };

        for glyph in glyphs {
            let Some(mut tile) = Pixmap::new(glyph.width as u32, glyph.height as u32) else {
                continue;
            };
            for (px, &cov) in tile.data_mut().chunks_exact_mut(4).zip(&glyph.coverage) {
                let cov = cov as u16;
                for (dst, &src) in px.iter_mut().zip(&tint) {
                    *dst = ((src as u16 * cov + 127) / 255) as u8;
                }
            }
            let at: Transform = base.pre_translate(glyph.origin.x, glyph.origin.y).into();
            pixmap.draw_pixmap(0, 0, tile.as_ref(), &PixmapPaint::default(), at, None);
        }
    }

    fn text_bounds(&self, text: &str) -> Vec2 {
        self.font.as_ref().map_or(Vec2::zero(), |f| f.measure(text))
    }

    // ── transform stack ───────────────────────────────────────────────────

    fn push_matrix(&mut self) {
        self.state.push_matrix();
    }

    fn pop_matrix(&mut self) {
        self.state.pop_matrix();
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.matrix = self.state.matrix.pre_translate(x, y);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.matrix = self.state.matrix.pre_rotate(radians);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.matrix = self.state.matrix.pre_scale(sx, sy);
    }

    fn reset_matrix(&mut self) {
        self.state.matrix = Affine::IDENTITY;
    }

    fn matrix(&self) -> Affine {
        self.state.matrix
    }

    // ── capture ───────────────────────────────────────────────────────────

    fn save_to_file(&self, path: &Path) -> bool {
        let Some(pixmap) = self.pixmap.as_ref() else {
            log::warn!("save_to_file on uninitialized renderer: {}", path.display());
            return false;
        };
        match capture::write_file(path, pixmap.width(), pixmap.height(), pixmap.data()) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("software renderer: {err:#}");
                false
            }
        }
    }

    fn save_to_memory(&self) -> Option<Vec<u8>> {
        let pixmap = self.pixmap.as_ref()?;
        capture::encode_png(pixmap.width(), pixmap.height(), pixmap.data())
            .map_err(|err| log::warn!("software renderer: {err:#}"))
            .ok()
    }

    fn pixel_buffer(&self) -> Option<&[u8]> {
        self.pixmap.as_ref().map(|p| p.data())
    }

    // ── introspection ─────────────────────────────────────────────────────

    fn kind(&self) -> RendererType {
        RendererType::Software
    }

    fn is_initialized(&self) -> bool {
        self.pixmap.is_some()
    }

    fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| p.width())
    }

    fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| p.height())
    }

    fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
