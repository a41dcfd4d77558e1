use std::path::Path;

use crate::coords::{Affine, Vec2};
use crate::paint::{Color, StrokeStyle};

use super::RendererType;

/// Drawing surface contract implemented by every backend.
///
/// Coordinates are target pixels (top-left origin, +Y down) mapped through the
/// current matrix. Colors are premultiplied.
///
/// Frame model:
/// - `begin_frame` resets the matrix to identity, empties the matrix stack and
///   discards any open path.
/// - `end_frame` discards any open path and advances `frame_index`.
/// - The raster persists across frames until `clear`, `resize` or `shutdown`.
///
/// Path model:
/// - `begin_path` opens an empty path (discarding any open one).
/// - path ops without an open path are ignored.
/// - `fill` and `stroke` consume the open path; a second `fill`/`stroke`
///   without a new `begin_path` does nothing.
pub trait Renderer {
    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Allocates a `width` × `height` raster. Returns `false` (and stays
    /// uninitialized) for a zero size or when allocation fails.
    fn initialize(&mut self, width: u32, height: u32) -> bool;

    /// Releases the raster and resets all state. Idempotent.
    fn shutdown(&mut self);

    /// Reallocates the raster, discarding its content. Ignored when
    /// uninitialized or for a zero size.
    fn resize(&mut self, width: u32, height: u32);

    fn begin_frame(&mut self);
    fn end_frame(&mut self);

    /// Fills the whole raster with `color`, ignoring the matrix.
    fn clear(&mut self, color: Color);

    // ── immediate primitives ──────────────────────────────────────────────

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32);
    /// `(x, y)` is the center; `width`/`height` are the diameters.
    fn draw_ellipse(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn draw_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32);
    /// Closed polygon; fewer than three points draws nothing.
    fn draw_polygon(&mut self, points: &[Vec2]);

    // ── retained path ─────────────────────────────────────────────────────

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    /// Cubic Bézier to `(x, y)` through control points `(cx1, cy1)`, `(cx2, cy2)`.
    fn curve_to(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32);
    fn close_path(&mut self);
    fn fill(&mut self, color: Color);
    fn stroke(&mut self, color: Color, width: f32);
    fn is_path_open(&self) -> bool;

    // ── style ─────────────────────────────────────────────────────────────

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_stroke_width(&mut self, width: f32);
    fn no_fill(&mut self);
    fn no_stroke(&mut self);
    fn set_stroke_style(&mut self, style: StrokeStyle);

    // ── text ──────────────────────────────────────────────────────────────

    /// Loads a TrueType/OpenType font file at `size` px. On failure, or while
    /// uninitialized, the previous font stays active. Asking again for the
    /// active font and size does not reread the file.
    fn set_font(&mut self, path: &Path, size: f32) -> bool;
    /// Draws `text` with the top-left of its first line at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, color: Color);
    /// Laid-out `(width, height)`; zero without a font or for empty text.
    fn text_bounds(&self, text: &str) -> Vec2;

    // ── transform stack ───────────────────────────────────────────────────

    fn push_matrix(&mut self);
    /// Restores the most recently pushed matrix. No-op on an empty stack.
    fn pop_matrix(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    fn reset_matrix(&mut self);
    fn matrix(&self) -> Affine;

    // ── capture ───────────────────────────────────────────────────────────

    /// Encodes the raster to `path`; the format follows the extension.
    fn save_to_file(&self, path: &Path) -> bool;
    /// PNG-encoded raster.
    fn save_to_memory(&self) -> Option<Vec<u8>>;
    /// Premultiplied RGBA8 rows, `width * height * 4` bytes.
    fn pixel_buffer(&self) -> Option<&[u8]>;

    // ── introspection ─────────────────────────────────────────────────────

    fn kind(&self) -> RendererType;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn is_initialized(&self) -> bool;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn frame_index(&self) -> u64;
}
