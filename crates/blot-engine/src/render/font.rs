use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// A coverage bitmap for one laid-out glyph.
pub(crate) struct GlyphCoverage {
    /// Top-left of the bitmap in text space (origin at the text anchor).
    pub origin: Vec2,
    pub width: usize,
    pub height: usize,
    /// Row-major 8-bit coverage.
    pub coverage: Vec<u8>,
}

/// A font file loaded at one pixel size.
///
/// Layout uses fontdue's `PositiveYDown` system, so `(0, 0)` is the top-left
/// of the first line.
pub struct FontFace {
    font: fontdue::Font,
    size: f32,
    path: PathBuf,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("path", &self.path)
            .field("size", &self.size)
            .finish()
    }
}

impl FontFace {
    /// Reads and parses a TrueType/OpenType file.
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        anyhow::ensure!(size.is_finite() && size > 0.0, "invalid font size {size}");
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading font file {}", path.display()))?;
        Self::from_bytes(&bytes, size).map(|mut face| {
            face.path = path.to_path_buf();
            face
        })
    }

    /// Parses font data already in memory.
    pub fn from_bytes(bytes: &[u8], size: f32) -> Result<Self> {
        anyhow::ensure!(size.is_finite() && size > 0.0, "invalid font size {size}");
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| anyhow::anyhow!("font parse error: {e}"))?;
        Ok(Self { font, size, path: PathBuf::new() })
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Source file; empty for faces built from bytes.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this face was loaded from `path` at `size`. Faces built from
    /// bytes match nothing.
    pub fn is_loaded_from(&self, path: &Path, size: f32) -> bool {
        !self.path.as_os_str().is_empty() && self.path == path && self.size == size
    }

    /// Laid-out `(width, height)` of `text`.
    ///
    /// Width is the furthest pen position after a glyph (advance extent), not
    /// the right edge of the last bitmap, so trailing spaces count.
    pub fn measure(&self, text: &str) -> Vec2 {
        if text.is_empty() {
            return Vec2::zero();
        }
        let layout = self.layout(text);
        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::zero();
        }

        let w = glyphs
            .iter()
            .map(|g| {
                let m = self.font.metrics_indexed(g.key.glyph_index, self.size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = layout.height().max(glyphs.iter().map(|g| g.y + g.height as f32).fold(0.0, f32::max));
        Vec2::new(w, h)
    }

    /// Rasterizes every visible glyph of `text`.
    pub(crate) fn rasterize(&self, text: &str) -> Vec<GlyphCoverage> {
        let layout = self.layout(text);
        layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .filter_map(|g| {
                let (metrics, coverage) = self.font.rasterize_config(g.key);
                (metrics.width > 0 && metrics.height > 0).then(|| GlyphCoverage {
                    origin: Vec2::new(g.x, g.y),
                    width: metrics.width,
                    height: metrics.height,
                    coverage,
                })
            })
            .collect()
    }

    fn layout(&self, text: &str) -> Layout<()> {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, self.size, 0));
        layout
    }
}

/// Font shipped with the crate's test data.
#[cfg(test)]
pub(crate) fn test_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/fonts/DejaVuSansMono.ttf")
}
