use serde::{Deserialize, Serialize};

use crate::coords::Vec2;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    Horizontal,
    Vertical,
}

/// Ruler guide, positioned in canvas pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub orientation: GuideOrientation,
    pub position: f32,
}

impl Guide {
    #[inline]
    pub const fn horizontal(y: f32) -> Self {
        Self { orientation: GuideOrientation::Horizontal, position: y }
    }

    #[inline]
    pub const fn vertical(x: f32) -> Self {
        Self { orientation: GuideOrientation::Vertical, position: x }
    }
}

/// Editor view of a canvas.
///
/// `screen = canvas * zoom + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasView {
    pub zoom: f32,
    pub offset: Vec2,
    pub show_rulers: bool,
    pub show_guides: bool,
    pub guides: Vec<Guide>,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::zero(),
            show_rulers: false,
            show_guides: false,
            guides: Vec::new(),
        }
    }
}

impl CanvasView {
    pub const MIN_ZOOM: f32 = 0.05;
    pub const MAX_ZOOM: f32 = 32.0;

    /// Clamped to `[MIN_ZOOM, MAX_ZOOM]`; non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        }
    }

    /// Zooms keeping the canvas point under `screen_anchor` fixed.
    pub fn zoom_at(&mut self, zoom: f32, screen_anchor: Vec2) {
        let anchor = self.screen_to_canvas(screen_anchor);
        self.set_zoom(zoom);
        self.offset = screen_anchor - anchor * self.zoom;
    }

    #[inline]
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    #[inline]
    pub fn screen_to_canvas(&self, p: Vec2) -> Vec2 {
        (p - self.offset) / self.zoom
    }

    #[inline]
    pub fn canvas_to_screen(&self, p: Vec2) -> Vec2 {
        p * self.zoom + self.offset
    }

    pub fn add_guide(&mut self, guide: Guide) {
        self.guides.push(guide);
    }

    /// Removes the guide at `index`, if any.
    pub fn remove_guide(&mut self, index: usize) -> Option<Guide> {
        (index < self.guides.len()).then(|| self.guides.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut v = CanvasView::default();
        v.set_zoom(1000.0);
        assert_eq!(v.zoom, CanvasView::MAX_ZOOM);
        v.set_zoom(0.0);
        assert_eq!(v.zoom, CanvasView::MIN_ZOOM);
        v.set_zoom(f32::NAN);
        assert_eq!(v.zoom, CanvasView::MIN_ZOOM);
    }

    #[test]
    fn screen_and_canvas_mapping_are_inverse() {
        let mut v = CanvasView::default();
        v.set_zoom(4.0);
        v.pan(Vec2::new(30.0, -10.0));
        let p = Vec2::new(12.5, 7.0);
        assert_eq!(v.screen_to_canvas(v.canvas_to_screen(p)), p);
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let mut v = CanvasView::default();
        v.pan(Vec2::new(5.0, 5.0));
        let anchor = Vec2::new(105.0, 55.0);
        let before = v.screen_to_canvas(anchor);
        v.zoom_at(2.0, anchor);
        assert_eq!(v.screen_to_canvas(anchor), before);
    }

    #[test]
    fn view_state_persists_as_json() {
        let mut v = CanvasView { show_rulers: true, ..CanvasView::default() };
        v.add_guide(Guide::vertical(12.0));
        let doc = serde_json::to_value(&v).unwrap();
        assert_eq!(doc["guides"][0]["orientation"], "vertical");
        assert_eq!(serde_json::from_value::<CanvasView>(doc).unwrap(), v);
    }

    #[test]
    fn guides_add_and_remove() {
        let mut v = CanvasView::default();
        v.add_guide(Guide::horizontal(10.0));
        v.add_guide(Guide::vertical(20.0));
        assert_eq!(v.remove_guide(0), Some(Guide::horizontal(10.0)));
        assert_eq!(v.remove_guide(5), None);
        assert_eq!(v.guides, vec![Guide::vertical(20.0)]);
    }
}
