use super::{Color, StrokeStyle};

/// Fill/stroke state immediate shapes are drawn with.
///
/// Defaults follow the sketch convention: white fill, black 1px stroke, both on.
/// Setting a fill or stroke color turns that part back on.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    pub has_fill: bool,
    pub has_stroke: bool,
    pub stroke_style: StrokeStyle,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            fill: Color::white(),
            stroke: Color::black(),
            stroke_width: 1.0,
            has_fill: true,
            has_stroke: true,
            stroke_style: StrokeStyle::default(),
        }
    }
}

impl DrawStyle {
    #[inline]
    pub fn set_fill(&mut self, color: Color) {
        self.fill = color;
        self.has_fill = true;
    }

    #[inline]
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke = color;
        self.has_stroke = true;
    }

    /// Negative or non-finite widths are stored as zero (no stroke output).
    #[inline]
    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    /// Color to fill closed shapes with, if filling is enabled.
    #[inline]
    pub fn active_fill(&self) -> Option<Color> {
        self.has_fill.then_some(self.fill)
    }

    /// Color and width to stroke outlines with, if stroking is enabled and visible.
    #[inline]
    pub fn active_stroke(&self) -> Option<(Color, f32)> {
        (self.has_stroke && self.stroke_width > 0.0).then_some((self.stroke, self.stroke_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_color_reenables_part() {
        let mut s = DrawStyle::default();
        s.has_fill = false;
        s.has_stroke = false;
        assert!(s.active_fill().is_none());
        assert!(s.active_stroke().is_none());

        s.set_fill(Color::black());
        s.set_stroke(Color::white());
        assert_eq!(s.active_fill(), Some(Color::black()));
        assert_eq!(s.active_stroke(), Some((Color::white(), 1.0)));
    }

    #[test]
    fn zero_width_disables_stroke_output() {
        let mut s = DrawStyle::default();
        s.set_stroke_width(-3.0);
        assert_eq!(s.stroke_width, 0.0);
        assert!(s.active_stroke().is_none());
    }
}
