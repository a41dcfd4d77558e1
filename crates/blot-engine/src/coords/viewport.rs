use super::Vec2;

/// Size of the surface being presented to, in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// From a physical surface size.
    #[inline]
    pub fn from_extent(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Pixel position to normalized device coordinates (+Y up). Must agree
    /// with the blit vertex shader.
    #[inline]
    pub fn to_ndc(self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.width * 2.0 - 1.0, 1.0 - p.y / self.height * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_ndc_extremes() {
        let vp = Viewport::from_extent(800, 600);
        assert_eq!(vp.to_ndc(Vec2::zero()), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Vec2::zero());
    }

    #[test]
    fn zero_size_is_invalid() {
        assert!(!Viewport::new(0.0, 10.0).is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
