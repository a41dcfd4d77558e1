use super::Vec2;

/// Axis-aligned rectangle in target pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle of `size` centered on `center`. Used for ellipses.
    #[inline]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::from_origin_size(center - size * 0.5, size)
    }

    /// Smallest rectangle containing every point, or `None` for an empty slice.
    pub fn bounding(points: &[Vec2]) -> Option<Rect> {
        let (first, rest) = points.split_first()?;
        let (mut min, mut max) = (*first, *first);
        for p in rest {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Rect::from_origin_size(min, max - min))
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Flips negative extents so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 {
            (self.origin.x + self.size.x, -self.size.x)
        } else {
            (self.origin.x, self.size.x)
        };
        let (y, h) = if self.size.y < 0.0 {
            (self.origin.y + self.size.y, -self.size.y)
        } else {
            (self.origin.y, self.size.y)
        };
        Rect::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x < max.x && p.y < max.y
    }
}
