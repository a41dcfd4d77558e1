use super::Vec2;

/// 2x3 affine matrix.
///
/// Maps a point as:
///
/// ```text
/// x' = sx * x + kx * y + tx
/// y' = ky * x + sy * y + ty
/// ```
///
/// Field order matches `tiny_skia::Transform::from_row` so conversion is a copy.
/// The `pre_*` operations compose in local space: the new operation is applied
/// to points *before* the existing matrix, which is how a transform stack
/// (`translate` then `rotate`) behaves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub sx: f32,
    pub ky: f32,
    pub kx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { sx: 1.0, ky: 0.0, kx: 0.0, sy: 1.0, tx: 0.0, ty: 0.0 };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn from_translate(tx: f32, ty: f32) -> Self {
        Affine { tx, ty, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn from_scale(sx: f32, sy: f32) -> Self {
        Affine { sx, sy, ..Self::IDENTITY }
    }

    #[inline]
    pub fn from_rotate(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Affine { sx: cos, ky: sin, kx: -sin, sy: cos, tx: 0.0, ty: 0.0 }
    }

    /// Returns `self * other` (apply `other` first, then `self`).
    #[inline]
    pub fn pre_concat(self, other: Affine) -> Affine {
        Affine {
            sx: self.sx * other.sx + self.kx * other.ky,
            ky: self.ky * other.sx + self.sy * other.ky,
            kx: self.sx * other.kx + self.kx * other.sy,
            sy: self.ky * other.kx + self.sy * other.sy,
            tx: self.sx * other.tx + self.kx * other.ty + self.tx,
            ty: self.ky * other.tx + self.sy * other.ty + self.ty,
        }
    }

    #[inline]
    pub fn pre_translate(self, tx: f32, ty: f32) -> Affine {
        self.pre_concat(Affine::from_translate(tx, ty))
    }

    #[inline]
    pub fn pre_rotate(self, radians: f32) -> Affine {
        self.pre_concat(Affine::from_rotate(radians))
    }

    #[inline]
    pub fn pre_scale(self, sx: f32, sy: f32) -> Affine {
        self.pre_concat(Affine::from_scale(sx, sy))
    }

    #[inline]
    pub fn map_point(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.sx * p.x + self.kx * p.y + self.tx,
            self.ky * p.x + self.sy * p.y + self.ty,
        )
    }

    /// Inverse matrix, or `None` when the matrix is singular.
    pub fn invert(self) -> Option<Affine> {
        let det = self.sx * self.sy - self.kx * self.ky;
        if det.abs() <= f32::EPSILON || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            sx: self.sy * inv,
            ky: -self.ky * inv,
            kx: -self.kx * inv,
            sy: self.sx * inv,
            tx: (self.kx * self.ty - self.sy * self.tx) * inv,
            ty: (self.ky * self.tx - self.sx * self.ty) * inv,
        })
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        [self.sx, self.ky, self.kx, self.sy, self.tx, self.ty].iter().all(|v| v.is_finite())
    }
}

impl From<Affine> for tiny_skia::Transform {
    #[inline]
    fn from(m: Affine) -> Self {
        tiny_skia::Transform::from_row(m.sx, m.ky, m.kx, m.sy, m.tx, m.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn translate_then_scale_applies_scale_first() {
        let m = Affine::identity().pre_translate(10.0, 5.0).pre_scale(2.0, 3.0);
        assert!(approx(m.map_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 8.0)));
    }

    #[test]
    fn quarter_turn_is_clockwise_in_y_down_space() {
        let m = Affine::from_rotate(core::f32::consts::FRAC_PI_2);
        assert!(approx(m.map_point(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn invert_undoes_the_matrix() {
        let m = Affine::identity().pre_translate(3.0, -7.0).pre_rotate(0.7).pre_scale(2.0, 0.5);
        let inv = m.invert().unwrap();
        let p = Vec2::new(4.0, 9.0);
        assert!(approx(inv.map_point(m.map_point(p)), p));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Affine::from_scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn converts_to_skia_row_order() {
        let m = Affine { sx: 1.0, ky: 2.0, kx: 3.0, sy: 4.0, tx: 5.0, ty: 6.0 };
        let t: tiny_skia::Transform = m.into();
        assert_eq!((t.sx, t.ky, t.kx, t.sy, t.tx, t.ty), (1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
    }
}
