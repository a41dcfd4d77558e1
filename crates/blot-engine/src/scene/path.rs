use crate::coords::{Rect, Vec2};

/// One path construction step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathVerb {
    MoveTo(Vec2),
    LineTo(Vec2),
    /// Cubic Bézier: two control points, then the end point.
    CubicTo(Vec2, Vec2, Vec2),
    Close,
}

/// Renderer-agnostic path under construction.
///
/// Coordinates are stored as given; the renderer maps them through its current
/// matrix when the path is filled or stroked.
///
/// A `line_to`/`cubic_to` with no current point starts the sub-path at the
/// origin first, so `line_to(x, y)` on an empty path yields a segment from
/// (0, 0).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    verbs: Vec<PathVerb>,
    current: Option<Vec2>,
    subpath_start: Option<Vec2>,
}

impl PathData {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.verbs.push(PathVerb::MoveTo(p));
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    pub fn line_to(&mut self, p: Vec2) {
        self.ensure_current();
        self.verbs.push(PathVerb::LineTo(p));
        self.current = Some(p);
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) {
        self.ensure_current();
        self.verbs.push(PathVerb::CubicTo(c1, c2, to));
        self.current = Some(to);
    }

    /// Closes the current sub-path. A no-op on an empty path or right after
    /// another close.
    pub fn close(&mut self) {
        if self.current.is_none() || matches!(self.verbs.last(), Some(PathVerb::Close)) {
            return;
        }
        self.verbs.push(PathVerb::Close);
        self.current = self.subpath_start;
    }

    /// Builds a closed polygon through `points`.
    pub fn polygon(points: &[Vec2]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close();
        }
        path
    }

    #[inline]
    pub fn verbs(&self) -> &[PathVerb] {
        &self.verbs
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    #[inline]
    pub fn current_point(&self) -> Option<Vec2> {
        self.current
    }

    /// Control-point bounds (not the tight curve bounds).
    pub fn bounds(&self) -> Option<Rect> {
        let points: Vec<Vec2> = self
            .verbs
            .iter()
            .flat_map(|v| match *v {
                PathVerb::MoveTo(p) | PathVerb::LineTo(p) => vec![p],
                PathVerb::CubicTo(a, b, c) => vec![a, b, c],
                PathVerb::Close => Vec::new(),
            })
            .collect();
        Rect::bounding(&points)
    }

    /// Converts to a tiny-skia path. `None` when the path has no drawable
    /// geometry (fewer than two points).
    pub(crate) fn to_skia(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for verb in &self.verbs {
            match *verb {
                PathVerb::MoveTo(p) => pb.move_to(p.x, p.y),
                PathVerb::LineTo(p) => pb.line_to(p.x, p.y),
                PathVerb::CubicTo(a, b, c) => pb.cubic_to(a.x, a.y, b.x, b.y, c.x, c.y),
                PathVerb::Close => pb.close(),
            }
        }
        pb.finish()
    }

    fn ensure_current(&mut self) {
        if self.current.is_none() {
            self.move_to(Vec2::zero());
        }
    }
}
