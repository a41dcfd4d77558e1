use crate::coords::Affine;
use crate::paint::DrawStyle;
use crate::scene::PathData;

/// CPU-side drawing state every backend keeps: style, matrix stack, open path.
#[derive(Debug, Clone, Default)]
pub(crate) struct RenderState {
    pub style: DrawStyle,
    pub matrix: Affine,
    stack: Vec<Affine>,
    path: Option<PathData>,
}

impl RenderState {
    /// Frame boundary: identity matrix, empty stack, no open path. Style is kept.
    pub fn begin_frame(&mut self) {
        self.matrix = Affine::IDENTITY;
        self.stack.clear();
        self.discard_path();
    }

    pub fn discard_path(&mut self) {
        if self.path.take().is_some_and(|p| !p.is_empty()) {
            log::debug!("discarding unfilled path");
        }
    }

    // ── matrix stack ──────────────────────────────────────────────────────

    pub fn push_matrix(&mut self) {
        self.stack.push(self.matrix);
    }

    /// Returns `false` (and leaves the matrix alone) on an empty stack.
    pub fn pop_matrix(&mut self) -> bool {
        match self.stack.pop() {
            Some(m) => {
                self.matrix = m;
                true
            }
            None => {
                log::debug!("pop_matrix on empty stack ignored");
                false
            }
        }
    }

    #[inline]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // ── path ──────────────────────────────────────────────────────────────

    pub fn begin_path(&mut self) {
        self.discard_path();
        self.path = Some(PathData::new());
    }

    /// The open path, if any.
    #[inline]
    pub fn path_mut(&mut self) -> Option<&mut PathData> {
        self.path.as_mut()
    }

    /// Closes out the open path for a fill/stroke.
    #[inline]
    pub fn take_path(&mut self) -> Option<PathData> {
        self.path.take()
    }

    #[inline]
    pub fn is_path_open(&self) -> bool {
        self.path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn push_pop_restores_exact_matrix() {
        let mut s = RenderState::default();
        s.matrix = s.matrix.pre_translate(3.0, 4.0).pre_rotate(0.3);
        let before = s.matrix;

        s.push_matrix();
        s.matrix = s.matrix.pre_scale(5.0, 5.0).pre_translate(-1.0, 9.0);
        assert!(s.pop_matrix());
        assert_eq!(s.matrix, before);
    }

    #[test]
    fn pop_on_empty_stack_is_noop() {
        let mut s = RenderState::default();
        s.matrix = Affine::from_translate(1.0, 2.0);
        assert!(!s.pop_matrix());
        assert_eq!(s.matrix, Affine::from_translate(1.0, 2.0));
    }

    #[test]
    fn begin_frame_resets_matrix_and_path_but_keeps_style() {
        let mut s = RenderState::default();
        s.style.stroke_width = 7.0;
        s.push_matrix();
        s.matrix = Affine::from_scale(2.0, 2.0);
        s.begin_path();
        s.path_mut().unwrap().line_to(Vec2::new(1.0, 1.0));

        s.begin_frame();
        assert!(s.matrix.is_identity());
        assert_eq!(s.stack_depth(), 0);
        assert!(!s.is_path_open());
        assert_eq!(s.style.stroke_width, 7.0);
    }

    #[test]
    fn take_path_closes_it() {
        let mut s = RenderState::default();
        s.begin_path();
        assert!(s.take_path().is_some());
        assert!(!s.is_path_open());
        assert!(s.take_path().is_none());
    }
}
