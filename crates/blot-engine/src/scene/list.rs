use crate::render::Renderer;

use super::DrawCmd;

/// Recorded command stream.
///
/// Insertion order is paint order. The list keeps its allocation across
/// `clear()` so a per-frame recording stops allocating once warmed.
///
/// ```ignore
/// let mut list = DrawList::new();
/// list.push(DrawCmd::SetFill(Color::black()));
/// list.push(DrawCmd::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
/// list.replay(&mut renderer);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    /// Drops recorded commands, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn last(&self) -> Option<&DrawCmd> {
        self.items.last()
    }

    /// Number of commands that touch pixels.
    pub fn drawing_count(&self) -> usize {
        self.items.iter().filter(|c| c.is_drawing()).count()
    }

    /// Issues every command against `r`, in order.
    pub fn replay(&self, r: &mut dyn Renderer) {
        self.replay_from(0, r);
    }

    /// Issues commands starting at index `start`. Out-of-range starts replay nothing.
    pub fn replay_from(&self, start: usize, r: &mut dyn Renderer) {
        for cmd in self.items.iter().skip(start) {
            cmd.apply(r);
        }
    }
}

impl Extend<DrawCmd> for DrawList {
    fn extend<T: IntoIterator<Item = DrawCmd>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Vec2};
    use crate::paint::Color;
    use crate::render::{Renderer, SoftwareRenderer};

    fn sample() -> DrawList {
        let mut list = DrawList::new();
        list.push(DrawCmd::Clear(Color::white()));
        list.push(DrawCmd::SetFill(Color::rgba(1.0, 0.0, 0.0, 1.0)));
        list.push(DrawCmd::NoStroke);
        list.push(DrawCmd::PushMatrix);
        list.push(DrawCmd::Translate(Vec2::new(4.0, 4.0)));
        list.push(DrawCmd::Rect(Rect::new(0.0, 0.0, 8.0, 8.0)));
        list.push(DrawCmd::PopMatrix);
        list.push(DrawCmd::Circle { center: Vec2::new(24.0, 24.0), radius: 5.0 });
        list
    }

    #[test]
    fn counts_only_pixel_commands() {
        assert_eq!(sample().drawing_count(), 3);
    }

    #[test]
    fn replay_matches_direct_calls() {
        let mut direct = SoftwareRenderer::new();
        assert!(direct.initialize(32, 32));
        direct.clear(Color::white());
        direct.set_fill_color(Color::rgba(1.0, 0.0, 0.0, 1.0));
        direct.no_stroke();
        direct.push_matrix();
        direct.translate(4.0, 4.0);
        direct.draw_rect(0.0, 0.0, 8.0, 8.0);
        direct.pop_matrix();
        direct.draw_circle(24.0, 24.0, 5.0);

        let mut replayed = SoftwareRenderer::new();
        assert!(replayed.initialize(32, 32));
        sample().replay(&mut replayed);

        assert_eq!(direct.pixel_buffer(), replayed.pixel_buffer());
    }

    #[test]
    fn replay_from_skips_prefix() {
        let mut r = SoftwareRenderer::new();
        assert!(r.initialize(16, 16));
        sample().replay_from(100, &mut r);
        assert!(r.pixel_buffer().unwrap().iter().all(|&b| b == 0));
    }
}
