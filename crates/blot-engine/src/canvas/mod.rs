//! Per-entity drawing targets.
//!
//! A [`Canvas`] pairs a renderer (the CPU raster the entity's graphics are
//! drawn into) with the GPU texture that raster is shown through, and the
//! editor's view state for it ([`CanvasView`]).

mod view;

pub use view::{CanvasView, Guide, GuideOrientation};

use crate::coords::{Rect, Vec2};
use crate::gpu::{CanvasBlitRenderer, CanvasTexture, RenderCtx, RenderTarget};
use crate::graphics::Graphics;
use crate::paint::Color;
use crate::render::SharedRenderer;

pub struct Canvas {
    width: u32,
    height: u32,
    renderer: SharedRenderer,
    texture: Option<CanvasTexture>,
    view: CanvasView,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_texture", &self.texture.is_some())
            .field("view", &self.view)
            .finish()
    }
}

impl Canvas {
    /// Wraps `renderer`; the renderer is expected to be initialized at
    /// `width` × `height` already.
    pub fn new(width: u32, height: u32, renderer: SharedRenderer) -> Self {
        Self { width, height, renderer, texture: None, view: CanvasView::default() }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn renderer(&self) -> &SharedRenderer {
        &self.renderer
    }

    #[inline]
    pub fn texture(&self) -> Option<&CanvasTexture> {
        self.texture.as_ref()
    }

    #[inline]
    pub fn view(&self) -> &CanvasView {
        &self.view
    }

    #[inline]
    pub fn view_mut(&mut self) -> &mut CanvasView {
        &mut self.view
    }

    /// Resizes the raster, dropping the GPU texture when the size changes.
    ///
    /// The canvas size is read back from the renderer, so it never disagrees
    /// with an initialized raster. Returns `false` for a zero size, a busy
    /// renderer, or a renderer that did not take the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        let Ok(mut r) = self.renderer.try_borrow_mut() else {
            log::warn!("canvas resize: renderer is busy");
            return false;
        };
        r.resize(width, height);
        let initialized = r.is_initialized();
        let actual = (r.width(), r.height());
        drop(r);

        if initialized && actual != (self.width, self.height) {
            (self.width, self.height) = actual;
            self.texture = None;
        }
        if actual != (width, height) {
            log::warn!("canvas resize to {width}x{height} not applied by the renderer");
            return false;
        }
        true
    }

    /// Points the canvas at another renderer, taking its size and dropping
    /// the GPU texture. View state is kept.
    pub(crate) fn set_renderer(&mut self, renderer: SharedRenderer) {
        if let Ok(r) = renderer.try_borrow() {
            self.width = r.width();
            self.height = r.height();
        }
        self.renderer = renderer;
        self.texture = None;
    }

    /// Redraws the raster: frame bracket, `background` clear, `graphics` replay.
    /// Returns `false` when the renderer is uninitialized or busy.
    pub fn draw(&mut self, graphics: &Graphics, background: Color) -> bool {
        let Ok(mut r) = self.renderer.try_borrow_mut() else {
            log::warn!("canvas draw: renderer is busy");
            return false;
        };
        if !r.is_initialized() {
            return false;
        }
        r.begin_frame();
        r.clear(background);
        graphics.render(&mut *r);
        r.end_frame();
        true
    }

    /// Uploads the raster into the canvas texture, (re)creating the texture
    /// when missing or sized differently.
    pub fn sync_texture(&mut self, ctx: &RenderCtx<'_>) -> bool {
        let Ok(r) = self.renderer.try_borrow() else {
            log::warn!("canvas texture sync: renderer is busy");
            return false;
        };
        let Some(pixels) = r.pixel_buffer() else { return false };
        let (w, h) = (r.width(), r.height());

        if !self.texture.as_ref().is_some_and(|t| t.matches(w, h)) {
            self.texture = CanvasTexture::new(ctx, w, h);
        }
        self.texture.as_ref().is_some_and(|t| t.upload(ctx, pixels))
    }

    /// Where the canvas lands on screen under the current zoom and offset.
    pub fn screen_rect(&self) -> Rect {
        Rect::from_origin_size(self.view.offset, self.size() * self.view.zoom)
    }

    /// Blits the synced texture at [`screen_rect`](Self::screen_rect).
    pub fn present(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        blit: &mut CanvasBlitRenderer,
    ) {
        if let Some(texture) = self.texture.as_ref() {
            blit.draw(ctx, target, texture, self.screen_rect());
        }
    }

    /// Releases the GPU texture. The renderer is left to its owner.
    pub fn shutdown(&mut self) {
        self.texture = None;
    }
}
