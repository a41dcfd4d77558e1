use std::rc::Rc;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

use crate::canvas::Canvas;
use crate::ecs::Entity;
use crate::graphics::SharedGraphics;
use crate::render::{create_shared_renderer, RendererType, SharedRenderer};

use super::RenderingSettings;

/// Sole owner of engine-level renderers, canvases and graphics.
///
/// Tables are keyed by [`Entity`] and keep insertion order, so teardown runs in
/// creation order. Renderers and graphics are handed out as shared handles;
/// the tables here stay canonical and extra handles only extend lifetime.
/// Canvases are owned uniquely and borrowed out.
///
/// Everything is single-threaded (`Rc<RefCell<..>>` handles). A renderer that
/// is borrowed elsewhere while the manager needs to shut it down is skipped
/// with a warning instead of panicking.
#[derive(Default)]
pub struct RenderingManager {
    main_renderer: Option<SharedRenderer>,
    renderers: IndexMap<Entity, SharedRenderer>,
    canvases: IndexMap<Entity, Canvas>,
    graphics: IndexMap<Entity, SharedGraphics>,
    settings: RenderingSettings,
}

impl RenderingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: RenderingSettings) -> Self {
        Self {
            main_renderer: None,
            renderers: IndexMap::new(),
            canvases: IndexMap::new(),
            graphics: IndexMap::new(),
            settings,
        }
    }

    // ── main renderer ─────────────────────────────────────────────────────

    pub fn set_main_renderer(&mut self, renderer: Option<SharedRenderer>) {
        self.main_renderer = renderer;
    }

    #[inline]
    pub fn main_renderer(&self) -> Option<SharedRenderer> {
        self.main_renderer.clone()
    }

    // ── renderers ─────────────────────────────────────────────────────────

    #[inline]
    pub fn renderer(&self, entity: Entity) -> Option<SharedRenderer> {
        self.renderers.get(&entity).cloned()
    }

    /// Creates and initializes a renderer for `entity`, replacing (and shutting
    /// down) any existing one. The entity's canvas, if any, is rebound to the
    /// new renderer.
    ///
    /// `None` when initialization fails; the entity keeps whatever it had.
    pub fn create_renderer(
        &mut self,
        entity: Entity,
        kind: RendererType,
        width: u32,
        height: u32,
    ) -> Option<SharedRenderer> {
        let renderer = create_shared_renderer(kind);
        if !renderer.borrow_mut().initialize(width, height) {
            log::warn!("{entity}: failed to initialize {kind} renderer at {width}x{height}");
            return None;
        }

        self.destroy_renderer(entity);
        if let Some(canvas) = self.canvases.get_mut(&entity) {
            canvas.set_renderer(renderer.clone());
        }
        log::debug!("{entity}: created {kind} renderer at {width}x{height}");
        self.renderers.insert(entity, renderer.clone());
        Some(renderer)
    }

    /// Removes and shuts down the entity's renderer, returning the handle.
    pub fn destroy_renderer(&mut self, entity: Entity) -> Option<SharedRenderer> {
        let renderer = self.renderers.shift_remove(&entity)?;
        shutdown_renderer(entity, &renderer);
        Some(renderer)
    }

    // ── canvases ──────────────────────────────────────────────────────────

    #[inline]
    pub fn canvas(&self, entity: Entity) -> Option<&Canvas> {
        self.canvases.get(&entity)
    }

    #[inline]
    pub fn canvas_mut(&mut self, entity: Entity) -> Option<&mut Canvas> {
        self.canvases.get_mut(&entity)
    }

    /// Stores `canvas` for `entity`. A previous canvas is shut down.
    pub fn add_canvas(&mut self, entity: Entity, canvas: Canvas) -> &mut Canvas {
        match self.canvases.entry(entity) {
            Entry::Occupied(mut slot) => {
                let mut old = slot.insert(canvas);
                old.shutdown();
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(canvas),
        }
    }

    /// Detaches the entity's canvas and hands it back.
    #[inline]
    pub fn remove_canvas(&mut self, entity: Entity) -> Option<Canvas> {
        self.canvases.shift_remove(&entity)
    }

    pub fn canvases(&self) -> impl Iterator<Item = (Entity, &Canvas)> {
        self.canvases.iter().map(|(e, c)| (*e, c))
    }

    pub fn canvases_mut(&mut self) -> impl Iterator<Item = (Entity, &mut Canvas)> {
        self.canvases.iter_mut().map(|(e, c)| (*e, c))
    }

    /// Renderer + canvas in one step. On failure the entity keeps its previous
    /// renderer and canvas.
    pub fn create_canvas(
        &mut self,
        entity: Entity,
        kind: RendererType,
        width: u32,
        height: u32,
    ) -> Option<&mut Canvas> {
        let renderer = self.create_renderer(entity, kind, width, height)?;
        Some(self.add_canvas(entity, Canvas::new(width, height, renderer)))
    }

    /// [`create_canvas`](Self::create_canvas) with the configured defaults.
    pub fn create_default_canvas(&mut self, entity: Entity) -> Option<&mut Canvas> {
        let s = &self.settings;
        let (kind, w, h) = (s.default_renderer, s.canvas_width, s.canvas_height);
        self.create_canvas(entity, kind, w, h)
    }

    /// Redraws the entity's canvas from its graphics over the configured
    /// background. `false` when either is missing or the draw fails.
    pub fn redraw(&mut self, entity: Entity) -> bool {
        let Some(graphics) = self.graphics.get(&entity) else { return false };
        let Some(canvas) = self.canvases.get_mut(&entity) else { return false };
        let Ok(graphics) = graphics.try_borrow() else {
            log::warn!("{entity}: graphics busy, redraw skipped");
            return false;
        };
        canvas.draw(&graphics, self.settings.background)
    }

    // ── graphics ──────────────────────────────────────────────────────────

    #[inline]
    pub fn graphics(&self, entity: Entity) -> Option<SharedGraphics> {
        self.graphics.get(&entity).cloned()
    }

    /// Stores `graphics` for `entity`, returning the one it replaces.
    pub fn add_graphics(&mut self, entity: Entity, graphics: SharedGraphics) -> Option<SharedGraphics> {
        self.graphics.insert(entity, graphics)
    }

    #[inline]
    pub fn remove_graphics(&mut self, entity: Entity) -> Option<SharedGraphics> {
        self.graphics.shift_remove(&entity)
    }

    // ── entities ──────────────────────────────────────────────────────────

    /// Drops everything the manager holds for `entity`. Returns whether
    /// anything was there.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let had_renderer = self.destroy_renderer(entity).is_some();
        let had_canvas = self.remove_canvas(entity).map(|mut c| c.shutdown()).is_some();
        let had_graphics = self.remove_graphics(entity).is_some();
        had_renderer || had_canvas || had_graphics
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.renderers.contains_key(&entity)
            || self.canvases.contains_key(&entity)
            || self.graphics.contains_key(&entity)
    }

    /// Every tracked entity, once, in first-insertion order across tables.
    pub fn entities(&self) -> Vec<Entity> {
        let set: IndexSet<Entity> = self
            .renderers
            .keys()
            .chain(self.canvases.keys())
            .chain(self.graphics.keys())
            .copied()
            .collect();
        set.into_iter().collect()
    }

    /// Number of distinct tracked entities.
    pub fn len(&self) -> usize {
        self.entities().len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty() && self.canvases.is_empty() && self.graphics.is_empty()
    }

    // ── teardown ──────────────────────────────────────────────────────────

    /// Shuts down every renderer once (main renderer included), every canvas,
    /// and empties all tables. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if self.is_empty() && self.main_renderer.is_none() {
            return;
        }
        log::debug!(
            "rendering cleanup: {} renderers, {} canvases, {} graphics",
            self.renderers.len(),
            self.canvases.len(),
            self.graphics.len()
        );

        for (_, mut canvas) in self.canvases.drain(..) {
            canvas.shutdown();
        }
        self.graphics.clear();

        let main = self.main_renderer.take();
        let mut main_done = false;
        for (entity, renderer) in self.renderers.drain(..) {
            if main.as_ref().is_some_and(|m| Rc::ptr_eq(m, &renderer)) {
                main_done = true;
            }
            shutdown_renderer(entity, &renderer);
        }
        if let Some(main) = main.filter(|_| !main_done) {
            match main.try_borrow_mut() {
                Ok(mut r) => r.shutdown(),
                Err(_) => log::warn!("main renderer busy during cleanup; not shut down"),
            }
        }
    }

    // ── settings ──────────────────────────────────────────────────────────

    #[inline]
    pub fn rendering_settings(&self) -> &RenderingSettings {
        &self.settings
    }

    /// Settings as a JSON document.
    pub fn settings(&self) -> serde_json::Value {
        self.settings.to_json().unwrap_or_else(|err| {
            log::warn!("{err:#}");
            serde_json::Value::Null
        })
    }

    /// Applies a settings document. Invalid documents leave the current
    /// settings untouched and return `false`.
    pub fn set_settings(&mut self, value: &serde_json::Value) -> bool {
        match RenderingSettings::from_json(value) {
            Ok(settings) => {
                self.settings = settings;
                true
            }
            Err(err) => {
                log::warn!("{err:#}");
                false
            }
        }
    }
}

impl Drop for RenderingManager {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn shutdown_renderer(entity: Entity, renderer: &SharedRenderer) {
    match renderer.try_borrow_mut() {
        Ok(mut r) => r.shutdown(),
        Err(_) => log::warn!("{entity}: renderer busy during shutdown; skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Graphics;
    use crate::paint::Color;
    use serde_json::json;

    const A: Entity = Entity::from_raw(1);
    const B: Entity = Entity::from_raw(2);

    // ── renderers ─────────────────────────────────────────────────────────

    #[test]
    fn create_then_destroy_leaves_no_renderer() {
        let mut m = RenderingManager::new();
        let r = m.create_renderer(A, RendererType::Software, 8, 8).unwrap();
        assert!(r.borrow().is_initialized());

        let returned = m.destroy_renderer(A).unwrap();
        assert!(Rc::ptr_eq(&r, &returned));
        assert!(!returned.borrow().is_initialized());
        assert!(m.renderer(A).is_none());
    }

    #[test]
    fn failed_initialization_stores_nothing() {
        let mut m = RenderingManager::new();
        assert!(m.create_renderer(A, RendererType::Software, 0, 8).is_none());
        assert!(!m.contains(A));
    }

    #[test]
    fn recreating_shuts_down_the_previous_renderer() {
        let mut m = RenderingManager::new();
        let first = m.create_renderer(A, RendererType::Software, 8, 8).unwrap();
        let second = m.create_renderer(A, RendererType::Recording, 4, 4).unwrap();
        assert!(!first.borrow().is_initialized());
        assert_eq!(second.borrow().kind(), RendererType::Recording);
        assert_eq!(m.renderer(A).unwrap().borrow().width(), 4);
    }

    #[test]
    fn recreating_rebinds_the_canvas() {
        let mut m = RenderingManager::new();
        m.create_canvas(A, RendererType::Software, 8, 8).unwrap();
        let next = m.create_renderer(A, RendererType::Software, 16, 12).unwrap();

        let canvas = m.canvas(A).unwrap();
        assert!(Rc::ptr_eq(canvas.renderer(), &next));
        assert!(canvas.renderer().borrow().is_initialized());
        assert_eq!((canvas.width(), canvas.height()), (16, 12));

        m.add_graphics(A, Graphics::new().shared());
        assert!(m.redraw(A));
    }

    #[test]
    fn failed_recreate_keeps_the_previous_set() {
        let mut m = RenderingManager::new();
        let first = m.create_canvas(A, RendererType::Software, 8, 8).unwrap().renderer().clone();

        assert!(m.create_canvas(A, RendererType::Recording, 0, 8).is_none());
        assert!(m.create_renderer(A, RendererType::Recording, 8, 0).is_none());

        let renderer = m.renderer(A).unwrap();
        assert!(Rc::ptr_eq(&renderer, &first));
        assert!(renderer.borrow().is_initialized());
        let canvas = m.canvas(A).unwrap();
        assert!(Rc::ptr_eq(canvas.renderer(), &first));
        assert_eq!(canvas.width(), 8);
    }

    #[test]
    fn busy_renderer_is_skipped_on_destroy() {
        let mut m = RenderingManager::new();
        let r = m.create_renderer(A, RendererType::Software, 8, 8).unwrap();
        let guard = r.borrow_mut();
        assert!(m.destroy_renderer(A).is_some());
        drop(guard);
        assert!(r.borrow().is_initialized());
    }

    // ── canvases & graphics ───────────────────────────────────────────────

    #[test]
    fn create_canvas_registers_renderer_and_canvas() {
        let mut m = RenderingManager::new();
        let canvas = m.create_canvas(A, RendererType::Software, 16, 9).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (16, 9));
        assert!(m.renderer(A).is_some());
        assert!(m.canvas(A).is_some());
        assert_eq!(m.canvases().count(), 1);
    }

    #[test]
    fn default_canvas_uses_settings() {
        let mut m = RenderingManager::new();
        assert!(m.set_settings(&json!({ "canvas_width": 32, "canvas_height": 16 })));
        let canvas = m.create_default_canvas(A).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (32, 16));
    }

    #[test]
    fn redraw_paints_graphics_into_canvas() {
        let mut m = RenderingManager::new();
        m.create_canvas(A, RendererType::Software, 4, 4).unwrap();
        let mut g = Graphics::new();
        g.no_stroke();
        g.set_fill(Color::black());
        g.rect(0.0, 0.0, 4.0, 4.0);
        m.add_graphics(A, g.shared());

        assert!(m.redraw(A));
        let r = m.renderer(A).unwrap();
        assert_eq!(&r.borrow().pixel_buffer().unwrap()[..4], &[0, 0, 0, 255]);
        assert!(!m.redraw(B));
    }

    #[test]
    fn destroy_entity_clears_every_table() {
        let mut m = RenderingManager::new();
        m.create_canvas(A, RendererType::Software, 4, 4).unwrap();
        m.add_graphics(A, Graphics::new().shared());
        m.add_graphics(B, Graphics::new().shared());

        assert!(m.destroy_entity(A));
        assert!(!m.contains(A));
        assert_eq!(m.entities(), vec![B]);
        assert!(!m.destroy_entity(A));
    }

    #[test]
    fn entities_are_counted_once() {
        let mut m = RenderingManager::new();
        m.create_canvas(A, RendererType::Software, 4, 4).unwrap();
        m.add_graphics(A, Graphics::new().shared());
        m.add_graphics(B, Graphics::new().shared());
        assert_eq!(m.len(), 2);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn cleanup_empties_everything_and_is_idempotent() {
        let mut m = RenderingManager::new();
        let r = m.create_renderer(A, RendererType::Software, 4, 4).unwrap();
        m.create_canvas(B, RendererType::Recording, 4, 4).unwrap();
        m.add_graphics(B, Graphics::new().shared());
        m.set_main_renderer(Some(r.clone()));

        m.cleanup();
        assert!(m.is_empty());
        assert!(m.main_renderer().is_none());
        assert!(!r.borrow().is_initialized());

        m.cleanup();
        assert!(m.is_empty());
    }

    #[test]
    fn cleanup_shuts_down_standalone_main_renderer() {
        let main = create_shared_renderer(RendererType::Software);
        assert!(main.borrow_mut().initialize(4, 4));

        let mut m = RenderingManager::new();
        m.set_main_renderer(Some(main.clone()));
        m.cleanup();
        assert!(!main.borrow().is_initialized());
    }

    #[test]
    fn drop_runs_cleanup() {
        let r = {
            let mut m = RenderingManager::new();
            m.create_renderer(A, RendererType::Software, 4, 4).unwrap()
        };
        assert!(!r.borrow().is_initialized());
    }

    // ── settings ──────────────────────────────────────────────────────────

    #[test]
    fn invalid_settings_are_ignored() {
        let mut m = RenderingManager::new();
        assert!(!m.set_settings(&json!({ "default_renderer": "vulkan" })));
        assert_eq!(m.rendering_settings(), &RenderingSettings::default());
    }

    #[test]
    fn settings_accept_renderer_display_names() {
        let mut m = RenderingManager::new();
        assert!(m.set_settings(&json!({ "default_renderer": "Recording" })));
        assert_eq!(m.rendering_settings().default_renderer, RendererType::Recording);
        assert!(m.set_settings(&json!({ "default_renderer": "blend2d" })));
        assert_eq!(m.rendering_settings().default_renderer, RendererType::Software);
    }

    #[test]
    fn settings_round_trip() {
        let mut m = RenderingManager::new();
        assert!(m.set_settings(&json!({ "default_renderer": "recording" })));
        let doc = m.settings();
        assert_eq!(doc["default_renderer"], "recording");

        let mut other = RenderingManager::new();
        assert!(other.set_settings(&doc));
        assert_eq!(other.rendering_settings(), m.rendering_settings());
    }
}
