//! Backend-polymorphic 2D drawing surface.
//!
//! `Renderer` is a flat capability set: frame brackets, immediate shape
//! primitives, a retained path, style, text, a transform stack and output
//! capture. Backends implement all of it; callers hold them as
//! `Box<dyn Renderer>` or, when several consumers need the same instance, as a
//! [`SharedRenderer`].
//!
//! Failure policy: `initialize` reports setup failure by returning `false`.
//! Every other operation on an uninitialized renderer is a silent no-op, and
//! capture operations return `false`/`None`.

mod capture;
mod font;
mod kind;
mod recording;
mod renderer;
mod software;
mod state;

pub use font::FontFace;
#[cfg(test)]
pub(crate) use font::test_font_path;
pub use kind::{
    available_renderer_names, create_renderer, create_shared_renderer, RendererType,
    SharedRenderer, UnknownRendererType,
};
pub use recording::RecordingRenderer;
pub use renderer::Renderer;
pub use software::SoftwareRenderer;
pub(crate) use state::RenderState;
