//! Entity-keyed ownership of renderers, canvases and graphics.

mod rendering;
mod settings;

pub use rendering::RenderingManager;
pub use settings::RenderingSettings;
