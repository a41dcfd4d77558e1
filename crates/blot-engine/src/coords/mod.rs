//! Coordinate and geometry types shared by renderers, canvases and graphics.
//!
//! Canonical CPU space:
//! - Pixels of the drawing target
//! - Origin top-left
//! - +X right, +Y down
//!
//! Rotations are in radians; positive angles turn clockwise on screen.

mod affine;
mod rect;
mod vec2;
mod viewport;

pub use affine::Affine;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
