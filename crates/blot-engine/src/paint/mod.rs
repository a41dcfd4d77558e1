//! Paint model shared between renderers, graphics and the log console.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - stroke geometry options (cap, join, miter, dashes)
//! - the fill/stroke style a renderer draws immediate shapes with
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod stroke;
pub mod style;

pub use color::Color;
pub use stroke::{LineCap, LineJoin, StrokeStyle};
pub use style::DrawStyle;
