//! Entity handles and the components the rendering layer reads.

mod components;
mod entity;

pub use components::{Draggable, Transform};
pub use entity::Entity;
