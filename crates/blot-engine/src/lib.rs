//! blot rendering core.
//!
//! Backend-polymorphic 2D renderers, retained per-entity graphics and canvases,
//! the entity-keyed rendering manager that owns them, and the logging stack.

pub mod canvas;
pub mod coords;
pub mod ecs;
pub mod gpu;
pub mod graphics;
pub mod logging;
pub mod manager;
pub mod paint;
pub mod render;
pub mod scene;
