//! Retained drawing commands.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands, one variant per renderer operation
//! - keep insertion order, which is paint order
//! - replay a recording into any `Renderer` backend

mod cmd;
mod list;
mod path;

pub use cmd::DrawCmd;
pub use list::DrawList;
pub use path::{PathData, PathVerb};
