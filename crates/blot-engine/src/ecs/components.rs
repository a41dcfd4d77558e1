use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Vec2};

/// Placement of an entity in its parent space. Rotation is in radians.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec2::zero(), rotation: 0.0, scale: Vec2::splat(1.0) }
    }
}

impl Transform {
    #[inline]
    pub fn from_position(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }

    /// Translate, then rotate, then scale (scale applies to points first).
    pub fn to_affine(&self) -> Affine {
        Affine::from_translate(self.position.x, self.position.y)
            .pre_rotate(self.rotation)
            .pre_scale(self.scale.x, self.scale.y)
    }
}

/// Pointer-drag state.
///
/// `drag_offset` is entity position minus pointer position at grab time, so
/// the entity keeps its grip point under the pointer while moving.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draggable {
    pub draggable: bool,
    pub dragging: bool,
    pub drag_offset: Vec2,
}

impl Default for Draggable {
    fn default() -> Self {
        Self { draggable: true, dragging: false, drag_offset: Vec2::zero() }
    }
}

impl Draggable {
    /// Starts a drag. Returns `false` when the entity is not draggable.
    pub fn begin_drag(&mut self, position: Vec2, pointer: Vec2) -> bool {
        if !self.draggable {
            return false;
        }
        self.dragging = true;
        self.drag_offset = position - pointer;
        true
    }

    /// New entity position for `pointer`, while dragging.
    #[inline]
    pub fn drag_to(&self, pointer: Vec2) -> Option<Vec2> {
        self.dragging.then(|| pointer + self.drag_offset)
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.drag_offset = Vec2::zero();
    }
}
