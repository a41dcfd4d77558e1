use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};

// ── blend ─────────────────────────────────────────────────────────────────

/// Canvas pixels are premultiplied, so the source factor is `One`.
pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

// ── blit uniform ──────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct BlitUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
    pub dst_origin: [f32; 2],
    pub dst_size: [f32; 2],
}

impl BlitUniform {
    pub(super) fn new(viewport: Viewport, dst: Rect) -> Self {
        let dst = dst.normalized();
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
            dst_origin: [dst.origin.x, dst.origin.y],
            dst_size: [dst.size.x, dst.size.y],
        }
    }

    #[inline]
    pub(super) fn min_binding_size() -> Option<std::num::NonZeroU64> {
        std::num::NonZeroU64::new(std::mem::size_of::<Self>() as u64)
    }
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1, doubles as uv
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<BlitUniform>(), 32);
        assert_eq!(BlitUniform::min_binding_size().map(|n| n.get()), Some(32));
    }

    #[test]
    fn uniform_normalizes_destination() {
        let u = BlitUniform::new(Viewport::new(800.0, 600.0), Rect::new(100.0, 50.0, -20.0, 10.0));
        assert_eq!(u.dst_origin, [80.0, 50.0]);
        assert_eq!(u.dst_size, [20.0, 10.0]);
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let u = BlitUniform::new(Viewport::new(0.0, 0.0), Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(u.viewport, [1.0, 1.0]);
    }

    #[test]
    fn quad_indices_cover_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }
}
