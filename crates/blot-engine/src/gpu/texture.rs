use super::RenderCtx;

/// GPU copy of a canvas raster.
///
/// `Rgba8Unorm` holding the renderer's premultiplied pixels verbatim; the blit
/// pipeline blends with a premultiplied blend state.
pub struct CanvasTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl CanvasTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Allocates a `width` × `height` texture. `None` for a zero size.
    pub fn new(ctx: &RenderCtx<'_>, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("blot canvas texture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("canvas texture allocated at {width}x{height}");
        Some(Self { texture, view, width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }

    /// Copies a full RGBA8 frame into the texture. Returns `false` when the
    /// buffer length does not match the texture size.
    pub fn upload(&self, ctx: &RenderCtx<'_>, pixels: &[u8]) -> bool {
        if pixels.len() != frame_len(self.width, self.height) {
            log::warn!(
                "canvas texture upload: {} bytes for {}x{} texture",
                pixels.len(),
                self.width,
                self.height
            );
            return false;
        }
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d { width: self.width, height: self.height, depth_or_array_layers: 1 },
        );
        true
    }
}

#[inline]
fn frame_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}
