use uvfx::{GraphicsError, TextureDesc};
use wgpu::util::{DeviceExt, TextureDataOrder};

/// Overlay texture on the GPU. Dropping it releases the allocation.
#[derive(Debug)]
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    srgb_view: wgpu::TextureView,
    desc: TextureDesc,
}

impl GpuTexture {
    pub(crate) fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        desc: &TextureDesc,
        pixels: &[u8],
    ) -> Result<Self, GraphicsError> {
        check_upload(desc, pixels, device.limits().max_texture_dimension_2d)?;

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("uvfx overlay texture"),
                size: extent(desc),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[wgpu::TextureFormat::Rgba8UnormSrgb],
            },
            TextureDataOrder::LayerMajor,
            pixels,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let srgb_view = texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(wgpu::TextureFormat::Rgba8UnormSrgb),
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            srgb_view,
            desc: *desc,
        })
    }

    pub(crate) fn write(&self, queue: &wgpu::Queue, pixels: &[u8]) -> Result<(), GraphicsError> {
        if pixels.len() != self.desc.byte_len() {
            return Err(GraphicsError::Texture(format!(
                "frame holds {} bytes, texture expects {}",
                pixels.len(),
                self.desc.byte_len()
            )));
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.desc.width * 4),
                rows_per_image: Some(self.desc.height),
            },
            extent(&self.desc),
        );
        Ok(())
    }

    /// View to sample through. sRGB-tagged textures, and any texture drawn
    /// into a linear target, decode to linear light on sampling.
    pub(crate) fn sample_view(&self, linear_target: bool) -> &wgpu::TextureView {
        if self.desc.srgb || linear_target {
            &self.srgb_view
        } else {
            &self.view
        }
    }

    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }
}

fn extent(desc: &TextureDesc) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: desc.width,
        height: desc.height,
        depth_or_array_layers: 1,
    }
}

pub(crate) fn check_upload(
    desc: &TextureDesc,
    pixels: &[u8],
    max_dimension: u32,
) -> Result<(), GraphicsError> {
    if desc.width == 0 || desc.height == 0 {
        return Err(GraphicsError::Texture(format!(
            "texture size {}x{} is empty",
            desc.width, desc.height
        )));
    }
    if desc.width > max_dimension || desc.height > max_dimension {
        return Err(GraphicsError::Texture(format!(
            "texture size {}x{} exceeds GPU limit {max_dimension}",
            desc.width, desc.height
        )));
    }
    if pixels.len() != desc.byte_len() {
        return Err(GraphicsError::Texture(format!(
            "pixel buffer holds {} bytes, expected {}",
            pixels.len(),
            desc.byte_len()
        )));
    }
    Ok(())
}
