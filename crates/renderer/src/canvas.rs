use anyhow::{anyhow, Context, Result};
use image::RgbaImage;
use uvfx::decode::linear_to_srgb;
use uvfx::{ColorFormat, ColorSpace};

/// Offscreen render target standing in for the filter target.
pub struct Canvas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    srgb_view: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
    color_space: ColorSpace,
}

impl Canvas {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, color_space: ColorSpace) -> Self {
        let format = texture_format(color_space.format());
        let view_formats: &[wgpu::TextureFormat] = if format == wgpu::TextureFormat::Rgba8Unorm {
            &[wgpu::TextureFormat::Rgba8UnormSrgb]
        } else {
            &[]
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("uvfx canvas"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats,
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let srgb_view = (!view_formats.is_empty()).then(|| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                format: Some(wgpu::TextureFormat::Rgba8UnormSrgb),
                ..Default::default()
            })
        });

        Self {
            texture,
            view,
            srgb_view,
            width: width.max(1),
            height: height.max(1),
            color_space,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Render view plus its format. `linear_blend` selects the sRGB view of an
    /// 8-bit canvas so blending happens in linear light.
    pub(crate) fn target(&self, linear_blend: bool) -> (&wgpu::TextureView, wgpu::TextureFormat) {
        match (&self.srgb_view, linear_blend) {
            (Some(view), true) => (view, wgpu::TextureFormat::Rgba8UnormSrgb),
            _ => (&self.view, self.texture.format()),
        }
    }

    /// True when shader output lands in linear light.
    pub(crate) fn is_linear(&self) -> bool {
        self.texture.format() == wgpu::TextureFormat::Rgba16Float
    }

    pub fn clear(&self, device: &wgpu::Device, queue: &wgpu::Queue, rgba: [f64; 4]) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("uvfx canvas clear"),
        });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: rgba[0],
                            g: rgba[1],
                            b: rgba[2],
                            a: rgba[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }
        queue.submit(Some(encoder.finish()));
    }

    /// Copies the canvas back to the CPU as 8-bit sRGB.
    pub fn read_rgba8(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<RgbaImage> {
        let bytes_per_pixel = self.texture.format().block_copy_size(None).unwrap_or(4);
        let unpadded_bytes_per_row = self.width * bytes_per_pixel;
        let padded_bytes_per_row = align_to(unpadded_bytes_per_row, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uvfx canvas readback"),
            size: u64::from(padded_bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("uvfx readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device
            .poll(wgpu::PollType::Wait)
            .map_err(|err| anyhow!("wgpu poll failed: {err}"))?;
        receiver
            .recv()
            .context("readback channel closed")?
            .context("failed to map readback buffer")?;

        let mapped = slice.get_mapped_range();
        let rows = tight_rows(
            &mapped,
            unpadded_bytes_per_row as usize,
            padded_bytes_per_row as usize,
            self.height as usize,
        );
        drop(mapped);
        readback.unmap();

        let pixels = if self.is_linear() {
            half_to_srgb8(&rows)
        } else {
            rows
        };
        RgbaImage::from_raw(self.width, self.height, pixels)
            .ok_or_else(|| anyhow!("readback size does not match {}x{}", self.width, self.height))
    }
}

pub(crate) fn texture_format(format: ColorFormat) -> wgpu::TextureFormat {
    match format {
        ColorFormat::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
        ColorFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

fn tight_rows(data: &[u8], row_bytes: usize, padded_row_bytes: usize, rows: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(row_bytes * rows);
    for row in 0..rows {
        let start = row * padded_row_bytes;
        out.extend_from_slice(&data[start..start + row_bytes]);
    }
    out
}

/// Converts linear half-float RGBA to sRGB-encoded RGBA8, clamping HDR values.
fn half_to_srgb8(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(8)
        .flat_map(|texel| {
            let channel = |index: usize| {
                half::f16::from_le_bytes([texel[index * 2], texel[index * 2 + 1]]).to_f32()
            };
            [
                linear_to_srgb(channel(0)),
                linear_to_srgb(channel(1)),
                linear_to_srgb(channel(2)),
                (channel(3).clamp(0.0, 1.0) * 255.0).round() as u8,
            ]
        })
        .collect()
}
