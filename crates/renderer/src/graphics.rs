use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use image::RgbaImage;
use uvfx::{ColorFormat, ColorSpace, DrawPass, Graphics, GraphicsError, TextureDesc};
use wgpu::util::DeviceExt;

use crate::canvas::Canvas;
use crate::context::GpuContext;
use crate::effect::{EffectParams, EffectProgram};
use crate::texture::GpuTexture;

/// [`Graphics`] backed by wgpu, drawing into an offscreen [`Canvas`].
pub struct WgpuGraphics {
    context: Arc<GpuContext>,
    canvas: Canvas,
}

impl WgpuGraphics {
    pub fn new(context: Arc<GpuContext>, width: u32, height: u32, space: ColorSpace) -> Self {
        let canvas = Canvas::new(&context.device, width, height, space);
        tracing::debug!(width, height, space = %space, "created offscreen canvas");
        Self { context, canvas }
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Fills the canvas with a solid colour, standing in for the filtered
    /// source's frame.
    pub fn clear(&self, rgba: [f64; 4]) {
        self.canvas
            .clear(&self.context.device, &self.context.queue, rgba);
    }

    pub fn read_canvas(&self) -> Result<RgbaImage> {
        self.canvas
            .read_rgba8(&self.context.device, &self.context.queue)
    }

    fn encode_draw(
        &self,
        effect: &EffectProgram,
        pass: &DrawPass<'_, GpuTexture>,
    ) -> wgpu::CommandBuffer {
        let device = &self.context.device;
        let linear_target = self.canvas.is_linear();
        let (target, format) = self.canvas.target(pass.texture.desc().srgb);

        let params = EffectParams::new(pass.multiplier);
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uvfx effect params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uvfx effect bind group"),
            layout: &effect.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(
                        pass.texture.sample_view(linear_target),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&effect.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });

        let (width, height) = viewport(
            pass.width,
            pass.height,
            self.canvas.width(),
            self.canvas.height(),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("uvfx draw encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("uvfx overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            effect.with_pipeline(device, pass.technique, format, pass.blend, |pipeline| {
                render_pass.set_pipeline(pipeline);
            });
            render_pass.set_bind_group(0, &bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }
        encoder.finish()
    }
}

/// Rejects a pass aimed at a target stored differently from the canvas.
fn check_target(
    format: ColorFormat,
    space: ColorSpace,
    canvas_space: ColorSpace,
) -> Result<(), GraphicsError> {
    if format == canvas_space.format() {
        return Ok(());
    }
    Err(GraphicsError::Draw(format!(
        "{space} target ({format:?}) does not match the {canvas_space} canvas"
    )))
}

/// Draw area: the target's base size, clipped to the canvas. A zero base size
/// covers the whole canvas.
fn viewport(base_width: u32, base_height: u32, canvas_width: u32, canvas_height: u32) -> (u32, u32) {
    if base_width == 0 || base_height == 0 {
        return (canvas_width, canvas_height);
    }
    (base_width.min(canvas_width), base_height.min(canvas_height))
}

impl Graphics for WgpuGraphics {
    type Texture = GpuTexture;
    type Effect = EffectProgram;

    fn load_effect(&self, path: &Path) -> Result<EffectProgram, GraphicsError> {
        EffectProgram::load(&self.context.device, path)
    }

    fn create_texture(&self, desc: &TextureDesc, pixels: &[u8]) -> Result<GpuTexture, GraphicsError> {
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let texture = GpuTexture::create(device, &self.context.queue, desc, pixels);
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(GraphicsError::Texture(error.to_string()));
        }
        texture
    }

    fn update_texture(&self, texture: &GpuTexture, pixels: &[u8]) -> Result<(), GraphicsError> {
        texture.write(&self.context.queue, pixels)
    }

    fn working_color_space(&self) -> ColorSpace {
        self.canvas.color_space()
    }

    fn draw(
        &self,
        effect: &EffectProgram,
        pass: &DrawPass<'_, GpuTexture>,
    ) -> Result<(), GraphicsError> {
        check_target(pass.format, pass.color_space, self.canvas.color_space())?;
        tracing::trace!(
            technique = %pass.technique,
            multiplier = pass.multiplier,
            target = %pass.color_space,
            "drawing overlay"
        );

        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let commands = self.encode_draw(effect, pass);
        self.context.queue.submit(Some(commands));
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(GraphicsError::Draw(error.to_string()));
        }
        Ok(())
    }
}
