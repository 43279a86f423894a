use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bytemuck::{Pod, Zeroable};
use uvfx::{BlendFactor, BlendFunction, GraphicsError, Technique};

/// Target formats a compiled effect can draw into.
pub(crate) const TARGET_FORMATS: [wgpu::TextureFormat; 3] = [
    wgpu::TextureFormat::Rgba8Unorm,
    wgpu::TextureFormat::Rgba8UnormSrgb,
    wgpu::TextureFormat::Rgba16Float,
];

pub(crate) const VERTEX_ENTRY: &str = "vs_main";

/// Uniform block bound next to the overlay texture.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct EffectParams {
    pub multiplier: f32,
    pub _pad: [f32; 3],
}

impl EffectParams {
    pub fn new(multiplier: f32) -> Self {
        Self {
            multiplier,
            _pad: [0.0; 3],
        }
    }
}

/// Fragment entry point implementing `technique`.
pub(crate) fn fragment_entry(technique: Technique) -> &'static str {
    match technique {
        Technique::Draw => "fs_draw",
        Technique::DrawMultiply => "fs_draw_multiply",
        Technique::DrawTonemap => "fs_draw_tonemap",
        Technique::DrawMultiplyTonemap => "fs_draw_multiply_tonemap",
    }
}

fn blend_factor(factor: BlendFactor) -> wgpu::BlendFactor {
    match factor {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
    }
}

/// Colour uses the requested factors; alpha always accumulates coverage.
pub(crate) fn blend_state(blend: BlendFunction) -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: blend_factor(blend.src),
            dst_factor: blend_factor(blend.dst),
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    technique: Technique,
    format: wgpu::TextureFormat,
    blend: BlendFunction,
}

/// Compiled overlay effect: one pipeline per technique, target format and
/// blend function, created on first use.
pub struct EffectProgram {
    source: PathBuf,
    module: wgpu::ShaderModule,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pub(crate) sampler: wgpu::Sampler,
    pipelines: Mutex<HashMap<PipelineKey, wgpu::RenderPipeline>>,
}

impl EffectProgram {
    /// Reads and compiles the WGSL at `path`, building the alpha-over
    /// pipelines up front so shader errors surface here.
    pub fn load(device: &wgpu::Device, path: &Path) -> Result<Self, GraphicsError> {
        let effect_error = |reason: String| GraphicsError::Effect {
            path: path.to_path_buf(),
            reason,
        };
        let code = std::fs::read_to_string(path)
            .map_err(|err| effect_error(format!("failed to read effect: {err}")))?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("uvfx effect"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(code)),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uvfx effect layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("uvfx effect pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let program = Self {
            source: path.to_path_buf(),
            module,
            bind_group_layout,
            pipeline_layout,
            sampler,
            pipelines: Mutex::new(HashMap::new()),
        };

        {
            let mut pipelines = program.lock_pipelines();
            for technique in Technique::ALL {
                for format in TARGET_FORMATS {
                    let key = PipelineKey {
                        technique,
                        format,
                        blend: BlendFunction::ALPHA_OVER,
                    };
                    pipelines.insert(key, program.create_pipeline(device, key));
                }
            }
        }

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(effect_error(error.to_string()));
        }

        tracing::debug!(path = %path.display(), "compiled overlay effect");
        Ok(program)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Runs `f` with the pipeline for the given technique, format and blend.
    pub(crate) fn with_pipeline<R>(
        &self,
        device: &wgpu::Device,
        technique: Technique,
        format: wgpu::TextureFormat,
        blend: BlendFunction,
        f: impl FnOnce(&wgpu::RenderPipeline) -> R,
    ) -> R {
        let key = PipelineKey {
            technique,
            format,
            blend,
        };
        let mut pipelines = self.lock_pipelines();
        let pipeline = pipelines
            .entry(key)
            .or_insert_with(|| self.create_pipeline(device, key));
        f(pipeline)
    }

    fn lock_pipelines(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<PipelineKey, wgpu::RenderPipeline>> {
        self.pipelines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn create_pipeline(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(fragment_entry(key.technique)),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.module,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &self.module,
                entry_point: Some(fragment_entry(key.technique)),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.format,
                    blend: Some(blend_state(key.blend)),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader_source() -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/uvfx.wgsl");
        std::fs::read_to_string(path).expect("effect source")
    }

    #[test]
    fn effect_parses_and_validates() {
        let module = naga::front::wgsl::parse_str(&shader_source()).expect("parse wgsl");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("valid module");
    }

    #[test]
    fn every_technique_has_an_entry_point() {
        let module = naga::front::wgsl::parse_str(&shader_source()).expect("parse wgsl");
        let entries = module
            .entry_points
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert!(entries.contains(&VERTEX_ENTRY));
        for technique in Technique::ALL {
            assert!(
                entries.contains(&fragment_entry(technique)),
                "missing {technique}"
            );
        }
    }

    #[test]
    fn effect_declares_named_inputs() {
        let module = naga::front::wgsl::parse_str(&shader_source()).expect("parse wgsl");
        let names = module
            .global_variables
            .iter()
            .filter_map(|(_, var)| var.name.as_deref())
            .collect::<Vec<_>>();
        assert!(names.contains(&uvfx::TEXTURE_PARAM));
        let params = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("Params"))
            .expect("params struct");
        match &params.1.inner {
            naga::TypeInner::Struct { members, span } => {
                assert_eq!(members[0].name.as_deref(), Some(uvfx::MULTIPLIER_PARAM));
                assert_eq!(*span as usize, std::mem::size_of::<EffectParams>());
            }
            other => panic!("unexpected params type {other:?}"),
        }
    }

    #[test]
    fn alpha_over_maps_to_src_alpha_blend() {
        let state = blend_state(BlendFunction::ALPHA_OVER);
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(state.alpha.src_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn params_are_sixteen_bytes() {
        let params = EffectParams::new(3.75);
        assert_eq!(bytemuck::bytes_of(&params).len(), 16);
        assert_eq!(&bytemuck::bytes_of(&params)[..4], &3.75f32.to_ne_bytes());
    }
}
