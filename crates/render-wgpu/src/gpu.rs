use crate::shaders;
use cubecross_geometry::{
    CUBE_COLORS, CUBE_INDICES, CUBE_POSITIONS, MeshError, validate_mesh,
};
use cubecross_render::binding::{ATTRIB_COLOR, ATTRIB_POSITION, LOCATION_COLOR, LOCATION_POSITION};
use cubecross_render::{FramePlan, FrameUniforms, Renderer, ResolvedDraw};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const UNIFORM_SIZE: u64 = std::mem::size_of::<FrameUniforms>() as u64;

/// Errors from building or driving the wgpu backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),
    #[error("pipeline creation failed: {0}")]
    Pipeline(String),
    #[error("invalid cube mesh: {0}")]
    Mesh(#[from] MeshError),
}

/// Run `f` inside a validation error scope and surface any captured error.
fn validated<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
    on_error: impl FnOnce(String) -> RenderError,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(on_error(err.to_string())),
        None => Ok(value),
    }
}

/// Pack one uniform block per draw at `stride`-byte offsets.
fn uniform_bytes(draws: &[ResolvedDraw], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; draws.len() * stride];
    for (slot, draw) in bytes.chunks_exact_mut(stride).zip(draws) {
        slot[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&draw.uniforms));
    }
    bytes
}

fn to_color(c: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: c[0] as f64,
        g: c[1] as f64,
        b: c[2] as f64,
        a: c[3] as f64,
    }
}

/// wgpu-based cube renderer.
///
/// Every draw in a frame gets its own slot in a dynamic-offset uniform
/// buffer, so each cube sees the projection uploaded just before it.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_slots: usize,
    position_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    /// Upload the cube and build the pipeline. `draws_per_frame` sizes the
    /// uniform buffer; it grows on demand if a frame needs more.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        draws_per_frame: usize,
    ) -> Result<Self, RenderError> {
        let stats = validate_mesh(&CUBE_POSITIONS, &CUBE_COLORS, &CUBE_INDICES)?;
        tracing::debug!(
            vertices = stats.vertex_count,
            triangles = stats.triangle_count,
            "uploading cube mesh"
        );

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_position_buffer"),
            contents: bytemuck::cast_slice(&CUBE_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_color_buffer"),
            contents: bytemuck::cast_slice(&CUBE_COLORS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = validated(
            device,
            || {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("cube_shader"),
                    source: wgpu::ShaderSource::Wgsl(shaders::CUBE_SHADER.into()),
                })
            },
            RenderError::ShaderCompile,
        )?;

        let pipeline = validated(
            device,
            || {
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("cube_pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[
                            wgpu::VertexBufferLayout {
                                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &[wgpu::VertexAttribute {
                                    format: wgpu::VertexFormat::Float32x3,
                                    offset: 0,
                                    shader_location: LOCATION_POSITION,
                                }],
                            },
                            wgpu::VertexBufferLayout {
                                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &[wgpu::VertexAttribute {
                                    format: wgpu::VertexFormat::Float32x3,
                                    offset: 0,
                                    shader_location: LOCATION_COLOR,
                                }],
                            },
                        ],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: surface_format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::LessEqual,
                        stencil: Default::default(),
                        bias: Default::default(),
                    }),
                    multisample: Default::default(),
                    multiview: None,
                    cache: None,
                })
            },
            RenderError::Pipeline,
        )?;

        tracing::debug!(
            "{ATTRIB_POSITION} at location {LOCATION_POSITION}, {ATTRIB_COLOR} at location {LOCATION_COLOR}, format {surface_format:?}"
        );

        let uniform_stride = wgpu::util::align_to(
            UNIFORM_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let uniform_slots = draws_per_frame.max(1);
        let (uniform_buffer, uniform_bind_group) =
            Self::create_uniforms(device, &bind_group_layout, uniform_stride, uniform_slots);

        let depth_texture = Self::create_depth_texture(device, width, height);

        Ok(Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_slots,
            position_buffer,
            color_buffer,
            index_buffer,
            depth_texture,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Bind this renderer to a frame's device, queue and target view.
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        view: &'a wgpu::TextureView,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            renderer: self,
            device,
            queue,
            view,
        }
    }

    /// Render one frame plan into `view`. Returns the number of draws issued.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) -> usize {
        let draws = plan.resolve_draws();
        if draws.len() > self.uniform_slots {
            tracing::debug!(
                from = self.uniform_slots,
                to = draws.len(),
                "growing uniform buffer"
            );
            self.uniform_slots = draws.len();
            (self.uniform_buffer, self.uniform_bind_group) = Self::create_uniforms(
                device,
                &self.bind_group_layout,
                self.uniform_stride,
                self.uniform_slots,
            );
        }
        if !draws.is_empty() {
            queue.write_buffer(
                &self.uniform_buffer,
                0,
                &uniform_bytes(&draws, self.uniform_stride),
            );
        }

        let (clear_color, clear_depth) = plan.clear().unwrap_or(([0.0, 0.0, 0.0, 1.0], 1.0));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(to_color(clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.position_buffer.slice(..));
            pass.set_vertex_buffer(1, self.color_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (i, draw) in draws.iter().enumerate() {
                let offset = (i as u64 * self.uniform_stride) as wgpu::DynamicOffset;
                pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                pass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        draws.len()
    }

    fn create_uniforms(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_SIZE),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// A [`WgpuRenderer`] bound to one frame's target.
pub struct WgpuFrame<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
}

impl Renderer for WgpuFrame<'_> {
    type Output = usize;

    fn render(&mut self, plan: &FramePlan) -> usize {
        self.renderer
            .render(self.device, self.queue, self.view, plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubecross_render::FrameLoop;
    use cubecross_transform::{SceneConfig, TransformState};

    #[test]
    fn uniform_bytes_places_each_draw_at_its_stride() {
        let config = SceneConfig::default();
        let mut state = TransformState::new(&config, 1.0);
        let plan = FrameLoop::from_config(&config).frame(0.0, &mut state);
        let draws = plan.resolve_draws();

        let stride = 256;
        let bytes = uniform_bytes(&draws, stride);
        assert_eq!(bytes.len(), draws.len() * stride as usize);

        for (i, draw) in draws.iter().enumerate() {
            let start = i * stride as usize;
            let slot = &bytes[start..start + UNIFORM_SIZE as usize];
            assert_eq!(slot, bytemuck::bytes_of(&draw.uniforms));
            assert!(bytes[start + UNIFORM_SIZE as usize..start + stride as usize]
                .iter()
                .all(|b| *b == 0));
        }
    }

    #[test]
    fn uniform_bytes_empty_frame() {
        assert!(uniform_bytes(&[], 256).is_empty());
    }

    #[test]
    fn stride_alignment_covers_uniform_block() {
        let stride = wgpu::util::align_to(UNIFORM_SIZE, 256);
        assert_eq!(stride, 256);
        assert!(stride >= UNIFORM_SIZE);
    }

    #[test]
    fn clear_color_converts_channels() {
        let c = to_color([0.5, 0.5, 0.5, 0.9]);
        assert_eq!(c.r, 0.5);
        assert!((c.a - 0.9).abs() < 1e-6);
    }
}
