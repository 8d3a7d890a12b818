use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::device::DEPTH_FORMAT;
use crate::mesh::{Mesh, Texture, Vertex3d};

use super::ctx::{RenderCtx, RenderTarget};
use super::DepthPolicy;

/// Handle to a texture bind group registered with the renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureBinding(usize);

/// One object to draw this frame: geometry, material, and its model matrix.
pub struct MeshDraw<'a> {
    pub mesh: &'a Mesh,
    pub texture: TextureBinding,
    pub model: Mat4,
}

/// Textured mesh renderer.
///
/// Pipeline is created lazily against the active surface format; per-object
/// model matrices are streamed through an instance vertex buffer, one indexed
/// draw per object in submission order.
pub struct MeshRenderer {
    depth_policy: DepthPolicy,
    light_dir: Vec3,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    frame_bgl: Option<wgpu::BindGroupLayout>,
    frame_bg: Option<wgpu::BindGroup>,
    frame_ubo: Option<wgpu::Buffer>,

    texture_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgs: Vec<wgpu::BindGroup>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl MeshRenderer {
    pub fn new(depth_policy: DepthPolicy) -> Self {
        Self {
            depth_policy,
            // Above and slightly toward the default camera, so the dial face
            // is lit and hands cast visible shading differences.
            light_dir: Vec3::new(0.3, 1.0, 0.5),
            pipeline_format: None,
            pipeline: None,
            frame_bgl: None,
            frame_bg: None,
            frame_ubo: None,
            texture_bgl: None,
            texture_bgs: Vec::new(),
            instance_vbo: None,
            instance_capacity: 0,
        }
    }

    /// Registers a texture, returning the binding handle draws refer to.
    ///
    /// Called once per texture at upload time, not per frame.
    pub fn bind_texture(&mut self, device: &wgpu::Device, texture: &Texture) -> TextureBinding {
        self.ensure_layouts(device);
        // Layout exists after ensure_layouts; guarded for the type system.
        let Some(bgl) = self.texture_bgl.as_ref() else {
            return TextureBinding(0);
        };

        let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gnomon mesh texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        self.texture_bgs.push(bg);
        TextureBinding(self.texture_bgs.len() - 1)
    }

    /// Renders `draws` in submission order using `view_proj`.
    ///
    /// The color and depth attachments are loaded, not cleared; the frame
    /// context owns the clear pass.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        draws: &[MeshDraw<'_>],
    ) {
        if draws.is_empty() {
            return;
        }

        self.ensure_layouts(ctx.device);
        self.ensure_pipeline(ctx);
        self.ensure_instance_capacity(ctx, draws.len());

        self.write_frame_uniform(ctx, view_proj);

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let instances: Vec<ModelInstance> = draws
            .iter()
            .map(|d| ModelInstance { model: d.model.to_cols_array_2d() })
            .collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(frame_bg) = self.frame_bg.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gnomon mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, frame_bg, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));

        for (i, draw) in draws.iter().enumerate() {
            let Some(texture_bg) = self.texture_bgs.get(draw.texture.0) else {
                log::warn!("mesh draw references unregistered texture {:?}", draw.texture);
                continue;
            };

            rpass.set_bind_group(1, texture_bg, &[]);
            rpass.set_vertex_buffer(0, draw.mesh.vertex_buffer.slice(..));
            rpass.set_index_buffer(draw.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..draw.mesh.index_count, 0, i as u32..i as u32 + 1);
        }
    }

    fn ensure_layouts(&mut self, device: &wgpu::Device) {
        if self.frame_bgl.is_some() && self.texture_bgl.is_some() {
            return;
        }

        self.frame_bgl = Some(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gnomon mesh frame bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: frame_ubo_min_binding_size(),
                },
                count: None,
            }],
        }));

        self.texture_bgl = Some(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gnomon mesh texture bgl"),
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
            ],
        }));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let (Some(frame_bgl), Some(texture_bgl)) =
            (self.frame_bgl.as_ref(), self.texture_bgl.as_ref())
        else {
            return;
        };

        let shader_src = include_str!("shaders/mesh.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gnomon mesh shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("gnomon mesh pipeline layout"),
                bind_group_layouts: &[frame_bgl, texture_bgl],
                immediate_size: 0,
            });

        // The pass always carries a depth attachment; a disabled policy keeps
        // the attachment but neither tests nor writes it.
        let (depth_write_enabled, depth_compare) = match self.depth_policy {
            DepthPolicy::ReadWrite => (true, wgpu::CompareFunction::LessEqual),
            DepthPolicy::Disabled => (false, wgpu::CompareFunction::Always),
        };

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gnomon mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex3d::layout(), ModelInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Hand meshes are thin, near-flat shells; keep them
                // double-sided rather than requiring closed geometry.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn write_frame_uniform(&mut self, ctx: &RenderCtx<'_>, view_proj: Mat4) {
        if self.frame_ubo.is_none() {
            let Some(bgl) = self.frame_bgl.as_ref() else { return };

            let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("gnomon mesh frame ubo"),
                size: std::mem::size_of::<FrameUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            self.frame_bg = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("gnomon mesh frame bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                }],
            }));
            self.frame_ubo = Some(ubo);
        }

        let Some(ubo) = self.frame_ubo.as_ref() else { return };
        let light = self.light_dir.normalize_or_zero();
        let u = FrameUniform {
            view_proj: view_proj.to_cols_array_2d(),
            light_dir: [light.x, light.y, light.z, 0.0],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(8);
        let new_size = (new_cap * std::mem::size_of::<ModelInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gnomon mesh instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
}

/// Returns the `wgpu` minimum binding size for the frame uniform buffer.
///
/// `FrameUniform` is 80 bytes by construction, so the size is always
/// non-zero. Centralising this avoids `.unwrap()` at the pipeline-creation
/// site.
fn frame_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<FrameUniform>() as u64)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ModelInstance {
    model: [[f32; 4]; 4],
}

impl ModelInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        3 => Float32x4, // model column 0
        4 => Float32x4, // model column 1
        5 => Float32x4, // model column 2
        6 => Float32x4  // model column 3
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
