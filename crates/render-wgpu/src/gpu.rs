use std::collections::BTreeMap;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use kinesis_scene::mesh::MeshData;
use kinesis_scene::{LineSet, MeshHandle, OrbitCamera, Scene};

use crate::shaders;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// One uploaded mesh.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DrawBatch {
    mesh: MeshHandle,
    instances: Range<u32>,
}

/// Groups scene proxies into per-mesh instance runs, capped at `cap`
/// instances total.
fn build_instances(scene: &Scene, cap: usize) -> (Vec<InstanceData>, Vec<DrawBatch>) {
    let mut grouped: BTreeMap<MeshHandle, Vec<InstanceData>> = BTreeMap::new();
    for (_, proxy) in scene.proxies() {
        let model = proxy.transform.matrix().to_cols_array_2d();
        grouped.entry(proxy.mesh).or_default().push(InstanceData {
            model_0: model[0],
            model_1: model[1],
            model_2: model[2],
            model_3: model[3],
            color: proxy.color.to_array(),
        });
    }

    let mut instances = Vec::new();
    let mut batches = Vec::new();
    for (mesh, group) in grouped {
        if instances.len() >= cap {
            break;
        }
        let start = instances.len() as u32;
        let take = group.len().min(cap - instances.len());
        instances.extend(group.into_iter().take(take));
        batches.push(DrawBatch {
            mesh,
            instances: start..instances.len() as u32,
        });
    }
    (instances, batches)
}

/// Interleaves a [`LineSet`]'s position and color arrays into vertices,
/// truncated to `cap` vertices.
fn pack_line_vertices(lines: &LineSet, cap: usize) -> Vec<LineVertex> {
    lines
        .positions()
        .chunks_exact(3)
        .zip(lines.colors().chunks_exact(4))
        .take(cap)
        .map(|(p, c)| LineVertex {
            position: [p[0], p[1], p[2]],
            color: [c[0], c[1], c[2], c[3]],
        })
        .collect()
}

/// wgpu scene renderer: instanced meshes plus a debug line overlay.
pub struct WgpuSceneRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: BTreeMap<MeshHandle, GpuMesh>,
    next_mesh: u64,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    line_buffer: wgpu::Buffer,
    max_line_vertices: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuSceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        // Uniform buffer
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Instanced mesh pipeline
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
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
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Debug line pipeline
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            // Overlay lines lie on collider surfaces; LessEqual without depth
            // writes keeps them visible instead of z-fighting.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Instance buffer (pre-allocated)
        let max_instances = 10_000u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Line buffer (pre-allocated, rewritten every frame)
        let max_line_vertices = 65_536u32;
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line_buffer"),
            size: (max_line_vertices as u64) * std::mem::size_of::<LineVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            mesh_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            meshes: BTreeMap::new(),
            next_mesh: 0,
            instance_buffer,
            max_instances,
            line_buffer,
            max_line_vertices,
            depth_texture,
            surface_format,
        }
    }

    /// Uploads mesh data once and returns the handle proxies refer to it by.
    pub fn register_mesh(&mut self, device: &wgpu::Device, data: &MeshData) -> MeshHandle {
        let vertices: Vec<Vertex> = data
            .vertices
            .iter()
            .map(|v| Vertex {
                position: v.position.to_array(),
                normal: v.normal.to_array(),
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: data.indices.len() as u32,
            },
        );
        tracing::debug!(?handle, vertices = vertices.len(), "registered mesh");
        handle
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: scene proxies batched per mesh, then the overlay.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
        lines: &LineSet,
    ) {
        let vp = camera.view_projection();
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: vp.to_cols_array_2d(),
            }),
        );

        let (instances, batches) = build_instances(scene, self.max_instances as usize);
        if scene.len() > instances.len() {
            tracing::warn!(
                proxies = scene.len(),
                drawn = instances.len(),
                "instance buffer full, truncating scene"
            );
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let line_vertices = pack_line_vertices(lines, self.max_line_vertices as usize);
        if lines.vertex_count() > line_vertices.len() {
            tracing::warn!(
                vertices = lines.vertex_count(),
                drawn = line_vertices.len(),
                "line buffer full, truncating overlay"
            );
        }
        if !line_vertices.is_empty() {
            queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&line_vertices));
        }

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
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.15,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            // Scene meshes
            if !batches.is_empty() {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                for batch in &batches {
                    let Some(mesh) = self.meshes.get(&batch.mesh) else {
                        tracing::warn!(mesh = ?batch.mesh, "proxy refers to unregistered mesh");
                        continue;
                    };
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.index_count, 0, batch.instances.clone());
                }
            }

            // Debug overlay
            if !line_vertices.is_empty() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                pass.draw(0..line_vertices.len() as u32, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
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
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
