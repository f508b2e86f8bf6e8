//! WebGPU scene renderer for the endless drive
//!
//! Implements the simulation's [`SceneAdapter`]: a retained set of mesh
//! instances, re-transformed on the CPU into one triangle list per frame
//! and drawn with depth testing, linear fog and a single point light.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

use super::mesh::{Corner, tessellate};
use crate::cruise::{MeshDesc, MeshId, SceneAdapter};
use crate::hex_rgb;

/// Vertical field of view, matching the original scene camera
const FOV_Y_DEG: f32 = 70.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;
/// Linear fog band (#0a0020)
const FOG_COLOR: u32 = 0x0a0020;
const FOG_NEAR: f32 = 10.0;
const FOG_FAR: f32 = 700.0;
/// Ambient #404040 at 1.2 intensity
const AMBIENT: u32 = 0x404040;
const AMBIENT_INTENSITY: f32 = 1.2;
/// Teal point light hovering near the start of the road
const LIGHT_COLOR: u32 = 0x39ffd7;
const LIGHT_INTENSITY: f32 = 2.0;
const LIGHT_POS: Vec3 = Vec3::new(0.0, 15.0, 10.0);
const LIGHT_RANGE: f32 = 200.0;

/// 3D vertex: world position, normal, albedo, pre-scaled emissive
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex3 {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub emissive: [f32; 4],
}

impl Vertex3 {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 40,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Uniform block shared by every draw (must match shader3d.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    fog_color: [f32; 4],
    /// near, far, unused, unused
    fog_range: [f32; 4],
    ambient: [f32; 4],
    /// xyz position, w range
    light_pos: [f32; 4],
    light_color: [f32; 4],
}

/// One retained mesh
struct MeshInstance {
    triangles: Vec<Corner>,
    position: Vec3,
    rotation: Quat,
    color: [f32; 3],
    emissive: [f32; 3],
    emissive_intensity: f32,
    visible: bool,
}

/// Retained-scene render state
pub struct Scene3d {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    pub size: (u32, u32),
    meshes: HashMap<MeshId, MeshInstance>,
    camera_eye: Vec3,
    camera_target: Vec3,
}

impl Scene3d {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("neon-arcade-3d-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader3d"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader3d.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline3d_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline3d"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let depth_view = create_depth_view(&device, &config);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer3d"),
            contents: bytemuck::bytes_of(&Vertex3::zeroed()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            depth_view,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            meshes: HashMap::new(),
            camera_eye: Vec3::new(0.0, 2.5, -9.0),
            camera_target: Vec3::new(0.0, 0.2, 15.0),
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    fn globals(&self) -> Globals {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = Mat4::look_at_rh(self.camera_eye, self.camera_target, Vec3::Y);
        let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR);
        let fog = hex_rgb(FOG_COLOR);
        let ambient = hex_rgb(AMBIENT).map(|c| c * AMBIENT_INTENSITY);
        let light = hex_rgb(LIGHT_COLOR).map(|c| c * LIGHT_INTENSITY);
        Globals {
            view_proj: (proj * view).to_cols_array_2d(),
            camera_pos: [self.camera_eye.x, self.camera_eye.y, self.camera_eye.z, 1.0],
            fog_color: [fog[0], fog[1], fog[2], 1.0],
            fog_range: [FOG_NEAR, FOG_FAR, 0.0, 0.0],
            ambient: [ambient[0], ambient[1], ambient[2], 1.0],
            light_pos: [LIGHT_POS.x, LIGHT_POS.y, LIGHT_POS.z, LIGHT_RANGE],
            light_color: [light[0], light[1], light[2], 1.0],
        }
    }

    /// Flatten every visible instance into world-space vertices and draw
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let mut vertices: Vec<Vertex3> = Vec::with_capacity(4096);
        for instance in self.meshes.values().filter(|m| m.visible) {
            let color = [instance.color[0], instance.color[1], instance.color[2], 1.0];
            let glow = instance.emissive.map(|c| c * instance.emissive_intensity);
            let emissive = [glow[0], glow[1], glow[2], 1.0];
            for &(pos, normal) in &instance.triangles {
                let world = instance.rotation * pos + instance.position;
                let world_normal = instance.rotation * normal;
                vertices.push(Vertex3 {
                    position: world.to_array(),
                    normal: world_normal.to_array(),
                    color,
                    emissive,
                });
            }
        }

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.globals()));

        // Recreate buffer each frame; simple and fast enough at this scale
        self.vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer3d"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.vertex_count = vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render3d_encoder"),
            });

        {
            let fog = hex_rgb(FOG_COLOR);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render3d_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: fog[0] as f64,
                            g: fog[1] as f64,
                            b: fog[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl SceneAdapter for Scene3d {
    fn add_mesh(&mut self, id: MeshId, desc: &MeshDesc) {
        self.meshes.insert(
            id,
            MeshInstance {
                triangles: tessellate(&desc.shape),
                position: desc.position,
                rotation: desc.rotation,
                color: desc.color,
                emissive: desc.emissive,
                emissive_intensity: desc.emissive_intensity,
                visible: true,
            },
        );
    }

    fn remove_mesh(&mut self, id: MeshId) {
        self.meshes.remove(&id);
    }

    fn set_transform(&mut self, id: MeshId, position: Vec3, rotation: Quat) {
        if let Some(mesh) = self.meshes.get_mut(&id) {
            mesh.position = position;
            mesh.rotation = rotation;
        }
    }

    fn set_emissive(&mut self, id: MeshId, intensity: f32) {
        if let Some(mesh) = self.meshes.get_mut(&id) {
            mesh.emissive_intensity = intensity;
        }
    }

    fn set_visible(&mut self, id: MeshId, visible: bool) {
        if let Some(mesh) = self.meshes.get_mut(&id) {
            mesh.visible = visible;
        }
    }

    fn set_camera(&mut self, eye: Vec3, target: Vec3) {
        self.camera_eye = eye;
        self.camera_target = target;
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
