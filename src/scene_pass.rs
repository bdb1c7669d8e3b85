//! Frame composition and draw submission.
//!
//! [`ScenePass`] owns the render pipeline, the depth buffer, and the single
//! uniform buffer shared by every actor. Each frame it clears the target,
//! then walks the scene's actor list in insertion order and, per actor,
//! assembles the shader payload (tint + world/view/projection matrices),
//! writes it into that actor's slot of the shared uniform buffer, and issues
//! the actor's indexed draw with the slot's dynamic offset. There is no
//! sorting, batching, or visibility culling.
//!
//! Queue writes are staged: wgpu executes every `write_buffer` at the start
//! of the next submit, before any recorded command runs. Each actor
//! therefore needs its own slot in the buffer, selected at draw time through
//! a dynamic bind-group offset, or every draw would read the final actor's
//! payload.
//!
//! All of this happens sequentially on the render thread: scene state is
//! mutated only during update, read here during upload, so no
//! synchronization is needed.

use glam::Mat4;

use crate::color::Color;
use crate::gpu::GpuContext;
use crate::mesh::Vertex;
use crate::scene::Scene;

/// The per-draw uniform payload, rebuilt and re-uploaded for every actor,
/// every frame. Matches the `SceneUniforms` struct in `shaders/scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    /// RGBA color multiplied into vertex colors.
    pub tint: [f32; 4],
    /// The actor's local-to-world matrix.
    pub world: [[f32; 4]; 4],
    /// The active camera's world-to-eye matrix.
    pub view: [[f32; 4]; 4],
    /// The active camera's eye-to-clip matrix.
    pub proj: [[f32; 4]; 4],
}

impl SceneUniforms {
    pub fn compose(tint: Color, world: Mat4, view: Mat4, proj: Mat4) -> Self {
        Self {
            tint: tint.to_array(),
            world: world.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
        }
    }

    /// Byte stride between per-actor slots: the payload size rounded up to
    /// the device's `min_uniform_buffer_offset_alignment`.
    pub fn aligned_stride(alignment: u32) -> u64 {
        (std::mem::size_of::<Self>() as u64).next_multiple_of(alignment.max(1) as u64)
    }

    /// Byte offset of the slot the actor at `index` writes and draws from.
    pub fn slot_offset(index: usize, alignment: u32) -> u64 {
        index as u64 * Self::aligned_stride(alignment)
    }
}

/// Slots allocated up front; the buffer grows if a scene outnumbers them.
const INITIAL_ACTOR_SLOTS: usize = 16;

/// Renders a [`Scene`] with depth testing through one shared uniform buffer.
pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_slots: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment;
        let uniform_stride = SceneUniforms::aligned_stride(alignment);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<SceneUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let (uniform_buffer, bind_group) = Self::create_uniform_binding(
            device,
            &bind_group_layout,
            uniform_stride,
            INITIAL_ACTOR_SLOTS,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Left-handed view/projection: clockwise winding faces the camera.
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = Self::create_depth_texture(gpu);

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            bind_group,
            uniform_stride,
            uniform_slots: INITIAL_ACTOR_SLOTS,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_uniform_binding(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // The binding covers one slot; the dynamic offset picks which.
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<SceneUniforms>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    /// Grows the uniform buffer when the scene holds more actors than it has
    /// slots.
    fn ensure_uniform_slots(&mut self, gpu: &GpuContext, actors: usize) {
        if actors > self.uniform_slots {
            self.uniform_slots = actors.next_power_of_two();
            let (buffer, bind_group) = Self::create_uniform_binding(
                &gpu.device,
                &self.bind_group_layout,
                self.uniform_stride,
                self.uniform_slots,
            );
            self.uniform_buffer = buffer;
            self.bind_group = bind_group;
        }
    }

    fn create_depth_texture(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
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

    /// Recreates the depth buffer if the surface changed size since the last
    /// frame.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_texture(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Records every actor's draw into `render_pass`.
    ///
    /// The active camera's matrices are read once; each actor's world matrix
    /// is queried through its dirty-flagged cache, composed into a
    /// [`SceneUniforms`] payload, and written into the actor's own slot of
    /// the shared uniform buffer. The draw binds that slot through its
    /// dynamic offset, so every actor reads the payload staged for it even
    /// though all writes land together at submit.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        scene: &mut Scene,
    ) {
        if scene.actors().is_empty() || scene.cameras().is_empty() {
            return;
        }

        let tint = scene.tint();
        let view = scene.active_camera().view_matrix();
        let proj = scene.active_camera().projection_matrix();

        self.ensure_uniform_slots(gpu, scene.actors().len());
        render_pass.set_pipeline(&self.pipeline);

        for (index, actor) in scene.actors_mut().iter_mut().enumerate() {
            let world = actor.transform_mut().world_matrix();
            let uniforms = SceneUniforms::compose(tint, world, view, proj);
            let offset = index as u64 * self.uniform_stride;

            gpu.queue
                .write_buffer(&self.uniform_buffer, offset, bytemuck::cast_slice(&[uniforms]));

            render_pass.set_bind_group(0, &self.bind_group, &[offset as u32]);
            actor.draw(render_pass);
        }
    }

    /// Draws one complete frame: acquire the backbuffer, clear color and
    /// depth, submit every actor, present.
    ///
    /// Surface acquisition failures are returned to the caller; recoverable
    /// ones (lost/outdated swapchain) should be answered with
    /// [`GpuContext::reconfigure`] and a skipped frame.
    pub fn frame(&mut self, gpu: &GpuContext, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        self.ensure_depth_size(gpu);

        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background().into()),
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
            });

            self.render(gpu, &mut render_pass, scene);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn payload_layout_is_uniform_compatible() {
        // vec4 tint + three 4x4 matrices, 16-byte aligned throughout.
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 208);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn slot_stride_covers_the_payload_at_any_alignment() {
        for alignment in [1u32, 64, 256] {
            let stride = SceneUniforms::aligned_stride(alignment);
            assert!(stride >= std::mem::size_of::<SceneUniforms>() as u64);
            assert_eq!(stride % alignment as u64, 0);
        }
    }

    #[test]
    fn each_actor_writes_and_draws_from_its_own_slot() {
        // Five actors, default 256-byte alignment: offsets must be distinct
        // multiples of the stride so no staged write lands on another
        // actor's payload before submit.
        let alignment = 256;
        let stride = SceneUniforms::aligned_stride(alignment);

        let offsets: Vec<u64> = (0..5)
            .map(|i| SceneUniforms::slot_offset(i, alignment))
            .collect();

        for (index, &offset) in offsets.iter().enumerate() {
            assert_eq!(offset, index as u64 * stride);
        }
        for pair in offsets.windows(2) {
            assert!(pair[1] - pair[0] >= std::mem::size_of::<SceneUniforms>() as u64);
        }
    }

    #[test]
    fn compose_places_each_field() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let view = Mat4::from_scale(Vec3::splat(2.0));
        let proj = Mat4::perspective_lh(1.0, 1.777, 0.1, 200.0);

        let u = SceneUniforms::compose(Color::rgba(0.1, 0.2, 0.3, 0.4), world, view, proj);

        assert_eq!(u.tint, [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(Mat4::from_cols_array_2d(&u.world).w_axis, Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(Mat4::from_cols_array_2d(&u.view), view);
        assert_eq!(Mat4::from_cols_array_2d(&u.proj), proj);
    }
}
