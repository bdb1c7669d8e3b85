//! Geometry: CPU-side staging and GPU-resident meshes.
//!
//! Geometry moves through two stages:
//!
//! - [`Geometry`] — plain vertex/index arrays built at scene-construction
//!   time. Lives entirely on the CPU, so counts and contents can be inspected
//!   (and unit-tested) without a device.
//! - [`Mesh`] — the uploaded form: two immutable GPU buffers plus the counts
//!   needed to issue an indexed draw. Never written again after creation, so
//!   any number of actors can share one mesh without coordination.

use std::sync::Arc;

use crate::color::Color;
use crate::gpu::GpuContext;

/// A vertex with a position and an RGBA color.
///
/// `#[repr(C)]` with a 28-byte layout matching [`Vertex::LAYOUT`]:
/// position at offset 0, color at offset 12.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    /// The wgpu vertex buffer layout for this vertex type:
    /// position (location 0) and color (location 1), per-vertex stepping.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn new(position: [f32; 3], color: Color) -> Self {
        Self {
            position,
            color: color.to_array(),
        }
    }
}

/// CPU-side mesh data: vertex and index arrays plus a display name.
///
/// Indices describe triangles, three per triangle; a trailing partial
/// triangle is ignored by the derived count.
#[derive(Clone, Debug)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    name: String,
}

impl Geometry {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count() / 3
    }

    /// Uploads this geometry into immutable GPU buffers.
    ///
    /// The returned mesh is wrapped in [`Arc`] so it can be shared by every
    /// actor that reuses the geometry.
    pub fn upload(&self, gpu: &GpuContext) -> Arc<Mesh> {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Arc::new(Mesh {
            vertex_buffer,
            index_buffer,
            vertex_count: self.vertex_count(),
            index_count: self.index_count(),
            triangle_count: self.triangle_count(),
            name: self.name.clone(),
        })
    }
}

/// GPU-resident mesh geometry: immutable vertex and index buffers.
///
/// Created once from a [`Geometry`] at scene-build time and never mutated
/// afterwards. Buffer allocation failure is fatal inside wgpu (device loss),
/// not a recoverable error surfaced here.
#[derive(Debug)]
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
    triangle_count: u32,
    name: String,
}

impl Mesh {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// Binds both buffers and issues a single indexed draw covering every
    /// index, starting at index 0 with vertex offset 0.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32) -> Vertex {
        Vertex::new([x, y, 0.0], Color::WHITE)
    }

    #[test]
    fn triangle_counts() {
        let geometry = Geometry::new(
            "Triangle",
            vec![vertex(0.0, 0.5), vertex(0.5, -0.5), vertex(-0.5, -0.5)],
            vec![0, 1, 2],
        );
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.index_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
    }

    #[test]
    fn quad_counts() {
        let geometry = Geometry::new(
            "Quad",
            vec![
                vertex(-0.5, 0.5),
                vertex(0.5, 0.5),
                vertex(0.5, -0.5),
                vertex(-0.5, -0.5),
            ],
            vec![0, 1, 2, 2, 3, 0],
        );
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.index_count(), 6);
        assert_eq!(geometry.triangle_count(), 2);
    }

    #[test]
    fn triangle_count_ignores_partial_triangles() {
        let geometry = Geometry::new(
            "Ragged",
            vec![vertex(0.0, 0.0)],
            vec![0, 0, 0, 0, 0, 0, 0],
        );
        assert_eq!(geometry.triangle_count(), 2);
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
        assert_eq!(Vertex::LAYOUT.array_stride, 28);
    }
}
