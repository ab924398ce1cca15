//! Vertex format and vertex-buffer wrapper shared by everything the demo
//! draws (the cube and the terrain chunks).

use wgpu::util::DeviceExt;

/// A textured vertex: world-space position plus UV coordinates.
///
/// Matches the vertex shader's input layout; 20 bytes, no padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// UV texture coordinates, fixed per corner.
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a vertex from its raw components.
    pub const fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            tex_coords,
        }
    }

    /// The vertex buffer layout consumed by [`super::ScenePipeline`].
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// An immutable GPU vertex buffer built from a vertex list.
///
/// Thin handle pairing the buffer with its vertex count; dropping it releases
/// the buffer.
pub struct MeshBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl MeshBuffer {
    /// Uploads a vertex list into a new buffer.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Number of vertices in the buffer.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Makes this the active vertex buffer of the pass.
    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.buffer.slice(..));
    }

    /// Binds the buffer and draws all of its vertices as triangles.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.bind(pass);
        pass.draw(0..self.vertex_count, 0..1);
    }
}
