//! The textured cube spinning at the world origin.

use cgmath::{Matrix4, Rad, Vector3};

use crate::engine_state::rendering::{MeshBuffer, ScenePipeline, Vertex};

/// Unit cube, two triangles per face, texture applied per face.
const CUBE_VERTICES: [Vertex; 36] = [
    // Bottom
    Vertex::new([-1.0, -1.0, -1.0], [0.0, 0.0]),
    Vertex::new([1.0, -1.0, -1.0], [1.0, 0.0]),
    Vertex::new([-1.0, -1.0, 1.0], [0.0, 1.0]),
    Vertex::new([1.0, -1.0, -1.0], [1.0, 0.0]),
    Vertex::new([1.0, -1.0, 1.0], [1.0, 1.0]),
    Vertex::new([-1.0, -1.0, 1.0], [0.0, 1.0]),
    // Top
    Vertex::new([-1.0, 1.0, -1.0], [0.0, 0.0]),
    Vertex::new([-1.0, 1.0, 1.0], [0.0, 1.0]),
    Vertex::new([1.0, 1.0, -1.0], [1.0, 0.0]),
    Vertex::new([1.0, 1.0, -1.0], [1.0, 0.0]),
    Vertex::new([-1.0, 1.0, 1.0], [0.0, 1.0]),
    Vertex::new([1.0, 1.0, 1.0], [1.0, 1.0]),
    // Front
    Vertex::new([-1.0, -1.0, 1.0], [1.0, 0.0]),
    Vertex::new([1.0, -1.0, 1.0], [0.0, 0.0]),
    Vertex::new([-1.0, 1.0, 1.0], [1.0, 1.0]),
    Vertex::new([1.0, -1.0, 1.0], [0.0, 0.0]),
    Vertex::new([1.0, 1.0, 1.0], [0.0, 1.0]),
    Vertex::new([-1.0, 1.0, 1.0], [1.0, 1.0]),
    // Back
    Vertex::new([-1.0, -1.0, -1.0], [0.0, 0.0]),
    Vertex::new([-1.0, 1.0, -1.0], [0.0, 1.0]),
    Vertex::new([1.0, -1.0, -1.0], [1.0, 0.0]),
    Vertex::new([1.0, -1.0, -1.0], [1.0, 0.0]),
    Vertex::new([-1.0, 1.0, -1.0], [0.0, 1.0]),
    Vertex::new([1.0, 1.0, -1.0], [1.0, 1.0]),
    // Left
    Vertex::new([-1.0, -1.0, 1.0], [0.0, 1.0]),
    Vertex::new([-1.0, 1.0, -1.0], [1.0, 0.0]),
    Vertex::new([-1.0, -1.0, -1.0], [0.0, 0.0]),
    Vertex::new([-1.0, -1.0, 1.0], [0.0, 1.0]),
    Vertex::new([-1.0, 1.0, 1.0], [1.0, 1.0]),
    Vertex::new([-1.0, 1.0, -1.0], [1.0, 0.0]),
    // Right
    Vertex::new([1.0, -1.0, 1.0], [1.0, 1.0]),
    Vertex::new([1.0, -1.0, -1.0], [1.0, 0.0]),
    Vertex::new([1.0, 1.0, -1.0], [0.0, 0.0]),
    Vertex::new([1.0, -1.0, 1.0], [1.0, 1.0]),
    Vertex::new([1.0, 1.0, -1.0], [0.0, 0.0]),
    Vertex::new([1.0, 1.0, 1.0], [0.0, 1.0]),
];

/// A cube that rotates around the world Y axis at one radian per second.
pub struct Cube {
    mesh: MeshBuffer,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    angle: f32,
}

impl Cube {
    /// Uploads the cube's vertices and creates its model binding.
    pub fn new(device: &wgpu::Device, pipeline: &ScenePipeline) -> Self {
        let mesh = MeshBuffer::new(device, &CUBE_VERTICES, "Cube Vertex Buffer");
        let (model_buffer, model_bind_group) =
            pipeline.create_dynamic_model_binding(device, Matrix4::from_angle_y(Rad(0.0)));
        Self {
            mesh,
            model_buffer,
            model_bind_group,
            angle: 0.0,
        }
    }

    /// Advances the spin by the frame delta and rewrites the model matrix.
    pub fn update(&mut self, dt: f32, queue: &wgpu::Queue, pipeline: &ScenePipeline) {
        self.angle += dt;
        let model = Matrix4::from_axis_angle(Vector3::unit_y(), Rad(self.angle));
        pipeline.write_model(queue, &self.model_buffer, model);
    }

    /// Draws the cube. The pipeline must already be bound on the pass.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_bind_group(2, &self.model_bind_group, &[]);
        self.mesh.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_complete_faces() {
        assert_eq!(CUBE_VERTICES.len(), 36);
        // Every coordinate sits on the unit cube's surface.
        for v in &CUBE_VERTICES {
            assert!(v.position.iter().any(|c| c.abs() == 1.0));
            for c in v.position {
                assert!(c.abs() <= 1.0);
            }
        }
    }
}
