//! Render-thread side of the terrain: eviction, lazy upload and drawing.
//!
//! Runs once per frame, after the main scene pass. Holds the only code path
//! that creates or releases terrain GPU resources.

use std::sync::Arc;

use cgmath::{Matrix4, Point3};
use log::{debug, warn};

use super::chunk::{ChunkId, ChunkMesh};
use super::store::ChunkStore;
use super::{TerrainContext, MAX_RESIDENT_CHUNKS};
use crate::core::MtResource;
use crate::engine_state::rendering::{MeshBuffer, ScenePipeline};

/// GPU residency for one chunk: its vertex buffer plus the bind group holding
/// its world-offset model matrix. Both are released when the chunk is evicted.
pub struct GpuMesh {
    mesh: MeshBuffer,
    model: wgpu::BindGroup,
}

/// Draws the resident terrain and keeps the store's GPU side in sync.
pub struct TerrainRenderer {
    store: Arc<ChunkStore<GpuMesh>>,
    observer: MtResource<Point3<f32>>,
}

impl TerrainRenderer {
    /// Creates a renderer over the shared terrain context.
    pub fn new(ctx: &TerrainContext<GpuMesh>) -> Self {
        Self {
            store: ctx.store.clone(),
            observer: ctx.observer.clone(),
        }
    }

    /// Per-frame terrain maintenance and draw.
    ///
    /// Evicts chunks that left the window around the observer, uploads any
    /// meshes the workers finished since last frame, then draws every uploaded
    /// chunk in its own pass. The pass loads the scene pass's output rather
    /// than clearing it.
    pub fn render(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        pipeline: &ScenePipeline,
    ) {
        let center = ChunkId::containing(self.observer.read_copy());

        // Checked before eviction; transient overshoot while the observer is
        // moving is what this diagnostic is meant to catch.
        let resident = self.store.len();
        if resident > MAX_RESIDENT_CHUNKS {
            warn!(
                "{resident} resident chunks exceeds the expected maximum of {MAX_RESIDENT_CHUNKS}"
            );
        }

        let evicted = self.store.evict_out_of_window(center);
        if evicted > 0 {
            debug!("evicted {evicted} terrain chunks");
        }

        self.store.upload_pending(|id, verts| GpuMesh {
            mesh: MeshBuffer::new(device, verts, "Terrain Chunk Vertex Buffer"),
            model: pipeline
                .create_model_bind_group(device, Matrix4::from_translation(id.world_offset())),
        });

        // The guard must outlive the pass so the buffers it borrows do too.
        let cells = self.store.read();

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Terrain Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pipeline.bind(&mut pass);
        for chunk in cells.values() {
            if let ChunkMesh::Uploaded(gpu) = &chunk.mesh {
                pass.set_bind_group(2, &gpu.model, &[]);
                gpu.mesh.draw(&mut pass);
            }
        }
    }
}
