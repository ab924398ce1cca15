//! Chunk identity and lifecycle.
//!
//! A [`Chunk`] is the unit of generation, storage and eviction: a fixed cube
//! of voxels addressed by an integer [`ChunkId`]. Its mesh moves through an
//! explicit state machine ([`ChunkMesh`]): `Empty` (no surface in this chunk),
//! `Generated` (vertices extracted, not yet on the GPU) and `Uploaded` (owned
//! GPU resource). A chunk that extracts no vertices never acquires a GPU
//! resource.

use cgmath::{Point3, Vector3};

use super::field::{self, OccupancyGrid};
use super::surface;
use super::{CHUNK_DIM, WINDOW_HALF_WIDTH};
use crate::engine_state::rendering::Vertex;

/// Position of a chunk in chunk-grid units. Each chunk spans a
/// `CHUNK_DIM`-sized cube of world cells; the id marks its lower corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId {
    /// X position in chunk-grid units.
    pub x: i32,
    /// Y position in chunk-grid units.
    pub y: i32,
    /// Z position in chunk-grid units.
    pub z: i32,
}

impl ChunkId {
    /// Creates a chunk id from its grid coordinates.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the id of the chunk anchoring the given world position.
    ///
    /// Chunk ids sit at the lower corner of their cube, so the position is
    /// shifted by half a chunk before the floor division. Floor semantics keep
    /// the anchor consistent across the negative axes.
    pub fn containing(pos: Point3<f32>) -> Self {
        let half = CHUNK_DIM as f32 / 2.0;
        let anchor = |p: f32| ((p - half) / CHUNK_DIM as f32).floor() as i32;
        Self::new(anchor(pos.x), anchor(pos.y), anchor(pos.z))
    }

    /// Returns this id displaced by a relative chunk offset.
    pub fn offset(self, d: Vector3<i32>) -> Self {
        Self::new(self.x + d.x, self.y + d.y, self.z + d.z)
    }

    /// Window-membership test used for eviction.
    ///
    /// A chunk is retained iff, per axis, it lies within
    /// `[center - (W-1), center + W]` inclusive. The kept box is one unit
    /// wider on the positive side than the negative side; this matches the
    /// `(1-W)..=W` generation offsets and must not be "fixed" independently
    /// of them.
    pub fn in_window(self, center: ChunkId) -> bool {
        let w = WINDOW_HALF_WIDTH;
        self.x >= center.x - (w - 1)
            && self.x <= center.x + w
            && self.y >= center.y - (w - 1)
            && self.y <= center.y + w
            && self.z >= center.z - (w - 1)
            && self.z <= center.z + w
    }

    /// World-space translation of this chunk's lower corner.
    pub fn world_offset(self) -> Vector3<f32> {
        Vector3::new(
            (self.x * CHUNK_DIM) as f32,
            (self.y * CHUNK_DIM) as f32,
            (self.z * CHUNK_DIM) as f32,
        )
    }
}

/// Mesh state of a chunk, from extraction to GPU residency.
///
/// `G` is the GPU resource handle; the renderer instantiates it with a real
/// vertex-buffer type, tests with cheap stand-ins.
pub enum ChunkMesh<G> {
    /// The chunk has no solid/empty boundary; nothing to draw, ever.
    Empty,
    /// Vertices extracted on a worker, waiting for the render thread to
    /// upload them.
    Generated(Vec<Vertex>),
    /// Resident on the GPU. Dropping the handle releases the resource.
    Uploaded(G),
}

/// A fixed cube of the voxel world: occupancy data plus the mesh derived
/// from it. Once stored, neither is ever recomputed.
pub struct Chunk<G> {
    /// The chunk's position, in chunk-grid units.
    pub id: ChunkId,
    occupancy: OccupancyGrid,
    /// Current mesh state; mutated only by the render thread (upload).
    pub mesh: ChunkMesh<G>,
}

impl<G> Chunk<G> {
    /// Generates a chunk's occupancy grid and extracts its surface.
    ///
    /// Pure function of the id and the fixed field seed: safe to run on any
    /// worker, in any order, and cheap to throw away on an insert race.
    pub fn generate(id: ChunkId) -> Self {
        let occupancy = field::generate(id);
        let mesh = match surface::polygonize(&occupancy) {
            Some(verts) => ChunkMesh::Generated(verts),
            None => ChunkMesh::Empty,
        };
        Self {
            id,
            occupancy,
            mesh,
        }
    }

    /// Builds a chunk directly from parts; generation stubs in tests use this.
    #[cfg(test)]
    pub fn from_parts(id: ChunkId, occupancy: OccupancyGrid, mesh: ChunkMesh<G>) -> Self {
        Self {
            id,
            occupancy,
            mesh,
        }
    }

    /// The chunk's padded occupancy grid.
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_uses_floor_semantics() {
        // Half a chunk is 16; positions below 16 shift into the -1 chunk.
        assert_eq!(
            ChunkId::containing(Point3::new(0.0, 0.0, 0.0)),
            ChunkId::new(-1, -1, -1)
        );
        assert_eq!(
            ChunkId::containing(Point3::new(16.0, 16.0, 16.0)),
            ChunkId::new(0, 0, 0)
        );
        assert_eq!(
            ChunkId::containing(Point3::new(47.9, 16.0, -16.1)),
            ChunkId::new(0, 0, -2)
        );
    }

    #[test]
    fn window_is_wider_on_the_positive_side() {
        let center = ChunkId::new(0, 0, 0);
        assert!(ChunkId::new(5, 0, 0).in_window(center));
        assert!(ChunkId::new(6, 0, 0).in_window(center));
        assert!(!ChunkId::new(7, 0, 0).in_window(center));
        assert!(ChunkId::new(-5, 0, 0).in_window(center));
        assert!(!ChunkId::new(-6, 0, 0).in_window(center));
    }

    #[test]
    fn window_follows_center() {
        let center = ChunkId::new(10, -3, 2);
        assert!(ChunkId::new(16, -3, 2).in_window(center));
        assert!(!ChunkId::new(17, -3, 2).in_window(center));
        assert!(ChunkId::new(10, -8, 2).in_window(center));
        assert!(!ChunkId::new(10, -9, 2).in_window(center));
    }

    #[test]
    fn world_offset_scales_by_chunk_dim() {
        assert_eq!(
            ChunkId::new(1, -2, 0).world_offset(),
            Vector3::new(32.0, -64.0, 0.0)
        );
    }
}
