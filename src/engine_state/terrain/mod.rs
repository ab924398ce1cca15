//! # Terrain Module
//!
//! Infinite procedurally-generated voxel terrain streamed around the camera.
//!
//! ## Architecture
//!
//! The terrain is split into fixed-size chunks keyed by [`ChunkId`]. A pool of
//! long-lived generation workers (one per relative chunk offset, see
//! [`stream`]) polls the observer position and fills the shared [`ChunkStore`]
//! with newly needed chunks. Each chunk's occupancy grid comes from a
//! deterministic noise field ([`field`]) and is turned into a triangle mesh by
//! boundary-face extraction ([`surface`]). The render thread alone walks the
//! store each frame: it evicts chunks that left the active window, lazily
//! uploads pending meshes, and issues the draw calls ([`renderer`]).
//!
//! ## Concurrency
//!
//! Generation is a pure function of the chunk id, so workers need no
//! coordination beyond the store's lock: duplicate generation of the same id
//! is wasted work, never an inconsistency. GPU resources are created and
//! released exclusively on the render thread.

use std::sync::Arc;
use std::time::Duration;

use cgmath::Point3;

use crate::core::MtResource;

pub mod chunk;
pub mod field;
pub mod renderer;
pub mod store;
pub mod stream;
pub mod surface;

pub use chunk::{Chunk, ChunkId, ChunkMesh};
pub use renderer::TerrainRenderer;
pub use store::ChunkStore;

/// Edge length of a chunk in cells.
pub const CHUNK_DIM: i32 = 32;
/// Padded edge length; the extra cell lets boundary-face tests read one cell
/// beyond the chunk edge.
pub const PADDED_DIM: usize = (CHUNK_DIM + 1) as usize;
/// Number of cells in one padded plane of a chunk.
pub const PADDED_PLANE: usize = PADDED_DIM * PADDED_DIM;
/// Total number of cells in a padded chunk grid.
pub const PADDED_VOLUME: usize = PADDED_PLANE * PADDED_DIM;

/// Half-width of the active window, in chunks.
pub const WINDOW_HALF_WIDTH: i32 = 6;
/// Theoretical maximum number of resident chunks: the full generation volume,
/// one chunk per worker offset.
pub const MAX_RESIDENT_CHUNKS: usize =
    (2 * WINDOW_HALF_WIDTH as usize) * (2 * WINDOW_HALF_WIDTH as usize) * (2 * WINDOW_HALF_WIDTH as usize);

/// How often each generation worker re-reads the observer position.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Dependencies shared by the generation workers and the terrain renderer.
///
/// Chunk ids anchor at the lower corner of their cube; workers and the
/// renderer derive them from the observer position through
/// [`ChunkId::containing`]. The observer handle has its own lock, independent
/// of the chunk store's.
pub struct TerrainContext<G> {
    /// World-space position of the observer, published by the camera.
    pub observer: MtResource<Point3<f32>>,
    /// The shared chunk store.
    pub store: Arc<ChunkStore<G>>,
}

impl<G> Clone for TerrainContext<G> {
    fn clone(&self) -> Self {
        Self {
            observer: self.observer.clone(),
            store: self.store.clone(),
        }
    }
}
