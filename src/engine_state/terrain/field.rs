//! Volumetric occupancy field.
//!
//! Produces, for a given chunk id, the padded `(N+1)^3` grid of solid/empty
//! cells that the surface extractor consumes. The field is a pure function of
//! world position and a fixed seed: a column's terrain height comes from 2D
//! Perlin noise over world-space (x, z), and a cell is solid iff its
//! world-space y lies below that height. Determinism matters here because
//! chunks are generated concurrently and in no particular order.

use noise::{NoiseFn, Perlin};

use super::chunk::ChunkId;
use super::{CHUNK_DIM, PADDED_DIM, PADDED_PLANE, PADDED_VOLUME};

/// Fixed seed for the terrain noise; the world is reproducible run to run.
pub const FIELD_SEED: u32 = 0;
/// World-space scale applied to (x, z) before sampling the noise.
const NOISE_FREQUENCY: f64 = 1.0 / 10.0;
/// The noise's native [-1, 1] range is mapped into [0, MAX_TERRAIN_HEIGHT].
const MAX_TERRAIN_HEIGHT: f64 = 20.0;

/// Flat `(N+1)^3` byte grid of cell occupancy, padded by one cell per axis so
/// boundary-face tests can read one cell beyond the chunk edge.
pub struct OccupancyGrid {
    data: Box<[u8]>,
}

/// Maps padded-grid coordinates to the flat buffer:
/// `index(x, y, z) = x*(N+1)^2 + y*(N+1) + z`.
pub fn cell_index(x: i32, y: i32, z: i32) -> usize {
    x as usize * PADDED_PLANE + y as usize * PADDED_DIM + z as usize
}

impl OccupancyGrid {
    /// Whether the cell at padded-grid coordinates is solid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.data[cell_index(x, y, z)] != 0
    }

    /// Raw cell bytes, in `cell_index` order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// A grid with every cell set to the same occupancy.
    #[cfg(test)]
    pub fn uniform(solid: bool) -> Self {
        Self {
            data: vec![u8::from(solid); PADDED_VOLUME].into_boxed_slice(),
        }
    }

    /// Overrides a single cell; test scaffolding for the extractor.
    #[cfg(test)]
    pub fn set(&mut self, x: i32, y: i32, z: i32, solid: bool) {
        self.data[cell_index(x, y, z)] = u8::from(solid);
    }
}

/// Generates the occupancy grid for a chunk.
///
/// Deterministic and side-effect free; two calls with the same id yield
/// bit-identical grids.
pub fn generate(id: ChunkId) -> OccupancyGrid {
    let noise = Perlin::new(FIELD_SEED);
    let mut data = vec![0u8; PADDED_VOLUME].into_boxed_slice();

    for x in 0..PADDED_DIM as i32 {
        for z in 0..PADDED_DIM as i32 {
            let world_x = (id.x * CHUNK_DIM + x) as f64;
            let world_z = (id.z * CHUNK_DIM + z) as f64;
            let sample = noise.get([world_x * NOISE_FREQUENCY, world_z * NOISE_FREQUENCY]);
            let height = (sample + 1.0) / 2.0 * MAX_TERRAIN_HEIGHT;
            for y in 0..PADDED_DIM as i32 {
                if ((id.y * CHUNK_DIM + y) as f64) < height {
                    data[cell_index(x, y, z)] = 1;
                }
            }
        }
    }

    OccupancyGrid { data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        for id in [
            ChunkId::new(0, 0, 0),
            ChunkId::new(-3, 0, 7),
            ChunkId::new(12, -1, -12),
        ] {
            let a = generate(id);
            let b = generate(id);
            assert_eq!(a.data(), b.data(), "grids for {id:?} differ");
        }
    }

    #[test]
    fn chunk_above_terrain_is_entirely_empty() {
        // Terrain height tops out at 20 world units; a chunk starting at
        // y = 32 is all air.
        let grid = generate(ChunkId::new(0, 1, 0));
        assert!(grid.data().iter().all(|&c| c == 0));
    }

    #[test]
    fn chunk_below_terrain_is_entirely_solid() {
        // Heights are non-negative, so everything below y = -32 is ground.
        let grid = generate(ChunkId::new(0, -2, 0));
        assert!(grid.data().iter().all(|&c| c == 1));
    }

    #[test]
    fn surface_chunk_is_mixed() {
        let grid = generate(ChunkId::new(0, 0, 0));
        let solid = grid.data().iter().filter(|&&c| c != 0).count();
        assert!(solid > 0, "surface chunk has no ground");
        assert!(solid < PADDED_VOLUME, "surface chunk has no air");
    }

    #[test]
    fn index_arithmetic_matches_grid_strides() {
        assert_eq!(cell_index(0, 0, 0), 0);
        assert_eq!(cell_index(0, 0, 1), 1);
        assert_eq!(cell_index(0, 1, 0), PADDED_DIM);
        assert_eq!(cell_index(1, 0, 0), PADDED_PLANE);
        assert_eq!(
            cell_index(32, 32, 32),
            PADDED_VOLUME - 1,
            "last padded cell maps to the last slot"
        );
    }
}
