//! Surface extraction.
//!
//! Turns a chunk's occupancy grid into a triangle list: for every interior
//! cell and each of the three axes, the cell is compared against its +1
//! neighbor (the padded layer supplies the neighbor at the chunk edge); a
//! mismatch means the shared face separates solid from empty and gets a quad.
//! Texture coordinates are fixed per corner, not projected. O(N^3) per chunk;
//! runs on generation workers, never the render thread.

use super::field::OccupancyGrid;
use super::CHUNK_DIM;
use crate::engine_state::rendering::Vertex;

/// Extracts the boundary faces of an occupancy grid as a triangle list.
///
/// Returns `None` when no face exists (the grid is uniformly solid or
/// uniformly empty across every interior boundary test); such a chunk has
/// nothing to draw and is a valid terminal state, not an error.
pub fn polygonize(grid: &OccupancyGrid) -> Option<Vec<Vertex>> {
    let mut verts = Vec::new();

    for x in 0..CHUNK_DIM {
        for y in 0..CHUNK_DIM {
            for z in 0..CHUNK_DIM {
                let fx = x as f32;
                let fy = y as f32;
                let fz = z as f32;

                let here = grid.is_solid(x, y, z);

                if here != grid.is_solid(x + 1, y, z) {
                    verts.extend_from_slice(&[
                        Vertex::new([fx, fy, fz], [0.0, 0.0]),
                        Vertex::new([fx, fy, fz - 1.0], [0.0, 1.0]),
                        Vertex::new([fx, fy - 1.0, fz], [1.0, 0.0]),
                        Vertex::new([fx, fy - 1.0, fz], [1.0, 0.0]),
                        Vertex::new([fx, fy, fz - 1.0], [0.0, 1.0]),
                        Vertex::new([fx, fy - 1.0, fz - 1.0], [1.0, 1.0]),
                    ]);
                }

                if here != grid.is_solid(x, y + 1, z) {
                    verts.extend_from_slice(&[
                        Vertex::new([fx, fy, fz], [0.0, 0.0]),
                        Vertex::new([fx, fy, fz - 1.0], [0.0, 1.0]),
                        Vertex::new([fx - 1.0, fy, fz], [1.0, 0.0]),
                        Vertex::new([fx - 1.0, fy, fz], [1.0, 0.0]),
                        Vertex::new([fx, fy, fz - 1.0], [0.0, 1.0]),
                        Vertex::new([fx - 1.0, fy, fz - 1.0], [1.0, 1.0]),
                    ]);
                }

                if here != grid.is_solid(x, y, z + 1) {
                    verts.extend_from_slice(&[
                        Vertex::new([fx, fy, fz], [0.0, 0.0]),
                        Vertex::new([fx, fy - 1.0, fz], [0.0, 1.0]),
                        Vertex::new([fx - 1.0, fy, fz], [1.0, 0.0]),
                        Vertex::new([fx - 1.0, fy, fz], [1.0, 0.0]),
                        Vertex::new([fx, fy - 1.0, fz], [0.0, 1.0]),
                        Vertex::new([fx - 1.0, fy - 1.0, fz], [1.0, 1.0]),
                    ]);
                }
            }
        }
    }

    if verts.is_empty() {
        None
    } else {
        Some(verts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_grids_produce_no_mesh() {
        assert!(polygonize(&OccupancyGrid::uniform(false)).is_none());
        assert!(polygonize(&OccupancyGrid::uniform(true)).is_none());
    }

    #[test]
    fn single_voxel_emits_six_faces() {
        let mut grid = OccupancyGrid::uniform(false);
        grid.set(5, 5, 5, true);

        let verts = polygonize(&grid).expect("isolated voxel must produce a mesh");
        // Six boundary faces, each a quad of two triangles.
        assert_eq!(verts.len(), 6 * 6);
    }

    #[test]
    fn flat_floor_emits_one_face_per_column() {
        // One solid layer at y = 0: every interior column crosses exactly one
        // y-boundary, plus nothing along x/z because the padded layer at
        // index N is solid too.
        let mut grid = OccupancyGrid::uniform(false);
        for x in 0..CHUNK_DIM + 1 {
            for z in 0..CHUNK_DIM + 1 {
                grid.set(x, 0, z, true);
            }
        }

        let verts = polygonize(&grid).expect("floor must produce a mesh");
        assert_eq!(verts.len(), (CHUNK_DIM * CHUNK_DIM) as usize * 6);
    }

    #[test]
    fn face_at_chunk_edge_uses_padded_neighbor() {
        // Solid only in the padded layer: interior cells at x = N-1 see a
        // mismatch against x = N and emit exactly one quad each.
        let mut grid = OccupancyGrid::uniform(false);
        for y in 0..CHUNK_DIM + 1 {
            for z in 0..CHUNK_DIM + 1 {
                grid.set(CHUNK_DIM, y, z, true);
            }
        }

        let verts = polygonize(&grid).expect("padded boundary must produce a mesh");
        assert_eq!(verts.len(), (CHUNK_DIM * CHUNK_DIM) as usize * 6);
    }
}
