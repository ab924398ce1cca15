//! Chunk streaming around the observer.
//!
//! One long-lived worker per relative chunk offset in the generation cube.
//! Every worker loops forever: sleep the poll interval, read the observer
//! position, derive its target chunk id (anchor + fixed offset) and insert it
//! into the store if it is new. Workers share nothing but the store and the
//! observer handle; chunk population is commutative and idempotent, so no
//! further coordination is needed. The poll interval caps streaming
//! responsiveness by design; it bounds generation thread churn rather than
//! correctness.

use std::thread;

use cgmath::{Point3, Vector3};
use log::{debug, info};

use super::chunk::{Chunk, ChunkId};
use super::store::ChunkStore;
use super::{TerrainContext, POLL_INTERVAL, WINDOW_HALF_WIDTH};

/// A single generation worker: a fixed relative offset plus the target id it
/// computed last tick.
pub struct StreamWorker {
    offset: Vector3<i32>,
    last_target: Option<ChunkId>,
}

impl StreamWorker {
    /// Creates a worker for one relative chunk offset.
    pub fn new(offset: Vector3<i32>) -> Self {
        Self {
            offset,
            last_target: None,
        }
    }

    /// One poll iteration.
    ///
    /// Computes the target chunk id from the observer position; if it matches
    /// last tick's target the observer has not crossed a chunk boundary and
    /// the tick is a no-op, skipping even the store lookup. Otherwise the
    /// target is inserted idempotently.
    ///
    /// Returns `false` for the no-op case.
    pub fn tick<G>(&mut self, observer: Point3<f32>, store: &ChunkStore<G>) -> bool {
        let target = ChunkId::containing(observer).offset(self.offset);
        if self.last_target == Some(target) {
            return false;
        }
        self.last_target = Some(target);

        store.try_insert(target, Chunk::generate);
        true
    }
}

/// Spawns the full generation pool: one thread per offset in the
/// `(1-W)..=W` cube, `(2W)^3` threads in total, running for process lifetime.
pub fn spawn_workers<G: Send + Sync + 'static>(ctx: &TerrainContext<G>) {
    let w = WINDOW_HALF_WIDTH;
    let mut spawned = 0usize;

    for x in (1 - w)..=w {
        for y in (1 - w)..=w {
            for z in (1 - w)..=w {
                let ctx = ctx.clone();
                let mut worker = StreamWorker::new(Vector3::new(x, y, z));
                thread::Builder::new()
                    .name(format!("terrain-gen-{x}:{y}:{z}"))
                    .spawn(move || loop {
                        thread::sleep(POLL_INTERVAL);
                        let observer = ctx.observer.read_copy();
                        if worker.tick(observer, &ctx.store) {
                            debug!(
                                "worker ({x},{y},{z}) refreshed its target chunk"
                            );
                        }
                    })
                    .expect("failed to spawn terrain generation worker");
                spawned += 1;
            }
        }
    }

    info!("spawned {spawned} terrain generation workers");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::terrain::chunk::ChunkMesh;
    use crate::engine_state::terrain::field::OccupancyGrid;

    #[test]
    fn tick_inserts_once_per_target() {
        let store: ChunkStore<()> = ChunkStore::new();
        let mut worker = StreamWorker::new(Vector3::new(1, 0, 0));
        let origin = Point3::new(0.0, 0.0, 0.0);

        // Anchor for the origin is (-1,-1,-1); offset (1,0,0) targets (0,-1,-1).
        assert!(worker.tick(origin, &store));
        assert_eq!(store.len(), 1);
        assert!(store.contains(ChunkId::new(0, -1, -1)));

        // Unchanged position: same target, no store mutation.
        assert!(!worker.tick(origin, &store));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn tick_tracks_chunk_boundary_crossings() {
        let store: ChunkStore<()> = ChunkStore::new();
        let mut worker = StreamWorker::new(Vector3::new(0, 0, 0));

        assert!(worker.tick(Point3::new(0.0, 0.0, 0.0), &store));
        // Moving within the same chunk changes nothing.
        assert!(!worker.tick(Point3::new(10.0, 0.0, 0.0), &store));
        // Crossing the half-chunk-shifted boundary retargets the worker.
        assert!(worker.tick(Point3::new(50.0, 0.0, 0.0), &store));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn tick_does_not_regenerate_resident_chunks() {
        let store: ChunkStore<()> = ChunkStore::new();
        let target = ChunkId::new(0, -1, -1);
        store.try_insert(target, |id| {
            Chunk::from_parts(id, OccupancyGrid::uniform(false), ChunkMesh::Empty)
        });

        let mut worker = StreamWorker::new(Vector3::new(1, 0, 0));
        // Tick is not a no-op (first ever target) but the insert is skipped.
        assert!(worker.tick(Point3::new(0.0, 0.0, 0.0), &store));
        assert_eq!(store.len(), 1);
        let cells = store.read();
        assert!(matches!(cells.get(&target).unwrap().mesh, ChunkMesh::Empty));
    }
}
