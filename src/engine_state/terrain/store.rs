//! Concurrent chunk storage.
//!
//! A single map from [`ChunkId`] to [`Chunk`] behind one reader/writer lock.
//! Generation workers insert; the render thread evicts, uploads and iterates.
//! The expensive part of an insert (field generation plus surface extraction)
//! runs outside the lock: workers race on a cheap presence check and the
//! first write wins, which is sound because generation is pure.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use super::chunk::{Chunk, ChunkId, ChunkMesh};
use crate::engine_state::rendering::Vertex;

/// Thread-safe map of all resident chunks.
///
/// Generic over the GPU mesh handle `G` so eviction and upload semantics are
/// testable without a graphics device; the renderer instantiates it with its
/// vertex-buffer type.
pub struct ChunkStore<G> {
    cells: RwLock<HashMap<ChunkId, Chunk<G>>>,
}

impl<G> ChunkStore<G> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.cells.read().unwrap().len()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.cells.read().unwrap().is_empty()
    }

    /// Whether a chunk with this id is resident.
    pub fn contains(&self, id: ChunkId) -> bool {
        self.cells.read().unwrap().contains_key(&id)
    }

    /// Inserts the chunk for `id` unless one is already present.
    ///
    /// The presence check holds only a read lock and `generate` runs with no
    /// lock held at all, so other workers are never blocked behind chunk
    /// generation. If another worker inserted the same id in the meantime the
    /// freshly generated chunk is discarded; existing data is never replaced.
    ///
    /// Returns `true` iff this call inserted the chunk.
    pub fn try_insert(&self, id: ChunkId, generate: impl FnOnce(ChunkId) -> Chunk<G>) -> bool {
        if self.cells.read().unwrap().contains_key(&id) {
            return false;
        }

        let chunk = generate(id);

        match self.cells.write().unwrap().entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(chunk);
                true
            }
        }
    }

    /// Removes every chunk outside the active window around `center`.
    ///
    /// Dropping an evicted chunk releases its GPU handle, if it acquired one.
    /// Render thread only, once per frame. Returns the eviction count.
    pub fn evict_out_of_window(&self, center: ChunkId) -> usize {
        let mut cells = self.cells.write().unwrap();
        let before = cells.len();
        cells.retain(|id, _| id.in_window(center));
        before - cells.len()
    }

    /// Moves every `Generated` mesh to `Uploaded` via the given upload
    /// function. Render thread only; this is the sole place GPU handles are
    /// created.
    pub fn upload_pending(&self, mut upload: impl FnMut(ChunkId, &[Vertex]) -> G) {
        let mut cells = self.cells.write().unwrap();
        for chunk in cells.values_mut() {
            if let ChunkMesh::Generated(verts) = &chunk.mesh {
                let handle = upload(chunk.id, verts);
                chunk.mesh = ChunkMesh::Uploaded(handle);
            }
        }
    }

    /// Shared guard over the resident chunks, for draw iteration.
    pub fn read(&self) -> RwLockReadGuard<'_, HashMap<ChunkId, Chunk<G>>> {
        self.cells.read().unwrap()
    }
}

impl<G> Default for ChunkStore<G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::terrain::field::OccupancyGrid;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// GPU-handle stand-in that counts how many times it is released.
    struct ReleaseCounter(Arc<AtomicUsize>);

    impl Drop for ReleaseCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn stub_chunk<G>(id: ChunkId, marker: f32) -> Chunk<G> {
        let verts = vec![Vertex::new([marker, 0.0, 0.0], [0.0, 0.0])];
        Chunk::from_parts(id, OccupancyGrid::uniform(false), ChunkMesh::Generated(verts))
    }

    #[test]
    fn try_insert_never_replaces_existing_data() {
        let store: ChunkStore<()> = ChunkStore::new();
        let id = ChunkId::new(1, 2, 3);

        assert!(store.try_insert(id, |id| stub_chunk(id, 1.0)));
        assert!(!store.try_insert(id, |id| stub_chunk(id, 2.0)));
        assert_eq!(store.len(), 1);

        let cells = store.read();
        let chunk = cells.get(&id).unwrap();
        match &chunk.mesh {
            ChunkMesh::Generated(verts) => {
                assert_eq!(verts[0], Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0]))
            }
            _ => panic!("first insert's mesh was replaced"),
        }
    }

    #[test]
    fn second_insert_skips_generation() {
        let store: ChunkStore<()> = ChunkStore::new();
        let id = ChunkId::new(0, 0, 0);
        let calls = AtomicUsize::new(0);

        let mut generate = |id| {
            calls.fetch_add(1, Ordering::SeqCst);
            stub_chunk(id, 0.0)
        };

        store.try_insert(id, &mut generate);
        store.try_insert(id, &mut generate);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn eviction_respects_window_asymmetry() {
        let store: ChunkStore<()> = ChunkStore::new();
        let center = ChunkId::new(0, 0, 0);
        let kept = [ChunkId::new(5, 0, 0), ChunkId::new(6, 0, 0), ChunkId::new(-5, 0, 0)];
        let dropped = [ChunkId::new(7, 0, 0), ChunkId::new(-6, 0, 0)];

        for id in kept.iter().chain(dropped.iter()) {
            store.try_insert(*id, |id| stub_chunk(id, 0.0));
        }

        assert_eq!(store.evict_out_of_window(center), dropped.len());
        for id in kept {
            assert!(store.contains(id), "{id:?} should have been retained");
        }
        for id in dropped {
            assert!(!store.contains(id), "{id:?} should have been evicted");
        }
    }

    #[test]
    fn eviction_releases_gpu_handle_exactly_once() {
        let store: ChunkStore<ReleaseCounter> = ChunkStore::new();
        let id = ChunkId::new(20, 0, 0);
        let releases = Arc::new(AtomicUsize::new(0));

        store.try_insert(id, |id| stub_chunk(id, 0.0));
        let counter = releases.clone();
        store.upload_pending(move |_, _| ReleaseCounter(counter.clone()));
        assert_eq!(releases.load(Ordering::SeqCst), 0);

        // Chunk (20,0,0) is far outside the window around the origin.
        assert_eq!(store.evict_out_of_window(ChunkId::new(0, 0, 0)), 1);
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        // A second eviction pass finds nothing left to release.
        assert_eq!(store.evict_out_of_window(ChunkId::new(0, 0, 0)), 0);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_chunks_never_acquire_gpu_handles() {
        let store: ChunkStore<ReleaseCounter> = ChunkStore::new();
        let id = ChunkId::new(0, 3, 0);
        store.try_insert(id, |id| {
            Chunk::from_parts(id, OccupancyGrid::uniform(false), ChunkMesh::Empty)
        });

        let uploads = AtomicUsize::new(0);
        let releases = Arc::new(AtomicUsize::new(0));
        store.upload_pending(|_, _| {
            uploads.fetch_add(1, Ordering::SeqCst);
            ReleaseCounter(releases.clone())
        });
        assert_eq!(uploads.load(Ordering::SeqCst), 0);

        let cells = store.read();
        assert!(matches!(cells.get(&id).unwrap().mesh, ChunkMesh::Empty));
    }

    #[test]
    fn upload_transitions_generated_to_uploaded() {
        let store: ChunkStore<u32> = ChunkStore::new();
        let id = ChunkId::new(0, 0, 0);
        store.try_insert(id, |id| stub_chunk(id, 0.0));

        store.upload_pending(|_, verts| verts.len() as u32);

        let cells = store.read();
        match cells.get(&id).unwrap().mesh {
            ChunkMesh::Uploaded(count) => assert_eq!(count, 1),
            _ => panic!("mesh was not uploaded"),
        }
    }
}
