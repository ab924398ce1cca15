//! Shared mutable state behind a reader/writer lock.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` wraps a value in an `Arc<RwLock<T>>` so it can be shared between
/// the render thread and background workers. Reads are concurrent; writes are
/// exclusive. The camera's published world position is the main user of this
/// type: many terrain workers read it while the main thread updates it.
///
/// # Examples
///
/// ```
/// use voxelplay::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a write guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T: Send + Sync + Copy + 'static> MtResource<T> {
    /// Copies the contained value out, releasing the lock immediately.
    pub fn read_copy(&self) -> T {
        *self.get()
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn shared_between_threads() {
        let value = MtResource::new(0u32);
        let clone = value.clone();
        let handle = thread::spawn(move || {
            *clone.get_mut() += 5;
        });
        handle.join().unwrap();
        assert_eq!(value.read_copy(), 5);
    }
}
