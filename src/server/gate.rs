//! Fixed-capacity admission gate for the file service.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting semaphore bounding how many connections are handled at once.
///
/// Capacity is fixed at construction. `acquire` waits until a slot frees;
/// the permit returns its slot when dropped, on every exit path.
#[derive(Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// An opaque capacity unit; dropping it releases the slot.
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits until a capacity unit is available and takes it.
    pub async fn acquire(&self) -> AdmissionPermit {
        // The semaphore is never closed, so acquire cannot fail
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("admission semaphore closed");
        AdmissionPermit { _permit: permit }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
