use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Single-slot token shared by generation and translation.
///
/// Acquiring while the slot is held fails immediately; nothing queues.
/// The returned guard releases the slot when dropped, on every exit path.
#[derive(Clone)]
pub struct InFlight {
    slot: Arc<Semaphore>,
}

pub struct InFlightGuard {
    _permit: OwnedSemaphorePermit,
}

impl Default for InFlight {
    fn default() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }
}

impl InFlight {
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.slot
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| InFlightGuard { _permit: permit })
    }

    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }
}
