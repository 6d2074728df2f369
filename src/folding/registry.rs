use crate::host::BufferId;
use crate::utils::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Proof of a registry slot, used to evict exactly the entry it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub buffer: BufferId,
    generation: u64,
}

struct Entry {
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<BufferId, Entry>,
    next_generation: u64,
    closed: bool,
}

/// At most one live cancellation token per buffer.
///
/// Every operation completes under a single lock acquisition and never awaits,
/// so two invocations cannot both believe they own a buffer's slot.
#[derive(Default)]
pub struct BufferRequestRegistry {
    state: Mutex<RegistryState>,
}

impl BufferRequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and drop the buffer's in-flight request, if any.
    pub fn cancel_and_evict(&self, buffer: BufferId) -> bool {
        let entry = self.state.lock().entries.remove(&buffer);
        match entry {
            Some(entry) => {
                entry.token.cancel();
                debug!("Cancelled folding request for buffer {}", buffer);
                true
            }
            None => false,
        }
    }

    /// Store `token` as the buffer's live request, cancelling whatever it replaces.
    pub fn register(&self, buffer: BufferId, token: CancellationToken) -> Result<Registration> {
        let mut state = self.state.lock();
        if state.closed {
            token.cancel();
            return Err(Error::Disposed);
        }

        state.next_generation += 1;
        let generation = state.next_generation;
        if let Some(previous) = state.entries.insert(buffer, Entry { generation, token }) {
            previous.token.cancel();
            debug!("Superseded folding request for buffer {}", buffer);
        }

        Ok(Registration { buffer, generation })
    }

    /// Remove the registration's entry without cancelling it. A newer entry for
    /// the same buffer is left alone.
    pub fn evict(&self, registration: &Registration) -> bool {
        let mut state = self.state.lock();
        let owned = state
            .entries
            .get(&registration.buffer)
            .is_some_and(|entry| entry.generation == registration.generation);
        if owned {
            state.entries.remove(&registration.buffer);
        }
        owned
    }

    /// Cancel everything and refuse further registrations.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        for (_, entry) in state.entries.drain() {
            entry.token.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn contains(&self, buffer: BufferId) -> bool {
        self.state.lock().entries.contains_key(&buffer)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
