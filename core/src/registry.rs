//! Insertion-ordered, concurrency-safe registry of tracked child processes

use crate::process::ChildHandle;
use crate::{CoreError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug)]
struct Entries<H> {
    order: Vec<u32>,
    by_id: HashMap<u32, H>,
}

/// Mapping from process id to handle that remembers insertion order.
///
/// All operations take `&self` and are atomic with respect to each other, so a
/// registry can be shared between the command loop and any number of parallel
/// termination branches.
#[derive(Debug)]
pub struct ProcessRegistry<H = Arc<ChildHandle>> {
    entries: Mutex<Entries<H>>,
}

impl<H: Clone> ProcessRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Entries {
                order: Vec::new(),
                by_id: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries<H>> {
        // Every mutation leaves both collections consistent before it can panic
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `handle` under `id`; an existing entry is never overwritten
    pub fn add(&self, id: u32, handle: H) -> Result<()> {
        let mut entries = self.lock();
        if entries.by_id.contains_key(&id) {
            warn!("Refusing to register duplicate process id {}", id);
            return Err(CoreError::DuplicateProcess(id));
        }
        entries.by_id.insert(id, handle);
        entries.order.push(id);
        debug!("Registered process {}", id);
        Ok(())
    }

    pub fn remove(&self, id: u32) -> Result<H> {
        let mut entries = self.lock();
        let handle = entries
            .by_id
            .remove(&id)
            .ok_or(CoreError::ProcessNotFound(id))?;
        entries.order.retain(|&tracked| tracked != id);
        debug!("Unregistered process {}", id);
        Ok(handle)
    }

    pub fn get(&self, id: u32) -> Result<H> {
        self.lock()
            .by_id
            .get(&id)
            .cloned()
            .ok_or(CoreError::ProcessNotFound(id))
    }

    /// The entry added last, used when a stop command names no id
    pub fn most_recently_added(&self) -> Result<(u32, H)> {
        let entries = self.lock();
        let id = *entries.order.last().ok_or(CoreError::NoProcesses)?;
        let handle = entries
            .by_id
            .get(&id)
            .cloned()
            .ok_or(CoreError::ProcessNotFound(id))?;
        Ok((id, handle))
    }

    /// Snapshot of every entry in insertion order
    pub fn list(&self) -> Vec<(u32, H)> {
        let entries = self.lock();
        entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id).map(|h| (*id, h.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }
}

impl<H: Clone> Default for ProcessRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
