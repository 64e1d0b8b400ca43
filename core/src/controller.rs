//! Fleet controller: the operations the command dispatcher calls
//!
//! The controller owns the registry for its whole lifetime and composes the
//! launcher and terminator around it:
//!
//! ```text
//! start    : launcher.launch → registry.add
//! stop     : registry.get → terminator.stop → registry.remove
//! stop ids : registry.get × n → terminator.stop_many → registry.remove × n
//! list     : registry.list
//! shutdown : registry.list → filter live → terminator.stop_many(wait)
//! ```

use crate::launcher::ProcessLauncher;
use crate::process::ChildHandle;
use crate::registry::ProcessRegistry;
use crate::terminator::ProcessTerminator;
use crate::{CoreError, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Id and display name of a tracked child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSummary {
    pub id: u32,
    pub display_name: String,
}

impl From<&ChildHandle> for ChildSummary {
    fn from(handle: &ChildHandle) -> Self {
        Self {
            id: handle.id(),
            display_name: handle.display_name().to_string(),
        }
    }
}

/// Which children a stop command addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopTarget {
    /// The child started most recently
    MostRecent,
    Single(u32),
    Many(Vec<u32>),
}

/// Starts, stops, lists and finally shuts down the fleet of children.
///
/// Every operation takes `&self`; a controller behind an `Arc` may serve
/// overlapping stop batches.
#[derive(Debug)]
pub struct FleetController {
    launcher: ProcessLauncher,
    terminator: ProcessTerminator,
    registry: ProcessRegistry,
}

impl FleetController {
    pub fn new(launcher: ProcessLauncher) -> Self {
        Self {
            launcher,
            terminator: ProcessTerminator::new(),
            registry: ProcessRegistry::new(),
        }
    }

    pub fn launcher(&self) -> &ProcessLauncher {
        &self.launcher
    }

    /// Spawn `executable_name` and start tracking it.
    ///
    /// Nothing is registered when the spawn fails.
    pub fn start(&self, executable_name: &str) -> Result<ChildSummary> {
        let handle = self.launcher.launch(executable_name)?;
        let summary = ChildSummary::from(&handle);
        self.registry.add(summary.id, Arc::new(handle))?;
        info!(
            "Starting process: id[{}], name:[{}]",
            summary.id, summary.display_name
        );
        Ok(summary)
    }

    /// Stop the addressed children, one outcome per resolved target.
    ///
    /// Failures are per id: an unknown id or failed kill in a batch does not
    /// prevent the remaining ids from being stopped.
    pub async fn stop(&self, target: StopTarget, wait: bool) -> Vec<Result<ChildSummary>> {
        match target {
            StopTarget::MostRecent => vec![self.stop_one(None, wait).await],
            StopTarget::Single(id) => vec![self.stop_one(Some(id), wait).await],
            StopTarget::Many(ids) => self.stop_many(&ids, wait).await,
        }
    }

    async fn stop_one(&self, id: Option<u32>, wait: bool) -> Result<ChildSummary> {
        if self.registry.is_empty() {
            return Err(CoreError::NoProcesses);
        }

        let (id, handle) = match id {
            Some(id) => (id, self.registry.get(id)?),
            None => self.registry.most_recently_added()?,
        };

        self.terminator.stop(&handle, wait).await?;
        self.registry.remove(id)?;
        Ok(ChildSummary::from(handle.as_ref()))
    }

    async fn stop_many(&self, ids: &[u32], wait: bool) -> Vec<Result<ChildSummary>> {
        if self.registry.is_empty() {
            return vec![Err(CoreError::NoProcesses)];
        }

        // Resolve every id up front; unknown ids are reported and skipped
        let mut outcomes = Vec::with_capacity(ids.len());
        let mut handles = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.registry.get(id) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!("Skipping stop of {}: {}", id, e);
                    outcomes.push(Err(e));
                }
            }
        }

        for (handle, result) in self.terminator.stop_many(handles, wait).await {
            let outcome = result
                .and_then(|()| self.registry.remove(handle.id()))
                .map(|removed| ChildSummary::from(removed.as_ref()));
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Snapshot of the tracked children in start order
    pub fn list(&self) -> Vec<ChildSummary> {
        self.registry
            .list()
            .iter()
            .map(|(_, handle)| ChildSummary::from(handle.as_ref()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Kill every child that is still alive and wait for all of them to exit.
    ///
    /// Children that already exited are skipped. The registry is dropped with
    /// the controller.
    pub async fn shutdown(self) -> Vec<Result<ChildSummary>> {
        let mut live = Vec::new();
        for (id, handle) in self.registry.list() {
            match handle.has_exited().await {
                Ok(true) => {}
                Ok(false) => live.push(handle),
                Err(e) => {
                    warn!("Could not query process {}; stopping it anyway: {}", id, e);
                    live.push(handle);
                }
            }
        }

        info!("Shutting down {} live process(es)", live.len());
        self.terminator
            .stop_many(live, true)
            .await
            .into_iter()
            .map(|(handle, result)| {
                match &result {
                    Ok(()) => {
                        if let Err(e) = self.registry.remove(handle.id()) {
                            warn!("Process {} already unregistered: {}", handle.id(), e);
                        }
                    }
                    Err(e) => {
                        error!("Failed to stop process {} on shutdown: {}", handle.id(), e)
                    }
                }
                result.map(|()| ChildSummary::from(handle.as_ref()))
            })
            .collect()
    }
}
