//! Child process handles and platform-specific spawn/kill primitives
//!
//! - **Unix**: each child becomes the leader of its own session and process
//!   group, and forceful termination signals the whole group with SIGKILL.
//! - **Windows**: each child is created without a console window and is
//!   killed through the runtime's child handle.

#[cfg(unix)]
pub mod unix;
#[cfg(windows)]
pub mod windows;

use crate::{CoreError, Result};
use std::process::ExitStatus;
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::debug;

/// One spawned child process.
///
/// The wrapped OS handle is owned exclusively by this value. The registry and
/// terminator share the `ChildHandle` itself (behind an `Arc`) for the duration
/// of an operation.
#[derive(Debug)]
pub struct ChildHandle {
    id: u32,
    display_name: String,
    child: Mutex<Child>,
}

impl ChildHandle {
    pub(crate) fn new(child: Child, display_name: impl Into<String>) -> Result<Self> {
        let id = child
            .id()
            .ok_or_else(|| CoreError::ProcessSpawn("Spawned child did not have a PID".to_string()))?;
        Ok(Self {
            id,
            display_name: display_name.into(),
            child: Mutex::new(child),
        })
    }

    /// Handle that reports `id` instead of the child's real pid
    #[cfg(test)]
    pub(crate) fn with_id(child: Child, id: u32, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            child: Mutex::new(child),
        }
    }

    /// Process identifier assigned by the OS at spawn time
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Human-readable name of the spawned program
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Query the OS for whether the process has exited. Never cached.
    pub async fn has_exited(&self) -> Result<bool> {
        let mut child = self.child.lock().await;
        let status = child.try_wait().map_err(|e| {
            CoreError::ProcessWait(format!("Failed to try_wait for process {}: {}", self.id, e))
        })?;
        Ok(status.is_some())
    }

    /// Request forceful termination without waiting for the exit to be observed
    pub async fn kill(&self) -> Result<()> {
        debug!("Killing process {}", self.id);

        #[cfg(unix)]
        {
            unix::signal_kill_group(self.id)
        }

        #[cfg(not(unix))]
        {
            let mut child = self.child.lock().await;
            child.start_kill().map_err(|e| CoreError::ProcessTermination {
                pid: self.id,
                reason: e.to_string(),
            })
        }
    }

    /// Block until the OS reports that the process has exited
    pub async fn wait(&self) -> Result<ExitStatus> {
        let mut child = self.child.lock().await;
        child.wait().await.map_err(|e| {
            CoreError::ProcessWait(format!("Failed to wait for process {}: {}", self.id, e))
        })
    }
}
