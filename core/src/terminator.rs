//! Forceful termination of one or many child processes

use crate::process::ChildHandle;
use crate::{CoreError, Result};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Stateless terminator: acts only on the handles passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTerminator;

impl ProcessTerminator {
    pub fn new() -> Self {
        Self
    }

    /// Kill `handle` and optionally wait for the OS to confirm its exit.
    ///
    /// A handle that has already exited is left alone and reported as success.
    /// There is no timeout on the wait.
    pub async fn stop(&self, handle: &ChildHandle, wait: bool) -> Result<()> {
        if handle.has_exited().await? {
            debug!("Process {} already exited, nothing to stop", handle.id());
            return Ok(());
        }

        handle.kill().await?;

        if wait {
            info!("Waiting for process id[{}] exit...", handle.id());
            let status = handle.wait().await?;
            debug!("Process {} exited with status: {}", handle.id(), status);
        }

        info!(
            "Stopped process: id[{}], name:[{}]",
            handle.id(),
            handle.display_name()
        );
        Ok(())
    }

    /// Stop every handle on its own task and collect each outcome.
    ///
    /// Branches are independent: one failing or blocking in its wait does not
    /// delay or cancel the others. Returns once every branch has finished, in
    /// the same order as `handles`.
    pub async fn stop_many(
        &self,
        handles: Vec<Arc<ChildHandle>>,
        wait: bool,
    ) -> Vec<(Arc<ChildHandle>, Result<()>)> {
        let terminator = *self;
        let branches: Vec<_> = handles
            .into_iter()
            .map(|handle| {
                let branch_handle = Arc::clone(&handle);
                let task =
                    tokio::spawn(async move { terminator.stop(&branch_handle, wait).await });
                (handle, task)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(branches.len());
        for (handle, task) in branches {
            let outcome = match task.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Termination task for process {} failed: {}", handle.id(), e);
                    Err(CoreError::ProcessTermination {
                        pid: handle.id(),
                        reason: format!("termination task failed: {}", e),
                    })
                }
            };
            outcomes.push((handle, outcome));
        }
        outcomes
    }
}
