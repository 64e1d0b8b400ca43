//! Unix spawn configuration and process-group signalling
//!
//! Every child calls `setsid()` before `exec()`, which makes it the leader of a
//! new session and process group with no controlling terminal. Signals sent to
//! the negative pid then reach the child and anything it forked.

// Allow unsafe code for this module since pre_exec requires it
#![allow(unsafe_code)]

use crate::{CoreError, Result};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;
use tracing::{debug, error};

/// Place the spawned process in its own session and process group
pub(crate) fn configure_command(command: &mut Command) {
    // Safety: setsid() is async-signal-safe and appropriate for use in pre_exec
    unsafe {
        command.pre_exec(|| {
            let result = libc::setsid();
            if result == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

/// Send SIGKILL to the process group led by `pid`.
///
/// `ESRCH` means the group is already gone and is reported as success. Any
/// other errno (`EPERM` included) is a termination failure, as is a pid that
/// cannot name a process group (0 would address our own group).
pub fn signal_kill_group(pid: u32) -> Result<()> {
    let pgid = match i32::try_from(pid) {
        Ok(pgid) if pgid > 0 => pgid,
        _ => {
            error!("Refusing to signal invalid process group {}", pid);
            return Err(CoreError::ProcessTermination {
                pid,
                reason: "not a valid process group id".to_string(),
            });
        }
    };
    debug!("Sending SIGKILL to process group {}", pid);

    match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Ok(()) => {
            debug!("Successfully sent SIGKILL to process group {}", pid);
            Ok(())
        }
        Err(nix::errno::Errno::ESRCH) => {
            debug!("Process group {} already exited", pid);
            Ok(())
        }
        Err(e) => {
            error!("Failed to send SIGKILL to process group {}: {}", pid, e);
            Err(CoreError::ProcessTermination {
                pid,
                reason: e.to_string(),
            })
        }
    }
}
