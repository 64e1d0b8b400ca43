//! Test utilities for fleet controller integration tests.
#![allow(dead_code)]

use fleet_core::{FleetController, InvocationPlan, ProcessLauncher};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Worker that runs until killed
pub const SLEEPER: &str = "sleeper.sh";
/// Worker that exits on its own right away
pub const QUICK: &str = "quick.sh";

/// A controller whose children are shell scripts inside a temporary directory.
///
/// The scripts run through `sh`, so they never need to be executable.
pub fn script_controller() -> (TempDir, FleetController) {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_scripts(tmp.path());
    let launcher = ProcessLauncher::with_plan(
        tmp.path(),
        InvocationPlan::Interpreted {
            launcher: "sh".to_string(),
        },
    );
    (tmp, FleetController::new(launcher))
}

fn write_scripts(dir: &Path) {
    std::fs::write(dir.join(SLEEPER), "exec sleep 60\n").expect("write sleeper");
    std::fs::write(dir.join(QUICK), "exit 0\n").expect("write quick");
}

/// Whether a process with `pid` still exists (zombies included)
pub fn pid_exists(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    !matches!(kill(Pid::from_raw(pid as i32), None), Err(nix::errno::Errno::ESRCH))
}

/// Run the given future with a timeout, failing the test if it elapses.
pub async fn run_with_timeout<F, T>(duration: Duration, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(duration, fut)
        .await
        .expect("test timed out")
}

/// Run a future with a default timeout of 60 seconds.
pub async fn run_with_default_timeout<F, T>(fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    run_with_timeout(Duration::from_secs(60), fut).await
}
