//! Spawning child processes according to the platform invocation plan

use crate::platform::{InvocationPlan, PlatformResolver};
use crate::process::ChildHandle;
use crate::{CoreError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Starts child processes relative to a fixed base directory.
///
/// Children get piped stdout/stderr, a null stdin, no shell in between, and the
/// base directory as their working directory.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    base_dir: PathBuf,
    plan: InvocationPlan,
}

impl ProcessLauncher {
    pub fn new(base_dir: impl Into<PathBuf>, resolver: &PlatformResolver) -> Self {
        Self::with_plan(base_dir, resolver.resolve_current())
    }

    /// Build a launcher with an explicit invocation plan
    pub fn with_plan(base_dir: impl Into<PathBuf>, plan: InvocationPlan) -> Self {
        Self {
            base_dir: base_dir.into(),
            plan,
        }
    }

    /// Directory of the running controller executable
    pub fn current_exe_dir() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        exe.parent().map(Path::to_path_buf).ok_or_else(|| {
            CoreError::InitializationError(format!(
                "Executable path {:?} has no parent directory",
                exe
            ))
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn plan(&self) -> &InvocationPlan {
        &self.plan
    }

    /// Absolute path of `executable_name` inside the base directory.
    ///
    /// Names without an extension get the platform executable suffix.
    pub fn resolve_path(&self, executable_name: &str) -> PathBuf {
        let mut path = self.base_dir.join(executable_name);
        let suffix = std::env::consts::EXE_SUFFIX;
        if !suffix.is_empty() && path.extension().is_none() {
            path.set_extension(suffix.trim_start_matches('.'));
        }
        path
    }

    /// Spawn `executable_name` and return its handle.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(&self, executable_name: &str) -> Result<ChildHandle> {
        if executable_name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "executable name cannot be empty".to_string(),
            ));
        }

        let path = self.resolve_path(executable_name);
        info!("Creating process by path: [{}]", path.display());

        let (program, args) = self.plan.program_and_args(&path);
        debug!("Spawning process: {:?} {:?}", program, args);

        let mut command = Command::new(&program);
        command
            .args(&args)
            .current_dir(&self.base_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        crate::process::unix::configure_command(&mut command);
        #[cfg(windows)]
        crate::process::windows::configure_command(&mut command);

        let child = command.spawn().map_err(|e| {
            error!("Failed to spawn process '{}': {}", path.display(), e);
            CoreError::ProcessSpawn(format!("Failed to spawn '{}': {}", path.display(), e))
        })?;

        let display_name = Path::new(&program)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| executable_name.to_string());

        let handle = ChildHandle::new(child, display_name)?;
        debug!("Successfully spawned process {}", handle.id());
        Ok(handle)
    }
}
