//! Core functionality for the fleet controller
//!
//! This crate spawns, tracks and terminates a set of independent child worker
//! processes. The command shell in `fleet-cli` talks only to
//! [`FleetController`].

pub mod config;
pub mod controller;
pub mod error;
pub mod launcher;
pub mod platform;
pub mod process;
pub mod registry;
pub mod terminator;

pub use config::{load_config_from_toml_path, load_config_from_toml_str, FleetConfig};
pub use controller::{ChildSummary, FleetController, StopTarget};
pub use error::{CoreError, Result};
pub use launcher::ProcessLauncher;
pub use platform::{InvocationPlan, OsFamily, PlatformResolver};
pub use process::ChildHandle;
pub use registry::ProcessRegistry;
pub use terminator::ProcessTerminator;

/// Core utilities and helper functions
pub mod utils {
    use tracing::{debug, info};

    /// Initialize tracing for the application.
    ///
    /// `RUST_LOG` wins over `level`. Output goes to stderr.
    pub fn init_tracing(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| crate::CoreError::InitializationError(e.to_string()))?;

        info!("Tracing initialized with level: {}", level);
        Ok(())
    }

    /// Build a controller from a validated configuration
    pub fn controller_from_config(
        config: &crate::FleetConfig,
    ) -> crate::Result<crate::FleetController> {
        config.validate()?;

        let base_dir = match &config.base_dir {
            Some(dir) => dir.clone(),
            None => crate::ProcessLauncher::current_exe_dir()?,
        };
        let resolver = crate::PlatformResolver::new(config.launcher.clone());
        let launcher = crate::ProcessLauncher::new(base_dir, &resolver);

        debug!(
            "Launching children from {:?} with plan {:?}",
            launcher.base_dir(),
            launcher.plan()
        );
        Ok(crate::FleetController::new(launcher))
    }
}
