//! Fleet controller binary
//!
//! Reads commands from stdin and manages a fleet of child worker processes.

use clap::Parser;
use fleet_cli::{Result, Session};
use fleet_core::{load_config_from_toml_path, utils, FleetConfig};
use std::path::PathBuf;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "fleet")]
#[command(about = "Spawn, list and stop child worker processes interactively")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Child executable to launch, resolved inside the base directory
    #[arg(long, value_name = "NAME")]
    child: Option<String>,

    /// Directory children are resolved against and run in
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> fleet_core::Result<FleetConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from_toml_path(path)?,
            None => FleetConfig::default(),
        };
        if let Some(child) = self.child {
            config.child_executable = child;
        }
        if let Some(dir) = self.base_dir {
            config.base_dir = Some(dir);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;
    utils::init_tracing(&config.log_level)?;

    let controller = utils::controller_from_config(&config)?;
    let session = Session::new(controller, config.child_executable.clone());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    if let Err(e) = session.run(stdin, &mut stdout, interrupted()).await {
        error!("Session failed: {}", e);
        return Err(e);
    }
    Ok(())
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
