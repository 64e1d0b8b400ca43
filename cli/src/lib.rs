//! Interactive command shell for the fleet controller

pub mod commands;
pub mod error;
pub mod session;

pub use commands::Command;
pub use error::{CliError, Result};
pub use session::{Flow, Session};
