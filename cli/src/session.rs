//! Interactive command session driving a [`FleetController`]

use crate::commands::Command;
use crate::{CliError, Result};
use fleet_core::{ChildSummary, FleetController};
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, warn};

/// Whether the session keeps reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Reads commands line by line and reports results on `out`.
///
/// Controller errors are printed and the loop continues. Lines that are not
/// valid UTF-8 are ignored like any other unrecognized input. An I/O failure on
/// the session's own streams ends the loop early, but the fleet is still shut
/// down before that error is returned.
pub struct Session {
    controller: FleetController,
    executable: String,
}

impl Session {
    pub fn new(controller: FleetController, executable: impl Into<String>) -> Self {
        Self {
            controller,
            executable: executable.into(),
        }
    }

    /// Run until `exit`, end of input, or `interrupt` resolves, then shut the
    /// fleet down.
    pub async fn run<R, W, F>(self, input: R, out: &mut W, interrupt: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        F: Future<Output = ()>,
    {
        let loop_result = self.command_loop(input, out, interrupt).await;
        if let Err(e) = &loop_result {
            error!("Command loop ended early: {}", e);
        }

        let exit_result = writeln!(out, "Exiting...").map_err(CliError::from);
        let shutdown_result = self.shutdown(out).await;
        loop_result.and(exit_result).and(shutdown_result)
    }

    async fn command_loop<R, W, F>(&self, mut input: R, out: &mut W, interrupt: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        let mut buf = Vec::new();

        loop {
            writeln!(out, "\nWrite command:")?;
            out.flush()?;

            buf.clear();
            let read = tokio::select! {
                read = input.read_until(b'\n', &mut buf) => read?,
                _ = &mut interrupt => {
                    info!("Received interrupt, shutting down...");
                    return Ok(());
                }
            };
            if read == 0 {
                return Ok(());
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                debug!("Ignoring input line that is not valid UTF-8");
                continue;
            };

            let command = match Command::parse(line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Rejected command {:?}: {}", line, e);
                    writeln!(out, "stop: {}", e)?;
                    continue;
                }
            };

            if self.execute(command, out).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Execute one command against the controller
    pub async fn execute<W: Write>(&self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Start => match self.controller.start(&self.executable) {
                Ok(child) => writeln!(out, "Starting process: {}", describe(&child))?,
                Err(e) => writeln!(out, "start: {}", e)?,
            },
            Command::Stop { target, wait } => {
                for outcome in self.controller.stop(target, wait).await {
                    match outcome {
                        Ok(child) => writeln!(out, "Stopped process: {}", describe(&child))?,
                        Err(e) => writeln!(out, "stop: {}", e)?,
                    }
                }
            }
            Command::List => {
                let children = self.controller.list();
                if children.is_empty() {
                    writeln!(out, "There are no created child processes!")?;
                } else {
                    writeln!(out, "All created processes:")?;
                    for child in &children {
                        writeln!(out, "Process: {}", describe(child))?;
                    }
                }
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Terminate the fleet, then report each outcome
    async fn shutdown<W: Write>(self, out: &mut W) -> Result<()> {
        for outcome in self.controller.shutdown().await {
            match outcome {
                Ok(child) => writeln!(out, "Stopped process: {}", describe(&child))?,
                Err(e) => writeln!(out, "exit: {}", e)?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn describe(child: &ChildSummary) -> String {
    format!("id[{}], name:[{}]", child.id, child.display_name)
}
