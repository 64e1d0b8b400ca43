//! Line-oriented command parsing
//!
//! ```text
//! start
//! stop [-wait]
//! stop[ -wait]=>ID=>ID...
//! list
//! exit
//! ```

use crate::{CliError, Result};
use fleet_core::StopTarget;

const ID_DELIMITER: &str = "=>";
const WAIT_FLAG: &str = "-wait";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop { target: StopTarget, wait: bool },
    List,
    Exit,
}

impl Command {
    /// Parse one input line.
    ///
    /// Blank and unrecognized lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        let command = match line {
            "" => None,
            "start" => Some(Command::Start),
            "list" => Some(Command::List),
            "exit" => Some(Command::Exit),
            stop if stop.starts_with("stop") => Some(parse_stop(stop)?),
            _ => None,
        };
        Ok(command)
    }
}

fn parse_stop(line: &str) -> Result<Command> {
    if !line.contains(ID_DELIMITER) {
        return Ok(Command::Stop {
            target: StopTarget::MostRecent,
            wait: line.contains(WAIT_FLAG),
        });
    }

    let mut pieces = line
        .split(ID_DELIMITER)
        .filter(|p| !p.trim().is_empty());
    // The line starts with "stop", so there is always a first piece
    let wait = pieces.next().is_some_and(|info| info.contains(WAIT_FLAG));

    let mut ids = pieces
        .map(|token| {
            let token = token.trim();
            token
                .parse::<u32>()
                .map_err(|_| CliError::ParseError(token.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let target = match ids.len() {
        0 => return Err(CliError::MissingIds),
        1 => StopTarget::Single(ids.remove(0)),
        _ => StopTarget::Many(ids),
    };
    Ok(Command::Stop { target, wait })
}
