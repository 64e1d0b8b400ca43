//! Windows spawn configuration

use tokio::process::Command;

/// Process creation flag that suppresses the console window
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Create the child without a visible console window
pub(crate) fn configure_command(command: &mut Command) {
    command.creation_flags(CREATE_NO_WINDOW);
}
