//! Logging utilities.
//!
//! Everything logs through the `log` facade. [`init_logging`] installs the
//! process logger: `env_logger` output, optionally teed into a [`LogConsole`]
//! that the editor's log window reads.

mod console;
mod init;

pub use console::{LevelVisibility, LogConsole, LogEntry, LogLevel, CONSOLE_CAPACITY};
pub use init::{init_logging, LoggingConfig};
