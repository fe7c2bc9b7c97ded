pub mod command;
pub mod filesystem;
pub mod logger;

pub use command::{failure_message, CommandExecutor, RealCommandExecutor};
pub use filesystem::{FileSystem, RealFileSystem};
pub use logger::{RunLogger, WriterLogger};

#[cfg(test)]
pub use command::{MockCommandExecutor, MockCommandResult};
#[cfg(test)]
pub use filesystem::MockFileSystem;
#[cfg(test)]
pub use logger::{LogLine, MockLogger};
