use crate::traits::{
    CommandExecutor, FileSystem, RealCommandExecutor, RealFileSystem, RunLogger, WriterLogger,
};
#[cfg(test)]
use crate::traits::{MockCommandExecutor, MockFileSystem, MockLogger};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub command: Arc<dyn CommandExecutor>,
    pub logger: Arc<dyn RunLogger>,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new() -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            command: Arc::new(RealCommandExecutor::new()),
            logger: Arc::new(WriterLogger::stderr()),
        }
    }

    /// Replace the run logger, keeping the other dependencies
    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            command: Arc::new(MockCommandExecutor::new()),
            logger: Arc::new(MockLogger::new()),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        command: Arc<dyn CommandExecutor>,
        logger: Arc<dyn RunLogger>,
    ) -> Self {
        Self {
            fs,
            command,
            logger,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            command: Arc::clone(&self.command),
            logger: Arc::clone(&self.logger),
        }
    }
}
