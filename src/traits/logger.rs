use chrono::Local;
use std::io::Write;
use std::sync::Mutex;

/// Timestamp layout used for every log line
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Log line captured by MockLogger for testing
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    Info(String),
    Warn(String),
    Error(String),
}

/// Leveled progress sink for an import run
pub trait RunLogger: Send + Sync {
    /// Record a progress message
    fn info(&self, message: &str);

    /// Record something the operator should look at
    fn warn(&self, message: &str);

    /// Record a failure
    fn error(&self, message: &str);
}

/// Writes timestamped lines to any writable sink
///
/// Each line is `<prefix><YYYY/MM/DD HH:MM:SS> <message>`. Warnings and errors
/// carry a `[WARN]`/`[ERROR]` tag in front of the message. Write failures are
/// ignored so that a broken log sink never aborts an import run.
pub struct WriterLogger {
    prefix: String,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl WriterLogger {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            prefix: String::new(),
            sink: Mutex::new(sink),
        }
    }

    /// Logger writing to the standard error stream
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Text placed before the timestamp of every line
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn write_line(&self, tag: Option<&str>, message: &str) {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let line = match tag {
            Some(tag) => format!("{}{} {} {}\n", self.prefix, timestamp, tag, message),
            None => format!("{}{} {}\n", self.prefix, timestamp, message),
        };

        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.write_all(line.as_bytes());
            let _ = sink.flush();
        }
    }
}

impl RunLogger for WriterLogger {
    fn info(&self, message: &str) {
        self.write_line(None, message);
    }

    fn warn(&self, message: &str) {
        self.write_line(Some("[WARN]"), message);
    }

    fn error(&self, message: &str) {
        self.write_line(Some("[ERROR]"), message);
    }
}

/// Mock logger implementation for testing (captures lines)
#[cfg(test)]
pub struct MockLogger {
    lines: Mutex<Vec<LogLine>>,
}

#[cfg(test)]
impl MockLogger {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Get all captured lines
    pub fn get_lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Get all warning messages
    pub fn get_warnings(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter_map(|line| match line {
                LogLine::Warn(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Get all error messages
    pub fn get_errors(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter_map(|line| match line {
                LogLine::Error(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Check whether any line contains the given text
    pub fn contains(&self, text: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|line| match line {
            LogLine::Info(msg) | LogLine::Warn(msg) | LogLine::Error(msg) => msg.contains(text),
        })
    }
}

#[cfg(test)]
impl Default for MockLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl RunLogger for MockLogger {
    fn info(&self, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(LogLine::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(LogLine::Warn(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(LogLine::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{FileSystem, MockFileSystem};
    use regex::Regex;
    use std::path::Path;
    use std::sync::Arc;

    #[test]
    fn test_writer_logger_line_format() {
        let fs = Arc::new(MockFileSystem::new());
        let path = Path::new("/tmp/run.log");
        let logger = WriterLogger::new(fs.open_append(path).unwrap()).with_prefix("rgimport ");

        logger.info("List resources");
        logger.warn("No mapping information for resource: /a, skip it");
        logger.error("Failed to import /b as x.y: boom");

        let contents = fs.get_file_contents(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);

        let stamp = r"rgimport \d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2} ";
        assert!(Regex::new(&format!("^{}List resources$", stamp))
            .unwrap()
            .is_match(lines[0]));
        assert!(Regex::new(&format!(r"^{}\[WARN\] No mapping", stamp))
            .unwrap()
            .is_match(lines[1]));
        assert!(Regex::new(&format!(r"^{}\[ERROR\] Failed to import /b", stamp))
            .unwrap()
            .is_match(lines[2]));
    }

    #[test]
    fn test_mock_logger_captures_levels() {
        let logger = MockLogger::new();
        logger.info("a");
        logger.warn("b");
        logger.error("c");

        assert_eq!(
            logger.get_lines(),
            vec![
                LogLine::Info("a".to_string()),
                LogLine::Warn("b".to_string()),
                LogLine::Error("c".to_string()),
            ]
        );
        assert_eq!(logger.get_warnings(), vec!["b".to_string()]);
        assert_eq!(logger.get_errors(), vec!["c".to_string()]);
        assert!(logger.contains("c"));
    }
}
