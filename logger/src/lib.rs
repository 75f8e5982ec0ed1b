use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq)]
enum LogLevel {
    Info(Color),
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Shared in-memory copy of every line written through an in-memory logger.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    /// Returns a snapshot of the lines logged so far, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    fn push(&self, line: String) -> Result<(), LoggerError> {
        self.lines
            .lock()
            .map_err(|_| LoggerError::Poisoned)?
            .push(line);
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Sink {
    File(PathBuf),
    Console,
    Memory(LogBuffer),
}

/// Leveled logger. Every line carries a UTC timestamp and the name of the
/// component that owns the logger:
///
/// ```text
/// [WARN] [2025-01-01 12:00:00] [live_flights]: message
/// ```
///
/// Cloning a `Logger` is cheap and all clones write to the same sink.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    sink: Sink,
}

impl Logger {
    /// Creates a logger that writes to `<log_dir>/<name>.log`.
    ///
    /// # Parameters
    /// - `log_dir`: Directory for the log file. It is created when missing.
    /// - `name`: Component name, used in every line and in the file name.
    ///
    /// # Errors
    /// `LoggerError::InvalidPath` when `log_dir` exists but is not a directory,
    /// `LoggerError::IoError` when the directory or file cannot be created.
    pub fn new(log_dir: &Path, name: &str) -> Result<Self, LoggerError> {
        if log_dir.exists() && !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }
        std::fs::create_dir_all(log_dir)?;

        let file_name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let log_file = log_dir.join(format!("{}.log", file_name));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            name: name.to_string(),
            sink: Sink::File(log_file),
        })
    }

    /// Creates a logger that only prints to standard output.
    pub fn console(name: &str) -> Self {
        Logger {
            name: name.to_string(),
            sink: Sink::Console,
        }
    }

    /// Creates a logger that keeps its lines in memory, returning the buffer
    /// they can be read back from.
    pub fn in_memory(name: &str) -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        let logger = Logger {
            name: name.to_string(),
            sink: Sink::Memory(buffer.clone()),
        };
        (logger, buffer)
    }

    /// Path of the log file, if this logger writes to one.
    pub fn path(&self) -> Option<&Path> {
        match &self.sink {
            Sink::File(path) => Some(path),
            _ => None,
        }
    }

    fn format(&self, level: LogLevel, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let tag = match level {
            LogLevel::Info(_) => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        format!("[{}] [{}] [{}]: {}", tag, timestamp, self.name, message)
    }

    fn log(&self, level: LogLevel, message: &str, to_console: bool) -> Result<(), LoggerError> {
        let line = self.format(level, message);

        if to_console || matches!(self.sink, Sink::Console) {
            let color = match level {
                LogLevel::Info(color) => color.to_ansi_code(),
                LogLevel::Warn => "\x1b[93m",
                LogLevel::Error => "\x1b[91m",
            };
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}{}\x1b[0m", color, line)?;
            stdout.flush()?;
        }

        match &self.sink {
            Sink::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{}", line)?;
                file.flush()?;
            }
            Sink::Memory(buffer) => buffer.push(line)?,
            Sink::Console => {}
        }

        Ok(())
    }

    /// Logs an informational message.
    ///
    /// # Parameters
    /// - `message`: The informational message to log.
    /// - `color`: The color to use for the console output.
    /// - `to_console`: Whether to echo the message to the console as well.
    pub fn info(&self, message: &str, color: Color, to_console: bool) -> Result<(), LoggerError> {
        self.log(LogLevel::Info(color), message, to_console)
    }

    /// Logs a warning message.
    pub fn warn(&self, message: &str, to_console: bool) -> Result<(), LoggerError> {
        self.log(LogLevel::Warn, message, to_console)
    }

    /// Logs an error message.
    pub fn error(&self, message: &str, to_console: bool) -> Result<(), LoggerError> {
        self.log(LogLevel::Error, message, to_console)
    }
}

#[derive(Debug)]
pub enum LoggerError {
    IoError(std::io::Error),
    InvalidPath(String),
    Poisoned,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::IoError(e) => write!(f, "I/O Error: {}", e),
            LoggerError::InvalidPath(msg) => write!(f, "Invalid Path: {}", msg),
            LoggerError::Poisoned => write!(f, "Log buffer lock poisoned"),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("logger_{}_{}", label, std::process::id()))
    }

    #[test]
    fn test_file_logger_creates_directory_and_writes() {
        let log_dir = temp_dir("file");
        let _ = fs::remove_dir_all(&log_dir);

        let logger = Logger::new(&log_dir, "live flights").expect("Failed to create logger");
        logger
            .info("Polling started", Color::Green, false)
            .expect("Failed to log message");
        logger.error("Backend unreachable", false).unwrap();

        let path = logger.path().expect("File logger has a path");
        assert_eq!(path, log_dir.join("live_flights.log"));
        let contents = fs::read_to_string(path).expect("Failed to read log file");
        assert!(contents.contains("[INFO]"));
        assert!(contents.contains("[live flights]: Polling started"));
        assert!(contents.contains("[ERROR]"));
        assert_eq!(contents.lines().count(), 2);

        fs::remove_dir_all(&log_dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_file_in_place_of_directory_is_invalid() {
        let not_a_dir = temp_dir("not_a_dir");
        fs::write(&not_a_dir, b"").unwrap();

        let result = Logger::new(&not_a_dir, "live_flights");
        assert!(matches!(result, Err(LoggerError::InvalidPath(_))));

        fs::remove_file(&not_a_dir).unwrap();
    }

    #[test]
    fn test_console_logger_writes_nowhere_else() {
        let not_a_dir = temp_dir("console_fallback");
        fs::write(&not_a_dir, b"").unwrap();

        let logger = Logger::new(&not_a_dir, "live_flights")
            .unwrap_or_else(|_| Logger::console("live_flights"));

        assert!(logger.path().is_none());
        assert!(logger.info("Polling started", Color::Cyan, false).is_ok());
        assert!(logger.warn("Cannot log to file", false).is_ok());
        assert!(!not_a_dir.with_extension("log").exists());

        fs::remove_file(&not_a_dir).unwrap();
    }

    #[test]
    fn test_in_memory_logger_is_shared_between_clones() {
        let (logger, buffer) = Logger::in_memory("sync");
        let clone = logger.clone();

        logger.warn("first", false).unwrap();
        clone.error("second", false).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[WARN]"));
        assert!(lines[1].starts_with("[ERROR]"));
        assert!(buffer.contains("[sync]: second"));
        assert!(logger.path().is_none());
    }
}
