//! Error file appender implementation

use crate::core::{Appender, LogEntry, LogLevel, LoggerError, Result, TimestampFormat};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Relative path the factory's file transport writes to
pub const DEFAULT_ERROR_LOG_PATH: &str = "logs/errors.log";

/// Appends `DD/MM/YYYY hh:mm:ss - level: message` lines for error entries.
///
/// The file is opened on the first write, not at construction.
pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    timestamp_format: TimestampFormat,
    min_level: LogLevel,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            timestamp_format: TimestampFormat::ErrorFile,
            min_level: LogLevel::Error,
        }
    }

    /// The appender used by the file transport: `logs/errors.log`
    pub fn errors_log() -> Self {
        Self::new(DEFAULT_ERROR_LOG_PATH)
    }

    /// Set the timestamp format for this appender
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    pub fn format_line(&self, entry: &LogEntry) -> String {
        format!(
            "{} - {}: {}",
            self.timestamp_format.format(&entry.timestamp),
            entry.level,
            entry.message
        )
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "creating log directory",
                        parent.display().to_string(),
                        e,
                    )
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| {
                    LoggerError::io_operation("opening log file", self.path.display().to_string(), e)
                })?;
            self.writer = Some(BufWriter::new(file));
        }

        self.writer
            .as_mut()
            .ok_or_else(|| LoggerError::file_appender(self.path.display().to_string(), "writer not initialized"))
    }
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut output = self.format_line(entry);
        output.push('\n');

        self.writer()?.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_no_io_until_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("errors.log");

        let mut appender = FileAppender::new(&path);
        assert!(!appender.is_open());
        assert!(!path.exists());

        appender.flush().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_creates_missing_directory_on_write() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("logs").join("errors.log");

        let mut appender = FileAppender::new(&path);
        appender.append(&LogEntry::new(LogLevel::Error, "disk check".to_string()))?;
        appender.flush()?;

        assert!(appender.is_open());
        let content = fs::read_to_string(&path)?;
        assert!(content.ends_with(" - error: disk check\n"));
        Ok(())
    }

    #[test]
    fn test_format_line() {
        let appender = FileAppender::errors_log();
        let entry = LogEntry::new(LogLevel::Error, "throw an error".to_string())
            .with_timestamp(chrono::Utc.with_ymd_and_hms(2025, 3, 1, 2, 15, 9).unwrap());

        assert_eq!(
            appender.format_line(&entry),
            "01/03/2025 09:15:09 - error: throw an error"
        );
        assert!(!appender.format_line(&entry).contains('\u{1b}'));
    }

    #[test]
    fn test_threshold_is_error() {
        let appender = FileAppender::errors_log();
        assert_eq!(appender.path(), Path::new(DEFAULT_ERROR_LOG_PATH));
        assert!(!appender.accepts(LogLevel::Warn));
        assert!(!appender.accepts(LogLevel::Silly));
        assert!(appender.accepts(LogLevel::Error));
    }

    #[test]
    fn test_appends_to_existing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("errors.log");
        fs::write(&path, "previous line\n")?;

        let mut appender = FileAppender::new(&path);
        appender.append(&LogEntry::new(LogLevel::Error, "next".to_string()))?;
        appender.flush()?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("previous line\n"));
        Ok(())
    }
}
