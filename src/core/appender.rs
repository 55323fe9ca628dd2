//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};

/// A sink the logger dispatches entries to.
///
/// Each appender owns its severity threshold; the logger itself never filters.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Lowest level this appender accepts. Fixed at construction.
    fn min_level(&self) -> LogLevel;

    fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }
}
