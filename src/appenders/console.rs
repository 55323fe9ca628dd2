//! Console appender implementation

use crate::core::{Appender, LogEntry, LogLevel, Result, TimestampFormat};
use colored::{Color, Colorize};

/// Delimiter separating an inline label from the message body
pub const LABEL_DELIMITER: &str = "::";

/// Writes `[LABEL]: body [DD/MM/YY hh:mm:ss]` lines to stdout.
///
/// A message of the form `"db::connected"` is rendered with the label `DB`
/// and the body `connected`; otherwise the label is the upper-cased level.
pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::ConsoleShort,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::ConsoleShort,
        }
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```
    /// use logger_preset::appenders::ConsoleAppender;
    /// use logger_preset::TimestampFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render an entry without the trailing newline
    pub fn format_line(&self, entry: &LogEntry) -> String {
        let (label, body) = split_label(&entry.message, entry.level);
        let label = format!("[{}]", label);
        let timestamp = format!("[{}]", self.timestamp_format.format(&entry.timestamp));

        if self.use_colors {
            format!(
                "{}: {} {}",
                label.on_color(entry.level.color_code()).color(Color::Black),
                body,
                timestamp.dimmed().color(Color::Black)
            )
        } else {
            format!("{}: {} {}", label, body, timestamp)
        }
    }
}

/// Split a raw message into its upper-cased label and body.
///
/// The first `::` separates the two; without it the level names the label.
pub fn split_label(message: &str, level: LogLevel) -> (String, &str) {
    match message.split_once(LABEL_DELIMITER) {
        Some((label, body)) => (label.to_uppercase(), body),
        None => (level.to_str().to_uppercase(), message),
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        println!("{}", self.format_line(entry));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Silly
    }
}
