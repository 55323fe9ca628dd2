//! Timestamp formatting utilities
//!
//! Each preset pairs a strftime pattern with the time zone it renders in.
//! Patterns use the 12-hour clock (`%I`) to match the `hh` token of the
//! console and error-file layouts.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Offset used by the error file, in seconds east of UTC
pub const ERROR_LOG_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Timestamp format presets
///
/// # Examples
///
/// ```
/// use logger_preset::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::ErrorFile.format(&at), "08/01/2025 05:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `DD/MM/YY hh:mm:ss` in local time, used by the console sink
    #[default]
    ConsoleShort,

    /// `DD/MM/YYYY hh:mm:ss` at UTC+7, used by the error file
    ErrorFile,

    /// RFC 3339 in UTC: `2025-01-08T10:30:45.123Z`
    Rfc3339,

    /// Custom strftime format rendered in UTC. An invalid pattern falls
    /// back to RFC 3339.
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::ConsoleShort => datetime
                .with_timezone(&Local)
                .format("%d/%m/%y %I:%M:%S")
                .to_string(),
            TimestampFormat::ErrorFile => datetime
                .with_timezone(&error_log_offset())
                .format("%d/%m/%Y %I:%M:%S")
                .to_string(),
            TimestampFormat::Rfc3339 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Custom(pattern) => {
                let mut rendered = String::new();
                if write!(rendered, "{}", datetime.format(pattern)).is_err() {
                    return TimestampFormat::Rfc3339.format(datetime);
                }
                rendered
            }
        }
    }
}

fn error_log_offset() -> FixedOffset {
    FixedOffset::east_opt(ERROR_LOG_UTC_OFFSET_SECS).expect("UTC+7 is within the valid offset range")
}
