//! Conversion of log entries into Sentry events

use crate::core::{LogEntry, LogLevel};
use sentry::protocol::{Event, Level};
use std::time::SystemTime;

/// Logger name reported on every event
pub const LOGGER_NAME: &str = "logger_preset";

/// Map a log level onto Sentry's level scale. `silly` has no counterpart
/// and reports as `debug`.
pub fn sentry_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Silly | LogLevel::Debug => Level::Debug,
        LogLevel::Info => Level::Info,
        LogLevel::Warn => Level::Warning,
        LogLevel::Error => Level::Error,
    }
}

/// Build the event captured for `entry`.
///
/// Context fields become `extra`; the thread name is added under `thread`
/// unless a field already uses that key.
pub fn event_from_entry(entry: &LogEntry) -> Event<'static> {
    let mut event = Event {
        level: sentry_level(entry.level),
        message: Some(entry.message.clone()),
        logger: Some(LOGGER_NAME.to_string()),
        platform: "other".into(),
        timestamp: SystemTime::from(entry.timestamp),
        ..Default::default()
    };

    if let Some(ref context) = entry.context {
        for (key, value) in context.fields() {
            event.extra.insert(key.clone(), value.clone());
        }
    }
    if let Some(ref name) = entry.thread_name {
        event
            .extra
            .entry("thread".to_string())
            .or_insert_with(|| name.clone().into());
    }

    event
}
