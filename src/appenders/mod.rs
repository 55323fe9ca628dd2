//! Appender implementations

pub mod console;
pub mod file;
pub mod sentry;

pub use self::sentry::{SentryAppender, SentryOptions};
pub use console::ConsoleAppender;
pub use file::{FileAppender, DEFAULT_ERROR_LOG_PATH};

pub use crate::core::Appender;
