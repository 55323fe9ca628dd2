//! Logging macros with `format!`-style arguments.
//!
//! # Examples
//!
//! ```
//! use logger_preset::prelude::*;
//! use logger_preset::info;
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "SERVER::listening on port {}", port);
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use logger_preset::prelude::*;
/// # let logger = Logger::new();
/// use logger_preset::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a silly-level message, the most verbose level.
///
/// ```
/// # use logger_preset::prelude::*;
/// # let logger = Logger::new();
/// use logger_preset::silly;
/// silly!(logger, "tick {}", 1);
/// ```
#[macro_export]
macro_rules! silly {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Silly, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use logger_preset::prelude::*;
/// # let logger = Logger::new();
/// use logger_preset::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message. Reaches the error file and, depending on its
/// level, Sentry.
///
/// ```
/// # use logger_preset::prelude::*;
/// # let logger = Logger::new();
/// use logger_preset::error;
/// error!(logger, "DB::connection refused after {} retries", 3);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
