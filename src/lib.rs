//! # Logger Preset
//!
//! A pre-configured logger factory with three transports and process-level
//! crash reporting.
//!
//! ## Features
//!
//! - **Console**: colored `[LABEL]: body [timestamp]` lines for every level
//! - **File**: error-level lines appended to `logs/errors.log`
//! - **Sentry**: events at or above a chosen level, delivered off-thread
//! - **Crash handlers**: unhandled failures and uncaught panics are logged
//!   with their location, optionally followed by a delayed exit
//!
//! ```
//! use logger_preset::prelude::*;
//!
//! let logger = create_logger(&[TransportKind::Console], &TransportContext::default())?;
//! logger.info("SERVER::listening on 8080");
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod core;
pub mod crash;
pub mod factory;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, SentryAppender, SentryOptions};
    pub use crate::core::{
        Appender, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, MetricsSnapshot, Result, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::crash::{
        install_crash_handlers, CrashEvent, CrashKind, CrashReport, CrashSupervisor, ProcessExit,
        StackFrame, FORCE_QUIT_DELAY,
    };
    pub use crate::factory::{
        create_logger, create_logger_from_names, LoggerConfig, TransportContext, TransportKind,
    };
}

pub use appenders::{ConsoleAppender, FileAppender, SentryAppender, SentryOptions};
pub use core::{
    Appender, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, MetricsSnapshot, Result, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crash::{install_crash_handlers, CrashEvent, CrashKind, CrashReport, CrashSupervisor};
pub use factory::{
    assemble_transports, create_logger, create_logger_from_names, LoggerConfig, TransportContext,
    TransportKind,
};
