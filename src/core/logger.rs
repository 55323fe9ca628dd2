//! Main logger implementation

use super::{
    appender::Appender, error::Result, log_context::LogContext, log_entry::LogEntry,
    log_level::LogLevel, metrics::LoggerMetrics,
};
use crate::factory::{assemble_transports, TransportContext, TransportKind};
use parking_lot::RwLock;
use std::any::Any;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default time a background delivery worker gets to drain on drop (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

thread_local! {
    // Set while this thread holds the appender lock.
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

struct DispatchGuard;

impl DispatchGuard {
    /// Returns `None` when this thread is already dispatching.
    fn enter() -> Option<Self> {
        if DISPATCHING.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(DispatchGuard)
        }
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|flag| flag.set(false));
    }
}

/// Whether this thread is inside a dispatch to sinks
pub(crate) fn is_dispatching() -> bool {
    DISPATCHING.with(|flag| flag.get())
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// An ordered set of sinks behind a fixed, lowest-possible threshold.
///
/// Filtering is done by each appender's own `min_level`; the logger forwards
/// every entry. Share it across threads with `Arc<Logger>`.
pub struct Logger {
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    metrics: LoggerMetrics,
    /// When set, a panicking appender panics the logging call site too
    exit_on_error: AtomicBool,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            appenders: RwLock::new(Vec::new()),
            metrics: LoggerMetrics::new(),
            exit_on_error: AtomicBool::new(true),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use logger_preset::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .transports([TransportKind::Console])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.appender_names(), vec!["console"]);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn add_appender(&mut self, appender: Box<dyn Appender>) {
        self.appenders.get_mut().push(appender);
    }

    /// The logger's own threshold, always the lowest level
    pub fn min_level(&self) -> LogLevel {
        LogLevel::LOWEST
    }

    /// Names of the attached appenders, in dispatch order
    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .read()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    pub fn exit_on_error(&self) -> bool {
        self.exit_on_error.load(Ordering::SeqCst)
    }

    /// Control whether a panicking appender propagates to the caller.
    ///
    /// When disabled the panic is caught, reported on stderr and counted, and
    /// the remaining appenders still receive the entry.
    pub fn set_exit_on_error(&self, enabled: bool) {
        self.exit_on_error.store(enabled, Ordering::SeqCst);
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.send_entry(LogEntry::new(level, message.into()));
    }

    /// Log with metadata fields
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) {
        self.send_entry(LogEntry::new(level, message.into()).with_context(context));
    }

    /// Dispatch an already built entry
    pub fn send_entry(&self, entry: LogEntry) {
        let Some(_guard) = DispatchGuard::enter() else {
            // A sink or a panic hook on this thread logged while we hold the lock.
            eprintln!(
                "[LOGGER WARNING] Re-entrant log call dropped: {}: {}",
                entry.level, entry.message
            );
            self.metrics.record_dropped();
            return;
        };

        let mut appenders = self.appenders.write();
        let mut has_error = false;
        let mut propagate: Option<Box<dyn Any + Send>> = None;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            if !appender.accepts(entry.level) {
                continue;
            }

            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(&entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    has_error = true;
                    if self.exit_on_error() {
                        propagate.get_or_insert(panic_info);
                    } else {
                        self.metrics.record_isolated_panic();
                        eprintln!(
                            "[LOGGER CRITICAL] Appender #{} ({}) panicked: {}. \
                             Other appenders continue to function.",
                            idx,
                            appender.name(),
                            panic_message(panic_info.as_ref())
                        );
                    }
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }

        if let Some(payload) = propagate {
            drop(appenders);
            std::panic::resume_unwind(payload);
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Flush every appender, stopping at the first failure.
    ///
    /// A no-op when called from inside a dispatch on the same thread.
    pub fn flush(&self) -> Result<()> {
        let Some(_guard) = DispatchGuard::enter() else {
            return Ok(());
        };
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn silly(&self, message: impl Into<String>) {
        self.log(LogLevel::Silly, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn info_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Info, message, context);
    }

    pub fn error_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Error, message, context);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let snapshot = self.metrics.snapshot();
        if snapshot.dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                snapshot.dropped,
                snapshot.drop_rate()
            );
        }
    }
}

/// Builder for constructing a Logger from transport kinds
///
/// # Example
/// ```no_run
/// use logger_preset::prelude::*;
///
/// let logger = Logger::builder()
///     .transports([TransportKind::Console, TransportKind::Sentry])
///     .context(TransportContext::with_sentry(
///         LogLevel::Error,
///         "https://key@o0.ingest.sentry.io/42",
///     ))
///     .build()
///     .expect("valid logger configuration");
/// ```
pub struct LoggerBuilder {
    kinds: Vec<TransportKind>,
    context: TransportContext,
    extra: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            kinds: Vec::new(),
            context: TransportContext::default(),
            extra: Vec::new(),
        }
    }

    /// Append transport kinds, keeping order and duplicates
    #[must_use = "builder methods return a new value"]
    pub fn transports(mut self, kinds: impl IntoIterator<Item = TransportKind>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: TransportContext) -> Self {
        self.context = context;
        self
    }

    /// Add a custom appender after the assembled transports
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.extra.push(Box::new(appender));
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a requested transport cannot be
    /// assembled from the context.
    pub fn build(self) -> Result<Logger> {
        let mut logger = Logger::new();
        for appender in assemble_transports(&self.kinds, &self.context)? {
            logger.add_appender(appender);
        }
        for appender in self.extra {
            logger.add_appender(appender);
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
