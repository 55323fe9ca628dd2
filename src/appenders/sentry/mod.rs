//! Sentry appender for remote error tracking
//!
//! Entries at or above the configured level are captured through a
//! [`sentry::Client`]. The client owns delivery: its transport queues events
//! on a background thread, so logging never waits on the network. The
//! appender only passes level and DSN through and converts entries.

pub mod event;

pub use event::{event_from_entry, sentry_level, LOGGER_NAME};

use crate::core::{Appender, LogEntry, LogLevel, LoggerError, Result, DEFAULT_SHUTDOWN_TIMEOUT};
use serde::{Deserialize, Serialize};
use sentry::types::Dsn;
use sentry::{Client, ClientOptions, TransportFactory};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on how long `flush` waits for queued events
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection settings for the Sentry client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryClientOptions {
    pub dsn: String,
}

/// Options for the Sentry transport
///
/// Serialized as `{ "level": "error", "sentry": { "dsn": "..." } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryOptions {
    #[serde(default)]
    pub level: LogLevel,
    pub sentry: SentryClientOptions,
}

impl SentryOptions {
    pub fn new(level: LogLevel, dsn: impl Into<String>) -> Self {
        Self {
            level,
            sentry: SentryClientOptions { dsn: dsn.into() },
        }
    }
}

fn parse_dsn(raw: &str) -> Result<Dsn> {
    raw.parse::<Dsn>()
        .map_err(|e| LoggerError::invalid_dsn(raw, e.to_string()))
}

pub struct SentryAppender {
    min_level: LogLevel,
    client: Arc<Client>,
}

impl SentryAppender {
    /// Create an appender delivering over HTTP to the DSN in `options`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDsn` for a malformed DSN.
    #[cfg(feature = "http-transport")]
    pub fn new(options: &SentryOptions) -> Result<Self> {
        Self::with_transport(options, Arc::new(sentry::transports::DefaultTransportFactory))
    }

    #[cfg(not(feature = "http-transport"))]
    pub fn new(options: &SentryOptions) -> Result<Self> {
        parse_dsn(&options.sentry.dsn)?;
        Err(LoggerError::config(
            "sentry",
            "built without the `http-transport` feature; pass a transport to `with_transport`",
        ))
    }

    /// Create an appender whose client sends through `transport`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDsn` for a malformed DSN.
    pub fn with_transport(
        options: &SentryOptions,
        transport: Arc<dyn TransportFactory>,
    ) -> Result<Self> {
        let dsn = parse_dsn(&options.sentry.dsn)?;
        let client = Client::with_options(ClientOptions {
            dsn: Some(dsn),
            transport: Some(transport),
            // The process panic hook belongs to the crash supervisor
            default_integrations: false,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            ..Default::default()
        });

        Ok(Self {
            min_level: options.level,
            client: Arc::new(client),
        })
    }

    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }
}

impl Appender for SentryAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.client.capture_event(event_from_entry(entry), None);
        Ok(())
    }

    /// Wait, up to [`FLUSH_TIMEOUT`], for queued events to be sent
    fn flush(&mut self) -> Result<()> {
        if !self.client.flush(Some(FLUSH_TIMEOUT)) {
            eprintln!(
                "[LOGGER WARNING] Sentry flush timed out after {:?}; events may still be pending",
                FLUSH_TIMEOUT
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "sentry"
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

impl Drop for SentryAppender {
    fn drop(&mut self) {
        if !self.client.close(Some(DEFAULT_SHUTDOWN_TIMEOUT)) {
            eprintln!(
                "[LOGGER WARNING] Sentry client did not drain within {:?}. Events may be lost.",
                DEFAULT_SHUTDOWN_TIMEOUT
            );
        }
    }
}
