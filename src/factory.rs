//! Logger factory
//!
//! Turns a declarative list of transport kinds into an ordered set of
//! appenders, each with a fixed format and threshold:
//!
//! | kind      | threshold           | output                         |
//! |-----------|---------------------|--------------------------------|
//! | `Console` | every level         | colored line on stdout         |
//! | `File`    | `error`             | `logs/errors.log`              |
//! | `Sentry`  | `sentry_opts.level` | Sentry client (`sentry` crate) |

use crate::appenders::{ConsoleAppender, FileAppender, SentryAppender, SentryOptions};
use crate::core::{Appender, LogLevel, Logger, LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportKind {
    Console,
    File,
    Sentry,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Console => "CONSOLE",
            TransportKind::File => "FILE",
            TransportKind::Sentry => "SENTRY",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "CONSOLE" => Ok(TransportKind::Console),
            "FILE" => Ok(TransportKind::File),
            "SENTRY" => Ok(TransportKind::Sentry),
            _ => Err(LoggerError::unknown_transport(s)),
        }
    }
}

/// Per-transport options consumed during assembly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportContext {
    #[serde(default, rename = "sentryOpts", alias = "sentry_opts", skip_serializing_if = "Option::is_none")]
    pub sentry_opts: Option<SentryOptions>,
}

impl TransportContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentry(level: LogLevel, dsn: impl Into<String>) -> Self {
        Self {
            sentry_opts: Some(SentryOptions::new(level, dsn)),
        }
    }
}

/// Build one appender per kind, preserving order and duplicates.
///
/// # Errors
///
/// `Sentry` without `sentry_opts`, or with a malformed DSN, is a
/// configuration error; nothing is partially returned.
pub fn assemble_transports(
    kinds: &[TransportKind],
    context: &TransportContext,
) -> Result<Vec<Box<dyn Appender>>> {
    let mut appenders: Vec<Box<dyn Appender>> = Vec::with_capacity(kinds.len());

    for kind in kinds {
        match kind {
            TransportKind::Console => appenders.push(Box::new(ConsoleAppender::new())),
            TransportKind::File => appenders.push(Box::new(FileAppender::errors_log())),
            TransportKind::Sentry => {
                let options = context.sentry_opts.as_ref().ok_or_else(|| {
                    LoggerError::config("sentry", "SENTRY transport requested without sentry options")
                })?;
                appenders.push(Box::new(SentryAppender::new(options)?));
            }
        }
    }

    Ok(appenders)
}

/// Create a logger whose sinks are assembled from `kinds`.
///
/// The logger's own threshold is the lowest level; an empty `kinds` yields a
/// logger that accepts every call and writes nowhere.
///
/// # Example
///
/// ```
/// use logger_preset::{create_logger, TransportContext, TransportKind};
///
/// let logger = create_logger(&[TransportKind::Console], &TransportContext::default()).unwrap();
/// logger.info("LABEL::Helloworld");
/// logger.warn("Warning!!!");
/// ```
pub fn create_logger(kinds: &[TransportKind], context: &TransportContext) -> Result<Logger> {
    let mut logger = Logger::new();
    for appender in assemble_transports(kinds, context)? {
        logger.add_appender(appender);
    }
    Ok(logger)
}

/// Like [`create_logger`], with kinds given by name (`"CONSOLE"`, `"file"`, ...).
///
/// # Errors
///
/// Returns `UnknownTransport` for the first name that is not a known kind.
pub fn create_logger_from_names<S: AsRef<str>>(
    names: &[S],
    context: &TransportContext,
) -> Result<Logger> {
    let kinds = names
        .iter()
        .map(|name| name.as_ref().parse())
        .collect::<Result<Vec<TransportKind>>>()?;
    create_logger(&kinds, context)
}

/// Serializable logger configuration
///
/// ```
/// use logger_preset::{LoggerConfig, TransportKind};
///
/// let config = LoggerConfig::from_json(r#"{ "transports": ["CONSOLE", "FILE"] }"#).unwrap();
/// assert_eq!(config.transports, vec![TransportKind::Console, TransportKind::File]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub transports: Vec<TransportKind>,
    #[serde(default)]
    pub context: TransportContext,
}

impl LoggerConfig {
    /// Parse a configuration document.
    ///
    /// Unknown transport names surface as `UnknownTransport` rather than a
    /// generic JSON error.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Raw {
            transports: Vec<String>,
            #[serde(default)]
            context: TransportContext,
        }

        let raw: Raw = serde_json::from_str(json)?;
        let transports = raw
            .transports
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<TransportKind>>>()?;

        Ok(Self {
            transports,
            context: raw.context,
        })
    }

    pub fn build(&self) -> Result<Logger> {
        create_logger(&self.transports, &self.context)
    }
}
