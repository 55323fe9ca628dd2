//! Crash events and the reports derived from them

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

/// Location rendered when an event carries no stack frame
pub const UNKNOWN_LOCATION: &str = "<unknown>";

/// The two classes of process-level crash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrashKind {
    /// A failure from background work that nobody handled
    Unhandled,
    /// A panic that unwound out of user code
    Uncaught,
}

impl CrashKind {
    /// Tag prefixed to the log line so consumers can tell the classes apart
    pub fn tag(&self) -> &'static str {
        match self {
            CrashKind::Unhandled => "UN_HANDLED_ERROR",
            CrashKind::Uncaught => "UN_CAUGHT_ERROR",
        }
    }
}

impl fmt::Display for CrashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl StackFrame {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl FromStr for StackFrame {
    type Err = String;

    /// Parse the trailing `file:line:column` of a frame line.
    ///
    /// Accepts bare locations (`src/main.rs:10:5`) and decorated ones
    /// (`at handler (src/main.rs:10:5)`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let location = match trimmed.rfind('(') {
            Some(open) if trimmed.ends_with(')') => &trimmed[open + 1..trimmed.len() - 1],
            _ => trimmed.strip_prefix("at ").unwrap_or(trimmed).trim(),
        };

        let mut parts = location.rsplitn(3, ':');
        let column = parts.next().and_then(|c| c.parse::<u32>().ok());
        let line = parts.next().and_then(|l| l.parse::<u32>().ok());
        let file = parts.next().filter(|f| !f.is_empty());

        match (file, line, column) {
            (Some(file), Some(line), Some(column)) => Ok(StackFrame::new(file, line, column)),
            _ => Err(format!("not a stack frame: '{}'", s)),
        }
    }
}

/// Parse every line of a textual stack trace that names a location.
///
/// Lines without a `file:line:column` (the message header, native frames)
/// are skipped; the first returned frame is the innermost one.
pub fn parse_stack(stack: &str) -> Vec<StackFrame> {
    stack.lines().filter_map(|line| line.parse().ok()).collect()
}

/// A crash as delivered to listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashEvent {
    pub kind: CrashKind,
    pub message: String,
    /// Innermost frame first
    pub frames: Vec<StackFrame>,
}

impl CrashEvent {
    pub fn new(kind: CrashKind, message: impl Into<String>, frames: Vec<StackFrame>) -> Self {
        Self {
            kind,
            message: message.into(),
            frames,
        }
    }

    pub fn unhandled(message: impl Into<String>, frames: Vec<StackFrame>) -> Self {
        Self::new(CrashKind::Unhandled, message, frames)
    }

    pub fn uncaught(message: impl Into<String>, frames: Vec<StackFrame>) -> Self {
        Self::new(CrashKind::Uncaught, message, frames)
    }

    /// Build an event from a message and a textual stack trace
    pub fn from_stack_text(kind: CrashKind, message: impl Into<String>, stack: &str) -> Self {
        Self::new(kind, message, parse_stack(stack))
    }
}

/// The message and top-frame location of a crash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashReport {
    pub kind: CrashKind,
    pub message: String,
    pub error_at: String,
}

impl CrashReport {
    pub fn from_event(event: &CrashEvent) -> Self {
        let error_at = event
            .frames
            .first()
            .map(|frame| frame.to_string())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        Self {
            kind: event.kind,
            message: event.message.clone(),
            error_at,
        }
    }

    /// `UN_HANDLED_ERROR: message: {message}, Error At: {error_at}`
    pub fn log_line(&self) -> String {
        format!(
            "{}: message: {}, Error At: {}",
            self.kind.tag(),
            self.message,
            self.error_at
        )
    }
}
