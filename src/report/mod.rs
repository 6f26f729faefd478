//! Console progress reporting for pipeline runs.
//!
//! Recoverable and informational conditions (unresolved fields, scale
//! notices, empty filter results) are routed through these helpers so that
//! every stage prints in a consistent format. All output goes to stderr;
//! stdout is reserved for the final verdict lines.

use serde::{Deserialize, Serialize};

/// Log level for console display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into() }
    }

    /// Print this entry to stderr with its level prefix.
    pub fn emit(&self) {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        eprintln!("{} {}", prefix, self.message);
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LogEntry::info(msg).emit();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::success(msg).emit();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::warning(msg).emit();
}

pub fn log_error(msg: impl Into<String>) {
    LogEntry::error(msg).emit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_levels() {
        let entry = LogEntry::warning("scale notice");
        assert!(matches!(entry.level, LogLevel::Warning));
        assert_eq!(entry.message, "scale notice");
    }

    #[test]
    fn test_entry_serialization() {
        let entry = LogEntry::info("reading file");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"info\""));
        assert!(json.contains("reading file"));
    }
}
