use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A diagnostic raised while binding or formatting a single record.
///
/// Messages are append-only payload: the engine creates them and pushes them
/// onto a [`RecordContext`](crate::RecordContext); it never reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Field the diagnostic is about (display text of the binding).
    pub field: String,
    pub severity: Severity,
    /// Rendered, human-readable text.
    pub text: String,
}

impl Message {
    pub fn new(field: impl Into<String>, severity: Severity, text: impl Into<String>) -> Self {
        Message {
            field: field.into(),
            severity,
            text: text.into(),
        }
    }

    pub fn error(field: impl Into<String>, text: impl Into<String>) -> Self {
        Message::new(field, Severity::Error, text)
    }

    pub fn warning(field: impl Into<String>, text: impl Into<String>) -> Self {
        Message::new(field, Severity::Warning, text)
    }

    pub fn info(field: impl Into<String>, text: impl Into<String>) -> Self {
        Message::new(field, Severity::Info, text)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.text)
    }
}
