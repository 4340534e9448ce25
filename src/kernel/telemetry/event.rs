use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered severity scale. `Ord` is derived top-down from the variant order,
/// so escalation is a plain `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// An immutable record of something the system decided or observed.
/// Lives in the pipeline buffer until flushed; aggregates outlive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub id: Uuid,
    pub timestamp_ms: u64,
    /// Free-form namespace, e.g. "workflow".
    pub category: String,
    /// Free-form sub-namespace, e.g. "arbitration".
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Caller-facing input to `record`. Identifier and timestamp are optional
/// and auto-filled by the pipeline.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub id: Option<Uuid>,
    pub timestamp_ms: Option<u64>,
    pub category: String,
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl EventDraft {
    pub fn new(
        category: impl Into<String>,
        kind: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            timestamp_ms: None,
            category: category.into(),
            kind: kind.into(),
            severity,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
