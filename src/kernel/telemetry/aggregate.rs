use std::collections::HashMap;

use super::event::{Severity, TelemetryEvent};

/// Running per-(category, kind) summary. Survives buffer flushes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryAggregate {
    pub count: u64,
    pub last_timestamp_ms: u64,
    pub peak_severity: Severity,
}

impl TelemetryAggregate {
    pub fn from_event(event: &TelemetryEvent) -> Self {
        Self {
            count: 1,
            last_timestamp_ms: event.timestamp_ms,
            peak_severity: event.severity,
        }
    }

    /// Atomic read-modify-write per recorded event. Severity never decreases.
    pub fn absorb(&mut self, event: &TelemetryEvent) {
        self.count += 1;
        self.last_timestamp_ms = event.timestamp_ms;
        self.peak_severity = self.peak_severity.max(event.severity);
    }
}

/// Point-in-time copy of the pipeline's lifetime counters.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub total_events: u64,
    pub aggregates: HashMap<(String, String), TelemetryAggregate>,
}

impl PipelineSummary {
    pub fn aggregate(&self, category: &str, kind: &str) -> Option<&TelemetryAggregate> {
        self.aggregates
            .get(&(category.to_string(), kind.to_string()))
    }
}
