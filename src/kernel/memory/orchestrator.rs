use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use super::store::VectorStore;
use super::types::{MemoryRecord, MemoryTier, Observation};
use crate::kernel::config::{ConfigError, MemoryConfig, TierThresholds};
use crate::kernel::telemetry::event::{EventDraft, Severity};
use crate::kernel::telemetry::pipeline::TelemetryPipeline;
use crate::kernel::time::epoch_ms;

/// Assigns captured workflow observations to retention tiers and mirrors
/// long-tier records into the external vector store.
///
/// The in-memory snapshot is the source of truth for session-local state.
/// Persistence is best-effort: a store failure becomes telemetry, never a
/// lost record.
pub struct TieredMemoryOrchestrator {
    thresholds: TierThresholds,
    persist_timeout: Duration,
    telemetry: Arc<TelemetryPipeline>,
    store: Arc<dyn VectorStore>,
    records: Mutex<Vec<MemoryRecord>>,
}

impl std::fmt::Debug for TieredMemoryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredMemoryOrchestrator")
            .field("thresholds", &self.thresholds)
            .field("persist_timeout", &self.persist_timeout)
            .field("telemetry", &self.telemetry)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl TieredMemoryOrchestrator {
    pub fn new(
        config: MemoryConfig,
        telemetry: Arc<TelemetryPipeline>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            thresholds: config.thresholds,
            persist_timeout: config.persist_timeout,
            telemetry,
            store,
            records: Mutex::new(Vec::new()),
        })
    }

    /// Tier assignment from importance. Monotonic: a higher importance never
    /// yields a lower tier (thresholds are validated at construction).
    pub fn classify(&self, importance: f64) -> MemoryTier {
        if importance >= self.thresholds.long {
            MemoryTier::Long
        } else if importance >= self.thresholds.working {
            MemoryTier::Working
        } else {
            MemoryTier::Short
        }
    }

    /// Classify the observation, append it to the snapshot, telemeter the
    /// capture. Long-tier records are additionally mirrored to the vector
    /// store before returning. Never fails.
    pub async fn capture(&self, observation: Observation) -> MemoryRecord {
        let tier = self.classify(observation.importance);
        let record = MemoryRecord {
            id: Uuid::new_v4(),
            category: observation.category,
            content: observation.content,
            importance: observation.importance,
            tier,
            created_at_ms: epoch_ms(),
        };

        self.records.lock().unwrap().push(record.clone());

        self.telemetry.record(
            EventDraft::new(
                "memory",
                tier.to_string(),
                Severity::Info,
                format!("Captured '{}' observation into {} tier", record.category, tier),
            )
            .with_data(json!({
                "record_id": record.id,
                "importance": record.importance,
            })),
        );

        if tier == MemoryTier::Long {
            self.persist(&record).await;
        }

        record
    }

    /// Move a record from `from` to `to`. A missing record or a tier that no
    /// longer equals `from` is a silent no-op: promotion races with another
    /// path are expected, not errors.
    pub fn promote(&self, record_id: Uuid, from: MemoryTier, to: MemoryTier) {
        let promoted = {
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.id == record_id) {
                Some(record) if record.tier == from => {
                    record.tier = to;
                    true
                }
                _ => false,
            }
        };

        if promoted {
            self.telemetry.record(
                EventDraft::new(
                    "memory",
                    "promotion",
                    Severity::Info,
                    format!("Promoted record from {} to {}", from, to),
                )
                .with_data(json!({
                    "record_id": record_id,
                    "from": from.to_string(),
                    "to": to.to_string(),
                })),
            );
        }
    }

    /// Immutable copy of all current records, insertion order preserved.
    pub fn snapshot(&self) -> Vec<MemoryRecord> {
        self.records.lock().unwrap().clone()
    }

    async fn persist(&self, record: &MemoryRecord) {
        let metadata = json!({
            "category": record.category,
            "importance": record.importance,
            "tier": record.tier.to_string(),
            "created_at_ms": record.created_at_ms,
        });

        let key = record.id.to_string();
        let outcome = tokio::time::timeout(
            self.persist_timeout,
            self.store.add_document(&key, &record.content, metadata),
        )
        .await;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(_) => Some(format!(
                "persistence timed out after {} ms",
                self.persist_timeout.as_millis()
            )),
        };

        if let Some(detail) = failure {
            warn!(record_id = %record.id, error = %detail, "vector store persistence failed");
            self.telemetry.record(
                EventDraft::new(
                    "memory",
                    "persistence",
                    Severity::Error,
                    format!("Vector store write failed: {}", detail),
                )
                .with_data(json!({ "record_id": record.id })),
            );
        }
    }
}
