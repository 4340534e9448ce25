use std::sync::Arc;

use serde_json::json;

use super::types::{ActionKind, ArbitrationDecision, PhaseMetrics, WorkflowAction, WorkflowState};
use crate::kernel::config::{ArbitrationConfig, ConfigError};
use crate::kernel::telemetry::event::{EventDraft, Severity};
use crate::kernel::telemetry::pipeline::TelemetryPipeline;

/// Policy layer between the recommender and the workflow driver. Vets each
/// proposed action against the safety thresholds and records the outcome as
/// telemetry.
///
/// `decide` is a pure function of its inputs plus the one telemetry side
/// effect. Every input combination yields a decision, never an error.
#[derive(Debug)]
pub struct WorkflowArbitrator {
    config: ArbitrationConfig,
    telemetry: Arc<TelemetryPipeline>,
}

impl WorkflowArbitrator {
    pub fn new(
        config: ArbitrationConfig,
        telemetry: Arc<TelemetryPipeline>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, telemetry })
    }

    pub fn decide(
        &self,
        phase: &str,
        state: &WorkflowState,
        metrics: &PhaseMetrics,
        recommended: WorkflowAction,
        iteration: u64,
    ) -> ArbitrationDecision {
        let mut action = recommended.clone();
        let mut overrides = false;
        let mut reason = String::from("Using recommendation");

        // Safety fallback: a shaky recommendation or a degraded workflow
        // forces `continue`, unless that is already what was recommended.
        let shaky = recommended.confidence < self.config.min_confidence
            || state.error_rate > self.config.max_error_rate;
        if shaky && recommended.kind != ActionKind::Continue {
            action = WorkflowAction::new(ActionKind::Continue, 1.0);
            overrides = true;
            reason = format!(
                "Fallback enforced: confidence {:.2} (min {:.2}), error rate {:.2} (max {:.2})",
                recommended.confidence,
                self.config.min_confidence,
                state.error_rate,
                self.config.max_error_rate
            );
        }

        // Skip guard: never skip past a phase that produced errors. Applies
        // on top of whatever the fallback decided.
        if recommended.kind == ActionKind::Skip && metrics.errors > 0 {
            action = WorkflowAction::new(ActionKind::Continue, 0.9);
            overrides = true;
            reason = format!(
                "Skip prevented: {} unresolved error(s) in current phase",
                metrics.errors
            );
        }

        let severity = if overrides {
            Severity::Warning
        } else {
            Severity::Info
        };
        self.telemetry.record(
            EventDraft::new("workflow", "arbitration", severity, reason.clone()).with_data(json!({
                "phase": phase,
                "iteration": iteration,
                "recommended": recommended.kind.to_string(),
                "applied": action.kind.to_string(),
                "recommended_confidence": recommended.confidence,
                "error_rate": state.error_rate,
            })),
        );

        ArbitrationDecision {
            action,
            overrides_recommendation: overrides,
            reason,
        }
    }
}
