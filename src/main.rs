use std::sync::Arc;

use helm::kernel::config::{ArbitrationConfig, MemoryConfig, TelemetryConfig};
use helm::kernel::memory::store::{InMemoryVectorStore, VectorStore};
use helm::kernel::memory::types::{MemoryTier, Observation};
use helm::kernel::telemetry::event::Severity;
use helm::kernel::workflow::types::{
    ActionKind, PhaseMetrics, Recommender, WorkflowAction, WorkflowState,
};
use helm::services::vector::client::HttpVectorStore;
use helm::{TelemetryPipeline, TieredMemoryOrchestrator, WorkflowArbitrator};

// Deterministic stand-in for the external recommender. Never touches the
// kernel directly; it only produces candidate actions for arbitration.
struct StubRecommender;

impl Recommender for StubRecommender {
    fn recommend(&self, state: &WorkflowState, metrics: &PhaseMetrics) -> WorkflowAction {
        if state.error_rate > 0.5 {
            WorkflowAction::new(ActionKind::Repeat, 0.2)
        } else if metrics.errors == 0 && state.complexity < 0.3 {
            WorkflowAction::new(ActionKind::Skip, 0.8)
        } else if state.satisfaction < 0.4 {
            WorkflowAction::new(ActionKind::Optimize, 0.6)
        } else {
            WorkflowAction::new(ActionKind::Continue, 0.9)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("Helm feedback-control layer booting...");

    let telemetry = Arc::new(TelemetryPipeline::new(TelemetryConfig::default())?);

    // Console mirror for anything above info, so overrides stand out.
    telemetry.on_event(|event| {
        if event.severity >= Severity::Warning {
            tracing::warn!(category = %event.category, kind = %event.kind, "{}", event.message);
        }
        Ok(())
    });

    let arbitrator = WorkflowArbitrator::new(ArbitrationConfig::default(), Arc::clone(&telemetry))?;

    // Point HELM_VECTOR_URL at a real endpoint to mirror long-tier memory
    // over HTTP; otherwise the run stays fully in-process.
    let store: Arc<dyn VectorStore> = match std::env::var("HELM_VECTOR_URL") {
        Ok(url) => {
            tracing::info!(%url, "mirroring long-tier memory over HTTP");
            Arc::new(HttpVectorStore::new(url, "helm-memory"))
        }
        Err(_) => Arc::new(InMemoryVectorStore::new()),
    };
    let orchestrator =
        TieredMemoryOrchestrator::new(MemoryConfig::default(), Arc::clone(&telemetry), store)?;

    let recommender = StubRecommender;

    // (phase, complexity, satisfaction, error_rate, errors)
    let phases = [
        ("analyze", 0.70, 0.60, 0.05, 2u32),
        ("plan", 0.50, 0.70, 0.10, 0),
        ("execute", 0.90, 0.35, 0.40, 3),
        ("review", 0.20, 0.80, 0.00, 0),
    ];

    for (iteration, (phase, complexity, satisfaction, error_rate, errors)) in
        phases.iter().enumerate()
    {
        let state = WorkflowState {
            phase: phase.to_string(),
            complexity: *complexity,
            satisfaction: *satisfaction,
            error_rate: *error_rate,
            elapsed_ms: (iteration as u64 + 1) * 1_500,
        };
        let metrics = PhaseMetrics {
            errors: *errors,
            warnings: 0,
            duration_ms: 1_500,
        };

        let recommended = recommender.recommend(&state, &metrics);
        let decision = arbitrator.decide(phase, &state, &metrics, recommended, iteration as u64);
        tracing::info!(
            phase,
            applied = %decision.action.kind,
            overridden = decision.overrides_recommendation,
            "{}",
            decision.reason
        );

        let importance = complexity.max(1.0 - satisfaction);
        let record = orchestrator
            .capture(Observation::new(
                "phase_outcome",
                format!("{} finished with {} error(s)", phase, errors),
                importance,
            ))
            .await;
        tracing::info!(phase, tier = %record.tier, "observation captured");
    }

    // Low-importance captures can be upgraded later by external review.
    if let Some(short_record) = orchestrator
        .snapshot()
        .iter()
        .find(|r| r.tier == MemoryTier::Short)
    {
        orchestrator.promote(short_record.id, MemoryTier::Short, MemoryTier::Working);
    }

    let summary = telemetry.summary();
    let snapshot = orchestrator.snapshot();
    let long_tier = snapshot
        .iter()
        .filter(|r| r.tier == MemoryTier::Long)
        .count();
    tracing::info!(
        total_events = summary.total_events,
        aggregates = summary.aggregates.len(),
        records = snapshot.len(),
        long_tier,
        "run complete"
    );

    Ok(())
}
