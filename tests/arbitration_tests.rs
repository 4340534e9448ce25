use std::sync::Arc;

use helm::kernel::config::{ArbitrationConfig, ConfigError, TelemetryConfig};
use helm::kernel::telemetry::event::Severity;
use helm::kernel::workflow::types::{ActionKind, PhaseMetrics, WorkflowAction, WorkflowState};
use helm::{TelemetryPipeline, WorkflowArbitrator};

fn setup(config: ArbitrationConfig) -> (Arc<TelemetryPipeline>, WorkflowArbitrator) {
    let telemetry = Arc::new(TelemetryPipeline::new(TelemetryConfig::default()).unwrap());
    let arbitrator = WorkflowArbitrator::new(config, Arc::clone(&telemetry)).unwrap();
    (telemetry, arbitrator)
}

fn state(error_rate: f64) -> WorkflowState {
    WorkflowState {
        phase: "execute".to_string(),
        complexity: 0.5,
        satisfaction: 0.6,
        error_rate,
        elapsed_ms: 1_000,
    }
}

fn clean_metrics() -> PhaseMetrics {
    PhaseMetrics {
        errors: 0,
        warnings: 0,
        duration_ms: 500,
    }
}

#[test]
fn test_accepts_confident_recommendation() {
    let config = ArbitrationConfig {
        min_confidence: 0.4,
        max_error_rate: 0.30,
    };
    let (_telemetry, arbitrator) = setup(config);

    let recommended = WorkflowAction::new(ActionKind::Continue, 0.7);
    let decision = arbitrator.decide(
        "execute",
        &state(0.05),
        &clean_metrics(),
        recommended.clone(),
        1,
    );

    assert_eq!(decision.action, recommended, "Recommendation accepted verbatim");
    assert!(!decision.overrides_recommendation);
    assert_eq!(decision.reason, "Using recommendation");
}

#[test]
fn test_skip_prevented_when_phase_has_errors() {
    let (_telemetry, arbitrator) = setup(ArbitrationConfig::default());

    let metrics = PhaseMetrics {
        errors: 2,
        warnings: 0,
        duration_ms: 500,
    };
    let decision = arbitrator.decide(
        "execute",
        &state(0.05),
        &metrics,
        WorkflowAction::new(ActionKind::Skip, 0.8),
        3,
    );

    assert_eq!(decision.action.kind, ActionKind::Continue);
    assert_eq!(decision.action.confidence, 0.9);
    assert!(decision.overrides_recommendation);
    assert!(
        decision.reason.contains("Skip prevented"),
        "Reason must cite error prevention, got: {}",
        decision.reason
    );
}

#[test]
fn test_fallback_enforced_on_shaky_recommendation() {
    let config = ArbitrationConfig {
        min_confidence: 0.6,
        max_error_rate: 0.3,
    };
    let (_telemetry, arbitrator) = setup(config);

    let decision = arbitrator.decide(
        "execute",
        &state(0.4),
        &clean_metrics(),
        WorkflowAction::new(ActionKind::Optimize, 0.2),
        0,
    );

    assert_eq!(decision.action.kind, ActionKind::Continue);
    assert_eq!(decision.action.confidence, 1.0);
    assert!(decision.overrides_recommendation);
    assert!(decision.reason.contains("Fallback enforced"));
    assert!(
        decision.reason.contains("0.20") && decision.reason.contains("0.40"),
        "Reason must state both triggering values to two decimals, got: {}",
        decision.reason
    );
}

#[test]
fn test_fallback_leaves_continue_recommendation_alone() {
    let (_telemetry, arbitrator) = setup(ArbitrationConfig::default());

    // Confidence far below the minimum, but the action is already continue.
    let recommended = WorkflowAction::new(ActionKind::Continue, 0.05);
    let decision = arbitrator.decide(
        "plan",
        &state(0.05),
        &clean_metrics(),
        recommended.clone(),
        0,
    );

    assert_eq!(decision.action, recommended);
    assert!(!decision.overrides_recommendation);
}

#[test]
fn test_skip_guard_wins_over_fallback() {
    let config = ArbitrationConfig {
        min_confidence: 0.6,
        max_error_rate: 0.3,
    };
    let (_telemetry, arbitrator) = setup(config);

    let metrics = PhaseMetrics {
        errors: 1,
        warnings: 0,
        duration_ms: 500,
    };
    // Low confidence skip triggers the fallback first, then the skip guard
    // re-overrides with its own confidence.
    let decision = arbitrator.decide(
        "execute",
        &state(0.05),
        &metrics,
        WorkflowAction::new(ActionKind::Skip, 0.1),
        0,
    );

    assert_eq!(decision.action.kind, ActionKind::Continue);
    assert_eq!(decision.action.confidence, 0.9);
    assert!(decision.reason.contains("Skip prevented"));
}

#[test]
fn test_exactly_one_event_per_decision() {
    let (telemetry, arbitrator) = setup(ArbitrationConfig::default());

    for iteration in 0..3 {
        arbitrator.decide(
            "analyze",
            &state(0.05),
            &clean_metrics(),
            WorkflowAction::new(ActionKind::Continue, 0.9),
            iteration,
        );
    }

    let summary = telemetry.summary();
    assert_eq!(summary.total_events, 3);
    let agg = summary.aggregate("workflow", "arbitration").unwrap();
    assert_eq!(agg.count, 3);
    assert_eq!(agg.peak_severity, Severity::Info);
}

#[test]
fn test_override_escalates_event_severity() {
    let (telemetry, arbitrator) = setup(ArbitrationConfig::default());

    let metrics = PhaseMetrics {
        errors: 1,
        warnings: 0,
        duration_ms: 500,
    };
    arbitrator.decide(
        "execute",
        &state(0.05),
        &metrics,
        WorkflowAction::new(ActionKind::Skip, 0.8),
        0,
    );

    let summary = telemetry.summary();
    let agg = summary.aggregate("workflow", "arbitration").unwrap();
    assert_eq!(agg.peak_severity, Severity::Warning);
}

#[test]
fn test_decision_payload_describes_both_actions() {
    let (telemetry, arbitrator) = setup(ArbitrationConfig::default());

    let metrics = PhaseMetrics {
        errors: 2,
        warnings: 1,
        duration_ms: 500,
    };
    arbitrator.decide(
        "execute",
        &state(0.12),
        &metrics,
        WorkflowAction::new(ActionKind::Skip, 0.8),
        7,
    );

    let events = telemetry.flush();
    assert_eq!(events.len(), 1);
    let data = events[0].data.as_ref().expect("decision carries data");
    assert_eq!(data["phase"], "execute");
    assert_eq!(data["iteration"], 7);
    assert_eq!(data["recommended"], "skip");
    assert_eq!(data["applied"], "continue");
    assert_eq!(data["recommended_confidence"], 0.8);
    assert_eq!(data["error_rate"], 0.12);
}

#[test]
fn test_out_of_range_config_rejected() {
    let telemetry = Arc::new(TelemetryPipeline::new(TelemetryConfig::default()).unwrap());
    let config = ArbitrationConfig {
        min_confidence: 1.5,
        max_error_rate: 0.3,
    };
    let err = WorkflowArbitrator::new(config, telemetry).expect_err("1.5 is out of range");
    assert!(matches!(
        err,
        ConfigError::OutOfRange {
            field: "min_confidence",
            ..
        }
    ));
}
