use serde::{Deserialize, Serialize};

/// The tagged workflow actions a recommender may propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Continue,
    Skip,
    Repeat,
    Branch,
    Optimize,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionKind::Continue => "continue",
            ActionKind::Skip => "skip",
            ActionKind::Repeat => "repeat",
            ActionKind::Branch => "branch",
            ActionKind::Optimize => "optimize",
        };
        f.write_str(s)
    }
}

/// A proposed workflow action. Produced by the external recommender; may be
/// overridden by the arbitrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAction {
    pub kind: ActionKind,
    pub target: Option<String>,
    /// 0.0 to 1.0
    pub confidence: f64,
}

impl WorkflowAction {
    pub fn new(kind: ActionKind, confidence: f64) -> Self {
        Self {
            kind,
            target: None,
            confidence,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Current workflow state, owned by the external driver and passed in per
/// decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub phase: String,
    pub complexity: f64,
    pub satisfaction: f64,
    /// 0.0 to 1.0
    pub error_rate: f64,
    pub elapsed_ms: u64,
}

/// Per-phase execution counters fed into the decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub errors: u32,
    pub warnings: u32,
    pub duration_ms: u64,
}

/// The vetted outcome of one arbitration. Ephemeral: constructed and
/// returned per call, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrationDecision {
    pub action: WorkflowAction,
    pub overrides_recommendation: bool,
    pub reason: String,
}

/// Capability interface for the external action recommender. The core
/// imposes no protocol on how the action is computed.
pub trait Recommender {
    fn recommend(&self, state: &WorkflowState, metrics: &PhaseMetrics) -> WorkflowAction;
}
