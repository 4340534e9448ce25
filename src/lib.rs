pub mod kernel;
pub mod services;

// Re-export specific items if needed for convenient access
pub use kernel::memory::orchestrator::TieredMemoryOrchestrator;
pub use kernel::telemetry::pipeline::TelemetryPipeline;
pub use kernel::workflow::arbitrator::WorkflowArbitrator;
