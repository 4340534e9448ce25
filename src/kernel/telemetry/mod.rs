//! In-process telemetry: bounded event buffer, per-(category, kind)
//! aggregation, subscriber fan-out.
//!
//! # SAFETY INVARIANT
//! Telemetry is a write-only side-effect layer for the components above it.
//! It must **NEVER** be read back inside decision logic (Arbitrator or
//! Orchestrator). It exists solely for observability.
//!
//! # ESCALATION INVARIANT
//! The peak severity stored in an aggregate only ever escalates. Recording
//! `Info` after `Error` on the same (category, kind) leaves it at `Error`.

pub mod aggregate;
pub mod event;
pub mod pipeline;
