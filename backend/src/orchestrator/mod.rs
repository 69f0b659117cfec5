//! Orchestrator - main simulation loop
//!
//! Owns the world and the scheduler and fires tasks one at a time.
//!
//! See `engine.rs` for full implementation.

pub mod context;
pub mod engine;
pub mod snapshot;

// Re-export main types for convenience
pub use context::Context;
pub use engine::{
    Orchestrator, OrchestratorConfig, RunSummary, SimulationError, StepResult, Timings,
    DEFAULT_SEED,
};

// Re-export snapshot types
pub use snapshot::{compute_config_hash, validate_snapshot, PendingTaskSnapshot, WorldSnapshot};
