// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod daemon;
mod orchestrator;
mod stats;

pub use daemon::{CycleResult, CycleRunner, Daemon};
pub use orchestrator::SyncCycle;
pub use stats::CycleReport;
