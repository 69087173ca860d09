//! Command-line workflow: the release orchestration behind `release-branch`.

pub mod orchestration;

pub use orchestration::{ReleaseOrchestrator, ReleaseOutcome, ReleaseState};
