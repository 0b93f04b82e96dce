//! Retention: decide which manifests go, delete them in bounded batches, report the result.

pub mod deleter;
pub mod planner;
pub mod report;

pub use deleter::{BatchDeleter, DELETE_ACCEPTED, DELETE_BATCH_SIZE, DeletionOutcome};
pub use planner::RetentionPlanner;
pub use report::{DryRunPlan, PruneSummary, Reporter};
