use thiserror::Error;

use crate::domain::{UsageAggregate, UsageRecord, UsageSample};

#[derive(Error, Debug, Clone)]
pub enum UsageTrackerError {
    #[error("usage tracker unavailable: {message}")]
    Unavailable { message: String },
}

/// Read side of the usage tracking facility. Bounds are milliseconds since the
/// Unix epoch, inclusive on both ends.
pub trait UsageTracker: Send + Sync {
    fn query_usage_records(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<UsageRecord>, UsageTrackerError>;

    fn query_aggregates(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<UsageAggregate>, UsageTrackerError>;
}

/// Write side, for platforms where the daemon maintains the usage history itself.
pub trait UsageSampleRecorder: Send + Sync {
    fn record(&self, sample: &UsageSample) -> Result<(), UsageTrackerError>;

    /// Deletes samples recorded before `before_ms` and returns how many were removed.
    fn prune(&self, before_ms: i64) -> Result<usize, UsageTrackerError>;
}
