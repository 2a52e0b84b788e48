use std::sync::atomic::{AtomicUsize, Ordering};

use warden_core::{UsageAggregate, UsageRecord, UsageTracker, UsageTrackerError};

pub struct FailingUsageTracker {
    error: UsageTrackerError,
    queries: AtomicUsize,
}

impl FailingUsageTracker {
    pub fn unavailable() -> Self {
        Self::with_error(UsageTrackerError::Unavailable {
            message: "usage tracker not running".to_string(),
        })
    }

    pub fn with_error(error: UsageTrackerError) -> Self {
        Self {
            error,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl UsageTracker for FailingUsageTracker {
    fn query_usage_records(
        &self,
        _start_ms: i64,
        _end_ms: i64,
    ) -> Result<Vec<UsageRecord>, UsageTrackerError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn query_aggregates(
        &self,
        _start_ms: i64,
        _end_ms: i64,
    ) -> Result<Vec<UsageAggregate>, UsageTrackerError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}
