use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use warden_core::{UsageAggregate, UsageRecord, UsageTracker, UsageTrackerError};

pub struct StubUsageTracker {
    records: Mutex<Vec<UsageRecord>>,
    aggregates: Mutex<Vec<UsageAggregate>>,
    record_queries: AtomicUsize,
}

impl StubUsageTracker {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            aggregates: Mutex::new(Vec::new()),
            record_queries: AtomicUsize::new(0),
        }
    }

    pub fn with_records(records: Vec<UsageRecord>) -> Self {
        let tracker = Self::new();
        tracker.given_records(records);
        tracker
    }

    pub fn given_records(&self, records: Vec<UsageRecord>) {
        let mut guard = self.records.lock().unwrap();
        *guard = records;
    }

    pub fn given_aggregates(&self, aggregates: Vec<UsageAggregate>) {
        let mut guard = self.aggregates.lock().unwrap();
        *guard = aggregates;
    }

    /// Number of `query_usage_records` calls so far.
    pub fn record_queries(&self) -> usize {
        self.record_queries.load(Ordering::SeqCst)
    }
}

impl Default for StubUsageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageTracker for StubUsageTracker {
    fn query_usage_records(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<UsageRecord>, UsageTrackerError> {
        self.record_queries.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|record| (start_ms..=end_ms).contains(&record.last_used_ms))
            .cloned()
            .collect())
    }

    fn query_aggregates(
        &self,
        _start_ms: i64,
        _end_ms: i64,
    ) -> Result<Vec<UsageAggregate>, UsageTrackerError> {
        let aggregates = self.aggregates.lock().unwrap();
        Ok(aggregates.clone())
    }
}
