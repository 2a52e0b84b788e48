use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::domain::{ApplicationId, UsageRecord};
use crate::ports::{UsageTracker, UsageTrackerError};

/// Trailing window used to decide which application is in the foreground.
pub const DEFAULT_FOREGROUND_WINDOW: Duration = Duration::from_secs(10);

/// Approximates "the application in the foreground now" as the application
/// most recently used inside a short trailing window.
#[derive(Clone)]
pub struct ForegroundResolver {
    tracker: Arc<dyn UsageTracker>,
    clock: Arc<dyn Clock>,
}

impl ForegroundResolver {
    pub fn new(tracker: Arc<dyn UsageTracker>, clock: Arc<dyn Clock>) -> Self {
        Self { tracker, clock }
    }

    pub fn resolve_foreground(
        &self,
        window: Duration,
    ) -> Result<Option<ApplicationId>, UsageTrackerError> {
        let end_ms = self.clock.now_ms();
        let start_ms = end_ms.saturating_sub(window_millis(window));

        let records = self.tracker.query_usage_records(start_ms, end_ms)?;

        Ok(most_recent(&records, start_ms, end_ms).cloned())
    }
}

/// Picks the record with the greatest `last_used_ms` inside `[start_ms, end_ms]`.
/// Equal timestamps resolve to the lexicographically greatest identifier.
pub fn most_recent(records: &[UsageRecord], start_ms: i64, end_ms: i64) -> Option<&ApplicationId> {
    records
        .iter()
        .filter(|record| (start_ms..=end_ms).contains(&record.last_used_ms))
        .max_by(|left, right| {
            left.last_used_ms
                .cmp(&right.last_used_ms)
                .then_with(|| left.application.cmp(&right.application))
        })
        .map(|record| &record.application)
}

fn window_millis(window: Duration) -> i64 {
    i64::try_from(window.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UsageAggregate;
    use std::sync::Mutex;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    struct MockTracker {
        records: Vec<UsageRecord>,
        queried_windows: Mutex<Vec<(i64, i64)>>,
    }

    impl MockTracker {
        fn with_records(records: Vec<UsageRecord>) -> Self {
            Self {
                records,
                queried_windows: Mutex::new(Vec::new()),
            }
        }
    }

    impl UsageTracker for MockTracker {
        fn query_usage_records(
            &self,
            start_ms: i64,
            end_ms: i64,
        ) -> Result<Vec<UsageRecord>, UsageTrackerError> {
            self.queried_windows.lock().unwrap().push((start_ms, end_ms));
            Ok(self.records.clone())
        }

        fn query_aggregates(
            &self,
            _start_ms: i64,
            _end_ms: i64,
        ) -> Result<Vec<UsageAggregate>, UsageTrackerError> {
            Ok(Vec::new())
        }
    }

    struct UnavailableTracker;

    impl UsageTracker for UnavailableTracker {
        fn query_usage_records(
            &self,
            _start_ms: i64,
            _end_ms: i64,
        ) -> Result<Vec<UsageRecord>, UsageTrackerError> {
            Err(UsageTrackerError::Unavailable {
                message: "service not bound".to_string(),
            })
        }

        fn query_aggregates(
            &self,
            _start_ms: i64,
            _end_ms: i64,
        ) -> Result<Vec<UsageAggregate>, UsageTrackerError> {
            Ok(Vec::new())
        }
    }

    fn record(application: &str, last_used_ms: i64) -> UsageRecord {
        UsageRecord::new(ApplicationId::parse(application).unwrap(), last_used_ms)
    }

    fn resolver_at(now_ms: i64, records: Vec<UsageRecord>) -> (ForegroundResolver, Arc<MockTracker>) {
        let tracker = Arc::new(MockTracker::with_records(records));
        let resolver = ForegroundResolver::new(tracker.clone(), Arc::new(FixedClock(now_ms)));
        (resolver, tracker)
    }

    #[test]
    fn most_recent_record_wins() {
        let (resolver, _) = resolver_at(1_000, vec![record("A", 100), record("B", 200)]);

        let foreground = resolver.resolve_foreground(DEFAULT_FOREGROUND_WINDOW).unwrap();

        assert_eq!(foreground, Some(ApplicationId::parse("B").unwrap()));
    }

    #[test]
    fn input_order_does_not_matter() {
        let (resolver, _) = resolver_at(1_000, vec![record("B", 200), record("A", 100)]);

        let foreground = resolver.resolve_foreground(DEFAULT_FOREGROUND_WINDOW).unwrap();

        assert_eq!(foreground, Some(ApplicationId::parse("B").unwrap()));
    }

    #[test]
    fn no_records_resolves_to_none() {
        let (resolver, _) = resolver_at(1_000, Vec::new());

        assert_eq!(resolver.resolve_foreground(DEFAULT_FOREGROUND_WINDOW).unwrap(), None);
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let (resolver, _) = resolver_at(20_000, vec![record("stale", 5_000)]);

        assert_eq!(resolver.resolve_foreground(DEFAULT_FOREGROUND_WINDOW).unwrap(), None);
    }

    #[test]
    fn equal_timestamps_resolve_deterministically() {
        let records = vec![record("com.alpha", 500), record("com.zulu", 500), record("com.mike", 500)];
        let reversed: Vec<_> = records.iter().rev().cloned().collect();

        assert_eq!(most_recent(&records, 0, 1_000).map(|id| id.as_str()), Some("com.zulu"));
        assert_eq!(most_recent(&reversed, 0, 1_000).map(|id| id.as_str()), Some("com.zulu"));
    }

    #[test]
    fn queries_trailing_window_ending_now() {
        let (resolver, tracker) = resolver_at(50_000, Vec::new());

        resolver.resolve_foreground(Duration::from_secs(10)).unwrap();

        assert_eq!(*tracker.queried_windows.lock().unwrap(), vec![(40_000, 50_000)]);
    }

    #[test]
    fn tracker_failure_is_returned_to_caller() {
        let resolver = ForegroundResolver::new(Arc::new(UnavailableTracker), Arc::new(FixedClock(0)));

        assert!(resolver.resolve_foreground(DEFAULT_FOREGROUND_WINDOW).is_err());
    }
}
