use std::sync::Arc;

use chrono::Duration as ChronoDuration;

use crate::clock::Clock;
use crate::domain::{InstalledApp, UsageAggregate};
use crate::ports::{AppCatalog, AppCatalogError, UsageTracker, UsageTrackerError};

/// On-demand usage history and installed application queries.
#[derive(Clone)]
pub struct UsageStatsReport {
    tracker: Arc<dyn UsageTracker>,
    catalog: Arc<dyn AppCatalog>,
    clock: Arc<dyn Clock>,
}

impl UsageStatsReport {
    pub fn new(
        tracker: Arc<dyn UsageTracker>,
        catalog: Arc<dyn AppCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tracker,
            catalog,
            clock,
        }
    }

    /// Aggregated foreground time per application over the last `days_back`
    /// days. Applications without foreground time are left out; the tracker's
    /// order is preserved.
    pub fn get_usage_stats(&self, days_back: u32) -> Result<Vec<UsageAggregate>, UsageTrackerError> {
        let end_ms = self.clock.now_ms();
        let start_ms =
            end_ms.saturating_sub(ChronoDuration::days(i64::from(days_back)).num_milliseconds());

        let aggregates = self.tracker.query_aggregates(start_ms, end_ms)?;

        Ok(aggregates
            .into_iter()
            .filter(UsageAggregate::has_usage)
            .collect())
    }

    /// Installed applications that the user can launch.
    pub fn get_installed_apps(&self) -> Result<Vec<InstalledApp>, AppCatalogError> {
        let entries = self.catalog.entries()?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.launchable)
            .map(|entry| entry.app)
            .collect())
    }
}
