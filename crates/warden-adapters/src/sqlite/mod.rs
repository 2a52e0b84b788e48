mod blocklist_repository;
mod usage_tracker;

pub use blocklist_repository::SqliteBlocklistRepository;
pub use usage_tracker::SqliteUsageTracker;

use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
