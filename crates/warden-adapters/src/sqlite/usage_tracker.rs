use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use tracing::warn;

use warden_core::{
    ApplicationId, UsageAggregate, UsageRecord, UsageSample, UsageSampleRecorder, UsageTracker,
    UsageTrackerError,
};

use super::BUSY_TIMEOUT;

/// Usage history built from foreground samples, for hosts without an OS usage tracker.
pub struct SqliteUsageTracker {
    connection: Mutex<Connection>,
}

impl SqliteUsageTracker {
    pub fn new(path: &Path) -> Result<Self, UsageTrackerError> {
        let connection = Connection::open(path).map_err(unavailable)?;
        connection.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;

        let tracker = Self {
            connection: Mutex::new(connection),
        };
        tracker.initialize_schema()?;

        Ok(tracker)
    }

    pub fn in_memory() -> Result<Self, UsageTrackerError> {
        let connection = Connection::open_in_memory().map_err(unavailable)?;

        let tracker = Self {
            connection: Mutex::new(connection),
        };
        tracker.initialize_schema()?;

        Ok(tracker)
    }

    fn initialize_schema(&self) -> Result<(), UsageTrackerError> {
        let connection = self.lock()?;
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS usage_samples (
                    id INTEGER PRIMARY KEY,
                    application TEXT NOT NULL,
                    recorded_at_ms INTEGER NOT NULL,
                    duration_ms INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS usage_samples_recorded_at
                    ON usage_samples (recorded_at_ms);",
            )
            .map_err(unavailable)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, UsageTrackerError> {
        self.connection
            .lock()
            .map_err(|_| UsageTrackerError::Unavailable {
                message: "connection lock poisoned".to_string(),
            })
    }
}

impl UsageTracker for SqliteUsageTracker {
    fn query_usage_records(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<UsageRecord>, UsageTrackerError> {
        let connection = self.lock()?;

        let mut statement = connection
            .prepare(
                "SELECT application, MAX(recorded_at_ms)
                 FROM usage_samples
                 WHERE recorded_at_ms BETWEEN ?1 AND ?2
                 GROUP BY application",
            )
            .map_err(unavailable)?;

        let rows = statement
            .query_map(params![start_ms, end_ms], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;

        Ok(rows
            .into_iter()
            .filter_map(|(application, last_used_ms)| {
                parse_application(application).map(|id| UsageRecord::new(id, last_used_ms))
            })
            .collect())
    }

    fn query_aggregates(
        &self,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<UsageAggregate>, UsageTrackerError> {
        let connection = self.lock()?;

        let mut statement = connection
            .prepare(
                "SELECT application, SUM(duration_ms), MAX(recorded_at_ms)
                 FROM usage_samples
                 WHERE recorded_at_ms BETWEEN ?1 AND ?2
                 GROUP BY application
                 ORDER BY MIN(id)",
            )
            .map_err(unavailable)?;

        let rows = statement
            .query_map(params![start_ms, end_ms], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;

        Ok(rows
            .into_iter()
            .filter_map(|(application, total_foreground_ms, last_used_ms)| {
                parse_application(application).map(|application| UsageAggregate {
                    application,
                    total_foreground_ms,
                    last_used_ms,
                })
            })
            .collect())
    }
}

impl UsageSampleRecorder for SqliteUsageTracker {
    fn record(&self, sample: &UsageSample) -> Result<(), UsageTrackerError> {
        let connection = self.lock()?;

        connection
            .execute(
                "INSERT INTO usage_samples (application, recorded_at_ms, duration_ms)
                 VALUES (?1, ?2, ?3)",
                params![
                    sample.application.as_str(),
                    sample.recorded_at_ms,
                    sample.duration_ms
                ],
            )
            .map_err(unavailable)?;

        Ok(())
    }

    fn prune(&self, before_ms: i64) -> Result<usize, UsageTrackerError> {
        let connection = self.lock()?;

        connection
            .execute(
                "DELETE FROM usage_samples WHERE recorded_at_ms < ?1",
                params![before_ms],
            )
            .map_err(unavailable)
    }
}

fn parse_application(value: String) -> Option<ApplicationId> {
    match ApplicationId::parse(value.as_str()) {
        Ok(application) => Some(application),
        Err(error) => {
            warn!(%error, value, "skipping malformed usage sample");
            None
        }
    }
}

fn unavailable(error: rusqlite::Error) -> UsageTrackerError {
    UsageTrackerError::Unavailable {
        message: error.to_string(),
    }
}
