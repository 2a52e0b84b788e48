use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use tracing::warn;

use warden_core::{ApplicationId, BlocklistRepository, BlocklistRepositoryError};

use super::BUSY_TIMEOUT;

pub struct SqliteBlocklistRepository {
    connection: Mutex<Connection>,
}

impl SqliteBlocklistRepository {
    pub fn new(path: &Path) -> Result<Self, BlocklistRepositoryError> {
        let connection = Connection::open(path).map_err(storage_error)?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    pub fn in_memory() -> Result<Self, BlocklistRepositoryError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;

        let repository = Self {
            connection: Mutex::new(connection),
        };
        repository.initialize_schema()?;

        Ok(repository)
    }

    fn initialize_schema(&self) -> Result<(), BlocklistRepositoryError> {
        let connection = self.lock()?;
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS blocked_apps (
                    application TEXT PRIMARY KEY NOT NULL
                );",
            )
            .map_err(storage_error)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, BlocklistRepositoryError> {
        self.connection
            .lock()
            .map_err(|_| BlocklistRepositoryError::Storage {
                message: "connection lock poisoned".to_string(),
            })
    }
}

impl BlocklistRepository for SqliteBlocklistRepository {
    fn replace(&self, blocked: &HashSet<ApplicationId>) -> Result<(), BlocklistRepositoryError> {
        let mut connection = self.lock()?;
        let transaction = connection.transaction().map_err(storage_error)?;

        transaction
            .execute("DELETE FROM blocked_apps", [])
            .map_err(storage_error)?;

        {
            let mut statement = transaction
                .prepare("INSERT INTO blocked_apps (application) VALUES (?1)")
                .map_err(storage_error)?;

            for application in blocked {
                statement
                    .execute(params![application.as_str()])
                    .map_err(storage_error)?;
            }
        }

        transaction.commit().map_err(storage_error)
    }

    fn load(&self) -> Result<HashSet<ApplicationId>, BlocklistRepositoryError> {
        let connection = self.lock()?;

        let mut statement = connection
            .prepare("SELECT application FROM blocked_apps")
            .map_err(storage_error)?;

        let values = statement
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        let blocked = values
            .into_iter()
            .filter_map(|value| match ApplicationId::parse(value.as_str()) {
                Ok(application) => Some(application),
                Err(error) => {
                    warn!(%error, value, "skipping malformed blocklist entry");
                    None
                }
            })
            .collect();

        Ok(blocked)
    }
}

fn storage_error(error: rusqlite::Error) -> BlocklistRepositoryError {
    BlocklistRepositoryError::Storage {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> HashSet<ApplicationId> {
        values
            .iter()
            .map(|value| ApplicationId::parse(*value).unwrap())
            .collect()
    }

    #[test]
    fn load_returns_empty_set_initially() {
        let repository = SqliteBlocklistRepository::in_memory().unwrap();

        assert!(repository.load().unwrap().is_empty());
    }

    #[test]
    fn replace_and_load_roundtrip() {
        let repository = SqliteBlocklistRepository::in_memory().unwrap();

        repository.replace(&ids(&["x", "y"])).unwrap();

        assert_eq!(repository.load().unwrap(), ids(&["y", "x"]));
    }

    #[test]
    fn replace_discards_previous_members() {
        let repository = SqliteBlocklistRepository::in_memory().unwrap();

        repository.replace(&ids(&["com.a", "com.b"])).unwrap();
        repository.replace(&ids(&["com.c"])).unwrap();

        assert_eq!(repository.load().unwrap(), ids(&["com.c"]));
    }

    #[test]
    fn replace_with_empty_set_clears_table() {
        let repository = SqliteBlocklistRepository::in_memory().unwrap();

        repository.replace(&ids(&["com.a"])).unwrap();
        repository.replace(&HashSet::new()).unwrap();

        assert!(repository.load().unwrap().is_empty());
    }

    #[test]
    fn blocklist_survives_reopening_the_database() {
        let path = std::env::temp_dir().join(format!(
            "warden-blocklist-test-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        {
            let repository = SqliteBlocklistRepository::new(&path).unwrap();
            repository.replace(&ids(&["com.evil.app"])).unwrap();
        }

        let reopened = SqliteBlocklistRepository::new(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), ids(&["com.evil.app"]));

        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
