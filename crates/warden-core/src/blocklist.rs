use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::ApplicationId;
use crate::ports::{BlocklistRepository, BlocklistRepositoryError};

/// The persisted set of blocked applications.
///
/// Updates replace the whole set; readers always receive an owned copy.
#[derive(Clone)]
pub struct BlocklistStore {
    repository: Arc<dyn BlocklistRepository>,
}

impl BlocklistStore {
    pub fn new(repository: Arc<dyn BlocklistRepository>) -> Self {
        Self { repository }
    }

    /// Replaces the stored set with the deduplicated `identifiers` and returns
    /// the resulting set size.
    pub fn set_blocked_apps(
        &self,
        identifiers: impl IntoIterator<Item = ApplicationId>,
    ) -> Result<usize, BlocklistRepositoryError> {
        let blocked: HashSet<ApplicationId> = identifiers.into_iter().collect();
        self.repository.replace(&blocked)?;
        Ok(blocked.len())
    }

    pub fn get_blocked_apps(&self) -> Result<HashSet<ApplicationId>, BlocklistRepositoryError> {
        self.repository.load()
    }
}
