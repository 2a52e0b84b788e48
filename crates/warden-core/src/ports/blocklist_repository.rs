use std::collections::HashSet;

use thiserror::Error;

use crate::domain::ApplicationId;

#[derive(Error, Debug)]
pub enum BlocklistRepositoryError {
    #[error("persistence error: {message}")]
    Storage { message: String },
}

/// Durable storage for the blocked application set.
///
/// `replace` must be atomic: a concurrent `load` observes either the previous
/// set or the new one in full.
pub trait BlocklistRepository: Send + Sync {
    fn replace(&self, blocked: &HashSet<ApplicationId>) -> Result<(), BlocklistRepositoryError>;

    fn load(&self) -> Result<HashSet<ApplicationId>, BlocklistRepositoryError>;
}
