use serde::{Deserialize, Serialize};

use super::ApplicationId;

/// Emitted when a blocked application is detected in the foreground.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedAppEvent {
    pub application: ApplicationId,
    pub timestamp_ms: i64,
}

impl BlockedAppEvent {
    pub fn new(application: ApplicationId, timestamp_ms: i64) -> Self {
        Self {
            application,
            timestamp_ms,
        }
    }
}
