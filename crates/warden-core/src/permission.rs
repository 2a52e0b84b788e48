use std::sync::Arc;

use crate::domain::{PermissionOutcome, PermissionStatus};
use crate::ports::{PermissionError, PermissionProvider};

pub const REDIRECTED_MESSAGE: &str = "Redirected to usage access settings";
pub const UNAVAILABLE_MESSAGE: &str = "Usage access cannot be granted on this platform";

#[derive(Clone)]
pub struct PermissionGate {
    provider: Arc<dyn PermissionProvider>,
}

impl PermissionGate {
    pub fn new(provider: Arc<dyn PermissionProvider>) -> Self {
        Self { provider }
    }

    pub fn check(&self) -> bool {
        self.provider.status().is_granted()
    }

    /// Asks for usage access. When the platform offers a settings screen the
    /// user is sent there and the outcome stays "not granted" until they return.
    pub fn request(&self) -> Result<PermissionOutcome, PermissionError> {
        match self.provider.status() {
            PermissionStatus::Granted => Ok(PermissionOutcome::granted()),
            PermissionStatus::DeniedRedirectable => {
                self.provider.open_settings()?;
                Ok(PermissionOutcome::denied(REDIRECTED_MESSAGE))
            }
            PermissionStatus::DeniedTerminal => Ok(PermissionOutcome::denied(UNAVAILABLE_MESSAGE)),
        }
    }
}
