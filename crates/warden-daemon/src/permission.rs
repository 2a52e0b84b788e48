use warden_core::{PermissionError, PermissionProvider, PermissionStatus};

/// Usage access on a desktop session: granted while the window sampler is
/// running, since the sampler is what produces the usage history. There is
/// no settings screen to send the user to.
pub struct DesktopPermissionProvider {
    sampler_running: bool,
}

impl DesktopPermissionProvider {
    pub fn new(sampler_running: bool) -> Self {
        Self { sampler_running }
    }
}

impl PermissionProvider for DesktopPermissionProvider {
    fn status(&self) -> PermissionStatus {
        if self.sampler_running {
            PermissionStatus::Granted
        } else {
            PermissionStatus::DeniedTerminal
        }
    }

    fn open_settings(&self) -> Result<(), PermissionError> {
        Err(PermissionError::Redirect {
            message: "no usage access settings on this desktop".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use warden_core::PermissionGate;

    #[test]
    fn running_sampler_grants_usage_access() {
        let gate = PermissionGate::new(Arc::new(DesktopPermissionProvider::new(true)));

        assert!(gate.check());
        assert!(gate.request().unwrap().granted);
    }

    #[test]
    fn missing_sampler_denies_without_redirect() {
        let gate = PermissionGate::new(Arc::new(DesktopPermissionProvider::new(false)));

        let outcome = gate.request().unwrap();

        assert!(!gate.check());
        assert!(!outcome.granted);
        assert!(outcome.message.is_some());
    }
}
