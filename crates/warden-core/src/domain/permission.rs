#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    /// Not granted, but the user can grant it from a settings screen.
    DeniedRedirectable,
    /// Not granted and cannot be granted on this platform.
    DeniedTerminal,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionOutcome {
    pub granted: bool,
    pub message: Option<String>,
}

impl PermissionOutcome {
    pub fn granted() -> Self {
        Self {
            granted: true,
            message: None,
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self {
            granted: false,
            message: Some(message.into()),
        }
    }
}
