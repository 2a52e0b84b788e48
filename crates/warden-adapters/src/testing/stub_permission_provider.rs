use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use warden_core::{PermissionError, PermissionProvider, PermissionStatus};

pub struct StubPermissionProvider {
    status: Mutex<PermissionStatus>,
    redirects: AtomicUsize,
}

impl StubPermissionProvider {
    pub fn with_status(status: PermissionStatus) -> Self {
        Self {
            status: Mutex::new(status),
            redirects: AtomicUsize::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::with_status(PermissionStatus::Granted)
    }

    pub fn denied() -> Self {
        Self::with_status(PermissionStatus::DeniedRedirectable)
    }

    pub fn given_status(&self, status: PermissionStatus) {
        let mut guard = self.status.lock().unwrap();
        *guard = status;
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl PermissionProvider for StubPermissionProvider {
    fn status(&self) -> PermissionStatus {
        *self.status.lock().unwrap()
    }

    fn open_settings(&self) -> Result<(), PermissionError> {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
