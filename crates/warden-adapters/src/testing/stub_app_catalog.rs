use std::sync::Mutex;

use warden_core::{AppCatalog, AppCatalogError, CatalogEntry};

pub struct StubAppCatalog {
    entries: Mutex<Vec<CatalogEntry>>,
}

impl StubAppCatalog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl Default for StubAppCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AppCatalog for StubAppCatalog {
    fn entries(&self) -> Result<Vec<CatalogEntry>, AppCatalogError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.clone())
    }
}
