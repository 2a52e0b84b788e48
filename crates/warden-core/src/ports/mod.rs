mod app_catalog;
mod blocklist_repository;
mod permission_provider;
mod usage_tracker;

pub use app_catalog::{AppCatalog, AppCatalogError};
pub use blocklist_repository::{BlocklistRepository, BlocklistRepositoryError};
pub use permission_provider::{PermissionError, PermissionProvider};
pub use usage_tracker::{UsageSampleRecorder, UsageTracker, UsageTrackerError};
