//! Test doubles for the warden-core ports.

mod failing_usage_tracker;
mod fixed_clock;
mod stub_app_catalog;
mod stub_permission_provider;
mod stub_usage_tracker;

pub use failing_usage_tracker::FailingUsageTracker;
pub use fixed_clock::FixedClock;
pub use stub_app_catalog::StubAppCatalog;
pub use stub_permission_provider::StubPermissionProvider;
pub use stub_usage_tracker::StubUsageTracker;
