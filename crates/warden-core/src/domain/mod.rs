mod application;
mod blocked_event;
mod permission;
mod usage;

pub use application::{ApplicationId, CatalogEntry, InstalledApp, InvalidApplicationId};
pub use blocked_event::BlockedAppEvent;
pub use permission::{PermissionOutcome, PermissionStatus};
pub use usage::{UsageAggregate, UsageRecord, UsageSample};
