//! Warden core library
//!
//! Contains domain types, port definitions (traits) and the services built on
//! top of them: blocklist storage, foreground resolution and usage reports.
//! This crate has no knowledge of infrastructure concerns.

pub mod blocklist;
pub mod clock;
pub mod config;
pub mod domain;
pub mod foreground;
pub mod permission;
pub mod ports;
pub mod usage_report;

pub use blocklist::BlocklistStore;
pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigError, MonitorConfig, NotificationConfig, NotificationUrgency, TrackerConfig};
pub use domain::{
    ApplicationId, BlockedAppEvent, CatalogEntry, InstalledApp, InvalidApplicationId,
    PermissionOutcome, PermissionStatus, UsageAggregate, UsageRecord, UsageSample,
};
pub use foreground::{most_recent, ForegroundResolver, DEFAULT_FOREGROUND_WINDOW};
pub use permission::PermissionGate;
pub use ports::{
    AppCatalog, AppCatalogError, BlocklistRepository, BlocklistRepositoryError, PermissionError,
    PermissionProvider, UsageSampleRecorder, UsageTracker, UsageTrackerError,
};
pub use usage_report::UsageStatsReport;
