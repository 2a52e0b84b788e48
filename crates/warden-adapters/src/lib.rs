//! Warden adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in warden-core:
//! SQLite storage for the blocklist and the usage history, the desktop-entry
//! application catalog, and test doubles for the daemon.

pub mod desktop;
pub mod sqlite;
pub mod testing;

pub use desktop::DesktopEntryCatalog;
pub use sqlite::{SqliteBlocklistRepository, SqliteUsageTracker};
pub use testing::{
    FailingUsageTracker, FixedClock, StubAppCatalog, StubPermissionProvider, StubUsageTracker,
};
