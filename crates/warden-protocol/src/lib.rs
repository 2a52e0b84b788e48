//! Warden protocol definitions for CLI-daemon communication
//!
//! This crate defines the IPC protocol between the warden CLI (or any other
//! bridge) and the daemon. Messages are bincode payloads prefixed with their
//! length as a little-endian `u32`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use warden_core::{BlockedAppEvent, InstalledApp, UsageAggregate};

/// Requests sent from a client to the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Check whether usage access is granted
    CheckPermission,
    /// Ask for usage access, possibly opening a settings screen
    RequestPermission,
    /// Replace the blocked application set
    SetBlockedApps {
        /// Full desired membership (None = parameter missing)
        packages: Option<Vec<String>>,
    },
    /// Read the blocked application set
    GetBlockedApps,
    /// Start (or restart) foreground monitoring
    StartMonitoring {
        /// Polling interval in milliseconds (None = use default from config)
        interval_ms: Option<u64>,
    },
    /// Stop foreground monitoring
    StopMonitoring,
    /// Read the monitor state
    GetMonitorStatus,
    /// Aggregated usage over the last days
    GetAppUsageStats {
        /// Window length in days (None = 1)
        days_back: Option<u32>,
    },
    /// List launchable installed applications
    GetInstalledApps,
    /// Keep the connection open and stream `AppBlocked` events
    Subscribe,
    /// Ping the daemon to check if it's alive
    Ping,
}

/// Responses sent from the daemon to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Permission {
        granted: bool,
        message: Option<String>,
    },
    BlockedApps {
        packages: Vec<String>,
    },
    MonitorStatus {
        active: bool,
        /// Polling interval of the running session (0 when stopped)
        interval_ms: u64,
        tick_count: u64,
        blocked_count: u64,
    },
    UsageStats {
        stats: Vec<UsageStat>,
    },
    InstalledApps {
        apps: Vec<InstalledAppEntry>,
    },
    /// Acknowledges a `Subscribe` request; events follow on the same connection
    Subscribed,
    /// A blocked application was detected in the foreground
    AppBlocked {
        package: String,
        /// Milliseconds since the Unix epoch
        timestamp: i64,
    },
    /// Generic success acknowledgment
    Ok,
    /// Error response with message
    Error { message: String },
    /// Pong response to ping
    Pong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStat {
    pub package_name: String,
    pub total_time_ms: i64,
    pub last_used: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledAppEntry {
    pub package_name: String,
    pub app_name: String,
    pub is_system: bool,
}

impl From<&UsageAggregate> for UsageStat {
    fn from(aggregate: &UsageAggregate) -> Self {
        Self {
            package_name: aggregate.application.to_string(),
            total_time_ms: aggregate.total_foreground_ms,
            last_used: aggregate.last_used_ms,
        }
    }
}

impl From<&InstalledApp> for InstalledAppEntry {
    fn from(app: &InstalledApp) -> Self {
        Self {
            package_name: app.identifier.to_string(),
            app_name: app.display_name.clone(),
            is_system: app.is_system,
        }
    }
}

impl From<&BlockedAppEvent> for Response {
    fn from(event: &BlockedAppEvent) -> Self {
        Response::AppBlocked {
            package: event.application.to_string(),
            timestamp: event.timestamp_ms,
        }
    }
}

/// Frames larger than this are rejected by both ends.
pub const MAX_FRAME_LENGTH: usize = 16 * 1024 * 1024;

#[cfg(unix)]
pub fn default_socket_path() -> PathBuf {
    let uid = unsafe { libc::getuid() };
    PathBuf::from(format!("/run/user/{}/warden.sock", uid))
}

#[cfg(windows)]
pub fn default_socket_path() -> PathBuf {
    let local_app_data = std::env::var("LOCALAPPDATA").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(format!(r"{}\warden\warden.sock", local_app_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::ApplicationId;

    #[test]
    fn set_blocked_apps_without_packages_survives_encoding() {
        let request = Request::SetBlockedApps { packages: None };

        let bytes = bincode::serialize(&request).unwrap();
        let decoded: Request = bincode::deserialize(&bytes).unwrap();

        assert_eq!(request, decoded);
    }

    #[test]
    fn usage_stats_response_survives_encoding() {
        let response = Response::UsageStats {
            stats: vec![UsageStat {
                package_name: "com.instagram.android".to_string(),
                total_time_ms: 5_400_000,
                last_used: 1_700_000_000_000,
            }],
        };

        let bytes = bincode::serialize(&response).unwrap();
        let decoded: Response = bincode::deserialize(&bytes).unwrap();

        assert_eq!(response, decoded);
    }

    #[test]
    fn blocked_event_converts_to_app_blocked_response() {
        let event = BlockedAppEvent::new(ApplicationId::parse("com.evil.app").unwrap(), 1_234);

        assert_eq!(
            Response::from(&event),
            Response::AppBlocked {
                package: "com.evil.app".to_string(),
                timestamp: 1_234,
            }
        );
    }

    #[test]
    fn usage_aggregate_converts_to_wire_stat() {
        let aggregate = UsageAggregate {
            application: ApplicationId::parse("com.whatsapp").unwrap(),
            total_foreground_ms: 2_700_000,
            last_used_ms: 99,
        };

        let stat = UsageStat::from(&aggregate);

        assert_eq!(stat.package_name, "com.whatsapp");
        assert_eq!(stat.total_time_ms, 2_700_000);
        assert_eq!(stat.last_used, 99);
    }

    #[test]
    fn installed_app_converts_to_wire_entry() {
        let app = InstalledApp {
            identifier: ApplicationId::parse("com.spotify.music").unwrap(),
            display_name: "Spotify".to_string(),
            is_system: false,
        };

        let entry = InstalledAppEntry::from(&app);

        assert_eq!(entry.package_name, "com.spotify.music");
        assert_eq!(entry.app_name, "Spotify");
        assert!(!entry.is_system);
    }
}
