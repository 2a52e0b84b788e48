use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use interprocess::local_socket::{
    tokio::{prelude::*, Stream},
    GenericFilePath, ListenerOptions,
};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, instrument, warn};

use warden_core::{
    ApplicationId, BlockedAppEvent, BlocklistStore, InvalidApplicationId, PermissionGate,
    UsageStatsReport,
};
use warden_protocol::{InstalledAppEntry, Request, Response, UsageStat, MAX_FRAME_LENGTH};

use crate::actors::MonitorHandle;

const DEFAULT_DAYS_BACK: u32 = 1;
const PERMISSION_NOT_GRANTED: &str = "Usage stats permission not granted";
const MISSING_PACKAGES: &str = "Missing 'packages' parameter";

/// Everything a request handler can reach.
#[derive(Clone)]
pub struct Services {
    pub blocklist: BlocklistStore,
    pub monitor: MonitorHandle,
    pub report: UsageStatsReport,
    pub permission: PermissionGate,
    pub default_interval: Duration,
}

pub struct Server {
    socket_path: PathBuf,
    services: Services,
}

impl Server {
    pub fn new(services: Services) -> Self {
        Self {
            socket_path: warden_protocol::default_socket_path(),
            services,
        }
    }

    fn cleanup_stale_socket(&self) -> Result<()> {
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).context("failed to remove stale socket")?;
            debug!("removed stale socket file");
        }
        Ok(())
    }

    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        self.cleanup_stale_socket()?;

        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create socket directory")?;
        }

        let listener = ListenerOptions::new()
            .name(self.socket_path.as_os_str().to_fs_name::<GenericFilePath>()?)
            .create_tokio()?;

        info!(path = %self.socket_path.display(), "server listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok(stream) => {
                            let services = self.services.clone();
                            tokio::spawn(async move {
                                if let Err(error) = handle_connection(stream, services).await {
                                    error!(%error, "connection handler failed");
                                }
                            });
                        }
                        Err(error) => {
                            error!(%error, "failed to accept connection");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        self.cleanup_socket();
        Ok(())
    }

    fn cleanup_socket(&self) {
        if let Err(error) = std::fs::remove_file(&self.socket_path) {
            debug!(%error, "socket file already removed");
        } else {
            debug!("socket file cleaned up");
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.cleanup_socket();
    }
}

async fn handle_connection(mut stream: Stream, services: Services) -> Result<()> {
    debug!("new connection accepted");

    let request = read_request(&mut stream).await?;

    debug!(?request, "received request");

    if request == Request::Subscribe {
        return stream_events(stream, services.monitor.subscribe()).await;
    }

    let response = handle_request(request, &services).await;

    debug!(?response, "sending response");

    write_frame(&mut stream, &response).await
}

async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Request> {
    let mut length_buffer = [0u8; 4];
    reader.read_exact(&mut length_buffer).await?;
    let length = u32::from_le_bytes(length_buffer) as usize;

    if length > MAX_FRAME_LENGTH {
        bail!("request frame of {length} bytes exceeds the limit");
    }

    let mut payload = vec![0u8; length];
    reader.read_exact(&mut payload).await?;

    bincode::deserialize(&payload).context("failed to deserialize request")
}

async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let bytes = bincode::serialize(message)?;
    let length = u32::try_from(bytes.len()).context("response frame too large")?;

    writer.write_all(&length.to_le_bytes()).await?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;

    Ok(())
}

/// Forwards blocked application events until the client goes away.
///
/// Clients send nothing after `Subscribe`, so any read that ends (EOF or
/// error) means the client has disconnected.
async fn stream_events<S>(stream: S, mut events: broadcast::Receiver<BlockedAppEvent>) -> Result<()>
where
    S: AsyncRead + AsyncWrite,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    write_frame(&mut writer, &Response::Subscribed).await?;
    info!("event subscriber connected");

    let mut discard = [0u8; 64];

    loop {
        tokio::select! {
            read = reader.read(&mut discard) => {
                match read {
                    Ok(0) | Err(_) => {
                        debug!("event subscriber disconnected");
                        break;
                    }
                    Ok(_) => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Err(error) = write_frame(&mut writer, &Response::from(&event)).await {
                            debug!(%error, "event subscriber disconnected");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event subscriber fell behind, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    Ok(())
}

fn interval_millis(interval: Option<Duration>) -> u64 {
    interval.map_or(0, |interval| {
        u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
    })
}

pub async fn handle_request(request: Request, services: &Services) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::CheckPermission => Response::Permission {
            granted: services.permission.check(),
            message: None,
        },

        Request::RequestPermission => match services.permission.request() {
            Ok(outcome) => Response::Permission {
                granted: outcome.granted,
                message: outcome.message,
            },
            Err(error) => error_response(error),
        },

        Request::SetBlockedApps { packages } => set_blocked_apps(packages, services),

        Request::GetBlockedApps => match services.blocklist.get_blocked_apps() {
            Ok(blocked) => {
                let mut packages: Vec<String> =
                    blocked.into_iter().map(ApplicationId::into_inner).collect();
                packages.sort();
                Response::BlockedApps { packages }
            }
            Err(error) => error_response(error),
        },

        Request::StartMonitoring { interval_ms } => {
            if !services.permission.check() {
                return permission_denied();
            }

            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or(services.default_interval);

            match services.monitor.start(interval).await {
                Ok(()) => Response::Ok,
                Err(error) => error_response(error),
            }
        }

        Request::StopMonitoring => match services.monitor.stop().await {
            Ok(()) => Response::Ok,
            Err(error) => error_response(error),
        },

        Request::GetMonitorStatus => match services.monitor.status().await {
            Some(status) => Response::MonitorStatus {
                active: status.active,
                interval_ms: interval_millis(status.interval),
                tick_count: status.tick_count,
                blocked_count: status.blocked_count,
            },
            None => Response::Error {
                message: "monitor is not running".to_string(),
            },
        },

        Request::GetAppUsageStats { days_back } => {
            if !services.permission.check() {
                return permission_denied();
            }

            let days_back = days_back.unwrap_or(DEFAULT_DAYS_BACK);
            let stats = match services.report.get_usage_stats(days_back) {
                Ok(aggregates) => aggregates.iter().map(UsageStat::from).collect(),
                Err(error) => {
                    warn!(%error, days_back, "usage tracker unavailable, reporting no usage");
                    Vec::new()
                }
            };

            Response::UsageStats { stats }
        }

        Request::GetInstalledApps => match services.report.get_installed_apps() {
            Ok(apps) => Response::InstalledApps {
                apps: apps.iter().map(InstalledAppEntry::from).collect(),
            },
            Err(error) => error_response(error),
        },

        Request::Subscribe => Response::Error {
            message: "subscriptions need a dedicated connection".to_string(),
        },
    }
}

fn set_blocked_apps(packages: Option<Vec<String>>, services: &Services) -> Response {
    let Some(packages) = packages else {
        return Response::Error {
            message: MISSING_PACKAGES.to_string(),
        };
    };

    let identifiers = match packages
        .into_iter()
        .map(ApplicationId::parse)
        .collect::<Result<Vec<_>, InvalidApplicationId>>()
    {
        Ok(identifiers) => identifiers,
        Err(error) => {
            return Response::Error {
                message: format!("Invalid packages: {error}"),
            }
        }
    };

    match services.blocklist.set_blocked_apps(identifiers) {
        Ok(count) => {
            info!(count, "blocklist replaced");
            Response::Ok
        }
        Err(error) => error_response(error),
    }
}

fn permission_denied() -> Response {
    Response::Error {
        message: PERMISSION_NOT_GRANTED.to_string(),
    }
}

fn error_response(error: impl std::fmt::Display) -> Response {
    warn!(%error, "request failed");
    Response::Error {
        message: error.to_string(),
    }
}
