mod actors;
mod permission;
mod server;
mod window;

use std::path::PathBuf;
use std::sync::Arc;

use actors::{MonitorActor, NotifierActor};
use anyhow::{Context, Result};
use permission::DesktopPermissionProvider;
use server::{Server, Services};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warden_adapters::{DesktopEntryCatalog, SqliteBlocklistRepository, SqliteUsageTracker};
use warden_core::{
    BlocklistStore, Clock, Config, ForegroundResolver, PermissionGate, SystemClock,
    UsageStatsReport,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("warden_daemon=debug".parse()?),
        )
        .init();

    info!("warden daemon starting");

    let config = Config::load().unwrap_or_else(|error| {
        warn!(%error, "failed to load config, using defaults");
        Config::default()
    });

    let (shutdown_sender, shutdown_receiver) = broadcast::channel::<()>(1);
    let sigint_shutdown_sender = shutdown_sender.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("SIGINT received, initiating shutdown");
        sigint_shutdown_sender.send(()).ok();
    });

    let (blocklist_repository, usage_tracker) = open_repositories()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let sampler_running = spawn_sampler(
        &config,
        usage_tracker.clone(),
        clock.clone(),
        &shutdown_sender,
    );
    let permission =
        PermissionGate::new(Arc::new(DesktopPermissionProvider::new(sampler_running)));

    let blocklist = BlocklistStore::new(blocklist_repository);
    let resolver = ForegroundResolver::new(usage_tracker.clone(), clock.clone());
    let report = UsageStatsReport::new(
        usage_tracker,
        Arc::new(DesktopEntryCatalog::from_environment()),
        clock.clone(),
    );

    let (monitor_actor, monitor_handle) = MonitorActor::new(
        blocklist.clone(),
        resolver,
        clock,
        config.monitor.event_buffer,
    );
    tokio::spawn(monitor_actor.run());

    if config.notifications.enabled {
        let notifier_actor = NotifierActor::new(
            monitor_handle.subscribe(),
            config.notifications.urgency.clone(),
            config.notifications.sound_enabled,
        );
        tokio::spawn(notifier_actor.run());
    }

    let server = Server::new(Services {
        blocklist,
        monitor: monitor_handle,
        report,
        permission,
        default_interval: config.monitor.default_interval(),
    });
    server.run(shutdown_receiver).await?;

    info!("warden daemon stopped");
    std::process::exit(0);
}

fn open_repositories() -> Result<(Arc<SqliteBlocklistRepository>, Arc<SqliteUsageTracker>)> {
    if let Some(database_path) = database_path() {
        match (
            SqliteBlocklistRepository::new(&database_path),
            SqliteUsageTracker::new(&database_path),
        ) {
            (Ok(blocklist), Ok(tracker)) => {
                info!(?database_path, "persistence enabled");
                return Ok((Arc::new(blocklist), Arc::new(tracker)));
            }
            (Err(error), _) => {
                warn!(%error, "failed to open blocklist storage, state will not be persisted");
            }
            (_, Err(error)) => {
                warn!(%error, "failed to open usage storage, state will not be persisted");
            }
        }
    }

    let blocklist =
        SqliteBlocklistRepository::in_memory().context("failed to create blocklist storage")?;
    let tracker = SqliteUsageTracker::in_memory().context("failed to create usage storage")?;

    Ok((Arc::new(blocklist), Arc::new(tracker)))
}

fn database_path() -> Option<PathBuf> {
    let data_dir = Config::data_dir()?;

    if let Err(error) = std::fs::create_dir_all(&data_dir) {
        warn!(%error, "failed to create data directory");
        return None;
    }

    Some(data_dir.join("warden.db"))
}

#[cfg(target_os = "linux")]
fn spawn_sampler(
    config: &Config,
    usage_tracker: Arc<SqliteUsageTracker>,
    clock: Arc<dyn Clock>,
    shutdown_sender: &broadcast::Sender<()>,
) -> bool {
    use actors::SamplerActor;
    use window::X11WindowDetector;

    let Some(detector) = X11WindowDetector::new() else {
        warn!("X11 window detection not available, usage access will be reported as denied");
        return false;
    };

    let sampler = SamplerActor::new(
        Box::new(detector),
        usage_tracker,
        clock,
        config.tracker.sample_interval(),
        config.tracker.retention_days,
    );
    tokio::spawn(sampler.run(shutdown_sender.subscribe()));

    true
}

#[cfg(not(target_os = "linux"))]
fn spawn_sampler(
    _config: &Config,
    _usage_tracker: Arc<SqliteUsageTracker>,
    _clock: Arc<dyn Clock>,
    _shutdown_sender: &broadcast::Sender<()>,
) -> bool {
    warn!("no window detection on this platform, usage access will be reported as denied");
    false
}
