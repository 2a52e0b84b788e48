use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use warden_core::{
    ApplicationId, BlockedAppEvent, BlocklistRepositoryError, BlocklistStore, Clock,
    ForegroundResolver, DEFAULT_FOREGROUND_WINDOW,
};

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("monitoring interval must be greater than zero")]
    InvalidInterval,

    #[error("unable to read the blocklist: {0}")]
    Blocklist(#[from] BlocklistRepositoryError),

    #[error("monitor is not running")]
    ActorUnavailable,
}

pub enum MonitorMessage {
    Start {
        interval: Duration,
        reply: oneshot::Sender<Result<(), MonitorError>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    GetStatus {
        reply: oneshot::Sender<MonitorStatus>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStatus {
    pub active: bool,
    pub interval: Option<Duration>,
    pub tick_count: u64,
    pub blocked_count: u64,
}

struct MonitorSession {
    interval: Duration,
    blocked_snapshot: HashSet<ApplicationId>,
    ticker: Interval,
    tick_count: u64,
    blocked_count: u64,
}

/// Periodic foreground check against a blocklist snapshot.
///
/// Control messages and ticks share the actor task, so a session is either
/// running or stopped and never overlaps with another one. The blocklist is
/// read once per `Start`; edits made while a session runs take effect on the
/// next `Start`.
pub struct MonitorActor {
    receiver: mpsc::Receiver<MonitorMessage>,
    blocklist: BlocklistStore,
    resolver: ForegroundResolver,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<BlockedAppEvent>,
    session: Option<MonitorSession>,
}

#[derive(Clone)]
pub struct MonitorHandle {
    sender: mpsc::Sender<MonitorMessage>,
    events: broadcast::Sender<BlockedAppEvent>,
}

impl MonitorHandle {
    /// Starts a session, replacing the running one if any. Returns once the
    /// new session is installed; its first tick follows immediately.
    pub async fn start(&self, interval: Duration) -> Result<(), MonitorError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(MonitorMessage::Start {
                interval,
                reply: reply_sender,
            })
            .await
            .map_err(|_| MonitorError::ActorUnavailable)?;
        reply_receiver
            .await
            .map_err(|_| MonitorError::ActorUnavailable)?
    }

    /// Stops the running session. Safe to call when already stopped.
    pub async fn stop(&self) -> Result<(), MonitorError> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(MonitorMessage::Stop {
                reply: reply_sender,
            })
            .await
            .map_err(|_| MonitorError::ActorUnavailable)?;
        reply_receiver
            .await
            .map_err(|_| MonitorError::ActorUnavailable)
    }

    pub async fn status(&self) -> Option<MonitorStatus> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.sender
            .send(MonitorMessage::GetStatus {
                reply: reply_sender,
            })
            .await
            .ok()?;
        reply_receiver.await.ok()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BlockedAppEvent> {
        self.events.subscribe()
    }
}

impl MonitorActor {
    pub fn new(
        blocklist: BlocklistStore,
        resolver: ForegroundResolver,
        clock: Arc<dyn Clock>,
        event_buffer: usize,
    ) -> (Self, MonitorHandle) {
        let (sender, receiver) = mpsc::channel(32);
        let (events, _) = broadcast::channel(event_buffer.max(1));

        let actor = Self {
            receiver,
            blocklist,
            resolver,
            clock,
            events: events.clone(),
            session: None,
        };

        let handle = MonitorHandle { sender, events };

        (actor, handle)
    }

    pub async fn run(mut self) {
        info!("monitor actor started");

        loop {
            tokio::select! {
                biased;

                message = self.receiver.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        None => break,
                    }
                }
                _ = next_tick(&mut self.session), if self.session.is_some() => {
                    self.tick();
                }
            }
        }

        debug!("monitor actor stopped");
    }

    fn handle_message(&mut self, message: MonitorMessage) {
        match message {
            MonitorMessage::Start { interval, reply } => {
                let result = self.start_session(interval);
                if let Err(ref error) = result {
                    warn!(%error, "failed to start monitoring");
                }
                let _ = reply.send(result);
            }
            MonitorMessage::Stop { reply } => {
                self.stop_session();
                let _ = reply.send(());
            }
            MonitorMessage::GetStatus { reply } => {
                let _ = reply.send(self.status());
            }
        }
    }

    fn start_session(&mut self, interval: Duration) -> Result<(), MonitorError> {
        if interval.is_zero() {
            return Err(MonitorError::InvalidInterval);
        }

        self.stop_session();

        let blocked_snapshot = self.blocklist.get_blocked_apps()?;

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            blocked = blocked_snapshot.len(),
            "monitoring started"
        );

        self.session = Some(MonitorSession {
            interval,
            blocked_snapshot,
            ticker,
            tick_count: 0,
            blocked_count: 0,
        });

        Ok(())
    }

    fn stop_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                ticks = session.tick_count,
                detections = session.blocked_count,
                "monitoring stopped"
            );
        }
    }

    fn tick(&mut self) {
        let Some(ref mut session) = self.session else {
            return;
        };

        session.tick_count += 1;

        let foreground = match self.resolver.resolve_foreground(DEFAULT_FOREGROUND_WINDOW) {
            Ok(foreground) => foreground,
            Err(error) => {
                warn!(%error, "foreground resolution failed, skipping tick");
                return;
            }
        };

        let Some(application) = foreground else {
            trace!("no foreground application in window");
            return;
        };

        if !session.blocked_snapshot.contains(&application) {
            trace!(application = %application, "foreground application allowed");
            return;
        }

        session.blocked_count += 1;
        let event = BlockedAppEvent::new(application, self.clock.now_ms());

        info!(application = %event.application, "blocked application in foreground");

        if self.events.send(event).is_err() {
            debug!("no subscriber for blocked application event");
        }
    }

    fn status(&self) -> MonitorStatus {
        match self.session {
            Some(ref session) => MonitorStatus {
                active: true,
                interval: Some(session.interval),
                tick_count: session.tick_count,
                blocked_count: session.blocked_count,
            },
            None => MonitorStatus::default(),
        }
    }
}

async fn next_tick(session: &mut Option<MonitorSession>) {
    match session {
        Some(session) => {
            session.ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
