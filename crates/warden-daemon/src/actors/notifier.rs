use std::collections::HashMap;

use notify_rust::{Notification, Urgency};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use warden_core::{ApplicationId, BlockedAppEvent, NotificationUrgency};

/// A blocked application that stays in front is reported on every tick; the
/// desktop notification repeats at most once per this period.
const REPEAT_COOLDOWN_MS: i64 = 60_000;

pub struct NotifierActor {
    events: broadcast::Receiver<BlockedAppEvent>,
    urgency: Urgency,
    sound_enabled: bool,
    last_notified: HashMap<ApplicationId, i64>,
}

impl NotifierActor {
    pub fn new(
        events: broadcast::Receiver<BlockedAppEvent>,
        urgency: NotificationUrgency,
        sound_enabled: bool,
    ) -> Self {
        let urgency = match urgency {
            NotificationUrgency::Low => Urgency::Low,
            NotificationUrgency::Normal => Urgency::Normal,
            NotificationUrgency::Critical => Urgency::Critical,
        };

        Self {
            events,
            urgency,
            sound_enabled,
            last_notified: HashMap::new(),
        }
    }

    pub async fn run(mut self) {
        info!("notifier actor started");

        loop {
            match self.events.recv().await {
                Ok(event) => {
                    if self.should_notify(&event) {
                        self.send_blocked_notification(&event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notifier fell behind blocked application events");
                }
                Err(RecvError::Closed) => break,
            }
        }

        debug!("notifier actor stopped");
    }

    fn should_notify(&mut self, event: &BlockedAppEvent) -> bool {
        match self.last_notified.get(&event.application) {
            Some(&previous_ms) if event.timestamp_ms - previous_ms < REPEAT_COOLDOWN_MS => false,
            _ => {
                self.last_notified
                    .insert(event.application.clone(), event.timestamp_ms);
                true
            }
        }
    }

    fn send_blocked_notification(&self, event: &BlockedAppEvent) {
        let body = format!("{} is on your blocklist.", event.application);

        match self
            .build_notification("Warden - Blocked application", &body)
            .show()
        {
            Ok(_) => {
                debug!(application = %event.application, "blocked application notification sent");
            }
            Err(error) => {
                warn!(%error, "failed to show blocked application notification");
            }
        }
    }

    fn build_notification(&self, summary: &str, body: &str) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(summary)
            .body(body)
            .urgency(self.urgency)
            .appname("Warden");

        if self.sound_enabled {
            notification.sound_name("dialog-warning");
        }

        notification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(application: &str, timestamp_ms: i64) -> BlockedAppEvent {
        BlockedAppEvent::new(ApplicationId::parse(application).unwrap(), timestamp_ms)
    }

    fn actor() -> NotifierActor {
        let (_, receiver) = broadcast::channel(4);
        NotifierActor::new(receiver, NotificationUrgency::Normal, false)
    }

    #[test]
    fn first_detection_is_notified() {
        let mut actor = actor();

        assert!(actor.should_notify(&event("com.evil.app", 1_000)));
    }

    #[test]
    fn repeated_detection_is_throttled() {
        let mut actor = actor();

        assert!(actor.should_notify(&event("com.evil.app", 0)));
        assert!(!actor.should_notify(&event("com.evil.app", 5_000)));
        assert!(!actor.should_notify(&event("com.evil.app", 59_999)));
        assert!(actor.should_notify(&event("com.evil.app", 60_000)));
    }

    #[test]
    fn throttling_is_per_application() {
        let mut actor = actor();

        assert!(actor.should_notify(&event("com.evil.app", 0)));
        assert!(actor.should_notify(&event("com.other.app", 1_000)));
    }

    #[tokio::test]
    async fn actor_stops_when_bus_closes() {
        let (sender, receiver) = broadcast::channel(4);
        let actor = NotifierActor::new(receiver, NotificationUrgency::Low, false);

        let task = tokio::spawn(actor.run());
        drop(sender);

        tokio::time::timeout(std::time::Duration::from_secs(1), task)
            .await
            .expect("notifier should stop once the bus closes")
            .unwrap();
    }
}
