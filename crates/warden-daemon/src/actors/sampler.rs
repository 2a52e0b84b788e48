use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use warden_core::{ApplicationId, Clock, UsageSample, UsageSampleRecorder};

use crate::window::WindowDetector;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Records which application holds focus, one sample per interval, so the
/// usage history has something to answer from on desktops without an OS
/// usage log.
pub struct SamplerActor {
    detector: Box<dyn WindowDetector>,
    recorder: Arc<dyn UsageSampleRecorder>,
    clock: Arc<dyn Clock>,
    sample_interval: Duration,
    retention_days: u32,
}

impl SamplerActor {
    pub fn new(
        detector: Box<dyn WindowDetector>,
        recorder: Arc<dyn UsageSampleRecorder>,
        clock: Arc<dyn Clock>,
        sample_interval: Duration,
        retention_days: u32,
    ) -> Self {
        Self {
            detector,
            recorder,
            clock,
            sample_interval,
            retention_days,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            interval_seconds = self.sample_interval.as_secs(),
            retention_days = self.retention_days,
            "usage sampler started"
        );

        let mut sample_interval = tokio::time::interval(self.sample_interval);
        sample_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut prune_interval = tokio::time::interval(PRUNE_INTERVAL);

        loop {
            tokio::select! {
                _ = sample_interval.tick() => {
                    self.sample();
                }
                _ = prune_interval.tick() => {
                    self.prune();
                }
                _ = shutdown.recv() => break,
            }
        }

        debug!("usage sampler stopped");
    }

    fn sample(&self) {
        let Some(name) = self.detector.get_active_application() else {
            trace!("no active window");
            return;
        };

        let application = match ApplicationId::parse(name) {
            Ok(application) => application,
            Err(error) => {
                debug!(%error, "ignoring window with unusable class");
                return;
            }
        };

        let sample = UsageSample::new(
            application,
            self.clock.now_ms(),
            duration_ms(self.sample_interval),
        );

        if let Err(error) = self.recorder.record(&sample) {
            warn!(%error, "failed to record usage sample");
        }
    }

    fn prune(&self) {
        let cutoff_ms = self.clock.now_ms() - i64::from(self.retention_days) * DAY_MS;

        match self.recorder.prune(cutoff_ms) {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "pruned old usage samples"),
            Err(error) => warn!(%error, "failed to prune usage samples"),
        }
    }
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
