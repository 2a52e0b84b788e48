use super::ApplicationId;

/// Most recent use of an application inside a queried window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub application: ApplicationId,
    pub last_used_ms: i64,
}

impl UsageRecord {
    pub fn new(application: ApplicationId, last_used_ms: i64) -> Self {
        Self {
            application,
            last_used_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageAggregate {
    pub application: ApplicationId,
    pub total_foreground_ms: i64,
    pub last_used_ms: i64,
}

impl UsageAggregate {
    pub fn has_usage(&self) -> bool {
        self.total_foreground_ms != 0
    }
}

/// One foreground observation, fed into a usage tracker by a sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSample {
    pub application: ApplicationId,
    pub recorded_at_ms: i64,
    pub duration_ms: i64,
}

impl UsageSample {
    pub fn new(application: ApplicationId, recorded_at_ms: i64, duration_ms: i64) -> Self {
        Self {
            application,
            recorded_at_ms,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_with_zero_time_has_no_usage() {
        let aggregate = UsageAggregate {
            application: ApplicationId::parse("com.idle").unwrap(),
            total_foreground_ms: 0,
            last_used_ms: 1_000,
        };

        assert!(!aggregate.has_usage());
    }
}
