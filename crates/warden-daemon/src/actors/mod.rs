mod monitor;
mod notifier;
mod sampler;

pub use monitor::{MonitorActor, MonitorError, MonitorHandle, MonitorStatus};
pub use notifier::NotifierActor;
pub use sampler::SamplerActor;
