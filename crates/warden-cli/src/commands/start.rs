use crate::client::{ClientError, DaemonClient};
use crate::daemon_launcher::ensure_daemon_running;
use anyhow::Result;
use warden_protocol::{Request, Response};

pub async fn execute(interval_ms: Option<u64>) -> Result<()> {
    let client = DaemonClient::new();
    let request = Request::StartMonitoring { interval_ms };

    let result = match client.send(request.clone()).await {
        Err(ClientError::DaemonNotRunning) => {
            ensure_daemon_running().await?;
            client.send(request).await
        }
        result => result,
    };

    match result {
        Ok(Response::Ok) => {
            println!("Monitoring started");
            if let Some(interval_ms) = interval_ms {
                println!("   Interval: {} ms", interval_ms);
            }
            Ok(())
        }
        other => super::fail(other),
    }
}
