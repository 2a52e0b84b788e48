use crate::client::DaemonClient;
use anyhow::Result;
use warden_protocol::{Request, Response};

pub async fn execute() -> Result<()> {
    let client = DaemonClient::new();

    match client.send(Request::StopMonitoring).await {
        Ok(Response::Ok) => {
            println!("Monitoring stopped");
            Ok(())
        }
        other => super::fail(other),
    }
}
