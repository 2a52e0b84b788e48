use crate::client::DaemonClient;
use anyhow::Result;
use warden_protocol::{Request, Response};

pub async fn execute(request: bool) -> Result<()> {
    let client = DaemonClient::new();
    let message = if request {
        Request::RequestPermission
    } else {
        Request::CheckPermission
    };

    match client.send(message).await {
        Ok(Response::Permission { granted, message }) => {
            if granted {
                println!("Usage access granted");
            } else {
                println!("Usage access not granted");
            }
            if let Some(message) = message {
                println!("   {}", message);
            }
            Ok(())
        }
        other => super::fail(other),
    }
}
