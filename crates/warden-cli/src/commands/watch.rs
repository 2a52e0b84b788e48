use crate::client::{ClientError, DaemonClient};
use anyhow::Result;
use warden_protocol::Response;

use super::format::format_timestamp_ms;

/// Prints blocked application events until interrupted or the daemon stops.
pub async fn execute(json: bool) -> Result<()> {
    let client = DaemonClient::new();

    let mut events = match client.subscribe().await {
        Ok(events) => events,
        Err(ClientError::DaemonNotRunning) => super::daemon_not_running(),
        Err(error) => return Err(error.into()),
    };

    if !json {
        println!("Watching for blocked applications (Ctrl+C to quit)");
    }

    loop {
        tokio::select! {
            event = events.next_event() => {
                match event? {
                    Some(Response::AppBlocked { package, timestamp }) => {
                        if json {
                            println!(
                                "{}",
                                serde_json::json!({ "package": package, "timestamp": timestamp })
                            );
                        } else {
                            println!("{}  {}", format_timestamp_ms(timestamp), package);
                        }
                    }
                    Some(_) => {}
                    None => {
                        if !json {
                            println!("Daemon closed the connection");
                        }
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
