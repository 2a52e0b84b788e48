use crate::client::{ClientError, DaemonClient};
use anyhow::Result;
use serde::Serialize;
use warden_protocol::{Request, Response};

#[derive(Serialize, Debug, PartialEq)]
struct StatusOutput {
    daemon_running: bool,
    active: bool,
    interval_ms: u64,
    tick_count: u64,
    blocked_count: u64,
}

pub async fn execute(json: bool) -> Result<()> {
    let client = DaemonClient::new();

    let output = match client.send(Request::GetMonitorStatus).await {
        Ok(Response::MonitorStatus {
            active,
            interval_ms,
            tick_count,
            blocked_count,
        }) => StatusOutput {
            daemon_running: true,
            active,
            interval_ms,
            tick_count,
            blocked_count,
        },
        Err(ClientError::DaemonNotRunning) => StatusOutput {
            daemon_running: false,
            active: false,
            interval_ms: 0,
            tick_count: 0,
            blocked_count: 0,
        },
        other => return super::fail(other),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_formatted(&output);
    }

    Ok(())
}

fn print_formatted(output: &StatusOutput) {
    if !output.daemon_running {
        println!("Daemon not running");
        return;
    }

    if !output.active {
        println!("Monitoring stopped");
        return;
    }

    println!("Monitoring active");
    println!("   Interval: {} ms", output.interval_ms);
    println!("   Checks: {}", output.tick_count);
    println!("   Blocked detections: {}", output.blocked_count);
}
