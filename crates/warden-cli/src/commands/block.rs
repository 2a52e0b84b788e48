use crate::client::DaemonClient;
use anyhow::Result;
use serde::Serialize;
use warden_protocol::{Request, Response};

#[derive(Serialize)]
struct BlockListOutput<'a> {
    packages: &'a [String],
}

pub async fn set(packages: Vec<String>) -> Result<()> {
    let client = DaemonClient::new();
    let count = packages.len();

    match client
        .send(Request::SetBlockedApps {
            packages: Some(packages),
        })
        .await
    {
        Ok(Response::Ok) => {
            if count == 0 {
                println!("Blocklist cleared");
            } else {
                println!("Blocklist updated ({} entries sent)", count);
            }
            println!("   Restart monitoring for the change to take effect");
            Ok(())
        }
        other => super::fail(other),
    }
}

pub async fn list(json: bool) -> Result<()> {
    let client = DaemonClient::new();

    match client.send(Request::GetBlockedApps).await {
        Ok(Response::BlockedApps { packages }) => {
            if json {
                let output = BlockListOutput {
                    packages: &packages,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if packages.is_empty() {
                println!("No blocked applications");
            } else {
                for package in &packages {
                    println!("{}", package);
                }
            }
            Ok(())
        }
        other => super::fail(other),
    }
}
