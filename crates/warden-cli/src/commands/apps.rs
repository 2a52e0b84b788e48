use crate::client::DaemonClient;
use anyhow::Result;
use warden_protocol::{InstalledAppEntry, Request, Response};

pub async fn execute(json: bool) -> Result<()> {
    let client = DaemonClient::new();

    match client.send(Request::GetInstalledApps).await {
        Ok(Response::InstalledApps { mut apps }) => {
            apps.sort_by(|left, right| left.app_name.cmp(&right.app_name));
            if json {
                println!("{}", serde_json::to_string_pretty(&to_json(&apps))?);
            } else {
                print!("{}", render_list(&apps));
            }
            Ok(())
        }
        other => super::fail(other),
    }
}

fn to_json(apps: &[InstalledAppEntry]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = apps
        .iter()
        .map(|app| {
            serde_json::json!({
                "packageName": app.package_name,
                "appName": app.app_name,
                "isSystem": app.is_system,
            })
        })
        .collect();

    serde_json::json!({ "apps": entries })
}

const IDENTIFIER_NOTE: &str = "Identifiers come from StartupWMClass or the desktop file name. \
If one does not match what the monitor sees, block the class listed by `warden stats`.";

fn render_list(apps: &[InstalledAppEntry]) -> String {
    if apps.is_empty() {
        return "No launchable applications found\n".to_string();
    }

    let mut output = String::new();
    for app in apps {
        let origin = if app.is_system { "system" } else { "user" };
        output.push_str(&format!("{}  ({}, {})\n", app.app_name, app.package_name, origin));
    }
    output.push('\n');
    output.push_str(IDENTIFIER_NOTE);
    output.push('\n');
    output
}
