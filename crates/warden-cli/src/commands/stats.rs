use crate::client::DaemonClient;
use anyhow::Result;
use warden_protocol::{Request, Response, UsageStat};

use super::format::{format_duration_ms, format_timestamp_ms};

pub async fn execute(days: Option<u32>, json: bool) -> Result<()> {
    let client = DaemonClient::new();

    match client
        .send(Request::GetAppUsageStats { days_back: days })
        .await
    {
        Ok(Response::UsageStats { stats }) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&to_json(&stats))?);
            } else {
                print_table(stats, days.unwrap_or(1));
            }
            Ok(())
        }
        other => super::fail(other),
    }
}

fn to_json(stats: &[UsageStat]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = stats
        .iter()
        .map(|stat| {
            serde_json::json!({
                "packageName": stat.package_name,
                "totalTimeMs": stat.total_time_ms,
                "lastUsed": stat.last_used,
            })
        })
        .collect();

    serde_json::json!({ "stats": entries })
}

fn print_table(mut stats: Vec<UsageStat>, days: u32) {
    if stats.is_empty() {
        println!("No usage recorded in the last {} day(s)", days);
        return;
    }

    stats.sort_by(|left, right| right.total_time_ms.cmp(&left.total_time_ms));

    let width = stats
        .iter()
        .map(|stat| stat.package_name.len())
        .max()
        .unwrap_or(0);

    println!("Usage over the last {} day(s)", days);
    for stat in &stats {
        println!(
            "   {:<width$}  {:>8}  last used {}",
            stat.package_name,
            format_duration_ms(stat.total_time_ms),
            format_timestamp_ms(stat.last_used),
            width = width
        );
    }
}
