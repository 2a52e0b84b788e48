use chrono::{Local, TimeZone, Utc};

/// Human-readable foreground time, e.g. `1h 05m`, `3m 20s`, `45s`.
pub fn format_duration_ms(milliseconds: i64) -> String {
    let total_seconds = milliseconds.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

pub fn format_timestamp_ms(milliseconds: i64) -> String {
    match Utc.timestamp_millis_opt(milliseconds).single() {
        Some(timestamp) => timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_shows_hours_and_minutes() {
        assert_eq!(format_duration_ms(3_900_000), "1h 05m");
        assert_eq!(format_duration_ms(7_200_000), "2h 00m");
    }

    #[test]
    fn format_duration_shows_minutes_and_seconds() {
        assert_eq!(format_duration_ms(200_000), "3m 20s");
    }

    #[test]
    fn format_duration_shows_only_seconds_when_under_minute() {
        assert_eq!(format_duration_ms(45_000), "45s");
        assert_eq!(format_duration_ms(999), "0s");
        assert_eq!(format_duration_ms(-5), "0s");
    }

    #[test]
    fn out_of_range_timestamp_is_unknown() {
        assert_eq!(format_timestamp_ms(i64::MAX), "unknown");
    }
}
