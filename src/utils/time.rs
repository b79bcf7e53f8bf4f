use chrono::{DateTime, Local, Timelike};

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Format a local timestamp as a YYYY-MM-DD date key
pub fn date_key(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// Today's date key on the local clock
pub fn today_key() -> String {
    date_key(&Local::now())
}

/// Whether a local timestamp falls exactly on the given HH:MM minute
pub fn minute_matches(time: &DateTime<Local>, time_str: &str) -> bool {
    match parse_time(time_str) {
        Some((hour, minute)) => time.hour() == hour && time.minute() == minute,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_valid_times() {
        assert_eq!(parse_time("08:00"), Some((8, 0)));
        assert_eq!(parse_time("23:59"), Some((23, 59)));
        assert_eq!(parse_time("0:5"), Some((0, 5)));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("12:60"), None);
        assert_eq!(parse_time("12"), None);
        assert_eq!(parse_time("ab:cd"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn matches_exact_minute_only() {
        let at_eight = Local.with_ymd_and_hms(2024, 6, 5, 8, 0, 30).unwrap();
        assert!(minute_matches(&at_eight, "08:00"));
        assert!(!minute_matches(&at_eight, "08:01"));
        assert!(!minute_matches(&at_eight, "not a time"));
    }

    #[test]
    fn formats_date_key() {
        let time = Local.with_ymd_and_hms(2024, 6, 5, 8, 0, 0).unwrap();
        assert_eq!(date_key(&time), "2024-06-05");
    }
}
