use chrono::{DateTime, NaiveDate};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";

    pub fn format_date(date: NaiveDate) -> String {
        date.format(Self::STANDARD_TIME_FORMAT).to_string()
    }
}

/// Calendar date (UTC) of a unix timestamp in seconds.
pub fn epoch_sec_to_date(epoch_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec, 0).map(|dt| dt.date_naive())
}

pub fn format_duration(ms: i64) -> String {
    if ms < TimeUtils::MS_IN_S {
        return format!("{}ms", ms);
    }
    let secs = ms / TimeUtils::MS_IN_S;
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    format!("{}h {}m", mins / 60, mins % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_epoch_to_utc_date() {
        // 2023-01-03 14:30:00 UTC
        let date = epoch_sec_to_date(1_672_756_200).unwrap();
        assert_eq!(TimeUtils::format_date(date), "2023-01-03");
    }

    #[test]
    fn durations_pick_largest_unit() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(5_000), "5s");
        assert_eq!(format_duration(125_000), "2m");
        assert_eq!(format_duration(3_720_000), "1h 2m");
    }
}
