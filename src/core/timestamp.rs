//! Epoch-millisecond conversions shared by every row kind

use chrono::{DateTime, Utc};

/// Convert epoch milliseconds to a UTC timestamp with whole-second precision.
///
/// The division truncates toward zero. Values outside chrono's range yield `None`.
pub fn epoch_millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(millis / 1000, 0)
}

/// History files are named after their creation time in epoch milliseconds.
///
/// Returns `None` for anything that is not a decimal integer.
pub fn parse_epoch_millis_from_filename(file_name: &str) -> Option<i64> {
    file_name.trim().parse::<i64>().ok()
}

/// Text form used in TSV and HTML cells, e.g. `2023-11-14 22:13:20+00:00`.
pub fn format_report_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_millis_truncate_to_seconds() {
        let expected = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(epoch_millis_to_utc(1_700_000_000_000), Some(expected));
        assert_eq!(epoch_millis_to_utc(1_700_000_000_999), Some(expected));
    }

    #[test]
    fn test_negative_millis_truncate_toward_zero() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(epoch_millis_to_utc(-999), Some(epoch));
    }

    #[test]
    fn test_out_of_range_millis() {
        assert_eq!(epoch_millis_to_utc(i64::MAX), None);
    }

    #[test]
    fn test_filename_parsing() {
        assert_eq!(parse_epoch_millis_from_filename("1700000000000"), Some(1_700_000_000_000));
        assert_eq!(parse_epoch_millis_from_filename("not-a-number"), None);
        assert_eq!(parse_epoch_millis_from_filename(""), None);
        assert_eq!(parse_epoch_millis_from_filename("1700000000000.bak"), None);
    }

    #[test]
    fn test_report_format() {
        let time = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(format_report_time(&time), "2023-11-14 22:13:20+00:00");
    }
}
