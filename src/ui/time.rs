//! Clock labels for message groups.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Format a millisecond timestamp as a short clock label in the local
/// timezone, e.g. `14:03` or `2:03 PM`.
pub fn format_clock(timestamp_ms: i64, twelve_hour: bool) -> String {
    format_clock_in(&Local, timestamp_ms, twelve_hour)
}

/// Timezone-generic core of [`format_clock`], so tests can pin a zone.
pub fn format_clock_in<Tz: TimeZone>(tz: &Tz, timestamp_ms: i64, twelve_hour: bool) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let when = Utc
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .with_timezone(tz);
    if twelve_hour {
        when.format("%-I:%M %p").to_string()
    } else {
        when.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    // 2024-03-05 14:03:20 UTC
    const AFTERNOON_MS: i64 = 1_709_647_400_000;

    #[test]
    fn test_24_hour_label() {
        assert_eq!(format_clock_in(&Utc, AFTERNOON_MS, false), "14:03");
    }

    #[test]
    fn test_12_hour_label() {
        assert_eq!(format_clock_in(&Utc, AFTERNOON_MS, true), "2:03 PM");
    }

    #[test]
    fn test_midnight_and_noon_in_12_hour() {
        // 2024-03-05 00:00:00 UTC
        let midnight = 1_709_596_800_000;
        assert_eq!(format_clock_in(&Utc, midnight, true), "12:00 AM");
        let noon = midnight + 12 * 3600 * 1000;
        assert_eq!(format_clock_in(&Utc, noon, true), "12:00 PM");
    }

    #[test]
    fn test_label_respects_timezone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_clock_in(&plus_two, AFTERNOON_MS, false), "16:03");
    }

    #[test]
    fn test_out_of_range_timestamp_falls_back_to_epoch() {
        assert_eq!(format_clock_in(&Utc, i64::MAX, false), "00:00");
    }
}
