// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Human-readable capture dates

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Shown when a photo has no date at all
pub const UNKNOWN: &str = "Unknown";

/// Render an EXIF timestamp (`YYYY:MM:DD HH:MM:SS`) as e.g. `5 Mar 2023, 2:30 pm`.
///
/// Values without a time part, or that do not parse, are returned as given.
pub fn format_date_time(value: Option<&str>) -> String {
    let raw = match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return UNKNOWN.to_string(),
    };

    let mut parts = raw.split(' ');
    let (date_part, time_part) = match (parts.next(), parts.next()) {
        (Some(date), Some(time)) if !date.is_empty() && !time.is_empty() => (date, time),
        _ => return raw.to_string(),
    };

    match parse_exif(date_part, time_part) {
        Some(dt) => dt.format("%-d %b %Y, %-I:%M %P").to_string(),
        None => raw.to_string(),
    }
}

fn parse_exif(date_part: &str, time_part: &str) -> Option<NaiveDateTime> {
    let mut date = date_part.split(':').map(|s| s.parse::<u32>().ok());
    let year = date.next()??;
    let month = date.next()??;
    let day = date.next()??;

    let mut time = time_part.split(':').map(|s| s.parse::<u32>().ok());
    let hour = time.next()??;
    let minute = time.next()??;

    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(NaiveDateTime::new(date, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_afternoon() {
        assert_eq!(format_date_time(Some("2023:03:05 14:30:00")), "5 Mar 2023, 2:30 pm");
    }

    #[test]
    fn test_just_after_midnight() {
        assert_eq!(format_date_time(Some("2023:12:25 00:05:59")), "25 Dec 2023, 12:05 am");
    }

    #[test]
    fn test_missing_is_unknown() {
        assert_eq!(format_date_time(None), UNKNOWN);
        assert_eq!(format_date_time(Some("   ")), UNKNOWN);
    }

    #[test]
    fn test_date_only_passes_through() {
        assert_eq!(format_date_time(Some("2023:03:05")), "2023:03:05");
    }

    #[test]
    fn test_unparseable_passes_through() {
        assert_eq!(format_date_time(Some("Unknown Date")), "Unknown Date");
        assert_eq!(format_date_time(Some("2023:13:40 25:00:00")), "2023:13:40 25:00:00");
    }
}
