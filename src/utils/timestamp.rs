use chrono::{DateTime, Local, TimeZone};

/// Format shared by the Web Timestamp and Date & Time columns.
pub const SHEET_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Server-local wall clock time as written to the sheet.
pub fn now() -> String {
    format(&Local::now())
}

pub fn format<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(SHEET_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Utc};

    #[test]
    fn formats_without_offset_or_fraction() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 8, 5, 9).unwrap();
        assert_eq!(format(&at), "2026-03-07 08:05:09");
    }

    #[test]
    fn now_parses_back() {
        assert!(NaiveDateTime::parse_from_str(&now(), SHEET_TIME_FORMAT).is_ok());
    }
}
