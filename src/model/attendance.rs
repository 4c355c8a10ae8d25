use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Header row of the Attendance sheet.
pub const ATTENDANCE_HEADER: [&str; 5] = [
    "Date & Time",
    "Name",
    "Registration Number",
    "RFID Tag ID",
    "Status (IN/OUT)",
];

/// Record keys used when reading the Attendance sheet back as header-keyed maps.
pub const REG_NUMBER_KEY: &str = "Registration Number";
pub const STATUS_KEY: &str = "Status (IN/OUT)";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
    In,
    Out,
}

impl Status {
    /// Status of the next scan given the previous one.
    ///
    /// Only a previous `IN` leads to `OUT`; no history, `OUT`, or any value
    /// someone typed into the sheet by hand leads to `IN`.
    pub fn next_after(last: Option<&str>) -> Self {
        match last {
            Some(s) if s == Status::In.as_ref() => Status::Out,
            _ => Status::In,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub timestamp: String,
    pub name: String,
    pub registration_number: String,
    pub rfid_tag: String,
    pub status: Status,
}

impl AttendanceRecord {
    pub fn into_row(self) -> Vec<String> {
        vec![
            self.timestamp,
            self.name,
            self.registration_number,
            self.rfid_tag,
            self.status.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_scan_is_in() {
        assert_eq!(Status::next_after(None), Status::In);
    }

    #[test]
    fn toggles_between_in_and_out() {
        assert_eq!(Status::next_after(Some("IN")), Status::Out);
        assert_eq!(Status::next_after(Some("OUT")), Status::In);
    }

    #[test]
    fn unexpected_status_counts_as_out() {
        assert_eq!(Status::next_after(Some("LUNCH")), Status::In);
        assert_eq!(Status::next_after(Some("in")), Status::In);
        assert_eq!(Status::next_after(Some("")), Status::In);
    }

    #[test]
    fn row_follows_header_order() {
        let row = AttendanceRecord {
            timestamp: "2026-01-01 09:00:00".into(),
            name: "Alice".into(),
            registration_number: "REG1".into(),
            rfid_tag: "TAG1".into(),
            status: Status::Out,
        }
        .into_row();
        assert_eq!(row.len(), ATTENDANCE_HEADER.len());
        assert_eq!(row[2], "REG1");
        assert_eq!(row[4], "OUT");
    }
}
