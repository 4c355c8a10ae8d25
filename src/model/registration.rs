use serde::Serialize;
use utoipa::ToSchema;

/// Header row of the Registrations sheet (the document's first sheet).
pub const REGISTRATION_HEADER: [&str; 4] =
    ["Name", "Registration Number", "RFID Tag ID", "Web Timestamp"];

/// Zero-based column positions in the Registrations sheet.
pub mod column {
    pub const NAME: usize = 0;
    pub const REG_NUMBER: usize = 1;
    pub const RFID_TAG: usize = 2;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Registration {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "REG1")]
    pub registration_number: String,
    /// Blank until a tag is assigned to the person by hand in the sheet.
    #[schema(example = "")]
    pub rfid_tag: String,
    #[schema(example = "2026-01-01 09:00:00")]
    pub web_timestamp: String,
}

impl Registration {
    /// A fresh web registration, tag not yet assigned.
    pub fn new(name: String, registration_number: String, web_timestamp: String) -> Self {
        Self {
            name,
            registration_number,
            rfid_tag: String::new(),
            web_timestamp,
        }
    }

    pub fn into_row(self) -> Vec<String> {
        vec![
            self.name,
            self.registration_number,
            self.rfid_tag,
            self.web_timestamp,
        ]
    }
}
