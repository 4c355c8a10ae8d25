use crate::api::attendance::{ScanRequest, ScanResponse};
use crate::api::register::{RegisterRequest, RegisterResponse};
use crate::model::attendance::Status;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RFID Attendance API",
        version = "0.1.0",
        description = r#"
## RFID attendance bridge

Connects a web registration form and a networked RFID reader to a shared
Google Sheets document.

### Endpoints
- **Registration**: add a person (name + registration number). Registration
  numbers are unique and stored uppercase; the RFID tag is assigned later in
  the sheet.
- **Attendance**: the reader posts each scanned tag; the server looks the tag
  up and records IN or OUT, alternating per person.

### Notes
- Registration and attendance writes are check-then-append with no locking.
  Two simultaneous requests for the same person can both pass the check.
- If the spreadsheet connection fails at startup the server keeps running,
  serves the form, and answers data requests with 500.
"#,
    ),
    paths(
        crate::api::register::register,
        crate::api::attendance::record_attendance,
        crate::api::health::health,
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            ScanRequest,
            ScanResponse,
            Status
        )
    ),
    tags(
        (name = "Registration", description = "Web form registration"),
        (name = "Attendance", description = "RFID scanner check-in/check-out"),
        (name = "Health", description = "Store connectivity"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_both_data_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/register"));
        assert!(doc.paths.paths.contains_key("/attendance"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
