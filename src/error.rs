use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, From};
use serde_json::json;

/// Failures surfaced to HTTP callers. The payload is the message shown to them.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum AppError {
    /// Required field missing or blank.
    #[display(fmt = "{}", _0)]
    Validation(String),
    /// Registration number already on the sheet.
    #[display(fmt = "{}", _0)]
    Duplicate(String),
    /// Scanned tag not assigned to anyone.
    #[display(fmt = "{}", _0)]
    UnregisteredTag(String),
    /// Spreadsheet connector never came up.
    #[display(fmt = "{}", _0)]
    ServiceUnavailable(String),
    #[display(fmt = "{}", _0)]
    Internal(String),
}

impl std::error::Error for AppError {}

impl AppError {
    /// `status` field of the scanner's response body.
    pub fn outcome(&self) -> &'static str {
        match self {
            AppError::UnregisteredTag(_) => "failure",
            _ => "error",
        }
    }
}

/// Registration form responses carry only `{message}`.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::UnregisteredTag(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

/// Scanner responses carry `{status, message}`.
#[derive(Debug, Display, From)]
pub struct ScanError(pub AppError);

impl std::error::Error for ScanError {}

impl ResponseError for ScanError {
    fn status_code(&self) -> StatusCode {
        self.0.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "status": self.0.outcome(),
            "message": self.0.to_string()
        }))
    }
}
