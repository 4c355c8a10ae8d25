use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    model::registration::{Registration, column},
    store::{Ledger, SheetStore, Table},
    utils::{normalize, timestamp},
};

pub const REQUIRED_FIELDS: &str = "Name and Registration Number are required.";
const STORE_DOWN: &str = "Server error: Database connection failed.";
const UNEXPECTED: &str = "An unexpected server error occurred during registration.";
const REGISTERED: &str = "Registration successful! Your tag can now be assigned.";

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Alice")]
    #[serde(default)]
    pub name: Option<String>,
    #[schema(example = "reg1")]
    #[serde(default, rename = "regNumber")]
    pub reg_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "Registration successful! Your tag can now be assigned.")]
    pub message: String,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "REG1")]
    #[serde(rename = "regNumber")]
    pub reg_number: String,
}

/// Validates the form fields, rejects a registration number already on the
/// sheet and appends the new person with a blank tag.
pub async fn register_person(
    store: &dyn SheetStore,
    name: Option<&str>,
    reg_number: Option<&str>,
) -> Result<Registration, AppError> {
    let name = normalize::trimmed(name);
    let reg_number = normalize::key(reg_number);

    if name.is_empty() || reg_number.is_empty() {
        return Err(AppError::Validation(REQUIRED_FIELDS.into()));
    }

    let existing = store
        .read_column(Table::Registrations, column::REG_NUMBER)
        .await
        .map_err(internal)?;

    // row 0 is the header
    if existing.iter().skip(1).any(|r| *r == reg_number) {
        warn!(reg_number = %reg_number, "Duplicate registration number");
        return Err(AppError::Duplicate(format!(
            "Registration Number {reg_number} is already registered. Avoid duplicate registration."
        )));
    }

    let registration = Registration::new(name, reg_number, timestamp::now());
    store
        .append_row(Table::Registrations, registration.clone().into_row())
        .await
        .map_err(internal)?;

    info!(
        name = %registration.name,
        reg_number = %registration.registration_number,
        "New web registration recorded"
    );
    Ok(registration)
}

fn internal(e: crate::store::StoreError) -> AppError {
    error!(error = %e, "Registration failed");
    AppError::Internal(UNEXPECTED.into())
}

/// Register a person from the web form
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = RegisterResponse),
        (status = 400, description = "Name or registration number blank", body = Object, example = json!({
            "message": "Name and Registration Number are required."
        })),
        (status = 409, description = "Registration number already registered", body = Object, example = json!({
            "message": "Registration Number REG1 is already registered. Avoid duplicate registration."
        })),
        (status = 500, description = "Store unavailable or write failed", body = Object, example = json!({
            "message": "Server error: Database connection failed."
        }))
    ),
    tag = "Registration"
)]
pub async fn register(
    ledger: web::Data<Ledger>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let store = ledger
        .store()
        .map_err(|_| AppError::ServiceUnavailable(STORE_DOWN.into()))?;

    let registration =
        register_person(store, payload.name.as_deref(), payload.reg_number.as_deref()).await?;

    Ok(HttpResponse::Ok().json(RegisterResponse {
        message: REGISTERED.into(),
        name: registration.name,
        reg_number: registration.registration_number,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[actix_web::test]
    async fn appends_normalized_row_with_blank_tag() {
        let store = MemoryStore::with_headers();
        let reg = register_person(&store, Some("  Alice "), Some(" reg1 "))
            .await
            .unwrap();
        assert_eq!(reg.name, "Alice");
        assert_eq!(reg.registration_number, "REG1");

        let rows = store.rows(Table::Registrations).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][..3], ["Alice", "REG1", ""]);
        assert_eq!(rows[1][3].len(), "2026-01-01 09:00:00".len());
    }

    #[actix_web::test]
    async fn duplicate_number_is_rejected_case_insensitively() {
        let store = MemoryStore::with_headers();
        register_person(&store, Some("Alice"), Some("REG1")).await.unwrap();

        let err = register_person(&store, Some("Someone Else"), Some("reg1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(ref m) if m.contains("REG1")));
        assert_eq!(store.rows(Table::Registrations).await.len(), 2);
    }

    #[actix_web::test]
    async fn blank_fields_are_rejected_without_writing() {
        let store = MemoryStore::with_headers();
        for (name, reg) in [(Some("  "), Some("REG1")), (Some("Alice"), Some("")), (None, None)] {
            let err = register_person(&store, name, reg).await.unwrap_err();
            assert_eq!(err, AppError::Validation(REQUIRED_FIELDS.into()));
        }
        assert_eq!(store.rows(Table::Registrations).await.len(), 1);
    }

    #[actix_web::test]
    async fn header_row_is_not_a_registered_number() {
        // a header cell that already reads like a normalized number
        let store = MemoryStore::default();
        store
            .append_row(
                Table::Registrations,
                vec!["NAME".into(), "REGNO".into(), "TAG".into(), "TIME".into()],
            )
            .await
            .unwrap();

        let reg = register_person(&store, Some("Bob"), Some("regno")).await.unwrap();
        assert_eq!(reg.registration_number, "REGNO");

        let err = register_person(&store, Some("Bob"), Some("REGNO")).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
        assert_eq!(store.rows(Table::Registrations).await.len(), 2);
    }
}
