use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::{
    error::{AppError, ScanError},
    model::attendance::{AttendanceRecord, REG_NUMBER_KEY, STATUS_KEY, Status},
    model::registration::column,
    store::{Ledger, Record, SheetStore, StoreError, Table},
    utils::{normalize, timestamp},
};

pub const NO_TAG: &str = "No RFID Tag ID provided.";
pub const UNREGISTERED: &str = "Unregistered tag.";
const STORE_DOWN: &str = "Server database setup failed.";
const UNEXPECTED: &str = "Internal server error.";

#[derive(Deserialize, ToSchema)]
pub struct ScanRequest {
    #[schema(example = "a3f9c1d2")]
    #[serde(default)]
    pub rfid_tag: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResponse {
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "Attendance recorded: Alice is now marked as IN")]
    pub message: String,
    #[schema(example = "2026-01-01 09:00:00")]
    pub time: String,
    pub action: Status,
}

/// Status the next scan of `reg_number` should record.
///
/// Looks at the last record for that registration number in sheet order.
pub fn next_status(records: &[Record], reg_number: &str) -> Status {
    let last = records
        .iter()
        .rfind(|r| r.get(REG_NUMBER_KEY).map(String::as_str) == Some(reg_number));

    Status::next_after(last.and_then(|r| r.get(STATUS_KEY)).map(String::as_str))
}

/// Resolves a scanned tag to its registration row and appends the toggled
/// IN/OUT record for that person.
pub async fn record_scan(
    store: &dyn SheetStore,
    rfid_tag: Option<&str>,
) -> Result<AttendanceRecord, AppError> {
    let rfid_tag = normalize::key(rfid_tag);
    if rfid_tag.is_empty() {
        return Err(AppError::Validation(NO_TAG.into()));
    }

    let tags = store
        .read_column(Table::Registrations, column::RFID_TAG)
        .await
        .map_err(internal)?;

    // index 0 is the header, so a hit is also the sheet row index
    let Some(row_index) = tags
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, tag)| normalize::key(Some(tag.as_str())) == rfid_tag)
        .map(|(i, _)| i)
    else {
        warn!(rfid_tag = %rfid_tag, "Unknown RFID tag");
        return Err(AppError::UnregisteredTag(UNREGISTERED.into()));
    };

    let row = store
        .read_row(Table::Registrations, row_index)
        .await
        .map_err(internal)?;
    let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
    let name = cell(column::NAME);
    let registration_number = cell(column::REG_NUMBER);

    let history = store
        .read_all_records(Table::Attendance)
        .await
        .map_err(internal)?;
    let status = next_status(&history, &registration_number);

    let record = AttendanceRecord {
        timestamp: timestamp::now(),
        name,
        registration_number,
        rfid_tag,
        status,
    };
    store
        .append_row(Table::Attendance, record.clone().into_row())
        .await
        .map_err(internal)?;

    info!(
        name = %record.name,
        reg_number = %record.registration_number,
        action = %record.status,
        "Attendance recorded"
    );
    Ok(record)
}

fn internal(e: StoreError) -> AppError {
    error!(error = %e, "Attendance recording failed");
    AppError::Internal(UNEXPECTED.into())
}

/// Record an RFID scan
#[utoipa::path(
    post,
    path = "/attendance",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan recorded", body = ScanResponse),
        (status = 400, description = "No tag in request", body = Object, example = json!({
            "status": "error",
            "message": "No RFID Tag ID provided."
        })),
        (status = 404, description = "Tag not assigned to anyone", body = Object, example = json!({
            "status": "failure",
            "message": "Unregistered tag."
        })),
        (status = 500, description = "Store unavailable or write failed", body = Object, example = json!({
            "status": "error",
            "message": "Server database setup failed."
        }))
    ),
    tag = "Attendance"
)]
pub async fn record_attendance(
    ledger: web::Data<Ledger>,
    payload: web::Json<ScanRequest>,
) -> Result<HttpResponse, ScanError> {
    let store = ledger
        .store()
        .map_err(|_| AppError::ServiceUnavailable(STORE_DOWN.into()))?;

    let record = record_scan(store, payload.rfid_tag.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ScanResponse {
        status: "success".into(),
        message: format!(
            "Attendance recorded: {} is now marked as {}",
            record.name, record.status
        ),
        time: record.timestamp,
        action: record.status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn record(reg: &str, status: &str) -> Record {
        Record::from([
            (REG_NUMBER_KEY.to_string(), reg.to_string()),
            (STATUS_KEY.to_string(), status.to_string()),
        ])
    }

    async fn store_with(people: &[(&str, &str, &str)]) -> MemoryStore {
        let store = MemoryStore::with_headers();
        for (name, reg, tag) in people {
            store
                .append_row(
                    Table::Registrations,
                    vec![name.to_string(), reg.to_string(), tag.to_string(), "t".into()],
                )
                .await
                .unwrap();
        }
        store
    }

    #[test]
    fn next_status_uses_last_record_of_that_person() {
        let history = vec![
            record("REG1", "IN"),
            record("REG2", "IN"),
            record("REG1", "OUT"),
            record("REG2", "OUT"),
        ];
        assert_eq!(next_status(&history, "REG1"), Status::In);

        let history = vec![record("REG1", "OUT"), record("REG1", "IN"), record("REG2", "OUT")];
        assert_eq!(next_status(&history, "REG1"), Status::Out);
    }

    #[test]
    fn next_status_defaults_to_in() {
        assert_eq!(next_status(&[], "REG1"), Status::In);
        assert_eq!(next_status(&[record("REG2", "IN")], "REG1"), Status::In);
        assert_eq!(next_status(&[record("REG1", "???")], "REG1"), Status::In);
    }

    #[actix_web::test]
    async fn scans_toggle_in_out_in() {
        let store = store_with(&[("Alice", "REG1", "TAG1")]).await;

        let first = record_scan(&store, Some(" tag1 ")).await.unwrap();
        assert_eq!(first.status, Status::In);
        assert_eq!(first.name, "Alice");
        assert_eq!(first.rfid_tag, "TAG1");

        let second = record_scan(&store, Some("TAG1")).await.unwrap();
        assert_eq!(second.status, Status::Out);
        let third = record_scan(&store, Some("TAG1")).await.unwrap();
        assert_eq!(third.status, Status::In);

        let rows = store.rows(Table::Attendance).await;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2][1..], ["Alice", "REG1", "TAG1", "OUT"]);
    }

    #[actix_web::test]
    async fn people_toggle_independently() {
        let store = store_with(&[("Alice", "REG1", "TAG1"), ("Bob", "REG2", "TAG2")]).await;

        assert_eq!(record_scan(&store, Some("TAG1")).await.unwrap().status, Status::In);
        assert_eq!(record_scan(&store, Some("TAG2")).await.unwrap().status, Status::In);
        assert_eq!(record_scan(&store, Some("TAG1")).await.unwrap().status, Status::Out);
    }

    #[actix_web::test]
    async fn first_matching_tag_row_wins() {
        let store = store_with(&[
            ("Carol", "REG3", ""),
            ("Alice", "REG1", "tag1"),
            ("Impostor", "REG9", "TAG1"),
        ])
        .await;
        let rec = record_scan(&store, Some("TAG1")).await.unwrap();
        assert_eq!(rec.registration_number, "REG1");
    }

    #[actix_web::test]
    async fn unknown_or_blank_tag_writes_nothing() {
        let store = store_with(&[("Alice", "REG1", "TAG1")]).await;

        let err = record_scan(&store, Some("TAG9")).await.unwrap_err();
        assert_eq!(err, AppError::UnregisteredTag(UNREGISTERED.into()));

        let err = record_scan(&store, Some("   ")).await.unwrap_err();
        assert_eq!(err, AppError::Validation(NO_TAG.into()));

        assert_eq!(store.rows(Table::Attendance).await.len(), 1);
    }
}
