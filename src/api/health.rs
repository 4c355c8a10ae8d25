use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::store::Ledger;

/// Store connectivity
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Spreadsheet connected", body = Object, example = json!({
            "status": "ok",
            "store": "connected"
        })),
        (status = 503, description = "Connector failed at startup; the form is still served", body = Object, example = json!({
            "status": "degraded",
            "store": "unavailable"
        }))
    ),
    tag = "Health"
)]
pub async fn health(ledger: web::Data<Ledger>) -> impl Responder {
    if ledger.is_available() {
        HttpResponse::Ok().json(json!({ "status": "ok", "store": "connected" }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({ "status": "degraded", "store": "unavailable" }))
    }
}
