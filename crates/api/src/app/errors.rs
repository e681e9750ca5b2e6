use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pantry_core::DomainError;
use pantry_infra::InventoryError;

pub fn inventory_error_to_response(err: InventoryError) -> axum::response::Response {
    match err {
        InventoryError::InvalidInput(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_input", msg)
        }
        InventoryError::RecordNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "record not found")
        }
        InventoryError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        e @ InventoryError::MalformedRecord { .. } => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "malformed_record", e.to_string())
        }
        InventoryError::StoreUnavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
        }
    }
}

/// Request-level validation failures (names and quantities in the request).
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    inventory_error_to_response(err.into())
}

/// A body that is not the expected JSON shape (missing field, non-integer
/// quantity, bad syntax) is invalid input like any other.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_input", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
