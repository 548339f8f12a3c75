use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::aggregates::{CalculatorError, WizardError};
use crate::PrintShopError;

/// Errors the user can fix by changing their input. The wizard answers these
/// with its own state rather than a bare error body.
pub fn is_user_recoverable(err: &WizardError) -> bool {
    matches!(err, WizardError::MissingSelection(_) | WizardError::NotAvailable { .. } | WizardError::Rejected(_))
}

impl IntoResponse for PrintShopError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            PrintShopError::SessionNotFound => (StatusCode::NOT_FOUND, "not_found"),
            PrintShopError::Wizard(e) if is_user_recoverable(e) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            PrintShopError::Wizard(_) => (StatusCode::BAD_REQUEST, "unknown_selection"),
            PrintShopError::Calculator(CalculatorError::Incomplete) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            PrintShopError::Calculator(_) => (StatusCode::BAD_REQUEST, "unknown_selection"),
            PrintShopError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            PrintShopError::InvalidConfig { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        };
        json_error(status, code, self.to_string())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": code, "message": message.into() }))).into_response()
}

impl From<validator::ValidationErrors> for PrintShopError {
    fn from(e: validator::ValidationErrors) -> Self {
        PrintShopError::InvalidRequest(e.to_string())
    }
}
