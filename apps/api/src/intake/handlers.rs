//! Axum route handlers for the application intake endpoint.

use axum::{extract::State, http::StatusCode, Json};
use bytes::Bytes;

use crate::errors::AppError;
use crate::intake::service::SubmitResponse;
use crate::state::AppState;

/// POST /api/submit-application
///
/// The body is read raw: an empty body counts as `{}` and malformed JSON is
/// an internal failure rather than an extractor rejection.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    let response = state.intake.submit(&body).await?;
    Ok(Json(response))
}

/// OPTIONS /api/submit-application
///
/// CORS preflight. The CORS headers come from the router's header layers.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any other method on the intake endpoint.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
