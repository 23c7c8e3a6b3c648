//! API error type and its conversion to an HTTP response.
//!
//! Every error this crate can produce ultimately wraps one raised by
//! `fin-graph`/`fin-artifacts`/`fin-events`/`fin-contracts` -- this crate
//! adds no error variant of its own business logic, only the HTTP status
//! mapping those crates' `error_code()` already names.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Scheduler(#[from] fin_graph::SchedulerError),

    #[error(transparent)]
    Artifact(#[from] fin_artifacts::ArtifactError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error_code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "ValidationError".to_string()),
            ApiError::Scheduler(e) => (scheduler_status(e), e.error_code().to_string()),
            ApiError::Artifact(e) => (artifact_status(e), e.error_code().to_string()),
        }
    }
}

fn scheduler_status(error: &fin_graph::SchedulerError) -> StatusCode {
    use fin_graph::SchedulerError::*;
    match error {
        UnknownThread(_) => StatusCode::NOT_FOUND,
        ThreadAlreadyRunning(_) => StatusCode::CONFLICT,
        Interrupt(_) | MergeConflict { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn artifact_status(error: &fin_artifacts::ArtifactError) -> StatusCode {
    use fin_artifacts::ArtifactError::*;
    match error {
        NotFound(_) => StatusCode::NOT_FOUND,
        KindMismatch { .. } | Conflict { .. } | Contract { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Storage(_) | TypeMismatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        let body = ApiErrorBody { error_code, message: self.to_string() };
        tracing::warn!(status = %status, error_code = %body.error_code, "request failed");
        (status, Json(body)).into_response()
    }
}
