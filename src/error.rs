use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::translate::PipelineError;
use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed schema checks
    #[error("invalid request body: {} field error(s)", .errors.len())]
    Validation { status: StatusCode, errors: Vec<FieldError> },

    /// The translation pipeline failed or returned records of the wrong shape
    #[error("translation pipeline failed: {0}")]
    Upstream(#[from] PipelineError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match rejection {
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body_error",
        };
        ApiError::Validation {
            status: rejection.status(),
            errors: vec![FieldError::new(&[], rejection.body_text(), kind)],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { status, errors } => {
                debug!("Rejected request body ({}): {:?}", status, errors);
                (status, Json(json!({ "detail": errors }))).into_response()
            }
            ApiError::Upstream(e) => {
                error!("Translation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
