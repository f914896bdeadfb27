use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::translate::{PipelineError, PipelineInput};
use crate::validation::{check_fields, FieldError, FieldKind, RequestBody, ValidatedJson};

#[derive(Debug, Deserialize)]
pub struct SingleTextRequest {
    pub input_text: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchTextRequest {
    pub input_texts: Vec<String>,
}

impl RequestBody for SingleTextRequest {
    fn field_errors(body: &Value) -> Vec<FieldError> {
        check_fields(body, &[("input_text", FieldKind::String)])
    }
}

impl RequestBody for BatchTextRequest {
    fn field_errors(body: &Value) -> Vec<FieldError> {
        check_fields(body, &[("input_texts", FieldKind::StringList)])
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: T,
}

impl<T> MessageResponse<T> {
    fn new(message: T) -> Json<Self> {
        Json(Self { message })
    }
}

pub async fn index() -> Json<MessageResponse<&'static str>> {
    MessageResponse::new("Hello World")
}

pub async fn ping() -> Json<MessageResponse<&'static str>> {
    MessageResponse::new("pong")
}

pub async fn echo(
    ValidatedJson(request): ValidatedJson<SingleTextRequest>,
) -> Json<MessageResponse<String>> {
    MessageResponse::new(request.input_text)
}

pub async fn translate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SingleTextRequest>,
) -> Result<Json<MessageResponse<String>>, ApiError> {
    let mut texts = run_pipeline(&state, PipelineInput::Single(request.input_text)).await?;
    // run_pipeline returns exactly one text for a single input
    Ok(MessageResponse::new(texts.remove(0)))
}

pub async fn batch_translate(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BatchTextRequest>,
) -> Result<Json<MessageResponse<Vec<String>>>, ApiError> {
    let texts = run_pipeline(&state, PipelineInput::Batch(request.input_texts)).await?;
    Ok(MessageResponse::new(texts))
}

/// Invoke the pipeline exactly once and require one record per input, in order
async fn run_pipeline(state: &AppState, input: PipelineInput) -> Result<Vec<String>, ApiError> {
    let expected = input.expected_records();
    let records = state.pipeline.run(input).await?;

    if records.len() != expected {
        return Err(PipelineError::Shape(format!(
            "expected {} record(s), pipeline returned {}",
            expected,
            records.len()
        ))
        .into());
    }

    debug!("Translated {} text(s)", expected);
    Ok(records.into_iter().map(|r| r.translation_text).collect())
}
