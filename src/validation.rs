use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// One field-level problem with a request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn new(path: &[Value], msg: impl Into<String>, kind: &'static str) -> Self {
        let mut loc = vec![Value::from("body")];
        loc.extend_from_slice(path);
        Self {
            loc,
            msg: msg.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    StringList,
}

/// Request bodies that can report every problem with their JSON before deserializing
pub trait RequestBody: DeserializeOwned {
    fn field_errors(body: &Value) -> Vec<FieldError>;
}

/// Check that `body` is an object carrying each required field with the right type
pub fn check_fields(body: &Value, fields: &[(&str, FieldKind)]) -> Vec<FieldError> {
    let Some(object) = body.as_object() else {
        return vec![FieldError::new(&[], "Input should be a valid dictionary", "dict_type")];
    };

    let mut errors = Vec::new();
    for (name, kind) in fields {
        let path = [Value::from(*name)];
        let Some(value) = object.get(*name) else {
            errors.push(FieldError::new(&path, "Field required", "missing"));
            continue;
        };

        match kind {
            FieldKind::String => {
                if !value.is_string() {
                    errors.push(FieldError::new(&path, "Input should be a valid string", "string_type"));
                }
            }
            FieldKind::StringList => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_string() {
                            errors.push(FieldError::new(
                                &[Value::from(*name), Value::from(i)],
                                "Input should be a valid string",
                                "string_type",
                            ));
                        }
                    }
                }
                None => errors.push(FieldError::new(&path, "Input should be a valid list", "list_type")),
            },
        }
    }
    errors
}

/// JSON body extractor whose rejections become `ApiError::Validation`
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: RequestBody,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;

        let errors = T::field_errors(&body);
        if !errors.is_empty() {
            return Err(ApiError::Validation {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                errors,
            });
        }

        serde_json::from_value(body)
            .map(ValidatedJson)
            .map_err(|e| ApiError::Validation {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                errors: vec![FieldError::new(&[], e.to_string(), "value_error")],
            })
    }
}
