//! Uniform response envelope.
//!
//! Every endpoint answers `{success, errorMessage, data}`. Status code and
//! body are always produced together as one `Response`.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

/// Response body shared by every endpoint. `success: true` implies an empty
/// `errorMessage`; `success: false` implies `data: null`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize = Value> {
    pub success: bool,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful envelope around `data`. Use `Envelope::ok(())` for
    /// endpoints that return no payload (`()` serializes to `null`).
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error_message: String::new(),
            data: Some(data),
        }
    }
}

impl Envelope<Value> {
    /// Failed envelope carrying a human-readable message and `data: null`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
