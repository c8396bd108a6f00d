use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

use store::StoreError;

/// JSON API error: serialized as `{<key>: <message>}` with the given status.
/// The key is `message` or `error` depending on the service variant.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub key: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, key: &'static str, message: impl Into<String>) -> Self {
        Self { status, key, message: message.into() }
    }

    pub fn from_store(err: StoreError, key: &'static str) -> Self {
        match err {
            StoreError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, key, "Item not found"),
            StoreError::InvalidId(_) => Self::new(StatusCode::BAD_REQUEST, key, "invalid item id"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert(self.key.to_string(), Value::String(self.message));
        (self.status, Json(Value::Object(body))).into_response()
    }
}
