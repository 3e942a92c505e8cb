use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use thiserror::Error;

/// A fault raised while handling a request.
///
/// Every kind is reported with `406 Not Acceptable` and a body of the form
/// `{"error": "<message>", "kind": "<kind>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(msg) => error!("Request failed: {}", msg),
            other => warn!("Request rejected ({}): {}", other.kind(), other),
        }
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (StatusCode::NOT_ACCEPTABLE, body).into_response()
    }
}

impl From<crate::Error> for ApiError {
    fn from(e: crate::Error) -> Self {
        match e {
            crate::Error::BookNotFound(_) => ApiError::NotFound(e.to_string()),
            crate::Error::InvalidField { .. } => ApiError::Validation(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_errors_render_as_not_acceptable() {
        let resp = ApiError::NotFound("book not found: x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);

        let body = to_bytes(resp.into_body(), 1024).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "book not found: x", "kind": "not_found" }));
    }

    #[test]
    fn test_store_error_mapping() {
        let not_found: ApiError = crate::Error::BookNotFound("x".into()).into();
        assert_eq!(not_found.kind(), "not_found");

        let invalid: ApiError = crate::Error::InvalidField {
            field: "title".into(),
            reason: "expected a string".into(),
        }
        .into();
        assert_eq!(invalid.kind(), "validation");

        let io: ApiError = crate::Error::Io(std::io::Error::other("disk full")).into();
        assert_eq!(io.kind(), "internal");
        assert!(io.to_string().contains("disk full"));
    }
}
