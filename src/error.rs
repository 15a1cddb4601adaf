//! HTTP-facing error taxonomy for the API.
//!
//! Three conditions cover every failure the handlers can surface:
//! - `Validation` – malformed or missing request fields (400, per-field detail)
//! - `NotFound` – no sensor data anywhere for the requested field (404)
//! - `Internal` – any other store, remote-database, or model failure (500)
//!
//! Persistence failures on the prediction write path are deliberately *not*
//! represented here: they are logged on the background task's own path and
//! never reach the caller.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::firebase::RemoteDbError;
use crate::ml::PredictError;
use crate::store::StoreError;

/// Per-field validation detail: field name to list of error messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Request payload failed field validation.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// No data found locally or remotely.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure from the store, remote database, or a model.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        match self {
            ApiError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(json!(fields))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<RemoteDbError> for ApiError {
    fn from(e: RemoteDbError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Internal(format!("Prediction failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_carries_error_message() {
        // ---
        let resp = ApiError::NotFound("No data found for field 42".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert_eq!(body["error"], "No data found for field 42");
    }

    #[tokio::test]
    async fn validation_serializes_field_map_verbatim() {
        // ---
        let mut fields = FieldErrors::new();
        fields.insert("soil_ph".into(), vec!["This field is required.".into()]);

        let resp = ApiError::Validation(fields).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert_eq!(body["soil_ph"][0], "This field is required.");
    }

    #[tokio::test]
    async fn internal_maps_to_500() {
        // ---
        let resp = ApiError::Internal("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(resp).await;
        assert_eq!(body["error"], "boom");
    }
}
