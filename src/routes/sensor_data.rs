//! Sensor data gateway: `GET /sensor-data/{field_id}/`.
//!
//! Serves the most authoritative known snapshot for a field: the local store
//! wins; the remote realtime database is consulted exactly once as a
//! fallback. Read-only on both paths.

use axum::{
    extract::Path, extract::State, response::IntoResponse, routing::get, Json, Router,
};
use serde_json::json;
use tracing::{debug, info};

use super::AppState;
use crate::error::ApiError;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/sensor-data/{field_id}/", get(handler))
}

async fn handler(
    Path(field_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    // ---
    info!("GET /sensor-data/{}/", field_id);

    // Local store first
    if let Some(field) = state.store.get(field_id).await? {
        debug!("Field {} served from local store", field_id);
        return Ok(Json(json!({
            "field_id": field_id,
            "sensor_data": field.sensor_data(),
        })));
    }

    // Fall back to the remote database
    debug!("Field {} not in local store, trying remote", field_id);

    match state.remote.get_sensor_data(field_id).await? {
        Some(data) => Ok(Json(json!({
            "field_id": field_id,
            "sensor_data": data,
            "source": "firebase",
        }))),
        None => Err(ApiError::NotFound(format!(
            "No data found for field {field_id}"
        ))),
    }
}
