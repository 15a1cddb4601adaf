//! Prediction endpoint: `POST /predict/{field_id}/`.
//!
//! Validates the seven sensor readings, runs them through every loaded
//! model, answers with whichever predictions succeeded, and appends the
//! result to the field's remote prediction history from a detached task.
//! The append is best-effort: its failure is logged on the task's own path
//! and never changes the response.

use axum::{
    extract::Path, extract::State, response::IntoResponse, routing::post, Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::AppState;
use crate::error::{ApiError, FieldErrors};
use crate::ml::{FEATURE_COUNT, FEATURE_FIELDS};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/predict/{field_id}/", post(handler))
}

async fn handler(
    Path(field_id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    // ---
    info!("POST /predict/{}/", field_id);

    // Validation happens before any side effect
    let features = parse_feature_vector(&body).map_err(ApiError::Validation)?;

    // Inference is CPU-bound, keep it off the async workers
    let models = state.models.clone();
    let predictions = tokio::task::spawn_blocking(move || models.predict(&features))
        .await
        .map_err(|e| ApiError::Internal(format!("Prediction failed: {e}")))??;

    debug!("Predictions for field {}: {:?}", field_id, predictions);

    // Best-effort history append, detached from the response path
    let entry = json!({
        "timestamp": Utc::now().timestamp_millis(),
        "predictions": predictions.clone(),
    });
    let remote = state.remote.clone();
    tokio::spawn(async move {
        if let Err(e) = remote.push_prediction(field_id, entry).await {
            warn!("Could not save prediction for field {}: {}", field_id, e);
        }
    });

    Ok(Json(json!({
        "field_id": field_id,
        "predictions": predictions,
    })))
}

/// Check the seven required readings and assemble them, in trained feature
/// order, into the model input vector. Every offending field is reported,
/// not just the first.
fn parse_feature_vector(body: &Value) -> Result<[f32; FEATURE_COUNT], FieldErrors> {
    // ---
    let mut features = [0f32; FEATURE_COUNT];
    let mut errors = FieldErrors::new();

    for (slot, field) in features.iter_mut().zip(FEATURE_FIELDS) {
        match body.get(field) {
            None | Some(Value::Null) => {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push("This field is required.".to_string());
            }
            Some(value) => match as_number(value) {
                Some(n) => *slot = n as f32,
                None => {
                    errors
                        .entry(field.to_string())
                        .or_default()
                        .push("A valid number is required.".to_string());
                }
            },
        }
    }

    if errors.is_empty() {
        Ok(features)
    } else {
        Err(errors)
    }
}

/// Accept JSON numbers and numeric strings; sensor gateways are not
/// consistent about quoting.
fn as_number(value: &Value) -> Option<f64> {
    // ---
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn full_body() -> Value {
        // ---
        json!({
            "soil_moisture": 30.0,
            "temperature": 25.0,
            "humidity": 60.0,
            "soil_ph": 6.5,
            "n_level": 40.0,
            "p_level": 20.0,
            "k_level": 15.0,
        })
    }

    #[test]
    fn test_valid_body_assembles_vector_in_order() {
        // ---
        let features = parse_feature_vector(&full_body()).unwrap();
        assert_eq!(features, [30.0, 25.0, 60.0, 6.5, 40.0, 20.0, 15.0]);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        // ---
        let mut body = full_body();
        body["soil_ph"] = json!("6.5");

        let features = parse_feature_vector(&body).unwrap();
        assert_eq!(features[3], 6.5);
    }

    #[test]
    fn test_missing_field_is_reported() {
        // ---
        let mut body = full_body();
        body.as_object_mut().unwrap().remove("humidity");

        let errors = parse_feature_vector(&body).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["humidity"], vec!["This field is required."]);
    }

    #[test]
    fn test_every_bad_field_is_reported() {
        // ---
        let mut body = full_body();
        body.as_object_mut().unwrap().remove("n_level");
        body["temperature"] = json!("warm");
        body["k_level"] = json!(Value::Null);

        let errors = parse_feature_vector(&body).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["temperature"], vec!["A valid number is required."]);
        assert_eq!(errors["n_level"], vec!["This field is required."]);
        assert_eq!(errors["k_level"], vec!["This field is required."]);
    }

    #[test]
    fn test_non_numeric_types_are_rejected() {
        // ---
        let mut body = full_body();
        body["p_level"] = json!([20.0]);

        let errors = parse_feature_vector(&body).unwrap_err();
        assert_eq!(errors["p_level"], vec!["A valid number is required."]);
    }
}
