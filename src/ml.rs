//! Model registry and inference.
//!
//! Three pre-trained artifacts (`yield`, `irrigation`, `fertilization`) are
//! loaded once at startup into a [`ModelRegistry`] that is immutable
//! afterwards and shared by reference across requests. A load failure leaves
//! that slot empty; it never aborts startup and never blocks the other
//! models, whose predictions simply appear without the missing key.
//!
//! Artifacts are ONNX graphs (scikit-learn models exported via sklearn-onnx)
//! executed through the `ort` crate. Each takes a single `1×7 f32` tensor in
//! the fixed feature order and answers a scalar: a continuous value for
//! yield, a 0/1 class for irrigation, and a class index for fertilization.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use serde::Serialize;
use thiserror::Error;

// ---

/// Number of sensor readings in a feature vector.
pub const FEATURE_COUNT: usize = 7;

/// Request field names in the exact order the models were trained on.
pub const FEATURE_FIELDS: [&str; FEATURE_COUNT] = [
    "soil_moisture",
    "temperature",
    "humidity",
    "soil_ph",
    "n_level",
    "p_level",
    "k_level",
];

/// Fertilizer class labels in trained class-index order. Do not reorder.
pub const FERTILIZER_LABELS: [&str; 5] = ["NPK", "Urea", "DAP", "MOP", "None"];

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("model artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("model load failed: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// A loaded model exposing its single inference call.
pub trait Predictor: Send + Sync {
    /// Run the model on one feature vector, returning the raw scalar output
    /// (continuous value or class index, depending on the model).
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<f32, PredictError>;
}

/// ONNX-backed [`Predictor`] used in production.
pub struct OnnxPredictor {
    session: Mutex<Session>,
}

impl OnnxPredictor {
    /// Load an ONNX artifact from disk.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        // ---
        if !path.exists() {
            return Err(PredictError::ArtifactNotFound(path.display().to_string()));
        }

        let builder = Session::builder().map_err(|e| PredictError::Load(e.to_string()))?;
        let mut builder = builder
            .with_intra_threads(1)
            .map_err(|e| PredictError::Load(e.to_string()))?;
        let session = builder
            .commit_from_file(path)
            .map_err(|e| PredictError::Load(e.to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<f32, PredictError> {
        // ---
        let mut session = self
            .session
            .lock()
            .map_err(|e| PredictError::Inference(format!("session lock poisoned: {e}")))?;

        let shape = vec![1i64, FEATURE_COUNT as i64];
        let input = Tensor::from_array((shape, features.to_vec()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        // Regressors answer f32; classifiers exported from scikit-learn
        // answer an int64 label tensor.
        if let Ok((_, data)) = outputs[0].try_extract_tensor::<f32>() {
            return data
                .first()
                .copied()
                .ok_or_else(|| PredictError::Inference("empty model output".into()));
        }

        let (_, data) = outputs[0]
            .try_extract_tensor::<i64>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        data.first()
            .map(|&v| v as f32)
            .ok_or_else(|| PredictError::Inference("empty model output".into()))
    }
}

/// Merged model outputs; absent models leave their key out of the JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Predictions {
    // ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_kg_per_ha: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub irrigation_needed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_fertilizer: Option<String>,
}

/// The three named model slots, any of which may be empty.
pub struct ModelRegistry {
    // ---
    yield_model: Option<Box<dyn Predictor>>,
    irrigation_model: Option<Box<dyn Predictor>>,
    fertilization_model: Option<Box<dyn Predictor>>,
}

impl ModelRegistry {
    pub fn new(
        yield_model: Option<Box<dyn Predictor>>,
        irrigation_model: Option<Box<dyn Predictor>>,
        fertilization_model: Option<Box<dyn Predictor>>,
    ) -> Self {
        // ---
        Self {
            yield_model,
            irrigation_model,
            fertilization_model,
        }
    }

    /// Load the three artifacts from `dir`, skipping any that fail.
    pub fn load(dir: &Path) -> Self {
        // ---
        Self::new(
            load_artifact(dir, "yield", "yield_model.onnx"),
            load_artifact(dir, "irrigation", "irrigation_model.onnx"),
            load_artifact(dir, "fertilization", "fertilization_model.onnx"),
        )
    }

    /// How many of the three slots hold a model.
    pub fn loaded_count(&self) -> usize {
        // ---
        [
            self.yield_model.is_some(),
            self.irrigation_model.is_some(),
            self.fertilization_model.is_some(),
        ]
        .iter()
        .filter(|loaded| **loaded)
        .count()
    }

    /// Run every loaded model on one feature vector and merge the outputs.
    ///
    /// Missing models are not an error; an inference failure from a loaded
    /// model is.
    pub fn predict(&self, features: &[f32; FEATURE_COUNT]) -> Result<Predictions, PredictError> {
        // ---
        let mut predictions = Predictions::default();

        if let Some(model) = &self.yield_model {
            predictions.yield_kg_per_ha = Some(f64::from(model.predict(features)?));
        }

        if let Some(model) = &self.irrigation_model {
            predictions.irrigation_needed = Some(model.predict(features)? != 0.0);
        }

        if let Some(model) = &self.fertilization_model {
            let label = fertilizer_label(model.predict(features)?);
            predictions.recommended_fertilizer = Some(label.to_string());
        }

        Ok(predictions)
    }
}

fn load_artifact(dir: &Path, name: &str, file_name: &str) -> Option<Box<dyn Predictor>> {
    // ---
    let path = dir.join(file_name);
    match OnnxPredictor::load(&path) {
        Ok(model) => {
            tracing::info!("Loaded {} model from {}", name, path.display());
            Some(Box::new(model))
        }
        Err(e) => {
            tracing::warn!("Error loading {} model: {}", name, e);
            None
        }
    }
}

/// Map a raw class index to its fertilizer label; anything outside the
/// trained label range answers `"Unknown"`.
pub fn fertilizer_label(raw: f32) -> &'static str {
    // ---
    let index = raw as i64;
    usize::try_from(index)
        .ok()
        .and_then(|i| FERTILIZER_LABELS.get(i))
        .copied()
        .unwrap_or("Unknown")
}
