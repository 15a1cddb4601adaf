use std::sync::Arc;

use axum::Router;

use crate::firebase::RemoteDb;
use crate::ml::ModelRegistry;
use crate::store::FieldStore;

mod health;
mod predict;
mod sensor_data;

// ---

/// Shared dependencies injected into every handler: the field record store,
/// the remote realtime database, and the model registry. All three are
/// behind `Arc` and immutable for the life of the process.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FieldStore>,
    pub remote: Arc<dyn RemoteDb>,
    pub models: Arc<ModelRegistry>,
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(sensor_data::router())
        .merge(predict::router())
        .merge(health::router())
        .with_state(state)
}
