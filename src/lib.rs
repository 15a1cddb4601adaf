//! Library crate for the `agrisense-backend` service.
//!
//! The binary in `main.rs` wires these modules together; keeping them in a
//! library target lets the integration tests in `tests/` build the same
//! router against in-memory stand-ins for the store, the remote database,
//! and the model artifacts.
//!
//! Module boundaries follow the Explicit Module Boundary Pattern (EMBP):
//! - `config`   – environment-driven runtime configuration
//! - `error`    – the HTTP-facing error taxonomy
//! - `models`   – persisted and wire-level data types
//! - `schema`   – idempotent database schema setup
//! - `store`    – the field record store (local relational persistence)
//! - `firebase` – the remote realtime-database client
//! - `ml`       – model registry and inference
//! - `routes`   – the Axum route gateway

pub mod config;
pub mod error;
pub mod firebase;
pub mod ml;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

pub use config::Config;
pub use error::ApiError;
