//! # neuropilot-server
//!
//! Serves the prediction engine over HTTP.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `POST` | `/ml/predict/` | `{success, prediction, model_loaded}` |
//! | `GET` | `/ml/status/` | `{model_loaded, predictions_processed, model_version?}` |
//!
//! The trailing slash is optional on both paths.

pub mod http;
pub mod routes;
pub mod runtime;
pub mod server;

pub use runtime::NeuropilotRuntime;
pub use server::{bind, serve};
